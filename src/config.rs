//! Stage files.
//!
//! A campaign can be described in TOML, one `[[stage]]` table per level:
//!
//! ```toml
//! [[stage]]
//! attempts = 2
//! targets = [
//!     { kind = "obstacle", x = 32, height = 16 },
//!     { kind = "point", x = 32, y = 16 },
//! ]
//! ```
//!
//! Every value is run through the validating constructors in `entities`, so
//! a file that parses can still be rejected.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::entities::{Level, Target};
use crate::error::GameError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse stage file: {0}")]
    Parse(#[from] toml::de::Error),
    /// `stage` is 1-based, as shown to the player.
    #[error("stage {stage}: {source}")]
    Invalid {
        stage: usize,
        #[source]
        source: GameError,
    },
    #[error("stage file defines no stages")]
    Empty,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TargetSpec {
    Point { x: i32, y: i32 },
    Obstacle { x: i32, height: i32 },
    Boss { x: i32, y: i32, health: i32 },
}

#[derive(Debug, Deserialize)]
pub struct StageSpec {
    pub attempts: i32,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
}

#[derive(Debug, Deserialize)]
struct StageFile {
    #[serde(default)]
    stage: Vec<StageSpec>,
}

impl TargetSpec {
    pub fn build(&self) -> Result<Target, GameError> {
        match *self {
            TargetSpec::Point { x, y } => Target::point(x, y),
            TargetSpec::Obstacle { x, height } => Target::obstacle(x, height),
            TargetSpec::Boss { x, y, health } => Target::boss(x, y, health),
        }
    }
}

impl StageSpec {
    pub fn build(&self) -> Result<Level, GameError> {
        let targets = self
            .targets
            .iter()
            .map(TargetSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        Level::new(self.attempts, targets)
    }
}

/// Builds every stage in order. The first invalid one aborts the whole
/// campaign rather than being skipped.
pub fn build_stages(specs: &[StageSpec]) -> Result<Vec<Level>, ConfigError> {
    if specs.is_empty() {
        return Err(ConfigError::Empty);
    }
    specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            spec.build()
                .map_err(|source| ConfigError::Invalid { stage: i + 1, source })
        })
        .collect()
}

pub fn parse_stages(content: &str) -> Result<Vec<Level>, ConfigError> {
    let file: StageFile = toml::from_str(content)?;
    build_stages(&file.stage)
}

pub fn load_stages(path: &Path) -> Result<Vec<Level>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let levels = parse_stages(&content)?;
    info!("loaded {} stages from {}", levels.len(), path.display());
    Ok(levels)
}

/// The built-in three-stage campaign: a lone target, a target perched on a
/// wall, then the same with a boss guarding the ground.
pub fn default_stages() -> Result<Vec<Level>, ConfigError> {
    let stages = [
        StageSpec {
            attempts: 1,
            targets: vec![TargetSpec::Point { x: 32, y: 0 }],
        },
        StageSpec {
            attempts: 2,
            targets: vec![
                TargetSpec::Obstacle { x: 32, height: 16 },
                TargetSpec::Point { x: 32, y: 16 },
            ],
        },
        StageSpec {
            attempts: 4,
            targets: vec![
                TargetSpec::Obstacle { x: 32, height: 16 },
                TargetSpec::Point { x: 32, y: 16 },
                TargetSpec::Boss { x: 28, y: 0, health: 2 },
            ],
        },
    ];
    build_stages(&stages)
}
