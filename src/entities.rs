//! All game entity types and their validating constructors.
//!
//! Fields are private so that an instance holding invalid state can never be
//! observed: every value goes through a constructor that returns
//! `GameError` on bad input. The physics and bookkeeping live in `compute`.

use std::f64::consts::PI;
use std::fmt;

use crate::compute::MAX_FORCE;
use crate::error::GameError;

/// An integer grid cell `(x, y)`.
pub type Cell = (i32, i32);

/// A continuous bullet position `(x, y)`.
pub type Point = (f64, f64);

// ── Targets ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Point,
    Obstacle,
    Boss,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TargetKind::Point => "Target",
            TargetKind::Obstacle => "Obstacle",
            TargetKind::Boss => "Boss",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Body {
    Point,
    /// Column of cells from the ground up, `height` cells tall.
    Obstacle { height: u32 },
    /// 2×2 block anchored at its lower-left cell.
    Boss { health: u32 },
}

/// Something the bullet can collide with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    x: i32,
    y: i32,
    body: Body,
}

fn check_position(x: i32, y: i32) -> Result<(), GameError> {
    if x < 0 || y < 0 {
        return Err(GameError::Position { x, y });
    }
    Ok(())
}

impl Target {
    /// A single-cell target, destroyed by the first hit.
    pub fn point(x: i32, y: i32) -> Result<Self, GameError> {
        check_position(x, y)?;
        Ok(Self { x, y, body: Body::Point })
    }

    /// An indestructible column standing on the ground at column `x`.
    pub fn obstacle(x: i32, height: i32) -> Result<Self, GameError> {
        if height < 1 {
            return Err(GameError::Height(height));
        }
        check_position(x, 0)?;
        Ok(Self {
            x,
            y: 0,
            body: Body::Obstacle { height: height as u32 },
        })
    }

    /// A 2×2 target that takes `health` hits to destroy.
    ///
    /// The anchor must leave room for the block's second column and row.
    pub fn boss(x: i32, y: i32, health: i32) -> Result<Self, GameError> {
        if health < 1 {
            return Err(GameError::Health(health));
        }
        check_position(x, y)?;
        if x.checked_add(1).is_none() || y.checked_add(1).is_none() {
            return Err(GameError::Position { x, y });
        }
        Ok(Self {
            x,
            y,
            body: Body::Boss { health: health as u32 },
        })
    }

    pub fn kind(&self) -> TargetKind {
        match self.body {
            Body::Point => TargetKind::Point,
            Body::Obstacle { .. } => TargetKind::Obstacle,
            Body::Boss { .. } => TargetKind::Boss,
        }
    }

    /// Anchor cell: the target cell, the foot of an obstacle, or the
    /// lower-left corner of a boss.
    pub fn position(&self) -> Cell {
        (self.x, self.y)
    }

    pub fn height(&self) -> Option<u32> {
        match self.body {
            Body::Obstacle { height } => Some(height),
            _ => None,
        }
    }

    pub fn health(&self) -> Option<u32> {
        match self.body {
            Body::Boss { health } => Some(health),
            _ => None,
        }
    }

    /// Grid cells covered by this target. Derived from the constructor
    /// inputs only, so a boss keeps its footprint while losing health.
    pub fn occupied_cells(&self) -> Vec<Cell> {
        let (x, y) = (self.x, self.y);
        match self.body {
            Body::Point => vec![(x, y)],
            Body::Obstacle { height } => (0..height as i32).map(|row| (x, row)).collect(),
            Body::Boss { .. } => vec![(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)],
        }
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        let (x, y) = (self.x, self.y);
        match self.body {
            Body::Point => cell == (x, y),
            Body::Obstacle { height } => cell.0 == x && cell.1 >= 0 && cell.1 < height as i32,
            Body::Boss { .. } => (x..=x + 1).contains(&cell.0) && (y..=y + 1).contains(&cell.1),
        }
    }

    /// Applies one hit. Returns `true` when the target is destroyed and
    /// must be removed from play.
    pub fn register_hit(&mut self) -> bool {
        match &mut self.body {
            Body::Point => true,
            Body::Obstacle { .. } => false,
            Body::Boss { health } => {
                *health = health.saturating_sub(1);
                *health == 0
            }
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

/// One shot. Created per attempt and dropped once the attempt resolves.
#[derive(Clone, Debug)]
pub struct Bullet {
    /// Launch angle in radians.
    pub(crate) angle: f64,
    /// Launch force in force units (0..=MAX_FORCE).
    pub(crate) force: f64,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) trajectory: Vec<Point>,
}

impl Bullet {
    /// `angle_degrees` must lie in 1..=89 and `force_percent` in 0..=100.
    pub fn new(angle_degrees: i32, force_percent: i32) -> Result<Self, GameError> {
        if !(1..=89).contains(&angle_degrees) {
            return Err(GameError::Angle(angle_degrees));
        }
        if !(0..=100).contains(&force_percent) {
            return Err(GameError::Force(force_percent));
        }
        Ok(Self {
            angle: f64::from(angle_degrees) * (PI / 180.0),
            force: (f64::from(force_percent) / 100.0) * MAX_FORCE,
            x: 0.0,
            y: 0.0,
            trajectory: Vec::new(),
        })
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn force(&self) -> f64 {
        self.force
    }

    /// Launch velocity `(vx, vy)`.
    pub fn velocity(&self) -> (f64, f64) {
        (self.force * self.angle.cos(), self.force * self.angle.sin())
    }

    pub fn position(&self) -> Point {
        (self.x, self.y)
    }

    pub fn trajectory(&self) -> &[Point] {
        &self.trajectory
    }

    pub fn into_trajectory(self) -> Vec<Point> {
        self.trajectory
    }
}

// ── Level ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelState {
    Active,
    Won,
    Lost,
}

/// One stage: a target set and a limited number of shots.
#[derive(Clone, Debug)]
pub struct Level {
    pub(crate) attempts: u32,
    pub(crate) targets: Vec<Target>,
    /// Set after each attempt; true once only obstacles remain.
    pub(crate) result: bool,
    pub(crate) trajectory: Vec<Point>,
}

impl Level {
    pub fn new(attempts: i32, targets: Vec<Target>) -> Result<Self, GameError> {
        if attempts < 1 {
            return Err(GameError::Attempts(attempts));
        }
        Ok(Self {
            attempts: attempts as u32,
            targets,
            result: false,
            trajectory: Vec::new(),
        })
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn result(&self) -> bool {
        self.result
    }

    /// Trajectory of the most recent attempt; empty before the first one.
    pub fn trajectory(&self) -> &[Point] {
        &self.trajectory
    }

    pub fn state(&self) -> LevelState {
        if self.result {
            LevelState::Won
        } else if self.attempts == 0 {
            LevelState::Lost
        } else {
            LevelState::Active
        }
    }
}

// ── Campaign ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignStatus {
    InProgress,
    Won,
    Lost,
}

/// An ordered run of stages played one after another.
#[derive(Clone, Debug)]
pub struct Campaign {
    pub(crate) levels: Vec<Level>,
    pub(crate) current: usize,
    pub(crate) status: CampaignStatus,
}

impl Campaign {
    pub fn new(levels: Vec<Level>) -> Self {
        let status = if levels.is_empty() {
            CampaignStatus::Won
        } else {
            CampaignStatus::InProgress
        };
        Self {
            levels,
            current: 0,
            status,
        }
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    /// 1-based number of the stage being played.
    pub fn stage_number(&self) -> usize {
        self.current + 1
    }

    pub fn stage_count(&self) -> usize {
        self.levels.len()
    }

    /// `None` once the campaign is over.
    pub fn current_level(&self) -> Option<&Level> {
        match self.status {
            CampaignStatus::InProgress => self.levels.get(self.current),
            _ => None,
        }
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level> {
        match self.status {
            CampaignStatus::InProgress => self.levels.get_mut(self.current),
            _ => None,
        }
    }
}
