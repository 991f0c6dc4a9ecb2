//! Game logic: the bullet trajectory engine, attempt bookkeeping and stage
//! progression.
//!
//! Everything here is deterministic. Given the same angle, force and target
//! list, a shot always records the same trajectory and hits the same target.

use log::{debug, info};

use crate::entities::{
    Bullet, Campaign, CampaignStatus, Cell, Level, LevelState, Point, Target, TargetKind,
};
use crate::error::GameError;

// ── Physics constants ────────────────────────────────────────────────────────

/// Right edge of the playing field.
pub const MAX_X: f64 = 32.0;
/// Top edge of the playing field. The bottom edge is the ground at y = 0.
pub const MAX_Y: f64 = 16.0;
/// Force units at 100 %.
pub const MAX_FORCE: f64 = 25.0;
pub const GRAVITY: f64 = 9.81;
/// Simulated time between two trajectory samples.
pub const TIME_STEP: f64 = 0.01;

/// Rounds a continuous position to its grid cell. Ties go to the even
/// neighbour so that boundary shots resolve the same way every time.
pub fn to_cell((x, y): Point) -> Cell {
    (x.round_ties_even() as i32, y.round_ties_even() as i32)
}

pub fn in_bounds((x, y): Point) -> bool {
    x <= MAX_X && (0.0..=MAX_Y).contains(&y)
}

// ── Trajectory engine ────────────────────────────────────────────────────────

impl Bullet {
    /// Rounded grid cell of the current position.
    pub fn cell(&self) -> Cell {
        to_cell(self.position())
    }

    /// Flies the bullet until it hits a target or leaves the field.
    ///
    /// Targets are checked in list order, so when two footprints share a
    /// cell the earlier target wins. Returns `None` on a miss.
    pub fn simulate<'a>(&mut self, targets: &'a [Target]) -> Option<&'a Target> {
        self.simulate_index(targets).map(|i| &targets[i])
    }

    /// Same as [`Bullet::simulate`] but yields the index of the hit target.
    ///
    /// Each step records the current position and tests it before moving the
    /// bullet to the position at the current time and only then advancing
    /// the clock. The first two samples are therefore both the origin, and
    /// the sample that leaves the field is never recorded.
    pub fn simulate_index(&mut self, targets: &[Target]) -> Option<usize> {
        let (vx, vy) = self.velocity();
        let mut time = 0.0_f64;

        while in_bounds(self.position()) {
            self.trajectory.push(self.position());

            let cell = self.cell();
            if let Some(index) = targets.iter().position(|t| t.occupies(cell)) {
                debug!(
                    "bullet hit {} at {:?} after {} steps",
                    targets[index],
                    cell,
                    self.trajectory.len()
                );
                return Some(index);
            }

            self.x = vx * time;
            self.y = vy * time - 0.5 * GRAVITY * time.powi(2);
            time += TIME_STEP;
        }

        debug!(
            "bullet left the field at ({:.3}, {:.3}) after {} steps",
            self.x,
            self.y,
            self.trajectory.len()
        );
        None
    }
}

// ── Attempts ─────────────────────────────────────────────────────────────────

/// True when nothing destructible is left. Holds for an empty set too.
pub fn only_obstacles_left(targets: &[Target]) -> bool {
    targets.iter().all(|t| t.kind() == TargetKind::Obstacle)
}

impl Level {
    /// Fires one shot and applies its outcome.
    ///
    /// The bullet is validated before anything else happens, so a bad angle
    /// or force leaves the level untouched. Otherwise one attempt is spent
    /// whether or not something was hit. The returned target reflects the
    /// hit it just took (a boss shows its reduced health).
    ///
    /// Calling this after the level has ended is not blocked; check
    /// [`Level::state`] first.
    pub fn simulate_attempt(
        &mut self,
        angle_degrees: i32,
        force_percent: i32,
    ) -> Result<Option<Target>, GameError> {
        let mut bullet = Bullet::new(angle_degrees, force_percent)?;
        let hit = bullet.simulate_index(&self.targets);

        self.attempts = self.attempts.saturating_sub(1);
        self.trajectory = bullet.into_trajectory();

        let snapshot = hit.map(|index| {
            let target = &mut self.targets[index];
            let destroyed = target.register_hit();
            let snapshot = target.clone();
            if destroyed {
                self.targets.remove(index);
                info!("{} at {:?} destroyed", snapshot, snapshot.position());
            } else {
                info!("{} at {:?} hit", snapshot, snapshot.position());
            }
            snapshot
        });
        if snapshot.is_none() {
            info!("shot at {angle_degrees}° / {force_percent}% missed");
        }

        self.result = only_obstacles_left(&self.targets);
        debug!(
            "{} attempts left, {} targets remaining, state {:?}",
            self.attempts,
            self.targets.len(),
            self.state()
        );
        Ok(snapshot)
    }
}

// ── Stage progression ────────────────────────────────────────────────────────

impl Campaign {
    /// Moves on once the current stage has ended.
    ///
    /// A lost stage ends the campaign. A won stage advances to the next one,
    /// and winning the last stage wins the campaign. While the current stage
    /// is still being played nothing changes.
    pub fn advance(&mut self) -> CampaignStatus {
        let state = match self.current_level() {
            Some(level) => level.state(),
            None => return self.status,
        };

        match state {
            LevelState::Active => {}
            LevelState::Lost => {
                info!("stage {} lost", self.stage_number());
                self.status = CampaignStatus::Lost;
            }
            LevelState::Won => {
                info!("stage {} cleared", self.stage_number());
                self.current += 1;
                if self.current == self.levels.len() {
                    self.current -= 1;
                    self.status = CampaignStatus::Won;
                }
            }
        }
        self.status
    }
}
