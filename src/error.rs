use thiserror::Error;

/// Validation failures raised when a bullet, target or level is built.
/// Nothing fails once construction succeeded.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("angle must be between 1 and 89 degrees (got {0})")]
    Angle(i32),
    #[error("force must be between 0 and 100 percent (got {0})")]
    Force(i32),
    #[error("target does not fit on the grid at ({x}, {y})")]
    Position { x: i32, y: i32 },
    #[error("obstacle height must be at least 1 (got {0})")]
    Height(i32),
    #[error("boss health must be at least 1 (got {0})")]
    Health(i32),
    #[error("a level needs at least one attempt (got {0})")]
    Attempts(i32),
}
