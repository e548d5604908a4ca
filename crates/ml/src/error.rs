use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TrainError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("group size must be at least one")]
    EmptyGroup,
    #[error("invalid trainer config: {0}")]
    InvalidConfig(&'static str),
}
