use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// The timestep passed to `step` was zero, negative or not finite.
    #[error("invalid timestep: {0} (must be positive and finite)")]
    InvalidTimestep(f32),
    /// Cart and bob coincide so the rod direction is undefined.
    #[error("degenerate geometry: cart and bob coincide")]
    DegenerateGeometry,
}
