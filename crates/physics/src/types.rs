//! Rigid body and snapshot types shared by the simulator and its consumers.

pub use glam::Vec2;

/// Shape used to derive a body's moment of inertia.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box with full width and height.
    Box { width: f32, height: f32 },
    /// Solid disc.
    Circle { radius: f32 },
}

impl Shape {
    /// Moment of inertia about the body center for the given mass.
    #[must_use]
    pub fn moment_for_mass(&self, mass: f32) -> f32 {
        match *self {
            Shape::Box { width, height } => mass * (width * width + height * height) / 12.0,
            Shape::Circle { radius } => 0.5 * mass * radius * radius,
        }
    }
}

/// A point-mass or box-mass body moving in the simulation plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub moment: f32,
    pub shape: Shape,
}

impl RigidBody {
    /// Creates a body at rest.
    #[must_use]
    pub fn new(pos: Vec2, mass: f32, shape: Shape) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            mass,
            moment: shape.moment_for_mass(mass),
            shape,
        }
    }

    #[must_use]
    pub fn inv_mass(&self) -> f32 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

/// Plain-old-data snapshot of everything the renderer needs for one frame.
///
/// The layout is `#[repr(C)]` so a harness can upload it directly as bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawState {
    pub cart_pos: [f32; 2],
    pub bob_pos: [f32; 2],
    /// Signed rod angle from vertical-down.
    pub angle: f32,
    pub bob_radius: f32,
    pub cart_size: [f32; 2],
}

impl DrawState {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
