//! Configuration for the cart-pendulum scenario.

use serde::Deserialize;
use std::f32::consts::PI;

/// Fixed simulation rate in ticks per second.
pub const SIMULATION_RATE: f32 = 60.0;

/// Configuration for a [`CartPendulum`](crate::CartPendulum).
///
/// The defaults are the reference scenario; consumers and tests rely on
/// these literal values.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CartPendulumConfig {
    /// Cart-to-bob distance.
    pub rod_length: f32,
    pub cart_mass: f32,
    /// Cart width and height, only used for the moment of inertia and drawing.
    pub cart_size: [f32; 2],
    pub bob_mass: f32,
    /// Collision/draw radius, not dynamically significant.
    pub bob_radius: f32,
    /// Force applied per tick when a push is active.
    pub push_force: f32,
    /// Fraction of the cart's horizontal velocity removed each tick without force.
    pub cart_damping: f32,
    /// Half length of the groove the cart slides in, centered on the track.
    pub groove_half_width: f32,
    /// Height of the groove in world units.
    pub groove_y: f32,
    /// Gravitational acceleration magnitude, pulling toward -y.
    pub gravity: f32,
    /// Initial bob angle from vertical-down (radians).
    pub initial_angle: f32,
    /// Constraint drift above which a step counts as numerically unstable.
    pub drift_tolerance: f32,
}

impl Default for CartPendulumConfig {
    fn default() -> Self {
        Self {
            rod_length: 150.0,
            cart_mass: 4.0,
            cart_size: [80.0, 40.0],
            bob_mass: 0.01,
            bob_radius: 20.0,
            push_force: 6500.0,
            cart_damping: 0.125,
            groove_half_width: 300.0,
            groove_y: 0.0,
            gravity: 981.0, // 9.81 m/s^2 at 100 units per meter
            initial_angle: -0.9 * PI,
            drift_tolerance: 1.0,
        }
    }
}

impl CartPendulumConfig {
    /// Fixed timestep matching [`SIMULATION_RATE`].
    #[must_use]
    pub fn dt() -> f32 {
        1.0 / SIMULATION_RATE
    }

    /// Copy of this config with a different initial bob angle.
    #[must_use]
    pub fn with_initial_angle(mut self, angle: f32) -> Self {
        self.initial_angle = angle;
        self
    }
}
