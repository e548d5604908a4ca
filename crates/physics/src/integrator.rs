//! # Physics Integration
//!
//! Semi-implicit Euler integration of the two bodies: velocities are
//! advanced first, constraints act on the new velocities, then positions
//! follow the constrained velocities.

use crate::types::{RigidBody, Vec2};

/// Apply gravity to a body's velocity.
pub fn apply_gravity(body: &mut RigidBody, gravity: Vec2, dt: f32) {
    body.vel += gravity * dt;
}

/// Apply an external force to a body's velocity.
pub fn apply_force(body: &mut RigidBody, force: Vec2, dt: f32) {
    body.vel += force * body.inv_mass() * dt;
}

/// Remove a fraction of the horizontal velocity.
pub fn damp_horizontal(body: &mut RigidBody, damping: f32) {
    body.vel.x *= 1.0 - damping.clamp(0.0, 1.0);
}

/// Advance position along the current velocity.
pub fn integrate_position(body: &mut RigidBody, dt: f32) {
    body.pos += body.vel * dt;
}
