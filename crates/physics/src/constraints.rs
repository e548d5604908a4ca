//! Groove and pin constraints.
//!
//! Both constraints act in two stages: a velocity stage run after forces
//! are integrated, and a position stage run after positions are advanced
//! that snaps the bodies back onto the constraint manifold.

use crate::error::PhysicsError;
use crate::types::{RigidBody, Vec2};

/// Squared rod lengths below this are treated as coincident bodies.
pub(crate) const DEGENERATE_LENGTH_SQ: f32 = 1e-8;

/// Restricts a body to a horizontal segment at a fixed height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrooveConstraint {
    pub y: f32,
    pub min_x: f32,
    pub max_x: f32,
}

impl GrooveConstraint {
    #[must_use]
    pub fn centered(y: f32, half_width: f32) -> Self {
        Self {
            y,
            min_x: -half_width,
            max_x: half_width,
        }
    }

    /// Removes all vertical velocity.
    pub fn solve_velocity(&self, body: &mut RigidBody) {
        body.vel.y = 0.0;
    }

    /// Projects the body back onto the segment and returns the vertical drift
    /// that was removed. Hitting an end of the groove stops the body there.
    pub fn correct_position(&self, body: &mut RigidBody) -> f32 {
        let drift = (body.pos.y - self.y).abs();
        body.pos.y = self.y;
        if body.pos.x < self.min_x {
            body.pos.x = self.min_x;
            body.vel.x = body.vel.x.max(0.0);
        } else if body.pos.x > self.max_x {
            body.pos.x = self.max_x;
            body.vel.x = body.vel.x.min(0.0);
        }
        drift
    }
}

/// Keeps two bodies at a fixed distance while leaving rotation free.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinConstraint {
    pub length: f32,
}

impl PinConstraint {
    /// Removes the relative velocity along the rod with a single impulse.
    ///
    /// The anchor body is assumed to be held by a groove, so it only receives
    /// the horizontal part of the reaction and its effective inverse mass
    /// along the rod is scaled by `n.x^2`.
    pub fn solve_velocity(
        &self,
        anchor: &mut RigidBody,
        body: &mut RigidBody,
    ) -> Result<(), PhysicsError> {
        let n = rod_direction(anchor.pos, body.pos)?;
        let inv_anchor = anchor.inv_mass() * n.x * n.x;
        let inv_body = body.inv_mass();
        let effective = inv_anchor + inv_body;
        if effective <= 0.0 {
            return Ok(());
        }

        let radial = (body.vel - anchor.vel).dot(n);
        let lambda = -radial / effective;
        body.vel += n * (lambda * inv_body);
        anchor.vel.x -= lambda * n.x * anchor.inv_mass();
        Ok(())
    }

    /// Re-projects `body` onto the circle of radius `length` around `anchor`
    /// and returns the length error that was removed.
    pub fn correct_position(
        &self,
        anchor: &RigidBody,
        body: &mut RigidBody,
    ) -> Result<f32, PhysicsError> {
        let n = rod_direction(anchor.pos, body.pos)?;
        let drift = ((body.pos - anchor.pos).length() - self.length).abs();
        body.pos = anchor.pos + n * self.length;
        Ok(drift)
    }
}

/// Unit vector from `anchor` to `body`.
pub(crate) fn rod_direction(anchor: Vec2, body: Vec2) -> Result<Vec2, PhysicsError> {
    let r = body - anchor;
    let len_sq = r.length_squared();
    if len_sq < DEGENERATE_LENGTH_SQ {
        return Err(PhysicsError::DegenerateGeometry);
    }
    Ok(r / len_sq.sqrt())
}
