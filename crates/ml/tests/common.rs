#![allow(dead_code)]

use ml::{Dense, PolicyAgent};
use physics::{CartPendulum, CartPendulumConfig};

pub const HIDDEN: usize = 4;

/// Agent whose output ignores the observation: logits are the given biases.
pub fn constant_agent(left_logit: f32, right_logit: f32) -> PolicyAgent {
    let hidden = Dense::new(vec![0.0; 4 * HIDDEN], vec![0.0; HIDDEN], 4, HIDDEN);
    let output = Dense::new(vec![0.0; HIDDEN * 2], vec![left_logit, right_logit], HIDDEN, 2);
    PolicyAgent::from_layers(hidden, output, 300.0)
}

pub fn seeded_agent(seed: u64) -> PolicyAgent {
    let mut rng = fastrand::Rng::with_seed(seed);
    PolicyAgent::new(HIDDEN, 300.0, &mut rng)
}

pub fn default_sim() -> CartPendulum {
    CartPendulum::new(CartPendulumConfig::default())
}
