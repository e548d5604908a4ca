//! Stochastic two-action policy over the cart-pendulum observation.
//!
//! The network maps the four observation features to two logits; each logit
//! goes through the logistic function to give an independent Bernoulli
//! probability for "push left" and "push right".

use physics::Observation;

use crate::nn::{sigmoid, Dense, Relu, Sequential};
use crate::tensor::Tensor;

/// Probabilities are clamped to `[PROB_EPS, 1 - PROB_EPS]` before taking logs.
pub const PROB_EPS: f32 = 1e-7;

/// Added to the group standard deviation when normalizing advantages.
pub const ADVANTAGE_EPS: f32 = 1e-8;

pub const OBSERVATION_SIZE: usize = 4;
pub const ACTION_SIZE: usize = 2;

/// Which push buttons are held for one action window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionPair {
    pub left: bool,
    pub right: bool,
}

impl ActionPair {
    pub const NONE: Self = Self {
        left: false,
        right: false,
    };

    #[must_use]
    pub const fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }

    /// `-1` for left only, `1` for right only, `0` otherwise.
    #[must_use]
    pub fn net_direction(&self) -> i8 {
        i8::from(self.right) - i8::from(self.left)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.left && !self.right
    }

    #[must_use]
    pub fn to_array(&self) -> [bool; ACTION_SIZE] {
        [self.left, self.right]
    }
}

/// One joint draw together with the log-probability of each component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledAction {
    pub actions: ActionPair,
    /// `[ln P(left), ln P(right)]` for the drawn values.
    pub log_probs: [f32; ACTION_SIZE],
}

impl SampledAction {
    #[must_use]
    pub fn total_log_prob(&self) -> f32 {
        self.log_probs.iter().sum()
    }
}

/// Log-probability of a Bernoulli outcome, safe for `p` at 0 or 1.
#[must_use]
pub fn bernoulli_log_prob(p: f32, outcome: bool) -> f32 {
    let p = p.clamp(PROB_EPS, 1.0 - PROB_EPS);
    if outcome {
        p.ln()
    } else {
        (1.0 - p).ln()
    }
}

/// Draws `count` joint samples from fixed probabilities.
///
/// Draws use the raw probabilities, so `0` and `1` are deterministic; only
/// the reported log-probabilities go through the clamp.
#[must_use]
pub fn sample_from_probabilities(
    probs: [f32; ACTION_SIZE],
    count: usize,
    rng: &mut fastrand::Rng,
) -> Vec<SampledAction> {
    (0..count).map(|_| draw(probs, rng)).collect()
}

fn draw(probs: [f32; ACTION_SIZE], rng: &mut fastrand::Rng) -> SampledAction {
    let left = rng.f32() < probs[0];
    let right = rng.f32() < probs[1];
    SampledAction {
        actions: ActionPair { left, right },
        log_probs: [
            bernoulli_log_prob(probs[0], left),
            bernoulli_log_prob(probs[1], right),
        ],
    }
}

/// Standardizes each reward against its group: `(r - mean) / (std + eps)`.
///
/// Uses the sample standard deviation. Groups of one have zero advantage.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_group_advantages(rewards: &[f32]) -> Vec<f32> {
    let n = rewards.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = rewards.iter().sum::<f32>() / n as f32;
    let std = if n > 1 {
        let var = rewards.iter().map(|r| (r - mean).powi(2)).sum::<f32>() / (n - 1) as f32;
        var.sqrt()
    } else {
        0.0
    };
    rewards.iter().map(|r| (r - mean) / (std + ADVANTAGE_EPS)).collect()
}

/// Two-layer network producing independent left/right push probabilities.
pub struct PolicyAgent {
    net: Sequential,
    /// Scale applied to cart position and velocity before the network.
    input_scale: f32,
}

impl PolicyAgent {
    /// Randomly initialized `4 -> hidden (ReLU) -> 2` network.
    #[must_use]
    pub fn new(hidden: usize, input_scale: f32, rng: &mut fastrand::Rng) -> Self {
        Self::from_layers(
            Dense::xavier(OBSERVATION_SIZE, hidden, rng),
            Dense::xavier(hidden, ACTION_SIZE, rng),
            input_scale,
        )
    }

    /// Builds the agent from explicit layers.
    ///
    /// # Panics
    ///
    /// Panics if the layer dimensions do not chain `4 -> h -> 2`.
    #[must_use]
    pub fn from_layers(hidden: Dense, output: Dense, input_scale: f32) -> Self {
        assert_eq!(hidden.in_dim(), OBSERVATION_SIZE);
        assert_eq!(hidden.out_dim(), output.in_dim());
        assert_eq!(output.out_dim(), ACTION_SIZE);
        let mut net = Sequential::new();
        net.push(hidden);
        net.push(Relu);
        net.push(output);
        Self { net, input_scale }
    }

    fn input(&self, observation: &Observation) -> Tensor {
        Tensor::from_vec(
            vec![OBSERVATION_SIZE],
            observation.features(self.input_scale).to_vec(),
        )
    }

    /// `[P(push left), P(push right)]`, each in `[0, 1]`.
    #[must_use]
    pub fn forward(&self, observation: &Observation) -> [f32; ACTION_SIZE] {
        let (logits, _) = self.net.forward(&self.input(observation));
        [sigmoid(logits.data[0]), sigmoid(logits.data[1])]
    }

    /// Draws `count` independent joint samples from one forward pass.
    #[must_use]
    pub fn sample_actions(
        &self,
        observation: &Observation,
        count: usize,
        rng: &mut fastrand::Rng,
    ) -> Vec<SampledAction> {
        sample_from_probabilities(self.forward(observation), count, rng)
    }

    /// Single draw, the common case during rollouts.
    #[must_use]
    pub fn sample_action(&self, observation: &Observation, rng: &mut fastrand::Rng) -> SampledAction {
        draw(self.forward(observation), rng)
    }

    /// Joint log-probability of `actions` under the current parameters.
    #[must_use]
    pub fn log_prob(&self, observation: &Observation, actions: ActionPair) -> f32 {
        let probs = self.forward(observation);
        bernoulli_log_prob(probs[0], actions.left) + bernoulli_log_prob(probs[1], actions.right)
    }

    /// See [`compute_group_advantages`].
    #[must_use]
    pub fn compute_group_advantages(rewards: &[f32]) -> Vec<f32> {
        compute_group_advantages(rewards)
    }

    /// Accumulates `scale * d/dtheta ln pi(actions | observation)` into `grads`.
    ///
    /// `grads` must be laid out like [`PolicyAgent::params`], e.g. from
    /// [`PolicyAgent::zero_grads`]. For a logistic output the derivative of
    /// the log-probability with respect to the logit is `a - p`.
    pub fn accumulate_log_prob_grad(
        &self,
        observation: &Observation,
        actions: ActionPair,
        scale: f32,
        grads: &mut [Tensor],
    ) {
        let (logits, activations) = self.net.forward(&self.input(observation));
        let grad_logits: Vec<f32> = logits
            .data
            .iter()
            .zip(actions.to_array())
            .map(|(&z, a)| scale * (f32::from(u8::from(a)) - sigmoid(z)))
            .collect();
        let grad_out = Tensor::from_vec(vec![ACTION_SIZE], grad_logits);
        let (_, param_grads) = self.net.backward(&activations, &grad_out);
        for (acc, g) in grads.iter_mut().zip(&param_grads) {
            acc.add_scaled(g, 1.0);
        }
    }

    /// Parameters in a fixed order: hidden weights, hidden bias, output weights, output bias.
    #[must_use]
    pub fn params(&self) -> Vec<&Tensor> {
        self.net.params()
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        self.net.params_mut()
    }

    /// Zeroed gradient buffers matching [`PolicyAgent::params`].
    #[must_use]
    pub fn zero_grads(&self) -> Vec<Tensor> {
        self.params().into_iter().map(Tensor::zeros_like).collect()
    }

    #[must_use]
    pub fn input_scale(&self) -> f32 {
        self.input_scale
    }
}
