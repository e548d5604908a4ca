//! # Episode trainer
//!
//! Runs rollouts of a [`PolicyAgent`] on a [`CartPendulum`], shapes the
//! per-tick reward with a one-way threshold hysteresis and turns a group of
//! rollouts into a policy-gradient update.
//!
//! The trainer never touches the parameters itself: [`GroupUpdate`] carries
//! the scalar objective and its gradient for an external optimizer.

use physics::{CartPendulum, CartPendulumConfig, Observation};
use serde::Deserialize;
use std::f32::consts::PI;

use crate::error::TrainError;
use crate::policy::{compute_group_advantages, ActionPair, PolicyAgent, SampledAction, ACTION_SIZE};
use crate::tensor::Tensor;

/// How often actions are drawn inside a training step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMode {
    /// One draw held for every frame of the step; one recorded step.
    #[default]
    PerStep,
    /// A fresh draw every frame; every frame is recorded as its own step.
    PerTick,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Angular magnitude above which the pendulum counts as balanced.
    pub balance_threshold: f32,
    /// `d` in the cart-centering penalty `|x| / d`.
    pub distance_normalization: f32,
    /// Physics ticks advanced per sampled action.
    pub frames_per_step: usize,
    pub steps_per_episode: usize,
    /// Rollouts per policy-gradient update.
    pub group_size: usize,
    pub sampling: SamplingMode,
    pub hidden_units: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            balance_threshold: 0.9 * PI,
            distance_normalization: 10.0,
            frames_per_step: 6,
            steps_per_episode: 100,
            group_size: 64,
            sampling: SamplingMode::PerStep,
            hidden_units: 32,
        }
    }
}

impl TrainerConfig {
    /// Rejects settings that would turn every reward into NaN or stall the
    /// episode loop.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), TrainError> {
        if !(self.distance_normalization.is_finite() && self.distance_normalization > 0.0) {
            return Err(TrainError::InvalidConfig(
                "distance_normalization must be positive and finite",
            ));
        }
        if self.frames_per_step == 0 {
            return Err(TrainError::InvalidConfig("frames_per_step must be at least one"));
        }
        Ok(())
    }

    #[must_use]
    pub fn frames_per_episode(&self) -> usize {
        self.frames_per_step * self.steps_per_episode
    }
}

/// Reward regime of the current episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RewardPhase {
    #[default]
    BeforeThreshold,
    /// Entered the first time `|theta|` exceeds the threshold; never left
    /// until the reward is reset.
    AfterThreshold,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeStep {
    pub observation: Observation,
    pub actions: ActionPair,
    pub log_probs: [f32; ACTION_SIZE],
    pub reward: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Episode {
    steps: Vec<EpisodeStep>,
    cumulative_reward: f32,
    phase: RewardPhase,
}

/// Archived view of a finished episode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub total_reward: f32,
    pub length: usize,
    pub threshold_passed: bool,
}

impl Episode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, step: EpisodeStep) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn steps(&self) -> &[EpisodeStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn cumulative_reward(&self) -> f32 {
        self.cumulative_reward
    }

    #[must_use]
    pub fn phase(&self) -> RewardPhase {
        self.phase
    }

    #[must_use]
    pub fn threshold_passed(&self) -> bool {
        self.phase == RewardPhase::AfterThreshold
    }

    #[must_use]
    pub fn summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            total_reward: self.cumulative_reward,
            length: self.steps.len(),
            threshold_passed: self.threshold_passed(),
        }
    }
}

/// Result of one group of rollouts, ready for an optimizer.
#[derive(Clone, Debug)]
pub struct GroupUpdate {
    pub returns: Vec<f32>,
    pub advantages: Vec<f32>,
    /// `-sum_i A_i * sum_t ln pi(a_t | s_t)` over every step of every rollout.
    pub objective: f32,
    /// Gradient of `objective`, laid out like [`PolicyAgent::params`].
    pub gradients: Vec<Tensor>,
    /// Rollouts that crossed the balance threshold at least once.
    pub balanced: usize,
}

impl GroupUpdate {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_return(&self) -> f32 {
        if self.returns.is_empty() {
            return 0.0;
        }
        self.returns.iter().sum::<f32>() / self.returns.len() as f32
    }
}

pub struct EpisodeTrainer {
    config: TrainerConfig,
    episode: Episode,
    episodes_run: u64,
}

impl EpisodeTrainer {
    #[must_use]
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            episode: Episode::new(),
            episodes_run: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// The episode currently being recorded.
    #[must_use]
    pub fn episode(&self) -> &Episode {
        &self.episode
    }

    #[must_use]
    pub fn episodes_run(&self) -> u64 {
        self.episodes_run
    }

    /// Shaped reward for one tick; also advances the hysteresis state and
    /// the cumulative reward.
    pub fn compute_reward(&mut self, angular_position: f32, cart_offset: f32) -> f32 {
        let penalty = cart_offset.abs() / self.config.distance_normalization;
        let reward = if angular_position.abs() > self.config.balance_threshold {
            self.episode.phase = RewardPhase::AfterThreshold;
            1.0 - penalty
        } else if self.episode.phase == RewardPhase::AfterThreshold {
            -penalty
        } else {
            -1.0 - penalty
        };
        self.episode.cumulative_reward += reward;
        reward
    }

    /// Reward for the simulator's current state, with the cart offset
    /// normalized by the groove half width.
    pub fn reward_for(&mut self, sim: &CartPendulum) -> f32 {
        let offset = sim.cart_position() / sim.config().groove_half_width;
        self.compute_reward(sim.bob_angular_position(), offset)
    }

    /// Starts a fresh episode: clears the cumulative reward, the threshold
    /// flag and any recorded steps.
    pub fn reset_reward(&mut self) {
        self.episode = Episode::new();
    }

    /// Runs one full rollout on `sim` with the current policy.
    ///
    /// The simulator is reset first. Returns the finished episode; the
    /// trainer starts a fresh one afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidConfig`] for unusable trainer settings
    /// and propagates simulator failures.
    pub fn run_episode(
        &mut self,
        sim: &mut CartPendulum,
        agent: &PolicyAgent,
        rng: &mut fastrand::Rng,
    ) -> Result<Episode, TrainError> {
        self.config.validate()?;
        sim.reset();
        self.reset_reward();
        let push = sim.config().push_force;
        let dt = CartPendulumConfig::dt();

        for _ in 0..self.config.steps_per_episode {
            match self.config.sampling {
                SamplingMode::PerStep => {
                    let observation = sim.observe()?;
                    let sampled = agent.sample_action(&observation, rng);
                    let mut reward = 0.0;
                    for _ in 0..self.config.frames_per_step {
                        apply_action(sim, sampled.actions, push);
                        sim.step(dt)?;
                        reward += self.reward_for(sim);
                    }
                    self.record(observation, sampled, reward);
                }
                SamplingMode::PerTick => {
                    for _ in 0..self.config.frames_per_step {
                        let observation = sim.observe()?;
                        let sampled = agent.sample_action(&observation, rng);
                        apply_action(sim, sampled.actions, push);
                        sim.step(dt)?;
                        let reward = self.reward_for(sim);
                        self.record(observation, sampled, reward);
                    }
                }
            }
        }

        self.episodes_run += 1;
        let episode = std::mem::take(&mut self.episode);
        let summary = episode.summary();
        tracing::debug!(
            episode = self.episodes_run,
            total_reward = summary.total_reward,
            steps = summary.length,
            threshold_passed = summary.threshold_passed,
            "episode finished"
        );
        Ok(episode)
    }

    /// Runs `group_size` rollouts from `template` and builds the update.
    ///
    /// Each rollout owns a clone of the template simulator; all share the
    /// agent's parameters read-only.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::EmptyGroup`] for a zero group size and
    /// propagates simulator failures.
    pub fn collect_group(
        &mut self,
        template: &CartPendulum,
        agent: &PolicyAgent,
        rng: &mut fastrand::Rng,
    ) -> Result<GroupUpdate, TrainError> {
        if self.config.group_size == 0 {
            return Err(TrainError::EmptyGroup);
        }
        let mut episodes = Vec::with_capacity(self.config.group_size);
        for _ in 0..self.config.group_size {
            let mut sim = template.clone();
            episodes.push(self.run_episode(&mut sim, agent, rng)?);
        }
        let update = build_update(&episodes, agent);
        tracing::info!(
            group_size = episodes.len(),
            mean_return = update.mean_return(),
            balanced = update.balanced,
            objective = update.objective,
            "group collected"
        );
        Ok(update)
    }

    fn record(&mut self, observation: Observation, sampled: SampledAction, reward: f32) {
        self.episode.add_step(EpisodeStep {
            observation,
            actions: sampled.actions,
            log_probs: sampled.log_probs,
            reward,
        });
    }
}

/// Applies the held buttons for one tick. Pressing both pushes both ways.
pub fn apply_action(sim: &mut CartPendulum, actions: ActionPair, push_force: f32) {
    if actions.left {
        sim.apply_horizontal_force(-push_force);
    }
    if actions.right {
        sim.apply_horizontal_force(push_force);
    }
}

/// Group-relative advantages, the policy-gradient objective and its gradient.
#[must_use]
pub fn build_update(episodes: &[Episode], agent: &PolicyAgent) -> GroupUpdate {
    let returns: Vec<f32> = episodes.iter().map(Episode::cumulative_reward).collect();
    let advantages = compute_group_advantages(&returns);
    let mut gradients = agent.zero_grads();
    let mut objective = 0.0;
    for (episode, &advantage) in episodes.iter().zip(&advantages) {
        for step in episode.steps() {
            objective -= advantage * step.log_probs.iter().sum::<f32>();
            agent.accumulate_log_prob_grad(&step.observation, step.actions, -advantage, &mut gradients);
        }
    }
    GroupUpdate {
        balanced: episodes.iter().filter(|e| e.threshold_passed()).count(),
        returns,
        advantages,
        objective,
        gradients,
    }
}
