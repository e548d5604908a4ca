mod common;

use approx::assert_relative_eq;
use ml::{sample_from_probabilities, ActionPair};
use physics::Observation;

#[test]
fn saturated_probabilities_are_deterministic() {
    let mut rng = fastrand::Rng::with_seed(42);
    let samples = sample_from_probabilities([0.0, 1.0], 200, &mut rng);
    assert_eq!(samples.len(), 200);
    for s in &samples {
        assert_eq!(s.actions, ActionPair::new(false, true));
        assert_relative_eq!(s.log_probs[1], 0.0, epsilon = 1e-6);
        // left "not pressed" is certain too: ln(1 - 1e-7)
        assert_relative_eq!(s.log_probs[0], 0.0, epsilon = 1e-6);
        assert!(s.log_probs[0] <= 0.0);
    }
    // the outcome that never happens keeps a large but finite penalty
    let never = ml::bernoulli_log_prob(0.0, true);
    assert_relative_eq!(never, 1e-7f32.ln(), epsilon = 1e-3);
}

#[test]
fn saturated_probabilities_give_finite_log_prob_for_the_impossible_outcome() {
    let mut rng = fastrand::Rng::with_seed(1);
    let samples = sample_from_probabilities([1.0, 0.0], 10, &mut rng);
    let never = ml::bernoulli_log_prob(0.0, true);
    assert!(never.is_finite());
    assert!(never < -15.0);
    assert!(samples.iter().all(|s| s.actions == ActionPair::new(true, false)));
}

#[test]
fn agent_with_saturated_logits_always_pushes_right() {
    let agent = common::constant_agent(-100.0, 100.0);
    let obs = Observation {
        angle: 2.0,
        angular_velocity: -1.0,
        cart_position: 50.0,
        cart_velocity: 10.0,
    };
    let probs = agent.forward(&obs);
    assert_relative_eq!(probs[0], 0.0, epsilon = 1e-6);
    assert_relative_eq!(probs[1], 1.0, epsilon = 1e-6);

    let mut rng = fastrand::Rng::with_seed(5);
    for s in agent.sample_actions(&obs, 50, &mut rng) {
        assert_eq!(s.actions, ActionPair::new(false, true));
        assert!(s.total_log_prob().is_finite());
    }
}

#[test]
fn even_odds_sample_every_combination() {
    let agent = common::constant_agent(0.0, 0.0);
    let mut rng = fastrand::Rng::with_seed(9);
    let samples = agent.sample_actions(&Observation::default(), 400, &mut rng);
    let mut seen = [false; 4];
    for s in &samples {
        seen[usize::from(s.actions.left) * 2 + usize::from(s.actions.right)] = true;
        assert_relative_eq!(s.total_log_prob(), 2.0 * 0.5f32.ln(), epsilon = 1e-5);
    }
    assert_eq!(seen, [true; 4]);
}

#[test]
fn log_prob_agrees_with_sampled_log_probs() {
    let agent = common::seeded_agent(21);
    let obs = Observation {
        angle: -2.8,
        angular_velocity: 0.4,
        cart_position: -20.0,
        cart_velocity: 5.0,
    };
    let mut rng = fastrand::Rng::with_seed(4);
    let s = agent.sample_action(&obs, &mut rng);
    assert_relative_eq!(agent.log_prob(&obs, s.actions), s.total_log_prob(), epsilon = 1e-5);
}
