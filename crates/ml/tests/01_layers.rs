use approx::assert_relative_eq;
use ml::{Dense, Layer, Relu, Sequential, Tensor};

#[test]
fn dense_forward_exact() {
    let w = vec![
        1.0, 0.5, -0.5, -1.0, // first row
        0.2, 0.3, 0.1, 0.9, // second row
    ];
    let b = vec![0.1, -0.2];
    let layer = Dense::new(w, b.clone(), 4, 2);
    let x = Tensor::from_vec(vec![4], vec![1.0, 2.0, 3.0, 4.0]);
    let y = layer.forward(&x);

    assert_relative_eq!(y.data[0], 1.0 + 1.0 - 1.5 - 4.0 + b[0], epsilon = 1e-6);
    assert_relative_eq!(y.data[1], 0.2 + 0.6 + 0.3 + 3.6 + b[1], epsilon = 1e-6);
}

#[test]
fn xavier_weights_stay_inside_limit() {
    let mut rng = fastrand::Rng::with_seed(3);
    let layer = Dense::xavier(4, 32, &mut rng);
    let limit = (6.0f32 / 36.0).sqrt();
    assert!(layer.w.data.iter().all(|w| w.abs() <= limit));
    assert!(layer.b.data.iter().all(|&b| b == 0.0));
    assert_eq!(layer.w.shape, vec![32, 4]);
}

#[test]
fn sequential_backward_matches_finite_difference() {
    let mut rng = fastrand::Rng::with_seed(11);
    let mut net = Sequential::new();
    net.push(Dense::xavier(3, 5, &mut rng));
    net.push(Relu);
    net.push(Dense::xavier(5, 1, &mut rng));
    let x = Tensor::from_vec(vec![3], vec![0.3, -0.7, 0.9]);

    let (_, activations) = net.forward(&x);
    let (_, grads) = net.backward(&activations, &Tensor::from_vec(vec![1], vec![1.0]));

    let eps = 1e-3;
    for (p_idx, grad) in grads.iter().enumerate() {
        for i in 0..grad.len() {
            net.params_mut()[p_idx].data[i] += eps;
            let plus = net.forward(&x).0.data[0];
            net.params_mut()[p_idx].data[i] -= 2.0 * eps;
            let minus = net.forward(&x).0.data[0];
            net.params_mut()[p_idx].data[i] += eps;
            let numeric = (plus - minus) / (2.0 * eps);
            assert_relative_eq!(grad.data[i], numeric, epsilon = 1e-2);
        }
    }
}
