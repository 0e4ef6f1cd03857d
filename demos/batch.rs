extern crate hermite_interp;

use hermite_interp::{Interpolant, InterpolantKind, NewtonConfig};
use ndarray::Array2;

fn main() {

    let nodes: Vec<f64> = (0..=8).map(|i| i as f64 * 0.75).collect();
    let samples: Vec<f64> = nodes.iter().map(|x| x.sin()).collect();

    let config = NewtonConfig::new().with_rel_tolerance(1e-12);
    let interpolant = Interpolant::with_config(&nodes, &samples, InterpolantKind::Cubic, &config).unwrap();

    println!("fitted derivatives: {:?}", interpolant.derivatives().unwrap());

    let query = Array2::from_shape_fn((4, 6), |(i, j)| (i * 6 + j) as f64 * 0.25);
    let values = interpolant.evaluate(&query);
    let slopes = interpolant.derivative(&query);

    println!("x;y;dy;sin;cos");
    for ((x, y), dy) in query.iter().zip(values.iter()).zip(slopes.iter()) {
        println!("{:.2};{:.4};{:.4};{:.4};{:.4}", x, y, dy, x.sin(), x.cos());
    }
}
