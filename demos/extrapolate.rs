extern crate hermite_interp;

use hermite_interp::{Interpolant, InterpolantKind};
use ndarray::Array1;

fn main() {

    let nodes = [1.0, 2.0, 3.0, 4.0, 5.0];
    let samples = [1.0, 0.0, -2.0, 1.0, 1.0];

    let linear = Interpolant::new(&nodes, &samples, InterpolantKind::Linear).unwrap();
    let cubic = Interpolant::new(&nodes, &samples, InterpolantKind::Cubic).unwrap();

    // queries outside [1, 5] use the first and last intervals
    let x = Array1::linspace(0.0, 6.0, 61);
    let y_linear = linear.evaluate(&x);
    let y_cubic = cubic.evaluate(&x);

    println!("x;linear;cubic");
    for i in 0..x.len() {
        println!("{:.2};{:.2};{:.2}", x[i], y_linear[i], y_cubic[i]);
    }
}
