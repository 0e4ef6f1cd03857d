extern crate hermite_interp;

use hermite_interp::{Interpolant, InterpolantKind};

fn main() {

    let x_min = 0.0;
    let x_max = 6.0;

    let nodes = [x_min, 1.0, 2.0, 4.0, 5.0, x_max];
    let samples = [1.0, -1.0, 0.0, 3.0, 1.0, 1.0];

    let interpolant = Interpolant::new(&nodes, &samples, InterpolantKind::Cubic).unwrap();

    let number_of_steps = 60;
    let step = (x_max - x_min) / number_of_steps as f64;

    println!("x;y;dy");
    for i in 0..=number_of_steps {
        let x = x_min + step * i as f64;
        println!("{:.2};{:.2};{:.2}", x, interpolant.evaluate_at(x), interpolant.derivative_at(x));
    }
}
