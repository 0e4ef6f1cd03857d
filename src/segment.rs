use crate::knot::Knot;

/// Interval between two adjacent knots, as located by [Interpolant::find](crate::Interpolant::find).
///
/// Formulas apply for any `x`; outside `[x0, x1]` they extrapolate the interval's curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    slopes: Option<(f64, f64)>,
}

impl Segment {
    pub(crate) fn between(left: &Knot, right: &Knot) -> Self {
        let slopes = match (left.get_slope(), right.get_slope()) {
            (Some(yp0), Some(yp1)) => Some((yp0, yp1)),
            _ => None,
        };
        Segment {
            x0: left.get_x(),
            x1: right.get_x(),
            y0: left.get_y(),
            y1: right.get_y(),
            slopes,
        }
    }

    /// Bounding node coordinates `(x0, x1)`.
    pub fn get_bounds(&self) -> (f64, f64) {
        (self.x0, self.x1)
    }

    /// Sample values `(y0, y1)` at the bounds.
    pub fn get_values(&self) -> (f64, f64) {
        (self.y0, self.y1)
    }

    /// Hermite first derivatives `(yp0, yp1)` at the bounds, cubic interpolants only.
    pub fn get_slopes(&self) -> Option<(f64, f64)> {
        self.slopes
    }

    pub fn secant_slope(&self) -> f64 {
        (self.y1 - self.y0) / (self.x1 - self.x0)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.x0) / (self.x1 - self.x0);
        let t1 = 1.0 - t;
        let mut y = t * self.y1 + t1 * self.y0;

        if let Some((yp0, yp1)) = self.slopes {
            let slope = self.secant_slope();
            y += (t - 2.0 * t.powi(2) + t.powi(3)) * (yp0 - slope) * (self.x1 - self.x0)
                + (t1 - 2.0 * t1.powi(2) + t1.powi(3)) * (yp1 - slope) * (self.x0 - self.x1);
        }
        y
    }

    pub fn derivative(&self, x: f64) -> f64 {
        let slope = self.secant_slope();

        match self.slopes {
            Some((yp0, yp1)) => {
                let t = (x - self.x0) / (self.x1 - self.x0);
                let t1 = 1.0 - t;
                slope
                    + (1.0 - 4.0 * t + 3.0 * t.powi(2)) * (yp0 - slope)
                    + (1.0 - 4.0 * t1 + 3.0 * t1.powi(2)) * (yp1 - slope)
            }
            None => slope,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn linear_blend() {
        let eps = 1e-12;
        let segment = Segment::between(&Knot::linear(1.0, 2.0), &Knot::linear(3.0, -2.0));

        assert_eq!(None, segment.get_slopes());
        assert_approx_eq!(segment.evaluate(1.0), 2.0, eps);
        assert_approx_eq!(segment.evaluate(2.0), 0.0, eps);
        assert_approx_eq!(segment.evaluate(3.0), -2.0, eps);
        assert_approx_eq!(segment.evaluate(4.0), -4.0, eps);
        assert_approx_eq!(segment.derivative(0.0), -2.0, eps);
        assert_approx_eq!(segment.derivative(2.5), -2.0, eps);
    }

    #[test]
    fn hermite_reproduces_cubic() {
        // x^3 on [1, 2] with exact end slopes
        let eps = 1e-12;
        let segment = Segment::between(&Knot::hermite(1.0, 1.0, 3.0), &Knot::hermite(2.0, 8.0, 12.0));

        assert_eq!(Some((3.0, 12.0)), segment.get_slopes());
        assert_approx_eq!(segment.secant_slope(), 7.0, eps);
        for x in [1.0, 1.25, 1.5, 1.9, 2.0, 2.5, 0.5] {
            assert_approx_eq!(segment.evaluate(x), x.powi(3), 1e-10);
            assert_approx_eq!(segment.derivative(x), 3.0 * x.powi(2), 1e-10);
        }
        assert_approx_eq!(segment.evaluate(1.5), 3.375, eps);
        assert_approx_eq!(segment.derivative(1.5), 6.75, eps);
    }

    #[test]
    fn hermite_matches_end_data() {
        let segment = Segment::between(&Knot::hermite(-1.0, 0.5, 2.0), &Knot::hermite(0.5, -1.0, -3.0));

        assert_eq!((-1.0, 0.5), segment.get_bounds());
        assert_eq!((0.5, -1.0), segment.get_values());
        assert_eq!(0.5, segment.evaluate(-1.0));
        assert_eq!(-1.0, segment.evaluate(0.5));
        assert_approx_eq!(segment.derivative(-1.0), 2.0, 1e-12);
        assert_approx_eq!(segment.derivative(0.5), -3.0, 1e-12);
    }

    #[test]
    fn mixed_knots_fall_back_to_linear() {
        let segment = Segment::between(&Knot::hermite(0.0, 0.0, 5.0), &Knot::linear(1.0, 1.0));

        assert_eq!(None, segment.get_slopes());
        assert_approx_eq!(segment.evaluate(0.5), 0.5, 1e-12);
    }
}
