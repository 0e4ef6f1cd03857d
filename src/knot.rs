/// Knot represents a grid node of an [Interpolant](crate::Interpolant):
/// - `x` - coordinate,
/// - `y` - sample value,
/// - `slope` - fitted first derivative, present for cubic interpolants only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Knot {
    x: f64,
    y: f64,
    slope: Option<f64>,
}

impl Knot {
    /// Knot of a linear interpolant, carrying only the sample value.
    pub fn linear(x: f64, y: f64) -> Self {
        Knot { x, y, slope: None }
    }

    /// Knot of a cubic interpolant with its Hermite first derivative.
    /// # Example
    /// ```
    /// use hermite_interp::Knot;
    ///
    /// let knot = Knot::hermite(1.0, 2.0, -0.5);
    /// assert_eq!(Some(-0.5), knot.get_slope());
    /// ```
    pub fn hermite(x: f64, y: f64, slope: f64) -> Self {
        Knot { x, y, slope: Some(slope) }
    }

    pub fn get_x(&self) -> f64 {
        self.x
    }

    pub fn get_y(&self) -> f64 {
        self.y
    }

    pub fn get_slope(&self) -> Option<f64> {
        self.slope
    }
}
