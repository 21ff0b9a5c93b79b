/// A point on the CIE 1931 chromaticity diagram.
#[derive(Clone, PartialEq, Debug)]
pub struct CartesianCoordinate {
    x: f64,
    y: f64,
}

impl CartesianCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        CartesianCoordinate { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}
