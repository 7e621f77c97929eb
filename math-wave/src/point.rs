//! Points in 3D space

use serde::{Deserialize, Serialize};

/// Point in space (metres)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// x-coordinate
    pub x: f64,
    /// y-coordinate
    pub y: f64,
    /// z-coordinate
    pub z: f64,
}

impl Point {
    /// Create a point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Point on the x axis, as used for thin-wire sources along x
    pub fn on_x_axis(x: f64) -> Self {
        Self::new(x, 0.0, 0.0)
    }

    /// Coordinates as `[x, y, z]`
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Build from `[x, y, z]`
    pub fn from_array(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }

    /// Distance from origin
    pub fn radius(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::origin()
    }
}

impl From<[f64; 3]> for Point {
    fn from(p: [f64; 3]) -> Self {
        Self::from_array(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(1.0, 0.0, 0.0);
        let p2 = Point::new(4.0, 4.0, 0.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_array_conversion() {
        let p = Point::from([1.0, -2.0, 0.5]);
        assert_eq!(p.to_array(), [1.0, -2.0, 0.5]);
        assert_eq!(Point::on_x_axis(3.0), Point::new(3.0, 0.0, 0.0));
        assert!((Point::new(0.0, 3.0, 4.0).radius() - 5.0).abs() < 1e-12);
    }
}
