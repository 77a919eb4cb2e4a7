//! Geometry primitives shared across the pipeline

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 3D point in internal (millimeter-scaled) workspace coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position (depth)
    pub z: f64,
}

impl Point3 {
    /// Create a new point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Project onto the XY plane
    pub fn xy(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Planar (XY) distance to another point
    pub fn distance_xy(&self, other: &Point3) -> f64 {
        self.xy().distance(other.xy())
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X:{:.3} Y:{:.3} Z:{:.3}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xy_projection() {
        let p = Point3::new(3.0, 4.0, -2.0);
        assert_eq!(p.xy(), DVec2::new(3.0, 4.0));
    }

    #[test]
    fn test_planar_distance() {
        let a = Point3::new(0.0, 0.0, 5.0);
        let b = Point3::new(3.0, 4.0, -5.0);
        assert_eq!(a.distance_xy(&b), 5.0);
    }
}
