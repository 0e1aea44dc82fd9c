use nalgebra::{Complex, Point2, Rotation2, Vector2};

use crate::misc::FloatingPoint;

/// Rotation about the origin in the plane
pub trait Rotate<T> {
    /// Rotate counter-clockwise by `angle` radians
    fn rotated(&self, angle: T) -> Self;
}

impl<T: FloatingPoint> Rotate<T> for Point2<T> {
    fn rotated(&self, angle: T) -> Self {
        Rotation2::new(angle) * self
    }
}

impl<T: FloatingPoint> Rotate<T> for Vector2<T> {
    fn rotated(&self, angle: T) -> Self {
        Rotation2::new(angle) * self
    }
}

impl<T: FloatingPoint> Rotate<T> for Complex<T> {
    fn rotated(&self, angle: T) -> Self {
        *self * Complex::new(angle.cos(), angle.sin())
    }
}
