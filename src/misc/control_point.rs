use std::fmt::Debug;

use nalgebra::{allocator::Allocator, Complex, DefaultAllocator, DimName, OPoint};

use crate::misc::{CurveError, FloatingPoint};

/// Coordinate type a curve is defined over.
///
/// Curves only need a vector space structure from their control points:
/// affine blends for knot insertion, scaling for averaging and a metric for the
/// tolerance checks of knot removal.
pub trait ControlPoint<T: FloatingPoint>: Clone + Debug + PartialEq {
    /// The additive identity
    fn origin() -> Self;

    fn sum(&self, other: &Self) -> Self;

    fn difference(&self, other: &Self) -> Self;

    fn scaled(&self, factor: T) -> Self;

    fn dot(&self, other: &Self) -> T;

    fn norm(&self) -> T {
        self.dot(self).sqrt()
    }

    fn distance(&self, other: &Self) -> T {
        self.difference(other).norm()
    }

    /// Scale to unit length
    /// # Failures
    /// - if the vector has no length
    fn try_normalize(&self) -> anyhow::Result<Self> {
        let norm = self.norm();
        anyhow::ensure!(norm > T::default_epsilon(), CurveError::ZeroVector);
        Ok(self.scaled(T::one() / norm))
    }

    /// Affine blend `(1 - t) * self + t * other`
    fn lerp(&self, other: &Self, t: T) -> Self {
        self.scaled(T::one() - t).sum(&other.scaled(t))
    }
}

impl<T: FloatingPoint, D: DimName> ControlPoint<T> for OPoint<T, D>
where
    DefaultAllocator: Allocator<D>,
{
    fn origin() -> Self {
        OPoint::origin()
    }

    fn sum(&self, other: &Self) -> Self {
        OPoint::from(&self.coords + &other.coords)
    }

    fn difference(&self, other: &Self) -> Self {
        OPoint::from(&self.coords - &other.coords)
    }

    fn scaled(&self, factor: T) -> Self {
        OPoint::from(&self.coords * factor)
    }

    fn dot(&self, other: &Self) -> T {
        self.coords.dot(&other.coords)
    }
}

impl<T: FloatingPoint> ControlPoint<T> for Complex<T> {
    fn origin() -> Self {
        Complex::new(T::zero(), T::zero())
    }

    fn sum(&self, other: &Self) -> Self {
        *self + *other
    }

    fn difference(&self, other: &Self) -> Self {
        *self - *other
    }

    fn scaled(&self, factor: T) -> Self {
        *self * factor
    }

    fn dot(&self, other: &Self) -> T {
        self.re * other.re + self.im * other.im
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Complex, Point1, Point2, Point3};

    use super::ControlPoint;
    use crate::misc::CurveError;

    #[test]
    fn point_algebra() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(4.0, 6.0);
        assert_eq!(a.sum(&b), Point2::new(5.0, 8.0));
        assert_eq!(b.difference(&a), Point2::new(3.0, 4.0));
        assert_eq!(a.scaled(2.0), Point2::new(2.0, 4.0));
        assert_eq!(a.dot(&b), 16.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_eq!(a.lerp(&b, 0.5), Point2::new(2.5, 4.0));

        let unit = Point3::new(0.0, 3.0, 4.0).try_normalize().unwrap();
        assert_relative_eq!(unit.norm(), 1.0);

        let scalar = Point1::new(-2.0);
        assert_relative_eq!(scalar.norm(), 2.0);
    }

    #[test]
    fn complex_algebra() {
        let a = Complex::new(3.0, 4.0);
        assert_relative_eq!(a.norm(), 5.0);
        assert_eq!(a.scaled(0.5), Complex::new(1.5, 2.0));
        assert_eq!(a.difference(&a), Complex::origin());
    }

    #[test]
    fn normalize_zero_vector() {
        let err = Point2::<f64>::origin().try_normalize().unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::ZeroVector)
        );
    }
}
