use nalgebra::{
    allocator::Allocator, Complex, Const, DefaultAllocator, DimName, DimNameDiff, DimNameSub,
    OPoint, OVector, U1,
};

use crate::misc::{ControlPoint, FloatingPoint};

/// Lift a point into homogeneous coordinates `(x * w, y * w, ..., w)`
pub fn homogenize<T: FloatingPoint, D: DimName>(
    point: &OPoint<T, DimNameDiff<D, U1>>,
    weight: T,
) -> OPoint<T, D>
where
    D: DimNameSub<U1>,
    DefaultAllocator: Allocator<D>,
    DefaultAllocator: Allocator<DimNameDiff<D, U1>>,
{
    let last = D::dim() - 1;
    let mut coords = OVector::<T, D>::zeros();
    for i in 0..last {
        coords[i] = point[i] * weight;
    }
    coords[last] = weight;
    OPoint::from(coords)
}

/// Project a homogeneous point back by dividing with its weight
/// `None` if the weight is zero
pub fn dehomogenize<T: FloatingPoint, D: DimName>(
    point: &OPoint<T, D>,
) -> Option<OPoint<T, DimNameDiff<D, U1>>>
where
    D: DimNameSub<U1>,
    DefaultAllocator: Allocator<D>,
    DefaultAllocator: Allocator<DimNameDiff<D, U1>>,
{
    let v = &point.coords;
    let w = v[D::dim() - 1];
    if w != T::zero() {
        let coords =
            v.generic_view((0, 0), (<D as DimNameSub<U1>>::Output::name(), Const::<1>)) / w;
        Some(OPoint { coords })
    } else {
        None
    }
}

/// Complex homogeneous coordinate `(c0, c1)` representing the point `c0 / c1`.
///
/// Möbius transformations act linearly on this pair, which keeps a complex rational curve
/// closed under them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomogeneousComplex<T> {
    pub numerator: Complex<T>,
    pub denominator: Complex<T>,
}

impl<T: FloatingPoint> HomogeneousComplex<T> {
    pub fn new(numerator: Complex<T>, denominator: Complex<T>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Weighted point `(p * w, w)`
    pub fn weighted(point: Complex<T>, weight: Complex<T>) -> Self {
        Self::new(point * weight, weight)
    }

    /// The represented point, `None` if the denominator vanishes
    pub fn project(&self) -> Option<Complex<T>> {
        if self.denominator.norm_sqr() > T::zero() {
            Some(self.numerator / self.denominator)
        } else {
            None
        }
    }
}

impl<T: FloatingPoint> ControlPoint<T> for HomogeneousComplex<T> {
    fn origin() -> Self {
        let zero = Complex::new(T::zero(), T::zero());
        Self::new(zero, zero)
    }

    fn sum(&self, other: &Self) -> Self {
        Self::new(
            self.numerator + other.numerator,
            self.denominator + other.denominator,
        )
    }

    fn difference(&self, other: &Self) -> Self {
        Self::new(
            self.numerator - other.numerator,
            self.denominator - other.denominator,
        )
    }

    fn scaled(&self, factor: T) -> Self {
        Self::new(self.numerator * factor, self.denominator * factor)
    }

    fn dot(&self, other: &Self) -> T {
        self.numerator.dot(&other.numerator) + self.denominator.dot(&other.denominator)
    }
}
