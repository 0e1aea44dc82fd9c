use nalgebra::allocator::Allocator;
use nalgebra::{Const, DefaultAllocator, DimName, DimNameDiff, DimNameSub, OPoint, U1};

use crate::curve::BSplineCurve;
use crate::knot::KnotVector;
use crate::misc::{dehomogenize, homogenize, CurveError, FloatingPoint, Reversible};

/// Rational B-spline (NURBS) curve representation
/// The curve is a non-rational curve over homogeneous control points `(x * w, y * w, ..., w)`,
/// projected back by the last coordinate on evaluation.
/// By generics, it can be used for 2D or 3D curves with f32 or f64 scalar types
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "BSplineCurve<T, OPoint<T, D>>: serde::Serialize",
        deserialize = "BSplineCurve<T, OPoint<T, D>>: serde::Deserialize<'de>"
    ))
)]
pub struct RationalBSplineCurve<T: FloatingPoint, D: DimName>
where
    DefaultAllocator: Allocator<D>,
{
    /// curve in homogeneous coordinates
    /// the last element of each control point is the `weight`
    curve: BSplineCurve<T, OPoint<T, D>>,
}

/// 2D rational curve alias
pub type RationalBSplineCurve2D<T> = RationalBSplineCurve<T, Const<3>>;

/// 3D rational curve alias
pub type RationalBSplineCurve3D<T> = RationalBSplineCurve<T, Const<4>>;

/// Weights with their positions checked to be usable in homogeneous coordinates
pub(crate) fn ensure_weights<T: FloatingPoint>(weights: &[T], points: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        weights.len() == points,
        CurveError::WeightCountMismatch {
            got: weights.len(),
            expected: points,
        }
    );
    if let Some(index) = weights.iter().position(|w| *w == T::zero()) {
        anyhow::bail!(CurveError::ZeroWeight { index });
    }
    Ok(())
}

impl<T: FloatingPoint, D: DimName> RationalBSplineCurve<T, D>
where
    D: DimNameSub<U1>,
    DefaultAllocator: Allocator<D>,
    DefaultAllocator: Allocator<DimNameDiff<D, U1>>,
{
    /// Create a new rational curve from points, their weights and a knot vector
    /// Negative weights are accepted, zero weights are not.
    ///
    /// # Failures
    /// - if the number of weights differs from the number of points
    /// - if a weight is zero
    /// - any failure of `BSplineCurve::try_new`
    ///
    /// # Example
    /// ```
    /// use knotwork::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// // quarter circle
    /// let w = std::f64::consts::FRAC_1_SQRT_2;
    /// let curve = RationalBSplineCurve2D::try_new(
    ///     2,
    ///     vec![Point2::new(1., 0.), Point2::new(1., 1.), Point2::new(0., 1.)],
    ///     vec![1., w, 1.],
    ///     vec![0., 0., 0., 1., 1., 1.],
    /// ).unwrap();
    /// let p = curve.try_point_at(0.3).unwrap();
    /// assert_relative_eq!(p.coords.norm(), 1., epsilon = 1e-12);
    /// ```
    pub fn try_new(
        degree: usize,
        points: Vec<OPoint<T, DimNameDiff<D, U1>>>,
        weights: Vec<T>,
        knots: Vec<T>,
    ) -> anyhow::Result<Self> {
        ensure_weights(&weights, points.len())?;
        let control_points = points
            .iter()
            .zip(weights.iter())
            .map(|(p, w)| homogenize(p, *w))
            .collect();
        Ok(Self {
            curve: BSplineCurve::try_new(degree, control_points, knots)?,
        })
    }

    /// Create a rational curve from homogeneous control points
    /// # Failures
    /// - if a control point has zero weight
    pub fn try_from_homogeneous(curve: BSplineCurve<T, OPoint<T, D>>) -> anyhow::Result<Self> {
        let last = D::dim() - 1;
        if let Some(index) = curve
            .control_points()
            .iter()
            .position(|p| p[last] == T::zero())
        {
            anyhow::bail!(CurveError::ZeroWeight { index });
        }
        Ok(Self { curve })
    }

    fn from_homogeneous_unchecked(curve: BSplineCurve<T, OPoint<T, D>>) -> Self {
        Self { curve }
    }

    /// The underlying curve in homogeneous coordinates
    pub fn homogeneous(&self) -> &BSplineCurve<T, OPoint<T, D>> {
        &self.curve
    }

    pub fn degree(&self) -> usize {
        self.curve.degree()
    }

    pub fn knots(&self) -> &KnotVector<T> {
        self.curve.knots()
    }

    pub fn knots_domain(&self) -> (T, T) {
        self.curve.knots_domain()
    }

    /// Evaluate the curve at a parameter inside its domain
    /// # Failures
    /// - if `u` is outside of the domain
    /// - if the weight of the curve vanishes at `u`
    pub fn try_point_at(&self, u: T) -> anyhow::Result<OPoint<T, DimNameDiff<D, U1>>> {
        let p = self.curve.try_point_at(u)?;
        dehomogenize(&p).ok_or_else(|| CurveError::ZeroHomogeneousWeight.into())
    }

    pub fn weights(&self) -> Vec<T> {
        let last = D::dim() - 1;
        self.curve.control_points().iter().map(|p| p[last]).collect()
    }

    /// Control points projected back from homogeneous coordinates
    /// # Failures
    /// - if a control point has zero weight
    pub fn try_dehomogenized_control_points(
        &self,
    ) -> anyhow::Result<Vec<OPoint<T, DimNameDiff<D, U1>>>> {
        self.curve
            .control_points()
            .iter()
            .map(|p| dehomogenize(p).ok_or_else(|| CurveError::ZeroHomogeneousWeight.into()))
            .collect()
    }

    fn control_point(&self, index: usize) -> anyhow::Result<&OPoint<T, D>> {
        let control_points = self.curve.control_points();
        control_points.get(index).ok_or_else(|| {
            CurveError::IndexOutOfBounds {
                index,
                len: control_points.len(),
            }
            .into()
        })
    }

    /// Change the weight of a control point, keeping its position
    /// # Failures
    /// - if the index is out of bounds
    /// - if the weight is zero
    pub fn try_set_control_point_weight(&self, index: usize, weight: T) -> anyhow::Result<Self> {
        anyhow::ensure!(weight != T::zero(), CurveError::ZeroWeight { index });
        let position =
            dehomogenize(self.control_point(index)?).ok_or(CurveError::ZeroHomogeneousWeight)?;
        let curve = self
            .curve
            .try_with_control_point(index, homogenize(&position, weight))?;
        Ok(Self::from_homogeneous_unchecked(curve))
    }

    /// Move a control point, keeping its weight
    /// # Failures
    /// - if the index is out of bounds
    pub fn try_set_control_point_position(
        &self,
        index: usize,
        position: OPoint<T, DimNameDiff<D, U1>>,
    ) -> anyhow::Result<Self> {
        let weight = self.control_point(index)?[D::dim() - 1];
        let curve = self
            .curve
            .try_with_control_point(index, homogenize(&position, weight))?;
        Ok(Self::from_homogeneous_unchecked(curve))
    }

    pub fn try_insert_knot(&self, u: T, times: usize) -> anyhow::Result<Self> {
        Ok(Self::from_homogeneous_unchecked(
            self.curve.try_insert_knot(u, times)?,
        ))
    }

    /// Try to remove one occurrence of the knot at `index`
    /// The tolerance is measured between homogeneous control points.
    pub fn remove_knot(&self, index: usize, tolerance: Option<T>) -> Option<Self> {
        self.curve
            .remove_knot(index, tolerance)
            .map(Self::from_homogeneous_unchecked)
    }

    pub fn try_elevate_degree(&self) -> anyhow::Result<Self> {
        Ok(Self::from_homogeneous_unchecked(
            self.curve.try_elevate_degree()?,
        ))
    }

    pub fn try_clamp_at(&self, u: T) -> anyhow::Result<Self> {
        Ok(Self::from_homogeneous_unchecked(self.curve.try_clamp_at(u)?))
    }

    pub fn try_extract(&self, from: T, to: T) -> anyhow::Result<Self> {
        Ok(Self::from_homogeneous_unchecked(
            self.curve.try_extract(from, to)?,
        ))
    }
}

impl<T: FloatingPoint, D: DimName> Reversible for RationalBSplineCurve<T, D>
where
    DefaultAllocator: Allocator<D>,
{
    fn reversed(&self) -> Self {
        Self {
            curve: self.curve.reversed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use approx::assert_relative_eq;
    use nalgebra::{Point2, Point3};

    use super::{RationalBSplineCurve2D, RationalBSplineCurve3D};
    use crate::curve::BSplineCurve;
    use crate::misc::CurveError;

    fn half_circle() -> RationalBSplineCurve2D<f64> {
        RationalBSplineCurve2D::try_new(
            2,
            vec![
                Point2::new(1., 0.),
                Point2::new(1., 1.),
                Point2::new(0., 1.),
                Point2::new(-1., 1.),
                Point2::new(-1., 0.),
            ],
            vec![1., FRAC_1_SQRT_2, 1., FRAC_1_SQRT_2, 1.],
            vec![0., 0., 0., 1., 1., 2., 2., 2.],
        )
        .unwrap()
    }

    fn assert_on_unit_circle(curve: &RationalBSplineCurve2D<f64>) {
        let (start, end) = curve.knots_domain();
        for i in 0..=40 {
            let u = start + (end - start) * i as f64 / 40.;
            let p = curve.try_point_at(u).unwrap();
            assert_relative_eq!(p.coords.norm(), 1., epsilon = 1e-9);
        }
    }

    #[test]
    fn exact_circle() {
        let curve = half_circle();
        assert_on_unit_circle(&curve);
        assert_relative_eq!(curve.try_point_at(1.).unwrap(), Point2::new(0., 1.), epsilon = 1e-12);
        assert_relative_eq!(curve.try_point_at(2.).unwrap(), Point2::new(-1., 0.), epsilon = 1e-12);
    }

    #[test]
    fn unit_weights_match_non_rational_curve() {
        let points = vec![
            Point3::new(0., 0., 0.),
            Point3::new(1., 2., 0.),
            Point3::new(3., 2., 1.),
            Point3::new(4., 0., 2.),
        ];
        let knots = vec![0., 0., 0., 0.4, 1., 1., 1.];
        let rational =
            RationalBSplineCurve3D::try_new(2, points.clone(), vec![1.; 4], knots.clone()).unwrap();
        let plain = BSplineCurve::try_new(2, points, knots).unwrap();
        for i in 0..=20 {
            let u = i as f64 / 20.;
            assert_relative_eq!(
                rational.try_point_at(u).unwrap(),
                plain.try_point_at(u).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn weight_validation() {
        let points = vec![Point2::new(0., 0.), Point2::new(1., 1.)];
        let knots = vec![0., 0., 1., 1.];
        let err = RationalBSplineCurve2D::try_new(1, points.clone(), vec![1.], knots.clone())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::WeightCountMismatch {
                got: 1,
                expected: 2
            })
        );
        let err = RationalBSplineCurve2D::try_new(1, points.clone(), vec![1., 0.], knots.clone())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::ZeroWeight { index: 1 })
        );
        assert!(RationalBSplineCurve2D::try_new(1, points, vec![1., -2.], knots).is_ok());
    }

    #[test]
    fn vanishing_weight() {
        let curve = RationalBSplineCurve2D::try_new(
            1,
            vec![Point2::new(0., 0.), Point2::new(1., 1.)],
            vec![1., -1.],
            vec![0., 0., 1., 1.],
        )
        .unwrap();
        let err = curve.try_point_at(0.5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::ZeroHomogeneousWeight)
        );
    }

    #[test]
    fn weight_edit_keeps_position() {
        let curve = half_circle();
        let edited = curve.try_set_control_point_weight(1, 3.).unwrap();
        assert_eq!(edited.weights()[1], 3.);
        let points = edited.try_dehomogenized_control_points().unwrap();
        assert_relative_eq!(points[1], Point2::new(1., 1.), epsilon = 1e-12);
        // pulled towards the control point
        let before = curve.try_point_at(0.5).unwrap();
        let after = edited.try_point_at(0.5).unwrap();
        assert!((after - Point2::new(1., 1.)).norm() < (before - Point2::new(1., 1.)).norm());

        assert!(curve.try_set_control_point_weight(1, 0.).is_err());
        assert!(curve.try_set_control_point_weight(5, 1.).is_err());
    }

    #[test]
    fn position_edit_keeps_weight() {
        let curve = half_circle();
        let edited = curve
            .try_set_control_point_position(3, Point2::new(-2., 2.))
            .unwrap();
        assert_relative_eq!(edited.weights()[3], FRAC_1_SQRT_2);
        assert_relative_eq!(
            edited.try_dehomogenized_control_points().unwrap()[3],
            Point2::new(-2., 2.),
            epsilon = 1e-12
        );
    }

    #[test]
    fn structural_operations_keep_the_circle() {
        let curve = half_circle();
        let refined = curve.try_insert_knot(0.5, 1).unwrap();
        assert_eq!(refined.weights().len(), 6);
        assert_on_unit_circle(&refined);

        let index = refined.knots().iter().position(|t| *t == 0.5).unwrap();
        let restored = refined.remove_knot(index, Some(1e-9)).unwrap();
        assert_eq!(restored.knots(), curve.knots());

        let elevated = curve.try_elevate_degree().unwrap();
        assert_eq!(elevated.degree(), 3);
        assert_on_unit_circle(&elevated);

        let part = curve.try_extract(0.5, 1.5).unwrap();
        assert_on_unit_circle(&part);
        assert_relative_eq!(
            part.try_point_at(1.).unwrap(),
            Point2::new(0., 1.),
            epsilon = 1e-12
        );

        let clamped = curve.try_clamp_at(0.25).unwrap();
        assert_eq!(clamped.knots().multiplicity_of(0.25), 2);
        assert_on_unit_circle(&clamped);
    }
}
