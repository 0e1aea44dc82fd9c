use nalgebra::allocator::Allocator;
use nalgebra::{Const, DefaultAllocator, DimName, DimNameDiff, DimNameSub, OPoint, U1};

use crate::curve::rational_bspline_curve::ensure_weights;
use crate::curve::{PeriodicBSplineCurve, RationalBSplineCurve};
use crate::misc::{dehomogenize, homogenize, CurveError, FloatingPoint};

/// Closed rational curve, a periodic curve over homogeneous control points
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "PeriodicBSplineCurve<T, OPoint<T, D>>: serde::Serialize",
        deserialize = "PeriodicBSplineCurve<T, OPoint<T, D>>: serde::Deserialize<'de>"
    ))
)]
pub struct PeriodicRationalBSplineCurve<T: FloatingPoint, D: DimName>
where
    DefaultAllocator: Allocator<D>,
{
    curve: PeriodicBSplineCurve<T, OPoint<T, D>>,
}

/// 2D closed rational curve alias
pub type PeriodicRationalBSplineCurve2D<T> = PeriodicRationalBSplineCurve<T, Const<3>>;

/// 3D closed rational curve alias
pub type PeriodicRationalBSplineCurve3D<T> = PeriodicRationalBSplineCurve<T, Const<4>>;

impl<T: FloatingPoint, D: DimName> PeriodicRationalBSplineCurve<T, D>
where
    D: DimNameSub<U1>,
    DefaultAllocator: Allocator<D>,
    DefaultAllocator: Allocator<DimNameDiff<D, U1>>,
{
    /// Create a closed rational curve with uniform logical knots
    pub fn try_new(
        points: Vec<OPoint<T, DimNameDiff<D, U1>>>,
        weights: Vec<T>,
        degree: usize,
    ) -> anyhow::Result<Self> {
        ensure_weights(&weights, points.len())?;
        Ok(Self {
            curve: PeriodicBSplineCurve::try_new(homogenized(&points, &weights), degree)?,
        })
    }

    /// Create a closed rational curve from logical knots covering one period
    pub fn try_with_knots(
        points: Vec<OPoint<T, DimNameDiff<D, U1>>>,
        weights: Vec<T>,
        knots: Vec<T>,
        period: T,
        degree: usize,
    ) -> anyhow::Result<Self> {
        ensure_weights(&weights, points.len())?;
        Ok(Self {
            curve: PeriodicBSplineCurve::try_with_knots(
                homogenized(&points, &weights),
                knots,
                period,
                degree,
            )?,
        })
    }

    fn from_homogeneous_unchecked(curve: PeriodicBSplineCurve<T, OPoint<T, D>>) -> Self {
        Self { curve }
    }

    pub fn homogeneous(&self) -> &PeriodicBSplineCurve<T, OPoint<T, D>> {
        &self.curve
    }

    pub fn degree(&self) -> usize {
        self.curve.degree()
    }

    pub fn period(&self) -> T {
        self.curve.period()
    }

    pub fn logical_knots(&self) -> &[T] {
        self.curve.logical_knots()
    }

    pub fn knots_domain(&self) -> (T, T) {
        self.curve.knots_domain()
    }

    /// Evaluate the curve at any parameter, cyclically
    /// # Failures
    /// - if the weight of the curve vanishes at `u`
    pub fn try_point_at(&self, u: T) -> anyhow::Result<OPoint<T, DimNameDiff<D, U1>>> {
        dehomogenize(&self.curve.point_at(u))
            .ok_or_else(|| CurveError::ZeroHomogeneousWeight.into())
    }

    /// Weights of the logical control points
    pub fn weights(&self) -> Vec<T> {
        let last = D::dim() - 1;
        self.curve
            .logical_control_points()
            .iter()
            .map(|p| p[last])
            .collect()
    }

    /// Logical control points projected back from homogeneous coordinates
    pub fn try_dehomogenized_control_points(
        &self,
    ) -> anyhow::Result<Vec<OPoint<T, DimNameDiff<D, U1>>>> {
        self.curve
            .logical_control_points()
            .iter()
            .map(|p| dehomogenize(p).ok_or_else(|| CurveError::ZeroHomogeneousWeight.into()))
            .collect()
    }

    fn control_point(&self, index: usize) -> anyhow::Result<&OPoint<T, D>> {
        let control_points = self.curve.spline().control_points();
        control_points.get(index).ok_or_else(|| {
            CurveError::IndexOutOfBounds {
                index,
                len: control_points.len(),
            }
            .into()
        })
    }

    /// Move a control point of the extended representation, keeping its weight
    /// The wrap-around copy moves with it.
    pub fn try_set_control_point_position(
        &self,
        index: usize,
        position: OPoint<T, DimNameDiff<D, U1>>,
    ) -> anyhow::Result<Self> {
        let weight = self.control_point(index)?[D::dim() - 1];
        Ok(Self::from_homogeneous_unchecked(
            self.curve
                .try_set_control_point_position(index, homogenize(&position, weight))?,
        ))
    }

    /// Change the weight of a control point, keeping its position
    pub fn try_set_control_point_weight(&self, index: usize, weight: T) -> anyhow::Result<Self> {
        anyhow::ensure!(weight != T::zero(), CurveError::ZeroWeight { index });
        let position =
            dehomogenize(self.control_point(index)?).ok_or(CurveError::ZeroHomogeneousWeight)?;
        Ok(Self::from_homogeneous_unchecked(
            self.curve
                .try_set_control_point_position(index, homogenize(&position, weight))?,
        ))
    }

    pub fn try_insert_knot(&self, u: T, times: usize) -> anyhow::Result<Self> {
        Ok(Self::from_homogeneous_unchecked(
            self.curve.try_insert_knot(u, times)?,
        ))
    }

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

    /// Equivalent clamped rational curve over one period
    pub fn try_clamp_spline(&self) -> anyhow::Result<RationalBSplineCurve<T, D>> {
        RationalBSplineCurve::try_from_homogeneous(self.curve.try_clamp_spline()?)
    }

    pub fn try_extract(&self, from: T, to: T) -> anyhow::Result<RationalBSplineCurve<T, D>> {
        RationalBSplineCurve::try_from_homogeneous(self.curve.try_extract(from, to)?)
    }
}

fn homogenized<T: FloatingPoint, D: DimName>(
    points: &[OPoint<T, DimNameDiff<D, U1>>],
    weights: &[T],
) -> Vec<OPoint<T, D>>
where
    D: DimNameSub<U1>,
    DefaultAllocator: Allocator<D>,
    DefaultAllocator: Allocator<DimNameDiff<D, U1>>,
{
    points
        .iter()
        .zip(weights.iter())
        .map(|(p, w)| homogenize(p, *w))
        .collect()
}
