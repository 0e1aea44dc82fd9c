use nalgebra::{Point2, Vector2};

use crate::curve::{
    BSplineCurve2D, ComplexRationalBSplineCurve, PeriodicBSplineCurve,
    PeriodicRationalBSplineCurve2D, RationalBSplineCurve2D,
};
use crate::misc::FloatingPoint;

/// Any planar curve of the crate, dispatched by pattern matching
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveKind<T: FloatingPoint> {
    NonRational(BSplineCurve2D<T>),
    Rational(RationalBSplineCurve2D<T>),
    PeriodicNonRational(PeriodicBSplineCurve<T, Point2<T>>),
    PeriodicRational(PeriodicRationalBSplineCurve2D<T>),
    Complex(ComplexRationalBSplineCurve<T>),
}

impl<T: FloatingPoint> CurveKind<T> {
    /// Evaluate the curve
    /// Open curves check the domain, closed curves wrap the parameter.
    pub fn try_point_at(&self, u: T) -> anyhow::Result<Point2<T>> {
        match self {
            CurveKind::NonRational(c) => c.try_point_at(u),
            CurveKind::Rational(c) => c.try_point_at(u),
            CurveKind::PeriodicNonRational(c) => Ok(c.point_at(u)),
            CurveKind::PeriodicRational(c) => c.try_point_at(u),
            CurveKind::Complex(c) => c.try_point_at(u).map(|z| Point2::from(Vector2::new(z.re, z.im))),
        }
    }

    pub fn degree(&self) -> usize {
        match self {
            CurveKind::NonRational(c) => c.degree(),
            CurveKind::Rational(c) => c.degree(),
            CurveKind::PeriodicNonRational(c) => c.degree(),
            CurveKind::PeriodicRational(c) => c.degree(),
            CurveKind::Complex(c) => c.degree(),
        }
    }

    /// Knots of open curves, logical knots of closed curves
    pub fn knots(&self) -> &[T] {
        match self {
            CurveKind::NonRational(c) => c.knots().as_slice(),
            CurveKind::Rational(c) => c.knots().as_slice(),
            CurveKind::PeriodicNonRational(c) => c.logical_knots(),
            CurveKind::PeriodicRational(c) => c.logical_knots(),
            CurveKind::Complex(c) => c.knots().as_slice(),
        }
    }

    pub fn is_periodic(&self) -> bool {
        matches!(
            self,
            CurveKind::PeriodicNonRational(_) | CurveKind::PeriodicRational(_)
        )
    }

    pub fn is_rational(&self) -> bool {
        matches!(
            self,
            CurveKind::Rational(_) | CurveKind::PeriodicRational(_) | CurveKind::Complex(_)
        )
    }

    /// Parameter domain, one period for closed curves
    pub fn domain(&self) -> (T, T) {
        match self {
            CurveKind::NonRational(c) => c.knots_domain(),
            CurveKind::Rational(c) => c.knots_domain(),
            CurveKind::PeriodicNonRational(c) => c.knots_domain(),
            CurveKind::PeriodicRational(c) => c.knots_domain(),
            CurveKind::Complex(c) => c.knots_domain(),
        }
    }

    pub fn try_insert_knot(&self, u: T, times: usize) -> anyhow::Result<Self> {
        Ok(match self {
            CurveKind::NonRational(c) => CurveKind::NonRational(c.try_insert_knot(u, times)?),
            CurveKind::Rational(c) => CurveKind::Rational(c.try_insert_knot(u, times)?),
            CurveKind::PeriodicNonRational(c) => {
                CurveKind::PeriodicNonRational(c.try_insert_knot(u, times)?)
            }
            CurveKind::PeriodicRational(c) => {
                CurveKind::PeriodicRational(c.try_insert_knot(u, times)?)
            }
            CurveKind::Complex(c) => CurveKind::Complex(c.try_insert_knot(u, times)?),
        })
    }

    /// Try to remove the knot at `index` of `knots()`
    pub fn remove_knot(&self, index: usize, tolerance: Option<T>) -> Option<Self> {
        match self {
            CurveKind::NonRational(c) => c.remove_knot(index, tolerance).map(CurveKind::NonRational),
            CurveKind::Rational(c) => c.remove_knot(index, tolerance).map(CurveKind::Rational),
            CurveKind::PeriodicNonRational(c) => c
                .remove_knot(index, tolerance)
                .map(CurveKind::PeriodicNonRational),
            CurveKind::PeriodicRational(c) => c
                .remove_knot(index, tolerance)
                .map(CurveKind::PeriodicRational),
            CurveKind::Complex(c) => c.remove_knot(index, tolerance).map(CurveKind::Complex),
        }
    }

    pub fn try_elevate_degree(&self) -> anyhow::Result<Self> {
        Ok(match self {
            CurveKind::NonRational(c) => CurveKind::NonRational(c.try_elevate_degree()?),
            CurveKind::Rational(c) => CurveKind::Rational(c.try_elevate_degree()?),
            CurveKind::PeriodicNonRational(c) => {
                CurveKind::PeriodicNonRational(c.try_elevate_degree()?)
            }
            CurveKind::PeriodicRational(c) => CurveKind::PeriodicRational(c.try_elevate_degree()?),
            CurveKind::Complex(c) => CurveKind::Complex(c.try_elevate_degree()?),
        })
    }
}

impl<T: FloatingPoint> From<BSplineCurve2D<T>> for CurveKind<T> {
    fn from(value: BSplineCurve2D<T>) -> Self {
        CurveKind::NonRational(value)
    }
}

impl<T: FloatingPoint> From<RationalBSplineCurve2D<T>> for CurveKind<T> {
    fn from(value: RationalBSplineCurve2D<T>) -> Self {
        CurveKind::Rational(value)
    }
}

impl<T: FloatingPoint> From<PeriodicBSplineCurve<T, Point2<T>>> for CurveKind<T> {
    fn from(value: PeriodicBSplineCurve<T, Point2<T>>) -> Self {
        CurveKind::PeriodicNonRational(value)
    }
}

impl<T: FloatingPoint> From<PeriodicRationalBSplineCurve2D<T>> for CurveKind<T> {
    fn from(value: PeriodicRationalBSplineCurve2D<T>) -> Self {
        CurveKind::PeriodicRational(value)
    }
}

impl<T: FloatingPoint> From<ComplexRationalBSplineCurve<T>> for CurveKind<T> {
    fn from(value: ComplexRationalBSplineCurve<T>) -> Self {
        CurveKind::Complex(value)
    }
}
