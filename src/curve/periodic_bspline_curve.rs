use itertools::Itertools;

use crate::curve::BSplineCurve;
use crate::knot::KnotVector;
use crate::misc::{ControlPoint, CurveError, FloatingPoint};

/// Closed B-spline curve without clamped boundaries
///
/// The curve is stored as an ordinary (unclamped) spline whose first `degree` control points
/// are repeated at the end and whose knot vector continues the logical knots periodically on
/// both sides. Its domain is `[t0, t0 + period]` and evaluation wraps parameters cyclically.
///
/// Structural edits go through a wide copy of the curve spanning several periods: the edit is
/// applied once per period so the copies stay identical, and the middle period is folded back
/// into a periodic curve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodicBSplineCurve<T, P> {
    spline: BSplineCurve<T, P>,
    period: T,
}

impl<T: FloatingPoint, P: ControlPoint<T>> PeriodicBSplineCurve<T, P> {
    /// Create a closed curve with uniform logical knots `0, 1, ..., n - 1` and period `n`
    ///
    /// # Example
    /// ```
    /// use knotwork::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let square = vec![
    ///     Point2::new(0., 0.),
    ///     Point2::new(1., 0.),
    ///     Point2::new(1., 1.),
    ///     Point2::new(0., 1.),
    /// ];
    /// let curve = PeriodicBSplineCurve::try_new(square, 2).unwrap();
    /// assert_eq!(curve.period(), 4.);
    /// assert_relative_eq!(curve.point_at(0.), curve.point_at(4.));
    /// assert_relative_eq!(curve.point_at(0.5), curve.point_at(-3.5));
    /// ```
    pub fn try_new(points: Vec<P>, degree: usize) -> anyhow::Result<Self> {
        let n = points.len();
        let knots = (0..n).map(T::from_count).collect();
        Self::try_with_knots(points, knots, T::from_count(n), degree)
    }

    /// Create a closed curve from `n` logical control points and `n` logical knots
    /// The logical knots cover one period: `knots[n - 1] - knots[0] < period`.
    ///
    /// # Failures
    /// - if the degree is zero
    /// - if the number of points is not greater than the degree
    /// - if the number of knots differs from the number of points
    /// - if the knots decrease somewhere
    /// - if the knots do not fit into one period, or a knot is repeated more than `degree` times
    pub fn try_with_knots(
        points: Vec<P>,
        knots: Vec<T>,
        period: T,
        degree: usize,
    ) -> anyhow::Result<Self> {
        let n = points.len();
        anyhow::ensure!(
            degree > 0,
            CurveError::UnsupportedDegree { degree, min: 1 }
        );
        anyhow::ensure!(
            n > degree,
            CurveError::TooFewControlPoints {
                degree,
                control_points: n,
            }
        );
        anyhow::ensure!(
            knots.len() == n,
            CurveError::KnotCountMismatch {
                got: knots.len(),
                expected: n,
            }
        );
        let knots = KnotVector::try_new(knots)?;
        anyhow::ensure!(
            period > T::zero() && knots.last() - knots.first() < period,
            CurveError::DegeneratePeriodicKnots {
                reason: format!(
                    "knots span {} which does not fit into the period {}",
                    (knots.last() - knots.first()).as_f64(),
                    period.as_f64()
                ),
            }
        );
        if let Some(m) = knots
            .multiplicity()
            .into_iter()
            .find(|m| m.multiplicity() > degree)
        {
            anyhow::bail!(CurveError::DegeneratePeriodicKnots {
                reason: format!(
                    "knot {} repeats {} times, at most {} allowed",
                    m.knot().as_f64(),
                    m.multiplicity(),
                    degree
                ),
            });
        }

        Ok(Self::from_logical(points, knots.as_slice(), period, degree))
    }

    /// Build the extended spline, knots and points are assumed valid
    fn from_logical(points: Vec<P>, knots: &[T], period: T, degree: usize) -> Self {
        let n = points.len() as isize;
        let d = degree as isize;
        let extended_knots = (0..(n + 2 * d + 1))
            .map(|j| {
                let shifted = j - d;
                let turns = shifted.div_euclid(n);
                knots[shifted.rem_euclid(n) as usize] + T::constant(turns as f64) * period
            })
            .collect();
        let control_points = points
            .iter()
            .chain(points.iter().take(degree))
            .cloned()
            .collect();
        Self {
            spline: BSplineCurve::new_unchecked(
                degree,
                control_points,
                KnotVector::new(extended_knots),
            ),
            period,
        }
    }

    pub fn degree(&self) -> usize {
        self.spline.degree()
    }

    pub fn period(&self) -> T {
        self.period
    }

    /// Number of distinct (logical) control points
    pub fn len(&self) -> usize {
        self.spline.control_points().len() - self.degree()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The extended working representation
    pub fn spline(&self) -> &BSplineCurve<T, P> {
        &self.spline
    }

    pub fn logical_control_points(&self) -> &[P] {
        &self.spline.control_points()[..self.len()]
    }

    pub fn logical_knots(&self) -> &[T] {
        let d = self.degree();
        &self.spline.knots().as_slice()[d..(d + self.len())]
    }

    /// One period `[t0, t0 + period]`
    pub fn knots_domain(&self) -> (T, T) {
        self.spline.knots_domain()
    }

    /// Map `u` into `[t0, t0 + period)`
    pub fn wrap(&self, u: T) -> T {
        let (start, _) = self.knots_domain();
        let turns = ((u - start) / self.period).floor();
        let wrapped = u - turns * self.period;
        if wrapped >= start + self.period {
            start
        } else {
            wrapped.max(start)
        }
    }

    /// Evaluate the curve at any parameter, cyclically
    pub fn point_at(&self, u: T) -> P {
        self.spline.point(self.wrap(u))
    }

    /// Return a copy with the control point at `index` of the extended representation replaced
    /// Wrap-around copies are written too: index `i < degree` also sets `n + i`, and
    /// index `i >= n` also sets `i - n`.
    pub fn try_set_control_point_position(&self, index: usize, point: P) -> anyhow::Result<Self> {
        let n = self.len();
        let total = self.spline.control_points().len();
        anyhow::ensure!(
            index < total,
            CurveError::IndexOutOfBounds { index, len: total }
        );
        let mirror = if index < self.degree() {
            Some(index + n)
        } else if index >= n {
            Some(index - n)
        } else {
            None
        };

        let mut spline = self.spline.try_with_control_point(index, point.clone())?;
        if let Some(mirror) = mirror {
            spline = spline.try_with_control_point(mirror, point)?;
        }
        Ok(Self {
            spline,
            period: self.period,
        })
    }

    /// Change the coordinate type of the control points
    pub fn map_control_points<Q, F>(&self, f: F) -> PeriodicBSplineCurve<T, Q>
    where
        Q: ControlPoint<T>,
        F: FnMut(&P) -> Q,
    {
        PeriodicBSplineCurve {
            spline: self.spline.map_control_points(f),
            period: self.period,
        }
    }

    /// Equivalent clamped curve over one period
    pub fn try_clamp_spline(&self) -> anyhow::Result<BSplineCurve<T, P>> {
        let (start, end) = self.knots_domain();
        self.spline.try_extract(start, end)
    }

    /// Insert the knot `u` (taken modulo the period) `times` times
    ///
    /// # Failures
    /// - if the multiplicity of the knot would exceed `degree`
    pub fn try_insert_knot(&self, u: T, times: usize) -> anyhow::Result<Self> {
        if times == 0 {
            return Ok(self.clone());
        }
        let u = self.wrap(u);
        let logical = KnotVector::new(self.logical_knots().to_vec());
        let u = logical.snap(u);
        let s = logical.multiplicity_of(u);
        anyhow::ensure!(
            s + times <= self.degree(),
            CurveError::MultiplicityExceeded {
                knot: u.as_f64(),
                multiplicity: s + times,
                max: self.degree(),
            }
        );

        let wide = [u - self.period, u, u + self.period]
            .into_iter()
            .try_fold(self.unroll(3).spline, |curve, v| {
                curve.try_insert_knot(v, times)
            })?;
        self.fold(&wide)
    }

    /// Try to remove one occurrence of the logical knot at `index`
    /// `None` if the index is invalid, the shape check fails or the result could not stay closed.
    pub fn remove_knot(&self, index: usize, tolerance: Option<T>) -> Option<Self> {
        let u = *self.logical_knots().get(index)?;
        if self.len() <= self.degree() + 1 {
            return None;
        }

        let wide = [u - self.period, u, u + self.period]
            .into_iter()
            .try_fold(self.unroll(5).spline, |curve, v| {
                let index = curve.knots().iter().rposition(|t| *t == v)?;
                curve.remove_knot(index, tolerance)
            })?;
        self.fold(&wide).ok()
    }

    /// Elevate the degree by one, keeping the curve closed
    /// Logical knots never repeat more than `degree` times, so every knot of the elevated
    /// curve stays below its new degree as well.
    pub fn try_elevate_degree(&self) -> anyhow::Result<Self> {
        let (t0, _) = self.knots_domain();
        let wide = self
            .unroll(3)
            .spline
            .try_extract(t0 - self.period, t0 + self.period * T::constant(2.))?
            .try_elevate_degree()?;
        self.fold(&wide)
    }

    /// Extract the open curve between `from` and `to`, at most one period apart
    /// The range may cross the seam; the result is parameterized from `from` taken modulo the
    /// period.
    pub fn try_extract(&self, from: T, to: T) -> anyhow::Result<BSplineCurve<T, P>> {
        anyhow::ensure!(
            from < to && to - from <= self.period,
            CurveError::InvalidRange {
                from: from.as_f64(),
                to: to.as_f64(),
            }
        );
        let start = self.wrap(from);
        self.unroll(3).spline.try_extract(start, start + (to - from))
    }

    /// The same curve described over `periods` consecutive periods, the original period first
    /// being preceded by `(periods - 1) / 2` copies.
    fn unroll(&self, periods: usize) -> Self {
        let before = ((periods - 1) / 2) as isize;
        let points = self
            .logical_control_points()
            .iter()
            .cycle()
            .take(self.len() * periods)
            .cloned()
            .collect_vec();
        let knots = (-before..(periods as isize - before))
            .flat_map(|k| {
                let offset = T::constant(k as f64) * self.period;
                self.logical_knots().iter().map(move |t| *t + offset)
            })
            .collect_vec();
        Self::from_logical(
            points,
            &knots,
            self.period * T::from_count(periods),
            self.degree(),
        )
    }

    /// Cut the period starting at this curve's `t0` out of a wide curve
    fn fold(&self, wide: &BSplineCurve<T, P>) -> anyhow::Result<Self> {
        let (t0, _) = self.knots_domain();
        let eps = T::default_epsilon() * T::constant(16.) * (t0.abs() + self.period);
        let knots = wide.knots().as_slice();
        let a = knots.partition_point(|t| *t < t0 - eps);
        let b = knots.partition_point(|t| *t < t0 + self.period - eps);
        let degree = wide.degree();
        anyhow::ensure!(
            a >= degree && b > a,
            CurveError::DegeneratePeriodicKnots {
                reason: "period is not covered by the working curve".to_string(),
            }
        );
        let n = b - a;
        let points = wide.control_points()[(a - degree)..(a - degree + n)].to_vec();
        Self::try_with_knots(points, knots[a..b].to_vec(), self.period, degree)
    }
}
