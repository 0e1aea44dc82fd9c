use itertools::Itertools;
use nalgebra::{Point1, Point2, Point3};

use crate::curve::BezierSegment;
use crate::knot::KnotVector;
use crate::misc::{ControlPoint, CurveError, FloatingPoint, Reversible};

/// Tolerance used by `remove_knot` when none is given
pub const DEFAULT_REMOVAL_TOLERANCE: f64 = 1e-6;

/// Non-rational B-spline curve representation
/// By generics, the control points can be scalars, planar or spatial points,
/// complex numbers or homogeneous coordinates of a rational curve.
///
/// Curves are values: every structural operation returns a new curve and leaves `self` untouched.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BSplineCurve<T, P> {
    control_points: Vec<P>,
    degree: usize,
    /// knot vector for the curve
    /// the length of the knot vector is equal to the `# of control points + degree + 1`
    knots: KnotVector<T>,
}

/// Scalar valued B-spline curve alias
pub type BSplineCurve1D<T> = BSplineCurve<T, Point1<T>>;

/// 2D B-spline curve alias
pub type BSplineCurve2D<T> = BSplineCurve<T, Point2<T>>;

/// 3D B-spline curve alias
pub type BSplineCurve3D<T> = BSplineCurve<T, Point3<T>>;

impl<T: FloatingPoint, P: ControlPoint<T>> BSplineCurve<T, P> {
    /// Create a new B-spline curve
    /// # Failures
    /// - if the number of control points is not greater than the degree
    /// - the number of knots is not equal to the number of control points + the degree + 1
    /// - the knots are decreasing somewhere
    /// - the domain `[knots[degree], knots[len - degree - 1]]` is empty
    /// - a knot is repeated more than `degree + 1` times
    ///
    /// # Example
    /// ```
    /// use knotwork::prelude::*;
    /// use nalgebra::Point2;
    ///
    /// let control_points = vec![
    ///     Point2::new(0., 0.),
    ///     Point2::new(1., 2.),
    ///     Point2::new(3., 2.),
    ///     Point2::new(4., 0.),
    /// ];
    /// let knots = vec![0., 0., 0., 1., 2., 2., 2.];
    /// let curve = BSplineCurve::try_new(2, control_points, knots).unwrap();
    /// assert_eq!(curve.try_point_at(0.).unwrap(), Point2::new(0., 0.));
    /// assert_eq!(curve.try_point_at(2.).unwrap(), Point2::new(4., 0.));
    /// assert!(curve.try_point_at(2.5).is_err());
    /// ```
    pub fn try_new(degree: usize, control_points: Vec<P>, knots: Vec<T>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            control_points.len() > degree,
            CurveError::TooFewControlPoints {
                degree,
                control_points: control_points.len(),
            }
        );
        anyhow::ensure!(
            knots.len() == control_points.len() + degree + 1,
            CurveError::KnotCountMismatch {
                got: knots.len(),
                expected: control_points.len() + degree + 1,
            }
        );

        let knots = KnotVector::try_new(knots)?;
        let (start, end) = knots.domain(degree);
        anyhow::ensure!(
            start < end,
            CurveError::EmptyDomain {
                start: start.as_f64(),
                end: end.as_f64(),
            }
        );
        if let Some(m) = knots
            .multiplicity()
            .into_iter()
            .find(|m| m.multiplicity() > degree + 1)
        {
            anyhow::bail!(CurveError::MultiplicityExceeded {
                knot: m.knot().as_f64(),
                multiplicity: m.multiplicity(),
                max: degree + 1,
            });
        }

        Ok(Self {
            control_points,
            degree,
            knots,
        })
    }

    /// Create a new B-spline curve whose degree is derived from the array lengths
    /// as `# of knots - # of control points - 1`
    pub fn try_from_knots(control_points: Vec<P>, knots: Vec<T>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            knots.len() > control_points.len(),
            CurveError::KnotCountMismatch {
                got: knots.len(),
                expected: control_points.len() + 1,
            }
        );
        let degree = knots.len() - control_points.len() - 1;
        Self::try_new(degree, control_points, knots)
    }

    /// Create a clamped curve with uniformly spaced interior knots
    pub fn try_clamped_uniform(degree: usize, control_points: Vec<P>) -> anyhow::Result<Self> {
        let knots = KnotVector::clamped_uniform(control_points.len(), degree);
        Self::try_new(degree, control_points, knots.to_vec())
    }

    pub(crate) fn new_unchecked(degree: usize, control_points: Vec<P>, knots: KnotVector<T>) -> Self {
        debug_assert_eq!(knots.len(), control_points.len() + degree + 1);
        Self {
            control_points,
            degree,
            knots,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &KnotVector<T> {
        &self.knots
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    /// Parameter interval `[knots[degree], knots[len - degree - 1]]` on which the curve is defined
    pub fn knots_domain(&self) -> (T, T) {
        self.knots.domain(self.degree)
    }

    /// Check if the curve is clamped
    pub fn is_clamped(&self) -> bool {
        self.knots.is_clamped(self.degree)
    }

    /// Evaluate the curve at a parameter inside its domain
    /// # Failures
    /// - if `u` is outside of the domain
    pub fn try_point_at(&self, u: T) -> anyhow::Result<P> {
        self.ensure_in_domain(u)?;
        Ok(self.point(self.knots_domain_clamp(u)))
    }

    /// Evaluate the curve, clamping the parameter into the domain
    pub fn point_at_unchecked(&self, u: T) -> P {
        self.point(self.knots_domain_clamp(u))
    }

    /// Sample the curve at a given number of points between the start and end parameters
    pub fn sample_regular_range(&self, start: T, end: T, samples: usize) -> Vec<P> {
        if samples < 2 {
            return vec![self.point_at_unchecked(start)];
        }
        let step = (end - start) / T::from_count(samples - 1);
        (0..samples)
            .map(|i| {
                let u = if i + 1 == samples {
                    end
                } else {
                    start + T::from_count(i) * step
                };
                self.point_at_unchecked(u)
            })
            .collect()
    }

    fn knots_domain_clamp(&self, u: T) -> T {
        self.knots.clamp(self.degree, u)
    }

    fn ensure_in_domain(&self, u: T) -> anyhow::Result<()> {
        let (start, end) = self.knots_domain();
        let slack = T::default_epsilon() * (end - start).abs().max(T::one());
        anyhow::ensure!(
            u >= start - slack && u <= end + slack,
            CurveError::OutOfDomain {
                parameter: u.as_f64(),
                start: start.as_f64(),
                end: end.as_f64(),
            }
        );
        Ok(())
    }

    /// Evaluate the curve at a given parameter by blending the `degree + 1` active control points
    pub(crate) fn point(&self, u: T) -> P {
        let knot_span_index = self.knots.find_span(self.degree, u);
        let basis = self.knots.basis_functions(knot_span_index, u, self.degree);
        let offset = knot_span_index - self.degree;
        basis
            .iter()
            .enumerate()
            .fold(P::origin(), |acc, (i, b)| {
                acc.sum(&self.control_points[offset + i].scaled(*b))
            })
    }

    /// Return a copy with the control point at `index` replaced
    pub fn try_with_control_point(&self, index: usize, point: P) -> anyhow::Result<Self> {
        anyhow::ensure!(
            index < self.control_points.len(),
            CurveError::IndexOutOfBounds {
                index,
                len: self.control_points.len(),
            }
        );
        let mut control_points = self.control_points.clone();
        control_points[index] = point;
        Ok(Self::new_unchecked(
            self.degree,
            control_points,
            self.knots.clone(),
        ))
    }

    /// Change the coordinate type of the control points, keeping degree and knots
    pub fn map_control_points<Q, F>(&self, f: F) -> BSplineCurve<T, Q>
    where
        Q: ControlPoint<T>,
        F: FnMut(&P) -> Q,
    {
        BSplineCurve::new_unchecked(
            self.degree,
            self.control_points.iter().map(f).collect(),
            self.knots.clone(),
        )
    }

    /// Insert the knot `u` `times` times by Boehm's algorithm
    /// The shape of the curve is unchanged.
    ///
    /// # Failures
    /// - if `u` is outside of the domain
    /// - if the multiplicity of `u` would exceed `degree + 1`
    ///
    /// # Example
    /// ```
    /// use knotwork::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let curve = BSplineCurve::try_clamped_uniform(
    ///     2,
    ///     vec![
    ///         Point2::new(0., 0.),
    ///         Point2::new(1., 2.),
    ///         Point2::new(3., 2.),
    ///         Point2::new(4., 0.),
    ///     ],
    /// ).unwrap();
    /// let refined = curve.try_insert_knot(0.5, 1).unwrap();
    /// assert_eq!(refined.control_points().len(), 5);
    /// assert_relative_eq!(curve.point_at_unchecked(0.7), refined.point_at_unchecked(0.7));
    /// ```
    pub fn try_insert_knot(&self, u: T, times: usize) -> anyhow::Result<Self> {
        if times == 0 {
            return Ok(self.clone());
        }

        self.ensure_in_domain(u)?;
        let u = self.knots.snap(self.knots_domain_clamp(u));
        let p = self.degree;
        let k = self.knots.clamping_find_span(p, u)?;
        let s = self.knots.multiplicity_of(u);
        anyhow::ensure!(
            s + times <= p + 1,
            CurveError::MultiplicityExceeded {
                knot: u.as_f64(),
                multiplicity: s + times,
                max: p + 1,
            }
        );

        // the last insertion up to `degree + 1` only duplicates a control point
        let blended = times.min(p - s);
        let mut curve = if blended > 0 {
            self.insert_knot_blending(u, k, s, blended)
        } else {
            self.clone()
        };
        if blended < times {
            curve = curve.insert_knot_duplicating(u, k + blended);
        }
        Ok(curve)
    }

    /// Boehm insertion for `r + s <= degree`
    fn insert_knot_blending(&self, u: T, k: usize, s: usize, r: usize) -> Self {
        let p = self.degree;
        let n = self.control_points.len();
        let knots = self.knots.as_slice();

        let mut knots_post = Vec::with_capacity(knots.len() + r);
        knots_post.extend_from_slice(&knots[..=k]);
        knots_post.extend(std::iter::repeat_n(u, r));
        knots_post.extend_from_slice(&knots[(k + 1)..]);

        let mut control_points_post = vec![P::origin(); n + r];
        control_points_post[..=(k - p)].clone_from_slice(&self.control_points[..=(k - p)]);
        for i in (k - s)..n {
            control_points_post[i + r] = self.control_points[i].clone();
        }

        let mut rw = self.control_points[(k - p)..=(k - s)].to_vec();
        for j in 1..=r {
            let l = k - p + j;
            for i in 0..=(p - j - s) {
                let alpha = ratio(u - knots[l + i], knots[i + k + 1] - knots[l + i]);
                rw[i] = rw[i].lerp(&rw[i + 1], alpha);
            }
            control_points_post[l] = rw[0].clone();
            control_points_post[k + r - j - s] = rw[p - j - s].clone();
        }
        let l = k - p + r;
        for i in (l + 1)..(k - s) {
            control_points_post[i] = rw[i - l].clone();
        }

        Self::new_unchecked(p, control_points_post, KnotVector::new(knots_post))
    }

    /// Insertion of a knot whose multiplicity is already `degree`
    fn insert_knot_duplicating(&self, u: T, k: usize) -> Self {
        let index = k - self.degree;
        let mut control_points = self.control_points.clone();
        control_points.insert(index, self.control_points[index].clone());
        let mut knots = self.knots.clone();
        knots.add(u);
        Self::new_unchecked(self.degree, control_points, knots)
    }

    /// Insert every knot of a non-decreasing list
    pub fn try_refine_knot(&self, knots_to_insert: &[T]) -> anyhow::Result<Self> {
        let mut curve = self.clone();
        for (u, run) in &knots_to_insert.iter().chunk_by(|u| **u) {
            curve = curve.try_insert_knot(u, run.count())?;
        }
        Ok(curve)
    }

    /// Try to remove one occurrence of the knot at `index`
    /// The knot is removed only if the curve keeps its shape within `tolerance`
    /// (measured on the control points), by the algorithm of Piegl and Tiller.
    ///
    /// Returns `None` when the removal is declined: the check failed, or the knot is not an
    /// interior knot of the domain.
    pub fn remove_knot(&self, index: usize, tolerance: Option<T>) -> Option<Self> {
        let tol = tolerance.unwrap_or(T::constant(DEFAULT_REMOVAL_TOLERANCE));
        let p = self.degree;
        let knots = self.knots.as_slice();
        let u = *knots.get(index)?;
        let (start, end) = self.knots_domain();
        if u <= start || u >= end {
            return None;
        }

        // last occurrence and multiplicity of the knot
        let r = knots.iter().rposition(|t| *t == u)?;
        let s = knots.iter().filter(|t| **t == u).count();
        let cps = &self.control_points;

        let first = r - p;
        let last = r - s;
        let off = first - 1;
        let mut temp = vec![P::origin(); last + 2 - off];
        temp[0] = cps[off].clone();
        temp[last + 1 - off] = cps[last + 1].clone();

        let (mut i, mut j) = (first, last);
        let (mut ii, mut jj) = (1, last - off);
        while j > i {
            let alfi = ratio(u - knots[i], knots[i + p + 1] - knots[i]);
            let alfj = ratio(u - knots[j], knots[j + p + 1] - knots[j]);
            if alfi == T::zero() || alfj == T::one() {
                return None;
            }
            temp[ii] = cps[i]
                .difference(&temp[ii - 1].scaled(T::one() - alfi))
                .scaled(T::one() / alfi);
            temp[jj] = cps[j]
                .difference(&temp[jj + 1].scaled(alfj))
                .scaled(T::one() / (T::one() - alfj));
            i += 1;
            ii += 1;
            j -= 1;
            jj -= 1;
        }

        let deviation = if j < i {
            temp[ii - 1].distance(&temp[jj + 1])
        } else {
            let alfi = ratio(u - knots[i], knots[i + p + 1] - knots[i]);
            cps[i].distance(&temp[ii + 1].lerp(&temp[ii - 1], T::one() - alfi))
        };

        if deviation > tol {
            #[cfg(feature = "log")]
            log::trace!(
                "knot {} at index {} kept, deviation {} exceeds tolerance",
                u.as_f64(),
                index,
                deviation.as_f64()
            );
            return None;
        }

        let mut control_points = cps.clone();
        let (mut i, mut j) = (first, last);
        while j > i {
            control_points[i] = temp[i - off].clone();
            control_points[j] = temp[j - off].clone();
            i += 1;
            j -= 1;
        }
        control_points.remove((2 * r - s - p) / 2);

        let mut knots_post = knots.to_vec();
        knots_post.remove(r);

        Some(Self::new_unchecked(
            p,
            control_points,
            KnotVector::new(knots_post),
        ))
    }

    /// Remove the knot `u` up to `max_removals` times, stopping at the first declined removal
    pub fn reduce_knot_multiplicity(&self, u: T, max_removals: usize, tolerance: T) -> Self {
        let mut curve = self.clone();
        for _ in 0..max_removals {
            let Some(index) = curve.knots.iter().rposition(|t| *t == u) else {
                break;
            };
            match curve.remove_knot(index, Some(tolerance)) {
                Some(reduced) => curve = reduced,
                None => break,
            }
        }
        curve
    }

    /// Elevate the degree by one with Prautzsch's algorithm
    /// The curve is written as the average of `degree + 1` splines of the next degree,
    /// each doubling every `(degree + 1)`-th knot and control point; their knot vectors are
    /// merged by knot insertion before the control points are averaged.
    ///
    /// # Failures
    /// - if the end knots do not have multiplicity `degree + 1`
    ///
    /// # Example
    /// ```
    /// use knotwork::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let curve = BSplineCurve::try_new(
    ///     1,
    ///     vec![Point2::new(0., 0.), Point2::new(2., 2.)],
    ///     vec![0., 0., 1., 1.],
    /// ).unwrap();
    /// let elevated = curve.try_elevate_degree().unwrap();
    /// assert_eq!(elevated.degree(), 2);
    /// assert_relative_eq!(elevated.control_points()[1], Point2::new(1., 1.));
    /// ```
    pub fn try_elevate_degree(&self) -> anyhow::Result<Self> {
        let p = self.degree;
        let mults = self.knots.multiplicity();
        let start = mults.first().map(|m| m.multiplicity()).unwrap_or(0);
        let end = mults.last().map(|m| m.multiplicity()).unwrap_or(0);
        anyhow::ensure!(
            start == p + 1 && end == p + 1,
            CurveError::UnclampedEnds {
                required: p + 1,
                start,
                end,
            }
        );

        let order = p + 1;
        let knots = self.knots.as_slice();
        let intermediates = (0..order)
            .map(|r| {
                let doubled = |i: usize| if i % order == r { 2 } else { 1 };
                let knots_r: Vec<T> = knots
                    .iter()
                    .enumerate()
                    .flat_map(|(i, u)| std::iter::repeat_n(*u, doubled(i)))
                    .collect();
                let control_points_r: Vec<P> = self
                    .control_points
                    .iter()
                    .enumerate()
                    .flat_map(|(i, c)| std::iter::repeat_n(c.clone(), doubled(i)))
                    .collect();
                Self::new_unchecked(p + 1, control_points_r, KnotVector::new(knots_r))
            })
            .collect_vec();

        // merged knot vector: every distinct knot gains one multiplicity
        let harmonized = intermediates
            .into_iter()
            .map(|curve| {
                mults.iter().try_fold(curve, |curve, m| {
                    let missing = (m.multiplicity() + 1)
                        .saturating_sub(curve.knots.multiplicity_of(m.knot()));
                    curve.try_insert_knot(m.knot(), missing)
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let inv = T::one() / T::from_count(order);
        let count = harmonized[0].control_points.len();
        debug_assert!(harmonized.iter().all(|c| c.control_points.len() == count));
        let control_points = (0..count)
            .map(|i| {
                harmonized
                    .iter()
                    .fold(P::origin(), |acc, c| acc.sum(&c.control_points[i]))
                    .scaled(inv)
            })
            .collect();

        Ok(Self::new_unchecked(
            p + 1,
            control_points,
            harmonized[0].knots.clone(),
        ))
    }

    /// Raise the multiplicity of `u` to `degree` by knot insertion
    /// The curve then passes through a control point at `u`, which becomes a break point
    /// where it can be cut.
    pub fn try_clamp_at(&self, u: T) -> anyhow::Result<Self> {
        self.ensure_in_domain(u)?;
        let u = self.knots.snap(self.knots_domain_clamp(u));
        let s = self.knots.multiplicity_of(u);
        self.try_insert_knot(u, self.degree.saturating_sub(s))
    }

    /// Clamp both ends of the domain so that the end knots have multiplicity `degree + 1`
    pub fn try_clamp_ends(&self) -> anyhow::Result<Self> {
        if self.is_clamped() {
            return Ok(self.clone());
        }
        let (start, end) = self.knots_domain();
        self.try_extract(start, end)
    }

    /// Extract the part of the curve between `from` and `to` as a clamped curve
    /// The extracted curve keeps the parameterization of the original on `[from, to]`.
    ///
    /// # Failures
    /// - if the range is empty or reversed
    /// - if the range leaves the domain
    pub fn try_extract(&self, from: T, to: T) -> anyhow::Result<Self> {
        anyhow::ensure!(
            from < to,
            CurveError::InvalidRange {
                from: from.as_f64(),
                to: to.as_f64(),
            }
        );
        self.ensure_in_domain(from)?;
        self.ensure_in_domain(to)?;

        let clamped = self.try_clamp_at(from)?;
        let from = clamped.knots.snap(clamped.knots_domain_clamp(from));
        let clamped = clamped.try_clamp_at(to)?;
        let to = clamped.knots.snap(clamped.knots_domain_clamp(to));

        let p = self.degree;
        let knots = clamped.knots.as_slice();
        // last occurrence of `from` and first occurrence of `to`
        let a = knots.partition_point(|t| *t <= from) - 1;
        let c = knots.partition_point(|t| *t < to);

        let mut knots_post = Vec::with_capacity(c - a + 2 * p + 1);
        knots_post.extend(std::iter::repeat_n(from, p + 1));
        knots_post.extend_from_slice(&knots[(a + 1)..c]);
        knots_post.extend(std::iter::repeat_n(to, p + 1));
        let control_points = clamped.control_points[(a - p)..c].to_vec();

        Ok(Self::new_unchecked(
            p,
            control_points,
            KnotVector::new(knots_post),
        ))
    }

    /// Split the curve at `u` into the parts before and after it
    pub fn try_split_at(&self, u: T) -> anyhow::Result<(Self, Self)> {
        let (start, end) = self.knots_domain();
        Ok((self.try_extract(start, u)?, self.try_extract(u, end)?))
    }

    /// Decompose the curve into its Bézier segments, one per non-empty knot span of the domain
    /// Unclamped curves are clamped at their domain ends first.
    pub fn try_decompose_bezier_segments(&self) -> anyhow::Result<Vec<BezierSegment<T, P>>> {
        let p = self.degree;
        let clamped = self.try_clamp_ends()?;
        let (start, end) = clamped.knots_domain();
        let interior = clamped
            .knots
            .multiplicity()
            .into_iter()
            .filter(|m| m.knot() > start && m.knot() < end)
            .collect_vec();
        let refined = interior.iter().try_fold(clamped, |curve, m| {
            curve.try_insert_knot(m.knot(), p.saturating_sub(m.multiplicity()))
        })?;

        let segments = refined
            .knots
            .multiplicity()
            .iter()
            .tuple_windows()
            .map(|(a, b)| {
                // span of `a` is its last occurrence
                let k = a.end();
                BezierSegment::new(
                    a.knot(),
                    b.knot(),
                    refined.control_points[(k - p)..=k].to_vec(),
                )
            })
            .collect();
        Ok(segments)
    }

    /// Join consecutive Bézier segments into a single clamped curve
    /// Segments are elevated to a common degree. Break points where neighbours meet get
    /// multiplicity `degree`, break points where they do not meet get `degree + 1`.
    ///
    /// # Failures
    /// - if no segment is given
    /// - if a segment has an empty range
    /// - if a segment does not start where the previous one ends
    pub fn try_compose_bezier_segments(segments: &[BezierSegment<T, P>]) -> anyhow::Result<Self> {
        let (Some(head), Some(tail)) = (segments.first(), segments.last()) else {
            anyhow::bail!(CurveError::NoSegments);
        };
        if let Some(s) = segments.iter().find(|s| s.start() >= s.end()) {
            anyhow::bail!(CurveError::InvalidRange {
                from: s.start().as_f64(),
                to: s.end().as_f64(),
            });
        }
        if let Some((a, b)) = segments
            .iter()
            .tuple_windows()
            .find(|(a, b)| a.end() != b.start())
        {
            anyhow::bail!(CurveError::InvalidRange {
                from: a.end().as_f64(),
                to: b.start().as_f64(),
            });
        }

        let degree = segments.iter().map(|s| s.degree()).max().unwrap_or(0);
        let segments = segments.iter().map(|s| s.elevated_to(degree)).collect_vec();

        let scale = segments
            .iter()
            .flat_map(|s| s.control_points().iter().map(|c| c.norm()))
            .fold(T::one(), |acc, v| acc.max(v));
        let join_tolerance = T::default_epsilon() * T::constant(1e3) * scale;

        let mut knots = vec![head.start(); degree + 1];
        let mut control_points = segments[0].control_points().to_vec();
        for (prev, next) in segments.iter().tuple_windows() {
            let joined = prev.control_points()[degree].distance(&next.control_points()[0])
                <= join_tolerance;
            if joined {
                knots.extend(std::iter::repeat_n(next.start(), degree));
                control_points.extend_from_slice(&next.control_points()[1..]);
            } else {
                knots.extend(std::iter::repeat_n(next.start(), degree + 1));
                control_points.extend_from_slice(next.control_points());
            }
        }
        knots.extend(std::iter::repeat_n(tail.end(), degree + 1));

        Ok(Self::new_unchecked(
            degree,
            control_points,
            KnotVector::new(knots),
        ))
    }
}

impl<T: FloatingPoint, P: ControlPoint<T>> Reversible for BSplineCurve<T, P> {
    /// Reverse the direction of the curve
    fn reversed(&self) -> Self {
        let mut control_points = self.control_points.clone();
        control_points.reverse();
        Self::new_unchecked(self.degree, control_points, self.knots.reversed())
    }
}

/// `num / denom`, zero if the denominator vanishes
fn ratio<T: FloatingPoint>(num: T, denom: T) -> T {
    if denom != T::zero() {
        num / denom
    } else {
        T::zero()
    }
}
