use itertools::Itertools;
use nalgebra::{Complex, Point3};

use crate::curve::{BSplineCurve, BernsteinPolynomial, BezierSegment, RationalBSplineCurve2D};
use crate::knot::KnotVector;
use crate::misc::{ControlPoint, CurveError, FloatingPoint, HomogeneousComplex};

/// Relative tolerance of the knot removal in `try_to_rational_bspline_r1_to_r2`
const CONVERSION_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Rational curve from the real line into the complex plane
///
/// Control points are complex homogeneous pairs `(p * w, w)` with complex weights `w`, and the
/// curve evaluates to `c0(u) / c1(u)`. Möbius transformations act on the control points
/// linearly, so this family is closed under them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplexRationalBSplineCurve<T> {
    curve: BSplineCurve<T, HomogeneousComplex<T>>,
}

impl<T: FloatingPoint> ComplexRationalBSplineCurve<T> {
    /// Create a complex rational curve from points, complex weights and a knot vector
    /// # Failures
    /// - if the number of weights differs from the number of points
    /// - if a weight is zero
    /// - any failure of `BSplineCurve::try_new`
    pub fn try_new(
        degree: usize,
        points: Vec<Complex<T>>,
        weights: Vec<Complex<T>>,
        knots: Vec<T>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            weights.len() == points.len(),
            CurveError::WeightCountMismatch {
                got: weights.len(),
                expected: points.len(),
            }
        );
        if let Some(index) = weights.iter().position(|w| w.norm_sqr() == T::zero()) {
            anyhow::bail!(CurveError::ZeroWeight { index });
        }
        let control_points = points
            .iter()
            .zip(weights.iter())
            .map(|(p, w)| HomogeneousComplex::weighted(*p, *w))
            .collect();
        Ok(Self {
            curve: BSplineCurve::try_new(degree, control_points, knots)?,
        })
    }

    pub fn from_homogeneous(curve: BSplineCurve<T, HomogeneousComplex<T>>) -> Self {
        Self { curve }
    }

    pub fn homogeneous(&self) -> &BSplineCurve<T, HomogeneousComplex<T>> {
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

    /// Evaluate `c0(u) / c1(u)`
    /// # Failures
    /// - if `u` is outside of the domain
    /// - if the denominator vanishes at `u`
    pub fn try_point_at(&self, u: T) -> anyhow::Result<Complex<T>> {
        self.curve
            .try_point_at(u)?
            .project()
            .ok_or_else(|| CurveError::ZeroHomogeneousWeight.into())
    }

    pub fn weights(&self) -> Vec<Complex<T>> {
        self.curve
            .control_points()
            .iter()
            .map(|p| p.denominator)
            .collect()
    }

    /// Control points projected back from homogeneous coordinates
    pub fn try_dehomogenized_control_points(&self) -> anyhow::Result<Vec<Complex<T>>> {
        self.curve
            .control_points()
            .iter()
            .map(|p| {
                p.project()
                    .ok_or_else(|| CurveError::ZeroHomogeneousWeight.into())
            })
            .collect()
    }

    fn control_point(&self, index: usize) -> anyhow::Result<&HomogeneousComplex<T>> {
        let control_points = self.curve.control_points();
        control_points.get(index).ok_or_else(|| {
            CurveError::IndexOutOfBounds {
                index,
                len: control_points.len(),
            }
            .into()
        })
    }

    /// Change the complex weight of a control point, keeping its position
    pub fn try_set_control_point_weight(
        &self,
        index: usize,
        weight: Complex<T>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            weight.norm_sqr() != T::zero(),
            CurveError::ZeroWeight { index }
        );
        let position = self
            .control_point(index)?
            .project()
            .ok_or(CurveError::ZeroHomogeneousWeight)?;
        Ok(Self::from_homogeneous(self.curve.try_with_control_point(
            index,
            HomogeneousComplex::weighted(position, weight),
        )?))
    }

    /// Move a control point, keeping its weight
    pub fn try_set_control_point_position(
        &self,
        index: usize,
        position: Complex<T>,
    ) -> anyhow::Result<Self> {
        let weight = self.control_point(index)?.denominator;
        Ok(Self::from_homogeneous(self.curve.try_with_control_point(
            index,
            HomogeneousComplex::weighted(position, weight),
        )?))
    }

    pub fn try_insert_knot(&self, u: T, times: usize) -> anyhow::Result<Self> {
        Ok(Self::from_homogeneous(self.curve.try_insert_knot(u, times)?))
    }

    pub fn remove_knot(&self, index: usize, tolerance: Option<T>) -> Option<Self> {
        self.curve
            .remove_knot(index, tolerance)
            .map(Self::from_homogeneous)
    }

    pub fn try_elevate_degree(&self) -> anyhow::Result<Self> {
        Ok(Self::from_homogeneous(self.curve.try_elevate_degree()?))
    }

    /// Apply the Möbius transformation `z -> (a z + b) / (c z + d)` to the curve
    pub fn mobius_transformed(
        &self,
        a: Complex<T>,
        b: Complex<T>,
        c: Complex<T>,
        d: Complex<T>,
    ) -> Self {
        Self::from_homogeneous(self.curve.map_control_points(|p| {
            HomogeneousComplex::new(
                a * p.numerator + b * p.denominator,
                c * p.numerator + d * p.denominator,
            )
        }))
    }

    /// Convert into a real rational curve of the plane
    ///
    /// With `c0 = nx + i ny` and `c1 = dx + i dy`, the point `c0 / c1` has the homogeneous
    /// coordinates `(nx dx + ny dy, ny dx - nx dy, dx^2 + dy^2)`. These products are formed
    /// span by span on the Bézier pieces, doubling the degree; the pieces are joined again and
    /// the knots the products do not need are removed.
    ///
    /// Curves whose weights are all real convert directly at the same degree.
    ///
    /// `tolerance` bounds the knot removal, defaulting to a small fraction of the size of the
    /// homogeneous control polygon.
    pub fn try_to_rational_bspline_r1_to_r2(
        &self,
        tolerance: Option<T>,
    ) -> anyhow::Result<RationalBSplineCurve2D<T>> {
        let scale = self
            .curve
            .control_points()
            .iter()
            .map(|p| ControlPoint::norm(&p.denominator))
            .fold(T::zero(), |acc, v| acc.max(v));
        let real_tolerance = T::default_epsilon() * T::constant(1e3) * scale.max(T::one());
        let is_real = self
            .curve
            .control_points()
            .iter()
            .all(|p| p.denominator.im.abs() <= real_tolerance);

        if is_real {
            return RationalBSplineCurve2D::try_from_homogeneous(self.curve.map_control_points(
                |p| Point3::new(p.numerator.re, p.numerator.im, p.denominator.re),
            ));
        }

        let degree = self.degree();
        let segments = self
            .curve
            .try_decompose_bezier_segments()?
            .iter()
            .map(real_segment)
            .collect_vec();
        let composed = BSplineCurve::try_compose_bezier_segments(&segments)?;

        let tolerance = tolerance.unwrap_or_else(|| {
            let size = composed
                .control_points()
                .iter()
                .map(|p| p.norm())
                .fold(T::zero(), |acc, v| acc.max(v));
            T::constant(CONVERSION_RELATIVE_TOLERANCE) * size
        });

        // a knot of multiplicity m keeps continuity C^(degree - m) through the products,
        // which needs multiplicity degree + m at the doubled degree
        let (start, end) = self.knots_domain();
        let reduced = self
            .curve
            .knots()
            .multiplicity()
            .iter()
            .filter(|m| m.knot() > start && m.knot() < end)
            .fold(composed, |curve, m| {
                let attempts = (degree + 1).saturating_sub(m.multiplicity());
                let reduced = curve.reduce_knot_multiplicity(m.knot(), attempts, tolerance);
                #[cfg(feature = "log")]
                log::debug!(
                    "removed {} of {} knots at {}",
                    curve.knots().len() - reduced.knots().len(),
                    attempts,
                    m.knot().as_f64()
                );
                reduced
            });

        RationalBSplineCurve2D::try_from_homogeneous(reduced)
    }
}

/// The Bézier piece of `c0 / c1` in real homogeneous coordinates
fn real_segment<T: FloatingPoint>(
    segment: &BezierSegment<T, HomogeneousComplex<T>>,
) -> BezierSegment<T, Point3<T>> {
    let channel = |f: fn(&HomogeneousComplex<T>) -> T| {
        BernsteinPolynomial::new(segment.control_points().iter().map(f).collect())
    };
    let nx = channel(|p| p.numerator.re);
    let ny = channel(|p| p.numerator.im);
    let dx = channel(|p| p.denominator.re);
    let dy = channel(|p| p.denominator.im);

    let x = nx.product(&dx).sum(&ny.product(&dy));
    let y = ny.product(&dx).difference(&nx.product(&dy));
    let w = dx.product(&dx).sum(&dy.product(&dy));

    let control_points = x
        .coefficients()
        .iter()
        .zip(y.coefficients())
        .zip(w.coefficients())
        .map(|((x, y), w)| Point3::new(*x, *y, *w))
        .collect();
    BezierSegment::new(segment.start(), segment.end(), control_points)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Complex;

    use super::ComplexRationalBSplineCurve;
    use crate::misc::CurveError;

    fn points() -> Vec<Complex<f64>> {
        vec![
            Complex::new(0., 0.),
            Complex::new(2., 1.),
            Complex::new(3., 3.),
            Complex::new(1., 4.),
            Complex::new(-1., 2.),
        ]
    }

    fn curve() -> ComplexRationalBSplineCurve<f64> {
        ComplexRationalBSplineCurve::try_new(
            2,
            points(),
            vec![
                Complex::new(1., 0.),
                Complex::new(0.8, 0.4),
                Complex::new(1.2, -0.3),
                Complex::new(0.9, 0.2),
                Complex::new(1., 0.),
            ],
            vec![0., 0., 0., 1., 2., 3., 3., 3.],
        )
        .unwrap()
    }

    fn assert_close(a: Complex<f64>, b: Complex<f64>) {
        assert_relative_eq!(a.re, b.re, epsilon = 1e-9);
        assert_relative_eq!(a.im, b.im, epsilon = 1e-9);
    }

    #[test]
    fn interpolates_end_points() {
        let curve = curve();
        assert_close(curve.try_point_at(0.).unwrap(), Complex::new(0., 0.));
        assert_close(curve.try_point_at(3.).unwrap(), Complex::new(-1., 2.));
        let projected = curve.try_dehomogenized_control_points().unwrap();
        for (a, b) in projected.iter().zip(points()) {
            assert_close(*a, b);
        }
    }

    #[test]
    fn weight_validation() {
        let err = ComplexRationalBSplineCurve::try_new(
            1,
            vec![Complex::new(0., 0.), Complex::new(1., 0.)],
            vec![Complex::new(1., 0.), Complex::new(0., 0.)],
            vec![0., 0., 1., 1.],
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::ZeroWeight { index: 1 })
        );
    }

    #[test]
    fn weight_edit_keeps_position() {
        let curve = curve();
        let edited = curve
            .try_set_control_point_weight(2, Complex::new(0., 2.))
            .unwrap();
        assert_close(
            edited.try_dehomogenized_control_points().unwrap()[2],
            Complex::new(3., 3.),
        );
        assert_eq!(edited.weights()[2], Complex::new(0., 2.));

        let moved = curve
            .try_set_control_point_position(2, Complex::new(5., 5.))
            .unwrap();
        assert_eq!(moved.weights()[2], curve.weights()[2]);
    }

    #[test]
    fn structural_operations_keep_shape() {
        let curve = curve();
        let refined = curve.try_insert_knot(1.5, 1).unwrap();
        let elevated = curve.try_elevate_degree().unwrap();
        for i in 0..=30 {
            let u = 3. * i as f64 / 30.;
            let expected = curve.try_point_at(u).unwrap();
            assert_close(refined.try_point_at(u).unwrap(), expected);
            assert_close(elevated.try_point_at(u).unwrap(), expected);
        }
        let index = refined.knots().iter().position(|t| *t == 1.5).unwrap();
        let restored = refined.remove_knot(index, Some(1e-9)).unwrap();
        assert_eq!(restored.knots(), curve.knots());
    }

    #[test]
    fn mobius_transformation() {
        let curve = curve();
        let (a, b, c, d) = (
            Complex::new(1., 1.),
            Complex::new(0., 2.),
            Complex::new(0.1, 0.),
            Complex::new(1., -0.5),
        );
        let transformed = curve.mobius_transformed(a, b, c, d);
        for i in 0..=30 {
            let u = 3. * i as f64 / 30.;
            let z = curve.try_point_at(u).unwrap();
            assert_close(transformed.try_point_at(u).unwrap(), (a * z + b) / (c * z + d));
        }
    }

    #[test]
    fn conversion_to_real_rational_curve() {
        let curve = curve();
        let real = curve.try_to_rational_bspline_r1_to_r2(None).unwrap();
        assert_eq!(real.degree(), 4);
        // interior knots of multiplicity one end up with multiplicity three
        assert_eq!(
            real.knots().to_vec(),
            vec![0., 0., 0., 0., 0., 1., 1., 1., 2., 2., 2., 3., 3., 3., 3., 3.]
        );
        for i in 0..=30 {
            let u = 3. * i as f64 / 30.;
            let z = curve.try_point_at(u).unwrap();
            let p = real.try_point_at(u).unwrap();
            assert_close(Complex::new(p.x, p.y), z);
        }
    }

    #[test]
    fn conversion_of_real_weights_keeps_the_degree() {
        let curve = ComplexRationalBSplineCurve::try_new(
            2,
            points(),
            vec![
                Complex::new(1., 0.),
                Complex::new(2., 0.),
                Complex::new(0.5, 0.),
                Complex::new(1., 0.),
                Complex::new(1., 0.),
            ],
            vec![0., 0., 0., 1., 2., 3., 3., 3.],
        )
        .unwrap();
        let real = curve.try_to_rational_bspline_r1_to_r2(None).unwrap();
        assert_eq!(real.degree(), 2);
        assert_eq!(real.knots(), curve.knots());
        assert_eq!(real.weights(), vec![1., 2., 0.5, 1., 1.]);
        for i in 0..=30 {
            let u = 3. * i as f64 / 30.;
            let p = real.try_point_at(u).unwrap();
            assert_close(Complex::new(p.x, p.y), curve.try_point_at(u).unwrap());
        }
    }
}
