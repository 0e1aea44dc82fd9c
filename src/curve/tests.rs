use approx::assert_relative_eq;
use nalgebra::{Complex, Point2};

use crate::misc::{CurveError, Reversible, Rotate};

use super::{
    BSplineCurve, BSplineCurve2D, ComplexRationalBSplineCurve, CurveKind, PeriodicBSplineCurve,
    PeriodicRationalBSplineCurve2D, RationalBSplineCurve2D,
};

fn points() -> Vec<Point2<f64>> {
    vec![
        Point2::new(0., 0.),
        Point2::new(1., 2.),
        Point2::new(3., 3.),
        Point2::new(5., 1.),
        Point2::new(6., -1.),
    ]
}

fn knots() -> Vec<f64> {
    vec![0., 0., 0., 0.5, 2., 3., 3., 3.]
}

fn kinds() -> Vec<CurveKind<f64>> {
    let open: BSplineCurve2D<f64> = BSplineCurve::try_new(2, points(), knots()).unwrap();
    let rational =
        RationalBSplineCurve2D::try_new(2, points(), vec![1., 2., 0.5, 1., 1.5], knots()).unwrap();
    let periodic = PeriodicBSplineCurve::try_new(points(), 2).unwrap();
    let periodic_rational =
        PeriodicRationalBSplineCurve2D::try_new(points(), vec![1., 2., 0.5, 1., 1.5], 3).unwrap();
    let complex = ComplexRationalBSplineCurve::try_new(
        2,
        points().iter().map(|p| Complex::new(p.x, p.y)).collect(),
        vec![
            Complex::new(1., 0.),
            Complex::new(1., 1.),
            Complex::new(0.5, 0.),
            Complex::new(1., -0.5),
            Complex::new(1., 0.),
        ],
        knots(),
    )
    .unwrap();
    vec![
        open.into(),
        rational.into(),
        periodic.into(),
        periodic_rational.into(),
        complex.into(),
    ]
}

fn assert_same_shape(a: &CurveKind<f64>, b: &CurveKind<f64>) {
    let (start, end) = a.domain();
    for i in 0..=40 {
        let u = start + (end - start) * i as f64 / 40.;
        assert_relative_eq!(
            a.try_point_at(u).unwrap(),
            b.try_point_at(u).unwrap(),
            epsilon = 1e-9
        );
    }
}

#[test]
fn curve_kind_dispatch() {
    let kinds = kinds();
    assert_eq!(
        kinds.iter().map(|k| k.is_periodic()).collect::<Vec<_>>(),
        vec![false, false, true, true, false]
    );
    assert_eq!(
        kinds.iter().map(|k| k.is_rational()).collect::<Vec<_>>(),
        vec![false, true, false, true, true]
    );
    assert_eq!(
        kinds.iter().map(|k| k.degree()).collect::<Vec<_>>(),
        vec![2, 2, 2, 3, 2]
    );
    assert_eq!(kinds[0].knots(), knots().as_slice());
    assert_eq!(kinds[2].knots(), &[0., 1., 2., 3., 4.]);
    assert_eq!(kinds[2].domain(), (0., 5.));

    // open curves start at their first control point
    for kind in [&kinds[0], &kinds[1], &kinds[4]] {
        assert_relative_eq!(kind.try_point_at(0.).unwrap(), points()[0], epsilon = 1e-12);
        assert!(kind.try_point_at(-1.).is_err());
    }
    // closed curves accept any parameter
    for kind in [&kinds[2], &kinds[3]] {
        let (start, end) = kind.domain();
        assert_relative_eq!(
            kind.try_point_at(start).unwrap(),
            kind.try_point_at(end).unwrap(),
            epsilon = 1e-12
        );
        assert!(kind.try_point_at(-7.3).is_ok());
    }
}

#[test]
fn structural_operations_on_every_kind() {
    for kind in kinds() {
        let (start, end) = kind.domain();
        let u = start + (end - start) * 0.37;

        let refined = kind.try_insert_knot(u, 1).unwrap();
        assert_eq!(refined.knots().len(), kind.knots().len() + 1);
        assert_same_shape(&kind, &refined);

        let index = refined
            .knots()
            .iter()
            .position(|t| (*t - u).abs() < 1e-12)
            .unwrap();
        let restored = refined.remove_knot(index, Some(1e-9)).unwrap();
        assert_eq!(restored.knots().len(), kind.knots().len());
        assert_same_shape(&kind, &restored);

        let elevated = kind.try_elevate_degree().unwrap();
        assert_eq!(elevated.degree(), kind.degree() + 1);
        assert_same_shape(&kind, &elevated);
    }
}

#[test]
fn complex_curve_with_real_weights_is_a_rational_curve() {
    let weights = vec![1., 2., 0.5, 1., 1.5];
    let rational = RationalBSplineCurve2D::try_new(2, points(), weights.clone(), knots()).unwrap();
    let complex = ComplexRationalBSplineCurve::try_new(
        2,
        points().iter().map(|p| Complex::new(p.x, p.y)).collect(),
        weights.iter().map(|w| Complex::new(*w, 0.)).collect(),
        knots(),
    )
    .unwrap();
    assert_same_shape(
        &CurveKind::from(rational.clone()),
        &CurveKind::from(complex.clone()),
    );

    let converted = complex.try_to_rational_bspline_r1_to_r2(None).unwrap();
    assert_eq!(converted.degree(), rational.degree());
    assert_same_shape(&CurveKind::from(rational), &CurveKind::from(converted));
}

#[test]
fn complex_curve_rotation_is_a_mobius_transformation() {
    let CurveKind::Complex(complex) = kinds().remove(4) else {
        unreachable!()
    };
    let angle = 0.7_f64;
    let rotation = Complex::new(angle.cos(), angle.sin());
    let zero = Complex::new(0., 0.);
    let one = Complex::new(1., 0.);
    let rotated = complex.mobius_transformed(rotation, zero, zero, one);
    for i in 0..=20 {
        let u = 3. * i as f64 / 20.;
        let expected = complex.try_point_at(u).unwrap().rotated(angle);
        let z = rotated.try_point_at(u).unwrap();
        assert_relative_eq!(z.re, expected.re, epsilon = 1e-9);
        assert_relative_eq!(z.im, expected.im, epsilon = 1e-9);
    }

    // the converted curve follows the transformed one
    let real = rotated.try_to_rational_bspline_r1_to_r2(None).unwrap();
    for i in 0..=20 {
        let u = 3. * i as f64 / 20.;
        let z = rotated.try_point_at(u).unwrap();
        let p = real.try_point_at(u).unwrap();
        assert_relative_eq!(p, Point2::new(z.re, z.im), epsilon = 1e-9);
    }
}

#[test]
fn periodic_curve_through_its_clamped_equivalent() {
    let periodic = PeriodicBSplineCurve::try_new(points(), 3).unwrap();
    let clamped = periodic.try_clamp_spline().unwrap();
    let (start, end) = clamped.knots_domain();
    assert_eq!((start, end), periodic.knots_domain());

    // reversing the clamped curve traverses the closed curve backwards
    let reversed = clamped.reversed();
    for i in 0..=20 {
        let u = start + (end - start) * i as f64 / 20.;
        assert_relative_eq!(
            reversed.point_at_unchecked(start + end - u),
            periodic.point_at(u),
            epsilon = 1e-9
        );
    }
}

#[test]
fn errors_are_typed() {
    let open: BSplineCurve2D<f64> = BSplineCurve::try_new(2, points(), knots()).unwrap();
    let err = open.try_extract(2., 2.).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CurveError>(),
        Some(CurveError::InvalidRange { .. })
    ));
    assert_eq!(
        err.to_string(),
        CurveError::InvalidRange { from: 2., to: 2. }.to_string()
    );

    let periodic = PeriodicBSplineCurve::try_new(points(), 2).unwrap();
    let err = periodic.try_insert_knot(1., 2).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CurveError>(),
        Some(CurveError::MultiplicityExceeded { .. })
    ));
}
