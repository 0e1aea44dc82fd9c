use crate::misc::{Binomial, ControlPoint, FloatingPoint};

/// A single polynomial piece of a B-spline in Bézier (Bernstein) form,
/// defined over the parameter interval `[start, end]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezierSegment<T, P> {
    start: T,
    end: T,
    control_points: Vec<P>,
}

impl<T: FloatingPoint, P: ControlPoint<T>> BezierSegment<T, P> {
    /// Create a segment from its parameter interval and `degree + 1` control points
    pub fn new(start: T, end: T, control_points: Vec<P>) -> Self {
        Self {
            start,
            end,
            control_points,
        }
    }

    pub fn start(&self) -> T {
        self.start
    }

    pub fn end(&self) -> T {
        self.end
    }

    pub fn degree(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn control_points(&self) -> &[P] {
        &self.control_points
    }

    /// Evaluate by de Casteljau's algorithm
    pub fn point_at(&self, u: T) -> P {
        let span = self.end - self.start;
        let t = if span > T::zero() {
            (u - self.start) / span
        } else {
            T::zero()
        };
        de_casteljau(&self.control_points, t)
    }

    /// Raise the degree by one without changing the shape
    pub fn elevated(&self) -> Self {
        Self::new(self.start, self.end, elevate(&self.control_points))
    }

    /// Raise the degree to `degree`, unchanged if already there
    pub fn elevated_to(&self, degree: usize) -> Self {
        let mut segment = self.clone();
        while segment.degree() < degree {
            segment = segment.elevated();
        }
        segment
    }
}

/// A scalar polynomial over `[0, 1]` in Bernstein form.
///
/// This is the arithmetic used to combine Bézier pieces of several curves channel by channel.
#[derive(Clone, Debug, PartialEq)]
pub struct BernsteinPolynomial<T> {
    coefficients: Vec<T>,
}

impl<T: FloatingPoint> BernsteinPolynomial<T> {
    /// Create a polynomial of degree `coefficients.len() - 1`
    pub fn new(coefficients: Vec<T>) -> Self {
        Self { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    pub fn evaluate(&self, t: T) -> T {
        let mut work = self.coefficients.clone();
        let n = work.len();
        for level in 1..n {
            for i in 0..(n - level) {
                work[i] = work[i] * (T::one() - t) + work[i + 1] * t;
            }
        }
        work[0]
    }

    /// Same polynomial expressed with one more coefficient
    pub fn elevated(&self) -> Self {
        let n = self.coefficients.len();
        let degree = T::from_count(n);
        let mut coefficients = Vec::with_capacity(n + 1);
        coefficients.push(self.coefficients[0]);
        for i in 1..n {
            let a = T::from_count(i) / degree;
            coefficients.push(self.coefficients[i - 1] * a + self.coefficients[i] * (T::one() - a));
        }
        coefficients.push(self.coefficients[n - 1]);
        Self::new(coefficients)
    }

    fn elevated_to(&self, degree: usize) -> Self {
        let mut p = self.clone();
        while p.degree() < degree {
            p = p.elevated();
        }
        p
    }

    /// Product of two polynomials, its degree is the sum of both degrees
    /// `c[k] = sum(C(m, i) C(n, j) / C(m + n, k) a[i] b[j])` over `i + j = k`
    pub fn product(&self, other: &Self) -> Self {
        let m = self.degree();
        let n = other.degree();
        let mut binom = Binomial::new();
        let mut coefficients = vec![T::zero(); m + n + 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            let ci = binom.get(m, i);
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += ci * binom.get(n, j) * *a * *b;
            }
        }
        for (k, c) in coefficients.iter_mut().enumerate() {
            *c /= binom.get(m + n, k);
        }
        Self::new(coefficients)
    }

    pub fn sum(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn difference(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(T, T) -> T) -> Self {
        let degree = self.degree().max(other.degree());
        let a = self.elevated_to(degree);
        let b = other.elevated_to(degree);
        Self::new(
            a.coefficients
                .iter()
                .zip(b.coefficients.iter())
                .map(|(x, y)| f(*x, *y))
                .collect(),
        )
    }
}

fn de_casteljau<T: FloatingPoint, P: ControlPoint<T>>(points: &[P], t: T) -> P {
    let mut work = points.to_vec();
    let n = work.len();
    for level in 1..n {
        for i in 0..(n - level) {
            work[i] = work[i].lerp(&work[i + 1], t);
        }
    }
    work[0].clone()
}

fn elevate<T: FloatingPoint, P: ControlPoint<T>>(points: &[P]) -> Vec<P> {
    let n = points.len();
    let degree = T::from_count(n);
    let mut elevated = Vec::with_capacity(n + 1);
    elevated.push(points[0].clone());
    for i in 1..n {
        let a = T::from_count(i) / degree;
        elevated.push(points[i].lerp(&points[i - 1], a));
    }
    elevated.push(points[n - 1].clone());
    elevated
}
