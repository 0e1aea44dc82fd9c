use std::ops::Index;

use nalgebra::convert;
use simba::scalar::SupersetOf;

use crate::misc::{CurveError, FloatingPoint, Reversible};

use super::KnotMultiplicity;

/// Knot vector representation
/// A non-decreasing sequence of parameters partitioning the domain of a curve into spans
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnotVector<T>(Vec<T>);

impl<T: FloatingPoint> KnotVector<T> {
    /// Wrap knots without validation
    pub fn new(knots: Vec<T>) -> Self {
        Self(knots)
    }

    /// Create a knot vector, checking that the knots never decrease
    /// # Failures
    /// - if a knot is smaller than its predecessor (or not comparable, e.g. NaN)
    ///
    /// # Example
    /// ```
    /// use knotwork::prelude::*;
    /// assert!(KnotVector::try_new(vec![0., 0., 1., 2., 2.]).is_ok());
    /// assert!(KnotVector::try_new(vec![0., 2., 1.]).is_err());
    /// ```
    pub fn try_new(knots: Vec<T>) -> anyhow::Result<Self> {
        if let Some(index) = knots
            .windows(2)
            .position(|w| !(w[0] <= w[1]))
            .map(|i| i + 1)
        {
            anyhow::bail!(CurveError::NonMonotonicKnots { index });
        }
        Ok(Self(knots))
    }

    /// Create a clamped uniform knot vector for `count` control points
    /// The interior knots are the integers `1..count - degree`
    /// # Example
    /// ```
    /// use knotwork::prelude::KnotVector;
    /// let knots: KnotVector<f64> = KnotVector::clamped_uniform(5, 2);
    /// assert_eq!(knots.to_vec(), vec![0., 0., 0., 1., 2., 3., 3., 3.]);
    /// ```
    pub fn clamped_uniform(count: usize, degree: usize) -> Self {
        let spans = count.saturating_sub(degree).max(1);
        let mut knots = Vec::with_capacity(count + degree + 1);
        knots.extend(std::iter::repeat_n(T::zero(), degree + 1));
        knots.extend((1..spans).map(T::from_count));
        knots.extend(std::iter::repeat_n(T::from_count(spans), degree + 1));
        Self(knots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.0.clone()
    }

    pub fn first(&self) -> T {
        self.0[0]
    }

    pub fn last(&self) -> T {
        self.0[self.0.len() - 1]
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Get the domain of the knot vector by degree
    pub fn domain(&self, degree: usize) -> (T, T) {
        (self.0[degree], self.0[self.0.len() - 1 - degree])
    }

    pub fn clamp(&self, degree: usize, u: T) -> T {
        let (min, max) = self.domain(degree);
        u.clamp(min, max)
    }

    /// Returns the index of the last knot less than or equal to `u`
    pub fn floor(&self, u: T) -> Option<usize> {
        self.0.partition_point(|t| *t <= u).checked_sub(1)
    }

    /// Add a knot after any equal knots and return its index
    pub fn add(&mut self, u: T) -> usize {
        let index = self.0.partition_point(|t| *t <= u);
        self.0.insert(index, u);
        index
    }

    /// Replace `u` with an existing knot lying within machine epsilon of it
    pub fn snap(&self, u: T) -> T {
        self.0
            .iter()
            .find(|t| (**t - u).abs() <= T::default_epsilon())
            .copied()
            .unwrap_or(u)
    }

    /// Get the multiplicity of each distinct knot
    /// # Example
    /// ```
    /// use knotwork::prelude::KnotVector;
    /// let knots = KnotVector::new(vec![0., 0., 0., 1., 2., 3., 3., 3.]);
    /// let knot_multiplicity = knots.multiplicity();
    /// assert_eq!(knot_multiplicity[0].multiplicity(), 3);
    /// assert_eq!(knot_multiplicity[1].multiplicity(), 1);
    /// assert_eq!(knot_multiplicity[2].multiplicity(), 1);
    /// assert_eq!(knot_multiplicity[3].multiplicity(), 3);
    /// assert_eq!(knot_multiplicity[3].start(), 5);
    /// ```
    pub fn multiplicity(&self) -> Vec<KnotMultiplicity<T>> {
        let mut mult: Vec<KnotMultiplicity<T>> = vec![];
        for (i, knot) in self.0.iter().enumerate() {
            match mult.last_mut() {
                Some(current) if (*knot - current.knot()).abs() <= T::default_epsilon() => {
                    current.increment();
                }
                _ => mult.push(KnotMultiplicity::new(*knot, 1, i)),
            }
        }
        mult
    }

    /// Number of knots equal to `u`
    pub fn multiplicity_of(&self, u: T) -> usize {
        self.0
            .iter()
            .filter(|t| (**t - u).abs() <= T::default_epsilon())
            .count()
    }

    /// Check if the knot vector is clamped
    /// `clamped` means the first and last knots have a multiplicity greater than the degree
    /// e.g. [0, 0, 0, 1, 2, 3, 3, 3] with degree 2 is clamped
    pub fn is_clamped(&self, degree: usize) -> bool {
        let multiplicity = self.multiplicity();
        match (multiplicity.first(), multiplicity.last()) {
            (Some(start), Some(end)) => {
                start.multiplicity() > degree && end.multiplicity() > degree
            }
            _ => false,
        }
    }

    /// Find the knot span index by binary search
    /// Returns `i` with `knots[i] <= u < knots[i + 1]`.
    /// Parameters below the domain map to `degree`, parameters at or above the end of the domain
    /// map to the last span `n - 1` (`n` being the number of control points).
    ///
    /// # Example
    /// ```
    /// use knotwork::prelude::KnotVector;
    /// let knots = KnotVector::new(vec![0., 0., 0., 1., 2., 3., 4., 4., 5., 5., 5.]);
    /// assert_eq!(knots.find_span(2, 2.5), 4);
    /// assert_eq!(knots.find_span(2, 0.5), 2);
    /// assert_eq!(knots.find_span(2, 4.9), 7);
    /// assert_eq!(knots.find_span(2, 5.), 7);
    /// ```
    pub fn find_span(&self, degree: usize, u: T) -> usize {
        let n = self.len() - degree - 1;

        // end knots may repeat inside the domain indices, pick the non-empty span next to them
        if u >= self[n] {
            return (self.0.partition_point(|t| *t < self[n]) - 1).max(degree);
        }

        if u <= self[degree] {
            return (self.0.partition_point(|t| *t <= self[degree]) - 1).min(n - 1);
        }

        // binary search
        let mut low = degree;
        let mut high = n;
        let mut mid = (low + high) / 2;
        while u < self[mid] || u >= self[mid + 1] {
            if u < self[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }

        mid
    }

    /// Find the knot span index for knot insertion
    /// Identical to `find_span` inside the domain, but returns `n` (one past the last span)
    /// at the end of the domain so that the end can be clamped by insertion.
    ///
    /// # Failures
    /// - if `u` lies outside of `[knots[0], knots[last]]`
    pub fn clamping_find_span(&self, degree: usize, u: T) -> anyhow::Result<usize> {
        anyhow::ensure!(
            u >= self.first() && u <= self.last(),
            CurveError::OutOfKnotRange {
                parameter: u.as_f64(),
                first: self.first().as_f64(),
                last: self.last().as_f64(),
            }
        );

        let n = self.len() - degree - 1;
        if u >= self[n] {
            Ok(n)
        } else if u < self[degree] {
            Ok(degree)
        } else {
            // last index with knots[i] <= u, always inside [degree, n - 1] here
            Ok(self.0.partition_point(|t| *t <= u) - 1)
        }
    }

    /// Compute the non-vanishing basis functions at `u` in the span `knot_span_index`
    /// by the triangular table of the Cox-de Boor recurrence
    /// A vanishing knot difference makes the corresponding term zero.
    pub fn basis_functions(&self, knot_span_index: usize, u: T, degree: usize) -> Vec<T> {
        let mut basis_functions = vec![T::zero(); degree + 1];
        let mut left = vec![T::zero(); degree + 1];
        let mut right = vec![T::zero(); degree + 1];

        basis_functions[0] = T::one();

        for j in 1..=degree {
            left[j] = u - self[knot_span_index + 1 - j];
            right[j] = self[knot_span_index + j] - u;
            let mut saved = T::zero();

            for r in 0..j {
                let denom = right[r + 1] + left[j - r];
                let temp = if denom != T::zero() {
                    basis_functions[r] / denom
                } else {
                    T::zero()
                };
                basis_functions[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }

            basis_functions[j] = saved;
        }

        basis_functions
    }

    /// Evaluate the basis function `N(i, degree)` at `u` by the plain recursive definition
    /// Exponential in the degree, only meant as a reference for `basis_functions`.
    pub fn basis_function_recursive(&self, i: usize, degree: usize, u: T) -> T {
        if degree == 0 {
            return if self[i] <= u && u < self[i + 1] {
                T::one()
            } else {
                T::zero()
            };
        }

        let blend = |num: T, denom: T, value: T| {
            if denom != T::zero() {
                num / denom * value
            } else {
                T::zero()
            }
        };

        let left = blend(
            u - self[i],
            self[i + degree] - self[i],
            self.basis_function_recursive(i, degree - 1, u),
        );
        let right = blend(
            self[i + degree + 1] - u,
            self[i + degree + 1] - self[i + 1],
            self.basis_function_recursive(i + 1, degree - 1, u),
        );
        left + right
    }

    /// Cast the knot vector to another floating point type
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> KnotVector<F> {
        KnotVector::new(self.0.iter().map(|v| convert(*v)).collect())
    }
}

impl<T> Index<usize> for KnotVector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> FromIterator<T> for KnotVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: FloatingPoint> Reversible for KnotVector<T> {
    /// Mirror the knot spacing while keeping the first knot in place
    /// # Example
    /// ```
    /// use knotwork::prelude::*;
    /// let knots = KnotVector::new(vec![0., 0., 0., 1., 2., 2.5, 3.5, 4.0, 4.0]);
    /// let reversed = knots.reversed();
    /// assert_eq!(reversed.to_vec(), vec![0.0, 0.0, 0.5, 1.5, 2.0, 3.0, 4.0, 4.0, 4.0]);
    /// ```
    fn reversed(&self) -> Self {
        let mut knots = Vec::with_capacity(self.len());
        knots.push(self.first());
        for w in self.0.windows(2).rev() {
            let prev = knots[knots.len() - 1];
            knots.push(prev + (w[1] - w[0]));
        }
        Self(knots)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::KnotVector;
    use crate::misc::CurveError;

    fn sample() -> KnotVector<f64> {
        KnotVector::new(vec![0., 0., 0., 1., 2., 3., 4., 4., 5., 5., 5.])
    }

    #[test]
    fn find_span_examples() {
        let knots = sample();
        assert_eq!(knots.find_span(2, 2.5), 4);
        assert_eq!(knots.find_span(2, 0.5), 2);
        assert_eq!(knots.find_span(2, 4.9), 7);
        assert_eq!(knots.find_span(2, 5.), 7);
        assert_eq!(knots.find_span(2, 4.), 7);
        assert_eq!(knots.find_span(2, 0.), 2);
        assert_eq!(knots.find_span(2, -1.), 2);
        assert_eq!(knots.find_span(2, 7.), 7);

        // a domain end knot repeated inside the domain indices
        let knots = KnotVector::new(vec![0., 1., 2., 2., 2., 3., 4., 5., 5., 6., 7.]);
        assert_eq!(knots.find_span(2, 2.), 4);
        assert_eq!(knots.find_span(2, 5.), 6);
    }

    #[test]
    fn clamping_find_span_boundaries() {
        let knots = sample();
        assert_eq!(knots.clamping_find_span(2, 5.).unwrap(), 8);
        assert_eq!(knots.clamping_find_span(2, 2.5).unwrap(), 4);
        assert_eq!(knots.clamping_find_span(2, 0.).unwrap(), 2);

        let err = knots.clamping_find_span(2, 5.5).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CurveError>(),
            Some(CurveError::OutOfKnotRange { .. })
        ));
        assert!(knots.clamping_find_span(2, -0.1).is_err());

        // unclamped end: the span past the domain keeps the end knot as its left boundary
        let open = KnotVector::new(vec![0., 1., 2., 3., 4., 5., 6., 7.]);
        assert_eq!(open.clamping_find_span(2, 5.).unwrap(), 5);
        assert_eq!(open.find_span(2, 5.), 4);
    }

    #[test]
    fn basis_functions_match_recursive_definition() {
        let knots = sample();
        let degree = 2;
        for i in 0..50 {
            let u = 5. * (i as f64) / 50.;
            let span = knots.find_span(degree, u);
            let basis = knots.basis_functions(span, u, degree);
            for (j, b) in basis.iter().enumerate() {
                let reference = knots.basis_function_recursive(span - degree + j, degree, u);
                assert_relative_eq!(*b, reference, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn partition_of_unity() {
        let knots = KnotVector::new(vec![0., 0., 0., 0., 0.5, 1.5, 1.5, 3., 3., 3., 3.]);
        let degree = 3;
        for i in 1..100 {
            let u = 3. * (i as f64) / 100.;
            let span = knots.find_span(degree, u);
            let basis = knots.basis_functions(span, u, degree);
            assert_relative_eq!(basis.iter().sum::<f64>(), 1., epsilon = 1e-12);
            assert!(basis.iter().all(|b| *b >= -1e-12 && *b <= 1. + 1e-12));
        }
    }

    #[test]
    fn zero_denominators_contribute_nothing() {
        // a degree 1 span adjacent to a double knot
        let knots = KnotVector::new(vec![0., 0., 1., 1., 2., 2.]);
        let span = knots.find_span(1, 1.);
        let basis = knots.basis_functions(span, 1., 1);
        assert!(basis.iter().all(|b: &f64| b.is_finite()));
        assert_relative_eq!(basis.iter().sum::<f64>(), 1.);
    }

    #[test]
    fn multiplicity() {
        let knots = sample();
        let mult = knots.multiplicity();
        assert_eq!(mult.len(), 6);
        assert_eq!(mult[4].knot(), 4.);
        assert_eq!(mult[4].multiplicity(), 2);
        assert_eq!(mult[4].start(), 6);
        assert_eq!(mult[4].end(), 7);
        assert_eq!(knots.multiplicity_of(5.), 3);
        assert_eq!(knots.multiplicity_of(2.5), 0);
        assert!(knots.is_clamped(2));
        assert!(!knots.is_clamped(3));
    }

    #[test]
    fn non_monotonic_knots() {
        let err = KnotVector::try_new(vec![0., 1., 3., 2., 4.]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CurveError>(),
            Some(&CurveError::NonMonotonicKnots { index: 3 })
        );
        assert!(KnotVector::try_new(vec![0., f64::NAN, 1.]).is_err());
    }

    #[test]
    fn add_and_floor() {
        let mut knots = KnotVector::new(vec![0., 0., 1., 2., 2.]);
        assert_eq!(knots.floor(1.5), Some(2));
        assert_eq!(knots.floor(-1.), None);
        assert_eq!(knots.add(1.), 3);
        assert_eq!(knots.to_vec(), vec![0., 0., 1., 1., 2., 2.]);
    }

    #[test]
    fn cast_to_single_precision() {
        let knots: KnotVector<f32> = sample().cast();
        assert_eq!(knots.len(), 11);
        assert_eq!(knots.domain(2), (0f32, 5f32));
        assert_eq!(knots.multiplicity_of(4f32), 2);
    }
}
