use crate::misc::FloatingPoint;

/// Binomial coefficients backed by a lazily grown Pascal triangle.
#[derive(Clone, Debug, Default)]
pub struct Binomial<T> {
    rows: Vec<Vec<T>>,
}

impl<T: FloatingPoint> Binomial<T> {
    pub fn new() -> Self {
        Self { rows: vec![] }
    }

    /// Returns `n choose k`, zero when `k > n`.
    pub fn get(&mut self, n: usize, k: usize) -> T {
        if k > n {
            return T::zero();
        }
        self.grow(n);
        self.rows[n][k]
    }

    fn grow(&mut self, n: usize) {
        while self.rows.len() <= n {
            let row = match self.rows.last() {
                None => vec![T::one()],
                Some(prev) => {
                    let mut row = Vec::with_capacity(prev.len() + 1);
                    row.push(T::one());
                    row.extend(prev.windows(2).map(|w| w[0] + w[1]));
                    row.push(T::one());
                    row
                }
            };
            self.rows.push(row);
        }
    }
}
