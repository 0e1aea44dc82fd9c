/// A distinct knot value together with its run inside a knot vector.
#[derive(Clone, Debug, PartialEq)]
pub struct KnotMultiplicity<T> {
    knot: T,
    multiplicity: usize,
    /// index of the first occurrence in the knot vector
    start: usize,
}

impl<T: Copy> KnotMultiplicity<T> {
    pub fn new(knot: T, multiplicity: usize, start: usize) -> Self {
        Self {
            knot,
            multiplicity,
            start,
        }
    }

    pub fn knot(&self) -> T {
        self.knot
    }

    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }

    /// Index of the first occurrence
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the last occurrence
    pub fn end(&self) -> usize {
        self.start + self.multiplicity - 1
    }

    pub(crate) fn increment(&mut self) {
        self.multiplicity += 1;
    }
}
