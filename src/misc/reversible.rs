/// Types whose parameterization can be traversed in the opposite direction.
pub trait Reversible: Sized {
    /// Returns a copy running the other way round
    fn reversed(&self) -> Self;
}
