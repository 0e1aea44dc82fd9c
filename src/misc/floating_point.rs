use nalgebra::{convert, RealField};
use num_traits::ToPrimitive;

/// Scalar field of every curve in the crate (f32, f64)
pub trait FloatingPoint: RealField + ToPrimitive + Copy {
    /// Lift a `f64` constant into the scalar type
    fn constant(value: f64) -> Self {
        convert(value)
    }

    /// Lift a count or an index into the scalar type
    fn from_count(value: usize) -> Self {
        convert(value as f64)
    }

    /// Lossy conversion used to report values inside errors
    fn as_f64(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}
