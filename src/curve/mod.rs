pub mod bernstein;
pub mod bspline_curve;
pub mod complex_rational_bspline_curve;
pub mod curve_kind;
pub mod periodic_bspline_curve;
pub mod periodic_rational_bspline_curve;
pub mod rational_bspline_curve;
pub use bernstein::*;
pub use bspline_curve::*;
pub use complex_rational_bspline_curve::*;
pub use curve_kind::*;
pub use periodic_bspline_curve::*;
pub use periodic_rational_bspline_curve::*;
pub use rational_bspline_curve::*;

#[cfg(test)]
mod tests;
