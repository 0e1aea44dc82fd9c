pub mod binomial;
pub mod control_point;
pub mod curve_error;
pub mod floating_point;
pub mod homogeneous;
pub mod reversible;
pub mod rotate;

pub use binomial::*;
pub use control_point::*;
pub use curve_error::*;
pub use floating_point::*;
pub use homogeneous::*;
pub use reversible::*;
pub use rotate::*;
