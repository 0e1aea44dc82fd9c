#![allow(clippy::needless_range_loop)]

mod curve;
mod knot;
mod misc;

pub mod prelude {
    pub use crate::curve::*;
    pub use crate::knot::*;
    pub use crate::misc::*;
}
