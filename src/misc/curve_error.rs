/// Errors raised by curve construction and curve operations.
///
/// Fallible functions return `anyhow::Result`; the underlying error is always one of these,
/// so callers can recover the kind with `err.downcast_ref::<CurveError>()`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("too few control points for degree {degree}: got {control_points}")]
    TooFewControlPoints { degree: usize, control_points: usize },

    #[error("invalid number of knots, got {got}, expected {expected}")]
    KnotCountMismatch { got: usize, expected: usize },

    #[error("knot vector must be non-decreasing, violated at index {index}")]
    NonMonotonicKnots { index: usize },

    #[error("invalid number of weights, got {got}, expected {expected}")]
    WeightCountMismatch { got: usize, expected: usize },

    #[error("weight of control point {index} is zero")]
    ZeroWeight { index: usize },

    #[error("homogeneous point has a zero weight and cannot be projected")]
    ZeroHomogeneousWeight,

    #[error("cannot normalize a zero-length vector")]
    ZeroVector,

    #[error("parameter {parameter} is outside of the domain [{start}, {end}]")]
    OutOfDomain { parameter: f64, start: f64, end: f64 },

    #[error("parameter {parameter} is outside of the knot range [{first}, {last}]")]
    OutOfKnotRange { parameter: f64, first: f64, last: f64 },

    #[error("knot {knot} would reach multiplicity {multiplicity}, maximum is {max}")]
    MultiplicityExceeded {
        knot: f64,
        multiplicity: usize,
        max: usize,
    },

    #[error(
        "degree elevation requires end knot multiplicity {required}, got {start} at start and {end} at end"
    )]
    UnclampedEnds {
        required: usize,
        start: usize,
        end: usize,
    },

    #[error("knot domain [{start}, {end}] is empty")]
    EmptyDomain { start: f64, end: f64 },

    #[error("degree {degree} is not supported, at least {min} is required")]
    UnsupportedDegree { degree: usize, min: usize },

    #[error("no Bézier segments to compose")]
    NoSegments,

    #[error("invalid parameter range [{from}, {to}]")]
    InvalidRange { from: f64, to: f64 },

    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("periodic knot vector is degenerate: {reason}")]
    DegeneratePeriodicKnots { reason: String },
}
