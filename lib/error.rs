//! Error type shared by every fallible operation in the crate.

use thiserror::Error;
use crate::transition::TransitionOrder;

/// Convenience alias for results carrying an [`IonError`].
pub type IonResult<T> = Result<T, IonError>;

/// Returned when level data, quantum numbers, or transition requests are
/// inconsistent.
///
/// Every variant is produced at construction time of the offending object, and
/// repeating a construction with the same inputs reproduces the same error.
#[derive(Debug, Error)]
pub enum IonError {
    /// A floating-point angular momentum that is not (within tolerance) an
    /// integer or half-integer, or a negative total angular momentum.
    #[error("invalid angular momentum {0}: expected a non-negative integer or half-integer")]
    InvalidAngularMomentum(f64),

    /// A projection quantum number incompatible with its total.
    #[error("invalid projection m = {proj} for total angular momentum {total}")]
    InvalidProjection { total: String, proj: String },

    /// `|ΔL|` is neither 1 nor 2.
    #[error("unsupported transition order: |ΔL| = {0}")]
    UnsupportedTransitionOrder(u32),

    /// The transition order is recognized but its coupling strength is not
    /// implemented.
    #[error("Rabi frequency for {0:?} transitions is not implemented")]
    UnimplementedTransitionOrder(TransitionOrder),

    /// The upper level has no decay path to the lower level.
    #[error("no decay path from {upper} to {lower} in the branching-ratio table")]
    MissingBranchingRatio { upper: String, lower: String },

    /// A branching ratio outside `[0, 1]`.
    #[error("branching ratio {upper} -> {lower} = {ratio} is outside [0, 1]")]
    InvalidBranchingRatio { upper: String, lower: String, ratio: f64 },

    /// Branching ratios out of a single upper level sum to more than 1.
    #[error("branching ratios out of {upper} sum to {total} > 1")]
    BranchingRatioOverflow { upper: String, total: f64 },

    /// A library lists the same decay path twice.
    #[error("duplicate branching ratio {upper} -> {lower}")]
    DuplicateBranchingRatio { upper: String, lower: String },

    /// Two levels with exactly equal energies were passed to a transition.
    #[error("levels {a} and {b} have identical energies; cannot order transition")]
    DegenerateEnergyOrdering { a: String, b: String },

    /// A transition between a fine-structure and a hyperfine-structure
    /// sublevel.
    #[error("cannot couple {fine} (fine structure) to {hyperfine} (hyperfine structure)")]
    MixedStructure { fine: String, hyperfine: String },

    /// An orbital angular momentum letter that is not recognized.
    #[error("invalid orbital label {0:?}")]
    InvalidOrbitalLabel(String),

    /// A hyperfine level record without a total angular momentum F.
    #[error("hyperfine level {0} is missing its F quantum number")]
    MissingHyperfineNumber(String),

    /// Two levels with the same name were added to one ion.
    #[error("duplicate level {0:?}")]
    DuplicateLevel(String),

    /// No level with the given name exists.
    #[error("unknown level {0:?}")]
    UnknownLevel(String),

    /// The named level exists but has no sublevel with the given projection.
    #[error("level {level:?} has no Zeeman sublevel m = {m}")]
    UnknownSublevel { level: String, m: String },

    /// No laser is registered under the given index.
    #[error("no laser registered at index {0}")]
    UnknownLaser(usize),

    /// Non-physical laser parameters.
    #[error("invalid laser: {0}")]
    InvalidLaser(&'static str),

    /// Degenerate polarization input.
    #[error("invalid polarization: {0}")]
    InvalidPolarization(&'static str),

    /// An experiment description is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A level selector string could not be parsed.
    #[error("malformed level selector {0:?}")]
    MalformedSelector(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<std::convert::Infallible> for IonError {
    fn from(never: std::convert::Infallible) -> Self { match never { } }
}
