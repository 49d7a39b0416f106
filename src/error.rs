//! Error type shared by path scanning, validation and leg construction.
//!
//! Every message is written for direct display to the person entering the
//! path description; the first violation in scan order aborts the whole
//! parse with no partial result.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PathError>;

/// Broad classification of a [`PathError`], for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A qualifier, repeat count, numeric or angle fragment could not be parsed.
    MalformedToken,
    /// Nesting, ordering or context rules were violated.
    StructuralViolation,
    /// A unit abbreviation did not match the unit table.
    UnresolvedUnit,
    /// The path description was empty.
    EmptyInput,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("Path has not been specified")]
    EmptyPath,

    #[error("Unexpected qualifier '{0}'")]
    UnexpectedQualifier(String),

    #[error("Unexpected '*' character")]
    UnexpectedStar,

    #[error("Unexpected repeat count in '{0}'")]
    BadRepeatCount(String),

    #[error("Nothing to repeat")]
    NothingToRepeat,

    #[error("Unexpected repeat multiplier")]
    BadRepeatItem,

    #[error("Malformed angle '{0}'")]
    MalformedAngle(String),

    #[error("Malformed value '{0}'")]
    MalformedValue(String),

    #[error("No units with abbreviation '{0}'")]
    UnknownUnit(String),

    #[error("Nested curve detected")]
    NestedCurve,

    #[error("BC not followed by angle, radius, and EC")]
    ShortCurve,

    #[error("EC was not preceded by BC")]
    UnexpectedEc,

    #[error("Value has no unit of measurement")]
    MissingUnit,

    #[error("Deflection not allowed within curve definition")]
    DeflectionInCurve,

    #[error("Extraneous angle inside curve definition")]
    ExtraneousAngle,

    #[error("More than 1 angle at the end of a straight")]
    DoubledAngle,

    #[error("Angle after EC makes no sense")]
    AngleAfterEc,

    #[error("Extraneous '/' character")]
    ExtraneousSlash,

    #[error("Misplaced '/' character")]
    MisplacedSlash,

    #[error("Counter-clockwise indicator detected outside curve definition")]
    ExtraneousCounterClockwise,

    #[error("Misplaced 'cc' characters")]
    MisplacedCounterClockwise,

    #[error("Central angle detected outside curve definition")]
    ExtraneousCentralAngle,

    #[error("Central angle does not follow immediately after BC")]
    MisplacedCentralAngle,

    #[error("Miss-Connect or Omit-Point is not preceded by a distance")]
    QualifierWithoutDistance,

    #[error("Circular arc does not have an EC")]
    UnclosedCurve,

    #[error("No connection legs")]
    NoLegs,

    #[error("Angle does not follow BC")]
    CurveWithoutAngle,

    #[error("Radius does not follow angle")]
    CurveWithoutRadius,
}

impl PathError {
    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PathError::EmptyPath => ErrorKind::EmptyInput,

            PathError::UnexpectedQualifier(_)
            | PathError::UnexpectedStar
            | PathError::BadRepeatCount(_)
            | PathError::NothingToRepeat
            | PathError::BadRepeatItem
            | PathError::MalformedAngle(_)
            | PathError::MalformedValue(_) => ErrorKind::MalformedToken,

            PathError::UnknownUnit(_) => ErrorKind::UnresolvedUnit,

            _ => ErrorKind::StructuralViolation,
        }
    }
}
