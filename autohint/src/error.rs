//! Error types associated with hinting.

use core::fmt;
use font_types::GlyphId;

/// Describes the reason an outline was rejected.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InvalidOutline {
    /// The font reported zero units per em.
    NoUnitsPerEm,
    /// A contour end index was beyond the number of points.
    ContourEndOutOfRange(u16),
    /// Contour end indices must be strictly increasing.
    UnorderedContourEnd(u16),
    /// The last contour must end at the last point.
    PointCountMismatch(usize),
    /// The outline has more points than can be indexed.
    TooManyPoints(usize),
    /// A point lies outside the 16-bit font unit coordinate space.
    CoordinateOutOfRange(usize),
    /// An anchor point index of a composite component was out of range.
    AnchorPoint(GlyphId, u16),
}

impl fmt::Display for InvalidOutline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoUnitsPerEm => write!(f, "font has no usable size metrics"),
            Self::ContourEndOutOfRange(ix) => {
                write!(f, "contour end point {ix} is out of range")
            }
            Self::UnorderedContourEnd(ix) => {
                write!(f, "contour end point {ix} does not follow the previous contour")
            }
            Self::PointCountMismatch(count) => {
                write!(f, "contours do not cover all {count} points")
            }
            Self::TooManyPoints(count) => write!(f, "outline has too many points ({count})"),
            Self::CoordinateOutOfRange(ix) => {
                write!(f, "point {ix} is outside the font unit coordinate range")
            }
            Self::AnchorPoint(gid, ix) => {
                write!(f, "invalid anchor point index ({ix}) for component {gid}")
            }
        }
    }
}

/// Errors that may occur when hinting glyphs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HintError {
    /// The outline topology or size metrics were malformed.
    InvalidArgument(InvalidOutline),
    /// Exceeded memory limits when growing the hinting buffers.
    OutOfMemory,
    /// The glyph format is not an outline or a composite.
    Unimplemented(GlyphId),
    /// Exceeded the composite nesting limit.
    RecursionLimitExceeded(GlyphId),
    /// The requested glyph was not provided by the source.
    GlyphNotFound(GlyphId),
}

impl From<InvalidOutline> for HintError {
    fn from(value: InvalidOutline) -> Self {
        Self::InvalidArgument(value)
    }
}

impl fmt::Display for HintError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidArgument(e) => write!(f, "invalid argument: {e}"),
            Self::OutOfMemory => write!(f, "exceeded memory limits"),
            Self::Unimplemented(gid) => {
                write!(f, "glyph {gid} has a format that cannot be hinted")
            }
            Self::RecursionLimitExceeded(gid) => write!(
                f,
                "Recursion limit ({}) exceeded when loading composite component {gid}",
                super::hinter::COMPOSITE_RECURSION_LIMIT,
            ),
            Self::GlyphNotFound(gid) => write!(f, "Glyph {gid} was not found in the source"),
        }
    }
}

impl std::error::Error for HintError {}

/// Result type for hinting operations.
pub type Result<T> = core::result::Result<T, HintError>;
