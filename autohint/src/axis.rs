//! Segments and edges for one axis of an outline.

use super::{
    metrics::BlueTarget,
    outline::{Direction, Orientation, Point, UvSource},
};
use alloc::vec::Vec;

/// Either horizontal or vertical.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) enum Axis {
    /// X coordinates, i.e. vertical segments and edges.
    #[default]
    Horizontal,
    /// Y coordinates, i.e. horizontal segments and edges.
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Mapping of font unit coordinates to `(u, v)` for segment
    /// detection, where `u` runs along the axis.
    pub fn font_uv(self) -> UvSource {
        match self {
            Self::Horizontal => UvSource::FontXy,
            Self::Vertical => UvSource::FontYx,
        }
    }

    /// Mapping of hinted and original scaled coordinates to `(u, v)`.
    pub fn hinted_uv(self) -> UvSource {
        match self {
            Self::Horizontal => UvSource::HintedX,
            Self::Vertical => UvSource::HintedY,
        }
    }

    pub fn touch_flag(self) -> u8 {
        match self {
            Self::Horizontal => Point::TOUCH_X,
            Self::Vertical => Point::TOUCH_Y,
        }
    }

    /// Returns the font unit coordinate along this axis.
    pub fn font_coord(self, point: &Point) -> i32 {
        match self {
            Self::Horizontal => point.fx,
            Self::Vertical => point.fy,
        }
    }

    /// Returns the scaled but unhinted coordinate along this axis.
    pub fn original_coord(self, point: &Point) -> i32 {
        match self {
            Self::Horizontal => point.ox,
            Self::Vertical => point.oy,
        }
    }

    /// Stores a hinted coordinate and marks the point as touched.
    pub fn store(self, point: &mut Point, pos: i32) {
        match self {
            Self::Horizontal => point.x = pos,
            Self::Vertical => point.y = pos,
        }
        point.flags |= self.touch_flag();
    }

    /// The direction that counts as "up" when voting on edge direction.
    pub fn up_dir(self) -> Direction {
        match self {
            Self::Horizontal => Direction::Up,
            Self::Vertical => Direction::Right,
        }
    }
}

/// Segments and edges for one axis of an outline.
#[derive(Clone, Default, Debug)]
pub(crate) struct AxisHints {
    pub axis: Axis,
    /// Depends on axis and outline orientation.
    pub major_dir: Direction,
    /// Collection of segments for the axis.
    pub segments: Vec<Segment>,
    /// Collection of edges for the axis, sorted by position.
    pub edges: Vec<Edge>,
}

impl AxisHints {
    #[cfg(test)]
    pub fn new(axis: Axis, orientation: Orientation) -> Self {
        let mut hints = Self::default();
        hints.reset(axis, orientation);
        hints
    }

    pub fn reset(&mut self, axis: Axis, orientation: Orientation) {
        self.axis = axis;
        self.major_dir = match (axis, orientation) {
            (Axis::Horizontal, Orientation::CounterClockwise) => Direction::Down,
            (Axis::Vertical, Orientation::CounterClockwise) => Direction::Right,
            (Axis::Horizontal, Orientation::Clockwise) => Direction::Up,
            (Axis::Vertical, Orientation::Clockwise) => Direction::Left,
        };
        self.segments.clear();
        self.edges.clear();
    }

    /// Inserts the given edge into the sorted edge list and returns its
    /// index.
    ///
    /// Edges with equal positions keep their insertion order.
    pub fn insert_edge(&mut self, edge: Edge) -> usize {
        let ix = self.edges.partition_point(|other| other.fpos <= edge.fpos);
        self.edges.insert(ix, edge);
        ix
    }

    /// Links the given segment and edge.
    pub fn append_segment_to_edge(&mut self, segment_ix: usize, edge_ix: usize) {
        let edge = &mut self.edges[edge_ix];
        let first_ix = edge.first_ix;
        let last_ix = edge.last_ix;
        edge.last_ix = segment_ix as u16;
        let segment = &mut self.segments[segment_ix];
        segment.edge_next_ix = Some(first_ix);
        self.segments[last_ix as usize].edge_next_ix = Some(segment_ix as u16);
    }

    /// Returns an iterator over the indices of the segments in the ring of
    /// the given edge.
    pub fn edge_segments(&self, edge_ix: usize) -> EdgeSegments<'_> {
        let first_ix = self.edges.get(edge_ix).map(|edge| edge.first_ix);
        EdgeSegments {
            segments: &self.segments,
            first_ix,
            next_ix: first_ix,
            remaining: self.segments.len(),
        }
    }
}

/// Walks the segment ring of an edge.
pub(crate) struct EdgeSegments<'a> {
    segments: &'a [Segment],
    first_ix: Option<u16>,
    next_ix: Option<u16>,
    // Guards against malformed rings
    remaining: usize,
}

impl Iterator for EdgeSegments<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let ix = self.next_ix?;
        self.remaining = self.remaining.checked_sub(1)?;
        let next_ix = self.segments.get(ix as usize)?.edge_next_ix;
        self.next_ix = next_ix.filter(|next| Some(*next) != self.first_ix);
        Some(ix as usize)
    }
}

/// Sequence of points with a single dominant direction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Segment {
    /// Flags describing the properties of the segment.
    pub flags: u8,
    /// Dominant direction of the segment.
    pub dir: Direction,
    /// Position of the segment in font units.
    pub pos: i32,
    /// Minimum coordinate of the segment.
    pub min_coord: i32,
    /// Maximum coordinate of the segment.
    pub max_coord: i32,
    /// Used during stem matching.
    pub score: i32,
    /// Index of best candidate for a stem link.
    pub link_ix: Option<u16>,
    /// Index of best candidate for a serif link.
    pub serif_ix: Option<u16>,
    /// Index of first point in the outline.
    pub first_ix: u16,
    /// Index of last point in the outline.
    pub last_ix: u16,
    /// Index of edge that is associated with the segment.
    pub edge_ix: Option<u16>,
    /// Index of next segment in edge's segment list.
    pub edge_next_ix: Option<u16>,
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            flags: 0,
            dir: Direction::None,
            pos: 0,
            min_coord: 0,
            max_coord: 0,
            score: Self::MAX_SCORE,
            link_ix: None,
            serif_ix: None,
            first_ix: 0,
            last_ix: 0,
            edge_ix: None,
            edge_next_ix: None,
        }
    }
}

/// Segment flags.
///
/// Note: these are the same as edge flags.
impl Segment {
    pub const ROUND: u8 = 1;
    pub const SERIF: u8 = 2;
    pub const DONE: u8 = 4;
}

impl Segment {
    /// Initial link score; anything found is better.
    pub const MAX_SCORE: i32 = 32000;

    pub fn first(&self) -> usize {
        self.first_ix as usize
    }

    pub fn last(&self) -> usize {
        self.last_ix as usize
    }

    pub fn edge<'a>(&self, edges: &'a [Edge]) -> Option<&'a Edge> {
        edges.get(self.edge_ix.map(|ix| ix as usize)?)
    }

    pub fn link<'a>(&self, segments: &'a [Segment]) -> Option<&'a Segment> {
        segments.get(self.link_ix.map(|ix| ix as usize)?)
    }

    pub fn serif<'a>(&self, segments: &'a [Segment]) -> Option<&'a Segment> {
        segments.get(self.serif_ix.map(|ix| ix as usize)?)
    }
}

/// Sequence of segments used for grid-fitting.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) struct Edge {
    /// Original, unscaled position in font units.
    pub fpos: i32,
    /// Original, scaled position.
    pub opos: i32,
    /// Current position.
    pub pos: i32,
    /// Edge flags.
    pub flags: u8,
    /// Edge direction.
    pub dir: Direction,
    /// Blue zone assigned to this edge.
    pub blue: Option<BlueTarget>,
    /// Scaled position of the assigned blue zone.
    pub blue_edge: Option<i32>,
    /// Index of linked edge.
    pub link_ix: Option<u16>,
    /// Index of primary edge for serif.
    pub serif_ix: Option<u16>,
    /// Index of first segment in edge.
    pub first_ix: u16,
    /// Index of last segment in edge.
    pub last_ix: u16,
}

/// Edge flags.
///
/// Note: these are the same as segment flags.
impl Edge {
    pub const ROUND: u8 = Segment::ROUND;
    pub const SERIF: u8 = Segment::SERIF;
    pub const DONE: u8 = Segment::DONE;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(fpos: i32) -> Edge {
        Edge {
            fpos,
            ..Default::default()
        }
    }

    #[test]
    fn insert_edges_sorted() {
        let mut axis = AxisHints::new(Axis::Vertical, Orientation::Clockwise);
        for fpos in [50, 10, 30, 30, 70, -5] {
            axis.insert_edge(edge(fpos));
        }
        let positions = axis.edges.iter().map(|e| e.fpos).collect::<Vec<_>>();
        assert_eq!(positions, [-5, 10, 30, 30, 50, 70]);
        // Equal positions go after the existing ones
        assert_eq!(axis.insert_edge(edge(30)), 4);
    }

    #[test]
    fn segment_ring() {
        let mut axis = AxisHints::new(Axis::Horizontal, Orientation::Clockwise);
        axis.segments.resize(4, Segment::default());
        axis.insert_edge(Edge {
            first_ix: 1,
            last_ix: 1,
            ..Default::default()
        });
        axis.segments[1].edge_next_ix = Some(1);
        axis.append_segment_to_edge(3, 0);
        axis.append_segment_to_edge(0, 0);
        let ring = axis.edge_segments(0).collect::<Vec<_>>();
        assert_eq!(ring, [1, 3, 0]);
        assert!(axis.edge_segments(5).next().is_none());
    }

    #[test]
    fn axis_mappings() {
        let mut point = Point {
            fx: 1,
            fy: 2,
            ox: 3,
            oy: 4,
            ..Default::default()
        };
        assert_eq!(Axis::Horizontal.font_coord(&point), 1);
        assert_eq!(Axis::Vertical.original_coord(&point), 4);
        Axis::Vertical.store(&mut point, 128);
        assert_eq!(point.y, 128);
        assert_eq!(point.flags, Point::TOUCH_Y);
        let hints = AxisHints::new(Axis::Horizontal, Orientation::CounterClockwise);
        assert_eq!(hints.major_dir, Direction::Down);
    }
}
