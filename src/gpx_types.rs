use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::geo::GeoPoint;

/// A parsed GPX document.
///
/// Everything outside `<trkseg>` is kept as raw XML events so it can be
/// written back unchanged; only track segments are broken down further.
#[derive(Debug, Default)]
pub struct GpxDocument {
    pub nodes: Vec<GpxNode>,
    pub has_declaration: bool,
}

impl GpxDocument {
    pub fn segments(&self) -> impl Iterator<Item = &GpxSegment> {
        self.nodes.iter().filter_map(|node| match node {
            GpxNode::Segment(seg) => Some(seg),
            GpxNode::Raw(_) => None,
        })
    }

    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut GpxSegment> {
        self.nodes.iter_mut().filter_map(|node| match node {
            GpxNode::Segment(seg) => Some(seg),
            GpxNode::Raw(_) => None,
        })
    }

    pub fn point_count(&self) -> usize {
        self.segments().map(|s| s.point_count()).sum()
    }
}

#[derive(Debug)]
pub enum GpxNode {
    Raw(Event<'static>),
    Segment(GpxSegment),
}

/// A track segment (`<trkseg>`).
#[derive(Debug)]
pub struct GpxSegment {
    /// Index of the enclosing `<trk>` in document order.
    pub track_index: usize,
    /// Index of this segment within its track.
    pub segment_index: usize,
    pub start: BytesStart<'static>,
    /// `None` for a self-closing `<trkseg/>`.
    pub end: Option<BytesEnd<'static>>,
    pub children: Vec<SegmentChild>,
}

impl GpxSegment {
    pub fn points(&self) -> impl Iterator<Item = &GpxPoint> {
        self.children.iter().filter_map(|child| match child {
            SegmentChild::Point(pt) => Some(pt),
            SegmentChild::Other(_) => None,
        })
    }

    pub fn point_count(&self) -> usize {
        self.points().count()
    }

    pub fn positions(&self) -> Vec<GeoPoint> {
        self.points().map(|pt| pt.position).collect()
    }

    /// Drop every point whose ordinal is not listed in `keep`.
    /// `keep` must be ascending. Non-point children are left in place.
    pub fn retain_points(&mut self, keep: &[usize]) {
        let mut ordinal = 0;
        let mut wanted = keep.iter().copied().peekable();
        self.children.retain(|child| match child {
            SegmentChild::Other(_) => true,
            SegmentChild::Point(_) => {
                let retained = wanted.peek() == Some(&ordinal);
                if retained {
                    wanted.next();
                }
                ordinal += 1;
                retained
            }
        });
    }
}

#[derive(Debug)]
pub enum SegmentChild {
    Point(GpxPoint),
    Other(Event<'static>),
}

/// A track point (`<trkpt>`).
#[derive(Debug, Clone)]
pub struct GpxPoint {
    pub position: GeoPoint,
    pub ele: Option<f64>,
    pub time: Option<String>,
    /// Whitespace directly before the element; dropped with the point.
    pub lead: Option<Event<'static>>,
    /// The element itself, from its start tag to its end tag.
    pub events: Vec<Event<'static>>,
}

impl GpxPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            position: GeoPoint::new(lat, lon),
            ele: None,
            time: None,
            lead: None,
            events: Vec::new(),
        }
    }
}
