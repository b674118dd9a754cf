use quick_xml::Reader;
use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};

use crate::error::SimplifyError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, SimplifyError>;

/// Parse a GPX XML string into a GpxDocument.
///
/// Track points must carry valid `lat` and `lon` attributes; a single bad
/// point fails the whole document.
pub fn parse_gpx(xml: &str) -> Result<GpxDocument> {
    let mut reader = Reader::from_str(xml);
    let mut doc = GpxDocument::default();
    let mut seen_root = false;
    let mut tracks = 0usize;
    let mut segments_in_track = 0usize;
    // open elements outside of segments
    let mut depth = 0usize;

    loop {
        let event = reader.read_event()?;

        if let Event::Start(e) | Event::Empty(e) = &event {
            if !seen_root {
                check_root(e)?;
                seen_root = true;
            }
        }

        match event {
            Event::Start(e) if e.local_name().as_ref() == b"trk" => {
                depth += 1;
                tracks += 1;
                segments_in_track = 0;
                doc.nodes.push(GpxNode::Raw(Event::Start(e.into_owned())));
            }
            Event::Start(e) if e.local_name().as_ref() == b"trkseg" => {
                let seg = parse_segment(
                    e.into_owned(),
                    &mut reader,
                    tracks.saturating_sub(1),
                    segments_in_track,
                )?;
                segments_in_track += 1;
                doc.nodes.push(GpxNode::Segment(seg));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"trkseg" => {
                doc.nodes.push(GpxNode::Segment(GpxSegment {
                    track_index: tracks.saturating_sub(1),
                    segment_index: segments_in_track,
                    start: e.into_owned(),
                    end: None,
                    children: Vec::new(),
                }));
                segments_in_track += 1;
            }
            Event::Decl(e) => {
                doc.has_declaration = true;
                doc.nodes.push(GpxNode::Raw(Event::Decl(e.into_owned())));
            }
            Event::Start(e) => {
                depth += 1;
                doc.nodes.push(GpxNode::Raw(Event::Start(e.into_owned())));
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                doc.nodes.push(GpxNode::Raw(Event::End(e.into_owned())));
            }
            Event::Eof if depth > 0 => {
                return Err(SimplifyError::UnexpectedEof { element: "gpx" });
            }
            Event::Eof => break,
            other => doc.nodes.push(GpxNode::Raw(other.into_owned())),
        }
    }

    if !seen_root {
        return Err(SimplifyError::NotGpx { root: None });
    }

    Ok(doc)
}

fn check_root(e: &BytesStart<'_>) -> Result<()> {
    if e.local_name().as_ref() == b"gpx" {
        return Ok(());
    }
    Err(SimplifyError::NotGpx {
        root: Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned()),
    })
}

/// Parse lat/lon attributes from a `<trkpt>` start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| SimplifyError::XmlParse(e.into()))?;
        let val = attr
            .unescape_value()
            .map_err(|e| SimplifyError::XmlParse(e.into()))?;
        match attr.key.local_name().as_ref() {
            b"lat" => lat = Some(parse_coordinate("lat", &val)?),
            b"lon" => lon = Some(parse_coordinate("lon", &val)?),
            _ => {}
        }
    }

    let lat = lat.ok_or(SimplifyError::MissingAttribute {
        element: "trkpt",
        attribute: "lat",
    })?;
    let lon = lon.ok_or(SimplifyError::MissingAttribute {
        element: "trkpt",
        attribute: "lon",
    })?;

    Ok((lat, lon))
}

fn parse_coordinate(attribute: &'static str, val: &str) -> Result<f64> {
    match val.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SimplifyError::InvalidAttribute {
            element: "trkpt",
            attribute,
            value: val.to_string(),
        }),
    }
}

/// Parse the children of a `<trkseg>`.
/// Called after receiving Event::Start for the segment.
fn parse_segment(
    start: BytesStart<'static>,
    reader: &mut Reader<&[u8]>,
    track_index: usize,
    segment_index: usize,
) -> Result<GpxSegment> {
    let mut children = Vec::new();
    // indentation waiting to see whether a point follows it
    let mut lead: Option<Event<'static>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"trkpt" => {
                let mut point = parse_point(e.into_owned(), reader)?;
                point.lead = lead.take();
                children.push(SegmentChild::Point(point));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"trkpt" => {
                let (lat, lon) = parse_lat_lon(&e)?;
                let mut point = GpxPoint::new(lat, lon);
                point.lead = lead.take();
                point.events.push(Event::Empty(e.into_owned()));
                children.push(SegmentChild::Point(point));
            }
            Event::Text(e) if is_blank(&e) => {
                flush_lead(&mut children, lead.take());
                lead = Some(Event::Text(e.into_owned()));
            }
            Event::Start(e) => {
                flush_lead(&mut children, lead.take());
                let subtree = read_subtree(e.into_owned(), reader, "trkseg")?;
                children.extend(subtree.into_iter().map(SegmentChild::Other));
            }
            Event::End(e) => {
                flush_lead(&mut children, lead.take());
                return Ok(GpxSegment {
                    track_index,
                    segment_index,
                    start,
                    end: Some(e.into_owned()),
                    children,
                });
            }
            Event::Eof => return Err(SimplifyError::UnexpectedEof { element: "trkseg" }),
            other => {
                flush_lead(&mut children, lead.take());
                children.push(SegmentChild::Other(other.into_owned()));
            }
        }
    }
}

fn flush_lead(children: &mut Vec<SegmentChild>, lead: Option<Event<'static>>) {
    if let Some(ev) = lead {
        children.push(SegmentChild::Other(ev));
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

#[derive(Clone, Copy)]
enum PointField {
    Ele,
    Time,
}

/// Parse a `<trkpt>` element, keeping every event up to its end tag.
/// Called after receiving Event::Start for the point.
fn parse_point(start: BytesStart<'static>, reader: &mut Reader<&[u8]>) -> Result<GpxPoint> {
    let (lat, lon) = parse_lat_lon(&start)?;
    let mut point = GpxPoint::new(lat, lon);
    point.events.push(Event::Start(start));

    let mut depth = 1usize;
    let mut field: Option<PointField> = None;
    let mut text = String::new();

    while depth > 0 {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) => {
                depth += 1;
                if depth == 2 {
                    field = match e.local_name().as_ref() {
                        b"ele" => Some(PointField::Ele),
                        b"time" => Some(PointField::Time),
                        _ => None,
                    };
                    text.clear();
                }
            }
            Event::Text(e) if depth == 2 => {
                text.push_str(std::str::from_utf8(e).unwrap_or_default());
            }
            Event::CData(e) if depth == 2 => {
                text.push_str(std::str::from_utf8(e).unwrap_or_default());
            }
            Event::GeneralRef(e) if depth == 2 => push_general_ref(&mut text, e),
            Event::End(_) => {
                if depth == 2 {
                    match field.take() {
                        Some(PointField::Ele) => point.ele = text.trim().parse::<f64>().ok(),
                        Some(PointField::Time) => point.time = Some(text.trim().to_string()),
                        None => {}
                    }
                }
                depth -= 1;
            }
            Event::Eof => return Err(SimplifyError::UnexpectedEof { element: "trkpt" }),
            _ => {}
        }
        point.events.push(event.into_owned());
    }

    Ok(point)
}

/// Append the character an entity or character reference stands for.
fn push_general_ref(text: &mut String, e: &BytesRef<'_>) {
    // Handle character references (&#60; &#x3C;) and predefined entities
    if let Ok(Some(ch)) = e.resolve_char_ref() {
        text.push(ch);
        return;
    }
    match std::str::from_utf8(e).unwrap_or_default() {
        "amp" => text.push('&'),
        "lt" => text.push('<'),
        "gt" => text.push('>'),
        "quot" => text.push('"'),
        "apos" => text.push('\''),
        _ => {} // Unknown entity, skip
    }
}

/// Read an element and everything inside it as owned events.
fn read_subtree(
    start: BytesStart<'static>,
    reader: &mut Reader<&[u8]>,
    element: &'static str,
) -> Result<Vec<Event<'static>>> {
    let mut events = vec![Event::Start(start)];
    let mut depth = 1usize;

    while depth > 0 {
        let event = reader.read_event()?;
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(SimplifyError::UnexpectedEof { element }),
            _ => {}
        }
        events.push(event.into_owned());
    }

    Ok(events)
}
