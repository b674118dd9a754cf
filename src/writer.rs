use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::error::SimplifyError;
use crate::gpx_types::*;

type Result<T> = std::result::Result<T, SimplifyError>;

/// Serialize a GpxDocument back to XML.
///
/// Events are replayed as they were read, so anything that was not removed
/// comes out byte-for-byte. A declaration is added if the input had none.
pub fn write_gpx(doc: &GpxDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    if !doc.has_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Text(BytesText::new("\n")))?;
    }

    for node in &doc.nodes {
        match node {
            GpxNode::Raw(event) => writer.write_event(event.borrow())?,
            GpxNode::Segment(seg) => write_segment(&mut writer, seg)?,
        }
    }

    Ok(writer.into_inner())
}

/// Serialize to a String; the output is UTF-8 whenever the input was.
pub fn write_gpx_string(doc: &GpxDocument) -> Result<String> {
    Ok(String::from_utf8(write_gpx(doc)?)?)
}

fn write_segment(writer: &mut Writer<Vec<u8>>, seg: &GpxSegment) -> Result<()> {
    let Some(end) = &seg.end else {
        writer.write_event(Event::Empty(seg.start.borrow()))?;
        return Ok(());
    };

    writer.write_event(Event::Start(seg.start.borrow()))?;
    for child in &seg.children {
        match child {
            SegmentChild::Other(event) => writer.write_event(event.borrow())?,
            SegmentChild::Point(pt) => {
                if let Some(lead) = &pt.lead {
                    writer.write_event(lead.borrow())?;
                }
                for event in &pt.events {
                    writer.write_event(event.borrow())?;
                }
            }
        }
    }
    writer.write_event(Event::End(end.borrow()))?;

    Ok(())
}
