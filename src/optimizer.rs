use crate::error::SimplifyError;
use crate::geo::{haversine_distance, path_length, GeoPoint};
use crate::gpx_types::GpxDocument;
use crate::options::SimplifyOptions;
use crate::parser::parse_gpx;
use crate::report::{SegmentStats, SimplifyReport};
use crate::simplify::reduce_indices;
use crate::writer::write_gpx_string;

type Result<T> = std::result::Result<T, SimplifyError>;

/// Result of simplifying a GPX string.
#[derive(Debug)]
pub struct Simplified {
    pub document: GpxDocument,
    pub gpx: String,
    pub report: SimplifyReport,
}

/// Thin every track segment of `doc` in place.
///
/// Each segment is filtered on its own: the distance anchor restarts at the
/// first point of every segment.
pub fn simplify_document(doc: &mut GpxDocument, opts: &SimplifyOptions) -> Result<SimplifyReport> {
    opts.validate()?;
    let mut report = SimplifyReport::new(opts.min_distance);

    for seg in doc.segments_mut() {
        let positions = seg.positions();
        let keep = reduce_indices(&positions, opts.min_distance, haversine_distance);
        let retained: Vec<GeoPoint> = keep.iter().map(|&i| positions[i]).collect();
        seg.retain_points(&keep);

        let stats = SegmentStats {
            track_index: seg.track_index,
            segment_index: seg.segment_index,
            original_points: positions.len(),
            retained_points: retained.len(),
            original_length_m: path_length(&positions),
            retained_length_m: path_length(&retained),
        };
        tracing::debug!(
            track = stats.track_index,
            segment = stats.segment_index,
            original = stats.original_points,
            retained = stats.retained_points,
            "segment simplified"
        );
        report.push(stats);
    }

    tracing::info!(
        segments = report.segments.len(),
        original = report.original_points,
        retained = report.retained_points,
        min_distance = opts.min_distance,
        "document simplified"
    );

    Ok(report)
}

/// Parse, thin and re-serialize a GPX string.
pub fn simplify_gpx(xml: &str, opts: &SimplifyOptions) -> Result<Simplified> {
    let mut document = parse_gpx(xml)?;
    let report = simplify_document(&mut document, opts)?;
    let gpx = write_gpx_string(&document)?;
    Ok(Simplified {
        document,
        gpx,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_POINTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1">
  <trk>
    <trkseg>
      <trkpt lat="0" lon="0"><ele>1</ele></trkpt>
      <trkpt lat="0" lon="0.00005"><ele>2</ele></trkpt>
      <trkpt lat="0" lon="0.0002"><ele>3</ele></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_three_point_scenario() {
        let out = simplify_gpx(THREE_POINTS, &SimplifyOptions::default()).unwrap();
        assert_eq!(out.report.original_points, 3);
        assert_eq!(out.report.retained_points, 2);
        assert!(out.gpx.contains(r#"<trkpt lat="0" lon="0"><ele>1</ele></trkpt>"#));
        assert!(!out.gpx.contains("0.00005"));
        assert!(out.gpx.contains(r#"<trkpt lat="0" lon="0.0002"><ele>3</ele></trkpt>"#));
        assert_eq!(out.document.point_count(), 2);
    }

    #[test]
    fn test_small_threshold_keeps_everything() {
        let out = simplify_gpx(THREE_POINTS, &SimplifyOptions::with_min_distance(1.0)).unwrap();
        assert_eq!(out.report.retained_points, 3);
        assert_eq!(out.gpx, THREE_POINTS);
    }

    #[test]
    fn test_segments_filtered_independently() {
        // the second segment starts 5m from where the first ended
        let xml = r#"<gpx><trk>
<trkseg><trkpt lat="0" lon="0"/><trkpt lat="0" lon="0.001"/></trkseg>
<trkseg><trkpt lat="0" lon="0.00105"/><trkpt lat="0" lon="0.0011"/><trkpt lat="0" lon="0.003"/></trkseg>
</trk></gpx>"#;
        let out = simplify_gpx(xml, &SimplifyOptions::default()).unwrap();
        let counts: Vec<(usize, usize)> = out
            .report
            .segments
            .iter()
            .map(|s| (s.original_points, s.retained_points))
            .collect();
        assert_eq!(counts, vec![(2, 2), (3, 2)]);
    }

    #[test]
    fn test_empty_and_single_point_segments() {
        let xml = r#"<gpx><trk>
<trkseg></trkseg>
<trkseg><trkpt lat="5" lon="5"/></trkseg>
</trk></gpx>"#;
        let out = simplify_gpx(xml, &SimplifyOptions::default()).unwrap();
        let counts: Vec<(usize, usize)> = out
            .report
            .segments
            .iter()
            .map(|s| (s.original_points, s.retained_points))
            .collect();
        assert_eq!(counts, vec![(0, 0), (1, 1)]);
        assert_eq!(out.report.segments[0].retained_percent(), None);
        assert_eq!(out.gpx.matches("<trkpt").count(), 1);
    }

    #[test]
    fn test_no_segments_reports_nothing() {
        let xml = r#"<gpx><wpt lat="1" lon="1"/></gpx>"#;
        let out = simplify_gpx(xml, &SimplifyOptions::default()).unwrap();
        assert!(out.report.segments.is_empty());
        assert_eq!(out.report.reduction_percent(), None);
    }

    #[test]
    fn test_lengths_reported() {
        let out = simplify_gpx(THREE_POINTS, &SimplifyOptions::default()).unwrap();
        let seg = &out.report.segments[0];
        // dropping a collinear point does not shorten the path
        assert!((seg.original_length_m - seg.retained_length_m).abs() < 1e-6);
        assert!((seg.original_length_m - 22.24).abs() < 0.01);
    }

    #[test]
    fn test_invalid_option_rejected() {
        let err = simplify_gpx(THREE_POINTS, &SimplifyOptions::with_min_distance(-1.0)).unwrap_err();
        assert!(matches!(err, SimplifyError::InvalidOption { .. }));
    }
}
