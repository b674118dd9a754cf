use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::geo::cumulative_distances;
use crate::gpx_types::*;
use crate::options::SimplifyOptions;

/// Convert the track segments of a document to a GeoJSON FeatureCollection.
///
/// One Feature per non-empty segment: a LineString when it has two or more
/// points, a Point otherwise.
pub fn to_feature_collection(doc: &GpxDocument, opts: &SimplifyOptions) -> FeatureCollection {
    let features = doc
        .segments()
        .filter_map(|seg| segment_to_feature(seg, opts))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn segment_to_feature(seg: &GpxSegment, opts: &SimplifyOptions) -> Option<Feature> {
    let points: Vec<&GpxPoint> = seg.points().collect();

    let value = match points.as_slice() {
        [] => return None,
        [only] => Value::Point(point_coords(only, opts.include_elevation)),
        _ => Value::LineString(
            points
                .iter()
                .map(|pt| point_coords(pt, opts.include_elevation))
                .collect(),
        ),
    };

    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String("track".to_string()),
    );
    props.insert("trackIndex".to_string(), JsonValue::from(seg.track_index));
    props.insert("segmentIndex".to_string(), JsonValue::from(seg.segment_index));

    if points.len() == 1 {
        if let Some(ref time) = points[0].time {
            if opts.include_time {
                props.insert("time".to_string(), JsonValue::String(time.clone()));
            }
        }
    } else {
        insert_coordinate_properties(&mut props, &points, opts);
    }

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    })
}

/// Build [lon, lat] or [lon, lat, ele] coordinate array.
fn point_coords(pt: &GpxPoint, include_elevation: bool) -> Vec<f64> {
    match (include_elevation, pt.ele) {
        (true, Some(ele)) => vec![pt.position.lon, pt.position.lat, ele],
        _ => vec![pt.position.lon, pt.position.lat],
    }
}

fn insert_coordinate_properties(
    props: &mut Map<String, JsonValue>,
    points: &[&GpxPoint],
    opts: &SimplifyOptions,
) {
    let mut coord_props = Map::new();

    if opts.include_time && points.iter().any(|pt| pt.time.is_some()) {
        let times: Vec<JsonValue> = points
            .iter()
            .map(|pt| match &pt.time {
                Some(t) => JsonValue::String(t.clone()),
                None => JsonValue::Null,
            })
            .collect();
        coord_props.insert("times".to_string(), JsonValue::Array(times));
    }

    if opts.include_distances {
        let positions: Vec<_> = points.iter().map(|pt| pt.position).collect();
        let distances: Vec<JsonValue> = cumulative_distances(&positions)
            .into_iter()
            .map(|d| {
                // centimeter precision is plenty for a route profile
                let rounded = (d * 100.0).round() / 100.0;
                serde_json::Number::from_f64(rounded)
                    .map(JsonValue::Number)
                    .unwrap_or(JsonValue::Null)
            })
            .collect();
        coord_props.insert("distances".to_string(), JsonValue::Array(distances));
    }

    if !coord_props.is_empty() {
        props.insert(
            "coordinateProperties".to_string(),
            JsonValue::Object(coord_props),
        );
    }
}
