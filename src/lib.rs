pub mod converter;
pub mod error;
pub mod geo;
pub mod gpx_types;
pub mod optimizer;
pub mod options;
pub mod parser;
pub mod report;
pub mod simplify;
pub mod writer;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::options::SimplifyOptions;
use crate::report::SimplifyReport;

pub use crate::optimizer::{simplify_document, simplify_gpx, Simplified};

#[derive(Serialize)]
struct SimplifyOutput<'a> {
    gpx: &'a str,
    report: &'a SimplifyReport,
}

/// Simplify a GPX string, returning `{ gpx, report }` as a JS object.
#[wasm_bindgen(js_name = simplifyGpx)]
pub fn simplify_gpx_js(gpx_string: &str, options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let out = simplify_gpx(gpx_string, &opts)?;
    let output = SimplifyOutput {
        gpx: &out.gpx,
        report: &out.report,
    };
    serde_wasm_bindgen::to_value(&output).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Simplify a GPX string and return the remaining track as a GeoJSON string.
#[wasm_bindgen(js_name = simplifyGpxToGeoJson)]
pub fn simplify_gpx_to_geojson_js(gpx_string: &str, options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let out = simplify_gpx(gpx_string, &opts)?;
    let fc = converter::to_feature_collection(&out.document, &opts);
    serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<SimplifyOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(SimplifyOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
