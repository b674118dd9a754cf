//! Human-readable statistics about a simplification run.
//!
//! Percentages are `None` whenever their denominator is zero, and print as
//! `n/a`.

use std::fmt;

use serde::Serialize;

/// Point counts and path lengths of one segment before and after thinning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentStats {
    pub track_index: usize,
    pub segment_index: usize,
    pub original_points: usize,
    pub retained_points: usize,
    pub original_length_m: f64,
    pub retained_length_m: f64,
}

impl SegmentStats {
    pub fn retained_percent(&self) -> Option<f64> {
        percent(self.retained_points as f64, self.original_points as f64)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifyReport {
    pub min_distance: f64,
    pub segments: Vec<SegmentStats>,
    pub original_points: usize,
    pub retained_points: usize,
    pub original_length_m: f64,
    pub retained_length_m: f64,
}

impl SimplifyReport {
    pub fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            ..Self::default()
        }
    }

    pub fn push(&mut self, stats: SegmentStats) {
        self.original_points += stats.original_points;
        self.retained_points += stats.retained_points;
        self.original_length_m += stats.original_length_m;
        self.retained_length_m += stats.retained_length_m;
        self.segments.push(stats);
    }

    /// Share of points removed across all segments.
    pub fn reduction_percent(&self) -> Option<f64> {
        reduction(self.retained_points as f64, self.original_points as f64)
    }
}

impl fmt::Display for SimplifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.segments {
            writeln!(
                f,
                "Segment {}.{}: {} points -> {} points ({})",
                seg.track_index + 1,
                seg.segment_index + 1,
                seg.original_points,
                seg.retained_points,
                fmt_percent(seg.retained_percent()),
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Total: {} points -> {} points",
            self.original_points, self.retained_points
        )?;
        writeln!(f, "Reduction: {}", fmt_percent(self.reduction_percent()))?;
        write!(
            f,
            "Track length: {:.2} km -> {:.2} km",
            self.original_length_m / 1000.0,
            self.retained_length_m / 1000.0
        )
    }
}

/// Input and output file sizes in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSizes {
    pub before: u64,
    pub after: u64,
}

impl FileSizes {
    pub fn reduction_percent(&self) -> Option<f64> {
        reduction(self.after as f64, self.before as f64)
    }
}

impl fmt::Display for FileSizes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "File size: {} -> {}",
            format_size(self.before),
            format_size(self.after)
        )?;
        write!(f, "Size reduction: {}", fmt_percent(self.reduction_percent()))
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

fn percent(part: f64, whole: f64) -> Option<f64> {
    (whole > 0.0).then(|| part / whole * 100.0)
}

fn reduction(after: f64, before: f64) -> Option<f64> {
    percent(after, before).map(|p| 100.0 - p)
}

fn fmt_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "n/a".to_string(),
    }
}
