//! Minimum-distance thinning of an ordered point sequence.
//!
//! The filter walks the sequence once, keeping a point only when it lies at
//! least `min_distance` away from the most recently kept point. The first and
//! last points are always kept. Nothing here knows about GPX.

use crate::geo::{haversine_distance, GeoPoint};

/// Positions of the points that survive thinning, in ascending order.
pub fn reduce_indices<T, F>(points: &[T], min_distance: f64, distance: F) -> Vec<usize>
where
    F: Fn(&T, &T) -> f64,
{
    let Some(last) = points.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut kept = vec![0];
    let mut anchor = &points[0];

    for (i, pt) in points.iter().enumerate().take(last).skip(1) {
        if distance(anchor, pt) >= min_distance {
            kept.push(i);
            anchor = pt;
        }
    }

    // a single point is both first and last
    if last > 0 {
        kept.push(last);
    }

    kept
}

/// Thin `points`, returning copies of the retained ones.
pub fn reduce<T, F>(points: &[T], min_distance: f64, distance: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> f64,
{
    reduce_indices(points, min_distance, distance)
        .into_iter()
        .map(|i| points[i].clone())
        .collect()
}

/// [`reduce`] with great-circle distance.
pub fn reduce_track(points: &[GeoPoint], min_distance: f64) -> Vec<GeoPoint> {
    reduce(points, min_distance, haversine_distance)
}
