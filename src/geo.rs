/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance in meters between two points (haversine formula).
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push h just outside [0, 1] for near-antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Sum of the distances between consecutive points.
pub fn path_length(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Distance travelled from the first point up to each point, in meters.
/// The first entry is always 0.
pub fn cumulative_distances(points: &[GeoPoint]) -> Vec<f64> {
    let mut total = 0.0;
    let mut out = Vec::with_capacity(points.len());
    for (i, pt) in points.iter().enumerate() {
        if i > 0 {
            total += haversine_distance(&points[i - 1], pt);
        }
        out.push(total);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_zero() {
        let p = GeoPoint::new(35.6762, 139.6503);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(-9.12, -77.60);
        let b = GeoPoint::new(-9.10, -77.55);
        assert!((haversine_distance(&a, &b) - haversine_distance(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_on_equator() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        assert!((haversine_distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_small_offsets() {
        let origin = GeoPoint::new(0.0, 0.0);
        let near = haversine_distance(&origin, &GeoPoint::new(0.0, 0.00005));
        let far = haversine_distance(&origin, &GeoPoint::new(0.0, 0.0002));
        assert!((near - 5.56).abs() < 0.01);
        assert!((far - 22.24).abs() < 0.01);
    }

    #[test]
    fn test_monotonic_in_separation() {
        let origin = GeoPoint::new(45.0, 7.0);
        let mut prev = 0.0;
        for i in 1..50 {
            let d = haversine_distance(&origin, &GeoPoint::new(45.0 + i as f64 * 0.01, 7.0));
            assert!(d > prev);
            prev = d;
        }
    }

    #[test]
    fn test_antipodal() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((haversine_distance(&a, &b) - half_circumference).abs() < 1e-3);
    }

    #[test]
    fn test_near_antipodal_is_finite() {
        let a = GeoPoint::new(45.0, 7.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        for eps in [0.0, 1e-12, 1e-9, 1e-6] {
            let b = GeoPoint::new(-45.0 + eps, -173.0 - eps);
            let d = haversine_distance(&a, &b);
            assert!(d.is_finite());
            assert!(d <= half_circumference + 1e-6);
        }
    }

    #[test]
    fn test_path_length_and_cumulative() {
        let pts = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 0.003),
        ];
        let cum = cumulative_distances(&pts);
        assert_eq!(cum.len(), 3);
        assert_eq!(cum[0], 0.0);
        assert!((cum[2] - path_length(&pts)).abs() < 1e-9);
        assert!((cum[2] - 3.0 * cum[1]).abs() < 1e-6);
    }

    #[test]
    fn test_path_length_degenerate() {
        assert_eq!(path_length(&[]), 0.0);
        assert_eq!(path_length(&[GeoPoint::new(1.0, 2.0)]), 0.0);
        assert!(cumulative_distances(&[]).is_empty());
    }
}
