use crate::models::GeoPoint;

use super::DomainError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (haversine).
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Returns true iff `reported` lies within `radius_km` of `permitted`.
pub fn validate(reported: GeoPoint, permitted: GeoPoint, radius_km: f64) -> bool {
    distance_km(reported, permitted) <= radius_km
}

/// Same as [`validate`], but yields `OutOfRange` with the measured distance.
pub fn ensure_within(reported: GeoPoint, permitted: GeoPoint, radius_km: f64) -> Result<(), DomainError> {
    if validate(reported, permitted, radius_km) {
        return Ok(());
    }

    Err(DomainError::OutOfRange {
        distance_km: distance_km(reported, permitted),
        radius_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint { latitude, longitude }
    }

    #[test]
    fn test_same_point_is_inside_any_radius() {
        let office = point(30.0444, 31.2357);
        assert!(validate(office, office, 0.0));
    }

    #[test]
    fn test_distance_of_one_degree_latitude() {
        let d = distance_km(point(0.0, 0.0), point(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_five_km_away_is_rejected_for_small_radius() {
        let office = point(30.0444, 31.2357);
        // ~0.045 degrees of latitude is roughly 5 km
        let home = point(30.0444 + 0.045, 31.2357);

        let d = distance_km(home, office);
        assert!((d - 5.0).abs() < 0.1, "got {}", d);

        match ensure_within(home, office, 0.2) {
            Err(DomainError::OutOfRange { radius_km, .. }) => assert_eq!(radius_km, 0.2),
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_nearby_point_is_accepted() {
        let office = point(30.0444, 31.2357);
        let lobby = point(30.0450, 31.2360);
        assert!(ensure_within(lobby, office, 0.2).is_ok());
    }
}
