//! Geofence evaluation: classify the location sampled at a punch against a
//! site's radius and outside policy. Pure; re-run at every punch.

use crate::models::geofence::{
    Coordinates, FlagReason, GeofenceClassification, GeofenceSite, GeofenceVerdict,
    LocationReading, OutsidePolicy,
};
use chrono::{DateTime, Local};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters.
pub fn haversine(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn site_coordinates(site: &GeofenceSite) -> Coordinates {
    Coordinates {
        latitude: site.latitude,
        longitude: site.longitude,
    }
}

pub fn classify(reading: &LocationReading, site: &GeofenceSite) -> GeofenceClassification {
    evaluate(reading, site, reading.captured_at).classification
}

/// Classification plus distance and flag reasons. `now` is the submission
/// instant, used to spot offline punches synced too late.
pub fn evaluate(
    reading: &LocationReading,
    site: &GeofenceSite,
    now: DateTime<Local>,
) -> GeofenceVerdict {
    if !reading.online {
        let mut reasons = vec![FlagReason::Offline];
        let hours_old = (now - reading.captured_at).num_hours();
        if hours_old > site.offline_review_hours {
            reasons.push(FlagReason::LateSync { hours_old });
        }
        return GeofenceVerdict {
            classification: GeofenceClassification::Offline,
            distance_meters: None,
            reasons,
        };
    }

    let Some(coords) = reading.coordinates else {
        return GeofenceVerdict {
            classification: GeofenceClassification::NoPermission,
            distance_meters: None,
            reasons: vec![FlagReason::NoGps],
        };
    };

    if reading.accuracy_meters > site.flag_accuracy_meters {
        return GeofenceVerdict {
            classification: GeofenceClassification::GpsError,
            distance_meters: None,
            reasons: vec![FlagReason::LowAccuracy {
                accuracy_meters: reading.accuracy_meters,
            }],
        };
    }

    let distance = haversine(coords, site_coordinates(site));

    if distance <= site.radius_meters {
        return GeofenceVerdict {
            classification: GeofenceClassification::Inside,
            distance_meters: Some(distance),
            reasons: Vec::new(),
        };
    }

    let classification = if site.outside_policy == OutsidePolicy::Block {
        GeofenceClassification::OutsideBlock
    } else {
        GeofenceClassification::OutsideWarn
    };

    let mut reasons = vec![FlagReason::OutsideGeofence {
        distance_meters: distance,
    }];
    if distance > site.radius_meters + site.flag_distance_meters {
        reasons.push(FlagReason::FarOutside {
            distance_meters: distance,
        });
    }

    GeofenceVerdict {
        classification,
        distance_meters: Some(distance),
        reasons,
    }
}
