use crate::models::CompatibilityProfile;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cultural zones and their neighbours. Zone ids match the values stored in
/// `RegionalProfile::residence_zone`.
static ZONE_ADJACENCY: &[(&str, &[&str])] = &[
    ("stockwell_vauxhall", &["lambeth", "south_london"]),
    ("lambeth", &["stockwell_vauxhall", "south_london", "west_london"]),
    ("south_london", &["stockwell_vauxhall", "lambeth"]),
    ("west_london", &["lambeth", "north_london"]),
    ("north_london", &["west_london", "camden"]),
    ("camden", &["north_london", "east_london"]),
    ("east_london", &["camden"]),
];

/// Haversine distance between two coordinates, in kilometers.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn pair_distance_km(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Base score from distance alone. Step bands rather than a smooth decay:
/// within 10 km nothing is lost, beyond 60 km very little remains.
#[inline]
fn distance_band_score(distance_km: f64) -> f64 {
    if distance_km <= 10.0 {
        100.0
    } else if distance_km <= 20.0 {
        85.0
    } else if distance_km <= 40.0 {
        65.0
    } else if distance_km <= 60.0 {
        45.0
    } else {
        20.0
    }
}

fn zones_adjacent(a: &str, b: &str) -> bool {
    ZONE_ADJACENCY
        .iter()
        .find(|(zone, _)| *zone == a)
        .map(|(_, neighbours)| neighbours.contains(&b))
        .unwrap_or(false)
}

/// Same zone is worth more than adjacency; unknown zones get nothing.
fn zone_bonus(a: &str, b: &str) -> f64 {
    if a == b && !a.is_empty() {
        15.0
    } else if zones_adjacent(a, b) || zones_adjacent(b, a) {
        8.0
    } else {
        0.0
    }
}

/// Shared venues and institutions suggest the pair already moves in the same
/// circles. 5 points each, capped at 10.
fn affiliation_bonus(a: &CompatibilityProfile, b: &CompatibilityProfile) -> f64 {
    let shared_venues = a
        .regional
        .venue_affiliations
        .iter()
        .filter(|v| b.regional.venue_affiliations.contains(v))
        .count();
    let shared_institutions = a
        .regional
        .institution_affiliations
        .iter()
        .filter(|i| b.regional.institution_affiliations.contains(i))
        .count();
    ((shared_venues + shared_institutions) as f64 * 5.0).min(10.0)
}

/// Geographic feasibility score (0-100)
///
/// Banded distance score, lifted by the pair's average travel willingness and
/// by zone/affiliation bonuses; capped at 100. At fixed willingness the score
/// never increases with distance.
pub fn geographic_feasibility(a: &CompatibilityProfile, b: &CompatibilityProfile) -> u8 {
    let distance = pair_distance_km(a, b);
    let base = distance_band_score(distance);

    let avg_willingness =
        (a.regional.travel_willingness as f64 + b.regional.travel_willingness as f64) / 2.0;
    let travel = (avg_willingness / 100.0) * 30.0;

    let zones = zone_bonus(&a.regional.residence_zone, &b.regional.residence_zone);
    let affiliations = affiliation_bonus(a, b);

    (base + travel + zones + affiliations).min(100.0).round() as u8
}
