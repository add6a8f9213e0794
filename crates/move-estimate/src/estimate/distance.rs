use super::domain::Coordinates;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle (haversine) distance between two points, in miles.
pub fn calculate_distance(origin: Coordinates, destination: Coordinates) -> f64 {
    let d_lat = (destination.latitude - origin.latitude).to_radians();
    let d_lng = (destination.longitude - origin.longitude).to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + origin.latitude.to_radians().cos()
            * destination.latitude.to_radians().cos()
            * (d_lng / 2.0).sin()
            * (d_lng / 2.0).sin();

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}
