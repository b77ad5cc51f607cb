// (c) Copyright 2026 viaroute contributors
// SPDX-License-Identifier: MIT

/// Mean radius of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
const EARTH_RADIUS: f64 = 6_371_008.8;

/// Mean diameter of Earth, in meters.
const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in meters.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    EARTH_DIAMETER * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earth_distance_zero_for_same_point() {
        assert_eq!(earth_distance(28.6139, 77.2090, 28.6139, 77.2090), 0.0);
    }

    #[test]
    fn earth_distance_one_degree_of_latitude() {
        // One degree of latitude is roughly 111.2 km everywhere.
        let d = earth_distance(28.0, 77.0, 29.0, 77.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }
}
