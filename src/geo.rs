//! Geodetic conversion: WGS84 transverse-Mercator (UTM) projection and
//! velocity heading.
//!
//! Uses the standard series expansions for meridian arc, easting, and
//! northing. Incoming tracks use a west-positive longitude convention, so
//! the longitude sign is flipped before any zone or projection math. The
//! heading convention is `atan2(x_velocity, y_velocity)`.

/// WGS84 semi-major axis in meters.
pub const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;
/// UTM central-meridian scale factor.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
/// UTM false easting in meters.
pub const UTM_FALSE_EASTING_M: f64 = 500_000.0;

/// Planar UTM coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmCoordinate {
    /// Easting in meters (false easting applied)
    pub easting_m: f64,
    /// Northing in meters (no false northing; fixed-hemisphere convention)
    pub northing_m: f64,
    /// Longitudinal zone, 1..=60
    pub zone: u32,
}

/// UTM zone for an east-positive longitude in degrees.
#[inline]
pub fn utm_zone(longitude_deg: f64) -> u32 {
    let zone = ((longitude_deg + 180.0) / 6.0).floor() as i64 + 1;
    zone.clamp(1, 60) as u32
}

/// Central meridian of a UTM zone, in degrees.
#[inline]
pub fn central_meridian_deg(zone: u32) -> f64 {
    (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0
}

/// Heading angle in radians from planar velocity components.
///
/// Argument order is `atan2(x_velocity, y_velocity)`, matching the axis
/// convention of the recorded tracks.
#[inline]
pub fn velocity_heading(x_velocity: f64, y_velocity: f64) -> f64 {
    x_velocity.atan2(y_velocity)
}

/// Project a geodetic fix to planar UTM easting/northing.
///
/// `longitude_deg` is taken west-positive and flipped before zone and
/// projection math.
pub fn latlong_to_utm(latitude_deg: f64, longitude_deg: f64) -> UtmCoordinate {
    // Tracks record longitude west-positive; zone math expects east-positive.
    let longitude_deg = -longitude_deg;

    let zone = utm_zone(longitude_deg);

    let a = WGS84_SEMI_MAJOR_M;
    let f = WGS84_FLATTENING;
    let e2 = f * (2.0 - f);
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let ep2 = e2 / (1.0 - e2);

    let lat = latitude_deg.to_radians();
    let lon = longitude_deg.to_radians();
    let lon0 = central_meridian_deg(zone).to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = ep2 * cos_lat * cos_lat;
    let a_term = cos_lat * (lon - lon0);

    // Meridian arc from the equator.
    let m = a
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin());

    let a2 = a_term * a_term;
    let a3 = a2 * a_term;
    let a4 = a2 * a2;
    let a5 = a4 * a_term;
    let a6 = a4 * a2;

    let easting_m = UTM_SCALE_FACTOR
        * n
        * (a_term
            + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + UTM_FALSE_EASTING_M;

    let northing_m = UTM_SCALE_FACTOR
        * (m + n
            * tan_lat
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    UtmCoordinate {
        easting_m,
        northing_m,
        zone,
    }
}
