// Imports
use geo::{Coord, Geometry, MapCoords};
use serde::{Deserialize, Serialize};

/// WGS84 ellipsoid equatorial radius in meters, as used by the spherical mercator projection.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A coordinate reference system a map can work in.
///
/// Relational tests and buffering always happen in [Crs::Wgs84], so the only
/// conversions that are needed are to and from geographic coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crs {
    /// Geographic coordinates in degrees (EPSG:4326).
    #[serde(rename = "EPSG:4326")]
    Wgs84,
    /// Spherical ("web") mercator in meters (EPSG:3857).
    #[default]
    #[serde(rename = "EPSG:3857")]
    WebMercator,
}

impl std::str::FromStr for Crs {
    type Err = UnknownCrs;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EPSG:4326" => Ok(Self::Wgs84),
            "EPSG:3857" => Ok(Self::WebMercator),
            s => Err(UnknownCrs(s.to_string())),
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Crs::Wgs84 => write!(f, "EPSG:4326"),
            Crs::WebMercator => write!(f, "EPSG:3857"),
        }
    }
}

/// The error returned when parsing an unsupported CRS identifier.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown crs identifier `{0}`")]
pub struct UnknownCrs(pub String);

impl Crs {
    /// Convert a coordinate in this CRS to WGS84 degrees.
    pub fn coord_to_wgs84(&self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Crs::Wgs84 => coord,
            Crs::WebMercator => Coord {
                x: (coord.x / EARTH_RADIUS_M).to_degrees(),
                y: ((coord.y / EARTH_RADIUS_M).exp().atan() * 2.0 - std::f64::consts::FRAC_PI_2)
                    .to_degrees(),
            },
        }
    }

    /// Convert a WGS84 coordinate to this CRS.
    pub fn coord_from_wgs84(&self, coord: Coord<f64>) -> Coord<f64> {
        match self {
            Crs::Wgs84 => coord,
            Crs::WebMercator => Coord {
                x: coord.x.to_radians() * EARTH_RADIUS_M,
                y: (std::f64::consts::FRAC_PI_4 + coord.y.to_radians() * 0.5).tan().ln()
                    * EARTH_RADIUS_M,
            },
        }
    }

    /// Reproject a geometry from this CRS to WGS84.
    ///
    /// Always produces an independent output geometry, the input is never mutated.
    pub fn geometry_to_wgs84(&self, geometry: &Geometry<f64>) -> Geometry<f64> {
        geometry.map_coords(|c| self.coord_to_wgs84(c))
    }

    /// Reproject a geometry from WGS84 back into this CRS.
    ///
    /// Always produces an independent output geometry, the input is never mutated.
    pub fn geometry_from_wgs84(&self, geometry: &Geometry<f64>) -> Geometry<f64> {
        geometry.map_coords(|c| self.coord_from_wgs84(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn mercator_roundtrip() {
        let crs = Crs::WebMercator;
        let c = coord! { x: 1_800_000.0, y: 8_200_000.0 };

        let roundtripped = crs.coord_from_wgs84(crs.coord_to_wgs84(c));

        assert_relative_eq!(roundtripped.x, c.x, max_relative = 1e-9);
        assert_relative_eq!(roundtripped.y, c.y, max_relative = 1e-9);
    }

    #[test]
    fn mercator_origin_maps_to_null_island() {
        let wgs = Crs::WebMercator.coord_to_wgs84(coord! { x: 0.0, y: 0.0 });

        assert_relative_eq!(wgs.x, 0.0);
        assert_relative_eq!(wgs.y, 0.0);
    }

    #[test]
    fn wgs84_transforms_are_identity() {
        let c = coord! { x: 18.07, y: 59.33 };

        assert_eq!(Crs::Wgs84.coord_to_wgs84(c), c);
        assert_eq!(Crs::Wgs84.coord_from_wgs84(c), c);
    }

    #[test]
    fn geometry_reprojection_leaves_input_untouched() {
        let input = Geometry::Point(geo::Point::new(1_000_000.0, 6_000_000.0));
        let input_clone = input.clone();

        let _ = Crs::WebMercator.geometry_to_wgs84(&input);

        assert_eq!(input, input_clone);
    }
}
