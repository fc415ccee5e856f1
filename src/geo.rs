//! Geographic primitives
use map_3d::deg2rad;

/// Mean Earth radius [m]
pub(crate) const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// Geographic point, in decimal degrees.
///
/// Equality and hashing are by value: two fixes reported at the same
/// coordinates are the same survey location. `-0.0` and `0.0` compare equal.
#[derive(Debug, Copy, Clone, Default)]
pub struct GeoPoint {
    /// Latitude [ddeg]
    pub(crate) latitude: f64,
    /// Longitude [ddeg]
    pub(crate) longitude: f64,
}

impl GeoPoint {
    /// Builds new [GeoPoint] from latitude and longitude in decimal degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
    /// Latitude [ddeg]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }
    /// Longitude [ddeg]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
    /// Returns (latitude, longitude) in radians
    pub fn to_radians(&self) -> (f64, f64) {
        (deg2rad(self.latitude), deg2rad(self.longitude))
    }
    /// True if both coordinates are finite and within geographic range
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
    /// Great circle (haversine) distance to `rhs`, in meters
    pub fn distance(&self, rhs: &Self) -> f64 {
        let (lat1, lon1) = self.to_radians();
        let (lat2, lon2) = rhs.to_radians();
        let (dlat, dlon) = (lat2 - lat1, lon2 - lon1);

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
    fn key(&self) -> (u64, u64) {
        // adding 0.0 folds -0.0 into 0.0
        ((self.latitude + 0.0).to_bits(), (self.longitude + 0.0).to_bits())
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, rhs: &Self) -> bool {
        self.key() == rhs.key()
    }
}

impl Eq for GeoPoint {}

impl std::hash::Hash for GeoPoint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from(latlon: (f64, f64)) -> Self {
        Self::new(latlon.0, latlon.1)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// Geographic rectangle a raster covers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AreaBounds {
    /// South west corner
    pub southwest: GeoPoint,
    /// North east corner
    pub northeast: GeoPoint,
}

impl AreaBounds {
    /// Tight bounding box of given points. None if `points` is empty.
    pub fn including<'a, I: IntoIterator<Item = &'a GeoPoint>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            southwest: *first,
            northeast: *first,
        };
        for point in points {
            bounds.southwest.latitude = bounds.southwest.latitude.min(point.latitude);
            bounds.southwest.longitude = bounds.southwest.longitude.min(point.longitude);
            bounds.northeast.latitude = bounds.northeast.latitude.max(point.latitude);
            bounds.northeast.longitude = bounds.northeast.longitude.max(point.longitude);
        }
        Some(bounds)
    }
    /// Returns Self expanded outward by given margins [ddeg]
    pub fn padded(&self, latitude: f64, longitude: f64) -> Self {
        Self {
            southwest: GeoPoint::new(
                self.southwest.latitude - latitude,
                self.southwest.longitude - longitude,
            ),
            northeast: GeoPoint::new(
                self.northeast.latitude + latitude,
                self.northeast.longitude + longitude,
            ),
        }
    }
    /// Latitude span [ddeg]
    pub fn latitude_span(&self) -> f64 {
        self.northeast.latitude - self.southwest.latitude
    }
    /// Longitude span [ddeg]
    pub fn longitude_span(&self) -> f64 {
        self.northeast.longitude - self.southwest.longitude
    }
    /// Physical (width, height) in meters, measured along the
    /// southern and western edges.
    pub fn extent_m(&self) -> (f64, f64) {
        let southeast = GeoPoint::new(self.southwest.latitude, self.northeast.longitude);
        let northwest = GeoPoint::new(self.northeast.latitude, self.southwest.longitude);
        (
            self.southwest.distance(&southeast),
            self.southwest.distance(&northwest),
        )
    }
    /// True if `point` lies within Self (edges included)
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.southwest.latitude..=self.northeast.latitude).contains(&point.latitude)
            && (self.southwest.longitude..=self.northeast.longitude).contains(&point.longitude)
    }
}

#[cfg(test)]
mod test {
    use super::{AreaBounds, GeoPoint};
    use std::collections::HashSet;

    #[test]
    fn value_equality() {
        let a = GeoPoint::new(48.8566, 2.3522);
        let b = GeoPoint::new(48.8566, 2.3522);
        assert_eq!(a, b);
        assert_eq!(GeoPoint::new(0.0, -0.0), GeoPoint::new(-0.0, 0.0));

        let set = [a, b, GeoPoint::new(48.8567, 2.3522)]
            .into_iter()
            .collect::<HashSet<_>>();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn validity() {
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
        assert!(!GeoPoint::new(f64::INFINITY, 0.0).is_valid());
    }

    #[test]
    fn haversine() {
        // one degree of latitude
        let d = GeoPoint::new(0.0, 0.0).distance(&GeoPoint::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 1.0, "bad distance {}", d);
        // longitude shrinks with latitude
        let d60 = GeoPoint::new(60.0, 0.0).distance(&GeoPoint::new(60.0, 1.0));
        assert!((d60 - d / 2.0).abs() < 50.0, "bad distance {}", d60);
        assert_eq!(GeoPoint::new(10.0, 10.0).distance(&GeoPoint::new(10.0, 10.0)), 0.0);
    }

    #[test]
    fn bounds() {
        let points = [
            GeoPoint::new(1.0, 5.0),
            GeoPoint::new(-2.0, 3.0),
            GeoPoint::new(0.5, 7.0),
        ];
        let bounds = AreaBounds::including(&points).unwrap();
        assert_eq!(bounds.southwest, GeoPoint::new(-2.0, 3.0));
        assert_eq!(bounds.northeast, GeoPoint::new(1.0, 7.0));
        assert!(points.iter().all(|p| bounds.contains(p)));

        let padded = bounds.padded(0.5, 1.0);
        assert_eq!(padded.latitude_span(), 4.0);
        assert_eq!(padded.longitude_span(), 6.0);

        assert!(AreaBounds::including(&[]).is_none());
    }
}
