use crate::fix::{
    Degrees, EastWest, LATITUDE_DEGREE_MAX, LONGITUDE_DEGREE_MAX, Latitude, Longitude,
    MINUTES_IN_DEGREE, Minutes, NorthSouth, PositionFix,
};
use chrono::{DateTime, SubsecRound, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Steps per degree used when drawing the fractional part of a coordinate.
const PRECISION_FACTOR: u32 = 1_000_000;

/// Produces synthetic, uncorrelated position fixes.
///
/// Every call draws fresh coordinates and directions; nothing carries over
/// from the previous fix. Output is reproducible only through [`FixGenerator::seeded`].
pub struct FixGenerator<R: Rng = StdRng> {
    rng: R,
}

impl FixGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FixGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// A fix stamped with the current UTC time, truncated to whole seconds.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> PositionFix {
        self.next_at(Utc::now().trunc_subsecs(0))
    }

    pub fn next_at(&mut self, timestamp: DateTime<Utc>) -> PositionFix {
        let (lat_degrees, lat_minutes) = self.draw(LATITUDE_DEGREE_MAX);
        let (lon_degrees, lon_minutes) = self.draw(LONGITUDE_DEGREE_MAX);

        let lat_hemisphere = if self.rng.gen_bool(0.5) {
            NorthSouth::North
        } else {
            NorthSouth::South
        };
        let lon_hemisphere = self.east_west();
        let variation = self.east_west();

        // Drawn values are within range by construction.
        let latitude = Latitude::in_range(lat_degrees, lat_minutes, lat_hemisphere);
        let longitude = Longitude::in_range(lon_degrees, lon_minutes, lon_hemisphere);

        PositionFix::new(timestamp, latitude, longitude, variation)
    }

    fn east_west(&mut self) -> EastWest {
        if self.rng.gen_bool(0.5) {
            EastWest::East
        } else {
            EastWest::West
        }
    }

    /// Whole degrees below `max` plus minutes rounded to six decimals.
    fn draw(&mut self, max: Degrees) -> (Degrees, Minutes) {
        let degrees = self.rng.gen_range(0..max);
        let fraction = self.rng.gen_range(0..PRECISION_FACTOR) as f64 / PRECISION_FACTOR as f64;
        let minutes = (fraction * MINUTES_IN_DEGREE * 1e6).round() / 1e6;

        (degrees, minutes)
    }
}
