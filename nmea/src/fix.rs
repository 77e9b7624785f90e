use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Degrees = u16;
pub type Minutes = f64;

pub(crate) const LATITUDE_DEGREE_MAX: Degrees = 90;
pub(crate) const LONGITUDE_DEGREE_MAX: Degrees = 180;
pub(crate) const MINUTES_IN_DEGREE: Minutes = 60.0;

#[derive(Debug, Error, PartialEq)]
pub enum FixError {
    #[error("latitude degrees {0} outside [0, 90)")]
    LatitudeOutOfRange(Degrees),
    #[error("longitude degrees {0} outside [0, 180)")]
    LongitudeOutOfRange(Degrees),
    #[error("minutes {0} outside [0, 60)")]
    MinutesOutOfRange(Minutes),
}

/// Hemisphere of a latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NorthSouth {
    North,
    South,
}

impl NorthSouth {
    pub fn as_char(self) -> char {
        match self {
            NorthSouth::North => 'N',
            NorthSouth::South => 'S',
        }
    }
}

/// Hemisphere of a longitude, also used for the magnetic variation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EastWest {
    East,
    West,
}

impl EastWest {
    pub fn as_char(self) -> char {
        match self {
            EastWest::East => 'E',
            EastWest::West => 'W',
        }
    }
}

fn check_minutes(minutes: Minutes) -> Result<(), FixError> {
    if minutes.is_finite() && (0.0..MINUTES_IN_DEGREE).contains(&minutes) {
        Ok(())
    } else {
        Err(FixError::MinutesOutOfRange(minutes))
    }
}

/// A latitude in whole degrees plus decimal minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Latitude {
    degrees: Degrees,
    minutes: Minutes,
    hemisphere: NorthSouth,
}

impl Latitude {
    /// # Errors
    /// Fails when `degrees` is not below 90 or `minutes` is not in `[0, 60)`.
    pub fn new(degrees: Degrees, minutes: Minutes, hemisphere: NorthSouth) -> Result<Self, FixError> {
        if degrees >= LATITUDE_DEGREE_MAX {
            return Err(FixError::LatitudeOutOfRange(degrees));
        }
        check_minutes(minutes)?;

        Ok(Self {
            degrees,
            minutes,
            hemisphere,
        })
    }

    pub(crate) fn in_range(degrees: Degrees, minutes: Minutes, hemisphere: NorthSouth) -> Self {
        debug_assert!(degrees < LATITUDE_DEGREE_MAX && check_minutes(minutes).is_ok());
        Self {
            degrees,
            minutes,
            hemisphere,
        }
    }

    pub fn degrees(&self) -> Degrees {
        self.degrees
    }

    pub fn minutes(&self) -> Minutes {
        self.minutes
    }

    pub fn hemisphere(&self) -> NorthSouth {
        self.hemisphere
    }
}

/// A longitude in whole degrees plus decimal minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Longitude {
    degrees: Degrees,
    minutes: Minutes,
    hemisphere: EastWest,
}

impl Longitude {
    /// # Errors
    /// Fails when `degrees` is not below 180 or `minutes` is not in `[0, 60)`.
    pub fn new(degrees: Degrees, minutes: Minutes, hemisphere: EastWest) -> Result<Self, FixError> {
        if degrees >= LONGITUDE_DEGREE_MAX {
            return Err(FixError::LongitudeOutOfRange(degrees));
        }
        check_minutes(minutes)?;

        Ok(Self {
            degrees,
            minutes,
            hemisphere,
        })
    }

    pub(crate) fn in_range(degrees: Degrees, minutes: Minutes, hemisphere: EastWest) -> Self {
        debug_assert!(degrees < LONGITUDE_DEGREE_MAX && check_minutes(minutes).is_ok());
        Self {
            degrees,
            minutes,
            hemisphere,
        }
    }

    pub fn degrees(&self) -> Degrees {
        self.degrees
    }

    pub fn minutes(&self) -> Minutes {
        self.minutes
    }

    pub fn hemisphere(&self) -> EastWest {
        self.hemisphere
    }
}

/// Positioning system mode indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositioningMode {
    Autonomous,
}

impl PositioningMode {
    pub fn as_char(self) -> char {
        match self {
            PositioningMode::Autonomous => 'A',
        }
    }
}

/// A single sampled position report.
///
/// Only the timestamp, the coordinates and the variation direction carry
/// information; the remaining fields are fixed by [`PositionFix::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    /// UTC date and time of the fix.
    pub timestamp: DateTime<Utc>,
    pub latitude: Latitude,
    pub longitude: Longitude,
    /// Speed over ground, in knots.
    pub speed_over_ground: f64,
    /// Course over ground, in degrees.
    pub course_over_ground: f64,
    /// Magnetic variation, in degrees.
    pub magnetic_variation: f64,
    pub variation_direction: EastWest,
    /// `A` (active) when true, `V` (void) otherwise.
    pub status_active: bool,
    pub positioning_mode: PositioningMode,
}

impl PositionFix {
    pub fn new(
        timestamp: DateTime<Utc>,
        latitude: Latitude,
        longitude: Longitude,
        variation_direction: EastWest,
    ) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
            speed_over_ground: 0.0,
            course_over_ground: 0.0,
            magnetic_variation: 0.0,
            variation_direction,
            status_active: true,
            positioning_mode: PositioningMode::Autonomous,
        }
    }
}
