use crate::checksum;
use crate::fix::PositionFix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Talker and sentence identifier every accepted sentence starts with.
pub const PREFIX: &str = "$GPRMC";

/// Number of data fields following the `GPRMC` identifier.
const FIELD_COUNT: usize = 12;

/// A single `$GPRMC` line, checksum included, without line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence(String);

impl Sentence {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Sentence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a raw sentence was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    WrongPrefix,
    Malformed,
    ChecksumMismatch,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::WrongPrefix => write!(f, "does not start with {}", PREFIX),
            RejectReason::Malformed => write!(f, "malformed sentence"),
            RejectReason::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(RejectReason),
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(*reason),
        }
    }
}

/// How much of an incoming sentence is checked before it is accepted.
///
/// `Permissive` only looks at the prefix, so anything starting with `$GPRMC`
/// ends up in storage. `Strict` also requires the full field count and a
/// matching checksum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    #[default]
    Permissive,
    Strict,
}

/// Formats a fix as a `$GPRMC` sentence.
///
/// Degrees and minutes are written back to back with no separator and the
/// minutes use the shortest float representation, so `37°14.5027'` becomes
/// `3714.5027` and `5°0.25'` becomes `50.25`. Receivers on the other end rely
/// on this exact layout.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use nmea::fix::{EastWest, Latitude, Longitude, NorthSouth, PositionFix};
/// use nmea::sentence::encode;
///
/// let fix = PositionFix::new(
///     Utc.with_ymd_and_hms(2024, 10, 1, 10, 45, 12).unwrap(),
///     Latitude::new(37, 14.5027, NorthSouth::North).unwrap(),
///     Longitude::new(76, 58.3318, EastWest::West).unwrap(),
///     EastWest::East,
/// );
///
/// assert_eq!(
///     encode(&fix).as_str(),
///     "$GPRMC,104512.00,A,3714.5027,N,7658.3318,W,0.0,0.0,011024,0.0,E,A*16"
/// );
/// ```
pub fn encode(fix: &PositionFix) -> Sentence {
    // Leap seconds report up to 1999 ms; the field only has room for two digits.
    let centis = (fix.timestamp.timestamp_subsec_millis() / 10).min(99);
    let status = if fix.status_active { 'A' } else { 'V' };

    let body = format!(
        "GPRMC,{}.{:02},{},{}{},{},{}{},{},{:.1},{:.1},{},{:.1},{},{}",
        fix.timestamp.format("%H%M%S"),
        centis,
        status,
        fix.latitude.degrees(),
        fix.latitude.minutes(),
        fix.latitude.hemisphere().as_char(),
        fix.longitude.degrees(),
        fix.longitude.minutes(),
        fix.longitude.hemisphere().as_char(),
        fix.speed_over_ground,
        fix.course_over_ground,
        fix.timestamp.format("%d%m%y"),
        fix.magnetic_variation,
        fix.variation_direction.as_char(),
        fix.positioning_mode.as_char(),
    );

    let cs = checksum::to_hex(checksum::compute(body.as_bytes()));
    Sentence(format!("${}*{}", body, cs))
}

/// Validates an incoming sentence with the default, prefix-only policy.
pub fn decode_and_validate(raw: &str) -> ValidationResult {
    validate(raw, ValidationPolicy::Permissive)
}

pub fn validate(raw: &str, policy: ValidationPolicy) -> ValidationResult {
    if !raw.starts_with(PREFIX) {
        return ValidationResult::Invalid(RejectReason::WrongPrefix);
    }

    if policy == ValidationPolicy::Permissive {
        return ValidationResult::Valid;
    }

    let Some((body, _)) = raw[1..].split_once('*') else {
        return ValidationResult::Invalid(RejectReason::Malformed);
    };
    if body.split(',').count() != FIELD_COUNT + 1 {
        return ValidationResult::Invalid(RejectReason::Malformed);
    }
    if !checksum::verify(raw) {
        return ValidationResult::Invalid(RejectReason::ChecksumMismatch);
    }

    ValidationResult::Valid
}
