//! `$GPRMC` position reports: fix model, sentence codec, checksum and a
//! synthetic fix source.

pub mod checksum;
pub mod fix;
pub mod generator;
pub mod sentence;

pub use fix::{EastWest, FixError, Latitude, Longitude, NorthSouth, PositionFix};
pub use generator::FixGenerator;
pub use sentence::{
    RejectReason, Sentence, ValidationPolicy, ValidationResult, decode_and_validate, encode,
};
