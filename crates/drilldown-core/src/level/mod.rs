//! Level and sublevel definitions, values, and the format-string parser.
//!
//! A level is one property-based dimension of the partition hierarchy; a
//! sublevel is the finest-grained unit within it (one date granularity, one
//! prefix position, one numeric bucket). The four level variants form a
//! closed union ([`LevelDef`]) so that every consumption site matches
//! exhaustively and new variants cannot be silently ignored.

pub mod def;
pub mod granularity;
pub mod parser;
pub mod sublevel;
pub mod value;


pub use def::{DatePartsLevel, ExactValueLevel, LevelDef, NumberRangeLevel, StringPrefixLevel};
pub use granularity::{days_in_month, DatePart};
pub use parser::parse_level;
pub use sublevel::{SublevelDef, SublevelValue};
pub use value::LevelValue;
