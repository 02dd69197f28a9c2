//! Template variables: the date helper and the variable map types.

pub mod datemath;

pub use datemath::{
    DateFormatter, DateMathError, DateOffset, Direction, DurationUnit, apply_offset,
    format_date, is_offset, parse_date, parse_offset,
};

use std::collections::BTreeMap;

/// Named string variables supplied on the command line.
pub type VarsMap = BTreeMap<String, String>;
