// Common utilities shared by the derive macros
//
// This module contains:
// - parse_utils: `#[mode(...)]` attribute parsing and type inspection

mod parse_utils;

pub use parse_utils::*;
