//! MPR document generation: formatting, serialization, and line-ending
//! normalization.

mod format;
mod mpr;
mod normalize;

pub use format::{clamp_precision, fmt, fmt6};
pub use mpr::{generate_mpr, minimal_document};
pub use normalize::{
    encode_windows_1252, normalize_content, verify_content, write_mpr_file,
};
