//! Shared helpers

pub mod encoding;
pub mod paths;

pub use encoding::{DecodingReader, EncodingWriter, TextEncoding};
pub use paths::{file_name_lossy, is_same_path};
