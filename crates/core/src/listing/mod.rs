//! Remote album listing abstraction.
//!
//! This module provides a `PageSource` trait for walking a paginated,
//! authenticated photo listing one page at a time, plus the HTTP
//! implementation and the caption-to-filename derivation.

mod caption;
mod http;
mod types;

pub use caption::derive_file_name;
pub use http::HttpPageSource;
pub use types::*;
