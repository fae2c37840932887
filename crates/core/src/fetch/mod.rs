//! File transfer abstraction.
//!
//! A `FileFetcher` performs one network fetch of a file body. The per-attempt
//! wall clock belongs to the download worker, so implementations carry no
//! request timeout of their own.

mod http;
mod traits;

pub use http::HttpFileFetcher;
pub use traits::{FetchError, FileFetcher};
