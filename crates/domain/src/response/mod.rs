//! Response types

mod headers;
mod spec;

pub use headers::ResponseHeaders;
pub use spec::{RawResponse, StatusCode};
