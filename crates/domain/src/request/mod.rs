//! Request types
//!
//! Everything needed to describe an HTTP call before it is sent.

mod body;
mod header;
mod method;
mod path;
mod query;
mod spec;

pub use body::{ContentType, RequestBody};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use path::{PathParams, Placeholder, expand_template, parse_placeholders};
pub use query::{QueryParam, QueryParams, QueryValue};
pub use spec::{RequestOptions, RequestSpec};
