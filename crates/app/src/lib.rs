//! Restprobe - HTTP API test client
//!
//! Builds parameterized requests against a configured service, validates
//! responses with chainable assertions and resolves configuration from
//! layered sources.
//!
//! ```ignore
//! use restprobe::{ClientBuilder, RequestOptions};
//!
//! let client = ClientBuilder::new().build()?;
//! restprobe::init_logging(client.config());
//!
//! let response = client
//!     .get("/posts/{id}", RequestOptions::new().path_param("id", 1))
//!     .await?;
//! response.assert_status(200)?.assert_path_equals("$.id", 1)?;
//! ```

mod builder;
mod logging;

pub use builder::ClientBuilder;
pub use logging::init_logging;

pub use restprobe_application::{
    ApiClient, ApplicationError, ApplicationResult, AssertionRunner, ConfigResolver,
    ResponseValidator, TransportError, ValidationError,
};
pub use restprobe_domain::{
    Assertion, AssertionFailure, AssertionReport, AssertionSuite, ContentType, Headers,
    HttpMethod, JsonType, QueryValue, RequestOptions, StatusExpectation,
};
