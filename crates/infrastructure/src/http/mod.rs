//! HTTP infrastructure utilities.
//!
//! This module provides body encoding for the supported content types.

mod body_builder;

pub use body_builder::{BodyBuildError, build_body};
