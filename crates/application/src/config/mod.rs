//! Configuration resolution

mod resolver;

pub use resolver::ConfigResolver;
