//! Environment variable handling
//!
//! Translates Postman `{{name}}` placeholders into Gatling `${name}`
//! expressions and resolves environment entries into a feeder.

pub mod resolver;

pub use resolver::{Feeder, build_feeder, translate_placeholder};
