//! Test fixtures and sample data
//!
//! Canned Azure OpenAI response bodies and small builders used by the
//! service unit tests.

#[cfg(test)]
mod chat_fixtures;
#[cfg(test)]
mod deployment_fixtures;
#[cfg(test)]
mod error_fixtures;
#[cfg(test)]
mod file_fixtures;
#[cfg(test)]
mod fine_tuning_fixtures;

#[cfg(test)]
pub use chat_fixtures::*;
#[cfg(test)]
pub use deployment_fixtures::*;
#[cfg(test)]
pub use error_fixtures::*;
#[cfg(test)]
pub use file_fixtures::*;
#[cfg(test)]
pub use fine_tuning_fixtures::*;
