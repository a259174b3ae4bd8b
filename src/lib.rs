//! Solar irradiance along migratory bird tracks.
//!
//! Every fix of a tracking table becomes one SMARTS input deck; SMARTS is then
//! run once per deck and its broadband terrestrial irradiance collected into a
//! single result table.

pub mod config;
pub mod error;
pub mod headers;
pub mod observation;
pub mod pipeline;
pub mod smarts;
pub mod table;

pub use config::Config;
pub use error::{RowError, RunError};
pub use smarts::ResultCode;
