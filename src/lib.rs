#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;
extern crate chrono;
extern crate priority_queue;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
#[cfg(test)]
extern crate tempfile;
extern crate thiserror;
extern crate toml;
#[macro_use]
extern crate tracing;
extern crate unicode_normalization;
extern crate uuid;

pub mod assignment;
pub mod clock;
pub mod collaboration;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod leaderboard;
pub mod notification;
pub mod panel;
pub mod platform;
pub mod profile;
pub mod query;
pub mod routes;
pub mod session;
pub mod storage;
pub mod submission;
pub mod user;

pub use error::{HubError, Result};
pub use platform::PlatformStore;
pub use session::{Session, SessionStore};
