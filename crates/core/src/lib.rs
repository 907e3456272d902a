//! Core types, lifecycle engine, and analytics for the session tracker.

pub mod analytics;
pub mod error;
pub mod page;
pub mod request;
pub mod service;
pub mod session;
pub mod store;
pub mod timefmt;

pub use error::{Error, Result};
pub use page::*;
pub use request::*;
pub use session::*;
pub use store::*;
