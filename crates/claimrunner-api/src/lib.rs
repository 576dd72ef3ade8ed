//! # claimrunner api
//!
//! HTTP control surface over [`claimrunner_core::Controller`].
//!
//! ```text
//! POST /run/start          POST /run/stop          GET  /state
//! GET  /page/links         GET  /page/claimed      POST /page/claimed/sync
//! GET  /claimed            POST /claimed           POST /scan/enable
//! POST /scan/disable       POST /message           GET  /livez
//! ```

pub mod error;
pub mod http;
pub mod server;

pub use error::ApiError;
pub use http::routes::create_router;
pub use server::{ApiConfig, ApiServer};
