//! Conversion server
//!
//! Serves a bundled front-end and six JSON conversion endpoints
//! (`/api/FsToIs`, `/api/IsToFs`, `/api/IpToFp`, `/api/IsToIp`,
//! `/api/FsToFp`, `/api/FpToIp`). Each endpoint takes `{"data": <any>}`
//! and answers `{"out": <converted>}`; every converter currently passes
//! the payload through unchanged.

pub mod api;
pub mod config;
pub mod convert;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::{AppState, Config};
pub use convert::{Conversion, ConverterTable};
pub use error::ServerError;
