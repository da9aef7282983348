//! # Touchline
//!
//! A content backend for a youth football club website, usable both as a
//! standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! touchline = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use touchline::config::ServerConfig;
//! use touchline::media::MediaStorage;
//! use touchline::server::{AppState, create_router};
//! use touchline::store::{SqliteStore, Store};
//!
//! let config = ServerConfig::default();
//! let store = SqliteStore::new(config.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState {
//!     store: Arc::new(store),
//!     media: MediaStorage::new(config.uploads_dir()),
//!     config,
//! });
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the binary entry point. Disable with
//!   `default-features = false` for library-only use.

pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod server;
pub mod store;
pub mod types;
