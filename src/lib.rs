pub mod auth;
pub mod codec;
pub mod config;
pub mod error;
pub mod mirror;
pub mod models;
pub mod service;
pub mod transport;

pub use error::JournalError;
pub use service::JournalService;
