pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod middleware;
pub mod server;
