pub mod adapters;
pub mod builtin_providers;
pub mod config;
pub mod dispatch;
pub mod export;
pub mod message;
pub mod providers;
pub mod session;
