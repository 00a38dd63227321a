pub mod data;
pub mod io;
pub mod printing;

#[cfg(test)]
mod tests;

pub use data::{Config, McpServer};
pub use io::ConfigError;
