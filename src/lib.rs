//! chatdock sends chat messages to several LLM providers through one
//! normalized interface.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the provider adapters, the dispatch function that performs
//!   one request/response cycle, chat sessions, export and configuration.
//! - [`auth`] stores and looks up API keys.
//! - [`api`] defines the chat payloads sent to providers.
//! - [`cli`] parses the command line and runs the one-shot and interactive
//!   commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod utils;
