//! # Bloom Runtime
//!
//! Wires a `MembershipFilter` to a store and serves line commands.
//!
//! ## Modules
//!
//! - `config/` - Environment and file configuration
//! - `commands/` - Command parsing and execution
//! - `session/` - Stdin/stdout command loop

pub mod commands;
pub mod config;
pub mod session;

pub use commands::{execute, Command, CommandError};
pub use config::RuntimeConfig;
pub use session::serve;
