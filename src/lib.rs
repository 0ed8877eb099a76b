//! gridstore - command-script front end for the gridstore worksheet engine.

pub mod config;
pub mod dump;
pub mod error;
pub mod script;

pub use error::{Result, ScriptError};
pub use script::{Command, Runner, parse_command};
