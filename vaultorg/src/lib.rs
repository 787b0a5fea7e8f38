// src/lib.rs
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod utils;

pub use cli::{Args, Command, run};
pub use config::{Config, load_config};
pub use crate::core::extract::extract;
pub use crate::core::mutation::{Engine, preview};
pub use crate::core::scanner::{Scanner, analyze, build_record, list_directories, list_markdown_files};
pub use error::VaultError;
pub use session::Session;
