pub mod assembler;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod parser;
pub mod provider;
pub mod range;
pub mod reference;
pub mod render;
pub mod ui;

pub use error::{ChangelogError, Result};
