//! Core library for Yuka engine assets.
//!
//! `format::yks` reads and writes compiled scripts at the instruction level, `script` turns
//! them into statement trees and back, and `format::ykc` manages archives.

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod error;
pub mod format;
pub mod script;

pub use config::{ExternalizeConfig, YukaConfig, YukaConfigBuilder};
pub use error::{ArchiveError, ArchiveResult, ScriptError, ScriptResult};
pub use format::ykc::{Archive, SaveMode};
pub use script::Script;
pub use yuka_nls::Encoding;
