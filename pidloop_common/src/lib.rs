//! pidloop common library
//!
//! Shared types, constants and configuration loading used by the `pidloop`
//! controller crate and any host that embeds it.
//!
//! # Module Structure
//!
//! - [`consts`] - Controller defaults (sample time, output window)
//! - [`config`] - Configuration loading trait, logging config, errors
//! - [`controller`] - Mode/direction enums, controller errors, controller config
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use pidloop_common::prelude::*;
//!
//! let mode: Mode = "auto".parse().unwrap();
//! assert_eq!(mode, Mode::Automatic);
//! ```

pub mod config;
pub mod consts;
pub mod controller;
pub mod prelude;
