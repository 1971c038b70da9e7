//! # rivet
//!
//! Command-line front end for `rivet-core`: graph loading, settings and the
//! `resolve`, `check` and `components` commands.

pub mod cli;
pub mod settings;
