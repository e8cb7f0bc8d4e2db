//! Core library for the a11y-merge command line application.
//!
//! Per-page accessibility audit reports are parsed by [`io::audit_csv`],
//! turned into sheet tables and flat violation rows by [`flatten`], and
//! rendered by the writers under [`io`]. The [`merge`] module orchestrates a
//! whole run over a results directory.

pub mod error;
pub mod flatten;
pub mod io;
pub mod merge;
pub mod model;
pub mod naming;

pub use error::{Result, ToolError};
