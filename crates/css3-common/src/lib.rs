//! Shared utilities for the css3 crate family.
//!
//! This crate provides the small bit of infrastructure that sits outside the
//! parser's own return values:
//! - **Diagnostics** - deduplicated, developer-facing notices for conditions
//!   that are worth a note but are not part of a stylesheet's returned data
//!   (such as an at-rule handler registration overwriting an existing one).

pub mod diagnostics;
