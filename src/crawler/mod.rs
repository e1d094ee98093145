//! Concrete crawler definitions
//!
//! This module contains the selector-driven crawler used by the CLI, and the
//! HTML helpers it is built on.

mod parser;
mod selector;

pub use parser::{resolve_link, select_fields, select_links};
pub use selector::SelectorCrawler;
