//! Page handles and the pools that lend them out
//!
//! The runner never owns a browsing context. It borrows a [`Page`] from a
//! [`PagePool`], uses it for a bounded number of visits and hands it back.
//! This module contains:
//! - The `Page` and `PagePool` seams
//! - `MaxPagePool`, which caps outstanding handles on top of any pool
//! - `HttpPagePool`, a reqwest-backed pool used by the CLI

mod http;
mod limit;
mod page;

pub use http::{build_http_client, HttpPage, HttpPagePool};
pub use limit::MaxPagePool;
pub use page::{extract, Page, PagePool};
