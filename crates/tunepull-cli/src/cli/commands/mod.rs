//! CLI command handlers.

mod download;
mod fetch_list;

pub use download::run_download;
pub use fetch_list::run_fetch_list;
