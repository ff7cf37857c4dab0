pub mod config;
pub mod logging;

pub mod asset;
pub mod downloader;
pub mod fetch_list;
pub mod http;
pub mod manifest;
pub mod sanitize;
