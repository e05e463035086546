pub mod browser;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod logging;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod subsets;
pub mod tui;
