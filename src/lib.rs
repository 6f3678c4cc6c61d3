pub mod api;
pub mod chain;
pub mod config;
pub mod export;
pub mod logging;
pub mod upstream;
pub mod watchlist;
