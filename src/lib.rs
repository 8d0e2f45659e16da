//! Library crate for subscan-rs: concurrent subdomain resolution with latency and port probing.
pub mod config;
pub mod error;
pub mod ports;
pub mod probe;
pub mod progress;
pub mod resolver;
pub mod scanner;
pub mod store;
pub mod types;
pub mod wordlist;
