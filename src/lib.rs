pub mod ai;
pub mod automation;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
