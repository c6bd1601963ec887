//! Library components of the `sibtools` command line.

pub mod config;
pub mod logging;
pub mod output;
