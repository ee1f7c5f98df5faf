pub mod config;
pub mod job;

pub use config::Config;
pub use job::*;
