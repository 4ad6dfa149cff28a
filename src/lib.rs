pub mod advisor;
pub mod cli;
pub mod config;
pub mod encoder;
pub mod error;
pub mod interactive;
pub mod relay;
pub mod report;
pub mod scanner;
