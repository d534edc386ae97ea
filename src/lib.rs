pub mod cli;
pub mod command;
pub mod config;
pub mod dependency;
pub mod github;
pub mod image;
pub mod logging;
pub mod manifest;
pub mod version;
