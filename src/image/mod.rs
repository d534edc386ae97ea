//! Container image builds
//!
//! - [`builder`]: `ImageBuilder` trait and build request
//! - [`kaniko`]: kaniko executor implementation

pub mod builder;
pub mod kaniko;

pub use builder::{BuildError, BuildRequest, ImageBuilder};
pub use kaniko::KanikoBuilder;
