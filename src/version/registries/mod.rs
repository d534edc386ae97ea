//! Registry implementations for listing image tags

pub mod ecr_public;

pub use ecr_public::EcrPublicRegistry;
