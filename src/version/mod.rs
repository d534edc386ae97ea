//! Version management layer for build dependencies
//!
//! This module lists tags from a container registry, picks the highest
//! release and decides whether the recorded version needs an upgrade.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Registry  │────▶│  Resolver   │────▶│   Command   │
//! │ (list tags) │     │  (compare)  │     │  (persist)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │   Semver    │
//! │ (ECR Public)│     │ (tag parse) │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for listing tags from remote sources
//! - [`registries`]: Concrete registry implementations (ECR Public)
//! - [`resolver`]: Tag filtering, highest version selection, upgrade decision
//! - [`semver`]: Strict `MAJOR.MINOR.PATCH` parsing
//! - [`error`]: Error types for version parsing and registry operations

pub mod error;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod semver;
