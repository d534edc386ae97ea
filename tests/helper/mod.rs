pub mod registry;
pub mod workspace;

pub use registry::{MockRegistry, RecordingSubmitter};
pub use workspace::Workspace;
