//! Job bookkeeping: ids, the in-memory registry, artifact lookup and errors.

mod artifact;
mod errors;
mod id;
mod registry;

pub use artifact::{ResolvedArtifact, resolve_artifact};
pub use errors::JobError;
pub use id::{JobIdGenerator, system_clock_millis};
pub use registry::{DEFAULT_MAX_COMPLETED_JOBS, JobRegistry};
