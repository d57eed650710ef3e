//! Build orchestration: themes x platforms -> written files and a report.

pub mod error;
pub mod orchestrate;
pub mod report;
pub mod writer;

pub use error::BuildError;
pub use orchestrate::{build, BuildOptions, DEFAULT_BUILD_PATH};
pub use report::{compute_etag, BuildReport, Outcome, PairReport, Stage, WrittenFile};
pub use writer::{FileSystemWriter, InMemoryWriter, OutputWriter};
