mod git;
mod manifest;
mod project;
mod state_io;

pub use git::{Git2Provider, commit_from_record};
pub use manifest::FileSystemManifestWriter;
pub use project::FileSystemProjectProvider;
pub use state_io::FileSystemStateIO;
