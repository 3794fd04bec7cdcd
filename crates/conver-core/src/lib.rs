pub mod error;
mod bump;
mod commit;
mod pattern;
mod state;
mod update;
mod workspace;

pub use bump::Bump;
pub use commit::{Commit, FileChange, FileChangeKind};
pub use error::*;
pub use pattern::PackagePattern;
pub use state::StickyState;
pub use update::VersionUpdate;
pub use workspace::{Dependency, DependencyKind, Package, Workspace};
