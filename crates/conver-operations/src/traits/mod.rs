mod history_provider;
mod interaction;
mod manifest_writer;
mod project_provider;
mod state_io;

pub use history_provider::HistoryProvider;
pub use interaction::{InteractionProvider, PackageSelection};
pub use manifest_writer::{ManifestWriteReport, ManifestWriteRequest, ManifestWriter};
pub use project_provider::ProjectProvider;
pub use state_io::StateIO;
