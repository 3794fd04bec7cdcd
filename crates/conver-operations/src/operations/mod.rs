mod context;
mod init;
mod pre;
mod promote;
mod select;
mod status;
mod version;

pub use init::{InitInput, InitOperation, InitOutput};
pub use pre::{
    PreEnterInput, PreEnterOperation, PreExitInput, PreExitOperation, PreOutcome, PreOutput,
};
pub use promote::{PromoteInput, PromoteOperation, PromoteOutcome, PromoteOutput};
pub use status::{PackageClass, PackageStatus, StatusOperation, StatusOutput};
pub use version::{
    PendingVersion, VersionInput, VersionOperation, VersionOutcome, VersionOutput,
};
