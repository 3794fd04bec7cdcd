mod plan;
mod status;

pub(crate) use plan::{format_dependency_edits, format_updates};
pub(crate) use status::{PlainTextStatusFormatter, StatusFormatter};
