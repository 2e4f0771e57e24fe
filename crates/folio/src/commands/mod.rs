//! CLI command implementations.

pub(crate) mod batch;
pub(crate) mod convert;
pub(crate) mod document;
pub(crate) mod merge;

pub(crate) use batch::BatchArgs;
pub(crate) use convert::ConvertArgs;
pub(crate) use merge::MergeArgs;
