//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod directives;
pub(crate) mod parse;

pub(crate) use build::BuildArgs;
pub(crate) use directives::DirectivesArgs;
pub(crate) use parse::ParseArgs;
