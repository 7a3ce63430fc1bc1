//! CLI command implementations

pub(crate) mod common;
pub(crate) mod ls;
pub(crate) mod new_changeset;
pub(crate) mod new_release;
