//! Root-scoped filesystem operations used by the conversion pipeline.

mod delete;
pub(crate) mod io;
mod patch;
mod write;

pub use delete::{DeleteResponse, delete_all, delete_path};
pub use patch::{PatchResponse, PatchRule, PatchSet, apply_rules, patch_file};
pub use write::{WriteResponse, append_text, copy_stub, replace_with_stub};
