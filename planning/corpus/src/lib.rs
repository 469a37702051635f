//! Discovery of benchmark instances in a directory tree of PDDL files.
//!
//! A benchmark tree is either a single domain directory (a directory holding `.pddl` files) or a
//! directory whose sub-directories are domain directories. Inside a domain directory, problem files
//! are recognized by their content and each problem is paired with the domain file it refers to.

mod dirs;
mod errors;
mod find_file;
mod problems;

pub use dirs::*;
pub use errors::*;
pub use find_file::*;
pub use problems::*;

/// Extension of all files considered by this crate.
pub const PDDL_EXTENSION: &str = "pddl";

/// Returns true if the path has a `.pddl` extension.
pub fn is_pddl(path: &std::path::Path) -> bool {
    path.extension().is_some_and(|ext| ext == PDDL_EXTENSION)
}

/// Name of a file without its `.pddl` extension, as used to label results.
pub fn file_stem(path: &std::path::Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    match name.strip_suffix(".pddl") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}
