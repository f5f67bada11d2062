//! Kernel source tree handle
//!
//! The corpus root is passed explicitly to every component instead of
//! living in process-global state, so each resolution pass can run against
//! a synthetic tree.

use std::path::{Path, PathBuf};

/// Read-only view of a kernel source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    root: PathBuf,
}

impl Corpus {
    /// Create a corpus rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a tree-relative path
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// UAPI include directory for an architecture, e.g. `arch/arm64/include/uapi`
    pub fn arch_uapi_dir(&self, arch: &str) -> PathBuf {
        self.root.join("arch").join(arch).join("include").join("uapi")
    }

    /// Architecture-independent include directory
    pub fn generic_include_dir(&self) -> PathBuf {
        self.root.join("include")
    }
}

impl Default for Corpus {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_corpus_is_current_dir() {
        assert_eq!(Corpus::default().root(), Path::new("."));
    }

    #[test]
    fn test_arch_uapi_dir() {
        let corpus = Corpus::new("/src/linux");
        assert_eq!(
            corpus.arch_uapi_dir("arm64"),
            PathBuf::from("/src/linux/arch/arm64/include/uapi")
        );
        assert_eq!(
            corpus.generic_include_dir(),
            PathBuf::from("/src/linux/include")
        );
    }

    #[test]
    fn test_join_relative_table_path() {
        let corpus = Corpus::new("linux");
        assert_eq!(
            corpus.join("arch/x86/entry/syscalls/syscall_64.tbl"),
            PathBuf::from("linux/arch/x86/entry/syscalls/syscall_64.tbl")
        );
    }
}
