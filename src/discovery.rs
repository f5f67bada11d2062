//! Candidate syscall name discovery
//!
//! The catalog is not hand-maintained: every `__NR_<name>` or
//! `__<ABI>_NR_<name>` reference anywhere in the tree is a candidate. The
//! tree is searched with `git grep` and the hits are reduced to a set of
//! (prefix, name) pairs.

use crate::corpus::Corpus;
use crate::error::{NrError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::process::Command;

/// Fewer distinct names than this means the search itself is broken
pub const MIN_SYSCALL_NAMES: usize = 380;

/// Basic regex handed to `git grep`
pub const SEARCH_PATTERN: &str = r"\<__\([A-Z]\+_\)\?NR_";

static SYSCALL_NR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b__([A-Z]+_)?NR_([a-z0-9_]+)\b").expect("SYSCALL_NR is a valid regex")
});

/// A syscall referenced in the tree, optionally scoped to an ABI prefix
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyscallName {
    /// Uppercase ABI tag without the trailing underscore (`ARM`), or empty
    pub prefix: String,
    /// Lowercase syscall identifier
    pub name: String,
}

/// Deduplicated, ordered candidate set
pub type NameSet = BTreeSet<SyscallName>;

impl SyscallName {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    fn prefix_with_separator(&self) -> String {
        if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}_", self.prefix)
        }
    }

    /// The kernel macro, e.g. `__NR_read` or `__ARM_NR_breakpoint`
    pub fn macro_name(&self) -> String {
        format!("__{}NR_{}", self.prefix_with_separator(), self.name)
    }

    /// Table key, e.g. `read` or `ARM_breakpoint`
    pub fn label(&self) -> String {
        format!("{}{}", self.prefix_with_separator(), self.name)
    }
}

impl fmt::Display for SyscallName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.macro_name())
    }
}

/// Extract every syscall-number macro reference from `text`
pub fn scan_names(text: &str) -> NameSet {
    SYSCALL_NR
        .captures_iter(text)
        .map(|caps| {
            let prefix = caps
                .get(1)
                .map(|m| m.as_str().trim_end_matches('_'))
                .unwrap_or_default();
            SyscallName::new(prefix, &caps[2])
        })
        .collect()
}

/// Run `git grep` over the corpus and return its raw output
///
/// Exit status 1 with no output is git's "no matches" and yields an empty
/// string; every other failure is a toolchain error.
pub fn search_corpus(corpus: &Corpus) -> Result<String> {
    let tool = "git grep".to_string();
    tracing::debug!("searching {} for {}", corpus.root().display(), SEARCH_PATTERN);

    let output = Command::new("git")
        .args(["--no-pager", "grep", SEARCH_PATTERN])
        .current_dir(corpus.root())
        .output()
        .map_err(|source| NrError::Spawn {
            tool: tool.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() || (output.status.code() == Some(1) && stdout.is_empty()) {
        return Ok(stdout);
    }

    Err(NrError::Toolchain {
        tool,
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Abort when fewer than [`MIN_SYSCALL_NAMES`] names were found
pub fn check_integrity(names: &NameSet, raw: &str) -> Result<()> {
    if names.len() < MIN_SYSCALL_NAMES {
        return Err(NrError::CorpusIntegrity {
            found: names.len(),
            threshold: MIN_SYSCALL_NAMES,
            raw: raw.to_string(),
        });
    }
    Ok(())
}

/// Search the corpus, extract candidates and apply the sanity guard
pub fn discover(corpus: &Corpus) -> Result<NameSet> {
    let raw = search_corpus(corpus)?;
    let names = scan_names(&raw);
    tracing::info!("discovered {} candidate syscall names", names.len());
    check_integrity(&names, &raw)?;
    Ok(names)
}
