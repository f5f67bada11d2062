//! Resolution strategies
//!
//! A [`NumberSource`] turns a corpus and the candidate name set into
//! name/number pairs for one architecture. Table files and preprocessor
//! probes are the two strategies today; the aggregator only ever sees the
//! trait, so another backend can be slotted in without touching it.

use crate::corpus::Corpus;
use crate::discovery::NameSet;
use crate::error::Result;
use crate::headers::{HeaderSource, Preprocessor};
use crate::table::TableSource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One resolved syscall number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Table key, e.g. `read` or `ARM_breakpoint`
    pub name: String,
    pub value: u64,
}

impl ResolvedEntry {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Shared inputs for every source of one run
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub corpus: &'a Corpus,
    pub names: &'a NameSet,
    pub preprocessor: &'a Preprocessor,
}

/// A strategy that yields syscall numbers for one architecture
pub trait NumberSource {
    /// Produce entries in no particular order
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Vec<ResolvedEntry>>;
}

/// Configured resolution strategy, as declared in a target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    /// Tab-separated `syscall.tbl` file filtered by ABI tag
    Table(TableSource),
    /// Preprocessor probe of the architecture's `asm/unistd.h`
    Headers(HeaderSource),
}

impl NumberSource for Source {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Vec<ResolvedEntry>> {
        match self {
            Source::Table(table) => table.resolve(ctx),
            Source::Headers(headers) => headers.resolve(ctx),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Table(table) => {
                let abis: Vec<&str> = table.abis.iter().map(String::as_str).collect();
                write!(f, "table {} [{}]", table.path.display(), abis.join(","))
            }
            Source::Headers(headers) if headers.defines.is_empty() => {
                write!(f, "headers {}", headers.arch)
            }
            Source::Headers(headers) => write!(
                f,
                "headers {} ({})",
                headers.arch,
                headers.defines.lines().collect::<Vec<_>>().join("; ")
            ),
        }
    }
}
