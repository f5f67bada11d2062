//! Loader for `syscall.tbl` files
//!
//! Each row is `<number>\t<abi>\t<name>[\t<entry point>...]`. Rows whose ABI
//! tag is not in the accepted set are ignored, as are blank lines and `#`
//! comments.

use crate::corpus::Corpus;
use crate::error::{NrError, Result};
use crate::source::{NumberSource, ResolveContext, ResolvedEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Table-file strategy: a tree-relative path plus the ABI tags to accept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSource {
    pub path: PathBuf,
    pub abis: BTreeSet<String>,
}

impl TableSource {
    pub fn new<I, S>(path: impl Into<PathBuf>, abis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            abis: abis.into_iter().map(Into::into).collect(),
        }
    }
}

impl NumberSource for TableSource {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Vec<ResolvedEntry>> {
        load_table(ctx.corpus, &self.path, &self.abis)
    }
}

/// Parse table text, keeping rows tagged with one of `abis`
///
/// `origin` is only used to label errors.
pub fn parse_table(
    content: &str,
    abis: &BTreeSet<String>,
    origin: &Path,
) -> Result<Vec<ResolvedEntry>> {
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let malformed = || NrError::MalformedTableRow {
            path: origin.to_path_buf(),
            line: idx + 1,
            text: line.to_string(),
        };

        let mut fields = line.split('\t');
        let (Some(nr), Some(abi), Some(name)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };

        if !abis.contains(abi) {
            continue;
        }

        let value = nr.parse::<u64>().map_err(|_| malformed())?;
        entries.push(ResolvedEntry::new(name, value));
    }

    Ok(entries)
}

/// Read a tree-relative table file and parse it
pub fn load_table(
    corpus: &Corpus,
    relative: &Path,
    abis: &BTreeSet<String>,
) -> Result<Vec<ResolvedEntry>> {
    let path = corpus.join(relative);
    let content = fs::read_to_string(&path).map_err(|source| NrError::Read {
        path: path.clone(),
        source,
    })?;

    let entries = parse_table(&content, abis, &path)?;
    tracing::debug!(
        "{}: {} rows accepted for {:?}",
        path.display(),
        entries.len(),
        abis
    );
    Ok(entries)
}
