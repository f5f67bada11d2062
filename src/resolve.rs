//! Per-architecture number tables

use crate::error::Result;
use crate::source::{NumberSource, ResolveContext, ResolvedEntry};
use crate::target::ArchTarget;
use std::collections::BTreeMap;

/// Resolved syscall numbers for one architecture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberTable {
    arch: String,
    entries: BTreeMap<String, u64>,
}

impl NumberTable {
    pub fn new(arch: impl Into<String>) -> Self {
        Self {
            arch: arch.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Insert, replacing any earlier value for the same name
    pub fn insert(&mut self, entry: ResolvedEntry) {
        self.entries.insert(entry.name, entry.value);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by uppercased name, ties broken by the original name
    pub fn sorted_entries(&self) -> Vec<(&str, u64)> {
        let mut sorted: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        sorted.sort_by(|(a, _), (b, _)| {
            a.to_ascii_uppercase()
                .cmp(&b.to_ascii_uppercase())
                .then_with(|| a.cmp(b))
        });
        sorted
    }
}

impl Extend<ResolvedEntry> for NumberTable {
    fn extend<I: IntoIterator<Item = ResolvedEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

/// Build a target's table from its sources, later sources winning
pub fn resolve_target(target: &ArchTarget, ctx: &ResolveContext<'_>) -> Result<NumberTable> {
    let mut table = NumberTable::new(&target.label);

    for source in &target.sources {
        let entries = source.resolve(ctx)?;
        tracing::debug!("{}: {} yielded {} entries", target.label, source, entries.len());
        table.extend(entries);
    }

    tracing::info!("{}: resolved {} syscalls", target.label, table.len());
    Ok(table)
}
