//! Strategy selectors for merging and diffing.
//!
//! [`MergeStrategy`] and [`DiffStrategy`] are closed and disjoint. Each has a
//! stable string identifier, and naming a strategy from the other family where
//! one is expected fails with [`Error::UnsupportedStrategy`].

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::json_diff::{self, DetailedDiff, DiffSummary, StructuralDiff};
use crate::json_merge::{self, MergeFn, MergeOutcome};
use crate::json_patch::Op;

const MERGE_AXIS: &str = "merge";
const DIFF_AXIS: &str = "diff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeStrategy {
    Replace,
    Shallow,
    Recursive,
    Deep,
    Distinct,
    MergePatch,
    ConflictAware,
}

impl MergeStrategy {
    pub const ALL: [MergeStrategy; 7] = [
        MergeStrategy::Replace,
        MergeStrategy::Shallow,
        MergeStrategy::Recursive,
        MergeStrategy::Deep,
        MergeStrategy::Distinct,
        MergeStrategy::MergePatch,
        MergeStrategy::ConflictAware,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Replace => "replace",
            MergeStrategy::Shallow => "shallow",
            MergeStrategy::Recursive => "recursive",
            MergeStrategy::Deep => "deep",
            MergeStrategy::Distinct => "distinct",
            MergeStrategy::MergePatch => "merge_patch",
            MergeStrategy::ConflictAware => "conflict_aware",
        }
    }

    /// The pure `(target, source) -> result` function behind this strategy.
    pub fn merge_fn(&self) -> MergeFn {
        match self {
            MergeStrategy::Replace => json_merge::replace,
            MergeStrategy::Shallow => json_merge::shallow,
            MergeStrategy::Recursive => json_merge::recursive,
            MergeStrategy::Deep => json_merge::deep,
            MergeStrategy::Distinct => json_merge::distinct,
            MergeStrategy::MergePatch => json_merge::merge_patch,
            MergeStrategy::ConflictAware => json_merge::conflict_aware,
        }
    }
}

impl FromStr for MergeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MergeStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| unsupported(s, MERGE_AXIS))
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffStrategy {
    Structural,
    Rfc6902,
    Detailed,
    Summary,
}

impl DiffStrategy {
    pub const ALL: [DiffStrategy; 4] = [
        DiffStrategy::Structural,
        DiffStrategy::Rfc6902,
        DiffStrategy::Detailed,
        DiffStrategy::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStrategy::Structural => "structural",
            DiffStrategy::Rfc6902 => "rfc6902",
            DiffStrategy::Detailed => "detailed",
            DiffStrategy::Summary => "summary",
        }
    }
}

impl FromStr for DiffStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DiffStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| unsupported(s, DIFF_AXIS))
    }
}

impl fmt::Display for DiffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any strategy identifier, from either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Merge(MergeStrategy),
    Diff(DiffStrategy),
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(strategy) = s.parse() {
            return Ok(Strategy::Merge(strategy));
        }
        s.parse()
            .map(Strategy::Diff)
            .map_err(|_| unsupported(s, "merge or diff"))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Merge(s) => s.fmt(f),
            Strategy::Diff(s) => s.fmt(f),
        }
    }
}

fn unsupported(strategy: &str, axis: &'static str) -> Error {
    Error::UnsupportedStrategy {
        strategy: strategy.to_string(),
        axis,
    }
}

/// Identifier to function table for every merge strategy, in declaration order.
pub fn merge_registry() -> IndexMap<&'static str, MergeFn> {
    MergeStrategy::ALL
        .into_iter()
        .map(|strategy| (strategy.as_str(), strategy.merge_fn()))
        .collect()
}

/// Merge `source` into `target` with `strategy`.
///
/// Only [`MergeStrategy::ConflictAware`] can report conflicts; it runs without
/// a base here, see [`json_merge::merge_three_way`] for the three-way form.
pub fn merge(strategy: MergeStrategy, target: &Value, source: &Value) -> MergeOutcome {
    match strategy {
        MergeStrategy::ConflictAware => json_merge::merge_three_way(target, source, None),
        other => MergeOutcome::clean(other.merge_fn()(target, source)),
    }
}

/// [`merge`] with a strategy from either family; diff strategies are rejected.
pub fn merge_with(strategy: Strategy, target: &Value, source: &Value) -> Result<MergeOutcome> {
    match strategy {
        Strategy::Merge(s) => Ok(merge(s, target, source)),
        Strategy::Diff(s) => Err(unsupported(s.as_str(), MERGE_AXIS)),
    }
}

/// Output of a diff strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", content = "report", rename_all = "snake_case")]
pub enum DiffReport {
    Structural(StructuralDiff),
    Rfc6902(Vec<Op>),
    Detailed(DetailedDiff),
    Summary(DiffSummary),
}

/// Compare `source` with `target` using `strategy`.
pub fn diff(strategy: DiffStrategy, source: &Value, target: &Value) -> DiffReport {
    match strategy {
        DiffStrategy::Structural => DiffReport::Structural(json_diff::structural(source, target)),
        DiffStrategy::Rfc6902 => DiffReport::Rfc6902(json_diff::rfc6902(source, target)),
        DiffStrategy::Detailed => DiffReport::Detailed(json_diff::detailed(source, target)),
        DiffStrategy::Summary => DiffReport::Summary(json_diff::summary(source, target)),
    }
}

/// [`diff`] with a strategy from either family; merge strategies are rejected.
pub fn diff_with(strategy: Strategy, source: &Value, target: &Value) -> Result<DiffReport> {
    match strategy {
        Strategy::Diff(s) => Ok(diff(s, source, target)),
        Strategy::Merge(s) => Err(unsupported(s.as_str(), DIFF_AXIS)),
    }
}
