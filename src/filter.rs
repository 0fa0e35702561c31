//! Include/exclude name patterns and the object-kind allow-list

use std::path::Path;

use regex::Regex;

use crate::error::{Result, ScriptError};
use crate::model::{CatalogObject, ObjectKind};

/// Outcome of matching a name against a pattern set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMatch {
    Matched,
    NotMatched,
    /// No patterns configured
    Empty,
}

/// Regular expressions matched against `[schema].[name]`
#[derive(Debug, Clone, Default)]
pub struct ObjectFilter {
    patterns: Vec<Regex>,
}

impl ObjectFilter {
    /// Compile every pattern up front so a bad one fails before any database work.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| ScriptError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// One pattern per line; blank lines are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::new(read_patterns(path)?)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn matches(&self, name: &str) -> FilterMatch {
        if self.patterns.is_empty() {
            return FilterMatch::Empty;
        }
        if self.patterns.iter().any(|pattern| pattern.is_match(name)) {
            FilterMatch::Matched
        } else {
            FilterMatch::NotMatched
        }
    }
}

/// Read a pattern file, trimming whitespace and dropping blank lines.
pub fn read_patterns(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| ScriptError::FilterFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Parse allow-list names such as `table` or `tableType`.
pub fn parse_kinds<I, S>(names: I) -> Result<Vec<ObjectKind>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().parse::<ObjectKind>())
        .collect()
}

/// Combined pre-render selection
#[derive(Debug, Clone)]
pub struct Selection {
    kinds: [bool; ObjectKind::COUNT],
    include: ObjectFilter,
    exclude: ObjectFilter,
}

impl Selection {
    pub fn new<K>(kinds: K, include: ObjectFilter, exclude: ObjectFilter) -> Self
    where
        K: IntoIterator<Item = ObjectKind>,
    {
        let mut mask = [false; ObjectKind::COUNT];
        for kind in kinds {
            mask[kind.index()] = true;
        }
        Self {
            kinds: mask,
            include,
            exclude,
        }
    }

    /// Every kind, no patterns.
    pub fn all() -> Self {
        Self::new(
            ObjectKind::ALL,
            ObjectFilter::default(),
            ObjectFilter::default(),
        )
    }

    pub fn kind_allowed(&self, kind: ObjectKind) -> bool {
        self.kinds[kind.index()]
    }

    pub fn included(&self, name: &str) -> bool {
        !matches!(self.include.matches(name), FilterMatch::NotMatched)
    }

    pub fn excluded(&self, name: &str) -> bool {
        matches!(self.exclude.matches(name), FilterMatch::Matched)
    }

    pub fn passes(&self, object: &CatalogObject) -> bool {
        if !self.kind_allowed(object.kind()) {
            return false;
        }
        let name = object.qualified_name();
        self.included(&name) && !self.excluded(&name)
    }
}
