//! Package name queries.
//!
//! A query is either an exact package name or a regular expression searched
//! anywhere in the name. A set of queries matches a name when any one of its
//! members does.

use regex::Regex;

use crate::error::StatusError;

/// A single package-name filter.
#[derive(Debug, Clone)]
pub enum Query {
    /// Match names equal to the stored string
    Exact(String),
    /// Match names containing a match of the pattern (unanchored)
    Pattern(Regex),
}

impl Query {
    pub fn exact(name: impl Into<String>) -> Self {
        Query::Exact(name.into())
    }

    /// Compile a pattern query. Invalid patterns are rejected here, never at match time.
    pub fn pattern(pattern: &str) -> Result<Self, StatusError> {
        Regex::new(pattern)
            .map(Query::Pattern)
            .map_err(|e| StatusError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Query::Exact(s) => s == name,
            Query::Pattern(re) => re.is_match(name),
        }
    }
}

/// Ordered collection of queries combined with logical OR.
#[derive(Debug, Clone, Default)]
pub struct QuerySet {
    queries: Vec<Query>,
}

impl QuerySet {
    /// Build a query set from command line arguments, treating every argument
    /// as a pattern when `as_regex` is set.
    pub fn from_args<S: AsRef<str>>(args: &[S], as_regex: bool) -> Result<Self, StatusError> {
        let queries = args
            .iter()
            .map(|arg| {
                if as_regex {
                    Query::pattern(arg.as_ref())
                } else {
                    Ok(Query::exact(arg.as_ref()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { queries })
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.queries.iter().any(|q| q.matches(name))
    }
}
