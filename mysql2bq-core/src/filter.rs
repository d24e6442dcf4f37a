//! Table selection by include/exclude lists.

use serde::{Deserialize, Serialize};

/// Include/exclude filter over table names.
///
/// A non-empty include list selects exactly those tables and the exclude
/// list is then ignored. Otherwise every table not excluded is selected.
/// Names match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    #[serde(default)]
    pub included: Vec<String>,
    #[serde(default)]
    pub excluded: Vec<String>,
}

impl TableFilter {
    /// Creates a filter from include and exclude lists.
    pub fn new(included: Vec<String>, excluded: Vec<String>) -> Self {
        Self { included, excluded }
    }

    /// Checks whether a table is selected.
    pub fn matches(&self, table_name: &str) -> bool {
        if self.included.is_empty() {
            !self.excluded.iter().any(|t| t == table_name)
        } else {
            self.included.iter().any(|t| t == table_name)
        }
    }

    /// Filters table names, keeping their original order.
    pub fn apply<I, S>(&self, table_names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        table_names
            .into_iter()
            .map(Into::into)
            .filter(|name| self.matches(name))
            .collect()
    }

    /// Included table names that are missing from `available`.
    pub fn missing_includes<'a>(&'a self, available: &[String]) -> Vec<&'a str> {
        self.included
            .iter()
            .filter(|name| !available.contains(name))
            .map(String::as_str)
            .collect()
    }
}
