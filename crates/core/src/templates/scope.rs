use std::collections::BTreeMap;

use tracing::warn;

use crate::vars::DateFormatter;

/// Reserved scope name of the date-formatting function.
pub const DATE_FORMAT_FN: &str = "format";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeValue {
    Text(String),
    DateFormat(DateFormatter),
}

/// Names visible to template expressions.
///
/// Always carries the date-formatting function under [`DATE_FORMAT_FN`];
/// string variables can never replace it.
#[derive(Debug, Clone)]
pub struct RenderScope {
    values: BTreeMap<String, ScopeValue>,
}

impl RenderScope {
    pub fn new(formatter: DateFormatter) -> Self {
        let mut values = BTreeMap::new();
        values.insert(DATE_FORMAT_FN.to_string(), ScopeValue::DateFormat(formatter));
        Self { values }
    }

    /// Bind a string variable. Returns `false` (and keeps the function) when
    /// `name` is reserved.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if name == DATE_FORMAT_FN {
            warn!("variable '{name}' is reserved for the date helper; ignoring it");
            return false;
        }
        self.values.insert(name, ScopeValue::Text(value.into()));
        true
    }

    pub fn extend<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.insert(k, v);
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScopeValue> {
        self.values.get(name)
    }

    /// Variable names in scope, sorted (includes the date helper).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
