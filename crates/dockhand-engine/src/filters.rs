//! Engine list filters.
//!
//! The engine takes filters as a JSON object mapping a filter name to the
//! accepted values, e.g. `{"dangling":["true"]}`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::EngineResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, Vec<String>>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter with one name and one accepted value.
    pub fn single(name: &str, value: &str) -> Self {
        Self::new().with(name, [value])
    }

    /// Add accepted values for `name`, keeping any already present.
    pub fn with<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(name.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
