use std::collections::HashMap;

use super::value::Value;

/// Named input values for one evaluation.
///
/// # Example
///
/// ```
/// use kisoku::DecisionInput;
///
/// let input = DecisionInput::new()
///     .set("AGE", 25_i64)
///     .set("REGION", "EMEA");
/// assert_eq!(input.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionInput {
    values: HashMap<String, Value>,
}

impl DecisionInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, consuming and returning the input for chaining.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// A copy of `self` overlaid with every entry of `overrides`; overrides win.
    #[must_use]
    pub fn merged(&self, overrides: &DecisionInput) -> DecisionInput {
        let mut values = self.values.clone();
        values.extend(
            overrides
                .values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        DecisionInput { values }
    }

    /// Overlay `overrides` onto `self` in place.
    pub fn merge(&mut self, overrides: DecisionInput) {
        self.values.extend(overrides.values);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DecisionInput {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
