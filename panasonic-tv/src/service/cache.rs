use std::collections::HashMap;

/// Last value seen per state variable
///
/// A variable may be cached as absent; an absent value and a variable never
/// seen compare equal.
#[derive(Debug, Default, Clone)]
pub struct StateCache {
    values: HashMap<String, Option<String>>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` if it differs from the cached one
    ///
    /// Returns `true` when the value changed and a notification is due.
    pub fn update(&mut self, variable: &str, value: Option<&str>) -> bool {
        if self.get(variable) == value {
            return false;
        }
        self.values
            .insert(variable.to_string(), value.map(str::to_string));
        true
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.values.get(variable).and_then(|v| v.as_deref())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
