//! Template parameters and accumulator scopes

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub use serde_json::Value;

/// Parameters visible to a template body
pub type Params = BTreeMap<String, Value>;

/// Global scope shared by every instance of a render pass
pub type SharedScope = Rc<RefCell<Scope>>;

/// Accumulator record for intermediate results (loop counters, running totals)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    values: BTreeMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope wrapped for sharing across a render pass
    pub fn shared() -> SharedScope {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Add one to an integer counter, starting from zero. Returns the new value.
    ///
    /// A non-integer value under `name` is replaced.
    pub fn increment(&mut self, name: &str) -> i64 {
        let next = self
            .values
            .get(name)
            .and_then(Value::as_i64)
            .unwrap_or(0)
            + 1;
        self.values.insert(name.to_string(), Value::from(next));
        next
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
