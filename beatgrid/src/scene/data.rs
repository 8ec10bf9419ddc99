use std::collections::BTreeMap;

use crate::foundation::core::GridPos;

/// Closed value vocabulary for generator scratch state.
///
/// A closed set of typed variants keeps the store serializable and keeps
/// effects honest about what they stash; there is no type-erased escape
/// hatch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// A text payload (lyrics, labels).
    Text(String),
    /// A floating-point number (progress, intensity).
    Num(f64),
    /// An integer counter (offsets, counts).
    Int(i64),
    /// A boolean flag.
    Flag(bool),
    /// A grid position.
    Pos(GridPos),
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<GridPos> for Value {
    fn from(v: GridPos) -> Self {
        Self::Pos(v)
    }
}

/// String-keyed scratch state exclusively owned by one generator.
///
/// External mutation happens only through timeline events routed by the
/// owning generator's address; nothing else reaches in.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GenData {
    map: BTreeMap<String, Value>,
}

impl GenData {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace one entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.map.insert(key.into(), value.into());
    }

    /// Raw lookup.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Text value for `key`, if present and a text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.map.get(key) {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Number value for `key`. Integers coerce losslessly.
    pub fn num(&self, key: &str) -> Option<f64> {
        match self.map.get(key) {
            Some(Value::Num(v)) => Some(*v),
            Some(Value::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer value for `key`.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.map.get(key) {
            Some(Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Integer value for `key`, or `default` when absent/mistyped.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.int(key).unwrap_or(default)
    }

    /// Number value for `key`, or `default` when absent/mistyped.
    pub fn num_or(&self, key: &str, default: f64) -> f64 {
        self.num(key).unwrap_or(default)
    }

    /// Flag value for `key`, or `false` when absent/mistyped.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.map.get(key), Some(Value::Flag(true)))
    }

    /// Position value for `key`.
    pub fn pos(&self, key: &str) -> Option<GridPos> {
        match self.map.get(key) {
            Some(Value::Pos(p)) => Some(*p),
            _ => None,
        }
    }

    /// Apply `oper` to the integer at `key` (missing treated as `default`).
    pub fn update_int(&mut self, key: &str, default: i64, oper: impl FnOnce(i64) -> i64) {
        let next = oper(self.int_or(key, default));
        self.set(key, next);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
