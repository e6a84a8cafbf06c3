use rust_decimal::Decimal;

use crate::entry::Entry;

/// One row of input: an ordered mapping from column name to coefficient,
/// plus an integer right-hand side.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraint {
    entries: Vec<Entry>,
    rhs: i64,
}

impl Constraint {
    pub fn new(rhs: i64) -> Self {
        Self {
            entries: Vec::new(),
            rhs,
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: Decimal) -> Self {
        self.set(name, value);
        self
    }

    /// Insert `name` at the end, or overwrite its value if already present
    pub fn set(&mut self, name: impl Into<String>, value: Decimal) {
        let name = name.into();
        match self.entries.iter_mut().find(|e| e.name() == name) {
            Some(entry) => entry.set_value(value),
            None => self.entries.push(Entry::new(name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.entries.iter().find(|e| e.name() == name).map(Entry::value)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Entry::name)
    }

    pub fn rhs(&self) -> i64 {
        self.rhs
    }

    pub fn set_rhs(&mut self, rhs: i64) {
        self.rhs = rhs;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
