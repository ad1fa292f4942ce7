use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::TypeSignature;

/// A named local variable slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocalInstance {
    pub index: u16,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSignature,
}

impl LocalInstance {
    pub fn new(index: u16, name: impl Into<String>, ty: TypeSignature) -> Self {
        LocalInstance {
            index,
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for LocalInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Local variable table of one method.
#[derive(Debug, Clone, Default)]
pub struct Locals {
    entries: BTreeMap<u16, LocalInstance>,
}

impl Locals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or replace) the entry for `index`.
    pub fn declare(&mut self, index: u16, name: impl Into<String>, ty: TypeSignature) {
        self.entries
            .insert(index, LocalInstance::new(index, name, ty));
    }

    pub fn get(&self, index: u16) -> Option<&LocalInstance> {
        self.entries.get(&index)
    }

    /// The declared local for `index`, or a synthesized `local<N>` of type
    /// `fallback` when the table has no entry.
    pub fn resolve(&self, index: u16, fallback: TypeSignature) -> LocalInstance {
        self.entries
            .get(&index)
            .cloned()
            .unwrap_or_else(|| LocalInstance::new(index, format!("local{index}"), fallback))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalInstance> {
        self.entries.values()
    }
}
