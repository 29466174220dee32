//! Stable arena identifiers for model entries.
//!
//! Every type and function gets an id when it is read. Ids are indices into the
//! arenas owned by the package model, so references between entries never hold
//! borrowed or owned copies of each other.

use serde::{Deserialize, Serialize};

/// Identifies a [`TypeInfo`](crate::TypeInfo) inside one package model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the type in the model arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a [`FunctionInfo`](crate::FunctionInfo) inside one package model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionId(u32);

impl FunctionId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the function in the model arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}
