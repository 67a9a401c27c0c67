//! Output sink boundary.
//!
//! The engine hands over finished artifacts keyed by mirror name; rendering
//! and file emission belong to the host.

use crate::{
    configuration::MirroredConfiguration,
    contract::RootContract,
    entity::MirroredEntity,
    prelude::*,
    root::MirroredRoot,
};
use std::collections::BTreeMap;

///
/// Artifact
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Artifact {
    Entity(MirroredEntity),
    Configuration(MirroredConfiguration),
    Root(MirroredRoot),
    Contract(RootContract),
}

impl Artifact {
    /// Mirror name the artifact is emitted under.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Entity(a) => a.id(),
            Self::Configuration(a) => a.id(),
            Self::Root(a) => a.id(),
            Self::Contract(a) => a.id(),
        }
    }

    #[must_use]
    pub const fn decl(&self) -> &TypeDecl {
        match self {
            Self::Entity(a) => &a.decl,
            Self::Configuration(a) => &a.decl,
            Self::Root(a) => &a.decl,
            Self::Contract(a) => &a.decl,
        }
    }
}

///
/// OutputSink
///

pub trait OutputSink {
    fn emit(&mut self, key: &str, artifact: Artifact);
}

///
/// MemoryOutput
/// Collects artifacts by key; also records emission order.
///

#[derive(Debug, Default)]
pub struct MemoryOutput {
    artifacts: BTreeMap<String, Artifact>,
    order: Vec<String>,
}

impl MemoryOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Artifact> {
        self.artifacts.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Keys in the order they were emitted.
    #[must_use]
    pub fn order(&self) -> &[String] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Deterministic JSON rendering of everything collected.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.artifacts)
    }
}

impl OutputSink for MemoryOutput {
    fn emit(&mut self, key: &str, artifact: Artifact) {
        self.order.push(key.to_string());
        self.artifacts.insert(key.to_string(), artifact);
    }
}
