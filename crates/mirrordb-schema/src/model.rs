//! Declaration registry handed to the engine by the model loader.
//!
//! The registry is an arena keyed by canonical identifier; entity graphs that
//! reference each other (including cycles) are expressed as identifiers, never
//! as owning links.

use crate::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

///
/// ModelError
///

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("duplicate declaration '{0}'")]
    DuplicateDeclaration(String),

    #[error("duplicate aggregate root '{0}'")]
    DuplicateRoot(String),

    #[error("alias '{0}' shadows a declaration")]
    AliasShadowsDeclaration(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

///
/// ModelDef
/// Serialized form of a model, as supplied by a host.
///

#[derive(Debug, Default, Deserialize)]
struct ModelDef {
    #[serde(default)]
    roots: Vec<AggregateRootDecl>,

    #[serde(default)]
    declarations: Vec<TypeDecl>,

    #[serde(default)]
    aliases: BTreeMap<String, Syntax>,

    #[serde(default)]
    configurations: Vec<ConfigurationDecl>,
}

///
/// Model
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Model {
    roots: Vec<AggregateRootDecl>,
    declarations: BTreeMap<String, TypeDecl>,
    aliases: BTreeMap<String, Syntax>,
    configurations: Vec<ConfigurationDecl>,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a host-supplied model, rejecting duplicate identifiers.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let def: ModelDef = serde_json::from_str(json)?;

        let mut model = Self::new();
        for decl in def.declarations {
            model.add_declaration(decl)?;
        }
        for (name, target) in def.aliases {
            model.add_alias(name, target)?;
        }
        for root in def.roots {
            model.add_root(root)?;
        }
        for configuration in def.configurations {
            model.add_configuration(configuration);
        }

        Ok(model)
    }

    // add_declaration
    pub fn add_declaration(&mut self, decl: TypeDecl) -> Result<(), ModelError> {
        let id = decl.id().to_string();
        if self.declarations.contains_key(&id) || self.aliases.contains_key(&id) {
            return Err(ModelError::DuplicateDeclaration(id));
        }

        self.declarations.insert(id, decl);

        Ok(())
    }

    // add_alias
    pub fn add_alias(&mut self, name: impl Into<String>, target: Syntax) -> Result<(), ModelError> {
        let name = name.into();
        if self.declarations.contains_key(&name) {
            return Err(ModelError::AliasShadowsDeclaration(name));
        }
        if self.aliases.contains_key(&name) {
            return Err(ModelError::DuplicateDeclaration(name));
        }

        self.aliases.insert(name, target);

        Ok(())
    }

    // add_root
    pub fn add_root(&mut self, root: AggregateRootDecl) -> Result<(), ModelError> {
        if self.roots.iter().any(|r| r.id() == root.id()) {
            return Err(ModelError::DuplicateRoot(root.id().to_string()));
        }

        self.roots.push(root);

        Ok(())
    }

    /// Duplicate configurations for one entity are kept; the first one wins.
    pub fn add_configuration(&mut self, configuration: ConfigurationDecl) {
        self.configurations.push(configuration);
    }

    #[must_use]
    pub fn declaration(&self, id: &str) -> Option<&TypeDecl> {
        self.declarations.get(id)
    }

    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&Syntax> {
        self.aliases.get(name)
    }

    pub fn declarations(&self) -> impl Iterator<Item = &TypeDecl> {
        self.declarations.values()
    }

    #[must_use]
    pub fn roots(&self) -> &[AggregateRootDecl] {
        &self.roots
    }

    /// One configuration per entity, first declared wins.
    #[must_use]
    pub fn configurations(&self) -> Vec<&ConfigurationDecl> {
        let mut seen = BTreeSet::new();

        self.configurations
            .iter()
            .filter(|c| seen.insert(c.entity.clone()))
            .collect()
    }
}
