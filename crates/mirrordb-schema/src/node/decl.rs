use crate::prelude::*;

///
/// DeclKind
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum DeclKind {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
}

impl DeclKind {
    /// Only reference-kind declarations can be navigated to as entities.
    #[must_use]
    pub const fn is_entity_kind(self) -> bool {
        matches!(self, Self::Class | Self::Interface)
    }
}

///
/// Modifier
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum Modifier {
    Abstract,
    Internal,
    Override,
    Partial,
    Private,
    Protected,
    Public,
    Sealed,
    Static,
    Virtual,
}

///
/// TypeDecl
///
/// A named structural declaration: entity, configuration class, aggregate
/// root, or synthesized contract.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeDecl {
    pub ident: Ident,

    #[serde(default)]
    pub kind: DeclKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<Syntax>,

    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDecl {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            ident: Ident::plain(name),
            kind,
            modifiers: vec![Modifier::Public],
            type_params: Vec::new(),
            bases: Vec::new(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Class)
    }

    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, DeclKind::Interface)
    }

    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_base(mut self, base: Syntax) -> Self {
        self.bases.push(base);
        self
    }

    /// Canonical identifier used as the registry key.
    #[must_use]
    pub fn id(&self) -> &str {
        self.ident.as_str()
    }

    // member
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Add a modifier unless it is already present.
    pub fn add_modifier(&mut self, modifier: Modifier) {
        if !self.has_modifier(modifier) {
            self.modifiers.push(modifier);
        }
    }
}
