use crate::prelude::*;

///
/// Mutability
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum Mutability {
    #[default]
    ReadWrite,
    InitOnly,
    ReadOnly,
}

impl Mutability {
    /// Collapse write access to construction-time initialization.
    #[must_use]
    pub const fn to_init_only(self) -> Self {
        match self {
            Self::ReadWrite => Self::InitOnly,
            other => other,
        }
    }
}

///
/// Body
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Body {
    #[default]
    None,
    Block(Syntax),
    Expression(Syntax),

    /// Always fails when invoked, carrying the failure message.
    Unsupported { message: String },
}

impl Body {
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

///
/// Param
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Param {
    pub ident: Ident,
    pub ty: Syntax,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Syntax>,
}

impl Param {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Syntax) -> Self {
        Self {
            ident: Ident::value(name),
            ty,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: Syntax) -> Self {
        self.default = Some(default);
        self
    }
}

///
/// TypeParam
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeParam {
    pub ident: Ident,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Syntax>,
}

impl TypeParam {
    #[must_use]
    pub fn new(name: impl Into<String>, constraints: Vec<Syntax>) -> Self {
        Self {
            ident: Ident::ty(name),
            constraints,
        }
    }
}

///
/// MemberKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MemberKind {
    Property {
        ty: Syntax,
        #[serde(default)]
        mutability: Mutability,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<Syntax>,
    },
    Field {
        ty: Syntax,
        #[serde(default)]
        mutability: Mutability,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initializer: Option<Syntax>,
    },
    Method {
        returns: Syntax,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_params: Vec<TypeParam>,
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default)]
        body: Body,
    },
    Constructor {
        #[serde(default)]
        params: Vec<Param>,
        #[serde(default)]
        body: Body,
    },
}

///
/// Member
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Member {
    pub ident: Ident,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,

    /// Contract this member implements explicitly, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_interface: Option<Syntax>,

    pub kind: MemberKind,
}

impl Member {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            ident: Ident::plain(name),
            modifiers: vec![Modifier::Public],
            explicit_interface: None,
            kind,
        }
    }

    /// Public read-write property.
    #[must_use]
    pub fn property(name: impl Into<String>, ty: Syntax) -> Self {
        Self::new(
            name,
            MemberKind::Property {
                ty,
                mutability: Mutability::ReadWrite,
                body: None,
            },
        )
    }

    /// Public method with the given return type and parameters.
    #[must_use]
    pub fn method(name: impl Into<String>, returns: Syntax, params: Vec<Param>) -> Self {
        Self::new(
            name,
            MemberKind::Method {
                returns,
                type_params: Vec::new(),
                params,
                body: Body::None,
            },
        )
    }

    #[must_use]
    pub fn constructor(name: impl Into<String>, params: Vec<Param>, body: Body) -> Self {
        Self::new(name, MemberKind::Constructor { params, body })
    }

    #[must_use]
    pub fn with_mutability(mut self, value: Mutability) -> Self {
        match &mut self.kind {
            MemberKind::Property { mutability, .. } | MemberKind::Field { mutability, .. } => {
                *mutability = value;
            }
            MemberKind::Method { .. } | MemberKind::Constructor { .. } => {}
        }
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.ident.as_str()
    }

    /// Declared value type for properties and fields.
    #[must_use]
    pub const fn value_type(&self) -> Option<&Syntax> {
        match &self.kind {
            MemberKind::Property { ty, .. } | MemberKind::Field { ty, .. } => Some(ty),
            MemberKind::Method { .. } | MemberKind::Constructor { .. } => None,
        }
    }

    #[must_use]
    pub const fn mutability(&self) -> Option<Mutability> {
        match &self.kind {
            MemberKind::Property { mutability, .. } | MemberKind::Field { mutability, .. } => {
                Some(*mutability)
            }
            MemberKind::Method { .. } | MemberKind::Constructor { .. } => None,
        }
    }

    /// Methods and constructors carry domain behavior rather than state.
    #[must_use]
    pub const fn is_behavior(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::Method { .. } | MemberKind::Constructor { .. }
        )
    }

    #[must_use]
    pub const fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method { .. })
    }
}
