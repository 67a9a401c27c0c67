use crate::prelude::*;
use std::fmt::{self, Display};

///
/// Trivia
/// Whitespace and comments attached around a single token.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Trivia {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub leading: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trailing: String,
}

impl Trivia {
    #[must_use]
    pub fn new(leading: impl Into<String>, trailing: impl Into<String>) -> Self {
        Self {
            leading: leading.into(),
            trailing: trailing.into(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

///
/// Binding
///
/// What the host compiler bound an identifier to. The name-resolution oracle
/// interprets this against the model; text alone is never trusted.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Binding {
    Type(String),
    Value,
    Namespace,
    #[default]
    Unbound,
}

///
/// Ident
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Ident {
    pub text: String,

    #[serde(default, skip_serializing_if = "Trivia::is_empty")]
    pub trivia: Trivia,

    #[serde(default)]
    pub binding: Binding,
}

impl Ident {
    #[must_use]
    pub fn new(text: impl Into<String>, binding: Binding) -> Self {
        Self {
            text: text.into(),
            trivia: Trivia::default(),
            binding,
        }
    }

    /// Identifier bound to the type declaration of the same name.
    #[must_use]
    pub fn ty(text: impl Into<String>) -> Self {
        let text = text.into();
        let binding = Binding::Type(text.clone());

        Self::new(text, binding)
    }

    /// Identifier bound to a value (member, local, parameter).
    #[must_use]
    pub fn value(text: impl Into<String>) -> Self {
        Self::new(text, Binding::Value)
    }

    /// Identifier with no host binding, used for declaration names.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Binding::Unbound)
    }

    #[must_use]
    pub fn with_trivia(mut self, trivia: Trivia) -> Self {
        self.trivia = trivia;
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.trivia.leading, self.text, self.trivia.trailing)
    }
}

///
/// Access
/// Distinguishes namespace qualification (`A.B`) from member access (`a.B`).
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Access {
    #[default]
    Qualified,
    Member,
}

///
/// Syntax
///
/// Tagged-variant tree covering type references and the bodies that contain
/// them. Anything the engine never needs to look inside is an opaque `Token`.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Syntax {
    Name(Ident),
    Qualified {
        left: Box<Syntax>,
        right: Ident,
        #[serde(default)]
        access: Access,
    },
    Generic {
        name: Box<Syntax>,
        args: Vec<Syntax>,
    },
    Array {
        element: Box<Syntax>,
        #[serde(default, skip_serializing_if = "Trivia::is_empty")]
        trivia: Trivia,
    },
    Token {
        text: String,
        #[serde(default, skip_serializing_if = "Trivia::is_empty")]
        trivia: Trivia,
    },
    List(Vec<Syntax>),
}

impl Syntax {
    /// Reference to a type by simple name.
    #[must_use]
    pub fn ty(name: impl Into<String>) -> Self {
        Self::Name(Ident::ty(name))
    }

    /// Reference to a value by simple name.
    #[must_use]
    pub fn value(name: impl Into<String>) -> Self {
        Self::Name(Ident::value(name))
    }

    /// Generic instantiation of a type with the given arguments.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::generic_of(Self::ty(name), args)
    }

    /// Generic instantiation whose head is any type reference, e.g. a
    /// qualified `System.Collections.Generic.List`.
    #[must_use]
    pub fn generic_of(head: Self, args: Vec<Self>) -> Self {
        Self::Generic {
            name: Box::new(head),
            args,
        }
    }

    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array {
            element: Box::new(element),
            trivia: Trivia::default(),
        }
    }

    #[must_use]
    pub fn token(text: impl Into<String>) -> Self {
        Self::Token {
            text: text.into(),
            trivia: Trivia::default(),
        }
    }

    /// Namespace-qualified type reference, e.g. `["App", "Entities"]` + `User`.
    #[must_use]
    pub fn qualified(namespace: &[&str], name: impl Into<String>) -> Self {
        let mut iter = namespace.iter();
        let Some(first) = iter.next() else {
            return Self::ty(name);
        };

        let mut left = Self::Name(Ident::new(*first, Binding::Namespace));
        for segment in iter {
            left = Self::Qualified {
                left: Box::new(left),
                right: Ident::new(*segment, Binding::Namespace),
                access: Access::Qualified,
            };
        }

        Self::Qualified {
            left: Box::new(left),
            right: Ident::ty(name),
            access: Access::Qualified,
        }
    }

    /// Member access expression `target.member`.
    #[must_use]
    pub fn member(target: Self, member: Ident) -> Self {
        Self::Qualified {
            left: Box::new(target),
            right: member,
            access: Access::Member,
        }
    }

    // leading_trivia
    // trivia before the first token of this node
    #[must_use]
    pub fn leading_trivia(&self) -> &str {
        match self {
            Self::Name(ident) => &ident.trivia.leading,
            Self::Qualified { left, .. } | Self::Generic { name: left, .. } => {
                left.leading_trivia()
            }
            Self::Array { element, .. } => element.leading_trivia(),
            Self::Token { trivia, .. } => &trivia.leading,
            Self::List(items) => items.first().map_or("", Self::leading_trivia),
        }
    }

    // trailing_trivia
    // trivia after the last token of this node; generic argument lists close
    // on a bare `>` that carries none
    #[must_use]
    pub fn trailing_trivia(&self) -> &str {
        match self {
            Self::Name(ident) => &ident.trivia.trailing,
            Self::Qualified { right, .. } => &right.trivia.trailing,
            Self::Array { trivia, .. } | Self::Token { trivia, .. } => &trivia.trailing,
            Self::Generic { .. } => "",
            Self::List(items) => items.last().map_or("", Self::trailing_trivia),
        }
    }

    /// Trivia surrounding the whole node, for nodes that replace it.
    #[must_use]
    pub fn outer_trivia(&self) -> Trivia {
        Trivia::new(self.leading_trivia(), self.trailing_trivia())
    }

    /// The simple identifier naming this type reference, if it is one. For a
    /// generic instantiation this is the identifier naming its head.
    #[must_use]
    pub fn head_ident(&self) -> Option<&Ident> {
        match self {
            Self::Name(ident) => Some(ident),
            Self::Qualified { right, .. } => Some(right),
            Self::Generic { name, .. } => name.head_ident(),
            _ => None,
        }
    }
}

impl Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(ident) => write!(f, "{ident}"),
            Self::Qualified { left, right, .. } => write!(f, "{left}.{right}"),
            Self::Generic { name, args } => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Self::Array { element, trivia } => {
                write!(f, "{element}[]{}", trivia.trailing)
            }
            Self::Token { text, trivia } => {
                write!(f, "{}{text}{}", trivia.leading, trivia.trailing)
            }
            Self::List(items) => items.iter().try_for_each(|item| write!(f, "{item}")),
        }
    }
}
