//! Name-resolution oracle boundary.
//!
//! Every rename decision is confirmed by resolving the reference node to a
//! symbol; identifier text alone never decides whether something is a type.

use crate::prelude::*;
use std::borrow::Cow;

/// Maximum alias hops followed before giving up on a reference.
pub const MAX_ALIAS_DEPTH: usize = 8;

///
/// TypeSymbol
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeSymbol {
    pub id: String,

    /// Whether the model holds a declaration for this type.
    pub local: bool,
}

///
/// Symbol
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Symbol {
    Type(TypeSymbol),
    Alias(Syntax),
    Value,
    Namespace,
    Unknown,
}

impl Symbol {
    #[must_use]
    pub const fn as_type(&self) -> Option<&TypeSymbol> {
        match self {
            Self::Type(symbol) => Some(symbol),
            _ => None,
        }
    }
}

///
/// Resolve
///

pub trait Resolve {
    fn resolve(&self, ident: &Ident) -> Symbol;
}

impl<R: Resolve + ?Sized> Resolve for &R {
    fn resolve(&self, ident: &Ident) -> Symbol {
        (**self).resolve(ident)
    }
}

///
/// ModelResolver
/// Interprets host bindings against the model registry.
///

#[derive(Clone, Copy, Debug)]
pub struct ModelResolver<'a> {
    model: &'a Model,
}

impl<'a> ModelResolver<'a> {
    #[must_use]
    pub const fn new(model: &'a Model) -> Self {
        Self { model }
    }
}

impl Resolve for ModelResolver<'_> {
    fn resolve(&self, ident: &Ident) -> Symbol {
        match &ident.binding {
            Binding::Type(id) => {
                if let Some(target) = self.model.alias(id) {
                    return Symbol::Alias(target.clone());
                }

                Symbol::Type(TypeSymbol {
                    id: id.clone(),
                    local: self.model.declaration(id).is_some(),
                })
            }
            Binding::Value => Symbol::Value,
            Binding::Namespace => Symbol::Namespace,
            Binding::Unbound => Symbol::Unknown,
        }
    }
}

///
/// AliasTarget
/// Where an alias chain ends: the reference reached and what its head
/// resolves to. `symbol` is never `Alias`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AliasTarget<'t> {
    pub syntax: Cow<'t, Syntax>,
    pub symbol: Symbol,
}

impl AliasTarget<'_> {
    /// The local entity declaration the target names, if any.
    #[must_use]
    pub fn entity(&self, model: &Model) -> Option<EntityRef> {
        let symbol = self.symbol.as_type()?;
        let decl = model.declaration(&symbol.id)?;

        decl.kind
            .is_entity_kind()
            .then(|| EntityRef::new(symbol.id.as_str()))
    }
}

/// Follow aliases from `ty` until its head no longer resolves to one. At most
/// `MAX_ALIAS_DEPTH` aliases are followed; a longer chain yields `None`.
/// Nodes without a head (arrays, tokens) end the chain as `Symbol::Unknown`.
#[must_use]
pub fn follow_aliases<'t, R: Resolve + ?Sized>(
    resolver: &R,
    ty: &'t Syntax,
) -> Option<AliasTarget<'t>> {
    let mut current = Cow::Borrowed(ty);

    for _ in 0..=MAX_ALIAS_DEPTH {
        let symbol = match current.head_ident() {
            Some(ident) => resolver.resolve(ident),
            None => Symbol::Unknown,
        };

        match symbol {
            Symbol::Alias(target) => current = Cow::Owned(target),
            symbol => {
                return Some(AliasTarget {
                    syntax: current,
                    symbol,
                });
            }
        }
    }

    None
}

/// Resolve a type reference to the local entity declaration it denotes,
/// following aliases. Non-entity kinds and external types yield `None`.
#[must_use]
pub fn resolve_entity<R: Resolve + ?Sized>(
    model: &Model,
    resolver: &R,
    ty: &Syntax,
) -> Option<EntityRef> {
    follow_aliases(resolver, ty)?.entity(model)
}
