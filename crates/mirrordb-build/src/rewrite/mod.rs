//! Type reference rewriting.
//!
//! A pure, structure-preserving transform: references whose resolved symbol is
//! a mirrorable type are renamed to the mirror, everything else is copied with
//! its trivia untouched. Renamed nodes take the trivia of the node they
//! replace.


use crate::{
    context::MirrorContext,
    prelude::*,
    shape::{FamilyShape, ShapeMatcher},
};
use mirrordb_schema::resolve::follow_aliases;
use std::collections::BTreeSet;

///
/// MirrorableNames
/// Identifiers of every type whose references are renamed to a mirror.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MirrorableNames(BTreeSet<String>);

impl MirrorableNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.0.insert(id.into());
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for MirrorableNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for MirrorableNames {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

///
/// TypeRewriter
///

pub struct TypeRewriter<'a> {
    resolver: &'a dyn Resolve,
    naming: &'a MirrorNaming,
    names: &'a MirrorableNames,
    comparers: FamilyShape,
    comparer_collections: FamilyShape,
    collection_view: &'a str,
}

impl<'a> TypeRewriter<'a> {
    #[must_use]
    pub fn new(ctx: &'a MirrorContext<'a>, names: &'a MirrorableNames) -> Self {
        let shapes = &ctx.config.shapes;

        Self {
            resolver: ctx.resolver,
            naming: &ctx.naming,
            names,
            comparers: FamilyShape::new(&shapes.comparers),
            comparer_collections: FamilyShape::new(&shapes.comparer_collections),
            collection_view: &ctx.config.views.collection,
        }
    }

    #[must_use]
    pub const fn names(&self) -> &MirrorableNames {
        self.names
    }

    // mirror_of
    // mirror name for an identifier that resolves to a mirrorable type,
    // following aliases the same way classification does
    fn mirror_of(&self, ident: &Ident) -> Option<String> {
        let start = Syntax::Name(ident.clone());
        let target = follow_aliases(self.resolver, &start)?;

        // an alias of an instantiation keeps its own name
        if matches!(*target.syntax, Syntax::Generic { .. }) {
            return None;
        }

        let symbol = target.symbol.as_type()?;

        self.names
            .contains(&symbol.id)
            .then(|| self.naming.mirror(&symbol.id))
    }

    fn rename(&self, ident: &Ident) -> Ident {
        self.mirror_of(ident).map_or_else(
            || ident.clone(),
            |mirror| Ident::ty(mirror).with_trivia(ident.trivia.clone()),
        )
    }

    /// Rewrite a syntax subtree.
    #[must_use]
    pub fn rewrite_syntax(&self, syntax: &Syntax) -> Syntax {
        match syntax {
            Syntax::Name(ident) => Syntax::Name(self.rename(ident)),

            Syntax::Qualified {
                left,
                right,
                access,
            } => match self.mirror_of(right) {
                // mirrors are emitted beside their sources, so the qualifier
                // is dropped; only confirmed types collapse
                Some(mirror) => Syntax::Name(Ident::ty(mirror).with_trivia(Trivia::new(
                    left.leading_trivia(),
                    right.trivia.trailing.as_str(),
                ))),
                None => Syntax::Qualified {
                    left: Box::new(self.rewrite_syntax(left)),
                    right: right.clone(),
                    access: *access,
                },
            },

            // the head goes through the name rules, so a qualified
            // mirrorable head collapses like any other qualified type
            Syntax::Generic { name, args } => self
                .rewrite_comparer(name, args)
                .unwrap_or_else(|| Syntax::Generic {
                    name: Box::new(self.rewrite_syntax(name)),
                    args: args.iter().map(|arg| self.rewrite_syntax(arg)).collect(),
                }),

            Syntax::Array { element, trivia } => Syntax::Array {
                element: Box::new(self.rewrite_syntax(element)),
                trivia: trivia.clone(),
            },

            Syntax::Token { .. } => syntax.clone(),

            Syntax::List(items) => {
                Syntax::List(items.iter().map(|item| self.rewrite_syntax(item)).collect())
            }
        }
    }

    // rewrite_comparer
    // Comparer<List<T>> over a mirrorable T compares the mirrored view type
    fn rewrite_comparer(&self, name: &Syntax, args: &[Syntax]) -> Option<Syntax> {
        let [arg] = args else {
            return None;
        };
        if !self.comparers.matches(name, self.resolver) {
            return None;
        }

        let element = self.comparer_collections.element(arg, self.resolver)?;
        if matches!(element, Syntax::Generic { .. }) {
            return None;
        }
        self.mirror_of(element.head_ident()?)?;

        let view =
            Ident::ty(self.collection_view).with_trivia(Trivia::new(arg.leading_trivia(), ""));

        Some(Syntax::generic_of(
            self.rewrite_syntax(name),
            vec![Syntax::generic_of(
                Syntax::Name(view),
                vec![self.rewrite_syntax(element)],
            )],
        ))
    }

    fn rewrite_body(&self, body: &Body) -> Body {
        match body {
            Body::Block(syntax) => Body::Block(self.rewrite_syntax(syntax)),
            Body::Expression(syntax) => Body::Expression(self.rewrite_syntax(syntax)),
            Body::None | Body::Unsupported { .. } => body.clone(),
        }
    }

    fn rewrite_params(&self, params: &[Param]) -> Vec<Param> {
        params
            .iter()
            .map(|param| Param {
                ident: param.ident.clone(),
                ty: self.rewrite_syntax(&param.ty),
                default: param.default.as_ref().map(|d| self.rewrite_syntax(d)),
            })
            .collect()
    }

    fn rewrite_type_params(&self, params: &[TypeParam]) -> Vec<TypeParam> {
        params
            .iter()
            .map(|param| TypeParam {
                ident: param.ident.clone(),
                constraints: param
                    .constraints
                    .iter()
                    .map(|c| self.rewrite_syntax(c))
                    .collect(),
            })
            .collect()
    }

    /// Rewrite every syntax position of a member.
    #[must_use]
    pub fn rewrite_member(&self, member: &Member) -> Member {
        let kind = match &member.kind {
            MemberKind::Property {
                ty,
                mutability,
                body,
            } => MemberKind::Property {
                ty: self.rewrite_syntax(ty),
                mutability: *mutability,
                body: body.as_ref().map(|b| self.rewrite_syntax(b)),
            },
            MemberKind::Field {
                ty,
                mutability,
                initializer,
            } => MemberKind::Field {
                ty: self.rewrite_syntax(ty),
                mutability: *mutability,
                initializer: initializer.as_ref().map(|i| self.rewrite_syntax(i)),
            },
            MemberKind::Method {
                returns,
                type_params,
                params,
                body,
            } => MemberKind::Method {
                returns: self.rewrite_syntax(returns),
                type_params: self.rewrite_type_params(type_params),
                params: self.rewrite_params(params),
                body: self.rewrite_body(body),
            },
            MemberKind::Constructor { params, body } => MemberKind::Constructor {
                params: self.rewrite_params(params),
                body: self.rewrite_body(body),
            },
        };

        Member {
            ident: member.ident.clone(),
            modifiers: member.modifiers.clone(),
            explicit_interface: member
                .explicit_interface
                .as_ref()
                .map(|i| self.rewrite_syntax(i)),
            kind,
        }
    }

    /// Rewrite a declaration under a new name; constructors named after the
    /// old name follow it.
    #[must_use]
    pub fn rewrite_decl_as(&self, decl: &TypeDecl, ident: Ident) -> TypeDecl {
        let old = decl.id();

        let members = decl
            .members
            .iter()
            .map(|member| {
                let mut member = self.rewrite_member(member);
                if matches!(member.kind, MemberKind::Constructor { .. }) && member.name() == old {
                    member.ident = Ident::plain(ident.as_str())
                        .with_trivia(member.ident.trivia.clone());
                }
                member
            })
            .collect();

        TypeDecl {
            ident,
            kind: decl.kind,
            modifiers: decl.modifiers.clone(),
            type_params: self.rewrite_type_params(&decl.type_params),
            bases: decl.bases.iter().map(|b| self.rewrite_syntax(b)).collect(),
            members,
        }
    }

    /// Rewrite a declaration, renaming it too when it is mirrorable itself.
    #[must_use]
    pub fn rewrite_decl(&self, decl: &TypeDecl) -> TypeDecl {
        let ident = if self.names.contains(decl.id()) {
            Ident::plain(self.naming.mirror(decl.id())).with_trivia(decl.ident.trivia.clone())
        } else {
            decl.ident.clone()
        };

        self.rewrite_decl_as(decl, ident)
    }
}
