//! Structural classification of member types.
//!
//! A member is a navigation when its type (or the element of a supported
//! collection shape) resolves to a local class or interface declaration.
//! Collection shapes are recognized by registered matchers, never by ad hoc
//! name checks at call sites.

use crate::{context::MirrorContext, prelude::*};
use mirrordb_schema::resolve::{follow_aliases, resolve_entity};

///
/// NavigationShape
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NavigationShape {
    Scalar,
    SingleRef(EntityRef),
    CollectionRef(EntityRef),
}

impl NavigationShape {
    #[must_use]
    pub const fn entity(&self) -> Option<&EntityRef> {
        match self {
            Self::SingleRef(entity) | Self::CollectionRef(entity) => Some(entity),
            Self::Scalar => None,
        }
    }
}

///
/// MemberRole
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MemberRole {
    Scalar,
    NavigationSingle(EntityRef),
    NavigationCollection(EntityRef),
    Behavior,
}

///
/// ShapeMatcher
///
/// Recognizes one collection shape and yields its element type.
///

pub trait ShapeMatcher {
    fn element<'t>(&self, ty: &'t Syntax, resolver: &dyn Resolve) -> Option<&'t Syntax>;
}

///
/// ArrayShape
/// `T[]`
///

#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayShape;

impl ShapeMatcher for ArrayShape {
    fn element<'t>(&self, ty: &'t Syntax, _: &dyn Resolve) -> Option<&'t Syntax> {
        match ty {
            Syntax::Array { element, .. } => Some(element),
            _ => None,
        }
    }
}

///
/// FamilyShape
///
/// Single-argument generic instantiation of a named collection family, e.g.
/// `List<T>` or `System.Collections.Generic.IEnumerable<T>`. The head must
/// resolve to a type whose id, or its last dotted segment, is in the family.
///

#[derive(Clone, Debug, Default)]
pub struct FamilyShape {
    names: Vec<String>,
}

impl FamilyShape {
    #[must_use]
    pub fn new<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Whether a generic head names a member of the family.
    #[must_use]
    pub fn matches(&self, head: &Syntax, resolver: &dyn Resolve) -> bool {
        let Some(ident) = head.head_ident() else {
            return false;
        };
        let symbol = resolver.resolve(ident);
        let Some(symbol) = symbol.as_type() else {
            return false;
        };

        let last = symbol.id.rsplit('.').next().unwrap_or(&symbol.id);

        self.contains(&symbol.id) || self.contains(last)
    }
}

impl ShapeMatcher for FamilyShape {
    fn element<'t>(&self, ty: &'t Syntax, resolver: &dyn Resolve) -> Option<&'t Syntax> {
        let Syntax::Generic { name, args } = ty else {
            return None;
        };
        let [element] = args.as_slice() else {
            return None;
        };

        self.matches(name, resolver).then_some(element)
    }
}

///
/// ShapeClassifier
///

pub struct ShapeClassifier<'a> {
    model: &'a Model,
    resolver: &'a dyn Resolve,
    matchers: Vec<Box<dyn ShapeMatcher + 'a>>,
}

impl<'a> ShapeClassifier<'a> {
    /// Classifier with the array shape and the configured collection family.
    #[must_use]
    pub fn new(ctx: &MirrorContext<'a>) -> Self {
        Self {
            model: ctx.model,
            resolver: ctx.resolver,
            matchers: Vec::new(),
        }
        .with_matcher(ArrayShape)
        .with_matcher(FamilyShape::new(&ctx.config.shapes.collections))
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: impl ShapeMatcher + 'a) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    /// Element type if `ty` is any registered collection shape.
    #[must_use]
    pub fn collection_element<'t>(&self, ty: &'t Syntax) -> Option<&'t Syntax> {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.element(ty, self.resolver))
    }

    // classify
    #[must_use]
    pub fn classify(&self, ty: &Syntax) -> NavigationShape {
        let Some(target) = follow_aliases(self.resolver, ty) else {
            return NavigationShape::Scalar;
        };

        if let Some(element) = self.collection_element(&target.syntax) {
            return resolve_entity(self.model, self.resolver, element)
                .map_or(NavigationShape::Scalar, NavigationShape::CollectionRef);
        }

        // non-collection generics are never single references
        if matches!(*target.syntax, Syntax::Generic { .. }) {
            return NavigationShape::Scalar;
        }

        target
            .entity(self.model)
            .map_or(NavigationShape::Scalar, NavigationShape::SingleRef)
    }

    // role
    #[must_use]
    pub fn role(&self, member: &Member) -> MemberRole {
        if member.is_behavior() {
            return MemberRole::Behavior;
        }

        let Some(ty) = member.value_type() else {
            return MemberRole::Scalar;
        };

        match self.classify(ty) {
            NavigationShape::Scalar => MemberRole::Scalar,
            NavigationShape::SingleRef(entity) => MemberRole::NavigationSingle(entity),
            NavigationShape::CollectionRef(entity) => MemberRole::NavigationCollection(entity),
        }
    }
}
