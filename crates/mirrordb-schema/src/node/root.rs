use crate::{prelude::*, resolve::resolve_entity};

///
/// EntityRef
///
/// Name-resolved pointer to an entity declaration in the model. Identifies,
/// does not own.
///

#[derive(
    Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("{_0}")]
pub struct EntityRef(pub String);

impl EntityRef {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

///
/// ExposedElement
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ExposedElement {
    Entity(EntityRef),

    /// Element type with no local declaration, kept as display text.
    Unresolved { ty: String },
}

///
/// ExposedCollection
/// A persisted collection the aggregate root exposes to consumers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ExposedCollection {
    pub member: String,
    pub element: ExposedElement,
}

impl ExposedCollection {
    #[must_use]
    pub fn entity(member: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            element: ExposedElement::Entity(EntityRef::new(entity)),
        }
    }

    #[must_use]
    pub fn unresolved(member: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            element: ExposedElement::Unresolved { ty: ty.into() },
        }
    }

    #[must_use]
    pub const fn entity_ref(&self) -> Option<&EntityRef> {
        match &self.element {
            ExposedElement::Entity(entity) => Some(entity),
            ExposedElement::Unresolved { .. } => None,
        }
    }
}

///
/// AggregateRootDecl
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AggregateRootDecl {
    pub decl: TypeDecl,

    #[serde(default)]
    pub exposed: Vec<ExposedCollection>,
}

impl AggregateRootDecl {
    #[must_use]
    pub const fn new(decl: TypeDecl, exposed: Vec<ExposedCollection>) -> Self {
        Self { decl, exposed }
    }

    /// Derive the exposed collections from members typed as a single-argument
    /// instantiation of the configured exposed-collection type.
    #[must_use]
    pub fn discover<R: Resolve + ?Sized>(
        decl: TypeDecl,
        model: &Model,
        resolver: &R,
        config: &GeneratorConfig,
    ) -> Self {
        let collection = config.discovery.exposed_collection.as_str();

        let exposed = decl
            .members
            .iter()
            .filter_map(|member| {
                let MemberKind::Property { ty, .. } = &member.kind else {
                    return None;
                };
                let Syntax::Generic { name, args } = ty else {
                    return None;
                };
                let [element] = args.as_slice() else {
                    return None;
                };
                if name.head_ident().map(Ident::as_str) != Some(collection) {
                    return None;
                }

                let element = match resolve_entity(model, resolver, element) {
                    Some(entity) => ExposedElement::Entity(entity),
                    None => ExposedElement::Unresolved {
                        ty: element.to_string().trim().to_string(),
                    },
                };

                Some(ExposedCollection {
                    member: member.name().to_string(),
                    element,
                })
            })
            .collect();

        Self { decl, exposed }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.decl.id()
    }

    /// Entities the root exposes directly; the worklist seeds.
    pub fn seeds(&self) -> impl Iterator<Item = &EntityRef> {
        self.exposed.iter().filter_map(ExposedCollection::entity_ref)
    }
}
