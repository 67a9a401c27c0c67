use crate::{
    context::MirrorContext,
    prelude::*,
    shape::{MemberRole, NavigationShape, ShapeClassifier},
};
use mirrordb_schema::resolve::resolve_entity;
use std::collections::BTreeSet;

///
/// MirroredEntity
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MirroredEntity {
    pub source: EntityRef,
    pub decl: TypeDecl,
}

impl MirroredEntity {
    #[must_use]
    pub fn id(&self) -> &str {
        self.decl.id()
    }
}

///
/// EntityTransform
/// One mirrored entity plus the entities it referenced.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityTransform {
    pub mirrored: MirroredEntity,
    pub discovered: Vec<EntityRef>,
}

///
/// Discovered
/// First-seen ordered set of referenced entities.
///

#[derive(Default)]
struct Discovered {
    seen: BTreeSet<EntityRef>,
    order: Vec<EntityRef>,
}

impl Discovered {
    fn push(&mut self, entity: EntityRef) {
        if self.seen.insert(entity.clone()) {
            self.order.push(entity);
        }
    }
}

///
/// EntityTransformer
///
/// Converts one entity declaration into its mirror: state becomes
/// init-only, navigations point at mirrors, behavior is dropped.
///

pub struct EntityTransformer<'a> {
    ctx: &'a MirrorContext<'a>,
    shapes: ShapeClassifier<'a>,
}

impl<'a> EntityTransformer<'a> {
    #[must_use]
    pub fn new(ctx: &'a MirrorContext<'a>) -> Self {
        Self {
            ctx,
            shapes: ShapeClassifier::new(ctx),
        }
    }

    // transform
    #[must_use]
    pub fn transform(&self, decl: &TypeDecl) -> EntityTransform {
        let mut discovered = Discovered::default();

        let bases = self.bases(decl, &mut discovered);

        let mut members = Vec::with_capacity(decl.members.len());
        for member in &decl.members {
            if let Some(member) = self.member(member, &mut discovered) {
                members.push(member);
            }
        }

        let ident = Ident::plain(self.ctx.naming.mirror(decl.id()))
            .with_trivia(decl.ident.trivia.clone());

        let mirrored = MirroredEntity {
            source: EntityRef::new(decl.id()),
            decl: TypeDecl {
                ident,
                kind: decl.kind,
                modifiers: decl.modifiers.clone(),
                type_params: decl.type_params.clone(),
                bases,
                members,
            },
        };

        EntityTransform {
            mirrored,
            discovered: discovered.order,
        }
    }

    fn member(&self, member: &Member, discovered: &mut Discovered) -> Option<Member> {
        let retyped = match self.shapes.role(member) {
            MemberRole::Behavior => return None,
            MemberRole::Scalar => None,
            MemberRole::NavigationSingle(entity) => {
                let ty = member.value_type()?;
                let mirror = Ident::ty(self.ctx.naming.mirror(entity.id()))
                    .with_trivia(ty.outer_trivia());
                discovered.push(entity);

                Some(Syntax::Name(mirror))
            }
            MemberRole::NavigationCollection(entity) => {
                let ty = member.value_type()?;
                let view = Ident::ty(&self.ctx.config.views.collection)
                    .with_trivia(Trivia::new(ty.leading_trivia(), ""));
                let element = Syntax::ty(self.ctx.naming.mirror(entity.id()));
                discovered.push(entity);

                Some(Syntax::generic_of(Syntax::Name(view), vec![element]))
            }
        };

        let mut member = member.clone();
        match &mut member.kind {
            MemberKind::Property { ty, mutability, .. } | MemberKind::Field { ty, mutability, .. } => {
                if let Some(retyped) = retyped {
                    *ty = retyped;
                }
                *mutability = mutability.to_init_only();
            }
            MemberKind::Method { .. } | MemberKind::Constructor { .. } => return None,
        }

        Some(member)
    }

    // bases
    // resolvable bases are renamed and discovered, classes ahead of interfaces
    fn bases(&self, decl: &TypeDecl, discovered: &mut Discovered) -> Vec<Syntax> {
        let mut classes = Vec::new();
        let mut interfaces = Vec::new();

        for base in &decl.bases {
            let Some(entity) = resolve_entity(self.ctx.model, self.ctx.resolver, base) else {
                continue;
            };
            let Some(target) = self.ctx.declaration(&entity) else {
                continue;
            };

            let mirror = self.ctx.naming.mirror(entity.id());
            let renamed = match base {
                Syntax::Generic { name, args } => Syntax::generic_of(
                    Syntax::Name(Ident::ty(mirror).with_trivia(name.outer_trivia())),
                    args.iter()
                        .map(|arg| self.base_argument(arg, discovered))
                        .collect(),
                ),
                _ => Syntax::Name(Ident::ty(mirror).with_trivia(base.outer_trivia())),
            };

            match target.kind {
                DeclKind::Interface => interfaces.push(renamed),
                _ => classes.push(renamed),
            }
            discovered.push(entity);
        }

        classes.extend(interfaces);
        classes
    }

    // base_argument
    // entity arguments of a generic base point at mirrors too
    fn base_argument(&self, arg: &Syntax, discovered: &mut Discovered) -> Syntax {
        let NavigationShape::SingleRef(entity) = self.shapes.classify(arg) else {
            return arg.clone();
        };

        let mirror =
            Ident::ty(self.ctx.naming.mirror(entity.id())).with_trivia(arg.outer_trivia());
        discovered.push(entity);

        Syntax::Name(mirror)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(model: &Model, id: &str) -> EntityTransform {
        let config = GeneratorConfig::default();
        let resolver = ModelResolver::new(model);
        let ctx = MirrorContext::new(model, &resolver, &config);
        let decl = model.declaration(id).unwrap();

        EntityTransformer::new(&ctx).transform(decl)
    }

    fn shop() -> Model {
        let mut model = Model::new();
        model
            .add_declaration(
                TypeDecl::class("User")
                    .with_member(Member::property("Id", Syntax::ty("int")))
                    .with_member(Member::property("Name", Syntax::ty("string")))
                    .with_member(Member::property(
                        "Orders",
                        Syntax::generic("List", vec![Syntax::ty("Order")]),
                    ))
                    .with_member(Member::property("Favorite", Syntax::ty("Order")))
                    .with_member(Member::method("Rename", Syntax::ty("void"), Vec::new()))
                    .with_member(Member::constructor("User", Vec::new(), Body::None)),
            )
            .unwrap();
        model
            .add_declaration(
                TypeDecl::class("Order")
                    .with_member(Member::property("Id", Syntax::ty("int")))
                    .with_member(
                        Member::property("Total", Syntax::ty("decimal"))
                            .with_mutability(Mutability::ReadOnly),
                    ),
            )
            .unwrap();
        model
    }

    #[test]
    fn scalars_become_init_only_and_behavior_is_dropped() {
        let model = shop();
        let out = transform(&model, "User");
        let decl = &out.mirrored.decl;

        assert_eq!(decl.id(), "ReadOnlyUser");
        assert_eq!(out.mirrored.source, EntityRef::new("User"));
        assert!(decl.members.iter().all(|m| !m.is_behavior()));
        assert_eq!(
            decl.member("Id").and_then(Member::mutability),
            Some(Mutability::InitOnly)
        );
        assert_eq!(
            decl.member("Name").and_then(Member::value_type),
            Some(&Syntax::ty("string"))
        );
    }

    #[test]
    fn existing_read_only_members_pass_unchanged() {
        let model = shop();
        let out = transform(&model, "Order");

        assert_eq!(
            out.mirrored.decl.member("Total").and_then(Member::mutability),
            Some(Mutability::ReadOnly)
        );
        assert!(out.discovered.is_empty());
    }

    #[test]
    fn navigations_point_at_mirrors() {
        let model = shop();
        let out = transform(&model, "User");
        let decl = &out.mirrored.decl;

        assert_eq!(
            decl.member("Orders").and_then(Member::value_type),
            Some(&Syntax::generic(
                "IReadOnlyCollection",
                vec![Syntax::ty("ReadOnlyOrder")]
            ))
        );
        assert_eq!(
            decl.member("Favorite").and_then(Member::value_type),
            Some(&Syntax::ty("ReadOnlyOrder"))
        );
        assert_eq!(
            decl.member("Favorite").and_then(Member::mutability),
            Some(Mutability::InitOnly)
        );
        assert_eq!(out.discovered, vec![EntityRef::new("Order")]);
    }

    #[test]
    fn retyped_members_keep_surrounding_trivia() {
        let mut model = shop();
        model
            .add_declaration(TypeDecl::class("Cart").with_member(Member::property(
                "Owner",
                Syntax::Name(Ident::ty("User").with_trivia(Trivia::new(" ", " "))),
            )))
            .unwrap();

        let out = transform(&model, "Cart");
        let ty = out.mirrored.decl.member("Owner").and_then(Member::value_type);

        assert_eq!(ty.map(ToString::to_string).as_deref(), Some(" ReadOnlyUser "));
    }

    #[test]
    fn bases_are_renamed_with_classes_first() {
        let mut model = Model::new();
        model.add_declaration(TypeDecl::interface("IAudited")).unwrap();
        model.add_declaration(TypeDecl::class("EntityBase")).unwrap();
        model
            .add_declaration(
                TypeDecl::class("Invoice")
                    .with_base(Syntax::ty("IAudited"))
                    .with_base(Syntax::ty("IExternal"))
                    .with_base(Syntax::ty("EntityBase")),
            )
            .unwrap();

        let out = transform(&model, "Invoice");

        assert_eq!(
            out.mirrored.decl.bases,
            vec![Syntax::ty("ReadOnlyEntityBase"), Syntax::ty("ReadOnlyIAudited")]
        );
        assert_eq!(
            out.discovered,
            vec![EntityRef::new("IAudited"), EntityRef::new("EntityBase")]
        );
    }

    #[test]
    fn generic_base_keeps_arguments() {
        let mut model = Model::new();
        model.add_declaration(TypeDecl::class("Tracked")).unwrap();
        model
            .add_declaration(
                TypeDecl::class("Invoice")
                    .with_base(Syntax::generic("Tracked", vec![Syntax::ty("Guid")])),
            )
            .unwrap();

        let out = transform(&model, "Invoice");

        assert_eq!(
            out.mirrored.decl.bases,
            vec![Syntax::generic("ReadOnlyTracked", vec![Syntax::ty("Guid")])]
        );
    }

    #[test]
    fn entity_arguments_of_generic_bases_are_mirrored() {
        let mut model = shop();
        model.add_declaration(TypeDecl::class("Tracked")).unwrap();
        model
            .add_declaration(TypeDecl::class("Shipment").with_base(Syntax::generic(
                "Tracked",
                vec![Syntax::ty("Order"), Syntax::ty("Guid")],
            )))
            .unwrap();

        let out = transform(&model, "Shipment");

        assert_eq!(
            out.mirrored.decl.bases,
            vec![Syntax::generic(
                "ReadOnlyTracked",
                vec![Syntax::ty("ReadOnlyOrder"), Syntax::ty("Guid")]
            )]
        );
        assert_eq!(
            out.discovered,
            vec![EntityRef::new("Order"), EntityRef::new("Tracked")]
        );
    }

    #[test]
    fn qualified_collection_navigation_is_mirrored() {
        let mut model = shop();
        model
            .add_declaration(TypeDecl::class("Ledger").with_member(Member::property(
                "Orders",
                Syntax::generic_of(
                    Syntax::qualified(&["System", "Collections", "Generic"], "List"),
                    vec![Syntax::ty("Order")],
                ),
            )))
            .unwrap();

        let out = transform(&model, "Ledger");

        assert_eq!(
            out.mirrored
                .decl
                .member("Orders")
                .and_then(Member::value_type)
                .map(ToString::to_string)
                .as_deref(),
            Some("IReadOnlyCollection<ReadOnlyOrder>")
        );
        assert_eq!(out.discovered, vec![EntityRef::new("Order")]);
    }

    #[test]
    fn transform_is_deterministic() {
        let model = shop();

        assert_eq!(transform(&model, "User"), transform(&model, "User"));
    }
}
