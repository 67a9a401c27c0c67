use crate::{
    context::MirrorContext,
    prelude::*,
    rewrite::TypeRewriter,
};

///
/// MirroredConfiguration
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MirroredConfiguration {
    pub entity: EntityRef,
    pub source: String,
    pub decl: TypeDecl,
}

impl MirroredConfiguration {
    #[must_use]
    pub fn id(&self) -> &str {
        self.decl.id()
    }
}

///
/// ConfigurationTransformer
///

pub struct ConfigurationTransformer<'a> {
    ctx: &'a MirrorContext<'a>,
    rewriter: &'a TypeRewriter<'a>,
}

impl<'a> ConfigurationTransformer<'a> {
    #[must_use]
    pub const fn new(ctx: &'a MirrorContext<'a>, rewriter: &'a TypeRewriter<'a>) -> Self {
        Self { ctx, rewriter }
    }

    /// Rename the configuration to its mirror and rewrite its whole body.
    #[must_use]
    pub fn transform(&self, configuration: &ConfigurationDecl) -> MirroredConfiguration {
        let decl = &configuration.decl;
        let ident = Ident::plain(self.ctx.naming.mirror(decl.id()))
            .with_trivia(decl.ident.trivia.clone());

        MirroredConfiguration {
            entity: configuration.entity.clone(),
            source: decl.id().to_string(),
            decl: self.rewriter.rewrite_decl_as(decl, ident),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::MirrorableNames;

    #[test]
    fn configuration_is_renamed_and_rewritten() {
        let mut model = Model::new();
        model.add_declaration(TypeDecl::class("User")).unwrap();
        let config = GeneratorConfig::default();
        let resolver = ModelResolver::new(&model);
        let ctx = MirrorContext::new(&model, &resolver, &config);
        let names: MirrorableNames = ["User"].into_iter().collect();
        let rewriter = TypeRewriter::new(&ctx, &names);

        let decl = TypeDecl::class("UserConfiguration")
            .with_base(Syntax::generic(
                "IEntityTypeConfiguration",
                vec![Syntax::ty("User")],
            ))
            .with_member(Member::method(
                "Configure",
                Syntax::ty("void"),
                vec![Param::new(
                    "builder",
                    Syntax::generic("EntityTypeBuilder", vec![Syntax::ty("User")]),
                )],
            ));
        let configuration = ConfigurationDecl::new("User", decl);

        let out = ConfigurationTransformer::new(&ctx, &rewriter).transform(&configuration);

        assert_eq!(out.id(), "ReadOnlyUserConfiguration");
        assert_eq!(out.source, "UserConfiguration");
        assert_eq!(out.entity, EntityRef::new("User"));
        assert_eq!(
            out.decl.bases[0].to_string(),
            "IEntityTypeConfiguration<ReadOnlyUser>"
        );
        let MemberKind::Method { params, .. } = &out.decl.members[0].kind else {
            panic!("expected method");
        };
        assert_eq!(params[0].ty.to_string(), "EntityTypeBuilder<ReadOnlyUser>");
    }
}
