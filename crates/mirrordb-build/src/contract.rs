use crate::{context::MirrorContext, prelude::*, root::MirroredRoot};

///
/// RootContract
/// Interface describing the read-only surface of a mirrored root.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RootContract {
    pub root: String,
    pub decl: TypeDecl,
}

impl RootContract {
    #[must_use]
    pub fn id(&self) -> &str {
        self.decl.id()
    }
}

///
/// ContractSynthesizer
///

pub struct ContractSynthesizer<'a> {
    ctx: &'a MirrorContext<'a>,
}

impl<'a> ContractSynthesizer<'a> {
    #[must_use]
    pub const fn new(ctx: &'a MirrorContext<'a>) -> Self {
        Self { ctx }
    }

    // synthesize
    #[must_use]
    pub fn synthesize(&self, root: &MirroredRoot) -> RootContract {
        let config = &self.ctx.config.root;
        let queryable = |arg: Syntax| Syntax::generic(&self.ctx.config.views.queryable, vec![arg]);

        let mut decl = TypeDecl::interface(&root.contract);
        decl.modifiers = vec![Modifier::Public, Modifier::Partial];
        decl.bases = config.disposables.iter().map(Syntax::ty).collect();

        for view in &root.exposed {
            let ty = queryable(Syntax::ty(self.ctx.naming.mirror(view.element.id())));
            decl.members.push(get_only(&view.member, ty));
        }

        decl.members.push(
            Member::new(
                &config.query_method,
                MemberKind::Method {
                    returns: queryable(Syntax::ty(&config.query_type_param)),
                    type_params: vec![TypeParam::new(
                        &config.query_type_param,
                        vec![Syntax::token(&config.query_constraint)],
                    )],
                    params: Vec::new(),
                    body: Body::None,
                },
            )
            .with_modifiers(Vec::new()),
        );
        decl.members.push(get_only(
            &config.facade_member,
            Syntax::ty(&config.facade_type),
        ));

        RootContract {
            root: root.id().to_string(),
            decl,
        }
    }
}

fn get_only(name: &str, ty: Syntax) -> Member {
    Member::property(name, ty)
        .with_mutability(Mutability::ReadOnly)
        .with_modifiers(Vec::new())
}
