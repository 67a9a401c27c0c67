//! Aggregate root mirroring.
//!
//! The mirrored root keeps its stored collections, exposes each one through
//! the contract as a queryable view, and refuses every commit.

use crate::{
    context::MirrorContext,
    diagnostics::Diagnostic,
    prelude::*,
    rewrite::TypeRewriter,
    trace::PipelineTraceEvent,
};
use mirrordb_schema::config::RootConfig;
use std::collections::BTreeSet;

///
/// ExposedView
/// A mirrored collection the root and its contract expose.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ExposedView {
    pub member: String,
    pub element: EntityRef,
}

///
/// MirroredRoot
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MirroredRoot {
    pub source: String,
    pub contract: String,
    pub exposed: Vec<ExposedView>,
    pub decl: TypeDecl,
}

impl MirroredRoot {
    #[must_use]
    pub fn id(&self) -> &str {
        self.decl.id()
    }
}

///
/// CommitOverload
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CommitOverload {
    Sync,
    AsyncPartial,
    Async,
}

impl CommitOverload {
    pub const ALL: [Self; 3] = [Self::Sync, Self::AsyncPartial, Self::Async];

    /// Sealed override that always fails when invoked.
    #[must_use]
    pub fn member(self, config: &RootConfig) -> Member {
        let result = Syntax::ty(&config.commit_result);
        let cancellation = || {
            Param::new(
                &config.cancellation_param,
                Syntax::ty(&config.cancellation_type),
            )
            .with_default(Syntax::token("default"))
        };

        let (name, returns, params) = match self {
            Self::Sync => (&config.commit, result, Vec::new()),
            Self::AsyncPartial => (
                &config.commit_async,
                Syntax::generic(&config.task, vec![result]),
                vec![
                    Param::new(&config.partial_commit_param, Syntax::ty("bool")),
                    cancellation(),
                ],
            ),
            Self::Async => (
                &config.commit_async,
                Syntax::generic(&config.task, vec![result]),
                vec![cancellation()],
            ),
        };

        Member::new(
            name,
            MemberKind::Method {
                returns,
                type_params: Vec::new(),
                params,
                body: Body::Unsupported {
                    message: config.commit_message_for(name),
                },
            },
        )
        .with_modifiers(vec![Modifier::Public, Modifier::Sealed, Modifier::Override])
    }
}

///
/// RootTransformer
///

pub struct RootTransformer<'a> {
    ctx: &'a MirrorContext<'a>,
    rewriter: &'a TypeRewriter<'a>,
}

impl<'a> RootTransformer<'a> {
    #[must_use]
    pub const fn new(ctx: &'a MirrorContext<'a>, rewriter: &'a TypeRewriter<'a>) -> Self {
        Self { ctx, rewriter }
    }

    // transform
    #[must_use]
    pub fn transform(&self, root: &AggregateRootDecl) -> MirroredRoot {
        let naming = &self.ctx.naming;
        let config = &self.ctx.config.root;
        let contract = naming.contract(root.id());

        let (exposed, dropped) = self.partition(root);

        let ident =
            Ident::plain(naming.mirror(root.id())).with_trivia(root.decl.ident.trivia.clone());
        let mut decl = self.rewriter.rewrite_decl_as(&root.decl, ident);

        decl.members.retain(|member| {
            let commit = member.is_method()
                && (member.name() == config.commit || member.name() == config.commit_async);
            let external = !member.is_behavior() && dropped.contains(member.name());

            !commit && !external
        });
        decl.members
            .extend(CommitOverload::ALL.map(|overload| overload.member(config)));
        decl.members
            .extend(exposed.iter().map(|view| self.accessor(view, &contract)));
        decl.members.push(self.query_forwarder(&contract));

        decl.add_modifier(Modifier::Partial);
        decl.bases.push(Syntax::ty(&contract));

        self.ctx.trace(PipelineTraceEvent::RootMirrored {
            root: root.id().to_string(),
            exposed: exposed.len(),
            dropped: dropped.len(),
        });

        MirroredRoot {
            source: root.id().to_string(),
            contract,
            exposed,
            decl,
        }
    }

    // partition
    // splits exposed collections into mirrored views and dropped member names
    fn partition(&self, root: &AggregateRootDecl) -> (Vec<ExposedView>, BTreeSet<String>) {
        let mut exposed = Vec::new();
        let mut dropped = BTreeSet::new();

        for collection in &root.exposed {
            let ty = match &collection.element {
                ExposedElement::Entity(entity) if self.rewriter.names().contains(entity.id()) => {
                    exposed.push(ExposedView {
                        member: collection.member.clone(),
                        element: entity.clone(),
                    });
                    continue;
                }
                ExposedElement::Entity(entity) => entity.id(),
                ExposedElement::Unresolved { ty } => ty.as_str(),
            };

            self.ctx.report(Diagnostic::skipped_exposed_collection(
                root.id(),
                &collection.member,
                ty,
            ));
            dropped.insert(collection.member.clone());
        }

        (exposed, dropped)
    }

    // accessor
    // `IQueryable<ReadOnlyUser> IReadOnlyShop.Users => Users;`
    fn accessor(&self, view: &ExposedView, contract: &str) -> Member {
        let ty = Syntax::generic(
            &self.ctx.config.views.queryable,
            vec![Syntax::ty(self.ctx.naming.mirror(view.element.id()))],
        );

        Member {
            ident: Ident::plain(&view.member),
            modifiers: Vec::new(),
            explicit_interface: Some(Syntax::ty(contract)),
            kind: MemberKind::Property {
                ty,
                mutability: Mutability::ReadOnly,
                body: Some(Syntax::value(&view.member)),
            },
        }
    }

    // query_forwarder
    // `IQueryable<TEntity> IReadOnlyShop.Set<TEntity>() where TEntity : class => Set<TEntity>();`
    fn query_forwarder(&self, contract: &str) -> Member {
        let config = &self.ctx.config.root;
        let param = || Syntax::ty(&config.query_type_param);

        let call = Syntax::List(vec![
            Syntax::generic_of(Syntax::value(&config.query_method), vec![param()]),
            Syntax::token("()"),
        ]);

        Member {
            ident: Ident::plain(&config.query_method),
            modifiers: Vec::new(),
            explicit_interface: Some(Syntax::ty(contract)),
            kind: MemberKind::Method {
                returns: Syntax::generic(&self.ctx.config.views.queryable, vec![param()]),
                type_params: vec![TypeParam::new(
                    &config.query_type_param,
                    vec![Syntax::token(&config.query_constraint)],
                )],
                params: Vec::new(),
                body: Body::Expression(call),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::{DiagnosticCode, DiagnosticLog},
        rewrite::MirrorableNames,
    };

    fn shop_root() -> AggregateRootDecl {
        let decl = TypeDecl::class("ShopContext")
            .with_base(Syntax::ty("DbContext"))
            .with_member(Member::property(
                "Users",
                Syntax::generic("DbSet", vec![Syntax::ty("User")]),
            ))
            .with_member(Member::property(
                "Audits",
                Syntax::generic("DbSet", vec![Syntax::ty("AuditRecord")]),
            ))
            .with_member(Member::method("SaveChanges", Syntax::ty("int"), Vec::new()))
            .with_member(Member::method(
                "SaveChangesAsync",
                Syntax::generic("Task", vec![Syntax::ty("int")]),
                Vec::new(),
            ))
            .with_member(Member::method("Describe", Syntax::ty("string"), Vec::new()));

        AggregateRootDecl::new(
            decl,
            vec![
                ExposedCollection::entity("Users", "User"),
                ExposedCollection::unresolved("Audits", "AuditRecord"),
            ],
        )
    }

    fn transform(log: &DiagnosticLog) -> MirroredRoot {
        let mut model = Model::new();
        model.add_declaration(TypeDecl::class("User")).unwrap();
        let config = GeneratorConfig::default();
        let resolver = ModelResolver::new(&model);
        let ctx = MirrorContext::new(&model, &resolver, &config).with_diagnostics(Some(log));
        let names: MirrorableNames = ["User", "ShopContext"].into_iter().collect();
        let rewriter = TypeRewriter::new(&ctx, &names);

        RootTransformer::new(&ctx, &rewriter).transform(&shop_root())
    }

    #[test]
    fn root_is_renamed_partial_and_implements_contract() {
        let root = transform(&DiagnosticLog::new());

        assert_eq!(root.id(), "ReadOnlyShopContext");
        assert_eq!(root.contract, "IReadOnlyShopContext");
        assert!(root.decl.has_modifier(Modifier::Partial));
        assert_eq!(
            root.decl.bases,
            vec![Syntax::ty("DbContext"), Syntax::ty("IReadOnlyShopContext")]
        );
    }

    #[test]
    fn stored_collection_is_rewritten_and_exposed() {
        let root = transform(&DiagnosticLog::new());

        let stored: Vec<_> = root
            .decl
            .members
            .iter()
            .filter(|m| m.name() == "Users")
            .collect();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].value_type().map(ToString::to_string).as_deref(), Some("DbSet<ReadOnlyUser>"));
        assert_eq!(stored[0].explicit_interface, None);

        let accessor = stored[1];
        assert_eq!(accessor.explicit_interface, Some(Syntax::ty("IReadOnlyShopContext")));
        assert_eq!(accessor.mutability(), Some(Mutability::ReadOnly));
        assert_eq!(
            accessor.value_type().map(ToString::to_string).as_deref(),
            Some("IQueryable<ReadOnlyUser>")
        );
        assert_eq!(
            root.exposed,
            vec![ExposedView {
                member: "Users".into(),
                element: EntityRef::new("User"),
            }]
        );
    }

    #[test]
    fn unresolved_collection_is_removed_and_reported() {
        let log = DiagnosticLog::new();
        let root = transform(&log);

        assert!(root.decl.member("Audits").is_none());
        assert!(root.decl.member("Describe").is_some());

        let entries = log.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, DiagnosticCode::SkippedExposedCollection);
        assert_eq!(entries[0].member.as_deref(), Some("Audits"));
        assert_eq!(entries[0].ty.as_deref(), Some("AuditRecord"));
    }

    #[test]
    fn every_commit_overload_is_sealed_and_unsupported() {
        let root = transform(&DiagnosticLog::new());

        let commits: Vec<_> = root
            .decl
            .members
            .iter()
            .filter(|m| m.name().starts_with("SaveChanges"))
            .collect();

        assert_eq!(commits.len(), 3);
        for commit in commits {
            assert!(commit.modifiers.contains(&Modifier::Sealed));
            assert!(commit.modifiers.contains(&Modifier::Override));
            let MemberKind::Method { body, .. } = &commit.kind else {
                panic!("expected method");
            };
            assert!(body.is_unsupported());
        }
    }

    #[test]
    fn commit_overloads_match_host_signatures() {
        let config = RootConfig::default();
        let [sync, partial, asynchronous] = CommitOverload::ALL.map(|o| o.member(&config));

        let MemberKind::Method { returns, params, body, .. } = &sync.kind else {
            panic!("expected method");
        };
        assert_eq!(returns.to_string(), "int");
        assert!(params.is_empty());
        assert_eq!(
            body,
            &Body::Unsupported {
                message: config.commit_message_for("SaveChanges")
            }
        );

        let MemberKind::Method { returns, params, .. } = &partial.kind else {
            panic!("expected method");
        };
        assert_eq!(returns.to_string(), "Task<int>");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].ident.as_str(), "acceptAllChangesOnSuccess");
        assert_eq!(params[1].default, Some(Syntax::token("default")));

        let MemberKind::Method { params, .. } = &asynchronous.kind else {
            panic!("expected method");
        };
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].ty, Syntax::ty("CancellationToken"));
    }

    #[test]
    fn query_forwarder_calls_own_operation() {
        let root = transform(&DiagnosticLog::new());
        let set = root.decl.members.last().unwrap();

        assert_eq!(set.name(), "Set");
        let MemberKind::Method {
            returns,
            type_params,
            body,
            ..
        } = &set.kind
        else {
            panic!("expected method");
        };
        assert_eq!(returns.to_string(), "IQueryable<TEntity>");
        assert_eq!(type_params[0].constraints, vec![Syntax::token("class")]);
        let Body::Expression(call) = body else {
            panic!("expected expression body");
        };
        assert_eq!(call.to_string(), "Set<TEntity>()");
    }
}
