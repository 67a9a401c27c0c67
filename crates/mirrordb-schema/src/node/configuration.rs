use crate::{prelude::*, resolve::resolve_entity};

///
/// ConfigurationDecl
/// Persistence-configuration declaration paired with the entity it maps.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ConfigurationDecl {
    pub entity: EntityRef,
    pub decl: TypeDecl,
}

impl ConfigurationDecl {
    #[must_use]
    pub fn new(entity: impl Into<String>, decl: TypeDecl) -> Self {
        Self {
            entity: EntityRef::new(entity),
            decl,
        }
    }

    /// Pair a declaration with its entity through the configured
    /// configuration base (e.g. `IEntityTypeConfiguration<User>`).
    #[must_use]
    pub fn discover<R: Resolve + ?Sized>(
        decl: TypeDecl,
        model: &Model,
        resolver: &R,
        config: &GeneratorConfig,
    ) -> Option<Self> {
        let base_name = config.discovery.configuration_base.as_str();

        let entity = decl.bases.iter().find_map(|base| match base {
            Syntax::Generic { name, args }
                if name.head_ident().map(Ident::as_str) == Some(base_name) && args.len() == 1 =>
            {
                resolve_entity(model, resolver, &args[0])
            }
            _ => None,
        })?;

        Some(Self { entity, decl })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.decl.id()
    }
}
