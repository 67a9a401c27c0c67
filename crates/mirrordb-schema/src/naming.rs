use crate::prelude::*;

///
/// MirrorNaming
///
/// Deterministic naming for every generated declaration. All components of one
/// invocation share a single value so they agree on each mirror name.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MirrorNaming {
    mirror_prefix: String,
    contract_prefix: String,
}

impl MirrorNaming {
    #[must_use]
    pub fn new(mirror_prefix: impl Into<String>, contract_prefix: impl Into<String>) -> Self {
        Self {
            mirror_prefix: mirror_prefix.into(),
            contract_prefix: contract_prefix.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.mirror_prefix, &config.contract_prefix)
    }

    // mirror
    #[must_use]
    pub fn mirror(&self, name: &str) -> String {
        format!("{}{name}", self.mirror_prefix)
    }

    /// Name of the contract interface synthesized for a root.
    #[must_use]
    pub fn contract(&self, root: &str) -> String {
        format!("{}{}", self.contract_prefix, self.mirror(root))
    }

    /// Mirrored identifier bound to its own (generated) type.
    #[must_use]
    pub fn mirror_ident(&self, ident: &Ident, id: &str) -> Ident {
        Ident::ty(self.mirror(id)).with_trivia(ident.trivia.clone())
    }
}

impl Default for MirrorNaming {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}
