//! Generator configuration.
//!
//! Every field has a default so an empty TOML document is a valid config.

use crate::prelude::*;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config field '{0}' must not be empty")]
    Empty(&'static str),

    #[error("config list '{0}' must name at least one type")]
    EmptyShapeFamily(&'static str),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

///
/// GeneratorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub mirror_prefix: String,
    pub contract_prefix: String,
    pub shapes: ShapeConfig,
    pub views: ViewConfig,
    pub discovery: DiscoveryConfig,
    pub root: RootConfig,
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    // validate
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("mirror_prefix", &self.mirror_prefix),
            ("views.collection", &self.views.collection),
            ("views.queryable", &self.views.queryable),
            ("discovery.exposed_collection", &self.discovery.exposed_collection),
            ("root.commit", &self.root.commit),
            ("root.commit_async", &self.root.commit_async),
            ("root.query_method", &self.root.query_method),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(field));
            }
        }

        if self.shapes.collections.is_empty() {
            return Err(ConfigError::EmptyShapeFamily("shapes.collections"));
        }

        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mirror_prefix: "ReadOnly".into(),
            contract_prefix: "I".into(),
            shapes: ShapeConfig::default(),
            views: ViewConfig::default(),
            discovery: DiscoveryConfig::default(),
            root: RootConfig::default(),
        }
    }
}

///
/// ShapeConfig
/// Known collection shapes and the comparer utilities that wrap them.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShapeConfig {
    pub collections: Vec<String>,
    pub comparers: Vec<String>,
    pub comparer_collections: Vec<String>,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            collections: to_strings(&[
                "List",
                "IList",
                "IReadOnlyList",
                "ICollection",
                "IEnumerable",
                "ImmutableArray",
            ]),
            comparers: to_strings(&["ValueComparer"]),
            comparer_collections: to_strings(&["List", "IList", "ICollection", "IEnumerable"]),
        }
    }
}

///
/// ViewConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub collection: String,
    pub queryable: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            collection: "IReadOnlyCollection".into(),
            queryable: "IQueryable".into(),
        }
    }
}

///
/// DiscoveryConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub exposed_collection: String,
    pub configuration_base: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            exposed_collection: "DbSet".into(),
            configuration_base: "IEntityTypeConfiguration".into(),
        }
    }
}

///
/// RootConfig
/// Shape of the mutation entry points and the contract surface.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RootConfig {
    pub commit: String,
    pub commit_async: String,
    pub commit_result: String,
    pub task: String,
    pub partial_commit_param: String,
    pub cancellation_param: String,
    pub cancellation_type: String,

    /// `{method}` is replaced with the blocked method name.
    pub commit_message: String,

    pub disposables: Vec<String>,
    pub facade_member: String,
    pub facade_type: String,
    pub query_method: String,
    pub query_type_param: String,
    pub query_constraint: String,
}

impl RootConfig {
    #[must_use]
    pub fn commit_message_for(&self, method: &str) -> String {
        self.commit_message.replace("{method}", method)
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            commit: "SaveChanges".into(),
            commit_async: "SaveChangesAsync".into(),
            commit_result: "int".into(),
            task: "Task".into(),
            partial_commit_param: "acceptAllChangesOnSuccess".into(),
            cancellation_param: "cancellationToken".into(),
            cancellation_type: "CancellationToken".into(),
            commit_message: "{method} is not supported on a read-only root.".into(),
            disposables: to_strings(&["IDisposable", "IAsyncDisposable"]),
            facade_member: "Database".into(),
            facade_type: "DatabaseFacade".into(),
            query_method: "Set".into(),
            query_type_param: "TEntity".into(),
            query_constraint: "class".into(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
