pub mod config;
pub mod model;
pub mod naming;
pub mod node;
pub mod resolve;

use crate::{config::ConfigError, model::ModelError};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub(crate) use crate::ThisError;
    pub use crate::{
        config::GeneratorConfig,
        model::Model,
        naming::MirrorNaming,
        node::*,
        resolve::{ModelResolver, Resolve, Symbol, TypeSymbol},
    };
    pub use derive_more::Display;
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    ModelError(#[from] ModelError),
}
