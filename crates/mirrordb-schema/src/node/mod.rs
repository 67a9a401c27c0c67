mod configuration;
mod decl;
mod member;
mod root;
mod syntax;

// pub use all node types
pub use self::configuration::*;
pub use self::decl::*;
pub use self::member::*;
pub use self::root::*;
pub use self::syntax::*;
