//! Read-only mirror generation.
//!
//! Starting from the collections an aggregate root exposes, every reachable
//! entity is mirrored once, then configurations and the root itself are
//! rewritten against the finished set of mirror names.

pub mod configuration;
pub mod context;
pub mod contract;
pub mod diagnostics;
pub mod entity;
pub mod output;
pub mod pipeline;
pub mod rewrite;
pub mod root;
pub mod shape;
pub mod trace;
pub mod worklist;

pub use mirrordb_schema::Error;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        diagnostics::{Diagnostic, DiagnosticCode, DiagnosticLog, DiagnosticSink, Severity},
        output::{Artifact, MemoryOutput, OutputSink},
        pipeline::{Generated, GeneratedRoot, Generator},
        trace::{PipelineTraceEvent, PipelineTraceSink},
    };
    pub use mirrordb_schema::prelude::*;
}
