//! Pipeline tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect output.

///
/// PipelineTraceSink
///

pub trait PipelineTraceSink: Send + Sync {
    fn on_event(&self, event: PipelineTraceEvent);
}

///
/// PipelineTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PipelineTraceEvent {
    Start {
        seeds: usize,
    },
    EntityMirrored {
        entity: String,
        discovered: usize,
    },
    EntitySkipped {
        entity: String,
    },
    ConfigurationMirrored {
        configuration: String,
    },
    RootMirrored {
        root: String,
        exposed: usize,
        dropped: usize,
    },
    Finish {
        entities: usize,
        configurations: usize,
        roots: usize,
    },
}
