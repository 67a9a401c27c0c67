use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    prelude::*,
    trace::{PipelineTraceEvent, PipelineTraceSink},
};

///
/// MirrorContext
///
/// Per-invocation state threaded through every component by reference.
/// Built fresh for each run; nothing here outlives it.
///

pub struct MirrorContext<'a> {
    pub model: &'a Model,
    pub resolver: &'a dyn Resolve,
    pub config: &'a GeneratorConfig,
    pub naming: MirrorNaming,
    diagnostics: Option<&'a dyn DiagnosticSink>,
    trace: Option<&'a dyn PipelineTraceSink>,
}

impl<'a> MirrorContext<'a> {
    #[must_use]
    pub fn new(model: &'a Model, resolver: &'a dyn Resolve, config: &'a GeneratorConfig) -> Self {
        Self {
            model,
            resolver,
            config,
            naming: MirrorNaming::from_config(config),
            diagnostics: None,
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_diagnostics(mut self, sink: Option<&'a dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    #[must_use]
    pub const fn with_trace(mut self, sink: Option<&'a dyn PipelineTraceSink>) -> Self {
        self.trace = sink;
        self
    }

    // report
    pub fn report(&self, diagnostic: Diagnostic) {
        if let Some(sink) = self.diagnostics {
            sink.report(diagnostic);
        }
    }

    // trace
    pub fn trace(&self, event: PipelineTraceEvent) {
        if let Some(sink) = self.trace {
            sink.on_event(event);
        }
    }

    /// Declaration for a discovered entity, looked up on demand.
    #[must_use]
    pub fn declaration(&self, entity: &EntityRef) -> Option<&'a TypeDecl> {
        self.model.declaration(entity.id())
    }
}
