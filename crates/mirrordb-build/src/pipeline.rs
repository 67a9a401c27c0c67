//! One generator invocation, end to end.
//!
//! Entities are mirrored first; only once the worklist drains is the name set
//! fixed and handed to the rewriter for configurations and roots.

use crate::{
    configuration::{ConfigurationTransformer, MirroredConfiguration},
    context::MirrorContext,
    contract::{ContractSynthesizer, RootContract},
    diagnostics::{Diagnostic, DiagnosticSink},
    entity::MirroredEntity,
    output::{Artifact, OutputSink},
    prelude::*,
    rewrite::{MirrorableNames, TypeRewriter},
    root::{MirroredRoot, RootTransformer},
    trace::{PipelineTraceEvent, PipelineTraceSink},
    worklist::Worklist,
};
use std::collections::BTreeMap;

///
/// Generator
///

pub struct Generator<'a> {
    model: &'a Model,
    config: &'a GeneratorConfig,
    resolver: Option<&'a dyn Resolve>,
    diagnostics: Option<&'a dyn DiagnosticSink>,
    trace: Option<&'a dyn PipelineTraceSink>,
}

impl<'a> Generator<'a> {
    #[must_use]
    pub const fn new(model: &'a Model, config: &'a GeneratorConfig) -> Self {
        Self {
            model,
            config,
            resolver: None,
            diagnostics: None,
            trace: None,
        }
    }

    /// Replace the default [`ModelResolver`] with a host oracle.
    #[must_use]
    pub const fn with_resolver(mut self, resolver: &'a dyn Resolve) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub const fn with_diagnostics(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    #[must_use]
    pub const fn with_trace(mut self, sink: &'a dyn PipelineTraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Mirror everything reachable from the model's aggregate roots.
    #[must_use]
    pub fn generate(&self) -> Generated {
        let fallback = ModelResolver::new(self.model);
        let resolver: &dyn Resolve = match self.resolver {
            Some(resolver) => resolver,
            None => &fallback,
        };

        let ctx = MirrorContext::new(self.model, resolver, self.config)
            .with_diagnostics(self.diagnostics)
            .with_trace(self.trace);

        run(&ctx)
    }
}

fn run(ctx: &MirrorContext<'_>) -> Generated {
    let mut roots: Vec<&AggregateRootDecl> = ctx.model.roots().iter().collect();
    roots.sort_by(|a, b| a.id().cmp(b.id()));

    // exposed entities without a declaration are the root's to report
    let seeds: Vec<&EntityRef> = roots
        .iter()
        .flat_map(|&root| root.seeds())
        .filter(|entity| ctx.declaration(entity).is_some())
        .collect();
    ctx.trace(PipelineTraceEvent::Start { seeds: seeds.len() });

    let entities = Worklist::new(ctx).run(seeds);

    // configurations see every mirrored entity and every root
    let entity_names: MirrorableNames = entities
        .keys()
        .map(String::as_str)
        .chain(roots.iter().map(|root| root.id()))
        .collect();
    let configurations = mirror_configurations(ctx, &entity_names, &entities);

    // roots additionally see the configuration classes they instantiate
    let mut root_names = entity_names.clone();
    root_names.extend(configurations.iter().map(|c| c.source.as_str()));

    let rewriter = TypeRewriter::new(ctx, &root_names);
    let transformer = RootTransformer::new(ctx, &rewriter);
    let synthesizer = ContractSynthesizer::new(ctx);

    let roots: Vec<GeneratedRoot> = roots
        .into_iter()
        .map(|decl| {
            let root = transformer.transform(decl);
            let contract = synthesizer.synthesize(&root);

            GeneratedRoot { root, contract }
        })
        .collect();

    ctx.trace(PipelineTraceEvent::Finish {
        entities: entities.len(),
        configurations: configurations.len(),
        roots: roots.len(),
    });

    Generated {
        entities: entities.into_values().collect(),
        configurations,
        roots,
    }
}

// mirror_configurations
// sorted by source identifier; configurations of unmirrored entities are
// reported and skipped
fn mirror_configurations(
    ctx: &MirrorContext<'_>,
    names: &MirrorableNames,
    entities: &BTreeMap<String, MirroredEntity>,
) -> Vec<MirroredConfiguration> {
    let rewriter = TypeRewriter::new(ctx, names);
    let transformer = ConfigurationTransformer::new(ctx, &rewriter);

    let mut configurations: Vec<MirroredConfiguration> = ctx
        .model
        .configurations()
        .into_iter()
        .filter_map(|configuration| {
            if !entities.contains_key(configuration.entity.id()) {
                ctx.report(Diagnostic::skipped_configuration(
                    configuration.id(),
                    configuration.entity.id(),
                ));
                return None;
            }

            let mirrored = transformer.transform(configuration);
            ctx.trace(PipelineTraceEvent::ConfigurationMirrored {
                configuration: mirrored.id().to_string(),
            });

            Some(mirrored)
        })
        .collect();

    configurations.sort_by(|a, b| a.source.cmp(&b.source));
    configurations
}

///
/// GeneratedRoot
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct GeneratedRoot {
    pub root: MirroredRoot,
    pub contract: RootContract,
}

///
/// Generated
///
/// Every artifact of one invocation, in emission order: entities by id,
/// configurations by id, then each root followed by its contract.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Generated {
    pub entities: Vec<MirroredEntity>,
    pub configurations: Vec<MirroredConfiguration>,
    pub roots: Vec<GeneratedRoot>,
}

impl Generated {
    /// Mirror of the entity with the given source identifier.
    #[must_use]
    pub fn entity(&self, source: &str) -> Option<&MirroredEntity> {
        self.entities.iter().find(|e| e.source.id() == source)
    }

    #[must_use]
    pub fn configuration(&self, source: &str) -> Option<&MirroredConfiguration> {
        self.configurations.iter().find(|c| c.source == source)
    }

    #[must_use]
    pub fn root(&self, source: &str) -> Option<&GeneratedRoot> {
        self.roots.iter().find(|r| r.root.source == source)
    }

    #[must_use]
    pub fn into_artifacts(self) -> Vec<Artifact> {
        let mut artifacts = Vec::with_capacity(
            self.entities.len() + self.configurations.len() + 2 * self.roots.len(),
        );

        artifacts.extend(self.entities.into_iter().map(Artifact::Entity));
        artifacts.extend(self.configurations.into_iter().map(Artifact::Configuration));
        for GeneratedRoot { root, contract } in self.roots {
            artifacts.push(Artifact::Root(root));
            artifacts.push(Artifact::Contract(contract));
        }

        artifacts
    }

    /// Hand every artifact to the sink, keyed by its mirror name.
    pub fn emit(self, sink: &mut dyn OutputSink) {
        for artifact in self.into_artifacts() {
            let key = artifact.key().to_string();
            sink.emit(&key, artifact);
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
