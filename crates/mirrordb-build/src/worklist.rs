//! Cycle-safe discovery over the entity graph.
//!
//! The processed set is the only cycle guard. Results are keyed by
//! identifier so output never depends on the order entities were found.

use crate::{
    context::MirrorContext,
    diagnostics::Diagnostic,
    entity::{EntityTransformer, MirroredEntity},
    prelude::*,
    trace::PipelineTraceEvent,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

///
/// WorklistState
///

#[derive(Debug, Default)]
pub struct WorklistState {
    processed: BTreeSet<String>,
    pending: VecDeque<EntityRef>,
}

impl WorklistState {
    #[must_use]
    pub fn new<'e>(seeds: impl IntoIterator<Item = &'e EntityRef>) -> Self {
        Self {
            processed: BTreeSet::new(),
            pending: seeds.into_iter().cloned().collect(),
        }
    }

    // next
    // pops until an unprocessed entity turns up, marking it processed
    fn next(&mut self) -> Option<EntityRef> {
        while let Some(entity) = self.pending.pop_front() {
            if self.processed.insert(entity.id().to_string()) {
                return Some(entity);
            }
        }

        None
    }

    fn enqueue(&mut self, entities: impl IntoIterator<Item = EntityRef>) {
        self.pending.extend(
            entities
                .into_iter()
                .filter(|e| !self.processed.contains(e.id())),
        );
    }

    #[must_use]
    pub fn is_processed(&self, id: &str) -> bool {
        self.processed.contains(id)
    }
}

///
/// Worklist
///

pub struct Worklist<'a> {
    ctx: &'a MirrorContext<'a>,
    transformer: EntityTransformer<'a>,
}

impl<'a> Worklist<'a> {
    #[must_use]
    pub fn new(ctx: &'a MirrorContext<'a>) -> Self {
        Self {
            ctx,
            transformer: EntityTransformer::new(ctx),
        }
    }

    /// Mirror every entity reachable from `seeds`, each exactly once.
    #[must_use]
    pub fn run<'e>(
        &self,
        seeds: impl IntoIterator<Item = &'e EntityRef>,
    ) -> BTreeMap<String, MirroredEntity> {
        let mut state = WorklistState::new(seeds);
        let mut mirrored = BTreeMap::new();

        while let Some(entity) = state.next() {
            let Some(decl) = self.ctx.declaration(&entity) else {
                self.ctx.report(Diagnostic::unresolved_entity(entity.id()));
                self.ctx.trace(PipelineTraceEvent::EntitySkipped {
                    entity: entity.to_string(),
                });
                continue;
            };

            let out = self.transformer.transform(decl);
            self.ctx.trace(PipelineTraceEvent::EntityMirrored {
                entity: entity.to_string(),
                discovered: out.discovered.len(),
            });

            state.enqueue(out.discovered);
            mirrored.insert(entity.0, out.mirrored);
        }

        mirrored
    }
}
