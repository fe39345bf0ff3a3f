//! Generic task over one UVA2 record type with optional merge passes.

use std::sync::Arc;

use atlas_core::{
    DiagnosticKind, Diagnostics, Entity, EntityKind, EntitySet, EntityStore, Record, RecordSchema, Rejection,
    References, RowContext, RowOutcome, TaskReport, is_valid,
};
use camino::{Utf8Path, Utf8PathBuf};

use super::{Task, TaskError};
use crate::{merge::KeyedEntities, uva2::Uva2Reader};

/// Transforms validated rows of one record type into entities.
pub trait RowProcessor {
    /// Entity produced.
    type Entity: Entity;

    /// Kind the task replaces.
    fn kind(&self) -> EntityKind;

    /// Field layout of the record type.
    fn schema(&self) -> Arc<RecordSchema>;

    /// Field holding the row's natural key.
    fn key_field(&self) -> &'static str;

    /// Kinds whose key sets must be loaded before processing.
    fn references(&self) -> Vec<EntityKind> {
        Vec::new()
    }

    /// Build an entity from a record whose windows are open.
    fn process(&self, record: &Record, ctx: &mut RowContext<'_>) -> RowOutcome<Self::Entity>;

    /// Final adjustment of the accepted entities before materialization.
    fn finish(&self, entities: Vec<Self::Entity>) -> Vec<Self::Entity> {
        entities
    }
}

/// Second pass that mutates already built entities through their keys.
pub trait MergePass<E> {
    /// Kinds whose key sets the pass needs.
    fn references(&self) -> Vec<EntityKind> {
        Vec::new()
    }

    /// Mutate `entities` from the pass's source.
    fn run(
        &mut self,
        entities: &mut KeyedEntities<E>,
        references: &References,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), TaskError>;
}

/// Imports one UVA2 record type: validity filter, reference checks, row
/// processing, merge passes and a single materialization.
pub struct ExtractTask<P: RowProcessor> {
    name: String,
    path: Utf8PathBuf,
    processor: P,
    passes: Vec<Box<dyn MergePass<P::Entity>>>,
    batch_size: usize,
    references: References,
    diagnostics: Diagnostics,
    materialized: usize,
}

impl<P: RowProcessor> ExtractTask<P> {
    /// Task named `name` reading the extract at `path`.
    pub fn new(name: impl Into<String>, path: &Utf8Path, processor: P, batch_size: usize) -> Self {
        Self {
            name: name.into(),
            path: path.to_path_buf(),
            processor,
            passes: Vec::new(),
            batch_size,
            references: References::new(),
            diagnostics: Diagnostics::new(),
            materialized: 0,
        }
    }

    /// Append a merge pass; passes run in insertion order.
    #[must_use]
    pub fn with_pass(mut self, pass: impl MergePass<P::Entity> + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    fn read(&mut self) -> Result<(Vec<P::Entity>, KeyedEntities<P::Entity>), TaskError> {
        let schema = self.processor.schema();
        let relations = schema.relation_groups();
        let entity = self.processor.kind();
        let key_field = self.processor.key_field();
        let mut reader = Uva2Reader::open(&self.path, Arc::clone(&schema))?;
        let mut plain = Vec::new();
        let mut keyed = KeyedEntities::new(entity.label());

        for record in reader.by_ref() {
            let record = record?;
            if schema.has_validity() && !is_valid(&record, &relations) {
                self.diagnostics.reject(&Rejection::InvalidWindow);
                continue;
            }
            let Some(id) = record.value(key_field) else {
                self.diagnostics.reject(&Rejection::MissingKey {
                    entity: entity.label(),
                    line: record.line(),
                });
                continue;
            };
            let mut ctx = RowContext::new(entity, id, &self.references, &mut self.diagnostics);
            match self.processor.process(&record, &mut ctx) {
                RowOutcome::Accepted(row) => plain.push(row),
                RowOutcome::AcceptedKeyed(key, row) => {
                    keyed.insert(key, row, &mut self.diagnostics);
                }
                RowOutcome::Rejected(rejection) => self.diagnostics.reject(&rejection),
            }
        }
        for row in reader.take_malformed() {
            self.diagnostics.warn(DiagnosticKind::MalformedRow, row.message);
        }
        Ok((plain, keyed))
    }
}

impl<P: RowProcessor> Task for ExtractTask<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn before(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError> {
        store.clear(self.processor.kind())?;
        let mut kinds = self.processor.references();
        kinds.extend(self.passes.iter().flat_map(|pass| pass.references()));
        self.references = References::load(&*store, &kinds)?;
        Ok(())
    }

    fn process(&mut self, store: &mut dyn EntityStore) -> Result<(), TaskError> {
        let (mut entities, mut keyed) = self.read()?;
        for pass in &mut self.passes {
            pass.run(&mut keyed, &self.references, &mut self.diagnostics)?;
        }
        entities.extend(keyed.into_values());
        let entities = self.processor.finish(entities);
        let set = EntitySet::new(self.processor.kind(), entities);
        self.materialized = store.bulk_insert(&set, self.batch_size)?;
        Ok(())
    }

    fn after(&mut self) -> TaskReport {
        self.references.clear();
        TaskReport {
            task: self.name.clone(),
            materialized: std::mem::take(&mut self.materialized),
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }
}
