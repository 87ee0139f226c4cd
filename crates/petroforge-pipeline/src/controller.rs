use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Instant;

use chrono::NaiveDate;
use petroforge_core::{Frame, TableName};
use petroforge_generate::{
    BatchSizes, DataGenerator, GenerateOptions, GeneratedTables, GenerationContext,
};
use petroforge_store::RecordStore;
use petroforge_validate::{render_violations, validate_table};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::log::ExecutionLog;
use crate::summary::render_summary;

/// Options for the pipeline controller.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Identifier of the next run. A fresh uuid when absent.
    pub run_id: Option<String>,
    /// Seed of the generation random source. Entropy when absent.
    pub seed: Option<u64>,
    /// Reference date of the generators. The local date when absent.
    pub today: Option<NaiveDate>,
    pub generate: GenerateOptions,
}

/// Runs generate, validate and insert against one store.
pub struct PipelineController<S: RecordStore> {
    store: S,
    options: PipelineOptions,
    log: ExecutionLog,
}

impl<S: RecordStore> PipelineController<S> {
    pub fn new(store: S, options: PipelineOptions) -> Self {
        Self {
            store,
            options,
            log: ExecutionLog::new(String::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Log of the latest run, complete or partial.
    pub fn execution_log(&self) -> &ExecutionLog {
        &self.log
    }

    /// Generate every table, validate unless skipped, insert, and report.
    ///
    /// A failing stage marks the run failed and the error is returned after
    /// the summary is logged; the partial log stays available through
    /// [`PipelineController::execution_log`].
    pub async fn run_full_pipeline(
        &mut self,
        batch_sizes: Option<BatchSizes>,
        skip_validation: bool,
    ) -> Result<ExecutionLog, PipelineError> {
        let run_id = self
            .options
            .run_id
            .take()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.log = ExecutionLog::new(run_id);
        self.log.start()?;
        let sizes = batch_sizes.unwrap_or_default();
        info!(
            run_id = %self.log.run_id,
            engine = self.store.engine(),
            seed = self.options.seed,
            skip_validation,
            "pipeline started"
        );

        let outcome = self.run_stages(&sizes, skip_validation).await;
        let finished = match &outcome {
            Ok(()) => self.log.succeed(),
            Err(err) => self.log.fail(err.to_string()),
        };
        if let Err(err) = finished {
            warn!(run_id = %self.log.run_id, error = %err, "pipeline state not updated");
        }

        let summary = render_summary(&self.log);
        let duration_ms = self
            .log
            .duration()
            .map(|duration| duration.num_milliseconds())
            .unwrap_or_default();
        match outcome {
            Ok(()) => {
                info!(
                    run_id = %self.log.run_id,
                    inserted = self.log.total_inserted(),
                    duration_ms,
                    "pipeline completed\n{summary}"
                );
                Ok(self.log.clone())
            }
            Err(err) => {
                warn!(
                    run_id = %self.log.run_id,
                    error = %err,
                    duration_ms,
                    "pipeline failed\n{summary}"
                );
                Err(err)
            }
        }
    }

    async fn run_stages(
        &mut self,
        sizes: &BatchSizes,
        skip_validation: bool,
    ) -> Result<(), PipelineError> {
        let existing = match self.existing_codes().await {
            Ok(existing) => existing,
            Err(err) => return Err(self.stage_error("lookup", err)),
        };

        let tables = self
            .generate(sizes, &existing)
            .map_err(|err| self.stage_error("generation", err))?;
        let frames = tables.frames();

        let validated = if skip_validation {
            warn!(run_id = %self.log.run_id, "validation skipped");
            frames
        } else {
            self.validate(&frames)
                .map_err(|err| self.stage_error("validation", err))?
        };

        let inserted = match self.store.insert_records(&validated).await {
            Ok(inserted) => inserted,
            Err(err) => return Err(self.stage_error("insertion", err.into())),
        };
        info!(
            run_id = %self.log.run_id,
            rows = inserted.values().sum::<u64>(),
            "insertion completed"
        );
        self.log.tables_inserted = inserted;
        Ok(())
    }

    fn stage_error(&mut self, stage: &str, err: PipelineError) -> PipelineError {
        self.log.record_error(format!("{stage}: {err}"));
        err
    }

    async fn existing_codes(&self) -> Result<HashMap<TableName, HashSet<String>>, PipelineError> {
        let mut existing = HashMap::new();
        for table in TableName::ALL {
            let codes = self
                .store
                .existing_codes(table, table.key_column())
                .await?;
            existing.insert(table, codes);
        }
        Ok(existing)
    }

    fn context(&self) -> GenerationContext {
        let ctx = match self.options.seed {
            Some(seed) => GenerationContext::seeded(seed, chrono::Local::now().date_naive()),
            None => GenerationContext::from_os_rng(),
        };
        match self.options.today {
            Some(today) => ctx.with_today(today),
            None => ctx,
        }
    }

    fn generate(
        &mut self,
        sizes: &BatchSizes,
        existing: &HashMap<TableName, HashSet<String>>,
    ) -> Result<GeneratedTables, PipelineError> {
        let start = Instant::now();
        let mut generator = DataGenerator::new(self.context(), self.options.generate.clone());
        let generated = &mut self.log.tables_generated;

        let wells = generator
            .generate_wells(sizes.wells, existing.get(&TableName::Wells))
            .into_result()?;
        generated.insert(TableName::Wells, wells.len() as u64);

        let equipment = generator
            .generate_equipment(
                sizes.equipment,
                Some(&wells),
                existing.get(&TableName::Equipment),
            )
            .into_result()?;
        generated.insert(TableName::Equipment, equipment.len() as u64);

        let production = generator
            .generate_production(
                sizes.production,
                Some(&wells),
                existing.get(&TableName::Production),
            )
            .into_result()?;
        generated.insert(TableName::Production, production.len() as u64);

        let incidents = generator
            .generate_incidents(
                sizes.incidents,
                Some(&equipment),
                Some(&production),
                existing.get(&TableName::Incidents),
            )
            .into_result()?;
        generated.insert(TableName::Incidents, incidents.len() as u64);

        info!(
            run_id = %self.log.run_id,
            rows = self.log.tables_generated.values().sum::<u64>(),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );
        Ok(GeneratedTables {
            wells,
            equipment,
            production,
            incidents,
        })
    }

    fn validate(
        &mut self,
        frames: &BTreeMap<TableName, Frame>,
    ) -> Result<BTreeMap<TableName, Frame>, PipelineError> {
        let mut validated = BTreeMap::new();
        for (table, frame) in frames {
            let frame = validate_table(*table, Some(frame)).inspect_err(|err| {
                if let Some(errors) = err.schema_errors() {
                    warn!(table = table.as_str(), "{}", render_violations(errors, 10));
                }
            })?;
            self.log.tables_validated.insert(*table, frame.len() as u64);
            validated.insert(*table, frame);
        }
        info!(
            run_id = %self.log.run_id,
            rows = self.log.tables_validated.values().sum::<u64>(),
            "validation completed"
        );
        Ok(validated)
    }

    /// Per-table row counts of the store.
    pub async fn check_database_status(&self) -> Result<BTreeMap<TableName, u64>, PipelineError> {
        let counts = self.store.count_records(None).await?;
        for (table, count) in &counts {
            info!(table = table.as_str(), rows = count, "table status");
        }
        info!(
            engine = self.store.engine(),
            total = counts.values().sum::<u64>(),
            "database status"
        );
        Ok(counts)
    }

    /// Empty every table, children first. Does nothing unless `confirm` is set.
    pub async fn truncate_all_tables(&self, confirm: bool) -> Result<bool, PipelineError> {
        if !confirm {
            warn!("truncate requires confirmation, nothing removed");
            return Ok(false);
        }
        let truncated = self
            .store
            .truncate(&TableName::truncate_order(), true)
            .await?;
        if truncated {
            info!(engine = self.store.engine(), "all tables truncated");
        }
        Ok(truncated)
    }
}
