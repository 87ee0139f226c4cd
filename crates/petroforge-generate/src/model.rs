use std::collections::{BTreeMap, HashMap, HashSet};

use petroforge_core::{
    Equipment, Frame, Incident, ProductionRecord, Record, Table, TableName, Well,
};
use serde::{Deserialize, Serialize};

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::{equipment, incidents, production, wells};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Maximum candidates drawn for a single unique code.
    pub max_code_attempts: u32,
    /// Incident draw budget as a multiple of the requested rows.
    pub max_draws_factor: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_code_attempts: 1_000,
            max_draws_factor: 20,
        }
    }
}

/// Target record count per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSizes {
    #[serde(alias = "pocos")]
    pub wells: usize,
    #[serde(alias = "equipamentos")]
    pub equipment: usize,
    #[serde(alias = "producao")]
    pub production: usize,
    #[serde(alias = "incidentes")]
    pub incidents: usize,
}

impl Default for BatchSizes {
    fn default() -> Self {
        Self {
            wells: 100,
            equipment: 500,
            production: 2_000,
            incidents: 250,
        }
    }
}

impl BatchSizes {
    pub fn get(&self, table: TableName) -> usize {
        match table {
            TableName::Wells => self.wells,
            TableName::Equipment => self.equipment,
            TableName::Production => self.production,
            TableName::Incidents => self.incidents,
        }
    }

    pub fn set(&mut self, table: TableName, rows: usize) {
        match table {
            TableName::Wells => self.wells = rows,
            TableName::Equipment => self.equipment = rows,
            TableName::Production => self.production = rows,
            TableName::Incidents => self.incidents = rows,
        }
    }
}

/// Result of one table generator call.
#[derive(Debug)]
pub enum GenerationOutcome<R: Record> {
    /// The generated table. May be empty when no record survived.
    Generated(Table<R>),
    /// A required upstream table was missing or empty.
    EmptyInput(String),
    Failed(GenerationError),
}

impl<R: Record> GenerationOutcome<R> {
    pub fn table(&self) -> Option<&Table<R>> {
        match self {
            GenerationOutcome::Generated(table) => Some(table),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table<R>> {
        match self {
            GenerationOutcome::Generated(table) => Some(table),
            _ => None,
        }
    }

    /// True unless at least one record was generated.
    pub fn is_empty(&self) -> bool {
        self.table().is_none_or(Table::is_empty)
    }

    pub fn len(&self) -> usize {
        self.table().map_or(0, Table::len)
    }

    pub fn into_result(self) -> Result<Table<R>, OutcomeError> {
        match self {
            GenerationOutcome::Generated(table) if table.is_empty() => {
                Err(OutcomeError::NoRecords(R::TABLE))
            }
            GenerationOutcome::Generated(table) => Ok(table),
            GenerationOutcome::EmptyInput(reason) => Err(OutcomeError::EmptyInput {
                table: R::TABLE,
                reason,
            }),
            GenerationOutcome::Failed(err) => Err(OutcomeError::Failed {
                table: R::TABLE,
                source: err,
            }),
        }
    }
}

/// A generator outcome that carries no usable table.
#[derive(Debug, thiserror::Error)]
pub enum OutcomeError {
    #[error("no records generated for {0}")]
    NoRecords(TableName),
    #[error("missing input for {table}: {reason}")]
    EmptyInput { table: TableName, reason: String },
    #[error("generation of {table} failed: {source}")]
    Failed {
        table: TableName,
        #[source]
        source: GenerationError,
    },
}

/// Generators bound to one random source, reference date and option set.
#[derive(Debug)]
pub struct DataGenerator {
    ctx: GenerationContext,
    options: GenerateOptions,
}

impl DataGenerator {
    pub fn new(ctx: GenerationContext, options: GenerateOptions) -> Self {
        Self { ctx, options }
    }

    pub fn generate_wells(
        &mut self,
        rows: usize,
        existing: Option<&HashSet<String>>,
    ) -> GenerationOutcome<Well> {
        wells::generate_wells(&mut self.ctx, &self.options, rows, existing)
    }

    pub fn generate_equipment(
        &mut self,
        rows: usize,
        wells: Option<&Table<Well>>,
        existing: Option<&HashSet<String>>,
    ) -> GenerationOutcome<Equipment> {
        equipment::generate_equipment(&mut self.ctx, &self.options, rows, wells, existing)
    }

    pub fn generate_production(
        &mut self,
        rows: usize,
        wells: Option<&Table<Well>>,
        existing: Option<&HashSet<String>>,
    ) -> GenerationOutcome<ProductionRecord> {
        production::generate_production(&mut self.ctx, &self.options, rows, wells, existing)
    }

    pub fn generate_incidents(
        &mut self,
        rows: usize,
        equipment: Option<&Table<Equipment>>,
        production: Option<&Table<ProductionRecord>>,
        existing: Option<&HashSet<String>>,
    ) -> GenerationOutcome<Incident> {
        incidents::generate_incidents(
            &mut self.ctx,
            &self.options,
            rows,
            equipment,
            production,
            existing,
        )
    }
}

/// The four tables of one generation pass.
#[derive(Debug, Default)]
pub struct GeneratedTables {
    pub wells: Table<Well>,
    pub equipment: Table<Equipment>,
    pub production: Table<ProductionRecord>,
    pub incidents: Table<Incident>,
}

impl GeneratedTables {
    pub fn counts(&self) -> BTreeMap<TableName, usize> {
        BTreeMap::from([
            (TableName::Wells, self.wells.len()),
            (TableName::Equipment, self.equipment.len()),
            (TableName::Production, self.production.len()),
            (TableName::Incidents, self.incidents.len()),
        ])
    }

    pub fn frames(&self) -> BTreeMap<TableName, Frame> {
        BTreeMap::from([
            (TableName::Wells, self.wells.to_frame()),
            (TableName::Equipment, self.equipment.to_frame()),
            (TableName::Production, self.production.to_frame()),
            (TableName::Incidents, self.incidents.to_frame()),
        ])
    }
}

impl DataGenerator {
    /// Generate all four tables in dependency order, stopping at the first empty stage.
    pub fn generate_all(
        &mut self,
        sizes: &BatchSizes,
        existing: &HashMap<TableName, HashSet<String>>,
    ) -> Result<GeneratedTables, OutcomeError> {
        let wells = self
            .generate_wells(sizes.wells, existing.get(&TableName::Wells))
            .into_result()?;
        let equipment = self
            .generate_equipment(
                sizes.equipment,
                Some(&wells),
                existing.get(&TableName::Equipment),
            )
            .into_result()?;
        let production = self
            .generate_production(
                sizes.production,
                Some(&wells),
                existing.get(&TableName::Production),
            )
            .into_result()?;
        let incidents = self
            .generate_incidents(
                sizes.incidents,
                Some(&equipment),
                Some(&production),
                existing.get(&TableName::Incidents),
            )
            .into_result()?;

        Ok(GeneratedTables {
            wells,
            equipment,
            production,
            incidents,
        })
    }
}
