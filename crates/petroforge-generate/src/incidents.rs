//! Incidents reference an equipment unit and the well it is installed at.
//!
//! An incident is dated no earlier than the first production recorded for
//! its well, so only wells with production can receive incidents. Draws
//! landing on an equipment unit whose well has no production are skipped and
//! do not count toward the requested rows; the loop is bounded by
//! `rows * max_draws_factor` draws.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use petroforge_core::{
    Equipment, Incident, IncidentType, ProductionRecord, ResolutionStatus, Severity, Table,
};
use rand::Rng;
use tracing::{debug, warn};

use crate::batch::{BatchPlan, Draw, run_batches};
use crate::codes::{CodeAllocator, CodeTemplate};
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationOutcome};
use crate::sampling::{Weighted, date_between, pick};

pub const CHUNK_SIZE: usize = 125;

struct IncidentCatalogs {
    severity: Weighted<Severity>,
    resolution: Weighted<ResolutionStatus>,
}

impl IncidentCatalogs {
    fn new() -> Result<Self, GenerationError> {
        Ok(Self {
            severity: Weighted::new(&[
                (Severity::Low, 50),
                (Severity::Medium, 35),
                (Severity::High, 15),
            ])?,
            resolution: Weighted::new(&[
                (ResolutionStatus::Resolved, 70),
                (ResolutionStatus::InProgress, 20),
                (ResolutionStatus::Pending, 10),
            ])?,
        })
    }
}

/// Earliest production date of every well with at least one production record.
pub fn first_production_by_well(
    production: &Table<ProductionRecord>,
) -> HashMap<&str, NaiveDate> {
    let mut first: HashMap<&str, NaiveDate> = HashMap::new();
    for record in production {
        first
            .entry(record.cod_poco.as_str())
            .and_modify(|date| *date = (*date).min(record.data_producao))
            .or_insert(record.data_producao);
    }
    first
}

pub fn generate_incidents(
    ctx: &mut GenerationContext,
    options: &GenerateOptions,
    rows: usize,
    equipment: Option<&Table<Equipment>>,
    production: Option<&Table<ProductionRecord>>,
    existing: Option<&HashSet<String>>,
) -> GenerationOutcome<Incident> {
    let Some(equipment) = equipment.filter(|table| !table.is_empty()) else {
        let reason = "no equipment supplied, incidents require raw_equipamentos".to_string();
        warn!(table = "raw_incidentes", %reason, "missing input");
        return GenerationOutcome::EmptyInput(reason);
    };
    let Some(production) = production.filter(|table| !table.is_empty()) else {
        let reason = "no production supplied, incidents require raw_producao".to_string();
        warn!(table = "raw_incidentes", %reason, "missing input");
        return GenerationOutcome::EmptyInput(reason);
    };

    let catalogs = match IncidentCatalogs::new() {
        Ok(catalogs) => catalogs,
        Err(err) => return GenerationOutcome::Failed(err),
    };
    let mut codes = CodeAllocator::new(CodeTemplate::INCIDENT, existing, options.max_code_attempts);
    if let Err(err) = codes.ensure_capacity(rows) {
        warn!(table = "raw_incidentes", error = %err, "code space too small");
        return GenerationOutcome::Failed(err);
    }

    let first_production = first_production_by_well(production);
    let eligible = equipment
        .iter()
        .filter(|unit| first_production.contains_key(unit.cod_poco.as_str()))
        .count();
    debug!(
        table = "raw_incidentes",
        equipment = equipment.len(),
        eligible,
        wells_with_production = first_production.len(),
        "incident sources indexed"
    );
    if eligible == 0 {
        warn!(table = "raw_incidentes", "no equipment is installed at a well with production");
        return GenerationOutcome::Generated(Table::new());
    }

    let plan = BatchPlan {
        target: rows,
        chunk_size: CHUNK_SIZE,
        draw_budget: rows.saturating_mul(options.max_draws_factor.max(1)),
    };
    run_batches(plan, || {
        build_incident(ctx, &catalogs, equipment.rows(), &first_production, &mut codes)
    })
}

fn build_incident(
    ctx: &mut GenerationContext,
    catalogs: &IncidentCatalogs,
    equipment: &[Equipment],
    first_production: &HashMap<&str, NaiveDate>,
    codes: &mut CodeAllocator<'_>,
) -> Result<Draw<Incident>, GenerationError> {
    let today = ctx.today;
    let rng = &mut ctx.rng;
    let unit = pick(rng, equipment, "raw_equipamentos")?;
    let Some(&first_day) = first_production.get(unit.cod_poco.as_str()) else {
        return Ok(Draw::Skip);
    };

    Ok(Draw::Record(Incident {
        cod_incidente: codes.allocate(rng)?,
        cod_poco: unit.cod_poco.clone(),
        cod_equipamento: unit.cod_equipamento.clone(),
        data_incidente: date_between(rng, first_day, today),
        tipo_incidente: *pick(rng, IncidentType::ALL, "tipo_incidente")?,
        severidade: catalogs.severity.sample(rng),
        tempo_parada_horas: rng.random_range(1.0..=168.0),
        custo_estimado_reais: rng.random_range(50_000..=5_000_000),
        status_resolucao: catalogs.resolution.sample(rng),
    }))
}
