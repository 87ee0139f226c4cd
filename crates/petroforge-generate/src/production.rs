//! Daily production measurements of generated wells.

use std::collections::HashSet;

use petroforge_core::{ProductionRecord, Table, Well};
use rand::Rng;
use tracing::warn;

use crate::batch::{BatchPlan, Draw, run_batches};
use crate::codes::{CodeAllocator, CodeTemplate};
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationOutcome};
use crate::sampling::{add_days, date_between, pick};

pub const CHUNK_SIZE: usize = 100;

/// Generate `rows` production records for wells drawn from `wells`.
pub fn generate_production(
    ctx: &mut GenerationContext,
    options: &GenerateOptions,
    rows: usize,
    wells: Option<&Table<Well>>,
    existing: Option<&HashSet<String>>,
) -> GenerationOutcome<ProductionRecord> {
    let Some(wells) = wells.filter(|wells| !wells.is_empty()) else {
        let reason = "no wells supplied, production requires raw_pocos".to_string();
        warn!(table = "raw_producao", %reason, "missing input");
        return GenerationOutcome::EmptyInput(reason);
    };

    let mut codes =
        CodeAllocator::new(CodeTemplate::PRODUCTION, existing, options.max_code_attempts);
    if let Err(err) = codes.ensure_capacity(rows) {
        warn!(table = "raw_producao", error = %err, "code space too small");
        return GenerationOutcome::Failed(err);
    }

    let plan = BatchPlan {
        target: rows,
        chunk_size: CHUNK_SIZE,
        draw_budget: rows,
    };
    run_batches(plan, || {
        build_production(ctx, wells.rows(), &mut codes).map(Draw::Record)
    })
}

fn build_production(
    ctx: &mut GenerationContext,
    wells: &[Well],
    codes: &mut CodeAllocator<'_>,
) -> Result<ProductionRecord, GenerationError> {
    let today = ctx.today;
    let rng = &mut ctx.rng;
    let cod_producao = codes.allocate(rng)?;
    let well = pick(rng, wells, "raw_pocos")?;

    let first_day = add_days(well.data_perfuracao, rng.random_range(45..=90))?;
    let (min_volume, max_volume) = well.tipo_poco.oil_volume_range();
    let petroleo_barris_dia = rng.random_range(min_volume..=max_volume);
    let water_multiplier: i64 = rng.random_range(10..=40);

    Ok(ProductionRecord {
        cod_producao,
        cod_poco: well.codigo_poco.clone(),
        data_producao: date_between(rng, first_day, today),
        petroleo_barris_dia,
        agua_produzida_m3: (petroleo_barris_dia * water_multiplier) as f64,
        tempo_horas_operacao: rng.random_range(0.0..=24.0),
        pressao_bar: rng.random_range(150..=450),
        temperatura_celsius: rng.random_range(60.0..=120.0),
    })
}
