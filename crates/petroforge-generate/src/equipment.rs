//! Equipment installed at generated wells.

use std::collections::HashSet;

use chrono::NaiveDate;
use petroforge_core::{Brand, Equipment, EquipmentType, Table, Well};
use rand::Rng;
use tracing::warn;

use crate::batch::{BatchPlan, Draw, run_batches};
use crate::codes::{CodeAllocator, CodeTemplate};
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationOutcome};
use crate::sampling::{add_days, date_between, pick, sub_months};

pub const CHUNK_SIZE: usize = 100;

/// Generate `rows` equipment units, each installed at a well drawn from `wells`.
pub fn generate_equipment(
    ctx: &mut GenerationContext,
    options: &GenerateOptions,
    rows: usize,
    wells: Option<&Table<Well>>,
    existing: Option<&HashSet<String>>,
) -> GenerationOutcome<Equipment> {
    let Some(wells) = wells.filter(|wells| !wells.is_empty()) else {
        let reason = "no wells supplied, equipment requires raw_pocos".to_string();
        warn!(table = "raw_equipamentos", %reason, "missing input");
        return GenerationOutcome::EmptyInput(reason);
    };

    let mut codes =
        CodeAllocator::new(CodeTemplate::EQUIPMENT, existing, options.max_code_attempts);
    if let Err(err) = codes.ensure_capacity(rows) {
        warn!(table = "raw_equipamentos", error = %err, "code space too small");
        return GenerationOutcome::Failed(err);
    }
    let tested_from = match sub_months(ctx.today, 6) {
        Ok(date) => date,
        Err(err) => return GenerationOutcome::Failed(err),
    };

    let plan = BatchPlan {
        target: rows,
        chunk_size: CHUNK_SIZE,
        draw_budget: rows,
    };
    run_batches(plan, || {
        build_equipment(ctx, wells.rows(), &mut codes, tested_from).map(Draw::Record)
    })
}

fn build_equipment(
    ctx: &mut GenerationContext,
    wells: &[Well],
    codes: &mut CodeAllocator<'_>,
    tested_from: NaiveDate,
) -> Result<Equipment, GenerationError> {
    let today = ctx.today;
    let rng = &mut ctx.rng;
    let cod_equipamento = codes.allocate(rng)?;
    let well = pick(rng, wells, "raw_pocos")?;

    let tipo_equipamento = *pick(rng, EquipmentType::ALL, "tipo_equipamento")?;
    let marca = *pick(rng, Brand::ALL, "marca")?;
    let modelo = format!(
        "{}-{}-{}",
        marca.label(),
        tipo_equipamento.label(),
        rng.random_range(100..=9_999)
    );
    let data_instalacao = add_days(well.data_perfuracao, rng.random_range(30..=75))?;
    let efficiency_pct: u32 = rng.random_range(60..=100);

    Ok(Equipment {
        cod_equipamento,
        cod_poco: well.codigo_poco.clone(),
        tipo_equipamento,
        marca,
        modelo,
        data_instalacao,
        vida_util_anos: rng.random_range(10..=25),
        ultimo_teste: date_between(rng, tested_from, today),
        eficiencia_operacional: f64::from(efficiency_pct) / 100.0,
    })
}
