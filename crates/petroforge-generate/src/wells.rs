//! Root table: wells have no upstream dependency.

use std::collections::HashSet;

use chrono::NaiveDate;
use fake::Fake;
use petroforge_core::{GeologicLayer, OperationalStatus, Operator, Well, WellType};
use rand::Rng;
use tracing::warn;

use crate::batch::{BatchPlan, Draw, run_batches};
use crate::codes::{CodeAllocator, CodeTemplate};
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationOutcome};
use crate::sampling::{Weighted, date_between, pick, sub_months};

pub const CHUNK_SIZE: usize = 50;

struct WellCatalogs {
    well_type: Weighted<WellType>,
    layer: Weighted<GeologicLayer>,
    status: Weighted<OperationalStatus>,
    operator: Weighted<Operator>,
}

impl WellCatalogs {
    fn new() -> Result<Self, GenerationError> {
        Ok(Self {
            well_type: Weighted::new(&[(WellType::Offshore, 80), (WellType::Onshore, 20)])?,
            layer: Weighted::new(&[(GeologicLayer::PreSalt, 78), (GeologicLayer::PostSalt, 22)])?,
            status: Weighted::new(&[
                (OperationalStatus::Active, 85),
                (OperationalStatus::Maintenance, 10),
                (OperationalStatus::Inactive, 5),
            ])?,
            operator: Weighted::new(&[
                (Operator::Petrobras, 90),
                (Operator::Shell, 5),
                (Operator::TotalEnergies, 3),
                (Operator::Equinor, 2),
            ])?,
        })
    }
}

/// Generate `rows` wells whose codes avoid `existing`.
pub fn generate_wells(
    ctx: &mut GenerationContext,
    options: &GenerateOptions,
    rows: usize,
    existing: Option<&HashSet<String>>,
) -> GenerationOutcome<Well> {
    let catalogs = match WellCatalogs::new() {
        Ok(catalogs) => catalogs,
        Err(err) => return GenerationOutcome::Failed(err),
    };
    let mut codes = CodeAllocator::new(CodeTemplate::WELL, existing, options.max_code_attempts);
    if let Err(err) = codes.ensure_capacity(rows) {
        warn!(table = "raw_pocos", error = %err, "code space too small");
        return GenerationOutcome::Failed(err);
    }
    // Drilled between ten years and one year ago.
    let window = match (sub_months(ctx.today, 120), sub_months(ctx.today, 12)) {
        (Ok(start), Ok(end)) => (start, end),
        (Err(err), _) | (_, Err(err)) => return GenerationOutcome::Failed(err),
    };

    let plan = BatchPlan {
        target: rows,
        chunk_size: CHUNK_SIZE,
        draw_budget: rows,
    };
    run_batches(plan, || {
        build_well(ctx, &catalogs, &mut codes, window).map(Draw::Record)
    })
}

fn build_well(
    ctx: &mut GenerationContext,
    catalogs: &WellCatalogs,
    codes: &mut CodeAllocator<'_>,
    (drilled_from, drilled_to): (NaiveDate, NaiveDate),
) -> Result<Well, GenerationError> {
    let rng = &mut ctx.rng;
    let codigo_poco = codes.allocate(rng)?;
    let city: String = fake::faker::address::pt_br::CityName().fake_with_rng(rng);
    let nome_poco = format!("{}-{}", city, rng.random_range(1..=100));

    let tipo_poco = catalogs.well_type.sample(rng);
    let (min_depth, max_depth) = tipo_poco.depth_range();
    let localizacao = *pick(rng, tipo_poco.basins(), "localizacao")?;

    Ok(Well {
        codigo_poco,
        nome_poco,
        tipo_poco,
        localizacao,
        camada: catalogs.layer.sample(rng),
        profundidade_metros: rng.random_range(min_depth..=max_depth),
        status_operacional: catalogs.status.sample(rng),
        data_perfuracao: date_between(rng, drilled_from, drilled_to),
        operadora: catalogs.operator.sample(rng),
    })
}
