use std::time::Instant;

use petroforge_core::{Record, Table};
use tracing::{info, warn};

use crate::errors::GenerationError;
use crate::model::GenerationOutcome;

/// Shape of one table generation loop.
pub(crate) struct BatchPlan {
    pub target: usize,
    pub chunk_size: usize,
    /// Upper bound on builder calls. Equal to `target` unless draws may be skipped.
    pub draw_budget: usize,
}

/// Result of a single builder call.
pub(crate) enum Draw<R> {
    Record(R),
    /// The draw produced nothing and does not count toward the target.
    Skip,
}

/// Drive `build` until `plan.target` records are collected or the draw budget runs out.
///
/// Records are appended to the table in sub-batches of `plan.chunk_size`.
/// Non-fatal builder errors skip the record; a sub-batch rejected by the
/// table is skipped as a whole; a fatal error fails the table.
pub(crate) fn run_batches<R, F>(plan: BatchPlan, mut build: F) -> GenerationOutcome<R>
where
    R: Record,
    F: FnMut() -> Result<Draw<R>, GenerationError>,
{
    let table_name = R::TABLE.as_str();
    let start = Instant::now();
    let chunk_size = plan.chunk_size.max(1);
    let mut table = Table::<R>::new();
    let mut chunk: Vec<R> = Vec::with_capacity(chunk_size.min(plan.target));
    let mut chunk_index = 0_usize;
    let mut draws = 0_usize;
    let mut skipped = 0_usize;
    let mut record_errors = 0_usize;

    info!(table = table_name, rows = plan.target, "generating table");

    while table.len() + chunk.len() < plan.target && draws < plan.draw_budget {
        draws += 1;
        match build() {
            Ok(Draw::Record(record)) => chunk.push(record),
            Ok(Draw::Skip) => skipped += 1,
            Err(err) if err.is_fatal() => {
                warn!(
                    table = table_name,
                    error = %err,
                    rows_generated = table.len(),
                    "generation failed"
                );
                return GenerationOutcome::Failed(err);
            }
            Err(err) => {
                record_errors += 1;
                warn!(table = table_name, draw = draws, error = %err, "record skipped");
            }
        }

        if chunk.len() == chunk_size {
            chunk_index += 1;
            flush_chunk(&mut table, &mut chunk, chunk_index, plan.target);
        }
    }

    if !chunk.is_empty() {
        chunk_index += 1;
        flush_chunk(&mut table, &mut chunk, chunk_index, plan.target);
    }

    if table.len() < plan.target && skipped > 0 && draws >= plan.draw_budget {
        let err = GenerationError::DrawBudgetExhausted {
            table: table_name,
            budget: plan.draw_budget,
        };
        warn!(table = table_name, rows_generated = table.len(), error = %err, "partial table");
    }

    if table.is_empty() && plan.target > 0 {
        warn!(table = table_name, "no records produced");
    }

    info!(
        table = table_name,
        rows_requested = plan.target,
        rows_generated = table.len(),
        skipped,
        record_errors,
        duration_ms = start.elapsed().as_millis() as u64,
        "table generated"
    );

    GenerationOutcome::Generated(table)
}

fn flush_chunk<R: Record>(table: &mut Table<R>, chunk: &mut Vec<R>, index: usize, target: usize) {
    let rows = std::mem::take(chunk);
    let size = rows.len();
    match table.append_chunk(rows) {
        Ok(_) => info!(
            table = R::TABLE.as_str(),
            chunk = index,
            rows = size,
            progress = table.len(),
            target,
            "chunk generated"
        ),
        Err(err) => warn!(
            table = R::TABLE.as_str(),
            chunk = index,
            rows = size,
            error = %err,
            "chunk skipped"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use chrono::NaiveDate;
    use petroforge_core::{Basin, GeologicLayer, OperationalStatus, Operator, Well, WellType};

    use super::*;

    fn well(code: &str) -> Well {
        Well {
            codigo_poco: code.to_string(),
            nome_poco: "Mossoró-3".to_string(),
            tipo_poco: WellType::Onshore,
            localizacao: Basin::Potiguar,
            camada: GeologicLayer::PostSalt,
            profundidade_metros: 1_200,
            status_operacional: OperationalStatus::Active,
            data_perfuracao: NaiveDate::from_ymd_opt(2020, 1, 10).unwrap(),
            operadora: Operator::Petrobras,
        }
    }

    fn record(code: &str) -> Result<Draw<Well>, GenerationError> {
        Ok(Draw::Record(well(code)))
    }

    fn scripted(
        draws: Vec<Result<Draw<Well>, GenerationError>>,
    ) -> impl FnMut() -> Result<Draw<Well>, GenerationError> {
        let mut draws: VecDeque<_> = draws.into();
        move || draws.pop_front().unwrap_or(Ok(Draw::Skip))
    }

    fn keys(outcome: GenerationOutcome<Well>) -> Vec<String> {
        match outcome {
            GenerationOutcome::Generated(table) => table.keys().map(str::to_string).collect(),
            other => panic!("expected a generated table, got {other:?}"),
        }
    }

    #[test]
    fn bad_records_and_rejected_chunks_are_skipped() {
        let plan = BatchPlan {
            target: 6,
            chunk_size: 3,
            draw_budget: 20,
        };
        let build = scripted(vec![
            record("P1"),
            Err(GenerationError::DateOutOfRange("2262-04-12 + 90 days".to_string())),
            record("P2"),
            record("P3"),
            // duplicate inside the second chunk
            record("P4"),
            record("P4"),
            record("P5"),
            Ok(Draw::Skip),
            record("P6"),
            record("P7"),
        ]);

        assert_eq!(
            keys(run_batches(plan, build)),
            ["P1", "P2", "P3", "P6", "P7"]
        );
    }

    #[test]
    fn draw_budget_bounds_skipping_builders() {
        let plan = BatchPlan {
            target: 5,
            chunk_size: 2,
            draw_budget: 6,
        };
        let build = scripted(vec![
            Ok(Draw::Skip),
            record("P1"),
            Ok(Draw::Skip),
            record("P2"),
            Ok(Draw::Skip),
            record("P3"),
            record("P4"),
        ]);

        assert_eq!(keys(run_batches(plan, build)), ["P1", "P2", "P3"]);
    }

    #[test]
    fn fatal_errors_fail_the_table() {
        let plan = BatchPlan {
            target: 4,
            chunk_size: 2,
            draw_budget: 4,
        };
        let build = scripted(vec![
            record("P1"),
            record("P2"),
            Err(GenerationError::CodeRetriesExhausted {
                prefix: "POCO_",
                attempts: 1_000,
            }),
        ]);

        assert!(matches!(
            run_batches(plan, build),
            GenerationOutcome::Failed(GenerationError::CodeRetriesExhausted { .. })
        ));
    }

    #[test]
    fn zero_target_generates_an_empty_table() {
        let plan = BatchPlan {
            target: 0,
            chunk_size: 50,
            draw_budget: 0,
        };
        assert!(keys(run_batches(plan, scripted(vec![record("P1")]))).is_empty());
    }
}
