use std::collections::{HashMap, HashSet};

use chrono::{Days, Months, NaiveDate};

use petroforge_core::{Basin, ProductionRecord, Table, TableName, Well, WellType};
use petroforge_generate::incidents::first_production_by_well;
use petroforge_generate::{
    BatchSizes, CodeTemplate, DataGenerator, GenerateOptions, GenerationContext, GenerationError,
    GenerationOutcome,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

fn generator(seed: u64) -> DataGenerator {
    DataGenerator::new(
        GenerationContext::seeded(seed, today()),
        GenerateOptions::default(),
    )
}

fn generated<R: petroforge_core::Record>(outcome: GenerationOutcome<R>) -> Table<R> {
    match outcome {
        GenerationOutcome::Generated(table) => table,
        GenerationOutcome::EmptyInput(reason) => panic!("unexpected empty input: {reason}"),
        GenerationOutcome::Failed(err) => panic!("generation failed: {err}"),
    }
}

#[test]
fn wells_scenario_yields_distinct_codes_in_template() {
    let mut generator = generator(11);
    let wells = generated(generator.generate_wells(10, None));

    assert_eq!(wells.len(), 10);
    let codes: HashSet<&str> = wells.keys().collect();
    assert_eq!(codes.len(), 10);
    for code in codes {
        assert!(CodeTemplate::WELL.matches(code), "bad code {code}");
    }
}

#[test]
fn well_depth_and_location_follow_type() {
    let mut generator = generator(12);
    let wells = generated(generator.generate_wells(400, None));
    let drilled_from = today().checked_sub_months(Months::new(120)).unwrap();
    let drilled_to = today().checked_sub_months(Months::new(12)).unwrap();

    let mut seen_types = HashSet::new();
    for well in &wells {
        seen_types.insert(well.tipo_poco);
        match well.tipo_poco {
            WellType::Offshore => {
                assert!((2_000..=7_000).contains(&well.profundidade_metros));
                assert!(Basin::OFFSHORE.contains(&well.localizacao));
            }
            WellType::Onshore => {
                assert!((500..=3_000).contains(&well.profundidade_metros));
                assert!(Basin::ONSHORE.contains(&well.localizacao));
            }
        }
        assert!(well.data_perfuracao >= drilled_from && well.data_perfuracao <= drilled_to);
        let (city, suffix) = well.nome_poco.rsplit_once('-').expect("name suffix");
        assert!(!city.is_empty());
        assert!((1..=100).contains(&suffix.parse::<u32>().expect("numeric suffix")));
    }
    assert_eq!(seen_types.len(), 2);
}

#[test]
fn existing_codes_are_never_reproduced() {
    let existing: HashSet<String> = (100..=5_000).map(|n| format!("POCO_{n}")).collect();
    let mut generator = generator(13);
    let wells = generated(generator.generate_wells(200, Some(&existing)));

    assert_eq!(wells.len(), 200);
    for code in wells.keys() {
        assert!(!existing.contains(code), "reused {code}");
    }
}

#[test]
fn exhausted_code_space_fails_the_table() {
    let existing: HashSet<String> = (100..=6_600).map(|n| format!("POCO_{n}")).collect();
    let mut generator = generator(14);
    match generator.generate_wells(10, Some(&existing)) {
        GenerationOutcome::Failed(GenerationError::CodeSpaceExhausted {
            requested,
            available,
            ..
        }) => {
            assert_eq!(requested, 10);
            assert_eq!(available, 6);
        }
        other => panic!("expected code space failure, got {other:?}"),
    }
}

#[test]
fn nearly_full_code_space_still_fills_the_request() {
    let existing: HashSet<String> = (100..=6_590).map(|n| format!("POCO_{n}")).collect();
    for seed in 0..20 {
        let wells = generated(generator(seed).generate_wells(16, Some(&existing)));
        let codes: HashSet<&str> = wells.keys().collect();
        let expected: HashSet<String> = (6_591..=6_606).map(|n| format!("POCO_{n}")).collect();
        assert_eq!(codes.len(), 16);
        assert!(codes.iter().all(|code| expected.contains(*code)), "seed {seed}");
    }
}

#[test]
fn equipment_scenario_references_the_single_well() {
    let mut generator = generator(21);
    let wells = generated(generator.generate_wells(1, None));
    let well = &wells.rows()[0];
    let equipment = generated(generator.generate_equipment(5, Some(&wells), None));

    assert_eq!(equipment.len(), 5);
    let tested_from = today().checked_sub_months(Months::new(6)).unwrap();
    for unit in &equipment {
        assert_eq!(unit.cod_poco, well.codigo_poco);
        let offset = (unit.data_instalacao - well.data_perfuracao).num_days();
        assert!((30..=75).contains(&offset), "offset {offset}");
        assert!((10..=25).contains(&unit.vida_util_anos));
        assert!(unit.ultimo_teste >= tested_from && unit.ultimo_teste <= today());
        assert!((0.6..=1.0).contains(&unit.eficiencia_operacional));
        assert!(unit.modelo.starts_with(unit.marca.label()));
        assert!(CodeTemplate::EQUIPMENT.matches(&unit.cod_equipamento));
    }
}

#[test]
fn downstream_generators_report_missing_input() {
    let mut generator = generator(22);
    let empty_wells: Table<Well> = Table::new();

    assert!(matches!(
        generator.generate_equipment(5, None, None),
        GenerationOutcome::EmptyInput(_)
    ));
    assert!(matches!(
        generator.generate_production(5, Some(&empty_wells), None),
        GenerationOutcome::EmptyInput(_)
    ));
}

#[test]
fn production_dates_and_volumes_follow_the_well() {
    let mut generator = generator(31);
    let wells = generated(generator.generate_wells(40, None));
    let production = generated(generator.generate_production(600, Some(&wells), None));
    let by_code: HashMap<&str, &Well> = wells.iter().map(|w| (w.codigo_poco.as_str(), w)).collect();

    assert_eq!(production.len(), 600);
    for record in &production {
        let well = by_code[record.cod_poco.as_str()];
        let earliest = well.data_perfuracao.checked_add_days(Days::new(45)).unwrap();
        assert!(record.data_producao >= earliest);
        assert!(record.data_producao <= today());

        let (min, max) = well.tipo_poco.oil_volume_range();
        assert!((min..=max).contains(&record.petroleo_barris_dia));
        let ratio = record.agua_produzida_m3 / record.petroleo_barris_dia as f64;
        assert!((10.0..=40.0).contains(&ratio));
        assert_eq!(ratio.fract(), 0.0);
        assert!((0.0..=24.0).contains(&record.tempo_horas_operacao));
        assert!((150..=450).contains(&record.pressao_bar));
        assert!((60.0..=120.0).contains(&record.temperatura_celsius));
    }
}

#[test]
fn incidents_with_empty_production_do_not_fail() {
    let mut generator = generator(41);
    let wells = generated(generator.generate_wells(3, None));
    let equipment = generated(generator.generate_equipment(6, Some(&wells), None));
    let production: Table<ProductionRecord> = Table::new();

    let outcome = generator.generate_incidents(10, Some(&equipment), Some(&production), None);
    let GenerationOutcome::EmptyInput(reason) = outcome else {
        panic!("expected empty input");
    };
    assert!(reason.contains("raw_producao"));

    let outcome = generator.generate_incidents(10, None, Some(&production), None);
    let GenerationOutcome::EmptyInput(reason) = outcome else {
        panic!("expected empty input");
    };
    assert!(reason.contains("raw_equipamentos"));
}

#[test]
fn incidents_only_reference_wells_with_production() {
    let mut generator = generator(42);
    let wells = generated(generator.generate_wells(2, None));
    let equipment = generated(generator.generate_equipment(40, Some(&wells), None));

    let producing = Table::from_rows(vec![wells.rows()[0].clone()]).unwrap();
    let production = generated(generator.generate_production(30, Some(&producing), None));
    let first_production = first_production_by_well(&production);
    let producing_code = wells.rows()[0].codigo_poco.as_str();

    let incidents = generated(generator.generate_incidents(
        25,
        Some(&equipment),
        Some(&production),
        None,
    ));
    assert_eq!(incidents.len(), 25);

    for incident in &incidents {
        assert_eq!(incident.cod_poco, producing_code);
        assert!(equipment.contains_key(&incident.cod_equipamento));
        assert!(incident.data_incidente >= first_production[producing_code]);
        assert!(incident.data_incidente <= today().max(first_production[producing_code]));
        assert!((1.0..=168.0).contains(&incident.tempo_parada_horas));
        assert!((50_000..=5_000_000).contains(&incident.custo_estimado_reais));
        assert!(CodeTemplate::INCIDENT.matches(&incident.cod_incidente));
    }
}

#[test]
fn exhausted_draw_budget_returns_a_partial_incident_table() {
    let mut generator = DataGenerator::new(
        GenerationContext::seeded(43, today()),
        GenerateOptions {
            max_draws_factor: 1,
            ..GenerateOptions::default()
        },
    );
    let wells = generated(generator.generate_wells(10, None));
    let equipment = generated(generator.generate_equipment(40, Some(&wells), None));

    let producing = Table::from_rows(wells.rows()[..5].to_vec()).unwrap();
    let production = generated(generator.generate_production(60, Some(&producing), None));
    let first_production = first_production_by_well(&production);

    let incidents = generated(generator.generate_incidents(
        30,
        Some(&equipment),
        Some(&production),
        None,
    ));
    assert!(!incidents.is_empty());
    assert!(incidents.len() < 30, "every draw matched a producing well");
    for incident in &incidents {
        assert!(first_production.contains_key(incident.cod_poco.as_str()));
    }
}

#[test]
fn same_seed_reproduces_every_table() {
    let sizes = BatchSizes {
        wells: 20,
        equipment: 40,
        production: 80,
        incidents: 30,
    };
    let first = generator(7).generate_all(&sizes, &HashMap::new()).expect("first run");
    let second = generator(7).generate_all(&sizes, &HashMap::new()).expect("second run");

    assert_eq!(first.frames(), second.frames());
    assert_eq!(first.counts()[&TableName::Wells], 20);
    assert_eq!(first.counts()[&TableName::Incidents], 30);
}
