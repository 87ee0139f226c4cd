//! The four declared table schemas.
//!
//! Domain checks are built from the same closed domains the generators
//! draw from.

use petroforge_core::{
    Basin, Brand, EquipmentType, GeologicLayer, IncidentType, OperationalStatus, Operator,
    ResolutionStatus, Severity, TableName, WellType,
};

use crate::contract::{Check, ColumnContract, ColumnKind, TableSchema};

pub fn schema_for(table: TableName) -> TableSchema {
    match table {
        TableName::Wells => wells_schema(),
        TableName::Equipment => equipment_schema(),
        TableName::Production => production_schema(),
        TableName::Incidents => incidents_schema(),
    }
}

fn one_of(values: Vec<&'static str>) -> Check {
    Check::OneOf { values }
}

fn range(min: f64, max: f64) -> Check {
    Check::Range { min, max }
}

pub fn wells_schema() -> TableSchema {
    use ColumnKind::*;
    TableSchema::strict(
        TableName::Wells,
        vec![
            ColumnContract::new("codigo_poco", Text).unique(),
            ColumnContract::new("nome_poco", Text),
            ColumnContract::new("tipo_poco", Int).check(Check::OneOfInt {
                values: WellType::codes(),
            }),
            ColumnContract::new("localizacao", Text).check(one_of(Basin::labels())),
            ColumnContract::new("camada", Text).check(one_of(GeologicLayer::labels())),
            ColumnContract::new("profundidade_metros", Int).check(range(500.0, 7_000.0)),
            ColumnContract::new("status_operacional", Text)
                .check(one_of(OperationalStatus::labels())),
            ColumnContract::new("data_perfuracao", Date),
            ColumnContract::new("operadora", Text).check(one_of(Operator::labels())),
        ],
    )
}

pub fn equipment_schema() -> TableSchema {
    use ColumnKind::*;
    TableSchema::strict(
        TableName::Equipment,
        vec![
            ColumnContract::new("cod_equipamento", Text).unique(),
            ColumnContract::new("cod_poco", Text),
            ColumnContract::new("tipo_equipamento", Text).check(one_of(EquipmentType::labels())),
            ColumnContract::new("marca", Text).check(one_of(Brand::labels())),
            ColumnContract::new("modelo", Text),
            ColumnContract::new("data_instalacao", Date),
            ColumnContract::new("vida_util_anos", Int).check(range(10.0, 25.0)),
            ColumnContract::new("ultimo_teste", Date),
            ColumnContract::new("eficiencia_operacional", Float).check(range(0.6, 1.0)),
        ],
    )
}

pub fn production_schema() -> TableSchema {
    use ColumnKind::*;
    TableSchema::strict(
        TableName::Production,
        vec![
            ColumnContract::new("cod_producao", Text).unique(),
            ColumnContract::new("cod_poco", Text),
            ColumnContract::new("data_producao", Date),
            ColumnContract::new("petroleo_barris_dia", Int).check(range(100.0, 200_000.0)),
            ColumnContract::new("agua_produzida_m3", Float).check(Check::Min { min: 0.0 }),
            ColumnContract::new("tempo_horas_operacao", Float).check(range(0.0, 24.0)),
            ColumnContract::new("pressao_bar", Int).check(range(150.0, 450.0)),
            ColumnContract::new("temperatura_celsius", Float).check(range(60.0, 120.0)),
        ],
    )
}

pub fn incidents_schema() -> TableSchema {
    use ColumnKind::*;
    TableSchema::strict(
        TableName::Incidents,
        vec![
            ColumnContract::new("cod_incidente", Text).unique(),
            ColumnContract::new("cod_poco", Text),
            ColumnContract::new("cod_equipamento", Text),
            ColumnContract::new("data_incidente", Date),
            ColumnContract::new("tipo_incidente", Text).check(one_of(IncidentType::labels())),
            ColumnContract::new("severidade", Text).check(one_of(Severity::labels())),
            ColumnContract::new("tempo_parada_horas", Float).check(range(1.0, 168.0)),
            ColumnContract::new("custo_estimado_reais", Int).check(range(50_000.0, 5_000_000.0)),
            ColumnContract::new("status_resolucao", Text).check(one_of(ResolutionStatus::labels())),
        ],
    )
}
