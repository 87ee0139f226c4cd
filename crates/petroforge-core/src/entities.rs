//! Entity records of the four persisted tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Basin, Brand, EquipmentType, GeologicLayer, IncidentType, OperationalStatus, Operator,
    ResolutionStatus, Severity, WellType,
};
use crate::error::Result;
use crate::frame::RowView;
use crate::table::{Record, TableName};
use crate::value::Value;

/// A drilling site. Root of the entity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub codigo_poco: String,
    pub nome_poco: String,
    pub tipo_poco: WellType,
    pub localizacao: Basin,
    pub camada: GeologicLayer,
    pub profundidade_metros: i64,
    pub status_operacional: OperationalStatus,
    pub data_perfuracao: NaiveDate,
    pub operadora: Operator,
}

impl Well {
    pub const COLUMNS: &'static [&'static str] = &[
        "codigo_poco",
        "nome_poco",
        "tipo_poco",
        "localizacao",
        "camada",
        "profundidade_metros",
        "status_operacional",
        "data_perfuracao",
        "operadora",
    ];
}

impl Record for Well {
    const TABLE: TableName = TableName::Wells;

    fn columns() -> &'static [&'static str] {
        Self::COLUMNS
    }

    fn key(&self) -> &str {
        &self.codigo_poco
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.codigo_poco.as_str()),
            Value::from(self.nome_poco.as_str()),
            Value::Int(self.tipo_poco.code()),
            Value::from(self.localizacao.label()),
            Value::from(self.camada.label()),
            Value::Int(self.profundidade_metros),
            Value::from(self.status_operacional.label()),
            Value::Date(self.data_perfuracao),
            Value::from(self.operadora.label()),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self> {
        Ok(Self {
            codigo_poco: row.text("codigo_poco")?.to_string(),
            nome_poco: row.text("nome_poco")?.to_string(),
            tipo_poco: WellType::from_code(row.int("tipo_poco")?)?,
            localizacao: Basin::parse(row.text("localizacao")?)?,
            camada: GeologicLayer::parse(row.text("camada")?)?,
            profundidade_metros: row.int("profundidade_metros")?,
            status_operacional: OperationalStatus::parse(row.text("status_operacional")?)?,
            data_perfuracao: row.date("data_perfuracao")?,
            operadora: Operator::parse(row.text("operadora")?)?,
        })
    }
}

/// A piece of operational hardware installed at a well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub cod_equipamento: String,
    pub cod_poco: String,
    pub tipo_equipamento: EquipmentType,
    pub marca: Brand,
    pub modelo: String,
    pub data_instalacao: NaiveDate,
    pub vida_util_anos: i64,
    pub ultimo_teste: NaiveDate,
    /// Operating efficiency as a ratio in `[0.6, 1.0]`.
    pub eficiencia_operacional: f64,
}

impl Equipment {
    pub const COLUMNS: &'static [&'static str] = &[
        "cod_equipamento",
        "cod_poco",
        "tipo_equipamento",
        "marca",
        "modelo",
        "data_instalacao",
        "vida_util_anos",
        "ultimo_teste",
        "eficiencia_operacional",
    ];
}

impl Record for Equipment {
    const TABLE: TableName = TableName::Equipment;

    fn columns() -> &'static [&'static str] {
        Self::COLUMNS
    }

    fn key(&self) -> &str {
        &self.cod_equipamento
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.cod_equipamento.as_str()),
            Value::from(self.cod_poco.as_str()),
            Value::from(self.tipo_equipamento.label()),
            Value::from(self.marca.label()),
            Value::from(self.modelo.as_str()),
            Value::Date(self.data_instalacao),
            Value::Int(self.vida_util_anos),
            Value::Date(self.ultimo_teste),
            Value::Float(self.eficiencia_operacional),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self> {
        Ok(Self {
            cod_equipamento: row.text("cod_equipamento")?.to_string(),
            cod_poco: row.text("cod_poco")?.to_string(),
            tipo_equipamento: EquipmentType::parse(row.text("tipo_equipamento")?)?,
            marca: Brand::parse(row.text("marca")?)?,
            modelo: row.text("modelo")?.to_string(),
            data_instalacao: row.date("data_instalacao")?,
            vida_util_anos: row.int("vida_util_anos")?,
            ultimo_teste: row.date("ultimo_teste")?,
            eficiencia_operacional: row.float("eficiencia_operacional")?,
        })
    }
}

/// A dated measurement of a well's output and operating conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub cod_producao: String,
    pub cod_poco: String,
    pub data_producao: NaiveDate,
    pub petroleo_barris_dia: i64,
    pub agua_produzida_m3: f64,
    pub tempo_horas_operacao: f64,
    pub pressao_bar: i64,
    pub temperatura_celsius: f64,
}

impl ProductionRecord {
    pub const COLUMNS: &'static [&'static str] = &[
        "cod_producao",
        "cod_poco",
        "data_producao",
        "petroleo_barris_dia",
        "agua_produzida_m3",
        "tempo_horas_operacao",
        "pressao_bar",
        "temperatura_celsius",
    ];
}

impl Record for ProductionRecord {
    const TABLE: TableName = TableName::Production;

    fn columns() -> &'static [&'static str] {
        Self::COLUMNS
    }

    fn key(&self) -> &str {
        &self.cod_producao
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.cod_producao.as_str()),
            Value::from(self.cod_poco.as_str()),
            Value::Date(self.data_producao),
            Value::Int(self.petroleo_barris_dia),
            Value::Float(self.agua_produzida_m3),
            Value::Float(self.tempo_horas_operacao),
            Value::Int(self.pressao_bar),
            Value::Float(self.temperatura_celsius),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self> {
        Ok(Self {
            cod_producao: row.text("cod_producao")?.to_string(),
            cod_poco: row.text("cod_poco")?.to_string(),
            data_producao: row.date("data_producao")?,
            petroleo_barris_dia: row.int("petroleo_barris_dia")?,
            agua_produzida_m3: row.float("agua_produzida_m3")?,
            tempo_horas_operacao: row.float("tempo_horas_operacao")?,
            pressao_bar: row.int("pressao_bar")?,
            temperatura_celsius: row.float("temperatura_celsius")?,
        })
    }
}

/// A dated operational event tied to one equipment unit and its well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub cod_incidente: String,
    pub cod_poco: String,
    pub cod_equipamento: String,
    pub data_incidente: NaiveDate,
    pub tipo_incidente: IncidentType,
    pub severidade: Severity,
    pub tempo_parada_horas: f64,
    pub custo_estimado_reais: i64,
    pub status_resolucao: ResolutionStatus,
}

impl Incident {
    pub const COLUMNS: &'static [&'static str] = &[
        "cod_incidente",
        "cod_poco",
        "cod_equipamento",
        "data_incidente",
        "tipo_incidente",
        "severidade",
        "tempo_parada_horas",
        "custo_estimado_reais",
        "status_resolucao",
    ];
}

impl Record for Incident {
    const TABLE: TableName = TableName::Incidents;

    fn columns() -> &'static [&'static str] {
        Self::COLUMNS
    }

    fn key(&self) -> &str {
        &self.cod_incidente
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.cod_incidente.as_str()),
            Value::from(self.cod_poco.as_str()),
            Value::from(self.cod_equipamento.as_str()),
            Value::Date(self.data_incidente),
            Value::from(self.tipo_incidente.label()),
            Value::from(self.severidade.label()),
            Value::Float(self.tempo_parada_horas),
            Value::Int(self.custo_estimado_reais),
            Value::from(self.status_resolucao.label()),
        ]
    }

    fn from_row(row: &RowView<'_>) -> Result<Self> {
        Ok(Self {
            cod_incidente: row.text("cod_incidente")?.to_string(),
            cod_poco: row.text("cod_poco")?.to_string(),
            cod_equipamento: row.text("cod_equipamento")?.to_string(),
            data_incidente: row.date("data_incidente")?,
            tipo_incidente: IncidentType::parse(row.text("tipo_incidente")?)?,
            severidade: Severity::parse(row.text("severidade")?)?,
            tempo_parada_horas: row.float("tempo_parada_horas")?,
            custo_estimado_reais: row.int("custo_estimado_reais")?,
            status_resolucao: ResolutionStatus::parse(row.text("status_resolucao")?)?,
        })
    }
}
