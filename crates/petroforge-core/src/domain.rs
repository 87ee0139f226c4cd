//! Closed value domains of the entity columns.
//!
//! Every enum carries the exact label persisted in the store; the schema
//! validator builds its domain checks from these same lists, so generator
//! output and acceptance contract cannot drift apart.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! closed_domain {
    ($(#[$meta:meta])* $name:ident, $domain:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|value| value.label()).collect()
            }

            pub fn parse(value: &str) -> Result<Self, CoreError> {
                match value {
                    $($label => Ok($name::$variant),)+
                    other => Err(CoreError::UnknownLabel {
                        domain: $domain,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

/// Well placement. Persisted as the integer code `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum WellType {
    /// Marítimo.
    Offshore,
    /// Terrestre.
    Onshore,
}

impl WellType {
    pub const ALL: &'static [WellType] = &[WellType::Offshore, WellType::Onshore];

    pub fn code(self) -> i64 {
        match self {
            WellType::Offshore => 1,
            WellType::Onshore => 2,
        }
    }

    pub fn codes() -> Vec<i64> {
        Self::ALL.iter().map(|value| value.code()).collect()
    }

    pub fn from_code(code: i64) -> Result<Self, CoreError> {
        match code {
            1 => Ok(WellType::Offshore),
            2 => Ok(WellType::Onshore),
            other => Err(CoreError::UnknownLabel {
                domain: "tipo_poco",
                value: other.to_string(),
            }),
        }
    }

    /// Depth range in meters drawn at generation time.
    pub fn depth_range(self) -> (i64, i64) {
        match self {
            WellType::Offshore => (2_000, 7_000),
            WellType::Onshore => (500, 3_000),
        }
    }

    /// Daily oil volume range in barrels drawn at generation time.
    pub fn oil_volume_range(self) -> (i64, i64) {
        match self {
            WellType::Offshore => (50_000, 200_000),
            WellType::Onshore => (100, 5_000),
        }
    }

    pub fn basins(self) -> &'static [Basin] {
        match self {
            WellType::Offshore => Basin::OFFSHORE,
            WellType::Onshore => Basin::ONSHORE,
        }
    }
}

impl From<WellType> for i64 {
    fn from(value: WellType) -> Self {
        value.code()
    }
}

impl TryFrom<i64> for WellType {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        WellType::from_code(value)
    }
}

impl fmt::Display for WellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

closed_domain!(
    /// Sedimentary basin where a well is located.
    Basin, "localizacao" {
        Santos => "Bacia de santos",
        Campos => "Bacia de Campos",
        EspiritoSanto => "Bacia do Espírito Santos",
        Reconcavo => "Bacia do Recôncavo",
        Potiguar => "Bacia Potiguar",
    }
);

impl Basin {
    pub const OFFSHORE: &'static [Basin] = &[Basin::Santos, Basin::Campos, Basin::EspiritoSanto];
    pub const ONSHORE: &'static [Basin] = &[Basin::Reconcavo, Basin::Potiguar];
}

closed_domain!(
    GeologicLayer, "camada" {
        PreSalt => "Pre-Sal",
        PostSalt => "Pos-Sal",
    }
);

closed_domain!(
    OperationalStatus, "status_operacional" {
        Active => "Ativo",
        Maintenance => "Manutenção",
        Inactive => "Inativo",
    }
);

closed_domain!(
    Operator, "operadora" {
        Petrobras => "Petrobras",
        Shell => "Shell",
        TotalEnergies => "TotalEnergies",
        Equinor => "Equinor",
    }
);

closed_domain!(
    EquipmentType, "tipo_equipamento" {
        SubmersiblePump => "Bomba Submersível",
        Fpso => "FPSO",
        DhsvValve => "Válvula DHSV",
        LiftSystem => "Sistema de Elevação",
        Compressor => "Compressor",
        Separator => "Separador",
    }
);

closed_domain!(
    Brand, "marca" {
        Schlumberger => "Schulemberger",
        Halliburton => "Haliburton",
        BakerHughes => "Baker Hughes",
        Weatherford => "Weatherford",
        Nov => "NOV",
    }
);

closed_domain!(
    IncidentType, "tipo_incidente" {
        EquipmentFailure => "Falha de Equipamento",
        ScheduledStop => "Parada Programada",
        ContainedLeak => "Vazamento Contido",
        PressureDrop => "Queda de Pressão",
        Obstruction => "Obstrução",
        EmergencyMaintenance => "Manutenção Emergencial",
    }
);

closed_domain!(
    Severity, "severidade" {
        Low => "Baixa",
        Medium => "Média",
        High => "Alta",
    }
);

closed_domain!(
    ResolutionStatus, "status_resolucao" {
        Resolved => "Resolvido",
        InProgress => "Em Andamento",
        Pending => "Pendente",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for status in OperationalStatus::ALL {
            assert_eq!(OperationalStatus::parse(status.label()).unwrap(), *status);
        }
        assert!(Severity::parse("Critica").is_err());
    }

    #[test]
    fn well_type_serializes_as_code() {
        let json = serde_json::to_string(&WellType::Onshore).unwrap();
        assert_eq!(json, "2");
        let parsed: WellType = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, WellType::Offshore);
        assert!(serde_json::from_str::<WellType>("3").is_err());
    }

    #[test]
    fn basins_are_disjoint_by_type() {
        for basin in WellType::Offshore.basins() {
            assert!(!WellType::Onshore.basins().contains(basin));
        }
    }
}
