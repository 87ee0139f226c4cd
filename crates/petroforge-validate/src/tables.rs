use petroforge_core::{Frame, TableName};
use tracing::{info, warn};

use crate::engine::validate_frame;
use crate::errors::ValidationError;
use crate::schemas::schema_for;

/// Validate one table against its declared schema.
///
/// A missing or empty frame is a precondition failure, reported apart from
/// schema violations.
pub fn validate_table(table: TableName, frame: Option<&Frame>) -> Result<Frame, ValidationError> {
    let frame = match frame {
        None => {
            return Err(ValidationError::EmptyInput {
                table,
                reason: "no table supplied".to_string(),
            });
        }
        Some(frame) if frame.is_empty() => {
            return Err(ValidationError::EmptyInput {
                table,
                reason: "table has no rows".to_string(),
            });
        }
        Some(frame) => frame,
    };

    info!(table = table.as_str(), rows = frame.len(), "validating table");
    match validate_frame(frame, &schema_for(table)) {
        Ok(validated) => {
            info!(table = table.as_str(), rows = validated.len(), "table validated");
            Ok(validated)
        }
        Err(errors) => {
            warn!(
                table = table.as_str(),
                rows = frame.len(),
                violations = errors.len(),
                "schema validation failed"
            );
            Err(ValidationError::Schema(errors))
        }
    }
}

pub fn validate_wells(frame: Option<&Frame>) -> Result<Frame, ValidationError> {
    validate_table(TableName::Wells, frame)
}

pub fn validate_equipment(frame: Option<&Frame>) -> Result<Frame, ValidationError> {
    validate_table(TableName::Equipment, frame)
}

pub fn validate_production(frame: Option<&Frame>) -> Result<Frame, ValidationError> {
    validate_table(TableName::Production, frame)
}

pub fn validate_incidents(frame: Option<&Frame>) -> Result<Frame, ValidationError> {
    validate_table(TableName::Incidents, frame)
}
