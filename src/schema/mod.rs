//! Arrow schema of the canonical table
//!
//! Column order matches the field order of [`NormalizedRow`](crate::models::NormalizedRow).

use std::sync::Arc;

use arrow_schema::{DataType, Field, FieldRef, Schema};

use crate::error::{PipelineError, Result};

pub const MUNICIPALITY: &str = "municipality";
pub const YEAR: &str = "year";
pub const AGE_GROUP: &str = "age_group";
pub const SUB_REGION: &str = "sub_region";
pub const COUNTRY: &str = "country";
pub const GEOMETRY: &str = "geometry";
pub const LAT: &str = "lat";
pub const LON: &str = "lon";
pub const VALUE_GROUPED: &str = "value_grouped";
pub const VALUE_TOTAL: &str = "value_total";
pub const PERCENTAGE: &str = "percentage";
pub const INFLOW: &str = "inflow";
pub const OUTFLOW: &str = "outflow";
pub const NET_MIGRATION: &str = "net_migration";
pub const VALUE_GROUPED_CHANGE: &str = "value_grouped_change";
pub const VALUE_GROUPED_CHANGE_PCT: &str = "value_grouped_change_pct";
pub const NET_MIGRATION_CHANGE: &str = "net_migration_change";
pub const NET_MIGRATION_PER_1000: &str = "net_migration_per_1000";
pub const NET_MIGRATION_TREND: &str = "net_migration_trend";

/// Metrics that get a `_prev` column
pub const PREV_METRICS: [(&str, DataType); 6] = [
    (VALUE_GROUPED, DataType::Int64),
    (VALUE_TOTAL, DataType::Int64),
    (PERCENTAGE, DataType::Float64),
    (INFLOW, DataType::Int64),
    (OUTFLOW, DataType::Int64),
    (NET_MIGRATION, DataType::Int64),
];

/// Name of the previous-year column of a metric
#[must_use]
pub fn prev_column(metric: &str) -> String {
    format!("{metric}_prev")
}

/// Fields of the canonical table in column order
#[must_use]
pub fn fields() -> Vec<FieldRef> {
    let mut fields = vec![
        Field::new(MUNICIPALITY, DataType::Utf8, false),
        Field::new(YEAR, DataType::Int32, false),
        Field::new(AGE_GROUP, DataType::Utf8, false),
        Field::new(SUB_REGION, DataType::Utf8, false),
        Field::new(COUNTRY, DataType::Utf8, false),
        Field::new(GEOMETRY, DataType::Utf8, false),
        Field::new(LAT, DataType::Float64, false),
        Field::new(LON, DataType::Float64, false),
    ];
    fields.extend(
        PREV_METRICS
            .iter()
            .map(|(name, data_type)| Field::new(*name, data_type.clone(), true)),
    );
    fields.extend(
        PREV_METRICS
            .iter()
            .map(|(name, data_type)| Field::new(prev_column(name), data_type.clone(), true)),
    );
    fields.extend([
        Field::new(VALUE_GROUPED_CHANGE, DataType::Int64, true),
        Field::new(VALUE_GROUPED_CHANGE_PCT, DataType::Float64, true),
        Field::new(NET_MIGRATION_CHANGE, DataType::Int64, true),
        Field::new(NET_MIGRATION_PER_1000, DataType::Float64, true),
        Field::new(NET_MIGRATION_TREND, DataType::Utf8, true),
    ]);
    fields.into_iter().map(Arc::new).collect()
}

/// Arrow schema of the canonical table
#[must_use]
pub fn schema() -> Schema {
    Schema::new(fields())
}

/// Check that a table read back from disk has the canonical columns and types
pub fn check_schema(found: &Schema) -> Result<()> {
    let expected = schema();
    if found.fields().len() != expected.fields().len() {
        return Err(PipelineError::source_format(
            "canonical table",
            format!(
                "expected {} columns, found {}",
                expected.fields().len(),
                found.fields().len()
            ),
        ));
    }
    for (expected, found) in expected.fields().iter().zip(found.fields().iter()) {
        if expected.name() != found.name() || expected.data_type() != found.data_type() {
            return Err(PipelineError::source_format(
                "canonical table",
                format!(
                    "expected column {} ({}), found {} ({})",
                    expected.name(),
                    expected.data_type(),
                    found.name(),
                    found.data_type()
                ),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order() {
        let fields = fields();
        let names: Vec<&str> = fields.iter().map(|field| field.name().as_str()).collect();

        assert_eq!(names.len(), 25);
        assert_eq!(&names[..3], &[MUNICIPALITY, YEAR, AGE_GROUP]);
        assert_eq!(names[14], "value_grouped_prev");
        assert_eq!(names[24], NET_MIGRATION_TREND);
        assert!(!fields[0].is_nullable());
        assert!(fields[8].is_nullable());
    }

    #[test]
    fn test_check_schema_rejects_reordered_columns() {
        let mut reordered = fields();
        reordered.swap(0, 1);
        assert!(check_schema(&Schema::new(reordered)).is_err());
        assert!(check_schema(&schema()).is_ok());
    }
}
