//! Column layouts of the CSV inputs.
//!
//! Each input is described by the columns the pipeline actually uses. Files may
//! carry any number of extra columns; only the listed ones are projected.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

/// Raw provider/clinic identifier in source exports and the identity table key
pub const SOURCE_IDENTIFIER: &str = "NAME";
/// Raw metric code in source exports
pub const SOURCE_METRIC: &str = "Metricname";
/// Numerator column in source exports
pub const SOURCE_NUMERATOR: &str = "SeenNum";
/// Denominator column in source exports
pub const SOURCE_DENOMINATOR: &str = "SeenDenom";

/// Identity table key column
pub const NAMES_KEY: &str = "MeridiosName";
/// Identity table canonical name column
pub const NAMES_NAME: &str = "Name";
/// Identity table entity type column
pub const NAMES_TYPE: &str = "Type";
/// Identity table owning clinic column
pub const NAMES_CLINIC: &str = "Clinic";

/// Metric table key column
pub const METRICS_KEY: &str = "MeridiosMetric";
/// Metric table canonical name column
pub const METRICS_NAME: &str = "Metric";
/// Metric table target column
pub const METRICS_TARGET: &str = "Target";
/// Metric table headline flag column
pub const METRICS_MAIN: &str = "Main";

/// A column the pipeline reads from a CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Header name
    pub name: &'static str,
    /// Arrow type the column is decoded as
    pub kind: ColumnKind,
}

/// Decoding of a projected column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Kept verbatim, including numeric-looking codes
    Text,
    /// Parsed as a 64-bit float; empty cells become null
    Number,
}

impl ColumnSpec {
    const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }

    const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Number,
        }
    }

    /// Arrow data type for this column
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self.kind {
            ColumnKind::Text => DataType::Utf8,
            ColumnKind::Number => DataType::Float64,
        }
    }
}

/// Columns read from each dated source export
///
/// Counts are read as text and parsed per row, so one bad cell drops one row
/// instead of failing the file.
pub const SOURCE_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::text(SOURCE_IDENTIFIER),
    ColumnSpec::text(SOURCE_METRIC),
    ColumnSpec::text(SOURCE_NUMERATOR),
    ColumnSpec::text(SOURCE_DENOMINATOR),
];

/// Columns read from the identity table
pub const NAMES_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::text(NAMES_KEY),
    ColumnSpec::text(NAMES_NAME),
    ColumnSpec::text(NAMES_TYPE),
    ColumnSpec::text(NAMES_CLINIC),
];

/// Columns read from the metric table
pub const METRICS_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec::text(METRICS_KEY),
    ColumnSpec::text(METRICS_NAME),
    ColumnSpec::number(METRICS_TARGET),
    ColumnSpec::text(METRICS_MAIN),
];

/// Normalize a header cell: trims whitespace and a leading byte order mark
#[must_use]
pub fn clean_header(name: &str) -> &str {
    name.trim_start_matches('\u{feff}').trim()
}

/// Build the decoding schema for a file given its header row
///
/// Every header column becomes a field so that rows line up positionally;
/// wanted columns get their declared type, all others are read as text.
/// Returns the schema and the projection indices of `wanted`, in order.
///
/// # Errors
/// Returns the name of the first wanted column absent from the header.
pub fn decoding_schema(
    header: &[String],
    wanted: &[ColumnSpec],
) -> std::result::Result<(SchemaRef, Vec<usize>), &'static str> {
    let fields: Vec<Field> = header
        .iter()
        .map(|raw| {
            let name = clean_header(raw);
            let data_type = wanted
                .iter()
                .find(|spec| spec.name == name)
                .map_or(DataType::Utf8, ColumnSpec::data_type);
            Field::new(name, data_type, true)
        })
        .collect();

    let projection = wanted
        .iter()
        .map(|spec| {
            fields
                .iter()
                .position(|f| f.name() == spec.name)
                .ok_or(spec.name)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((Arc::new(Schema::new(fields)), projection))
}
