use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use super::model::{CellValue, ConditionTable, DataTable, Record, TableKind};
use crate::error::{ValidationError, VisResult};

pub const OBSERVABLE_ID: &str = "observableId";
pub const SIMULATION_CONDITION_ID: &str = "simulationConditionId";
pub const PREEQUILIBRATION_CONDITION_ID: &str = "preequilibrationConditionId";
pub const TIME: &str = "time";
pub const NOISE_PARAMETERS: &str = "noiseParameters";
pub const DATASET_ID: &str = "datasetId";
pub const CONDITION_ID: &str = "conditionId";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a measurement table from a TSV file.
pub fn load_measurements(path: &Path) -> VisResult<DataTable> {
    read_data_table(File::open(path)?, TableKind::Measurement)
}

/// Load a simulation table from a TSV file.
pub fn load_simulations(path: &Path) -> VisResult<DataTable> {
    read_data_table(File::open(path)?, TableKind::Simulation)
}

/// Load a condition table from a TSV file.
pub fn load_conditions(path: &Path) -> VisResult<ConditionTable> {
    read_condition_table(File::open(path)?)
}

/// Build a tab-separated reader with a header row.
pub(crate) fn tsv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

// ---------------------------------------------------------------------------
// Column lookup helpers
// ---------------------------------------------------------------------------

/// Header names of a table plus the table's name for error messages.
pub(crate) struct Columns {
    table: String,
    names: Vec<String>,
}

impl Columns {
    pub(crate) fn new(table: &str, headers: &StringRecord) -> Self {
        Self {
            table: table.to_string(),
            names: headers.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub(crate) fn optional(&self, column: &str) -> Option<usize> {
        self.names.iter().position(|h| h == column)
    }

    pub(crate) fn required(&self, column: &str) -> Result<usize, ValidationError> {
        self.optional(column)
            .ok_or_else(|| ValidationError::MissingColumn {
                table: self.table.clone(),
                column: column.to_string(),
            })
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }
}

/// Non-empty cell content at `idx`, if the column exists.
pub(crate) fn cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub(crate) fn line_of(record: &StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

fn required_cell(
    record: &StringRecord,
    columns: &Columns,
    idx: usize,
) -> Result<String, ValidationError> {
    cell(record, Some(idx))
        .map(str::to_string)
        .ok_or_else(|| ValidationError::EmptyCell {
            table: columns.table().to_string(),
            line: line_of(record),
            column: columns.names()[idx].clone(),
        })
}

pub(crate) fn parse_number(
    record: &StringRecord,
    columns: &Columns,
    idx: usize,
    raw: &str,
) -> Result<f64, ValidationError> {
    raw.parse::<f64>().map_err(|_| ValidationError::InvalidNumber {
        table: columns.table().to_string(),
        line: line_of(record),
        column: columns.names()[idx].clone(),
        value: raw.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Measurement / simulation tables
// ---------------------------------------------------------------------------

/// Read a measurement or simulation table.
///
/// Required columns: `observableId`, `simulationConditionId`, `time` and the
/// value column (`measurement` or `simulation`). An empty value cell is read
/// as NaN; everything else must parse.
pub fn read_data_table<R: Read>(rdr: R, kind: TableKind) -> VisResult<DataTable> {
    let mut reader = tsv_reader(rdr);
    let columns = Columns::new(kind.value_column(), reader.headers()?);

    let obs_idx = columns.required(OBSERVABLE_ID)?;
    let cond_idx = columns.required(SIMULATION_CONDITION_ID)?;
    let time_idx = columns.required(TIME)?;
    let value_idx = columns.required(kind.value_column())?;
    let preeq_idx = columns.optional(PREEQUILIBRATION_CONDITION_ID);
    let noise_idx = columns.optional(NOISE_PARAMETERS);
    let dataset_idx = columns.optional(DATASET_ID);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let time_raw = required_cell(&record, &columns, time_idx)?;
        let time = parse_number(&record, &columns, time_idx, &time_raw)?;
        let value = match cell(&record, Some(value_idx)) {
            Some(raw) => parse_number(&record, &columns, value_idx, raw)?,
            None => f64::NAN,
        };

        rows.push(Record {
            observable_id: required_cell(&record, &columns, obs_idx)?,
            simulation_condition_id: required_cell(&record, &columns, cond_idx)?,
            preequilibration_condition_id: cell(&record, preeq_idx).map(str::to_string),
            time,
            value,
            noise_parameters: cell(&record, noise_idx).map(CellValue::parse),
            dataset_id: cell(&record, dataset_idx).map(str::to_string),
        });
    }

    log::debug!("read {} {} rows", rows.len(), kind);
    Ok(DataTable::new(kind, rows))
}

// ---------------------------------------------------------------------------
// Condition table
// ---------------------------------------------------------------------------

/// Read a condition table: a `conditionId` column plus parameter columns.
pub fn read_condition_table<R: Read>(rdr: R) -> VisResult<ConditionTable> {
    let mut reader = tsv_reader(rdr);
    let columns = Columns::new("condition", reader.headers()?);
    let id_idx = columns.required(CONDITION_ID)?;

    let column_names: Vec<String> = columns
        .names()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != id_idx)
        .map(|(_, name)| name.clone())
        .collect();

    let mut conditions = BTreeMap::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let condition_id = required_cell(&record, &columns, id_idx)?;

        let mut values = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if col_idx == id_idx {
                continue;
            }
            if let Some(name) = columns.names().get(col_idx) {
                values.insert(name.clone(), CellValue::parse(value));
            }
        }
        conditions.insert(condition_id, values);
    }

    Ok(ConditionTable {
        column_names,
        conditions,
    })
}
