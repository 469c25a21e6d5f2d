//! Visualization table TSV reading and writing.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::data::loader::{cell, line_of, tsv_reader, Columns};
use crate::error::{ValidationError, VisResult};

use super::types::*;

/// Load a visualization table from a TSV file.
pub fn load_vis_spec(path: &Path) -> VisResult<VisSpecTable> {
    read_vis_spec(File::open(path)?)
}

/// Read a visualization table. Only `plotId` is mandatory; unknown columns
/// are ignored.
pub fn read_vis_spec<R: Read>(rdr: R) -> VisResult<VisSpecTable> {
    let mut reader = tsv_reader(rdr);
    let columns = Columns::new("visualization", reader.headers()?);
    let plot_idx = columns.required(PLOT_ID)?;

    for name in columns.names() {
        if !VISUALIZATION_COLUMNS.contains(&name.as_str()) {
            log::debug!("ignoring unknown visualization column '{name}'");
        }
    }
    let known: Vec<(&str, Option<usize>)> = VISUALIZATION_COLUMNS
        .iter()
        .filter(|c| **c != PLOT_ID)
        .map(|c| (*c, columns.optional(c)))
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let plot_id = cell(&record, Some(plot_idx)).ok_or_else(|| ValidationError::EmptyCell {
            table: columns.table().to_string(),
            line: line_of(&record),
            column: PLOT_ID.to_string(),
        })?;

        let mut row = RawSpecRow::new(plot_id);
        for (column, idx) in &known {
            if let Some(slot) = row.slot_mut(column) {
                *slot = cell(&record, *idx).map(str::to_string);
            }
        }
        rows.push(row);
    }

    Ok(VisSpecTable::new(rows))
}

/// Canonical tabular form of resolved descriptors: one row per
/// `(plotId, datasetId)` pair with every subplot-level column spelled out.
/// A subplot naming several observables repeats its dataset rows once per
/// observable.
pub fn to_table(subplots: &[SubplotDescriptor]) -> VisSpecTable {
    let mut rows = Vec::new();
    for d in subplots {
        let base = RawSpecRow {
            plot_id: d.plot_id.clone(),
            plot_name: Some(d.plot_name.clone()),
            plot_type_simulation: Some(d.plot_type_simulation.to_string()),
            plot_type_data: Some(d.plot_type_data.to_string()),
            dataset_id: None,
            x_values: Some(d.x_values.to_string()),
            x_offset: Some(d.x_offset.to_string()),
            x_label: Some(d.x_label.clone()),
            x_scale: Some(d.x_scale.to_string()),
            y_values: None,
            y_offset: Some(d.y_offset.to_string()),
            y_label: Some(d.y_label.clone()),
            y_scale: Some(d.y_scale.to_string()),
            legend_entry: None,
        };

        let observables: Vec<Option<&String>> = if d.y_values.is_empty() {
            vec![None]
        } else {
            d.y_values.iter().map(Some).collect()
        };
        let datasets: Vec<Option<&String>> = if d.dataset_id.is_empty() {
            vec![None]
        } else {
            d.dataset_id.iter().map(Some).collect()
        };

        for observable in &observables {
            for dataset in &datasets {
                rows.push(RawSpecRow {
                    dataset_id: dataset.cloned(),
                    legend_entry: dataset.map(|ds| d.legend_for(ds).to_string()),
                    y_values: observable.cloned(),
                    ..base.clone()
                });
            }
        }
    }
    VisSpecTable::new(rows)
}

/// Write a visualization table as TSV with the canonical column order.
pub fn write_vis_spec<W: Write>(table: &VisSpecTable, writer: W) -> VisResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);
    wtr.write_record(VISUALIZATION_COLUMNS)?;
    for row in &table.rows {
        wtr.write_record(VISUALIZATION_COLUMNS.iter().map(|c| row.get(c).unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write resolved descriptors to a TSV file.
pub fn save_vis_spec(path: &Path, subplots: &[SubplotDescriptor]) -> VisResult<()> {
    write_vis_spec(&to_table(subplots), File::create(path)?)
}
