//! Collapse the raw rows of one plot id into a single, fully defaulted
//! [`SubplotDescriptor`].

use std::fmt;

use serde::Serialize;

use crate::data::filter::unique_in_order;
use crate::error::ValidationError;

use super::types::*;

/// Columns that must be uniform across all rows of one plot id.
pub const SUBPLOT_LEVEL_COLUMNS: [&str; 10] = [
    PLOT_NAME,
    PLOT_TYPE_SIMULATION,
    PLOT_TYPE_DATA,
    X_VALUES,
    X_OFFSET,
    X_LABEL,
    X_SCALE,
    Y_OFFSET,
    Y_LABEL,
    Y_SCALE,
];

/// A non-fatal inconsistency in a visualization table: several rows of one
/// plot id disagree on a subplot-level column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecWarning {
    pub plot_id: String,
    pub column: String,
    pub values: Vec<String>,
    pub chosen: String,
}

impl fmt::Display for SpecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "For {PLOT_ID} {} in column {} contradictory settings ({}). Proceeding with first entry ({}).",
            self.plot_id,
            self.column,
            self.values.join(", "),
            self.chosen
        )
    }
}

// ---------------------------------------------------------------------------
// SubplotSettings – validated, possibly incomplete settings
// ---------------------------------------------------------------------------

/// Validated settings of one subplot. `None` / empty means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubplotSettings {
    pub plot_name: Option<String>,
    pub figure_id: Option<String>,
    pub plot_type_simulation: Option<PlotTypeSimulation>,
    pub plot_type_data: Option<PlotTypeData>,
    pub x_values: Option<XAxis>,
    pub x_offset: Option<f64>,
    pub x_label: Option<String>,
    pub x_scale: Option<Scale>,
    pub y_values: Vec<String>,
    pub y_label: Option<String>,
    pub y_offset: Option<f64>,
    pub y_scale: Option<Scale>,
    /// Parallel to `dataset_id`.
    pub legend_entry: Vec<Option<String>>,
    pub dataset_id: Vec<String>,
    pub condition_ids: Vec<String>,
}

impl SubplotSettings {
    /// Fill every unspecified field with its default.
    pub fn resolve(self, plot_id: &str) -> SubplotDescriptor {
        let x_values = self.x_values.unwrap_or_default();
        let x_label = self
            .x_label
            .unwrap_or_else(|| x_values.as_str().to_string());
        let legend_entry = self
            .dataset_id
            .iter()
            .enumerate()
            .map(|(i, ds)| {
                self.legend_entry
                    .get(i)
                    .cloned()
                    .flatten()
                    .unwrap_or_else(|| ds.clone())
            })
            .collect();

        SubplotDescriptor {
            plot_id: plot_id.to_string(),
            plot_name: self.plot_name.unwrap_or_else(|| plot_id.to_string()),
            figure_id: self
                .figure_id
                .unwrap_or_else(|| DEFAULT_FIGURE_ID.to_string()),
            plot_type_simulation: self.plot_type_simulation.unwrap_or_default(),
            plot_type_data: self.plot_type_data.unwrap_or_default(),
            x_values,
            x_offset: self.x_offset.unwrap_or(0.0),
            x_label,
            x_scale: self.x_scale.unwrap_or_default(),
            y_values: self.y_values,
            y_label: self
                .y_label
                .unwrap_or_else(|| DEFAULT_Y_LABEL.to_string()),
            y_offset: self.y_offset.unwrap_or(0.0),
            y_scale: self.y_scale.unwrap_or_default(),
            legend_entry,
            dataset_id: self.dataset_id,
            condition_ids: self.condition_ids,
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Resolve all raw rows sharing `plot_id` into one descriptor.
///
/// Conflicting subplot-level values are reported through `warnings` (and the
/// log); the first value wins. Invalid enumerated or numeric values fail.
pub fn normalize(
    plot_id: &str,
    rows: &[&RawSpecRow],
    warnings: &mut Vec<SpecWarning>,
) -> Result<SubplotDescriptor, ValidationError> {
    Ok(collect_settings(plot_id, rows, warnings)?.resolve(plot_id))
}

/// Collapse and validate the rows of one plot id without applying defaults.
pub fn collect_settings(
    plot_id: &str,
    rows: &[&RawSpecRow],
    warnings: &mut Vec<SpecWarning>,
) -> Result<SubplotSettings, ValidationError> {
    let mut settings = SubplotSettings::default();

    for column in SUBPLOT_LEVEL_COLUMNS {
        let values: Vec<&str> = unique_in_order(rows.iter().filter_map(|r| r.get(column)));
        let Some(first) = values.first().copied() else {
            continue;
        };

        // every distinct value must be valid, not only the chosen one
        for value in &values {
            validate(column, value)?;
        }

        if values.len() > 1 {
            let warning = SpecWarning {
                plot_id: plot_id.to_string(),
                column: column.to_string(),
                values: values.iter().map(|v| v.to_string()).collect(),
                chosen: first.to_string(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }

        match column {
            PLOT_NAME => settings.plot_name = Some(first.to_string()),
            PLOT_TYPE_SIMULATION => {
                settings.plot_type_simulation = Some(PlotTypeSimulation::parse(column, first)?)
            }
            PLOT_TYPE_DATA => settings.plot_type_data = Some(PlotTypeData::parse(column, first)?),
            X_VALUES => settings.x_values = Some(XAxis::parse(first)),
            X_OFFSET => settings.x_offset = Some(parse_offset(column, first)?),
            X_LABEL => settings.x_label = Some(first.to_string()),
            X_SCALE => settings.x_scale = Some(Scale::parse(column, first)?),
            Y_OFFSET => settings.y_offset = Some(parse_offset(column, first)?),
            Y_LABEL => settings.y_label = Some(first.to_string()),
            Y_SCALE => settings.y_scale = Some(Scale::parse(column, first)?),
            _ => {}
        }
    }

    // row-level columns: one entry per distinct value, first seen wins
    for row in rows {
        if let Some(observable) = row.y_values.as_deref() {
            if !settings.y_values.iter().any(|y| y == observable) {
                settings.y_values.push(observable.to_string());
            }
        }
        if let Some(dataset) = row.dataset_id.as_deref() {
            match settings.dataset_id.iter().position(|d| d == dataset) {
                Some(i) => {
                    if settings.legend_entry[i].is_none() {
                        settings.legend_entry[i] = row.legend_entry.clone();
                    }
                }
                None => {
                    settings.dataset_id.push(dataset.to_string());
                    settings.legend_entry.push(row.legend_entry.clone());
                }
            }
        }
    }

    Ok(settings)
}

fn validate(column: &str, value: &str) -> Result<(), ValidationError> {
    match column {
        PLOT_TYPE_SIMULATION => PlotTypeSimulation::parse(column, value).map(|_| ()),
        PLOT_TYPE_DATA => PlotTypeData::parse(column, value).map(|_| ()),
        X_SCALE | Y_SCALE => Scale::parse(column, value).map(|_| ()),
        X_OFFSET | Y_OFFSET => parse_offset(column, value).map(|_| ()),
        _ => Ok(()),
    }
}

fn parse_offset(column: &str, value: &str) -> Result<f64, ValidationError> {
    value.parse::<f64>().map_err(|_| ValidationError::NotNumeric {
        field: column.to_string(),
        value: value.to_string(),
    })
}
