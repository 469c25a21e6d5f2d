//! Row selection and grouping for one subplot.

use serde::Serialize;

use crate::aggregate::{aggregate, DataToPlot, XValue};
use crate::data::filter::{filtered_indices, unique_in_order, RowFilter};
use crate::data::{ConditionTable, DataTable, Record, TableKind};
use crate::error::{VisError, VisResult};
use crate::spec::{PlotTypeData, SubplotDescriptor, XAxis};

/// The rows of one dataset of a subplot, aggregated per x value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSeries {
    /// `None` when the subplot does not restrict datasets.
    pub dataset_id: Option<String>,
    pub legend_entry: String,
    pub measurements: Option<Vec<DataToPlot>>,
    pub simulations: Option<Vec<DataToPlot>>,
}

/// Everything selected for one subplot.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `yValues`, or the single observable found in the data when they are
    /// not given.
    pub observables: Vec<String>,
    pub measurements: Option<Vec<DataToPlot>>,
    pub simulations: Option<Vec<DataToPlot>>,
    pub series: Vec<DataSeries>,
}

/// Read-only view over the loaded tables.
#[derive(Debug, Clone)]
pub struct DataProvider {
    measurements: Option<DataTable>,
    simulations: Option<DataTable>,
    conditions: Option<ConditionTable>,
}

impl DataProvider {
    /// At least one of the two data tables is required.
    pub fn new(measurements: Option<DataTable>, simulations: Option<DataTable>) -> VisResult<Self> {
        if measurements.is_none() && simulations.is_none() {
            return Err(VisError::Argument(
                "Not enough arguments. Either measurements or simulations should be provided."
                    .to_string(),
            ));
        }
        Ok(Self {
            measurements,
            simulations,
            conditions: None,
        })
    }

    pub fn with_conditions(mut self, conditions: ConditionTable) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Present data tables, measurements first.
    pub fn tables(&self) -> Vec<&DataTable> {
        self.measurements
            .iter()
            .chain(self.simulations.iter())
            .collect()
    }

    /// Select and aggregate the data of one subplot, pooled over its
    /// datasets and per dataset.
    pub fn select_by_vis_spec(&self, descriptor: &SubplotDescriptor) -> VisResult<Selection> {
        let measurements = self
            .measurements
            .as_ref()
            .map(|t| self.select_side(t, descriptor, &descriptor.dataset_id))
            .transpose()?;
        let simulations = self
            .simulations
            .as_ref()
            .map(|t| self.select_side(t, descriptor, &descriptor.dataset_id))
            .transpose()?;

        let observables = if descriptor.y_values.is_empty() {
            self.tables()
                .into_iter()
                .flat_map(|t| matching_rows(t, descriptor, &descriptor.dataset_id, &[]))
                .map(|r| r.observable_id.clone())
                .take(1)
                .collect()
        } else {
            descriptor.y_values.clone()
        };

        let series = if descriptor.dataset_id.is_empty() {
            vec![DataSeries {
                dataset_id: None,
                legend_entry: descriptor.plot_name.clone(),
                measurements: measurements.clone(),
                simulations: simulations.clone(),
            }]
        } else {
            descriptor
                .dataset_id
                .iter()
                .map(|dataset_id| self.select_series(descriptor, dataset_id))
                .collect::<VisResult<Vec<_>>>()?
        };

        log::debug!(
            "plot {}: {} measurement points, {} simulation points, {} series",
            descriptor.plot_id,
            measurements.as_ref().map_or(0, Vec::len),
            simulations.as_ref().map_or(0, Vec::len),
            series.len()
        );

        Ok(Selection {
            observables,
            measurements,
            simulations,
            series,
        })
    }

    fn select_series(
        &self,
        descriptor: &SubplotDescriptor,
        dataset_id: &str,
    ) -> VisResult<DataSeries> {
        let ids = [dataset_id.to_string()];
        Ok(DataSeries {
            dataset_id: Some(dataset_id.to_string()),
            legend_entry: descriptor.legend_for(dataset_id).to_string(),
            measurements: self
                .measurements
                .as_ref()
                .map(|t| self.select_side(t, descriptor, &ids))
                .transpose()?,
            simulations: self
                .simulations
                .as_ref()
                .map(|t| self.select_side(t, descriptor, &ids))
                .transpose()?,
        })
    }

    /// Mask, partition by x value in first-appearance order, aggregate.
    fn select_side(
        &self,
        table: &DataTable,
        descriptor: &SubplotDescriptor,
        dataset_ids: &[String],
    ) -> VisResult<Vec<DataToPlot>> {
        let rows = matching_rows(table, descriptor, dataset_ids, &descriptor.y_values);

        if descriptor.y_values.is_empty() {
            let candidates = unique_in_order(rows.iter().map(|r| r.observable_id.clone()));
            if candidates.len() > 1 {
                return Err(VisError::Ambiguity {
                    plot_id: descriptor.plot_id.clone(),
                    candidates,
                });
            }
        }

        // simulations carry no noise; they are always summarized plainly
        let plot_type_data = match table.kind {
            TableKind::Measurement => descriptor.plot_type_data,
            TableKind::Simulation => PlotTypeData::MeanAndSd,
        };

        let x_values = unique_in_order(rows.iter().map(|r| x_value_of(r, &descriptor.x_values)));
        x_values
            .into_iter()
            .map(|x| {
                let group: Vec<&Record> = rows
                    .iter()
                    .copied()
                    .filter(|r| x_value_of(r, &descriptor.x_values) == x)
                    .collect();
                let mut data = aggregate(&descriptor.plot_id, x, &group, plot_type_data)?;
                data.condition_value = self.condition_value(&descriptor.x_values, &data.x_value);
                Ok(data)
            })
            .collect()
    }

    fn condition_value(&self, axis: &XAxis, x: &XValue) -> Option<f64> {
        match (axis, x, &self.conditions) {
            (XAxis::Condition(column), XValue::Condition(id), Some(conditions)) => {
                conditions.numeric_value(id, column)
            }
            _ => None,
        }
    }
}

/// Rows of `table` in the given datasets and observables, within the
/// descriptor's condition restriction.
fn matching_rows<'a>(
    table: &'a DataTable,
    descriptor: &SubplotDescriptor,
    dataset_ids: &[String],
    observable_ids: &[String],
) -> Vec<&'a Record> {
    let filter =
        RowFilter::new(dataset_ids, observable_ids).with_conditions(&descriptor.condition_ids);
    filtered_indices(table, &filter)
        .into_iter()
        .map(|i| &table.rows[i])
        .collect()
}

fn x_value_of(row: &Record, axis: &XAxis) -> XValue {
    match axis {
        XAxis::Time => XValue::Time(row.time),
        XAxis::Condition(_) => XValue::Condition(row.simulation_condition_id.clone()),
    }
}
