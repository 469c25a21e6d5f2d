//! Replicate statistics for one group of rows.

use std::fmt;

use serde::Serialize;

use crate::data::filter::unique_in_order;
use crate::data::{CellValue, Record};
use crate::error::{VisError, VisResult};
use crate::spec::PlotTypeData;

// ---------------------------------------------------------------------------
// XValue – one point on the independent axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Time(f64),
    Condition(String),
}

/// Bit pattern of a time point; `-0` and `0` are the same point.
fn time_bits(t: f64) -> u64 {
    if t == 0.0 {
        0.0f64.to_bits()
    } else {
        t.to_bits()
    }
}

impl PartialEq for XValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (XValue::Time(a), XValue::Time(b)) => time_bits(*a) == time_bits(*b),
            (XValue::Condition(a), XValue::Condition(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for XValue {}

impl std::hash::Hash for XValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            XValue::Time(t) => time_bits(*t).hash(state),
            XValue::Condition(c) => c.hash(state),
        }
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Time(t) => write!(f, "{t}"),
            XValue::Condition(c) => write!(f, "{c}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DataToPlot – aggregated record for one x value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataToPlot {
    pub x_value: XValue,
    /// Numeric value of the x axis condition column, when a condition table
    /// provides one.
    pub condition_value: Option<f64>,
    pub mean: f64,
    pub sd: f64,
    pub sem: f64,
    pub replicate: Vec<f64>,
    /// Externally provided noise (`provided` mode only).
    pub noise: Option<f64>,
}

impl DataToPlot {
    /// Spread to draw as error bar for the given data plot type.
    pub fn error_bar(&self, plot_type_data: PlotTypeData) -> Option<f64> {
        match plot_type_data {
            PlotTypeData::MeanAndSd => Some(self.sd),
            PlotTypeData::MeanAndSem => Some(self.sem),
            PlotTypeData::Provided => self.noise,
            PlotTypeData::Replicate => None,
        }
    }
}

/// Mean, population standard deviation and standard error of `values`.
/// An empty group yields NaN statistics.
pub fn summarize(x_value: XValue, values: Vec<f64>) -> DataToPlot {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sd = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let sem = sd / n.sqrt();

    DataToPlot {
        x_value,
        condition_value: None,
        mean,
        sd,
        sem,
        replicate: values,
        noise: None,
    }
}

/// Aggregate the rows of one group.
///
/// With `provided` noise every row must carry the same numeric
/// `noiseParameters` value, which becomes the record's `noise`.
pub fn aggregate(
    plot_id: &str,
    x_value: XValue,
    rows: &[&Record],
    plot_type_data: PlotTypeData,
) -> VisResult<DataToPlot> {
    let noise = if plot_type_data == PlotTypeData::Provided && !rows.is_empty() {
        Some(provided_noise(plot_id, &x_value, rows)?)
    } else {
        None
    };

    let mut data = summarize(x_value, rows.iter().map(|r| r.value).collect());
    data.noise = noise;
    Ok(data)
}

fn provided_noise(plot_id: &str, x_value: &XValue, rows: &[&Record]) -> VisResult<f64> {
    let distinct = unique_in_order(
        rows.iter()
            .map(|r| r.noise_parameters.as_ref().map(numeric_noise)),
    );

    if distinct.len() > 1 {
        return Err(VisError::InconsistentNoise {
            plot_id: plot_id.to_string(),
            x_value: x_value.to_string(),
            values: distinct
                .iter()
                .map(|v| match v {
                    Some(cell) => cell.to_string(),
                    None => "<empty>".to_string(),
                })
                .collect(),
        });
    }

    let unsupported = |reason: &str| VisError::UnsupportedMode {
        plot_id: plot_id.to_string(),
        x_value: x_value.to_string(),
        reason: reason.to_string(),
    };
    match distinct.into_iter().next().flatten() {
        Some(cell) => cell.as_f64().ok_or_else(|| {
            unsupported(&format!(
                "no numerical noise values provided in the measurement table (got '{cell}')"
            ))
        }),
        None => Err(unsupported(
            "plotTypeData 'provided' requires a noiseParameters column",
        )),
    }
}

/// Numeric noise cells compare by value, so `1` and `1.0` are one value.
/// Symbolic cells are kept as they are.
fn numeric_noise(cell: &CellValue) -> CellValue {
    match cell.as_f64() {
        Some(v) if v == 0.0 => CellValue::Float(0.0),
        Some(v) => CellValue::Float(v),
        None => cell.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: f64, noise: Option<CellValue>) -> Record {
        Record {
            observable_id: "obs".into(),
            simulation_condition_id: "c1".into(),
            preequilibration_condition_id: None,
            time: 1.0,
            value,
            noise_parameters: noise,
            dataset_id: None,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn population_statistics_of_three_replicates() {
        let d = summarize(XValue::Time(0.0), vec![1.0, 2.0, 3.0]);
        assert!(approx(d.mean, 2.0));
        assert!(approx(d.sd, (2.0f64 / 3.0).sqrt()));
        assert!(approx(d.sd, 0.816496580927726));
        assert!(approx(d.sem, d.sd / 3f64.sqrt()));
        assert!(approx(d.sem, 0.4714045207910317));
        assert_eq!(d.replicate, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_group_is_nan_not_error() {
        let d = aggregate("p", XValue::Time(5.0), &[], PlotTypeData::Provided).unwrap();
        assert!(d.mean.is_nan());
        assert!(d.sd.is_nan());
        assert!(d.sem.is_nan());
        assert!(d.replicate.is_empty());
        assert_eq!(d.noise, None);
    }

    #[test]
    fn replicate_order_is_kept() {
        let rows = [rec(3.0, None), rec(1.0, None), rec(2.0, None)];
        let refs: Vec<&Record> = rows.iter().collect();
        let d = aggregate("p", XValue::Time(1.0), &refs, PlotTypeData::Replicate).unwrap();
        assert_eq!(d.replicate, vec![3.0, 1.0, 2.0]);
        assert_eq!(d.error_bar(PlotTypeData::Replicate), None);
    }

    #[test]
    fn provided_noise_replaces_sd_as_error_bar() {
        let rows = [
            rec(1.0, Some(CellValue::Float(0.2))),
            rec(2.0, Some(CellValue::Float(0.2))),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let d = aggregate("p", XValue::Time(1.0), &refs, PlotTypeData::Provided).unwrap();
        assert_eq!(d.noise, Some(0.2));
        assert_eq!(d.error_bar(PlotTypeData::Provided), Some(0.2));
        assert_eq!(d.error_bar(PlotTypeData::MeanAndSd), Some(d.sd));
        assert_eq!(d.error_bar(PlotTypeData::MeanAndSem), Some(d.sem));
    }

    #[test]
    fn inconsistent_noise_names_the_values() {
        let rows = [
            rec(1.0, Some(CellValue::Float(0.2))),
            rec(2.0, Some(CellValue::Integer(1))),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let err = aggregate("p", XValue::Time(1.0), &refs, PlotTypeData::Provided).unwrap_err();
        match err {
            VisError::InconsistentNoise { values, .. } => assert_eq!(values, vec!["0.2", "1"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn integer_and_float_noise_of_equal_value_agree() {
        let rows = [
            rec(1.0, Some(CellValue::Integer(1))),
            rec(2.0, Some(CellValue::Float(1.0))),
        ];
        let refs: Vec<&Record> = rows.iter().collect();
        let d = aggregate("p", XValue::Time(1.0), &refs, PlotTypeData::Provided).unwrap();
        assert_eq!(d.noise, Some(1.0));
    }

    #[test]
    fn signed_zero_times_are_one_x_value() {
        assert_eq!(XValue::Time(-0.0), XValue::Time(0.0));
        assert_eq!(unique_in_order([XValue::Time(0.0), XValue::Time(-0.0)]).len(), 1);
        assert_ne!(XValue::Time(1.0), XValue::Condition("1".into()));
    }

    #[test]
    fn symbolic_noise_is_unsupported() {
        let rows = [rec(1.0, Some(CellValue::String("sd_obs".into())))];
        let refs: Vec<&Record> = rows.iter().collect();
        let err = aggregate("p", XValue::Time(1.0), &refs, PlotTypeData::Provided).unwrap_err();
        assert!(matches!(err, VisError::UnsupportedMode { .. }), "{err}");

        let rows = [rec(1.0, None)];
        let refs: Vec<&Record> = rows.iter().collect();
        let err = aggregate("p", XValue::Time(1.0), &refs, PlotTypeData::Provided).unwrap_err();
        assert!(matches!(err, VisError::UnsupportedMode { .. }), "{err}");
    }

    #[test]
    fn noise_column_is_ignored_outside_provided_mode() {
        let rows = [rec(1.0, Some(CellValue::String("sd_obs".into())))];
        let refs: Vec<&Record> = rows.iter().collect();
        let d = aggregate("p", XValue::Time(1.0), &refs, PlotTypeData::MeanAndSd).unwrap();
        assert_eq!(d.noise, None);
        assert_eq!(d.sd, 0.0);
    }
}
