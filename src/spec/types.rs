//! Visualization spec vocabulary: enumerated column values, the raw table row
//! and the resolved per-subplot descriptor.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

pub const PLOT_ID: &str = "plotId";
pub const PLOT_NAME: &str = "plotName";
pub const PLOT_TYPE_SIMULATION: &str = "plotTypeSimulation";
pub const PLOT_TYPE_DATA: &str = "plotTypeData";
pub const DATASET_ID: &str = "datasetId";
pub const X_VALUES: &str = "xValues";
pub const X_OFFSET: &str = "xOffset";
pub const X_LABEL: &str = "xLabel";
pub const X_SCALE: &str = "xScale";
pub const Y_VALUES: &str = "yValues";
pub const Y_OFFSET: &str = "yOffset";
pub const Y_LABEL: &str = "yLabel";
pub const Y_SCALE: &str = "yScale";
pub const LEGEND_ENTRY: &str = "legendEntry";

/// Column order of the canonical visualization table.
pub const VISUALIZATION_COLUMNS: [&str; 14] = [
    PLOT_ID,
    PLOT_NAME,
    PLOT_TYPE_SIMULATION,
    PLOT_TYPE_DATA,
    DATASET_ID,
    X_VALUES,
    X_OFFSET,
    X_LABEL,
    X_SCALE,
    Y_VALUES,
    Y_OFFSET,
    Y_LABEL,
    Y_SCALE,
    LEGEND_ENTRY,
];

pub const DEFAULT_FIGURE_ID: &str = "fig0";
pub const DEFAULT_Y_LABEL: &str = "values";
pub const TIME_AXIS: &str = "time";

// ---------------------------------------------------------------------------
// Enumerated columns
// ---------------------------------------------------------------------------

/// A column whose values come from a closed set of strings.
pub trait Enumerated: Sized + Copy + 'static {
    const VARIANTS: &'static [Self];

    fn as_str(&self) -> &'static str;

    /// Parse `value` found in column `field`.
    fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.as_str() == value)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                allowed: Self::VARIANTS
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PlotTypeSimulation {
    #[default]
    #[serde(rename = "LinePlot")]
    LinePlot,
    #[serde(rename = "BarPlot")]
    BarPlot,
    #[serde(rename = "ScatterPlot")]
    ScatterPlot,
}

impl Enumerated for PlotTypeSimulation {
    const VARIANTS: &'static [Self] = &[Self::LinePlot, Self::BarPlot, Self::ScatterPlot];

    fn as_str(&self) -> &'static str {
        match self {
            Self::LinePlot => "LinePlot",
            Self::BarPlot => "BarPlot",
            Self::ScatterPlot => "ScatterPlot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PlotTypeData {
    #[default]
    #[serde(rename = "MeanAndSD")]
    MeanAndSd,
    #[serde(rename = "MeanAndSEM")]
    MeanAndSem,
    #[serde(rename = "replicate")]
    Replicate,
    #[serde(rename = "provided")]
    Provided,
}

impl Enumerated for PlotTypeData {
    const VARIANTS: &'static [Self] = &[
        Self::MeanAndSd,
        Self::MeanAndSem,
        Self::Replicate,
        Self::Provided,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::MeanAndSd => "MeanAndSD",
            Self::MeanAndSem => "MeanAndSEM",
            Self::Replicate => "replicate",
            Self::Provided => "provided",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Lin,
    Log,
    Log10,
}

impl Enumerated for Scale {
    const VARIANTS: &'static [Self] = &[Self::Lin, Self::Log, Self::Log10];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Lin => "lin",
            Self::Log => "log",
            Self::Log10 => "log10",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(PlotTypeSimulation, PlotTypeData, Scale);

// ---------------------------------------------------------------------------
// Independent variable axis
// ---------------------------------------------------------------------------

/// The x axis of a subplot: time, or the simulation conditions labelled by
/// some condition-table column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum XAxis {
    #[default]
    Time,
    Condition(String),
}

impl XAxis {
    pub fn parse(value: &str) -> Self {
        if value == TIME_AXIS {
            XAxis::Time
        } else {
            XAxis::Condition(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            XAxis::Time => TIME_AXIS,
            XAxis::Condition(name) => name,
        }
    }

    pub fn is_time(&self) -> bool {
        matches!(self, XAxis::Time)
    }
}

impl fmt::Display for XAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for XAxis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Raw table
// ---------------------------------------------------------------------------

/// One row of a visualization table as read, before validation or defaults.
/// Absent columns and empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSpecRow {
    pub plot_id: String,
    pub plot_name: Option<String>,
    pub plot_type_simulation: Option<String>,
    pub plot_type_data: Option<String>,
    pub dataset_id: Option<String>,
    pub x_values: Option<String>,
    pub x_offset: Option<String>,
    pub x_label: Option<String>,
    pub x_scale: Option<String>,
    pub y_values: Option<String>,
    pub y_offset: Option<String>,
    pub y_label: Option<String>,
    pub y_scale: Option<String>,
    pub legend_entry: Option<String>,
}

impl RawSpecRow {
    pub fn new(plot_id: impl Into<String>) -> Self {
        Self {
            plot_id: plot_id.into(),
            ..Default::default()
        }
    }

    /// Cell value by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        let cell = match column {
            PLOT_ID => return Some(self.plot_id.as_str()),
            PLOT_NAME => &self.plot_name,
            PLOT_TYPE_SIMULATION => &self.plot_type_simulation,
            PLOT_TYPE_DATA => &self.plot_type_data,
            DATASET_ID => &self.dataset_id,
            X_VALUES => &self.x_values,
            X_OFFSET => &self.x_offset,
            X_LABEL => &self.x_label,
            X_SCALE => &self.x_scale,
            Y_VALUES => &self.y_values,
            Y_OFFSET => &self.y_offset,
            Y_LABEL => &self.y_label,
            Y_SCALE => &self.y_scale,
            LEGEND_ENTRY => &self.legend_entry,
            _ => return None,
        };
        cell.as_deref()
    }

    /// Mutable cell slot by column name; `None` for `plotId` and unknown
    /// columns.
    pub fn slot_mut(&mut self, column: &str) -> Option<&mut Option<String>> {
        match column {
            PLOT_NAME => Some(&mut self.plot_name),
            PLOT_TYPE_SIMULATION => Some(&mut self.plot_type_simulation),
            PLOT_TYPE_DATA => Some(&mut self.plot_type_data),
            DATASET_ID => Some(&mut self.dataset_id),
            X_VALUES => Some(&mut self.x_values),
            X_OFFSET => Some(&mut self.x_offset),
            X_LABEL => Some(&mut self.x_label),
            X_SCALE => Some(&mut self.x_scale),
            Y_VALUES => Some(&mut self.y_values),
            Y_OFFSET => Some(&mut self.y_offset),
            Y_LABEL => Some(&mut self.y_label),
            Y_SCALE => Some(&mut self.y_scale),
            LEGEND_ENTRY => Some(&mut self.legend_entry),
            _ => None,
        }
    }
}

/// A raw visualization table, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisSpecTable {
    pub rows: Vec<RawSpecRow>,
}

impl VisSpecTable {
    pub fn new(rows: Vec<RawSpecRow>) -> Self {
        Self { rows }
    }

    /// A header-only table counts as no table at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct plot ids in order of first appearance.
    pub fn plot_ids(&self) -> Vec<&str> {
        crate::data::filter::unique_in_order(self.rows.iter().map(|r| r.plot_id.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Resolved descriptor
// ---------------------------------------------------------------------------

/// Fully defaulted visualization settings of one subplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubplotDescriptor {
    pub plot_id: String,
    pub plot_name: String,
    pub figure_id: String,
    pub plot_type_simulation: PlotTypeSimulation,
    pub plot_type_data: PlotTypeData,
    pub x_values: XAxis,
    pub x_offset: f64,
    pub x_label: String,
    pub x_scale: Scale,
    /// Observables to plot; empty means "the single observable in the data".
    pub y_values: Vec<String>,
    pub y_label: String,
    pub y_offset: f64,
    pub y_scale: Scale,
    /// One legend entry per dataset id.
    pub legend_entry: Vec<String>,
    pub dataset_id: Vec<String>,
    /// Simulation conditions a condition grouping restricts the subplot to;
    /// empty means all. Visualization tables have no column for it.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub condition_ids: Vec<String>,
}

impl SubplotDescriptor {
    /// Legend entry of `dataset_id`, falling back to the id itself.
    pub fn legend_for<'a>(&'a self, dataset_id: &'a str) -> &'a str {
        self.dataset_id
            .iter()
            .position(|d| d == dataset_id)
            .and_then(|i| self.legend_entry.get(i))
            .map(String::as_str)
            .unwrap_or(dataset_id)
    }
}
