//! petab-vis: resolve PEtab visualization specifications against
//! measurement and simulation tables into grouped, aggregated plot data.
//!
//! ```text
//!  visualization table ─┐
//!  or id grouping       ├─► SpecParser ─► SubplotDescriptor*
//!                       │                       │
//!  measurement /        │                       ▼
//!  simulation tables ───┴──────────────► DataProvider ─► aggregate ─► Figure
//! ```

pub mod aggregate;
pub mod data;
pub mod error;
pub mod figure;
pub mod provider;
pub mod spec;

pub use aggregate::{DataToPlot, XValue};
pub use error::{ValidationError, VisError, VisResult};
pub use figure::{Figure, FigureRequest, PlotKind, Subplot};
pub use provider::{DataProvider, DataSeries, Selection};
pub use spec::{
    IdGrouping, ParsedSpec, PlotTypeData, PlotTypeSimulation, Scale, SpecParser, SpecWarning,
    SubplotDescriptor, VisSpecTable, XAxis,
};
