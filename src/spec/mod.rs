//! Spec layer: visualization table schema, normalization and parsing.
//!
//! It owns:
//! - the enumerated column vocabulary and [`SubplotDescriptor`]
//! - collapsing the rows of one plot id into a descriptor (`normalize`)
//! - building descriptor lists from a table or an id grouping (`parser`)
//! - TSV reading and writing of visualization tables (`io`)

pub mod io;
pub mod normalize;
pub mod parser;
pub mod types;

pub use io::{load_vis_spec, read_vis_spec, save_vis_spec, to_table, write_vis_spec};
pub use normalize::{normalize, SpecWarning, SubplotSettings};
pub use parser::{IdGrouping, ParsedSpec, SpecParser};
pub use types::{
    Enumerated, PlotTypeData, PlotTypeSimulation, RawSpecRow, Scale, SubplotDescriptor,
    VisSpecTable, XAxis,
};
