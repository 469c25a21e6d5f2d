//! Figure assembly: descriptors + aggregated data, ready for a renderer.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::aggregate::DataToPlot;
use crate::error::VisResult;
use crate::provider::{DataProvider, DataSeries};
use crate::spec::{
    save_vis_spec, to_table, write_vis_spec, IdGrouping, PlotTypeData, PlotTypeSimulation,
    SpecParser, SpecWarning, SubplotDescriptor, VisSpecTable,
};

/// Rendering hint attached to each subplot. All kinds share the same data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Line,
    Bar,
    Scatter,
}

impl From<PlotTypeSimulation> for PlotKind {
    fn from(value: PlotTypeSimulation) -> Self {
        match value {
            PlotTypeSimulation::LinePlot => PlotKind::Line,
            PlotTypeSimulation::BarPlot => PlotKind::Bar,
            PlotTypeSimulation::ScatterPlot => PlotKind::Scatter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subplot {
    pub kind: PlotKind,
    pub descriptor: SubplotDescriptor,
    /// Observables actually shown.
    pub observables: Vec<String>,
    pub measurements: Option<Vec<DataToPlot>>,
    pub simulations: Option<Vec<DataToPlot>>,
    pub series: Vec<DataSeries>,
}

/// Where the subplot descriptors of a figure come from.
#[derive(Debug, Clone, Default)]
pub struct FigureRequest {
    pub vis_spec: Option<VisSpecTable>,
    pub grouping: Option<IdGrouping>,
    /// Data plot type of synthesized subplots; ignored for tables.
    pub plotted_noise: PlotTypeData,
}

impl FigureRequest {
    pub fn from_vis_spec(vis_spec: VisSpecTable) -> Self {
        Self {
            vis_spec: Some(vis_spec),
            ..Default::default()
        }
    }

    pub fn from_grouping(grouping: IdGrouping, plotted_noise: PlotTypeData) -> Self {
        Self {
            vis_spec: None,
            grouping: Some(grouping),
            plotted_noise,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    pub subplots: Vec<Subplot>,
    pub warnings: Vec<SpecWarning>,
}

impl Figure {
    /// Resolve the request's descriptors and select data for each of them.
    pub fn build(provider: &DataProvider, request: &FigureRequest) -> VisResult<Self> {
        let parsed = SpecParser::parse(
            request.vis_spec.as_ref(),
            request.grouping.as_ref(),
            request.plotted_noise,
            &provider.tables(),
        )?;
        Self::from_descriptors(provider, parsed.subplots, parsed.warnings)
    }

    /// Assemble a figure from already resolved descriptors.
    pub fn from_descriptors(
        provider: &DataProvider,
        descriptors: Vec<SubplotDescriptor>,
        warnings: Vec<SpecWarning>,
    ) -> VisResult<Self> {
        let mut subplots = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let selection = provider.select_by_vis_spec(&descriptor)?;
            subplots.push(Subplot {
                kind: descriptor.plot_type_simulation.into(),
                descriptor,
                observables: selection.observables,
                measurements: selection.measurements,
                simulations: selection.simulations,
                series: selection.series,
            });
        }
        Ok(Self { subplots, warnings })
    }

    pub fn num_subplots(&self) -> usize {
        self.subplots.len()
    }

    pub fn descriptors(&self) -> Vec<SubplotDescriptor> {
        self.subplots.iter().map(|s| s.descriptor.clone()).collect()
    }

    /// The resolved descriptors in canonical visualization table form.
    pub fn to_vis_spec(&self) -> VisSpecTable {
        to_table(&self.descriptors())
    }

    pub fn write_tsv<W: Write>(&self, writer: W) -> VisResult<()> {
        write_vis_spec(&self.to_vis_spec(), writer)
    }

    pub fn save_to_tsv(&self, path: &Path) -> VisResult<()> {
        save_vis_spec(path, &self.descriptors())
    }
}
