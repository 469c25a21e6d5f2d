//! Build the ordered list of subplot descriptors, either from a
//! visualization table or synthesized from id groupings.

use crate::data::filter::unique_in_order;
use crate::data::{DataTable, Record};
use crate::error::{VisError, VisResult};

use super::normalize::{normalize, SpecWarning, SubplotSettings};
use super::types::{PlotTypeData, RawSpecRow, SubplotDescriptor, VisSpecTable};

/// Descriptors in plot order plus the diagnostics raised while resolving them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSpec {
    pub subplots: Vec<SubplotDescriptor>,
    pub warnings: Vec<SpecWarning>,
}

/// How to split the data into subplots when no visualization table is given.
/// Each inner list becomes one subplot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdGrouping {
    Datasets(Vec<Vec<String>>),
    ConditionIds(Vec<Vec<String>>),
    /// Positions into the distinct condition ids of the data.
    ConditionIndices(Vec<Vec<usize>>),
    ObservableIds(Vec<Vec<String>>),
    /// Positions into the distinct observable ids of the data.
    ObservableIndices(Vec<Vec<usize>>),
}

impl IdGrouping {
    pub fn is_empty(&self) -> bool {
        match self {
            IdGrouping::Datasets(g) | IdGrouping::ConditionIds(g) | IdGrouping::ObservableIds(g) => {
                g.is_empty()
            }
            IdGrouping::ConditionIndices(g) | IdGrouping::ObservableIndices(g) => g.is_empty(),
        }
    }

    /// One subplot per observable found in `tables`.
    pub fn per_observable(tables: &[&DataTable]) -> Self {
        let ids = distinct_ids(tables, GroupColumn::Observable);
        IdGrouping::ObservableIds(ids.into_iter().map(|id| vec![id]).collect())
    }
}

/// Which column of the data an id group refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupColumn {
    Condition,
    Observable,
}

impl GroupColumn {
    fn of(self, row: &Record) -> &str {
        match self {
            GroupColumn::Condition => &row.simulation_condition_id,
            GroupColumn::Observable => &row.observable_id,
        }
    }

    fn name(self) -> &'static str {
        match self {
            GroupColumn::Condition => "simulation condition",
            GroupColumn::Observable => "observable",
        }
    }
}

pub struct SpecParser;

impl SpecParser {
    /// Resolve descriptors from whichever source is present. A non-empty
    /// table takes precedence over a grouping.
    pub fn parse(
        table: Option<&VisSpecTable>,
        grouping: Option<&IdGrouping>,
        plotted_noise: PlotTypeData,
        data: &[&DataTable],
    ) -> VisResult<ParsedSpec> {
        match (table, grouping) {
            (Some(t), _) if !t.is_empty() => Self::from_table(t),
            (_, Some(g)) if !g.is_empty() => Self::from_grouping(g, plotted_noise, data),
            _ => Err(VisError::Argument(
                "Not enough arguments. Either a visualization table should be provided or one \
                 of the following groupings: dataset ids, simulation condition ids or numbers, \
                 observable ids or numbers"
                    .to_string(),
            )),
        }
    }

    /// One descriptor per distinct `plotId`, in order of first appearance.
    pub fn from_table(table: &VisSpecTable) -> VisResult<ParsedSpec> {
        let mut parsed = ParsedSpec::default();
        for plot_id in table.plot_ids() {
            let rows: Vec<&RawSpecRow> = table.rows.iter().filter(|r| r.plot_id == plot_id).collect();
            let descriptor = normalize(plot_id, &rows, &mut parsed.warnings)?;
            parsed.subplots.push(descriptor);
        }
        log::debug!("resolved {} subplots from visualization table", parsed.subplots.len());
        Ok(parsed)
    }

    /// One descriptor per group, with plot ids `plot1`, `plot2`, ...
    ///
    /// Condition and observable groups infer their dataset ids from the rows
    /// of `data` that belong to the group.
    pub fn from_grouping(
        grouping: &IdGrouping,
        plotted_noise: PlotTypeData,
        data: &[&DataTable],
    ) -> VisResult<ParsedSpec> {
        let groups: Vec<SubplotSettings> = match grouping {
            IdGrouping::Datasets(groups) => groups
                .iter()
                .map(|datasets| SubplotSettings {
                    dataset_id: unique_in_order(datasets.iter().cloned()),
                    ..Default::default()
                })
                .collect(),
            IdGrouping::ConditionIds(groups) => {
                infer_groups(groups, GroupColumn::Condition, data)?
            }
            IdGrouping::ConditionIndices(groups) => {
                let ids = resolve_indices(groups, GroupColumn::Condition, data)?;
                infer_groups(&ids, GroupColumn::Condition, data)?
            }
            IdGrouping::ObservableIds(groups) => {
                infer_groups(groups, GroupColumn::Observable, data)?
            }
            IdGrouping::ObservableIndices(groups) => {
                let ids = resolve_indices(groups, GroupColumn::Observable, data)?;
                infer_groups(&ids, GroupColumn::Observable, data)?
            }
        };

        let subplots = groups
            .into_iter()
            .enumerate()
            .map(|(i, mut settings)| {
                settings.plot_type_data = Some(plotted_noise);
                settings.resolve(&format!("plot{}", i + 1))
            })
            .collect::<Vec<_>>();

        log::debug!("synthesized {} subplots from {:?}", subplots.len(), grouping);
        Ok(ParsedSpec {
            subplots,
            warnings: Vec::new(),
        })
    }
}

/// Distinct values of a column across all tables, first appearance first.
fn distinct_ids(data: &[&DataTable], column: GroupColumn) -> Vec<String> {
    unique_in_order(data.iter().flat_map(|t| match column {
        GroupColumn::Condition => t.condition_ids(),
        GroupColumn::Observable => t.observable_ids(),
    }))
}

fn resolve_indices(
    groups: &[Vec<usize>],
    column: GroupColumn,
    data: &[&DataTable],
) -> VisResult<Vec<Vec<String>>> {
    let ids = distinct_ids(data, column);
    groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|&i| {
                    ids.get(i).cloned().ok_or_else(|| {
                        VisError::Argument(format!(
                            "{} index {i} out of range: the data has {} distinct {} ids",
                            column.name(),
                            ids.len(),
                            column.name()
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

fn infer_groups(
    groups: &[Vec<String>],
    column: GroupColumn,
    data: &[&DataTable],
) -> VisResult<Vec<SubplotSettings>> {
    if data.is_empty() {
        return Err(VisError::Argument(format!(
            "grouping by {} ids requires a measurement or simulation table",
            column.name()
        )));
    }

    Ok(groups
        .iter()
        .map(|members| {
            let rows = || {
                data.iter()
                    .flat_map(|t| t.rows.iter())
                    .filter(|r| members.iter().any(|m| m == column.of(r)))
            };
            let dataset_id = unique_in_order(rows().map(|r| r.dataset_key().into_owned()));
            // datasets may span several conditions; condition groups mask on both
            let (y_values, condition_ids) = match column {
                GroupColumn::Observable => (unique_in_order(members.iter().cloned()), Vec::new()),
                GroupColumn::Condition => (
                    unique_in_order(rows().map(|r| r.observable_id.clone())),
                    unique_in_order(members.iter().cloned()),
                ),
            };
            SubplotSettings {
                dataset_id,
                y_values,
                condition_ids,
                ..Default::default()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableKind;
    use crate::spec::types::XAxis;
    use pretty_assertions::assert_eq;

    fn record(ds: Option<&str>, obs: &str, cond: &str) -> Record {
        Record {
            observable_id: obs.to_string(),
            simulation_condition_id: cond.to_string(),
            preequilibration_condition_id: None,
            time: 0.0,
            value: 1.0,
            noise_parameters: None,
            dataset_id: ds.map(str::to_string),
        }
    }

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> DataTable {
        DataTable::new(
            TableKind::Measurement,
            vec![
                record(None, "pS6", "c2"),
                record(None, "pEGFR", "c2"),
                record(None, "pS6", "c1"),
                record(None, "pAkt", "c3"),
            ],
        )
    }

    #[test]
    fn one_descriptor_per_distinct_plot_id_in_table_order() {
        let mut rows = Vec::new();
        for (plot, ds) in [("b", "d1"), ("a", "d2"), ("b", "d3"), ("c", "d4")] {
            let mut row = RawSpecRow::new(plot);
            row.dataset_id = Some(ds.into());
            rows.push(row);
        }
        let parsed = SpecParser::from_table(&VisSpecTable::new(rows)).unwrap();

        let ids: Vec<&str> = parsed.subplots.iter().map(|d| d.plot_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(parsed.subplots[0].dataset_id, strings(&["d1", "d3"]));
    }

    #[test]
    fn dataset_grouping_synthesizes_sequential_plots() {
        let grouping = IdGrouping::Datasets(vec![strings(&["d1", "d2"]), strings(&["d3"])]);
        let parsed = SpecParser::from_grouping(&grouping, PlotTypeData::Provided, &[]).unwrap();

        assert_eq!(parsed.subplots.len(), 2);
        let first = &parsed.subplots[0];
        assert_eq!(first.plot_id, "plot1");
        assert_eq!(first.plot_name, "plot1");
        assert_eq!(first.dataset_id, strings(&["d1", "d2"]));
        assert_eq!(first.legend_entry, strings(&["d1", "d2"]));
        assert_eq!(first.plot_type_data, PlotTypeData::Provided);
        assert_eq!(first.x_values, XAxis::Time);
        assert_eq!(parsed.subplots[1].plot_id, "plot2");
    }

    #[test]
    fn condition_grouping_infers_dataset_ids() {
        let table = sample_table();
        let grouping = IdGrouping::ConditionIds(vec![strings(&["c2"]), strings(&["c1", "c3"])]);
        let parsed =
            SpecParser::from_grouping(&grouping, PlotTypeData::MeanAndSd, &[&table]).unwrap();

        assert_eq!(parsed.subplots[0].dataset_id, strings(&["pS6_c2", "pEGFR_c2"]));
        assert_eq!(parsed.subplots[0].y_values, strings(&["pS6", "pEGFR"]));
        assert_eq!(parsed.subplots[1].dataset_id, strings(&["pS6_c1", "pAkt_c3"]));
        assert_eq!(parsed.subplots[1].condition_ids, strings(&["c1", "c3"]));
    }

    #[test]
    fn only_condition_groupings_restrict_conditions() {
        let table = sample_table();
        let grouping = IdGrouping::ObservableIds(vec![strings(&["pS6"])]);
        let parsed =
            SpecParser::from_grouping(&grouping, PlotTypeData::MeanAndSd, &[&table]).unwrap();
        assert!(parsed.subplots[0].condition_ids.is_empty());
    }

    #[test]
    fn index_grouping_refers_to_first_appearance_order() {
        let table = sample_table();
        let by_index = IdGrouping::ObservableIndices(vec![vec![1], vec![0, 2]]);
        let by_id = IdGrouping::ObservableIds(vec![strings(&["pEGFR"]), strings(&["pS6", "pAkt"])]);

        let a = SpecParser::from_grouping(&by_index, PlotTypeData::MeanAndSd, &[&table]).unwrap();
        let b = SpecParser::from_grouping(&by_id, PlotTypeData::MeanAndSd, &[&table]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.subplots[1].y_values, strings(&["pS6", "pAkt"]));
    }

    #[test]
    fn out_of_range_index_is_an_argument_error() {
        let table = sample_table();
        let grouping = IdGrouping::ConditionIndices(vec![vec![7]]);
        let err = SpecParser::from_grouping(&grouping, PlotTypeData::MeanAndSd, &[&table])
            .unwrap_err();
        assert!(matches!(err, VisError::Argument(_)), "{err}");
    }

    #[test]
    fn per_observable_grouping_covers_every_observable() {
        let table = sample_table();
        assert_eq!(
            IdGrouping::per_observable(&[&table]),
            IdGrouping::ObservableIds(vec![
                strings(&["pS6"]),
                strings(&["pEGFR"]),
                strings(&["pAkt"])
            ])
        );
    }

    #[test]
    fn no_source_is_an_argument_error() {
        let err = SpecParser::parse(None, None, PlotTypeData::MeanAndSd, &[]).unwrap_err();
        assert!(matches!(err, VisError::Argument(_)));

        let empty = VisSpecTable::default();
        let empty_grouping = IdGrouping::Datasets(vec![]);
        let err = SpecParser::parse(
            Some(&empty),
            Some(&empty_grouping),
            PlotTypeData::MeanAndSd,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, VisError::Argument(_)));
    }

    #[test]
    fn empty_table_falls_back_to_grouping() {
        let empty = VisSpecTable::default();
        let grouping = IdGrouping::Datasets(vec![strings(&["d1"])]);
        let parsed =
            SpecParser::parse(Some(&empty), Some(&grouping), PlotTypeData::MeanAndSd, &[]).unwrap();
        assert_eq!(parsed.subplots.len(), 1);
    }
}
