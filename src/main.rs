use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use petab_vis::data::loader::{load_conditions, load_measurements, load_simulations};
use petab_vis::spec::{load_vis_spec, Enumerated};
use petab_vis::{DataProvider, Figure, FigureRequest, IdGrouping, PlotTypeData};

#[derive(Parser)]
#[command(name = "petab-vis")]
#[command(about = "Resolve PEtab visualization specs into plot data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Dataset,
    Condition,
    Observable,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a figure and write it as JSON.
    Figure {
        #[arg(long)]
        measurements: Option<PathBuf>,

        #[arg(long)]
        simulations: Option<PathBuf>,

        #[arg(long)]
        conditions: Option<PathBuf>,

        /// Visualization table; takes precedence over --group-by.
        #[arg(long)]
        vis_spec: Option<PathBuf>,

        #[arg(long, value_enum)]
        group_by: Option<GroupBy>,

        /// Id groups: plots separated by ';', members by ','.
        #[arg(long, conflicts_with = "indices")]
        ids: Option<String>,

        /// Positional groups for condition/observable grouping, e.g. "0,1;2".
        #[arg(long)]
        indices: Option<String>,

        #[arg(long, default_value = "MeanAndSD", value_parser = parse_plotted_noise)]
        plotted_noise: PlotTypeData,

        #[arg(short = 'o', long)]
        out: PathBuf,

        /// Also write the resolved visualization table.
        #[arg(long)]
        write_spec: Option<PathBuf>,
    },
}

fn parse_plotted_noise(s: &str) -> Result<PlotTypeData, petab_vis::ValidationError> {
    PlotTypeData::parse("plotTypeData", s)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Figure {
            measurements,
            simulations,
            conditions,
            vis_spec,
            group_by,
            ids,
            indices,
            plotted_noise,
            out,
            write_spec,
        } => {
            let measurements = measurements
                .as_deref()
                .map(|p| load_measurements(p).with_context(|| format!("reading {}", p.display())))
                .transpose()?;
            let simulations = simulations
                .as_deref()
                .map(|p| load_simulations(p).with_context(|| format!("reading {}", p.display())))
                .transpose()?;

            let mut provider = DataProvider::new(measurements, simulations)?;
            if let Some(path) = conditions.as_deref() {
                provider = provider.with_conditions(
                    load_conditions(path).with_context(|| format!("reading {}", path.display()))?,
                );
            }

            let vis_spec = vis_spec
                .as_deref()
                .map(|p| load_vis_spec(p).with_context(|| format!("reading {}", p.display())))
                .transpose()?
                .filter(|t| !t.is_empty());

            let grouping = match (group_by, ids, indices) {
                (Some(g), ids, indices) => Some(build_grouping(g, ids, indices, &provider)?),
                (None, None, None) => None,
                (None, _, _) => bail!("--ids/--indices require --group-by"),
            };
            let grouping = match (&vis_spec, grouping) {
                (None, None) => {
                    log::info!("no visualization table or grouping given; one plot per observable");
                    Some(IdGrouping::per_observable(&provider.tables()))
                }
                (_, grouping) => grouping,
            };

            let request = FigureRequest {
                vis_spec,
                grouping,
                plotted_noise,
            };
            let figure = Figure::build(&provider, &request)?;

            write_json(&out, &figure)?;
            log::info!("wrote {} subplots to {}", figure.num_subplots(), out.display());

            if let Some(path) = write_spec {
                figure
                    .save_to_tsv(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                log::info!("wrote visualization table to {}", path.display());
            }
        }
    }

    Ok(())
}

fn build_grouping(
    group_by: GroupBy,
    ids: Option<String>,
    indices: Option<String>,
    provider: &DataProvider,
) -> Result<IdGrouping> {
    if let Some(indices) = indices {
        let groups = split_groups(&indices)
            .into_iter()
            .map(|group| {
                group
                    .iter()
                    .map(|i| i.parse::<usize>().with_context(|| format!("bad index '{i}'")))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        return match group_by {
            GroupBy::Condition => Ok(IdGrouping::ConditionIndices(groups)),
            GroupBy::Observable => Ok(IdGrouping::ObservableIndices(groups)),
            GroupBy::Dataset => bail!("datasets can only be grouped by id"),
        };
    }

    match (group_by, ids) {
        (GroupBy::Dataset, Some(ids)) => Ok(IdGrouping::Datasets(split_groups(&ids))),
        (GroupBy::Condition, Some(ids)) => Ok(IdGrouping::ConditionIds(split_groups(&ids))),
        (GroupBy::Observable, Some(ids)) => Ok(IdGrouping::ObservableIds(split_groups(&ids))),
        (GroupBy::Observable, None) => Ok(IdGrouping::per_observable(&provider.tables())),
        (_, None) => bail!("--group-by dataset/condition needs --ids or --indices"),
    }
}

/// "a,b;c" → [["a", "b"], ["c"]]
fn split_groups(s: &str) -> Vec<Vec<String>> {
    s.split(';')
        .map(|group| {
            group
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|group| !group.is_empty())
        .collect()
}

fn write_json(path: &Path, figure: &Figure) -> Result<()> {
    let text = serde_json::to_string_pretty(figure).context("serializing figure")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
