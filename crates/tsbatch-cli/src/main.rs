//! CLI tool for inspecting time-series batches stored in Parquet.

mod error;
mod render;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info};
use snafu::ResultExt;
use tsbatch_core::{
    EmptyClassPolicy, Label, StatsOptions, TableColumns, TargetRegime, TsData, check_ts_data,
    labels_from_column,
    table::{read_parquet_batch, write_parquet_batch},
    temporal_split, ts_stats_from_labels, with_label_column,
};

use crate::{
    error::{
        CheckSnafu, CliResult, LoadBatchSnafu, ReadLabelsSnafu, SplitSnafu, StatsSnafu,
        WriteBatchSnafu,
    },
    render::{ReportFormat, write_stats},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Table => ReportFormat::Table,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmptyClassArg {
    Reject,
    Nan,
}

impl From<EmptyClassArg> for EmptyClassPolicy {
    fn from(v: EmptyClassArg) -> Self {
        match v {
            EmptyClassArg::Reject => EmptyClassPolicy::Reject,
            EmptyClassArg::Nan => EmptyClassPolicy::Nan,
        }
    }
}

/// Where the batch lives and which columns play which role.
#[derive(Debug, Args)]
struct InputArgs {
    /// Parquet file with one series per row
    #[arg(long)]
    parquet: PathBuf,

    #[arg(long = "ts-column", default_value = "ts_data")]
    ts_column: String,

    #[arg(long = "timestamps-column", default_value = "timestamps")]
    timestamps_column: String,

    #[arg(long = "sernum-column", default_value = "sernum")]
    sernum_column: String,
}

impl InputArgs {
    fn columns(&self, label_column: Option<&str>) -> TableColumns {
        let columns = TableColumns {
            ts_data: self.ts_column.clone(),
            timestamps: self.timestamps_column.clone(),
            sernum: self.sernum_column.clone(),
            exclude: Vec::new(),
        };
        match label_column {
            Some(label) => columns.excluding(label),
            None => columns,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Duration statistics over the batch and per class
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Column holding one class index per series
        #[arg(long = "label-column", default_value = "label")]
        label_column: String,

        /// Samples per time unit
        #[arg(long = "fs", default_value_t = 1.0)]
        sampling_frequency: f64,

        /// Repeatable display name for classes 0..C, in order
        #[arg(long = "class-label")]
        class_label: Vec<String>,

        /// What to do with a class that has no series
        #[arg(long = "empty-class", value_enum, default_value_t = EmptyClassArg::Reject)]
        empty_class: EmptyClassArg,

        #[arg(long, value_enum, default_value_t = FormatArg::Table)]
        format: FormatArg,
    },

    /// Check that the series (and optional targets) have a consistent shape
    Check {
        #[command(flatten)]
        input: InputArgs,

        /// Column holding targets; omit to check the series alone
        #[arg(long = "label-column")]
        label_column: Option<String>,
    },

    /// Cut every series along time into a train and a test file
    Split {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long = "label-column")]
        label_column: String,

        /// Fraction of each series that goes to the test file
        #[arg(long = "test-size", default_value_t = 0.25)]
        test_size: f64,

        #[arg(long)]
        train: PathBuf,

        #[arg(long)]
        test: PathBuf,
    },
}

#[derive(Debug, Parser)]
#[command(name = "tsbatch", version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

struct Loaded {
    data: TsData,
    labels: Option<Vec<Label>>,
    context_names: Vec<String>,
}

fn load(input: &InputArgs, label_column: Option<&str>) -> CliResult<Loaded> {
    let path = input.parquet.display().to_string();
    let columns = input.columns(label_column);

    let batch = read_parquet_batch(&input.parquet).context(LoadBatchSnafu { path: &path })?;
    let data = TsData::from_record_batch(&batch, &columns).context(LoadBatchSnafu { path: &path })?;
    let labels = label_column
        .map(|name| labels_from_column(&batch, name).context(ReadLabelsSnafu { column: name }))
        .transpose()?;
    let context_names = columns.context_columns(&batch.schema());

    info!("loaded {} series from {path}", data.len());
    Ok(Loaded {
        data,
        labels,
        context_names,
    })
}

struct StatsArgs {
    input: InputArgs,
    label_column: String,
    sampling_frequency: f64,
    class_label: Vec<String>,
    empty_class: EmptyClassArg,
    format: FormatArg,
}

fn cmd_stats(args: StatsArgs) -> CliResult<()> {
    let loaded = load(&args.input, Some(&args.label_column))?;
    let labels = loaded.labels.unwrap_or_default();

    let options = StatsOptions {
        sampling_frequency: args.sampling_frequency,
        class_labels: (!args.class_label.is_empty()).then_some(args.class_label),
        empty_class: args.empty_class.into(),
        check_targets: true,
    };
    debug!("stats options: {options:?}");

    let report = ts_stats_from_labels(&loaded.data, &labels, &options).context(StatsSnafu)?;
    let mut stdout = std::io::stdout();
    write_stats(&report, args.format.into(), &mut stdout)
}

fn cmd_check(input: &InputArgs, label_column: Option<&str>) -> CliResult<()> {
    let loaded = load(input, label_column)?;
    let regime = check_ts_data(&loaded.data, loaded.labels.as_deref()).context(CheckSnafu)?;

    let targets = match regime {
        Some(TargetRegime::PerSeries) => "per-series targets",
        Some(TargetRegime::PerTimestep) => "per-timestep targets",
        None => "no targets",
    };
    println!("OK: {} series, {targets}", loaded.data.len());
    Ok(())
}

fn write_half(
    path: &Path,
    data: &TsData,
    labels: &[Label],
    columns: &TableColumns,
    context_names: &[String],
    label_column: &str,
) -> CliResult<()> {
    let display = path.display().to_string();
    let names = (!context_names.is_empty()).then_some(context_names);

    let batch = data
        .to_record_batch(columns, names)
        .context(WriteBatchSnafu { path: &display })?;
    let batch = with_label_column(&batch, label_column, labels)
        .context(WriteBatchSnafu { path: &display })?;
    write_parquet_batch(path, &batch).context(WriteBatchSnafu { path: &display })
}

fn cmd_split(
    input: &InputArgs,
    label_column: &str,
    test_size: f64,
    train: &Path,
    test: &Path,
) -> CliResult<()> {
    let loaded = load(input, Some(label_column))?;
    let labels = loaded.labels.unwrap_or_default();
    let split = temporal_split(&loaded.data, &labels, test_size).context(SplitSnafu)?;

    let columns = input.columns(None);
    write_half(
        train,
        &split.x_train,
        &split.y_train,
        &columns,
        &loaded.context_names,
        label_column,
    )?;
    write_half(
        test,
        &split.x_test,
        &split.y_test,
        &columns,
        &loaded.context_names,
        label_column,
    )?;

    println!(
        "Wrote {} series to {} and {}",
        loaded.data.len(),
        train.display(),
        test.display()
    );
    Ok(())
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.cmd {
        Command::Stats {
            input,
            label_column,
            sampling_frequency,
            class_label,
            empty_class,
            format,
        } => cmd_stats(StatsArgs {
            input,
            label_column,
            sampling_frequency,
            class_label,
            empty_class,
            format,
        }),

        Command::Check {
            input,
            label_column,
        } => cmd_check(&input, label_column.as_deref()),

        Command::Split {
            input,
            label_column,
            test_size,
            train,
            test,
        } => cmd_split(&input, &label_column, test_size, &train, &test),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

