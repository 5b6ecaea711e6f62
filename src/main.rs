//! Name Trends - Historical Name Popularity
//!
//! Opens the interactive window by default; subcommands expose the same
//! exports headlessly.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use eframe::egui;
use name_trends::charts::{ChartSpec, StaticChartRenderer};
use name_trends::config::{AppConfig, DEFAULT_DATA_PATH, DEFAULT_FETCH_TIMEOUT_SECS};
use name_trends::data::{AggregateCache, DataProcessor, WideTable};
use name_trends::export::{
    CsvExport, RemoteDataset, ALL_DATA_FILE_NAME, DEFAULT_ALL_DATA_URL, SELECTION_FILE_NAME,
};
use name_trends::gui::NameTrendsApp;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Historical name popularity explorer", long_about = None)]
struct Cli {
    /// Name frequency CSV with `year`, `name` and `n` columns
    #[arg(
        long,
        global = true,
        env = "NAME_TRENDS_DATA",
        default_value = DEFAULT_DATA_PATH,
        value_hint = ValueHint::FilePath
    )]
    data: PathBuf,

    /// Where "Download All Name Data" fetches the full dataset from
    #[arg(long, global = true, env = "NAME_TRENDS_ALL_DATA_URL", default_value = DEFAULT_ALL_DATA_URL)]
    all_data_url: String,

    /// Timeout for the full dataset download
    #[arg(long, global = true, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    fetch_timeout_secs: u64,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive window (default)
    Gui,
    /// Write the selected-names CSV
    Export(ExportArgs),
    /// Render the chart for a selection
    Chart(ChartArgs),
    /// Download the full raw dataset unchanged
    FetchAll(FetchArgs),
    /// List every name in the dataset
    Names,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Comma separated names, e.g. Harry,Gertrude
    #[arg(long, value_delimiter = ',', required = true)]
    names: Vec<String>,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = SELECTION_FILE_NAME, value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Comma separated names, e.g. Harry,Gertrude
    #[arg(long, value_delimiter = ',', required = true)]
    names: Vec<String>,

    /// Output PNG path
    #[arg(long, default_value = "name_frequencies.png", value_hint = ValueHint::FilePath)]
    png: PathBuf,

    /// Also write the Vega-Lite JSON here
    #[arg(long, value_hint = ValueHint::FilePath)]
    vega: Option<PathBuf>,

    #[arg(long, default_value_t = 1400)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Output path (`-` for stdout)
    #[arg(short, long, default_value = ALL_DATA_FILE_NAME, value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = AppConfig {
        data_path: cli.data,
        all_data_url: cli.all_data_url,
        fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs),
        ..AppConfig::default()
    };

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => handle_gui(config),
        Command::Export(args) => handle_export(&config, args),
        Command::Chart(args) => handle_chart(&config, args),
        Command::FetchAll(args) => handle_fetch_all(&config, args),
        Command::Names => handle_names(&config),
    }
}

fn load_table(config: &AppConfig) -> Result<Arc<WideTable>> {
    let cache = AggregateCache::shared();
    let table = cache
        .get_or_load(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;
    tracing::info!(
        names = table.names().len(),
        years = table.height(),
        cached_sources = cache.len(),
        "name table ready"
    );
    Ok(table)
}

fn handle_gui(config: AppConfig) -> Result<()> {
    let table = load_table(&config)?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 850.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Historical Name Popularity"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Historical Name Popularity",
        options,
        Box::new(move |cc| Ok(Box::new(NameTrendsApp::new(cc, config, table)))),
    )
    .map_err(|e| anyhow!("window failed: {e}"))
}

fn handle_export(config: &AppConfig, args: ExportArgs) -> Result<()> {
    let table = load_table(config)?;
    let presentation = DataProcessor::narrow_and_reshape(&table, args.names.as_slice())?;
    let artifact = CsvExport::selection_artifact(&presentation.export)?;
    artifact
        .write_to(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn handle_chart(config: &AppConfig, args: ChartArgs) -> Result<()> {
    let table = load_table(config)?;
    let presentation = DataProcessor::narrow_and_reshape(&table, args.names.as_slice())?;
    let spec = ChartSpec::name_frequency(presentation.long);

    StaticChartRenderer::render_png(&spec, &args.png, (args.width, args.height))?;

    if let Some(path) = args.vega {
        let json = serde_json::to_string_pretty(&spec.to_vega_lite())?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "vega-lite spec written");
    }
    Ok(())
}

fn handle_fetch_all(config: &AppConfig, args: FetchArgs) -> Result<()> {
    let remote = RemoteDataset::new(config.all_data_url.clone(), config.fetch_timeout);
    let artifact = remote.fetch_artifact()?;
    artifact
        .write_to(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}

fn handle_names(config: &AppConfig) -> Result<()> {
    let table = load_table(config)?;
    for name in table.names() {
        println!("{name}");
    }
    Ok(())
}
