use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    num::NonZero,
    path::PathBuf,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use grid_centroids::{
    Analysis,
    config::AnalysisConfig,
    generate::{self, OutputFormat},
    report::{Report, ReportOptions},
    source::Coordinates,
};
use log::info;
use rand::{SeedableRng, rngs::StdRng};

const DEFAULT_INPUT: &str = "data/coordinates.json";

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bin coordinates into a grid and report per-cell centroids and distances
    Analyze(AnalyzeArgs),
    /// Write a file of uniformly random coordinates in the unit square
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// JSON file holding an array of [x, y] pairs
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// TOML config file; flags below override its values
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Cells per side of the grid
    #[arg(long, short = 'n')]
    grid_size: Option<NonZero<usize>>,
    /// Edge length of the square covered by the grid
    #[arg(long, short)]
    edge_length: Option<f64>,
    /// Maximum number of points per cell
    #[arg(long)]
    cell_capacity: Option<usize>,
    /// Maximum number of input coordinates
    #[arg(long)]
    max_coordinates: Option<usize>,
    /// List cell members nearest-first, with their distances
    #[arg(long, short)]
    sorted: bool,
    /// Print every input coordinate before the cells
    #[arg(long, short)]
    list_coordinates: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of points
    #[arg(long, short = 'n', default_value_t = 50)]
    count: usize,
    /// Output file; `-` writes to stdout
    #[arg(long, short, default_value = DEFAULT_INPUT)]
    output: PathBuf,
    /// Output format, guessed from the file extension if omitted
    #[arg(long, short, value_enum)]
    format: Option<OutputFormat>,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

impl AnalyzeArgs {
    fn config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(edge_length) = self.edge_length {
            config.edge_length = edge_length;
        }
        if let Some(cell_capacity) = self.cell_capacity {
            config.cell_capacity = cell_capacity;
        }
        if let Some(max_coordinates) = self.max_coordinates {
            config.max_coordinates = max_coordinates;
        }
        config.validate().context("invalid configuration")?;

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Generate(args) => run_generate(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = args.config()?;
    info!(target: "cli", "Using {config:?}");

    // Any ingestion error aborts before a single line of the report is written
    let coordinates = Coordinates::load(&args.input, config.max_coordinates)
        .with_context(|| format!("failed to load coordinates from {}", args.input.display()))?;
    let analysis = Analysis::run(coordinates, &config);

    let options = ReportOptions { list_coordinates: args.list_coordinates, sorted: args.sorted };
    let mut out = BufWriter::new(io::stdout().lock());
    Report::new(&analysis, options).write_to(&mut out).context("failed to write report")?;
    out.flush().context("failed to write report")?;

    Ok(())
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let format = args.format.or_else(|| OutputFormat::from_path(&args.output)).unwrap_or_default();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let points = generate::random_points(args.count, &mut rng);

    if args.output.as_os_str() == "-" {
        let mut out = BufWriter::new(io::stdout().lock());
        generate::write_points(&points, format, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);
    generate::write_points(&points, format, &mut out)
        .and_then(|()| out.flush())
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        target: "cli",
        "Wrote {} points to {} ({format:?})", points.len(), args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use new_zealand::nz;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_defaults() {
        let cli = Cli::try_parse_from(["grid_centroids", "analyze"]).unwrap();
        let Command::Analyze(args) = cli.command else { panic!("expected analyze") };

        assert_eq!(args.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(args.config().unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "grid_centroids",
            "analyze",
            "points.json",
            "-n",
            "5",
            "--edge-length",
            "2.0",
            "--cell-capacity",
            "3",
            "--sorted",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else { panic!("expected analyze") };
        let config = args.config().unwrap();

        assert!(args.sorted);
        assert_eq!(config.grid_size, nz!(5));
        assert_eq!(config.edge_length, 2.0);
        assert_eq!(config.cell_capacity, 3);
    }

    #[test]
    fn rejects_zero_grid_size() {
        assert!(Cli::try_parse_from(["grid_centroids", "analyze", "-n", "0"]).is_err());
    }

    #[test]
    fn rejects_bad_edge_length() {
        let cli = Cli::try_parse_from(["grid_centroids", "analyze", "--edge-length=-1"]).unwrap();
        let Command::Analyze(args) = cli.command else { panic!("expected analyze") };
        assert!(args.config().is_err());
    }

    #[test]
    fn generate_writes_loadable_file() {
        let path = std::env::temp_dir().join("grid_centroids_generate_test.json");
        let cli = Cli::try_parse_from([
            "grid_centroids",
            "generate",
            "--count",
            "12",
            "--seed",
            "9",
            "--output",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else { panic!("expected generate") };
        run_generate(args).unwrap();

        let coordinates = Coordinates::load(&path, 12).unwrap();
        assert_eq!(coordinates.len(), 12);
        fs::remove_file(&path).unwrap();
    }
}
