//! `imgprep` CLI - resize image datasets and inspect tensor loading.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgprep::config::{ResizeOverrides, DEFAULT_RESIZE_CONFIG};
use imgprep::{batch, load_dataset, Dataset, DatasetCatalog, LoadOptions, ResizeConfig};

/// Prepare image datasets for training.
#[derive(Parser, Debug)]
#[command(name = "imgprep")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resize every image in the input tree, then verify the output sizes.
    Resize {
        #[command(flatten)]
        config: ConfigArgs,

        /// Worker threads. Defaults to one per core.
        #[arg(short, long, value_name = "INT")]
        jobs: Option<usize>,

        /// Skip the output size check.
        #[arg(long)]
        no_verify: bool,
    },

    /// Check that every output image has the configured size.
    Verify {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Load a dataset from a catalog and report its tensor shapes.
    Inspect {
        /// Dataset catalog (JSON).
        #[arg(long, value_name = "FILE", default_value = "constants.json")]
        catalog: PathBuf,

        /// Dataset name in the catalog.
        #[arg(long, value_name = "NAME")]
        name: String,

        /// Scale pixel values by the dataset's normalization factor.
        #[arg(long)]
        normalize: bool,

        /// Group samples into batches.
        #[arg(long)]
        batch: bool,

        /// Use the hosted-runtime root instead of the local one.
        #[arg(long)]
        colab: bool,
    },
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Resize config (JSON).
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_RESIZE_CONFIG)]
    config: PathBuf,

    /// Override the data root. A relative path resolves against the working
    /// directory.
    #[arg(long, value_name = "DIR")]
    data_root: Option<PathBuf>,

    /// Override the input directory name.
    #[arg(long, value_name = "DIR")]
    input_dir: Option<String>,

    /// Override the output directory name.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Override the target width.
    #[arg(long, value_name = "INT")]
    width: Option<u32>,

    /// Override the target height.
    #[arg(long, value_name = "INT")]
    height: Option<u32>,
}

impl ConfigArgs {
    fn load(&self) -> Result<ResizeConfig> {
        let overrides = ResizeOverrides {
            data_root: self.data_root.clone(),
            input_dir: self.input_dir.clone(),
            output_dir: self.output_dir.clone(),
            width: self.width,
            height: self.height,
        };
        ResizeConfig::load_with_overrides(&self.config, &overrides)
            .with_context(|| format!("Failed to load {}", self.config.display()))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("imgprep={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&cli) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Resize {
            config,
            jobs,
            no_verify,
        } => {
            let config = config.load()?;

            if let Some(threads) = jobs {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(*threads)
                    .build_global()
                    .context("Failed to configure worker threads")?;
            }

            let report = batch::resize_dataset(&config).context("Failed to resize dataset")?;
            println!(
                "Resized {} images: {} written, {} skipped, {} failed",
                report.total(),
                report.written,
                report.skipped,
                report.failed
            );

            if !no_verify {
                verify(&config)?;
            }
        }
        Command::Verify { config } => verify(&config.load()?)?,
        Command::Inspect {
            catalog,
            name,
            normalize,
            batch,
            colab,
        } => {
            let catalog = DatasetCatalog::from_path(catalog)
                .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;
            let options = LoadOptions {
                normalize: *normalize,
                batch: *batch,
                colab: *colab,
            };
            let dataset = load_dataset(&catalog, name, options)
                .with_context(|| format!("Failed to load dataset {name}"))?;
            describe(name, &dataset);
        }
    }

    Ok(())
}

fn verify(config: &ResizeConfig) -> Result<()> {
    let output = config.output_path();
    let report = batch::verify_output(&output, config.width, config.height)
        .with_context(|| format!("Failed to verify {}", output.display()))?;

    for path in &report.invalid {
        tracing::debug!("Invalid image: {}", path.display());
    }
    println!("{}", report.summary());
    Ok(())
}

fn describe(name: &str, dataset: &Dataset) {
    match dataset {
        Dataset::Samples(samples) => {
            let shape = samples.first().map(|s| s.shape().to_vec()).unwrap_or_default();
            println!("{name}: {} samples, sample shape {shape:?}", samples.len());
        }
        Dataset::Batches(batches) => {
            let shape = batches.first().map(|b| b.shape().to_vec()).unwrap_or_default();
            println!(
                "{name}: {} batches ({} samples), first batch shape {shape:?}",
                batches.len(),
                dataset.sample_count()
            );
        }
    }
}
