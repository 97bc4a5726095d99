//! vrsix CLI entry point

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vrsix::{config, fetch_by_range, fetch_by_vrs_ids, load_vcf, Error, Result, VrsLocation};

#[derive(Parser)]
#[command(name = "vrsix")]
#[command(version, about = "Index VRS-annotated VCFs", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the VRS annotations in one or more VCFs
    Load {
        /// Paths to VCF files (.vcf, .vcf.gz, .vcf.bgz)
        #[arg(required = true)]
        vcfs: Vec<PathBuf>,

        /// Path to the index store (file or directory)
        #[arg(long, env = config::STORE_ENV_VAR)]
        db_location: Option<PathBuf>,

        /// Record this URI as the file's source instead of its local path
        #[arg(long)]
        uri: Option<String>,
    },

    /// Fetch VCF positions by VRS ID
    FetchById {
        /// VRS allele IDs, with or without the ga4gh:VA. prefix
        vrs_ids: Vec<String>,

        /// Path to the index store (file or directory)
        #[arg(long, env = config::STORE_ENV_VAR)]
        db_location: Option<PathBuf>,

        /// Write results as CSV to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch VCF positions by chromosome and position range (inclusive)
    FetchByRange {
        /// Chromosome, matched exactly as stored (no chr-prefix normalization)
        chrom: String,

        /// Start of range
        start: i64,

        /// End of range
        end: i64,

        /// Path to the index store (file or directory)
        #[arg(long, env = config::STORE_ENV_VAR)]
        db_location: Option<PathBuf>,

        /// Write results as CSV to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Load {
            vcfs,
            db_location,
            uri,
        } => {
            let store = config::resolve_store_path(db_location.as_deref());
            if uri.is_some() && vcfs.len() > 1 {
                warn!("--uri applies to every input; provenance rows will collide");
            }
            for vcf in &vcfs {
                let start = Instant::now();
                let count = load_vcf(vcf, &store, uri.as_deref()).await?;
                info!(
                    "Processed `{}` ({} entries) in {:.2?}",
                    vcf.display(),
                    count,
                    start.elapsed()
                );
            }
        }

        Commands::FetchById {
            vrs_ids,
            db_location,
            output,
        } => {
            if vrs_ids.is_empty() {
                return Ok(());
            }
            let store = config::resolve_store_path(db_location.as_deref());
            let rows = fetch_by_vrs_ids(&vrs_ids, &store).await?;
            emit_rows(&rows, output.as_deref())?;
        }

        Commands::FetchByRange {
            chrom,
            start,
            end,
            db_location,
            output,
        } => {
            let store = config::resolve_store_path(db_location.as_deref());
            let rows = fetch_by_range(&chrom, start, end, &store).await?;
            emit_rows(&rows, output.as_deref())?;
        }
    }

    Ok(())
}

fn emit_rows(rows: &[VrsLocation], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut writer = csv::Writer::from_path(path).map_err(csv_io_error)?;
            for row in rows {
                writer
                    .write_record([row.vrs_id.as_str(), row.chr.as_str(), &row.pos.to_string()])
                    .map_err(csv_io_error)?;
            }
            writer.flush()?;
        }
        None => {
            for row in rows {
                println!("{},{},{}", row.vrs_id, row.chr, row.pos);
            }
        }
    }
    Ok(())
}

fn csv_io_error(e: csv::Error) -> Error {
    Error::Io(std::io::Error::other(e))
}
