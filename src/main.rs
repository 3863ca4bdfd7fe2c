use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use phashrs::config::{DEFAULT_HASH_SIZE, DEFAULT_THRESHOLD};
use phashrs::services::batch::{self, BatchOutcome};
use phashrs::services::report::{self, OutputFormat};
use phashrs::services::scanner::{self, DEFAULT_EXTENSIONS, ScanOptions};
use phashrs::{HashConfig, HashKind, ImageHasher, cluster};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(
    name = "phashrs",
    version,
    about = "Compute and compare perceptual image hashes"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Hash algorithm (average, difference, perception, double-gradient)
    #[arg(short = 't', long, global = true, default_value = "double-gradient")]
    hash_type: HashKind,

    /// Maximum Hamming distance at which images count as similar
    #[arg(short = 'x', long, global = true, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u32,

    /// Hash width
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_HASH_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    width: u32,

    /// Hash height
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_HASH_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    height: u32,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArgs {
    fn config(&self) -> HashConfig {
        HashConfig::new(self.hash_type)
            .with_size(self.width, self.height)
            .with_threshold(self.threshold)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the perceptual hash of an image
    Hash {
        /// Image file
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Binary)]
        format: OutputFormat,
    },

    /// Compare two images; exits with status 1 when they differ
    Compare {
        #[arg(value_name = "IMAGE1")]
        first: PathBuf,
        #[arg(value_name = "IMAGE2")]
        second: PathBuf,
    },

    /// Hash every image in a directory, or group similar ones
    Batch {
        /// Directory to scan
        #[arg(value_name = "DIR")]
        directory: PathBuf,
        /// Write results to this CSV file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,
        /// File extensions to process
        #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_EXTENSIONS.map(String::from))]
        extensions: Vec<String>,
        /// Find similar images instead of listing hashes
        #[arg(short, long)]
        duplicates: bool,
        /// Hash output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Binary)]
        format: OutputFormat,
        /// Print results as JSON
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let config = cli.global.config();
    let hasher = ImageHasher::new(&config);

    match cli.command {
        Commands::Hash { image, format } => {
            log::debug!("Processing image: {}", image.display());
            log::debug!("Hash algorithm: {}, output format: {:?}", config.kind, format);

            let hash = batch::hash_file(&image, &hasher)
                .with_context(|| format!("Failed to hash {}", image.display()))?;
            println!("{}", format.render(&hash));

            if cli.global.verbose {
                println!("Hash type: {}", hash.kind());
                println!("Bits: {}", hash.bits());
                println!(
                    "File: {}",
                    image.file_name().unwrap_or_default().to_string_lossy()
                );
            }
        }

        Commands::Compare { first, second } => {
            log::debug!(
                "Comparing {} and {} with {} (threshold {})",
                first.display(),
                second.display(),
                config.kind,
                config.threshold
            );

            let a = batch::hash_file(&first, &hasher)
                .with_context(|| format!("Failed to hash first image {}", first.display()))?;
            let b = batch::hash_file(&second, &hasher)
                .with_context(|| format!("Failed to hash second image {}", second.display()))?;
            let distance = a.distance(&b).context("Failed to calculate distance")?;
            let similar = config.is_similar(distance);

            println!("Distance: {distance}");
            println!(
                "Status: {} (threshold: {})",
                if similar { "similar" } else { "different" },
                config.threshold
            );
            if cli.global.verbose {
                println!("Hash 1: {}", a.to_binary_string());
                println!("Hash 2: {}", b.to_binary_string());
                println!("Hash type: {}", a.kind());
            }

            if !similar {
                return Ok(ExitCode::from(1));
            }
        }

        Commands::Batch {
            directory,
            output,
            recursive,
            extensions,
            duplicates,
            format,
            json,
        } => {
            let options = ScanOptions::new(recursive, &extensions);
            log::debug!(
                "Processing directory: {} (recursive: {}, extensions: {:?})",
                directory.display(),
                options.recursive,
                options.extensions
            );

            let images = scan_with_spinner(&directory, &options)?;
            if images.is_empty() {
                println!("No image files found");
                return Ok(ExitCode::SUCCESS);
            }

            let outcome = hash_with_progress(&images, &hasher)?;
            if !outcome.failures.is_empty() {
                eprintln!(
                    "⚠️  Skipped {} file(s) that could not be processed",
                    outcome.failures.len()
                );
            }

            if duplicates {
                let groups = benchmark("clustering", || {
                    cluster(outcome.records, config.threshold)
                });
                if json {
                    println!("{}", report::groups_json(&groups)?);
                } else {
                    print!("{}", report::render_groups_text(&groups));
                    if let Some(path) = output {
                        write_report(&path, |out| report::write_groups_csv(out, &groups, format))?;
                    }
                }
            } else if json {
                println!("{}", report::hashes_json(&outcome.records, format)?);
            } else if let Some(path) = output {
                write_report(&path, |out| {
                    report::write_hashes_csv(out, &outcome.records, format)
                })?;
            } else {
                print!("{}", report::render_hashes_text(&outcome.records, format));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Walk `dir` for image files behind a spinner.
fn scan_with_spinner(dir: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Scanning for images…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let images = scanner::find_image_files(dir, options)
        .with_context(|| format!("Failed to find image files in {}", dir.display()))?;
    spinner.finish_and_clear();
    log::info!("Found {} image file(s)", images.len());
    Ok(images)
}

fn hash_with_progress(images: &[PathBuf], hasher: &ImageHasher) -> Result<BatchOutcome> {
    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} hashing",
    )?);
    let outcome = benchmark("hashing all images", || {
        batch::hash_files(images, hasher, Some(&pb))
    });
    pb.finish_and_clear();
    Ok(outcome)
}

fn write_report<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out).with_context(|| format!("Failed to write CSV file {}", path.display()))?;
    out.flush()?;
    println!("Results written to: {}", path.display());
    Ok(())
}

/// Run `f()`, log how long it took (with `label`), and return its result.
fn benchmark<T, F: FnOnce() -> T>(label: &str, f: F) -> T {
    let start = Instant::now();
    let result = f();
    log::info!("⏱ {} took {:.2?}", label, start.elapsed());
    result
}
