use clap::{Parser, Subcommand};
use photopress::{config, output, process};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Shared flags for commands that read a source directory.
///
/// Every flag overrides the corresponding `photopress.toml` value; absent
/// flags leave the config (or its defaults) in place.
#[derive(clap::Args, Clone)]
struct ProcessArgs {
    /// Config file (default: photopress.toml in the source directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bounding box width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Bounding box height in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// JPEG quality, 1-100
    #[arg(long)]
    quality: Option<u32>,

    /// Output format: jpeg, png, or webp
    #[arg(long, value_parser = config::OutputFormat::parse)]
    format: Option<config::OutputFormat>,

    /// Destination name pattern ({date}, {counter}, {folder}, {orig})
    #[arg(long)]
    pattern: Option<String>,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Replace existing destination files
    #[arg(long)]
    overwrite: bool,

    /// Maximum parallel workers (capped at CPU cores)
    #[arg(long)]
    threads: Option<usize>,
}

impl ProcessArgs {
    /// Load the layered config: defaults ← file ← these flags.
    fn resolve(&self, source: &std::path::Path) -> Result<config::RunConfig, config::ConfigError> {
        let mut cfg = config::load_config(self.config.as_deref(), source)?;
        if let Some(w) = self.max_width {
            cfg.max_width = w;
        }
        if let Some(h) = self.max_height {
            cfg.max_height = h;
        }
        if let Some(q) = self.quality {
            cfg.quality = q;
        }
        if let Some(f) = self.format {
            cfg.format = f;
        }
        if let Some(ref p) = self.pattern {
            cfg.rename.pattern = p.clone();
        }
        if self.no_recursive {
            cfg.recursive = false;
        }
        if self.overwrite {
            cfg.overwrite = true;
        }
        if let Some(t) = self.threads {
            cfg.processing.max_threads = Some(t);
        }
        // Flags can introduce bad values just like the file can
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Parser)]
#[command(name = "photopress")]
#[command(about = "Batch photo processor: rename by date, resize, re-encode")]
#[command(long_about = "\
Batch photo processor: rename by date, resize, re-encode

Point it at a directory of photos and it writes processed copies to a
destination directory. Each photo is renamed after its capture date (EXIF
when present, file mtime otherwise), shrunk to fit a bounding box, and
re-encoded at a configured quality and format. Sources are never modified.

  photopress check ~/photos              preview the planned renames
  photopress run ~/photos ~/processed    do it

Defaults: 800x600 bounding box, JPEG at quality 70, recursive scan,
pattern \"{date}_{counter}\". Drop a photopress.toml into the source
directory (see 'photopress gen-config') or use flags to override.

Exit codes: 0 all photos processed, 1 some photos failed, 2 fatal error.")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process photos from a source directory into a destination directory
    Run {
        /// Directory of photos to process (read-only)
        source: PathBuf,
        /// Directory for processed photos (created if missing)
        dest: PathBuf,
        #[command(flatten)]
        args: ProcessArgs,
        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Preview the renames a run would perform, without touching anything
    Check {
        /// Directory of photos to process (read-only)
        source: PathBuf,
        #[command(flatten)]
        args: ProcessArgs,
    },
    /// Print a stock photopress.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run_cli() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            source,
            dest,
            args,
            report,
        } => {
            let cfg = args.resolve(&source)?;
            init_thread_pool(&cfg.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_process_event(&event);
                }
            });
            let summary = process::run(&source, &dest, &cfg, &tx)?;
            drop(tx);
            printer.join().unwrap();

            output::print_run_summary(&summary);
            if let Some(report_path) = report {
                let json = serde_json::to_string_pretty(&summary)?;
                std::fs::write(&report_path, json)?;
            }

            Ok(if summary.all_succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Check { source, args } => {
            let cfg = args.resolve(&source)?;
            let planned = process::plan(&source, &cfg)?;
            output::print_check_output(&planned, &source);
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
