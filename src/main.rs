use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tosknight_site::config::{self, Settings, SiteConfig};
use tosknight_site::{generate, output, scan};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "tosknight-site")]
#[command(about = "Static site generator for terms-of-service snapshot archives")]
#[command(long_about = "\
Static site generator for terms-of-service snapshot archives

The storage directory holds one subdirectory per tracked document. Each has
a .meta.yml naming the service, plus one file per captured snapshot:

  storage/
  ├── abc123/
  │   ├── .meta.yml                # name: GitHub Terms of Service
  │   │                            # url: https://help.github.com/...
  │   ├── 2017-10-27-13:16:35.md   # Backup at 2017-10-27-13:16:35
  │   └── latest.md                # Latest version
  └── def456/
      └── ...

The site project directory provides Jinja templates and receives the output:

  ui/
  ├── config.toml                  # Optional: site_url, source_url
  ├── templates/
  │   ├── index.jinja
  │   ├── source_item_template.jinja
  │   ├── source_index_template.jinja
  │   └── tutorial_template.jinja
  ├── tutorials/*.md               # Optional
  └── docs/                        # Generated

Run 'tosknight-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Root of the snapshot storage tree
    #[arg(long, env = "TOSKNIGHT_STORAGE_DIR", global = true)]
    storage_dir: Option<PathBuf>,

    /// Site project directory (templates in, docs out)
    #[arg(long, env = "TOSKNIGHT_UI_DIR", global = true)]
    ui_dir: Option<PathBuf>,

    /// Log every skipped file and written page
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the cover, every snapshot page, the source index and tutorials (default)
    Build,
    /// Validate the storage tree without writing anything
    Check,
    /// Print the storage manifest as JSON
    Scan,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays clean for summaries and JSON.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let settings = Settings::from_args(cli.storage_dir, cli.ui_dir)?;
            println!(
                "==> Building {} \u{2192} {}",
                settings.storage_dir.display(),
                settings.paths.docs.display()
            );
            let report = generate::generate(&settings)?;
            output::print_generate_output(&report, &settings.paths.docs);
            println!("==> Build complete: {}", settings.paths.docs.display());
        }
        Command::Check => {
            let storage_dir = config::require(cli.storage_dir, "storage-dir")?;
            let site = site_config(cli.ui_dir)?;
            println!("==> Checking {}", storage_dir.display());
            let manifest = scan::scan(&storage_dir, &site)?;
            output::print_scan_output(&manifest);
            println!("==> Storage is valid");
        }
        Command::Scan => {
            let storage_dir = config::require(cli.storage_dir, "storage-dir")?;
            let site = site_config(cli.ui_dir)?;
            let manifest = scan::scan(&storage_dir, &site)?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Site config from `--ui-dir` when given, stock defaults otherwise.
fn site_config(ui_dir: Option<PathBuf>) -> Result<SiteConfig, config::ConfigError> {
    match ui_dir.filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => config::load_config(&dir),
        None => Ok(SiteConfig::default()),
    }
}
