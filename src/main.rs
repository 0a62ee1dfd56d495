use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use deflist_lib::config::{CONFIG_FILE, Config, TransformConfig};
use deflist_lib::exit_codes::ExitStatus;
use deflist_lib::init::create_default_config;
use deflist_lib::mdast::Node;
use deflist_lib::parallel::FileParallelProcessor;
use deflist_lib::passes::{Prenormalizer, all_passes};
use deflist_lib::{Transformer, Variant, to_html};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Markdown files to convert. Reads standard input when none are given.
    #[arg(required = false)]
    paths: Vec<PathBuf>,

    /// Read the document from standard input
    #[arg(long, conflicts_with = "paths")]
    stdin: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Input format. JSON input is an mdast tree.
    #[arg(long, value_enum, default_value_t = InputFormat::Markdown)]
    input_format: InputFormat,

    /// Markdown source a JSON tree was parsed from
    #[arg(long)]
    source: Option<PathBuf>,

    /// Write output to a file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ignore configuration files
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Pipeline variant, overriding the configuration file
    #[arg(long, value_enum)]
    variant: Option<Variant>,

    /// Disable specific passes (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Command to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default .deflist.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List the passes and the variants that run them
    Passes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    Markdown,
    Json,
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run_init(force: bool, quiet: bool) -> ! {
    let path = Path::new(CONFIG_FILE);
    match create_default_config(path, force) {
        Ok(true) => {
            if !quiet {
                println!("Created {CONFIG_FILE}");
            }
            ExitStatus::Success.exit();
        }
        Ok(false) => {
            eprintln!(
                "{}: {CONFIG_FILE} already exists. Use --force to overwrite it",
                "Error".red().bold()
            );
            ExitStatus::ToolError.exit();
        }
        Err(e) => {
            eprintln!("{}: {e}", "Error".red().bold());
            ExitStatus::ToolError.exit();
        }
    }
}

fn list_passes() -> Result<()> {
    let variant_sets = [Variant::Basic, Variant::Advanced]
        .into_iter()
        .map(|variant| {
            let config = Config {
                transform: TransformConfig {
                    variant,
                    disable: Vec::new(),
                },
                ..Config::default()
            };
            Transformer::new(&config).map(|t| (variant, t.stage_names()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let prenormalizer = Prenormalizer::default();
    let mut rows = vec![(prenormalizer.name(), prenormalizer.description())];
    rows.extend(all_passes().iter().map(|pass| (pass.name(), pass.description())));

    for (name, description) in rows {
        let variants: Vec<&str> = variant_sets
            .iter()
            .filter(|(_, stages)| stages.contains(&name))
            .map(|(variant, _)| variant.as_str())
            .collect();
        println!("{name:<16} {:<16} {description}", variants.join(", "));
    }
    Ok(())
}

/// Read every input as `(display name, content)`. Unreadable files are reported and skipped.
fn read_inputs(cli: &Cli, failed: &mut bool) -> Result<Vec<(String, String)>> {
    if cli.stdin || cli.paths.is_empty() {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read standard input")?;
        return Ok(vec![("<stdin>".to_string(), content)]);
    }

    let mut inputs = Vec::with_capacity(cli.paths.len());
    for path in &cli.paths {
        match fs::read_to_string(path) {
            Ok(content) => inputs.push((path.display().to_string(), content)),
            Err(e) => {
                eprintln!("{}: {}: {e}", "Error".red().bold(), path.display());
                *failed = true;
            }
        }
    }
    Ok(inputs)
}

fn convert(
    transformer: &Transformer,
    cli: &Cli,
    json_source: &str,
    content: &str,
) -> Result<String, deflist_lib::Error> {
    let tree = match cli.input_format {
        InputFormat::Markdown => transformer.process(content)?,
        InputFormat::Json => {
            let tree: Node = serde_json::from_str(content)?;
            transformer.transform(tree, json_source)?
        }
    };
    Ok(match cli.format {
        OutputFormat::Html => to_html(&tree),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&tree)?;
            json.push('\n');
            json
        }
    })
}

/// Returns whether every input was converted.
fn run(cli: &Cli) -> Result<bool> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let config = Config::resolve(cli.config.as_deref(), cli.no_config, &cwd)?.with_overrides(cli.variant, &cli.disable);
    let transformer = Transformer::new(&config)?;
    log::debug!("Running stages: {}", transformer.stage_names().join(" -> "));

    let json_source = match &cli.source {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read source {}", path.display()))?,
        None => String::new(),
    };

    let mut failed = false;
    let inputs = read_inputs(cli, &mut failed)?;
    let results = FileParallelProcessor::with_default_config()
        .process_files(&inputs, |_, content| convert(&transformer, cli, &json_source, content));

    let mut output = String::new();
    for (name, result) in results {
        match result {
            Ok(rendered) => output.push_str(&rendered),
            Err(e) => {
                eprintln!("{}: {name}: {e}", "Error".red().bold());
                failed = true;
            }
        }
    }

    match &cli.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes()).context("Failed to write output")?;
            stdout.flush().context("Failed to write output")?;
        }
    }

    Ok(!failed)
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Some(Commands::Init { force }) => run_init(force, cli.quiet),
        Some(Commands::Passes) => {
            if let Err(e) = list_passes() {
                eprintln!("{}: {e:#}", "Error".red().bold());
                ExitStatus::ToolError.exit();
            }
            ExitStatus::Success.exit();
        }
        None => {}
    }

    match run(&cli) {
        Ok(all_converted) => ExitStatus::from_conversion(all_converted).exit(),
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            ExitStatus::ToolError.exit();
        }
    }
}
