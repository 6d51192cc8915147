// Tue Jan 13 2026 - Alex

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use class_informer::{
    config::{Config, GraphFormat},
    graph::{DotExporter, GraphFilter, JsonExporter},
    memory::{BinaryImage, MemoryImage},
    rtti::{recover, RecoveryReport},
    symbol::SymbolTable,
    utils::{format_bytes, format_duration, measure_time, pluralize, LoggingUtils},
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Dot,
    Json,
}

impl From<FormatArg> for GraphFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Dot => GraphFormat::Dot,
            FormatArg::Json => GraphFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Recovers C++ class hierarchies from GCC RTTI", long_about = None)]
struct Args {
    /// ELF binary to analyse
    binary: PathBuf,

    /// Graph output path, defaults to <binary name>.<format>
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Class name prefix to leave out of the graph; repeatable
    #[arg(long = "ignore", value_name = "PREFIX")]
    ignore: Vec<String>,

    #[arg(long)]
    no_graph: bool,

    /// JSON configuration file; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(long)]
    no_progress: bool,
}

fn main() {
    let args = Args::parse();
    LoggingUtils::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = build_config(args)?;

    println!("{}", "Class Informer".cyan().bold());
    println!("{}", "=".repeat(50).cyan());
    println!();

    println!("{} Loading binary: {}", "[*]".blue(), args.binary.display());
    let (binary, load_time) =
        measure_time(|| BinaryImage::load_with_limit(&args.binary, config.region_size_limit));
    let binary = binary.with_context(|| format!("Failed to load {}", args.binary.display()))?;
    println!(
        "{} Loaded {} ({}) in {}",
        "[+]".green(),
        pluralize(binary.snapshot().regions().len(), "region", "regions"),
        format_bytes(binary.snapshot().total_size()),
        format_duration(load_time)
    );

    let (snapshot, symbols) = binary.into_parts();
    let table = SymbolTable::from_symbols(&symbols);

    let spinner = spinner(args.no_progress, "Recovering RTTI...");
    let ((mut report, _), elapsed) =
        measure_time(|| recover(&snapshot, table, config.parse_limits()));
    spinner.finish_and_clear();

    println!(
        "{} Found {} in {}",
        "[+]".green(),
        pluralize(report.class_count(), "class", "classes"),
        format_duration(elapsed)
    );
    print_stats(&report);

    if !config.generate_graph {
        return Ok(());
    }
    let Some(output) = config.output_path.as_deref() else {
        return Ok(());
    };

    let filter = GraphFilter::new(config.ignored_prefixes.iter().cloned());
    let visible = filter.apply(&mut report.registry);

    let written = match config.format {
        GraphFormat::Dot => DotExporter::new().export_to_file(&report.registry, output),
        GraphFormat::Json => {
            JsonExporter::new().export_to_file(&report.registry, Some(&report.stats), output)
        }
    };
    written.with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Wrote {} to {}",
        "[+]".green(),
        pluralize(visible, "class", "classes"),
        output.display()
    );
    Ok(())
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(format) = args.format {
        config.format = format.into();
    }
    if !args.ignore.is_empty() {
        config.ignored_prefixes = args.ignore.clone();
    }
    if args.no_graph {
        config.generate_graph = false;
    }
    if let Some(output) = &args.output {
        config.output_path = Some(output.clone());
    } else if config.generate_graph && config.output_path.is_none() {
        config.output_path = Some(default_output(&args.binary, config.format));
    }

    config.validate()?;
    Ok(config)
}

fn default_output(binary: &Path, format: GraphFormat) -> PathBuf {
    let stem = binary
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "classes".to_string());
    PathBuf::from(format!("{}.{}", stem, format.extension()))
}

fn spinner(hidden: bool, message: &str) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_stats(report: &RecoveryReport) {
    let stats = &report.stats;
    println!("    {} {}", "type_info kinds:".dimmed(), stats.type_infos_found);
    println!(
        "    {} {} simple, {} single, {} multiple",
        "records:".dimmed(),
        stats.no_base,
        stats.single_base,
        stats.multi_base
    );
    if stats.named_from_symbols > 0 {
        println!("    {} {}", "named from symbols:".dimmed(), stats.named_from_symbols);
    }
    if stats.missing_vtables > 0 || stats.malformed_records > 0 {
        println!(
            "{} {} without vtable, {} malformed",
            "[!]".yellow(),
            stats.missing_vtables,
            stats.malformed_records
        );
    }
}
