mod logic;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use overlord_game::Engine;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    GameplayStrategy, PlayabilityAggregate, PlayabilityRecord, TesterContent,
    aggregate_playability, resolve_seed_inputs, run_playability_analysis, split_csv,
};

#[derive(Debug, Parser)]
#[command(name = "overlord-tester", version)]
#[command(about = "Headless autoplay and playability analysis for Duck Overlord")]
struct Args {
    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated integers or `a..b` / `a..=b` ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of runs per strategy and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Stop a reign that is still going after this many days
    #[arg(long, default_value_t = 60)]
    max_days: u32,

    /// JSON file overriding balance values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Print every decision as it is made
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    announce_banner(&args);

    let start_time = Instant::now();
    let strategies = expand_strategies(&args.strategies)?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let content = TesterContent::new(args.config.clone());
    let engine = Engine::from_loader(&content).with_context(|| match content.config_path() {
        Some(path) => format!("failed to load content with config {}", path.display()),
        None => "failed to load bundled content".to_string(),
    })?;

    let records = run_playability_analysis(
        &engine,
        &strategies,
        &seeds,
        args.iterations,
        args.max_days,
        args.verbose,
    );
    let aggregates = aggregate_playability(&records);

    write_reports(&args, &records, &aggregates, start_time)?;

    if aggregates.iter().any(|aggregate| aggregate.violations > 0) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner(args: &Args) {
    // Machine-readable reports on stdout stay clean.
    if args.output.is_none() && args.report != "console" {
        return;
    }
    println!("{}", "🦆 Duck Overlord Automated Tester".bright_cyan().bold());
    println!("{}", "=================================".cyan());
}

fn expand_strategies(raw: &str) -> Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for token in split_csv(raw) {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        match token.parse::<GameplayStrategy>() {
            Ok(strategy) => strategies.push(strategy),
            Err(err) => bail!("{err} (try --list-strategies)"),
        }
    }
    strategies.sort();
    strategies.dedup();
    if strategies.is_empty() {
        bail!("no strategies selected");
    }
    Ok(strategies)
}

fn write_reports(
    args: &Args,
    records: &[PlayabilityRecord],
    aggregates: &[PlayabilityAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, records, aggregates)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, aggregates)?,
        "csv" => logic::reports::generate_csv_report(&mut output_target, records)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                records,
                aggregates,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            strategies: "all".to_string(),
            list_strategies: false,
            seeds: "1".to_string(),
            iterations: 1,
            max_days: 3,
            config: None,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "overlord-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn expands_all_and_deduplicates() {
        let strategies = expand_strategies("greedy, all, greedy").unwrap();
        assert_eq!(strategies, GameplayStrategy::ALL.to_vec());
        assert_eq!(
            expand_strategies("populist").unwrap(),
            vec![GameplayStrategy::Populist]
        );
    }

    #[test]
    fn rejects_unknown_or_empty_strategies() {
        assert!(expand_strategies("reckless").is_err());
        assert!(expand_strategies(" , ").is_err());
    }

    #[test]
    fn maybe_list_strategies_returns_false_when_disabled() {
        assert!(!maybe_list_strategies(&base_args()).unwrap());
    }

    #[test]
    fn maybe_list_strategies_writes_output() {
        let path = temp_path("list");
        let args = Args {
            list_strategies: true,
            output: Some(path.clone()),
            ..base_args()
        };
        assert!(maybe_list_strategies(&args).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Available strategies"));
        assert!(content.contains("cautious"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn write_reports_emits_csv_file() {
        let path = temp_path("report.csv");
        let args = Args {
            report: "csv".to_string(),
            output: Some(path.clone()),
            ..base_args()
        };
        let engine = Engine::from_loader(&TesterContent::default()).unwrap();
        let records =
            run_playability_analysis(&engine, &[GameplayStrategy::Greedy], &[1], 1, 3, false);
        let aggregates = aggregate_playability(&records);
        write_reports(&args, &records, &aggregates, Instant::now()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.lines().nth(1).unwrap().starts_with("greedy,1,"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn output_target_stdout_writes() {
        let mut target = OutputTarget::new(None).unwrap();
        writeln!(target, "hello").unwrap();
        target.flush().unwrap();
    }
}
