use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::{PlayabilityAggregate, PlayabilityRecord};

#[derive(Serialize)]
struct JsonReport<'a> {
    aggregates: &'a [PlayabilityAggregate],
    runs: &'a [PlayabilityRecord],
}

pub fn generate_console_report<W: Write>(
    writer: &mut W,
    records: &[PlayabilityRecord],
    aggregates: &[PlayabilityAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Playability Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "======================".cyan())?;
    writeln!(writer, "Total runs: {}", records.len())?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for aggregate in aggregates {
        let status = if aggregate.violations == 0 {
            "✅".green()
        } else {
            "❌".red()
        };
        writeln!(writer, "{status} {}", aggregate.strategy.label().bold())?;
        writeln!(writer, "   Runs: {}", aggregate.iterations)?;
        writeln!(
            writer,
            "   Survival: {:.1}%  Victory: {:.1}%",
            aggregate.survival_rate * 100.0,
            aggregate.victory_rate * 100.0
        )?;
        writeln!(
            writer,
            "   Days: {:.1} ± {:.1}",
            aggregate.mean_days, aggregate.std_days
        )?;
        writeln!(
            writer,
            "   Coins at end: {:.1}  Peak planets: {:.2}  Wars: {:.2}  Rebellions: {:.2}",
            aggregate.mean_final_coins,
            aggregate.mean_peak_planets,
            aggregate.mean_wars,
            aggregate.mean_rebellions
        )?;
        let endings = aggregate
            .endings
            .iter()
            .map(|(ending, count)| format!("{ending} {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "   Endings: {endings}")?;
        if aggregate.violations > 0 {
            writeln!(
                writer,
                "   {}",
                format!("Invariant violations: {}", aggregate.violations).red()
            )?;
        }
        writeln!(writer)?;
    }

    let failing: Vec<&PlayabilityRecord> = records
        .iter()
        .filter(|record| !record.metrics.violations.is_empty())
        .collect();
    if !failing.is_empty() {
        writeln!(writer, "{}", "⚠️  Violations".bright_yellow().bold())?;
        for record in failing {
            for violation in &record.metrics.violations {
                writeln!(
                    writer,
                    "   • [{} seed {}] {}",
                    record.strategy,
                    record.seed,
                    violation.red()
                )?;
            }
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write>(
    writer: &mut W,
    records: &[PlayabilityRecord],
    aggregates: &[PlayabilityAggregate],
) -> Result<()> {
    let report = JsonReport {
        aggregates,
        runs: records,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(
    writer: &mut W,
    aggregates: &[PlayabilityAggregate],
) -> Result<()> {
    writeln!(writer, "# Duck Overlord Playability Report\n")?;
    if aggregates.is_empty() {
        writeln!(writer, "_No runs executed._")?;
        return Ok(());
    }

    writeln!(
        writer,
        "| Strategy | Runs | Survival | Victory | Mean days | Std days | Wars | Rebellions | Violations |"
    )?;
    writeln!(writer, "|---|---:|---:|---:|---:|---:|---:|---:|---:|")?;
    for aggregate in aggregates {
        writeln!(
            writer,
            "| {} | {} | {:.1}% | {:.1}% | {:.1} | {:.1} | {:.2} | {:.2} | {} |",
            aggregate.strategy,
            aggregate.iterations,
            aggregate.survival_rate * 100.0,
            aggregate.victory_rate * 100.0,
            aggregate.mean_days,
            aggregate.std_days,
            aggregate.mean_wars,
            aggregate.mean_rebellions,
            aggregate.violations
        )?;
    }

    writeln!(writer, "\n## Endings\n")?;
    for aggregate in aggregates {
        writeln!(writer, "### {}\n", aggregate.strategy)?;
        for (ending, count) in &aggregate.endings {
            writeln!(writer, "- **{ending}**: {count}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn generate_csv_report<W: Write>(writer: &mut W, records: &[PlayabilityRecord]) -> Result<()> {
    writeln!(
        writer,
        "strategy,seed,days_survived,ending,final_coins,final_happiness,final_rebellion,final_planets,peak_planets,wars_won,wars_lost,surrenders,rebellions,decisions,violations"
    )?;
    for record in records {
        let m = &record.metrics;
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            record.strategy.key(),
            record.seed,
            m.days_survived,
            m.ending,
            m.final_coins,
            m.final_happiness,
            m.final_rebellion,
            m.final_planets,
            m.peak_planets,
            m.wars_won,
            m.wars_lost,
            m.surrenders,
            m.rebellions,
            m.decisions,
            m.violations.len()
        )?;
    }
    Ok(())
}
