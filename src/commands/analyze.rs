use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::crash_monitor::{CrashAnalysis, CrashAnalyzer, ReportStore};
use crate::core::MonitorConfig;
use crate::ui::format_time;

/// Re-read a persisted report and print its stored analysis next to one
/// recomputed with the current rules.
pub fn execute(matches: &ArgMatches, config: &MonitorConfig) -> Result<()> {
    let path = matches
        .get_one::<PathBuf>("report")
        .context("Report path is required")?;

    let report = ReportStore::load(path)
        .with_context(|| format!("Failed to load crash report {}", path.display()))?;

    println!(
        "{}",
        format!(
            "Crash #{} at {}",
            report.crash_number,
            format_time(&report.crash_time)
        )
        .bold()
    );
    println!(
        "  {} event log entries, CPU {:.1}%, RAM {:.1}%",
        report.event_log_entries.len(),
        report.pre_crash_snapshot.cpu_percent,
        report.pre_crash_snapshot.memory.percent
    );
    println!();

    let analyzer = CrashAnalyzer::new(&config.security_service);
    let fresh = analyzer.analyze(&report.pre_crash_snapshot, &report.event_log_entries);

    print_analysis("Stored analysis", &report.quick_analysis);
    println!();
    print_analysis("Current analysis", &fresh);

    if fresh != report.quick_analysis {
        println!();
        println!("{}", "Analysis differs from the stored report".yellow());
    }

    Ok(())
}

fn print_analysis(title: &str, analysis: &CrashAnalysis) {
    println!("{}", title.cyan().bold());
    println!("  {}", "Issues:".bold());
    for issue in &analysis.issues {
        println!("    {}", issue.yellow());
    }
    println!("  {}", "Recommendations:".bold());
    for rec in &analysis.recommendations {
        println!("    • {}", rec);
    }
}
