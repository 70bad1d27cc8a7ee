use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use crashwatch::commands;

fn build_cli() -> Command {
    Command::new("crashwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watches a game process and writes a post-mortem report when it crashes")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Config file to use instead of the default location")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("MS")
                .help("Poll interval in milliseconds (overrides config)")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .value_name("DIR")
                .help("Directory for activity logs and crash reports (overrides config)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("monitor")
                .about("Monitor the game and record crashes (TUI by default)")
                .arg(
                    Arg::new("headless")
                        .long("headless")
                        .help("Print the activity log to the console instead of the TUI")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("autostart")
                        .short('s')
                        .long("start")
                        .help("Start monitoring as soon as the TUI opens")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("snapshot").about("Take one system snapshot and print it as JSON"))
        .subcommand(
            Command::new("events")
                .about("Show recent application errors from the OS event log")
                .arg(
                    Arg::new("minutes")
                        .short('m')
                        .long("minutes")
                        .value_name("N")
                        .help("Look back this many minutes (default from config)")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("analyze")
                .about("Re-run the crash analysis on a saved report")
                .arg(
                    Arg::new("report")
                        .help("Path to a crash_report_*.json file")
                        .required(true)
                        .index(1)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("reports").about("List saved crash reports"))
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file (use 'crashwatch config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(
                    Command::new("init")
                        .about("Write a default configuration file")
                        .arg(
                            Arg::new("force")
                                .long("force")
                                .help("Overwrite an existing file")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("path").about("Print the configuration file path")),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => {
            // Logging is set up by the command once it knows where to send it
            let config = commands::load_config(sub_matches)?;
            commands::monitor::execute(sub_matches, config)?;
        }
        Some(("snapshot", sub_matches)) => {
            crashwatch::init_logging(None);
            commands::snapshot::execute(&commands::load_config(sub_matches)?)?;
        }
        Some(("events", sub_matches)) => {
            crashwatch::init_logging(None);
            commands::events::execute(sub_matches, &commands::load_config(sub_matches)?)?;
        }
        Some(("analyze", sub_matches)) => {
            crashwatch::init_logging(None);
            commands::analyze::execute(sub_matches, &commands::load_config(sub_matches)?)?;
        }
        Some(("reports", sub_matches)) => {
            crashwatch::init_logging(None);
            commands::reports::execute(&commands::load_config(sub_matches)?)?;
        }
        Some(("config", sub_matches)) => {
            crashwatch::init_logging(None);
            commands::config::execute(sub_matches)?;
        }
        Some(("version", _)) => {
            commands::version()?;
        }
        _ => {
            println!("Welcome to crashwatch!");
            println!("Use 'crashwatch monitor' to start, or 'crashwatch --help' for more information.");
        }
    }

    Ok(())
}
