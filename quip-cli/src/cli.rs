//! Application definition.

extern crate simplelog;

use anyhow::Result;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("quip-cli")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .version(VERSION)
        .about("Parse, inspect and highlight quip command scripts from the command line.")
        .arg(Arg::with_name("verbosity")
            .long("verbosity")
            .short("v")
            .takes_value(true)
            .default_value("info")
            .value_name("verb")
            .global(true)
            .help("Set the verbosity of the log output"))

        // run subcommand
        .subcommand(SubCommand::with_name("run")
            .display_order(10)
            .about("Parse a command script and print the resulting records")
            .arg(Arg::with_name("path")
                .required(true)
                .value_name("path")
                .help("Path to the command script"))
            .arg(Arg::with_name("canonical")
                .display_order(0)
                .help("Print canonical formatted text instead of source text")
                .short("c")
                .long("canonical")))

        // repl subcommand
        .subcommand(SubCommand::with_name("repl")
            .display_order(20)
            .about("Start an interactive prompt with live syntax highlighting")
            .arg(Arg::with_name("config")
                .takes_value(true)
                .value_name("path")
                .default_value("./repl.toml")
                .long("config")
                .help("Specify path to the repl config file")))
}

pub fn app_matches() -> ArgMatches<'static> {
    app().get_matches()
}

pub fn start(matches: ArgMatches) -> Result<()> {
    match matches.subcommand() {
        ("run", Some(run_matches)) => crate::run::start(run_matches),
        ("repl", Some(repl_matches)) => crate::repl::start(repl_matches),
        _ => Ok(()),
    }
}

pub fn setup_log_verbosity(matches: &ArgMatches) {
    use self::simplelog::{LevelFilter, TermLogger};
    let level_filter = match matches.value_of("verbosity") {
        Some(s) => match s {
            "0" | "none" => LevelFilter::Off,
            "1" | "err" | "error" | "min" => LevelFilter::Error,
            "2" | "warn" | "warning" | "default" => LevelFilter::Warn,
            "3" | "info" => LevelFilter::Info,
            "4" | "debug" => LevelFilter::Debug,
            "5" | "trace" | "max" | "all" => LevelFilter::Trace,
            _ => LevelFilter::Warn,
        },
        _ => LevelFilter::Warn,
    };
    let mut config_builder = simplelog::ConfigBuilder::new();
    let logger_conf = config_builder
        .set_time_level(LevelFilter::Error)
        .set_target_level(LevelFilter::Debug)
        .set_location_level(LevelFilter::Error)
        .set_time_format_str("%H:%M:%S%.6f")
        .build();
    TermLogger::init(level_filter, logger_conf, simplelog::TerminalMode::Mixed);
}
