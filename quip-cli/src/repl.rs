//! Interactive prompt with live syntax highlighting.
//!
//! Reads lines through `linefeed`, echoes each one back highlighted (using
//! an ANSI implementation of the library's `ColorFormatter` capability) and
//! prints a short summary of the parsed record.

use std::fs;
use std::io;

use anyhow::Result;
use clap::ArgMatches;
use colored::*;
use linefeed::{Interface, ReadResult};

use quip::{analyze, ColorFormatter, ColorKind, CommandRecord, MatchKind, Scratch};

pub const CONFIG_FILE: &str = "repl.toml";

/// Serializable configuration for the interactive prompt.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_true")]
    pub highlight_on: bool,
    #[serde(default = "default_true")]
    pub show_params: bool,
}

fn default_prompt() -> String {
    "quip> ".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    fn new() -> Config {
        Config {
            prompt: default_prompt(),
            highlight_on: true,
            show_params: true,
        }
    }

    fn new_from_file(path: &str) -> Result<Config, io::Error> {
        let file_str = fs::read_to_string(path)?;
        match toml::from_str(&file_str) {
            Ok(c) => Ok(c),
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
        }
    }
}

/// ANSI terminal implementation of the color capability.
pub struct AnsiFormatter;

impl ColorFormatter for AnsiFormatter {
    fn color_head(&self, kind: ColorKind) -> String {
        use ansi_term::Colour;
        let style = match kind {
            ColorKind::Command => Colour::Yellow.bold(),
            ColorKind::Param => Colour::Cyan.normal(),
            ColorKind::Str => Colour::Green.normal(),
            ColorKind::ParamName => Colour::Purple.normal(),
            ColorKind::Escape => Colour::Red.normal(),
        };
        style.prefix().to_string()
    }

    fn color_tail(&self) -> String {
        "\u{1b}[0m".to_string()
    }
}

pub fn start(matches: &ArgMatches) -> Result<()> {
    crate::cli::setup_log_verbosity(matches);

    // try loading config from file, else get a new default one
    let config_path = matches.value_of("config").unwrap_or(CONFIG_FILE);
    let config = match Config::new_from_file(config_path) {
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                Config::new()
            } else {
                eprintln!(
                    "There was a problem parsing the config file, loading default config settings ({})",
                    e
                );
                Config::new()
            }
        }
        Ok(c) => {
            println!("Loading config settings from file (found {})", config_path);
            c
        }
    };

    let interface = Interface::new("quip")?;
    interface.set_prompt(&config.prompt)?;
    println!("quip repl, type a command line or \"quit\" to leave");

    let formatter = AnsiFormatter;
    let mut scratch = Scratch::new();

    while let ReadResult::Input(line) = interface.read_line()? {
        if line.trim().is_empty() {
            continue;
        }
        match line.trim() {
            "quit" | "exit" => break,
            _ => (),
        }
        interface.add_history_unique(line.clone());

        if config.highlight_on {
            let analysis = analyze(&line, &formatter);
            println!("{}", analysis.highlighted);
            if analysis.last_kind == MatchKind::ParamName {
                debug!("open parameter name: {}", analysis.last_match);
            }
        }

        let record = CommandRecord::parse_with(&line, &mut scratch)?;
        print_record(&record, &config);
    }

    Ok(())
}

fn print_record(record: &CommandRecord, config: &Config) {
    if record.command().is_empty() {
        println!("{}", "no command name".dimmed());
    } else {
        println!("{} {}", "command:".dimmed(), record.command());
    }
    if !config.show_params {
        return;
    }
    if !record.dir_params().is_empty() {
        println!("{} {:?}", "directs:".dimmed(), record.dir_params());
    }
    for (name, values) in record.params() {
        println!("{}{}: {:?}", "#".dimmed(), name, values);
    }
}
