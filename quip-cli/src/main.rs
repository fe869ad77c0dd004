//! Command line program for working with `quip` command scripts.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

extern crate anyhow;
extern crate clap;
extern crate colored;
extern crate linefeed;

extern crate quip_core as quip;

pub mod cli;
pub mod repl;
pub mod run;

use colored::*;

fn main() {
    match cli::start(cli::app_matches()) {
        Ok(_) => (),
        Err(e) => {
            println!("{}{}", "error: ".red(), e);
            if e.root_cause().to_string() != e.to_string() {
                println!("Caused by:\n{}", e.root_cause())
            }
        }
    }
}
