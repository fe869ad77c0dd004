//! Non-interactive script runner.

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use clap::ArgMatches;

pub fn start(matches: &ArgMatches) -> Result<()> {
    crate::cli::setup_log_verbosity(matches);

    let path = matches.value_of("path").unwrap_or("./");
    let file =
        File::open(path).with_context(|| format!("failed opening command script: {}", path))?;
    let records = quip::read_records(BufReader::new(file))?;
    info!("parsed {} records from {}", records.len(), path);

    for record in &records {
        if matches.is_present("canonical") {
            println!("{}", record.formatted_text());
        } else {
            println!("{}", record);
        }
    }

    Ok(())
}
