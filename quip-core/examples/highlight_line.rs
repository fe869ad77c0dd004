extern crate quip_core as quip;

use quip::{analyze, BbcodeFormatter};

pub fn main() {
    // live input, still missing the closing quote
    let analysis = analyze("spawn \"guard cap", &BbcodeFormatter);

    println!("{}", analysis.highlighted);
    println!("command so far: {:?}", analysis.matched_command);
    println!(
        "last match: {:?} ({:?})",
        analysis.last_match, analysis.last_kind
    );
}
