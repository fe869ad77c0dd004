extern crate quip_core as quip;

use quip::CommandRecord;

pub fn main() {
    let record =
        CommandRecord::parse("spawn \"guard captain\" 3 #pos 10 20 #name \"Rex\"").unwrap();

    println!("command:  {}", record.command());
    println!("directs:  {:?}", record.dir_params());
    for (name, values) in record.params() {
        println!("#{}: {:?}", name, values);
    }
    println!("canonical: {}", record.formatted_text());
}
