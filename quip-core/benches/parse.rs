use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quip_core::{analyze, parse_str, BbcodeFormatter, CommandRecord, Scratch};

const LINE: &'static str =
    "spawn \"guard captain\" 3 #pos 10 20 30 #name \"Rex\\nJr\" #hp 150";

const SCRIPT: &'static str = "\
// bench script
spawn \"guard\" #pos 10 20 // trailing comment
move 3 \\
     4
say \"line one\\nline two\"
";

criterion_group!(parsing, parse, parse_reused_scratch, join, highlight);
criterion_main!(parsing);

fn parse(c: &mut Criterion) {
    c.bench_function("parse", |b| {
        b.iter(|| black_box(CommandRecord::parse(LINE).unwrap()))
    });
}

fn parse_reused_scratch(c: &mut Criterion) {
    let mut scratch = Scratch::new();
    c.bench_function("parse_reused_scratch", |b| {
        b.iter(|| black_box(CommandRecord::parse_with(LINE, &mut scratch).unwrap()))
    });
}

fn join(c: &mut Criterion) {
    c.bench_function("join_script", |b| {
        b.iter(|| black_box(parse_str(SCRIPT).unwrap()))
    });
}

fn highlight(c: &mut Criterion) {
    c.bench_function("highlight", |b| {
        b.iter(|| black_box(analyze(LINE, &BbcodeFormatter)))
    });
}
