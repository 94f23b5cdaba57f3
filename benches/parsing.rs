//! Benchmarks for convosift detection, parsing, and chunking.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench parsing -- whatsapp`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use convosift::assembler::ConversationAssembler;
use convosift::chunker::{ChunkOptions, EmbeddingOptions, chunk_conversation, embedding_items};
use convosift::conversation::ImportMeta;
use convosift::detect::FormatDetector;
use convosift::parsers::{
    GenericParser, SlackParser, TeamsParser, TranscriptParser, WhatsAppParser,
};

// =============================================================================
// Test Data Generators
// =============================================================================

const SENDERS: &[&str] = &["Alice", "Bob", "Carol"];

fn generate_whatsapp_txt(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let sender = SENDERS[i % SENDERS.len()];
        let hour = i % 24;
        let minute = i % 60;
        lines.push(format!(
            "15/01/2024, {:02}:{:02} - {}: Message number {}",
            hour, minute, sender, i
        ));
    }
    lines.join("\n")
}

fn generate_slack_json(count: usize) -> String {
    let mut messages = Vec::with_capacity(count);
    for i in 0..count {
        let user = ["U01ALICE", "U02BOB"][i % 2];
        let ts = 1_705_314_600 + i as i64 * 60;
        messages.push(format!(
            r#"{{"type": "message", "user": "{}", "text": "Message number {}", "ts": "{}.000000"}}"#,
            user, i, ts
        ));
    }
    format!("[{}]", messages.join(",\n"))
}

fn generate_slack_paste(count: usize) -> String {
    let mut lines = Vec::with_capacity(count * 2);
    for i in 0..count {
        let sender = ["alice", "bob"][i % 2];
        lines.push(format!("{}  {}:{:02} PM", sender, 1 + i % 11, i % 60));
        lines.push(format!("Message number {}", i));
    }
    lines.join("\n")
}

fn generate_teams_paste(count: usize) -> String {
    let mut lines = Vec::with_capacity(count * 2);
    for i in 0..count {
        let sender = ["Alice Johnson", "Bob Smith"][i % 2];
        lines.push(format!(
            "{}  15/01/2024 {:02}:{:02}",
            sender,
            i % 24,
            i % 60
        ));
        lines.push(format!("Message number {}", i));
    }
    lines.join("\n")
}

fn generate_generic_txt(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let sender = SENDERS[i % SENDERS.len()];
        lines.push(format!("{}: Message number {}", sender, i));
    }
    lines.join("\n")
}

// =============================================================================
// Detection Benchmarks
// =============================================================================

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("detection");
    let detector = FormatDetector::new();

    // Detection samples a bounded number of lines, so document size
    // should barely matter
    for size in [100_usize, 10_000, 100_000] {
        let txt = generate_whatsapp_txt(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(detector.detect(black_box(txt))));
        });
    }
    group.finish();
}

// =============================================================================
// Parsing Benchmarks
// =============================================================================

fn bench_whatsapp_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("whatsapp_parsing");
    let parser = WhatsAppParser::new();

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let txt = generate_whatsapp_txt(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(parser.parse(black_box(txt))));
        });
    }
    group.finish();
}

fn bench_slack_json_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("slack_json_parsing");
    let parser = SlackParser::new();

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let json = generate_slack_json(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| black_box(parser.parse(black_box(json))));
        });
    }
    group.finish();
}

fn bench_slack_paste_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("slack_paste_parsing");
    let parser = SlackParser::new();

    for size in [100_usize, 1_000, 10_000] {
        let txt = generate_slack_paste(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(parser.parse(black_box(txt))));
        });
    }
    group.finish();
}

fn bench_teams_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("teams_parsing");
    let parser = TeamsParser::new();

    for size in [100_usize, 1_000, 10_000] {
        let txt = generate_teams_paste(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(parser.parse(black_box(txt))));
        });
    }
    group.finish();
}

fn bench_generic_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("generic_parsing");
    let parser = GenericParser::new();

    for size in [100_usize, 1_000, 10_000, 50_000] {
        let txt = generate_generic_txt(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| black_box(parser.parse(black_box(txt))));
        });
    }
    group.finish();
}

// =============================================================================
// Chunking Benchmarks
// =============================================================================

fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunking");
    let assembler = ConversationAssembler::new();

    for size in [100_usize, 1_000, 10_000] {
        let txt = generate_whatsapp_txt(size);
        let result = assembler.parse(&txt, Some("whatsapp"));
        let conversation = assembler.create_conversation(result, ImportMeta::new());

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &conversation,
            |b, conversation| {
                b.iter(|| {
                    let chunks =
                        chunk_conversation(black_box(conversation), &ChunkOptions::default())
                            .unwrap();
                    black_box(chunks)
                });
            },
        );
    }
    group.finish();
}

// =============================================================================
// End-to-End Pipeline Benchmark
// =============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let assembler = ConversationAssembler::new();

    for size in [1_000_usize, 10_000] {
        let txt = generate_whatsapp_txt(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &txt, |b, txt| {
            b.iter(|| {
                // Full pipeline: detect -> parse -> assemble -> embed
                let result = assembler.parse(black_box(txt), None);
                let conversation = assembler.create_conversation(result, ImportMeta::new());
                let items =
                    embedding_items(&[conversation], &EmbeddingOptions::default()).unwrap();
                black_box(items)
            });
        });
    }
    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_detection,
    bench_whatsapp_parsing,
    bench_slack_json_parsing,
    bench_slack_paste_parsing,
    bench_teams_parsing,
    bench_generic_parsing,
    bench_chunking,
    bench_full_pipeline,
);

criterion_main!(benches);
