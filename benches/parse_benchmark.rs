//! Benchmarks for unrtf parsing performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks parse synthetic RTF documents of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic RTF document with the given number of sections.
///
/// Each section holds a heading, a paragraph, a bullet list, a small table
/// and a picture, wrapped in the header groups Word writes.
fn create_test_rtf(section_count: usize) -> Vec<u8> {
    let mut content = String::new();

    content.push_str(r"{\rtf1\ansi\ansicpg1252\deff0");
    content.push_str(r"{\fonttbl{\f0\froman Times New Roman;}{\f1\fswiss Arial;}}");
    content.push_str(r"{\colortbl;\red0\green0\blue0;\red255\green0\blue0;}");
    content.push_str(r"{\stylesheet{\s0 Normal;}{\s1 heading 1;}}");
    content.push_str(r"{\info{\title Benchmark}{\author unrtf}}");

    for i in 0..section_count {
        content.push_str(&format!(
            r"\pard\s1\outlinelevel0 Section {}\par\pard ",
            i + 1
        ));
        content.push_str(
            r"Benchmark paragraph with {\b bold} and {\i italic} text, caf\'e9 and \u8212? dashes.\par ",
        );
        for item in ["Alpha", "Beta", "Gamma"] {
            content.push_str(&format!(
                r"{{\listtext\pard\plain \'b7\tab}}\ls1 {} item\par ",
                item
            ));
        }
        content.push_str(r"\pard\trowd\cellx2000\cellx4000 Name\cell Value\cell\row");
        content.push_str(r"\trowd\cellx2000\cellx4000 Width\cell 42\cell\row\pard ");
        content.push_str(r"{\*\shppict{\pict\pngblip\picw1\pich1 89504e470d0a1a0a0000000d49484452}}");
        content.push_str(r"{\nonshppict{\pict\wmetafile8 d7cdc69a00000000}}\par ");
    }

    content.push('}');
    content.into_bytes()
}

/// Benchmark RTF format detection.
fn bench_format_detection(c: &mut Criterion) {
    let rtf_data = create_test_rtf(1);
    let non_rtf_data = b"Not an RTF file at all, just random text content";

    c.bench_function("detect_valid_rtf", |b| {
        b.iter(|| unrtf::detect_format_from_bytes(black_box(&rtf_data)).unwrap());
    });

    c.bench_function("detect_non_rtf", |b| {
        b.iter(|| unrtf::detect_format_from_bytes(black_box(non_rtf_data)).is_err());
    });
}

/// Benchmark tokenizing alone.
fn bench_tokenizer(c: &mut Criterion) {
    let data = create_test_rtf(50);
    let text = String::from_utf8_lossy(&data).into_owned();

    c.bench_function("tokenize_50_sections", |b| {
        b.iter(|| unrtf::parser::Tokenizer::new(black_box(&text)).count());
    });
}

/// Benchmark RTF parsing at various sizes.
fn bench_rtf_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtf_parsing");

    for section_count in [1, 10, 100].iter() {
        let data = create_test_rtf(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| unrtf::parse_bytes(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the full bytes-to-atoms pipeline, including hashing.
fn bench_atom_extraction(c: &mut Criterion) {
    let data = create_test_rtf(10);
    let sha256_only =
        unrtf::ConvertOptions::new().with_hash(unrtf::HashOptions::sha256_only());

    c.bench_function("extract_atoms_10_sections", |b| {
        b.iter(|| unrtf::extract_atoms(black_box(&data)).unwrap());
    });

    c.bench_function("extract_atoms_10_sections_sha256", |b| {
        b.iter(|| unrtf::extract_atoms_with_options(black_box(&data), &sha256_only).unwrap());
    });
}

/// Benchmark builder pattern overhead.
fn bench_builder_creation(c: &mut Criterion) {
    c.bench_function("builder_creation", |b| {
        b.iter(|| {
            let _builder = unrtf::Unrtf::new()
                .strict()
                .with_chunking(unrtf::ChunkOptions::sliding(500, 250));
        });
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_tokenizer,
    bench_rtf_parsing,
    bench_atom_extraction,
    bench_builder_creation,
);
criterion_main!(benches);
