//! Benchmark tests for marquee-core operations
//!
//! Run with: cargo bench -p marquee-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use marquee_core::{extract_video_id, Catalog, ResolvedStream, StreamDescriptor};

// ============================================================================
// Helpers
// ============================================================================

fn create_test_catalog(items: usize) -> String {
    let categories = ["News", "Movies", "Sports", "Kids", "Music"];
    let entries: Vec<String> = (0..items)
        .map(|i| {
            let category = categories[i % categories.len()];
            match i % 3 {
                0 => format!(
                    r#"{{"name":"Channel {i}","logo":"{i}.png","category":"{category}","type":"hls","stream":{{"type":"hls","url":"https://cdn.example.com/{i}/index.m3u8"}}}}"#
                ),
                1 => format!(
                    r#"{{"name":"Film {i}","logo":"{i}.png","category":"{category}","type":"mp4","stream":{{"type":"mp4","url":"https://cdn.example.com/{i}.mp4"}}}}"#
                ),
                _ => format!(
                    r#"{{"name":"Show {i}","logo":"{i}.png","category":"{category}","type":"series","seasons":[{{"season":1,"episodes":[{{"title":"Pilot","type":"youtube","url":"https://youtu.be/dQw4w9WgXcQ"}}]}}]}}"#
                ),
            }
        })
        .collect();
    format!("[{}]", entries.join(","))
}

// ============================================================================
// Locator Benchmarks
// ============================================================================

fn bench_locator(c: &mut Criterion) {
    let mut group = c.benchmark_group("locator");

    let locators = [
        ("watch", "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
        ("short", "https://youtu.be/dQw4w9WgXcQ"),
        ("miss", "https://example.com/some/long/path/without/any/identifier/clip"),
    ];

    for (name, locator) in locators {
        group.bench_with_input(BenchmarkId::new("extract_video_id", name), &locator, |b, l| {
            b.iter(|| extract_video_id(black_box(l)))
        });
    }

    let descriptor = StreamDescriptor::embedded("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    group.bench_function("resolve_embedded", |b| {
        b.iter(|| ResolvedStream::resolve(black_box(&descriptor)))
    });

    group.finish();
}

// ============================================================================
// Catalog Benchmarks
// ============================================================================

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");

    for size in [50, 500] {
        let json = create_test_catalog(size);
        group.bench_with_input(BenchmarkId::new("parse", size), &json, |b, json| {
            b.iter(|| Catalog::from_json(black_box(json)))
        });

        let catalog = Catalog::from_json(&json).unwrap();
        group.bench_with_input(BenchmarkId::new("group_by_category", size), &catalog, |b, c| {
            b.iter(|| black_box(c.group_by_category().len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_locator, bench_catalog);
criterion_main!(benches);
