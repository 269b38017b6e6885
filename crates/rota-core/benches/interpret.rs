//! Benchmarks for model-answer interpretation.
//!
//! Run with: cargo bench -p rota-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rota_core::interpret::{normalize, parse_routes};
use rota_core::request::{build_prompt, PromptLanguage};

/// A fenced answer with `drivers` routes of `stops` stops each.
fn fenced_answer(drivers: u32, stops: u32) -> String {
    let routes: Vec<String> = (1..=drivers)
        .map(|d| {
            let route: Vec<String> = (1..=stops)
                .map(|s| {
                    format!(
                        r#"{{"stop":{s},"nome":"Cliente {d}-{s}","morada":"Rua {s}, Lisboa","caixas":{},"telefone":"91{d}{s:06}"}}"#,
                        s % 4 + 1
                    )
                })
                .collect();
            format!(r#"{{"driver":"Motorista {d}","route":[{}]}}"#, route.join(","))
        })
        .collect();
    format!("```json\n[{}]\n```", routes.join(","))
}

fn benchmark_normalize(c: &mut Criterion) {
    let answer = fenced_answer(4, 25);

    c.bench_function("normalize_fenced_100_stops", |b| {
        b.iter(|| {
            let _ = normalize(black_box(&answer));
        })
    });
}

fn benchmark_parse_routes(c: &mut Criterion) {
    let small = fenced_answer(2, 5);
    let large = fenced_answer(10, 40);

    c.bench_function("parse_routes_10_stops", |b| {
        b.iter(|| {
            let _ = parse_routes(black_box(&small));
        })
    });

    c.bench_function("parse_routes_400_stops", |b| {
        b.iter(|| {
            let _ = parse_routes(black_box(&large));
        })
    });
}

fn benchmark_build_prompt(c: &mut Criterion) {
    c.bench_function("build_prompt_10_drivers", |b| {
        b.iter(|| {
            let _ = build_prompt(PromptLanguage::Portuguese, black_box(10));
        })
    });
}

criterion_group!(
    benches,
    benchmark_normalize,
    benchmark_parse_routes,
    benchmark_build_prompt,
);
criterion_main!(benches);
