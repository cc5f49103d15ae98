use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use postea_core::reader::{self, Document, ParserKind, clean};

fn synthetic_article(paragraphs: usize) -> String {
    let mut html = String::from(
        "<html><head><title>Bench Article</title></head><body>\
         <nav><a href=\"/a\">Home</a><a href=\"/b\">About</a></nav>\
         <article class=\"post-content\">",
    );
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Paragraph {i} of the benchmark article, with commas, clauses, and enough prose \
             to resemble the text volume of a typical saved page.</p>"
        ));
    }
    html.push_str("</article><div class=\"sidebar\"><a href=\"/x\">x</a></div></body></html>");
    html
}

fn bench_parse(c: &mut Criterion) {
    let small = synthetic_article(10);
    let medium = synthetic_article(100);
    let large = synthetic_article(1000);

    let mut group = c.benchmark_group("parse");
    for (name, html) in [("small", small.as_str()), ("medium", medium.as_str()), ("large", large.as_str())] {
        group.bench_with_input(BenchmarkId::new("document", name), &html, |b, html| {
            b.iter(|| Document::parse(black_box(html)))
        });
    }
    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let html = synthetic_article(100);

    c.bench_function("readability_extraction", |b| {
        b.iter(|| reader::parse_document(black_box(&html), ParserKind::Readability, None))
    });
    c.bench_function("density_extraction", |b| {
        b.iter(|| reader::parse_document(black_box(&html), ParserKind::Density, None))
    });
}

fn bench_preclean(c: &mut Criterion) {
    let html = synthetic_article(100);
    c.bench_function("preclean", |b| b.iter(|| clean::preclean_html(black_box(&html))));
}

fn bench_normalize(c: &mut Criterion) {
    let html = synthetic_article(100);
    c.bench_function("normalize_for_dispatch", |b| {
        b.iter(|| reader::normalize_for_dispatch(black_box(&html)))
    });
}

criterion_group!(benches, bench_parse, bench_extraction, bench_preclean, bench_normalize);
criterion_main!(benches);
