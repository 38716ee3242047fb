use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use page_ruler::{
    Document, IndentHost, IndentMarker, IndentRuler, IndentUpdate, ParagraphIndent, PointerSample,
    RulerConfig, geometry::right_margin_at,
};

fn bench_page_ruler_transform(c: &mut Criterion) {
    c.bench_function("page_ruler/right_margin_10k_moves", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for x in 0..10_000 {
                sum += right_margin_at(black_box(x as f64 * 0.1), 0.0, 816.0, 200.0);
            }
            black_box(sum);
        })
    });
}

fn bench_indent_drag_with_writes(c: &mut Criterion) {
    let config = RulerConfig::default();
    let mut doc = Document::new();
    let mut keys = Vec::new();
    for i in 0..500 {
        keys.push(doc.push_paragraph(&format!("bullet point {i} with some resume text")));
    }
    doc.set_caret(keys[250], 3).unwrap();

    c.bench_function("indent_ruler/left_drag_100_moves", |b| {
        b.iter_batched(
            || (doc.clone(), IndentRuler::new(&config)),
            |(mut doc, mut ruler)| {
                ruler
                    .pointer_down(IndentMarker::Left, PointerSample::at(0.0, 0.0))
                    .unwrap();
                for x in 0..100 {
                    if let Some(IndentUpdate::Paragraph(indent)) =
                        ruler.pointer_move(PointerSample::at(x as f64, 0.0))
                    {
                        doc.write_active_paragraph_indent(indent).unwrap();
                    }
                }
                ruler.pointer_up(PointerSample::at(100.0, 0.0));
                black_box(doc.active_paragraph_indent());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_json_round_trip(c: &mut Criterion) {
    let mut doc = Document::new();
    for i in 0..200 {
        let key = doc.push_paragraph(&format!("line {i}"));
        if i % 2 == 0 {
            doc.upgrade_paragraph_for_indent(key).unwrap();
            doc.set_paragraph_indent(key, ParagraphIndent::new(24.0, -12.0, 8.0))
                .unwrap();
        }
    }

    c.bench_function("document/json_round_trip_200_blocks", |b| {
        b.iter(|| {
            let json = doc.to_json().unwrap();
            black_box(Document::from_json(black_box(&json)).unwrap());
        })
    });
}

criterion_group!(
    benches,
    bench_page_ruler_transform,
    bench_indent_drag_with_writes,
    bench_json_round_trip
);
criterion_main!(benches);
