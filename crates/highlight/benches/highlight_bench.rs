use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dom::{Document, DomRange, NodeId};
use dom_test_support::range_from_text_offsets;
use highlight::{WrapperSpec, highlight_range, text_nodes_in_range};

const SMALL_PARAGRAPHS: usize = 16;
const LARGE_PARAGRAPHS: usize = 2_000;

fn make_paragraphs(count: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    let body = doc.create_element("div");
    doc.append_child(doc.root(), body).unwrap();
    for i in 0..count {
        let p = doc.create_element("p");
        let lead = doc.create_text(format!("paragraph {i} "));
        let em = doc.create_element("em");
        let word = doc.create_text("emphasis");
        let tail = doc.create_text(" and a tail");
        doc.append_child(body, p).unwrap();
        doc.append_child(p, lead).unwrap();
        doc.append_child(p, em).unwrap();
        doc.append_child(em, word).unwrap();
        doc.append_child(p, tail).unwrap();
    }
    (doc, body)
}

/// Range from the middle of the first paragraph to the middle of the last.
fn spanning_range(doc: &Document, body: NodeId) -> DomRange {
    let text = doc.text_content(body).unwrap();
    range_from_text_offsets(doc, body, 4, text.len() - 4)
}

fn bench_segment_large(c: &mut Criterion) {
    let (doc, body) = make_paragraphs(LARGE_PARAGRAPHS);
    let range = spanning_range(&doc, body);
    c.bench_function("bench_segment_large", |b| {
        b.iter_batched(
            || (doc.clone(), range),
            |(mut doc, mut range)| {
                let nodes = text_nodes_in_range(&mut doc, black_box(&mut range)).unwrap();
                black_box(nodes.len());
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_apply_remove_small(c: &mut Criterion) {
    let (doc, body) = make_paragraphs(SMALL_PARAGRAPHS);
    let range = spanning_range(&doc, body);
    c.bench_function("bench_apply_remove_small", |b| {
        b.iter_batched(
            || (doc.clone(), range),
            |(mut doc, mut range)| {
                let highlight = highlight_range(&mut doc, &mut range, WrapperSpec::default())
                    .unwrap()
                    .unwrap();
                highlight.remove(&mut doc, &mut range).unwrap();
                black_box(doc.live_count());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_apply_large(c: &mut Criterion) {
    let (doc, body) = make_paragraphs(LARGE_PARAGRAPHS);
    let range = spanning_range(&doc, body);
    c.bench_function("bench_apply_large", |b| {
        b.iter_batched(
            || (doc.clone(), range),
            |(mut doc, mut range)| {
                let highlight = highlight_range(&mut doc, &mut range, WrapperSpec::tag("mark"))
                    .unwrap()
                    .unwrap();
                black_box(highlight.len());
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_segment_large,
    bench_apply_remove_small,
    bench_apply_large
);
criterion_main!(benches);
