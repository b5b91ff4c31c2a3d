use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rda::{from_slice, from_str, to_string, to_vec, Compression, Rda, RdaOptions, RdaSerializable, Result};

#[derive(Clone, Default)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

impl RdaSerializable for Product {
    fn write_slots(&self, rda: &mut Rda, offset: usize) -> usize {
        rda.set_value_at(offset, self.sku.as_str());
        rda.set_value_at(offset + 1, self.name.as_str());
        rda.child_mut(offset + 2).set_display(&self.price);
        rda.child_mut(offset + 3).set_display(&self.quantity);
        offset + 4
    }

    fn read_slots(&mut self, rda: &Rda, offset: usize) -> Result<usize> {
        self.sku = rda.value_at(offset)?.to_string();
        self.name = rda.value_at(offset + 1)?.to_string();
        self.price = rda[offset + 2].parse_value()?;
        self.quantity = rda[offset + 3].parse_value()?;
        Ok(offset + 4)
    }
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {} | [boxed]", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

/// A complete tree with `fanout` children per node down to `depth`.
fn wide_tree(fanout: usize, depth: usize) -> Rda {
    let mut rda = Rda::leaf(format!("level {}", depth));
    if depth > 0 {
        for i in 0..fanout {
            rda.set_child(i, wide_tree(fanout, depth - 1));
        }
    }
    rda
}

fn benchmark_encode_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_text");

    for depth in [2, 4, 6].iter() {
        let tree = wide_tree(4, *depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tree, |b, tree| {
            b.iter(|| black_box(tree).to_text())
        });
    }
    group.finish();
}

fn benchmark_parse_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_text");

    for depth in [2, 4, 6].iter() {
        let text = wide_tree(4, *depth).to_text().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(depth), &text, |b, text| {
            b.iter(|| Rda::parse(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary");
    let tree = wide_tree(4, 5);
    let lz4 = RdaOptions::new().with_compression(Compression::Lz4);

    group.bench_function("encode", |b| b.iter(|| black_box(&tree).to_bytes()));
    group.bench_function("encode_lz4", |b| {
        b.iter(|| black_box(&tree).to_bytes_with_options(&lz4))
    });

    let plain = tree.to_bytes().unwrap();
    let compressed = tree.to_bytes_with_options(&lz4).unwrap();

    group.bench_function("decode", |b| b.iter(|| Rda::from_bytes(black_box(&plain))));
    group.bench_function("decode_lz4", |b| {
        b.iter(|| Rda::from_bytes_with_options(black_box(&compressed), &lz4))
    });

    group.finish();
}

fn benchmark_objects(c: &mut Criterion) {
    let mut group = c.benchmark_group("objects");

    for size in [10, 100, 500].iter() {
        let items = products(*size);
        let text = to_string(&items).unwrap();
        let bytes = to_vec(&items).unwrap();

        group.bench_with_input(BenchmarkId::new("to_string", size), &items, |b, items| {
            b.iter(|| to_string(black_box(items)))
        });
        group.bench_with_input(BenchmarkId::new("from_str", size), &text, |b, text| {
            b.iter(|| from_str::<Vec<Product>>(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("from_slice", size), &bytes, |b, bytes| {
            b.iter(|| from_slice::<Vec<Product>>(black_box(bytes)))
        });
    }
    group.finish();
}

fn benchmark_comparison_with_json(c: &mut Criterion) {
    let tree = wide_tree(4, 4);
    let mut group = c.benchmark_group("comparison");

    group.bench_function("rda_encode", |b| b.iter(|| black_box(&tree).to_text()));
    group.bench_function("json_encode", |b| {
        b.iter(|| serde_json::to_string(black_box(&tree)))
    });

    let text = tree.to_text().unwrap();
    let json = serde_json::to_string(&tree).unwrap();

    group.bench_function("rda_decode", |b| b.iter(|| Rda::parse(black_box(&text))));
    group.bench_function("json_decode", |b| {
        b.iter(|| serde_json::from_str::<Rda>(black_box(&json)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode_text,
    benchmark_parse_text,
    benchmark_binary,
    benchmark_objects,
    benchmark_comparison_with_json
);
criterion_main!(benches);
