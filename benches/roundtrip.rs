use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use datatree_text::{properties, to_value, xml, Document, WriteOptions};
use serde::Serialize;

#[derive(Serialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
    tags: Vec<String>,
}

fn catalog(size: u32) -> Document {
    let products: Vec<Product> = (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.5 + f64::from(i),
            quantity: i,
            tags: vec!["a".to_string(), format!("t{}", i % 7)],
        })
        .collect();
    let value = to_value(&products).unwrap_or_default();
    Document::new(value)
}

fn benchmark_properties(c: &mut Criterion) {
    let options = WriteOptions::new();
    let mut write_group = c.benchmark_group("properties_write");
    for size in [10, 100, 500] {
        let doc = catalog(size);
        write_group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| properties::to_string(black_box(doc), &options))
        });
    }
    write_group.finish();

    let mut read_group = c.benchmark_group("properties_read");
    for size in [10, 100, 500] {
        let text = properties::to_string(&catalog(size), &options);
        read_group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| properties::from_str(black_box(text)))
        });
    }
    read_group.finish();
}

fn benchmark_xml(c: &mut Criterion) {
    let options = WriteOptions::pretty();
    let mut write_group = c.benchmark_group("xml_write");
    for size in [10, 100, 500] {
        let doc = catalog(size);
        write_group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| xml::to_string(black_box(doc), &options))
        });
    }
    write_group.finish();

    let mut read_group = c.benchmark_group("xml_read");
    for size in [10, 100, 500] {
        let text = xml::to_string(&catalog(size), &options);
        read_group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| xml::from_str(black_box(text)))
        });
    }
    read_group.finish();
}

criterion_group!(benches, benchmark_properties, benchmark_xml);
criterion_main!(benches);
