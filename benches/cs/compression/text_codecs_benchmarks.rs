use classic_codecs::cs::compression::{huffman, lz77, lz78};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: &[usize] = &[256, 1024, 4096];
const WINDOW_SIZES: &[usize] = &[8, 64];

fn sample_text(size: usize) -> Vec<u8> {
    b"pablito clavo un clavito, que clavito clavo pablito? "
        .iter()
        .copied()
        .cycle()
        .take(size)
        .collect()
}

fn bench_huffman(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");
    for &size in SIZES {
        let data = sample_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| huffman::huffman_encode(black_box(data)).unwrap());
        });

        let (encoded, tree) = huffman::huffman_encode(&data).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", size), &encoded, |b, encoded| {
            b.iter(|| huffman::huffman_decode(black_box(encoded), &tree).unwrap());
        });
    }
    group.finish();
}

fn bench_lz77(c: &mut Criterion) {
    let mut group = c.benchmark_group("lz77");
    for &size in SIZES {
        let data = sample_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        for &window in WINDOW_SIZES {
            let id = format!("{}/w{}", size, window);
            group.bench_with_input(BenchmarkId::new("encode", &id), &data, |b, data| {
                b.iter(|| lz77::encode(black_box(data), window).unwrap());
            });

            let tokens = lz77::encode(&data, window).unwrap();
            group.bench_with_input(BenchmarkId::new("decode", &id), &tokens, |b, tokens| {
                b.iter(|| lz77::decode(black_box(tokens), window).unwrap());
            });
        }
    }
    group.finish();
}

fn bench_lz78(c: &mut Criterion) {
    let mut group = c.benchmark_group("lz78");
    for &size in SIZES {
        let data = sample_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| lz78::encode(black_box(data)));
        });

        let (tokens, _) = lz78::encode(&data);
        group.bench_with_input(BenchmarkId::new("decode", size), &tokens, |b, tokens| {
            b.iter(|| lz78::decode(black_box(tokens)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_huffman, bench_lz77, bench_lz78);
criterion_main!(benches);
