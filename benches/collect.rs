// SPDX-License-Identifier: MPL-2.0
use barcode_lens::collector::{self, ExtensionFilter, Source};
use criterion::{criterion_group, criterion_main, Criterion};
use std::fs;
use std::hint::black_box;
use std::path::Path;

/// Builds a directory tree with `breadth` files per level across `depth`
/// nested directories; half the files pass the image filter.
fn build_tree(root: &Path, depth: usize, breadth: usize) {
    let mut current = root.to_path_buf();
    for level in 0..depth {
        for index in 0..breadth {
            let extension = if index % 2 == 0 { "png" } else { "txt" };
            fs::write(
                current.join(format!("file-{level}-{index}.{extension}")),
                b"bench bytes",
            )
            .expect("write bench file");
        }
        current = current.join(format!("level-{level}"));
        fs::create_dir(&current).expect("create bench directory");
    }
}

fn collect_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect");

    let temp_dir = tempfile::tempdir().expect("create temp dir");
    build_tree(temp_dir.path(), 6, 20);
    let filter = ExtensionFilter::image_defaults();

    group.bench_function("blocking_tree_traversal", |b| {
        b.iter(|| {
            let files = collector::collect_blocking(
                Source::PickedDirectory(temp_dir.path().to_path_buf()),
                black_box(&filter),
                true,
            );
            black_box(files)
        });
    });

    group.finish();
}

criterion_group!(benches, collect_benchmark);
criterion_main!(benches);
