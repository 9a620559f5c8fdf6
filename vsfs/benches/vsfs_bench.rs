// SPDX-License-Identifier: MIT

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use vsfs::vsfs::*;

const SIZE_KIB: u64 = 4096;
const INODES: u64 = 512;

fn bench_vsfs_format(c: &mut Criterion) {
    let meta = VsfsMeta::new(SIZE_KIB, INODES).unwrap();
    let mut group = c.benchmark_group("vsfs_format");
    group.throughput(Throughput::Bytes(meta.image_len()));

    group.bench_function("format_4mb_mem", |b| {
        let mut buf = vec![0u8; meta.image_len() as usize];
        b.iter(|| {
            let mut io = MemVsfsIO::new(&mut buf);
            VsfsFormatter::new(&mut io, &meta).format(true).unwrap();
        });
    });

    group.bench_function("format_4mb_disk", |b| {
        let mut file = tempfile::tempfile().unwrap();
        file.set_len(meta.image_len()).unwrap();
        b.iter(|| {
            let mut io = StdVsfsIO::new(&mut file);
            VsfsFormatter::new(&mut io, &meta).format(false).unwrap();
        });
    });

    group.finish();
}

fn bench_vsfs_insert(c: &mut Criterion) {
    let meta = VsfsMeta::new(SIZE_KIB, INODES).unwrap();
    let mut image = vec![0u8; meta.image_len() as usize];
    {
        let mut io = MemVsfsIO::new(&mut image);
        VsfsFormatter::new(&mut io, &meta).format(true).unwrap();
    }
    let content = vec![0xAAu8; VSFS_MAX_FILE_SIZE as usize];

    let mut group = c.benchmark_group("vsfs_insert");
    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_function("insert_48kb_mem", |b| {
        b.iter_with_setup(
            || image.clone(),
            |mut buf| {
                let mut io = MemVsfsIO::new(&mut buf);
                VsfsInjector::open(&mut io)
                    .unwrap()
                    .insert_file("bench.bin", &content)
                    .unwrap();
            },
        );
    });

    group.bench_function("check_after_insert_mem", |b| {
        let mut buf = image.clone();
        {
            let mut io = MemVsfsIO::new(&mut buf);
            VsfsInjector::open(&mut io)
                .unwrap()
                .insert_file("bench.bin", &content)
                .unwrap();
        }
        b.iter(|| {
            let mut io = MemVsfsIO::new(&mut buf);
            VsfsChecker::new(&mut io).check_all().unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_vsfs_format, bench_vsfs_insert);
criterion_main!(benches);
