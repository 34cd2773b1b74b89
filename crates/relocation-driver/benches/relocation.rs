// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for scanning and relocation rounds.

use criterion::{criterion_group, criterion_main, Criterion};
use device_core::{Device, StaticRegistry};
use memory_housekeeping::NoopHousekeeping;
use model_probe::synthetic::TensorModel;
use model_probe::{scan, PatchBundle};
use relocation_driver::{RelocationDriver, TargetSpec};
use std::hint::black_box;
use std::sync::Arc;

fn loaded_bundle() -> PatchBundle {
    PatchBundle::new(
        Box::new(TensorModel::new(Device::Gpu(0))),
        Device::Gpu(0),
        Device::Cpu,
    )
}

fn bench_scan(c: &mut Criterion) {
    let bundle = loaded_bundle();
    c.bench_function("scan_patch_bundle", |b| {
        b.iter(|| scan(black_box(&bundle)))
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let driver = RelocationDriver::new(
        Arc::new(StaticRegistry::default()),
        Arc::new(NoopHousekeeping),
    );
    c.bench_function("offload_recall_round_trip", |b| {
        b.iter(|| {
            let mut bundle = loaded_bundle();
            driver
                .offload(black_box(&mut bundle), TargetSpec::Auto)
                .unwrap();
            driver
                .recall(black_box(&mut bundle), TargetSpec::Auto)
                .unwrap();
        })
    });
}

fn bench_no_op(c: &mut Criterion) {
    let driver = RelocationDriver::new(
        Arc::new(StaticRegistry::default()),
        Arc::new(NoopHousekeeping),
    );
    let mut model = TensorModel::new(Device::Cpu);
    c.bench_function("offload_already_resident", |b| {
        b.iter(|| {
            driver
                .offload(black_box(&mut model), TargetSpec::Auto)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_scan, bench_round_trip, bench_no_op);
criterion_main!(benches);
