// Copyright (c) 2024-2026, the mvsearch contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause.

use criterion::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use mvsearch::dist::{sad_block, sad_block_bidir, DIST_MAX};
use mvsearch::patch::Patch;
use mvsearch::plane::Plane;
use mvsearch::util::{Block16x16, Block8x8};

fn random_plane(ra: &mut ChaChaRng, width: usize, height: usize) -> Plane<u8> {
  let mut plane = Plane::new(width, height, 32, 32);
  for v in plane.data.iter_mut() {
    *v = ra.gen::<u8>();
  }
  plane
}

fn bench_sad_block(c: &mut Criterion) {
  let mut ra = ChaChaRng::from_seed([0; 32]);
  let curr = random_plane(&mut ra, 640, 480);
  let prev = random_plane(&mut ra, 640, 480);

  let act_block = Patch::load(&curr, 160, 160, 16, 16);
  let search_area = Patch::load(&prev, 145, 145, 46, 46);

  c.bench_function("sad_block_16x16", |b| {
    b.iter(|| {
      black_box(sad_block::<Block16x16, u8>(
        &act_block.window(0, 0),
        &search_area.window(15, 15),
        DIST_MAX,
      ))
    })
  });

  c.bench_function("sad_block_8x8", |b| {
    b.iter(|| {
      black_box(sad_block::<Block8x8, u8>(
        &act_block.window(8, 8),
        &search_area.window(23, 23),
        DIST_MAX,
      ))
    })
  });

  // a tight bound exercises the per-row early exit
  c.bench_function("sad_block_16x16_bounded", |b| {
    b.iter(|| {
      black_box(sad_block::<Block16x16, u8>(
        &act_block.window(0, 0),
        &search_area.window(15, 15),
        black_box(500),
      ))
    })
  });
}

fn bench_sad_block_bidir(c: &mut Criterion) {
  let mut ra = ChaChaRng::from_seed([1; 32]);
  let curr = random_plane(&mut ra, 640, 480);
  let fwd = random_plane(&mut ra, 640, 480);
  let bwd = random_plane(&mut ra, 640, 480);

  let act_block = Patch::load(&curr, 160, 160, 16, 16);
  let fwd_area = Patch::load(&fwd, 145, 145, 46, 46);
  let bwd_area = Patch::load(&bwd, 150, 150, 46, 46);

  c.bench_function("sad_block_bidir_16x16", |b| {
    b.iter(|| {
      black_box(sad_block_bidir::<Block16x16, u8>(
        &act_block.window(0, 0),
        &fwd_area.window(15, 15),
        &bwd_area.window(10, 10),
        DIST_MAX,
      ))
    })
  });
}

criterion_group!(benches, bench_sad_block, bench_sad_block_bidir);
criterion_main!(benches);
