// Copyright (c) 2024-2026, the mvsearch contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause.

use criterion::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use mvsearch::me::estimate_macroblock;
use mvsearch::mv::MotionField;
use mvsearch::plane::Plane;
use mvsearch::MotionSearchConfig;

fn noisy_pair(ra: &mut ChaChaRng, width: usize, height: usize) -> (Plane<u8>, Plane<u8>) {
  let mut prev = Plane::new(width, height, 32, 32);
  for v in prev.data.iter_mut() {
    *v = ra.gen::<u8>();
  }
  // current = reference shifted by (4, 2) plus light noise, so the search
  // does real work instead of stopping on the zero vector
  let mut curr = Plane::new(width, height, 32, 32);
  for y in 0..height {
    for x in 0..width {
      let src = prev.p((x + 4).min(width - 1), (y + 2).min(height - 1));
      *curr.p_mut(x, y) = src.wrapping_add(ra.gen_range(0..4));
    }
  }
  (curr, prev)
}

fn bench_estimate_macroblock(c: &mut Criterion) {
  let mut ra = ChaChaRng::from_seed([2; 32]);
  let (curr, prev) = noisy_pair(&mut ra, 352, 288);

  let cfg = MotionSearchConfig::new(352, 288);
  let mut field = MotionField::new(cfg.mb_cols(), cfg.mb_rows());
  c.bench_function("estimate_macroblock_16x16", |b| {
    b.iter(|| {
      black_box(estimate_macroblock(
        &cfg, &curr, &prev, 160, 144, (0, 0), &mut field,
      ))
    })
  });

  let mut obmc_cfg = MotionSearchConfig::new(352, 288);
  obmc_cfg.obmc = true;
  let mut field = MotionField::new(obmc_cfg.mb_cols(), obmc_cfg.mb_rows());
  c.bench_function("estimate_macroblock_obmc", |b| {
    b.iter(|| {
      black_box(estimate_macroblock(
        &obmc_cfg, &curr, &prev, 160, 144, (0, 0), &mut field,
      ))
    })
  });
}

criterion_group!(benches, bench_estimate_macroblock);
criterion_main!(benches);
