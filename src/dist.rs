// Copyright (c) 2024-2026, the mvsearch contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause.

use itertools::izip;

use crate::patch::PatchWindow;
use crate::util::{CastFromPrimitive, Dim, Pixel};

/// Cost returned by a bounded kernel once its running sum clears the bound.
///
/// Never a usable cost: callers treat it strictly as "not an improvement".
pub const DIST_MAX: u32 = u32::MAX;

/// Bounded SAD between the current block and one reference candidate.
///
/// The running sum is checked once per row, not per pixel: a candidate whose
/// true SAD exceeds `bound` returns [`DIST_MAX`], possibly without reading
/// the remaining rows. A SAD exactly equal to `bound` is returned as the
/// true value.
#[inline]
pub fn sad_block<B: Dim, T: Pixel>(
  cur: &PatchWindow<'_, T>, refr: &PatchWindow<'_, T>, bound: u32,
) -> u32 {
  let mut sad = 0u32;
  for (cur_row, ref_row) in cur.rows_iter().zip(refr.rows_iter()).take(B::H) {
    sad += cur_row[..B::W]
      .iter()
      .zip(&ref_row[..B::W])
      .map(|(&a, &b)| i32::cast_from(a).abs_diff(i32::cast_from(b)))
      .sum::<u32>();
    if sad > bound {
      return DIST_MAX;
    }
  }
  sad
}

/// Bounded SAD against the sample-wise average of two reference candidates.
///
/// The average is `(a + b) >> 1`: the floor of the mean, not rounded. Same
/// per-row early-exit discipline as [`sad_block`].
#[inline]
pub fn sad_block_bidir<B: Dim, T: Pixel>(
  cur: &PatchWindow<'_, T>, fwd: &PatchWindow<'_, T>, bwd: &PatchWindow<'_, T>,
  bound: u32,
) -> u32 {
  let mut sad = 0u32;
  for (cur_row, fwd_row, bwd_row) in
    izip!(cur.rows_iter(), fwd.rows_iter(), bwd.rows_iter()).take(B::H)
  {
    sad += izip!(&cur_row[..B::W], &fwd_row[..B::W], &bwd_row[..B::W])
      .map(|(&p, &a, &b)| {
        let avg = (i32::cast_from(a) + i32::cast_from(b)) >> 1;
        i32::cast_from(p).abs_diff(avg)
      })
      .sum::<u32>();
    if sad > bound {
      return DIST_MAX;
    }
  }
  sad
}
