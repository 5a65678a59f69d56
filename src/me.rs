// Copyright (c) 2024-2026, the mvsearch contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause.

use log::debug;
use rayon::prelude::*;

use crate::config::{MotionSearchConfig, MB_SIZE, MV_RANGE};
use crate::dist::{sad_block, DIST_MAX};
use crate::mv::{
  BlockPlane, MotionField, MotionVector, Quadrant, MV_PLANES, UNSEARCHED,
};
use crate::patch::Patch;
use crate::plane::Plane;
use crate::util::{clamp, Block16x16, Block8x8, Pixel};

/// Clamped search-window rectangle for one macroblock and stage.
///
/// `[ilow, ihigh] × [jlow, jhigh]` are candidate positions; the lengths also
/// cover the 16-sample match footprint past the last candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
  pub ilow: isize,
  pub ihigh: isize,
  pub jlow: isize,
  pub jhigh: isize,
  pub h_length: usize,
  pub v_length: usize,
}

impl SearchWindow {
  #[inline]
  const fn contains(&self, i: isize, j: isize) -> bool {
    i >= self.ilow && i <= self.ihigh && j >= self.jlow && j <= self.jhigh
  }
}

// Effective whole-macroblock radius. The extended range gives up
// 2·subwin + 1 so that any sub-block vector the refinement later finds
// within `subwin` of the whole-block vector is still transmissible relative
// to whatever predictor the bitstream uses for it.
fn effective_radius(cfg: &MotionSearchConfig) -> isize {
  let sxy = cfg.seek_dist as isize;
  let sxy = if cfg.long_vectors {
    sxy.min(MV_RANGE - (2 * cfg.subwin as isize + 1))
  } else {
    sxy.min(MV_RANGE)
  };
  // a degenerate radius walks zero rings instead of failing
  sxy.max(0)
}

/// Window for the whole-macroblock stage: centered on the predictor,
/// expanded by the match footprint, clipped to the picture unless vectors
/// may point outside the frame.
pub fn plan_window(
  cfg: &MotionSearchConfig, x_curr: usize, y_curr: usize, xoff: isize,
  yoff: isize, sxy: isize,
) -> SearchWindow {
  let mut ilow = x_curr as isize + xoff - sxy;
  let mut ihigh = x_curr as isize + xoff + sxy;
  let mut jlow = y_curr as isize + yoff - sxy;
  let mut jhigh = y_curr as isize + yoff + sxy;

  if !cfg.mv_outside_frame {
    let imax = cfg.width as isize - MB_SIZE as isize;
    let jmax = cfg.height as isize - MB_SIZE as isize;
    ilow = clamp(ilow, 0, imax);
    ihigh = clamp(ihigh, 0, imax);
    jlow = clamp(jlow, 0, jmax);
    jhigh = clamp(jhigh, 0, jmax);
  }

  SearchWindow {
    ilow,
    ihigh,
    jlow,
    jhigh,
    h_length: (ihigh - ilow) as usize + MB_SIZE,
    v_length: (jhigh - jlow) as usize + MB_SIZE,
  }
}

// Ring `l` around the center: 8·l candidates starting at the top-left
// corner, right along the top edge, down the right edge, left along the
// bottom, up the left. Traversal order is part of the contract: ties keep
// the earlier candidate.
fn walk_ring(
  cx: isize, cy: isize, l: isize, mut visit: impl FnMut(isize, isize),
) {
  let mut i = cx - l;
  let mut j = cy - l;
  for k in 0..8 * l {
    visit(i, j);
    if k < 2 * l {
      i += 1;
    } else if k < 4 * l {
      j += 1;
    } else if k < 6 * l {
      i -= 1;
    } else {
      j -= 1;
    }
  }
}

fn search_macroblock<T: Pixel>(
  cfg: &MotionSearchConfig, curr: &Plane<T>, prev: &Plane<T>, x_curr: usize,
  y_curr: usize, pred: (i16, i16),
) -> ([MotionVector; MV_PLANES], u32) {
  debug_assert!(x_curr % MB_SIZE == 0 && y_curr % MB_SIZE == 0);
  debug_assert!(prev.cfg.xpad >= cfg.reference_margin());
  debug_assert!(prev.cfg.ypad >= cfg.reference_margin());

  let (mut xoff, mut yoff) = (pred.0 as isize, pred.1 as isize);
  if cfg.long_vectors {
    // the predictor itself must stay transmissible
    xoff = clamp(xoff, -16, 16);
    yoff = clamp(yoff, -16, 16);
  }

  let sxy = effective_radius(cfg);
  let win = plan_window(cfg, x_curr, y_curr, xoff, yoff, sxy);

  let x_curr = x_curr as isize;
  let y_curr = y_curr as isize;

  let act_block = Patch::load(curr, x_curr, y_curr, MB_SIZE, MB_SIZE);
  let search_area =
    Patch::load(prev, win.ilow, win.jlow, win.h_length, win.v_length);

  let mut best = [UNSEARCHED; MV_PLANES];

  // The true zero vector is evaluated exactly once per macroblock, even when
  // the predictor has pushed the window off it.
  let zero_x = x_curr - win.ilow;
  let zero_y = y_curr - win.jlow;
  let sad_zero = if zero_x < 0
    || zero_y < 0
    || zero_x as usize + MB_SIZE > win.h_length
    || zero_y as usize + MB_SIZE > win.v_length
  {
    let zero_area = Patch::load(prev, x_curr, y_curr, MB_SIZE, MB_SIZE);
    sad_block::<Block16x16, T>(
      &act_block.window(0, 0),
      &zero_area.window(0, 0),
      DIST_MAX,
    )
  } else {
    sad_block::<Block16x16, T>(
      &act_block.window(0, 0),
      &search_area.window(zero_x as usize, zero_y as usize),
      DIST_MAX,
    )
  };

  if xoff == 0 && yoff == 0 {
    best[0] =
      MotionVector::fullpel(0, 0, sad_zero.saturating_sub(cfg.zero_bias));
  } else {
    // With a nonzero predictor the zero vector must not win during the
    // integer stage: half-pel refinement could then carry the result outside
    // the transmissible window. The zero vector may only replace the result
    // after refinement, and it is transmissible in every mode.
    let px = x_curr + xoff;
    let py = y_curr + yoff;
    let min_error = if win.contains(px, py) {
      sad_block::<Block16x16, T>(
        &act_block.window(0, 0),
        &search_area
          .window((px - win.ilow) as usize, (py - win.jlow) as usize),
        DIST_MAX,
      )
    } else {
      DIST_MAX
    };
    best[0] = MotionVector::fullpel(xoff as i16, yoff as i16, min_error);
  }

  for l in 1..=sxy {
    walk_ring(x_curr + xoff, y_curr + yoff, l, |i, j| {
      if !win.contains(i, j) {
        return;
      }
      let cand = search_area
        .window((i - win.ilow) as usize, (j - win.jlow) as usize);
      let sad = sad_block::<Block16x16, T>(
        &act_block.window(0, 0),
        &cand,
        best[0].min_error,
      );
      if sad < best[0].min_error {
        best[0] = MotionVector::fullpel(
          (i - x_curr) as i16,
          (j - y_curr) as i16,
          sad,
        );
      }
    });
  }

  if cfg.obmc {
    let subwin = cfg.subwin as isize;
    let mut xvec = best[0].x as isize;
    let mut yvec = best[0].y as isize;
    if !cfg.long_vectors {
      // keep the refinement window, centered on this vector, transmissible
      xvec = clamp(xvec, -(MV_RANGE - subwin), MV_RANGE - subwin);
      yvec = clamp(yvec, -(MV_RANGE - subwin), MV_RANGE - subwin);
    }

    let adv_x = x_curr + xvec;
    let adv_y = y_curr + yvec;
    let adv = SearchWindow {
      ilow: adv_x - subwin,
      ihigh: adv_x + subwin,
      jlow: adv_y - subwin,
      jhigh: adv_y + subwin,
      h_length: 2 * subwin as usize + MB_SIZE,
      v_length: 2 * subwin as usize + MB_SIZE,
    };
    let adv_area =
      Patch::load(prev, adv.ilow, adv.jlow, adv.h_length, adv.v_length);

    // each quadrant starts from the whole-macroblock vector, not from zero
    for q in Quadrant::ALL {
      let (qx, qy) = q.offset();
      let sad = sad_block::<Block8x8, T>(
        &act_block.window(qx, qy),
        &adv_area.window(
          (adv_x - adv.ilow) as usize + qx,
          (adv_y - adv.jlow) as usize + qy,
        ),
        DIST_MAX,
      );
      best[1 + q as usize] =
        MotionVector::fullpel(best[0].x, best[0].y, sad);
    }

    for l in 1..=subwin {
      walk_ring(adv_x, adv_y, l, |i, j| {
        if !adv.contains(i, j) {
          return;
        }
        for q in Quadrant::ALL {
          let (qx, qy) = q.offset();
          let idx = 1 + q as usize;
          let cand = adv_area.window(
            (i - adv.ilow) as usize + qx,
            (j - adv.jlow) as usize + qy,
          );
          let sad = sad_block::<Block8x8, T>(
            &act_block.window(qx, qy),
            &cand,
            best[idx].min_error,
          );
          if sad < best[idx].min_error {
            best[idx] = MotionVector::fullpel(
              (i - x_curr) as i16,
              (j - y_curr) as i16,
              sad,
            );
          }
        }
      });
    }
  }

  (best, sad_zero)
}

fn store_result(
  field: &mut MotionField, cfg: &MotionSearchConfig, row: usize, col: usize,
  best: &[MotionVector; MV_PLANES],
) {
  field.set(BlockPlane::Whole, row, col, best[0]);
  if cfg.obmc {
    for q in Quadrant::ALL {
      field.set(BlockPlane::Quadrant(q), row, col, best[1 + q as usize]);
    }
  }
}

/// Runs the two-stage search for the macroblock at `(x_curr, y_curr)` and
/// writes its interior slot of `field`: plane 0 always, planes 1–4 when OBMC
/// is enabled.
///
/// `pred` is the predictor offset the window is centered on; callers with no
/// predictor pass `(0, 0)`. Returns the zero vector's raw SAD, before the
/// zero bias, for the caller's mode decision.
pub fn estimate_macroblock<T: Pixel>(
  cfg: &MotionSearchConfig, curr: &Plane<T>, prev: &Plane<T>, x_curr: usize,
  y_curr: usize, pred: (i16, i16), field: &mut MotionField,
) -> u32 {
  let (best, sad_zero) =
    search_macroblock(cfg, curr, prev, x_curr, y_curr, pred);
  store_result(field, cfg, y_curr / MB_SIZE + 1, x_curr / MB_SIZE + 1, &best);
  sad_zero
}

/// Searches every macroblock of a frame with a zero predictor.
///
/// Macroblocks read only the two shared frames and own their result slot, so
/// they are searched in parallel. Callers chaining neighbour predictors
/// (extended range) should drive [`estimate_macroblock`] in scan order
/// instead.
///
/// Returns the raw zero-vector SAD of each macroblock, in raster order.
pub fn estimate_frame<T: Pixel>(
  cfg: &MotionSearchConfig, curr: &Plane<T>, prev: &Plane<T>,
  field: &mut MotionField,
) -> Vec<u32> {
  let mb_cols = cfg.mb_cols();
  let mb_rows = cfg.mb_rows();
  debug_assert!(field.mb_cols() == mb_cols && field.mb_rows() == mb_rows);

  let results: Vec<_> = (0..mb_rows * mb_cols)
    .into_par_iter()
    .map(|mb| {
      search_macroblock(
        cfg,
        curr,
        prev,
        (mb % mb_cols) * MB_SIZE,
        (mb / mb_cols) * MB_SIZE,
        (0, 0),
      )
    })
    .collect();

  let mut sad_zero = Vec::with_capacity(results.len());
  for (mb, (best, sad0)) in results.into_iter().enumerate() {
    store_result(field, cfg, mb / mb_cols + 1, mb % mb_cols + 1, &best);
    sad_zero.push(sad0);
  }
  debug!(
    "motion search: {mb_cols}x{mb_rows} macroblocks, seek_dist {}, obmc {}",
    cfg.seek_dist, cfg.obmc
  );
  sad_zero
}
