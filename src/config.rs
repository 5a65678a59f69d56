// Copyright (c) 2024-2026, the mvsearch contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause.

use thiserror::Error;

/// Macroblock size in samples.
pub const MB_SIZE: usize = 16;

/// Largest full-pel displacement transmissible relative to the predictor.
pub const MV_RANGE: isize = 15;

/// Enumeration of possible invalid configuration errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum InvalidConfig {
  /// The width is invalid.
  #[error("invalid width {0} (expected a positive multiple of 16)")]
  InvalidWidth(usize),
  /// The height is invalid.
  #[error("invalid height {0} (expected a positive multiple of 16)")]
  InvalidHeight(usize),
  /// The sub-block refinement radius is invalid.
  #[error("invalid sub-block window {0} (expected >= 1, <= 7)")]
  InvalidSubwin(usize),
  /// Extended-range search is only defined over a padded reference.
  #[error("long vectors require vectors outside the frame to be enabled")]
  LongVectorsWithoutPaddedReference,
}

/// Everything one motion search needs to know, passed explicitly into every
/// call; there is no ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionSearchConfig {
  /// Picture width in samples; a multiple of [`MB_SIZE`].
  pub width: usize,
  /// Picture height in samples; a multiple of [`MB_SIZE`].
  pub height: usize,
  /// Maximum full-pel search radius per macroblock. The transmissible range
  /// caps the effective radius regardless of this value.
  pub seek_dist: usize,
  /// Radius of the per-quadrant OBMC refinement window.
  pub subwin: usize,
  /// Bias subtracted from the zero vector's SAD before comparison, so that
  /// near-ties resolve in favour of the cheap-to-code zero vector.
  pub zero_bias: u32,
  /// Extended transmissible range: the search window is centered on the
  /// predictor instead of the zero vector. Requires `mv_outside_frame`.
  pub long_vectors: bool,
  /// The reference plane carries a padding margin, so vectors may point
  /// outside the visible picture and the search window is not clipped.
  pub mv_outside_frame: bool,
  /// Refine four independent 8×8 sub-block vectors per macroblock.
  pub obmc: bool,
}

impl MotionSearchConfig {
  /// A plain full-search configuration for the given picture size.
  pub fn new(width: usize, height: usize) -> Self {
    MotionSearchConfig {
      width,
      height,
      seek_dist: 15,
      subwin: 3,
      zero_bias: 129,
      long_vectors: false,
      mv_outside_frame: false,
      obmc: false,
    }
  }

  pub fn validate(&self) -> Result<(), InvalidConfig> {
    if self.width == 0 || self.width % MB_SIZE != 0 {
      return Err(InvalidConfig::InvalidWidth(self.width));
    }
    if self.height == 0 || self.height % MB_SIZE != 0 {
      return Err(InvalidConfig::InvalidHeight(self.height));
    }
    // subwin > 7 would shrink the extended-range radius below zero
    if self.subwin < 1 || self.subwin > 7 {
      return Err(InvalidConfig::InvalidSubwin(self.subwin));
    }
    if self.long_vectors && !self.mv_outside_frame {
      return Err(InvalidConfig::LongVectorsWithoutPaddedReference);
    }
    Ok(())
  }

  #[inline]
  pub const fn mb_cols(&self) -> usize {
    self.width / MB_SIZE
  }

  #[inline]
  pub const fn mb_rows(&self) -> usize {
    self.height / MB_SIZE
  }

  /// Padding margin the reference plane must carry on every edge for this
  /// configuration.
  ///
  /// Even without `mv_outside_frame`, the OBMC refinement window is centered
  /// on the whole-block vector without picture clipping and may poke up to
  /// `subwin` samples past the picture edge.
  #[inline]
  pub const fn reference_margin(&self) -> usize {
    if self.mv_outside_frame {
      if self.long_vectors {
        32
      } else {
        16
      }
    } else if self.obmc {
      self.subwin
    } else {
      0
    }
  }
}
