// Copyright (c) 2024-2026, the mvsearch contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License. If
// the BSD 2 Clause License was not distributed with this source code in the
// LICENSE file, you can obtain it at
// https://opensource.org/license/bsd-2-clause.

//! Integer-pel block motion estimation for a video encoder.
//!
//! For each 16×16 macroblock of the current frame, an expanding-ring
//! ("spiral") search finds the displacement into a reference frame that
//! minimizes SAD prediction error, constrained so that every vector (and,
//! with OBMC enabled, every 8×8 sub-block vector refined around it) stays
//! inside the range the downstream bitstream can transmit.
//!
//! The pieces, leaves first: [`plane::Plane`] holds padded frame planes;
//! [`patch::Patch`] copies rectangles out of them into compact scratch
//! buffers; [`dist`] provides the bounded SAD kernels; [`me`] plans search
//! windows and runs the two-stage search; results land in a
//! [`mv::MotionField`].

pub mod config;
pub mod dist;
pub mod me;
pub mod mv;
pub mod patch;
pub mod plane;
pub mod util;

pub use crate::config::{InvalidConfig, MotionSearchConfig, MB_SIZE, MV_RANGE};
pub use crate::me::{estimate_frame, estimate_macroblock, SearchWindow};
pub use crate::mv::{BlockPlane, MotionField, MotionVector, Quadrant};
pub use crate::plane::Plane;
pub use crate::util::Pixel;
