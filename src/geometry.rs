//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
//! Rectangle primitives shared by the layout solver, the input state machine and the draw list.

use crate::{HAlign, Recti, VAlign, Vec2i, rect};

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Four-sided spacing used for margins, borders and padding.
pub struct Insets {
    /// Left side.
    pub left: i32,
    /// Top side.
    pub top: i32,
    /// Right side.
    pub right: i32,
    /// Bottom side.
    pub bottom: i32,
}

impl Insets {
    /// Creates insets from the four sides.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self { Self { left, top, right, bottom } }

    /// Creates insets with the same value on every side.
    pub const fn uniform(v: i32) -> Self { Self::new(v, v, v, v) }

    /// Sum of the left and right sides.
    pub fn horizontal(&self) -> i32 { self.left + self.right }

    /// Sum of the top and bottom sides.
    pub fn vertical(&self) -> i32 { self.top + self.bottom }

    /// Component-wise sum of two insets.
    pub fn add(&self, other: &Insets) -> Insets {
        Insets::new(self.left + other.left, self.top + other.top, self.right + other.right, self.bottom + other.bottom)
    }

    /// Shrinks `r` by the insets. The result never has a negative size.
    pub fn shrink(&self, r: Recti) -> Recti {
        rect(
            r.x + self.left,
            r.y + self.top,
            (r.width - self.horizontal()).max(0),
            (r.height - self.vertical()).max(0),
        )
    }
}

/// Intersection of two rectangles, clamped to a zero size when they do not overlap.
pub fn intersect(a: Recti, b: Recti) -> Recti {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let r = (a.x + a.width).min(b.x + b.width);
    let bm = (a.y + a.height).min(b.y + b.height);
    rect(x, y, (r - x).max(0), (bm - y).max(0))
}

/// Bounding box of two rectangles.
pub fn union(a: Recti, b: Recti) -> Recti {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    let r = (a.x + a.width).max(b.x + b.width);
    let bm = (a.y + a.height).max(b.y + b.height);
    rect(x, y, r - x, bm - y)
}

/// Accumulates `r` into an optional bounding box, `None` being the empty set.
pub fn union_opt(acc: Option<Recti>, r: Recti) -> Option<Recti> {
    Some(match acc {
        Some(a) => union(a, r),
        None => r,
    })
}

/// Returns `true` when `p` lies inside `r`. Right and bottom edges are exclusive.
pub fn contains_point(r: Recti, p: Vec2i) -> bool { p.x >= r.x && p.x < r.x + r.width && p.y >= r.y && p.y < r.y + r.height }

/// Returns `true` when `inner` is empty or fully covered by `outer`.
pub fn contains_rect(outer: Recti, inner: Recti) -> bool {
    if inner.width == 0 || inner.height == 0 {
        return true;
    }
    inner.x >= outer.x && inner.y >= outer.y && inner.x + inner.width <= outer.x + outer.width && inner.y + inner.height <= outer.y + outer.height
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Side of an axis a rectangle is anchored to.
pub enum Anchor {
    /// Left or top edge.
    Near,
    /// Middle of the axis.
    Center,
    /// Right or bottom edge.
    Far,
}

impl From<HAlign> for Anchor {
    fn from(a: HAlign) -> Self {
        match a {
            HAlign::Left => Anchor::Near,
            HAlign::Center => Anchor::Center,
            HAlign::Right => Anchor::Far,
        }
    }
}

impl From<VAlign> for Anchor {
    fn from(a: VAlign) -> Self {
        match a {
            VAlign::Top => Anchor::Near,
            VAlign::Center => Anchor::Center,
            VAlign::Bottom => Anchor::Far,
        }
    }
}

/// Positions a span of `size` inside `[pos, pos + len)`, `offset` acting as a signed margin from the anchor.
pub fn anchor(anchor: Anchor, offset: i32, size: i32, pos: i32, len: i32) -> i32 {
    match anchor {
        Anchor::Near => pos + offset,
        Anchor::Far => pos + len - (offset + size),
        Anchor::Center => pos + len / 2 + (offset - size / 2),
    }
}

/// Horizontal shift of a run of length `len` aligned inside `avail`. Negative when the run overflows.
pub(crate) fn align_shift(halign: HAlign, len: i32, avail: i32) -> i32 {
    match halign {
        HAlign::Left => 0,
        HAlign::Center if len <= avail => (avail - len) >> 1,
        HAlign::Center => -((len - avail) >> 1),
        HAlign::Right => avail - len,
    }
}
