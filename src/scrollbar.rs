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
use crate::{Recti, Vec2i};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Direction a scrollbar moves its target's content in.
pub enum ScrollAxis {
    /// Scrolls along y.
    Vertical,
    /// Scrolls along x.
    Horizontal,
}

impl ScrollAxis {
    pub(crate) fn len(self, r: Recti) -> i32 {
        match self {
            ScrollAxis::Vertical => r.height,
            ScrollAxis::Horizontal => r.width,
        }
    }

    pub(crate) fn component(self, v: Vec2i) -> i32 {
        match self {
            ScrollAxis::Vertical => v.y,
            ScrollAxis::Horizontal => v.x,
        }
    }
}

pub(crate) fn scroll_range(content_len: i32, view_len: i32) -> i32 { (content_len - view_len).max(0) }

/// Length of the slider along `axis`, before positioning.
pub(crate) fn slider_len(track_len: i32, view_len: i32, content_len: i32, min_len: i32) -> i32 {
    let len = if content_len > 0 {
        (track_len as i64 * view_len as i64 / content_len as i64) as i32
    } else {
        min_len
    };
    len.max(min_len).min(track_len).max(0)
}

/// Slider inside `pane`. Collapses to a zero sized rect at the pane origin when nothing scrolls.
pub(crate) fn slider_rect(axis: ScrollAxis, pane: Recti, view_len: i32, content_len: i32, value: i32, min_len: i32) -> Recti {
    let range = scroll_range(content_len, view_len);
    let mut slider = pane;
    if range == 0 {
        slider.width = 0;
        slider.height = 0;
        return slider;
    }

    let track_len = axis.len(pane);
    let len = slider_len(track_len, view_len, content_len, min_len);
    let offset = (value.clamp(0, range) as i64 * (track_len - len) as i64 / range as i64) as i32;
    match axis {
        ScrollAxis::Vertical => {
            slider.height = len;
            slider.y += offset;
        }
        ScrollAxis::Horizontal => {
            slider.width = len;
            slider.x += offset;
        }
    }
    slider
}

/// Converts a pointer movement into a scroll value change.
pub(crate) fn drag_delta(axis: ScrollAxis, delta: Vec2i, range: i32, pane: Recti, slider: Recti) -> i32 {
    let free = axis.len(pane) - axis.len(slider);
    if free <= 0 {
        return 0;
    }
    (axis.component(delta) as i64 * range as i64 / free as i64) as i32
}
