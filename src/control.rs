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
use bitflags::*;

use crate::{Dimensioni, Recti, ScrollAxis, StyleId};

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    /// Interaction state of an emitted control.
    pub struct UiFlags : u32 {
        /// The bound value was edited this frame.
        const CHANGED = 32;
        /// The control was activated this frame (mouse release inside it, or Enter).
        const CLICKED = 16;
        /// The control is held down by the mouse or Enter.
        const PRESSED = 8;
        /// The control owns keyboard focus.
        const FOCUS = 4;
        /// The cursor is over the control.
        const HOVER = 2;
        /// The control ignores input and is skipped by navigation.
        const DISABLED = 1;
        /// No flags.
        const NONE = 0;
    }
}

impl UiFlags {
    /// Returns `true` if the control was edited.
    pub fn is_changed(&self) -> bool { self.intersects(Self::CHANGED) }
    /// Returns `true` if the control was clicked.
    pub fn is_clicked(&self) -> bool { self.intersects(Self::CLICKED) }
    /// Returns `true` if the control is held down.
    pub fn is_pressed(&self) -> bool { self.intersects(Self::PRESSED) }
    /// Returns `true` if the control has focus.
    pub fn is_focused(&self) -> bool { self.intersects(Self::FOCUS) }
    /// Returns `true` if the control is hovered.
    pub fn is_hovered(&self) -> bool { self.intersects(Self::HOVER) }
    /// Returns `true` if the control is disabled.
    pub fn is_disabled(&self) -> bool { self.intersects(Self::DISABLED) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Kind of an emitted control.
pub enum ControlType {
    /// Clickable text button.
    Button,
    /// Static text; always disabled.
    Label,
    /// Editable text field.
    TextBox,
    /// Editable integer field.
    NumberBox,
    /// Opening marker of a container; its children follow it in the list.
    ContainerBegin,
    /// Closing marker of a container.
    ContainerEnd,
    /// Vertical scrollbar bound to a container.
    VScrollbar,
    /// Horizontal scrollbar bound to a container.
    HScrollbar,
}

impl ControlType {
    /// Returns `true` for the two scrollbar kinds.
    pub fn is_scrollbar(self) -> bool { matches!(self, Self::VScrollbar | Self::HScrollbar) }
    /// Returns `true` for controls whose payload is text.
    pub fn has_text(self) -> bool { matches!(self, Self::Button | Self::Label | Self::TextBox | Self::NumberBox) }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Position of a control inside the frame's control list.
pub struct ControlIndex(pub(crate) u32);

impl ControlIndex {
    /// Returns the raw index.
    pub fn raw(self) -> usize { self.0 as usize }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Range of the frame's text arena owned by a control.
pub struct TextSpan {
    /// Byte offset of the first character.
    pub start: usize,
    /// Length in bytes.
    pub len: usize,
    /// Maximum length in bytes the owning field accepts.
    pub capacity: usize,
}

#[derive(Copy, Clone, Debug)]
/// Scroll state and slider geometry of a scrollbar.
pub struct ScrollData {
    /// Scroll direction.
    pub axis: ScrollAxis,
    /// Scrollable distance: content size minus viewport size, never negative.
    pub range: i32,
    /// Current scroll value in `[0, range]`.
    pub value: i32,
    /// Style of the slider.
    pub slider_style: StyleId,
    /// Track the slider moves in.
    pub pane: Recti,
    /// Slider rectangle, zero sized when nothing scrolls.
    pub slider: Recti,
}

#[derive(Copy, Clone, Debug)]
/// Payload attached to a control.
pub enum ControlData {
    /// Caller-supplied identifier (containers) or nothing in particular.
    Id(u32),
    /// Scrollbar state.
    Scroll(ScrollData),
    /// Text content stored in the frame's text arena.
    Text(TextSpan),
}

#[derive(Copy, Clone, Debug)]
/// One entry of the frame's control list.
pub struct Control {
    /// Kind of control.
    pub ty: ControlType,
    /// Style the control is drawn and measured with.
    pub style: StyleId,
    /// Interaction flags.
    pub flags: UiFlags,
    /// Unclipped rectangle in screen space.
    pub rect: Recti,
    /// Visible part of `rect`, already clipped by every ancestor.
    pub clip_rect: Recti,
    /// Variant payload.
    pub data: ControlData,
}

impl Control {
    pub(crate) fn new(ty: ControlType, style: StyleId, flags: UiFlags, data: ControlData) -> Self {
        Self { ty, style, flags, rect: Recti::default(), clip_rect: Recti::default(), data }
    }

    /// Returns the scroll payload, if any.
    pub fn scroll(&self) -> Option<&ScrollData> {
        match &self.data {
            ControlData::Scroll(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the text span, if any.
    pub fn text_span(&self) -> Option<TextSpan> {
        match self.data {
            ControlData::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Per-frame counters of everything dropped because a fixed capacity ran out.
pub struct FrameStats {
    /// Controls that did not fit into the control buffer.
    pub dropped_controls: usize,
    /// Layout commands that did not fit into the command arena.
    pub dropped_commands: usize,
    /// Text bytes cut off by the text arena limit.
    pub truncated_text: usize,
    /// Device events beyond the per-frame event limit.
    pub dropped_events: usize,
    /// Pushes past the stack depth capacity.
    pub stack_overflows: usize,
}

impl FrameStats {
    /// Returns `true` when nothing was dropped this frame.
    pub fn is_clean(&self) -> bool { *self == Self::default() }
}

/// Fixed-capacity, forward-filled control array plus the text arena of the current frame.
pub(crate) struct ControlBuffer {
    controls: Vec<Control>,
    capacity: usize,
    reserved: usize,
    text: String,
    max_text: usize,
}

impl ControlBuffer {
    pub fn new(capacity: usize, max_text: usize) -> Self {
        Self {
            controls: Vec::with_capacity(capacity),
            capacity,
            reserved: 0,
            text: String::with_capacity(max_text),
            max_text,
        }
    }

    pub fn clear(&mut self) {
        self.controls.clear();
        self.text.clear();
        self.reserved = 0;
    }

    pub fn len(&self) -> usize { self.controls.len() }

    /// Index the next pushed control will receive.
    pub fn next_index(&self) -> ControlIndex { ControlIndex(self.controls.len() as u32) }

    fn free(&self) -> usize { self.capacity - self.controls.len() - self.reserved }

    /// `true` when no further plain control fits.
    pub fn is_full(&self) -> bool { self.free() == 0 }

    fn drop_control(stats: &mut FrameStats) {
        stats.dropped_controls += 1;
        if stats.dropped_controls == 1 {
            log::warn!("control buffer full, dropping controls for this frame");
        }
    }

    pub fn push(&mut self, control: Control, stats: &mut FrameStats) -> Option<ControlIndex> {
        if self.free() == 0 {
            Self::drop_control(stats);
            return None;
        }
        let idx = self.next_index();
        self.controls.push(control);
        Some(idx)
    }

    /// Pushes a container-begin marker and reserves the slot of its end marker.
    pub fn push_begin(&mut self, control: Control, stats: &mut FrameStats) -> Option<ControlIndex> {
        if self.free() < 2 {
            Self::drop_control(stats);
            return None;
        }
        let idx = self.next_index();
        self.controls.push(control);
        self.reserved += 1;
        Some(idx)
    }

    /// Pushes the end marker matching an earlier successful [`Self::push_begin`].
    pub fn push_end(&mut self, control: Control) -> ControlIndex {
        debug_assert!(self.reserved > 0);
        self.reserved = self.reserved.saturating_sub(1);
        let idx = self.next_index();
        self.controls.push(control);
        idx
    }

    /// Copies `text` into the arena, truncating at a char boundary when the arena is full.
    pub fn push_text(&mut self, text: &str, capacity: usize, stats: &mut FrameStats) -> TextSpan {
        let room = self.max_text - self.text.len();
        let mut len = text.len().min(room);
        while !text.is_char_boundary(len) {
            len -= 1;
        }
        if len < text.len() {
            stats.truncated_text += text.len() - len;
            if stats.truncated_text == text.len() - len {
                log::warn!("text arena full, truncating control text for this frame");
            }
        }
        let start = self.text.len();
        self.text.push_str(&text[..len]);
        TextSpan { start, len, capacity }
    }

    pub fn get(&self, idx: ControlIndex) -> Option<&Control> { self.controls.get(idx.raw()) }

    pub fn get_mut(&mut self, idx: ControlIndex) -> Option<&mut Control> { self.controls.get_mut(idx.raw()) }

    pub fn controls(&self) -> &[Control] { &self.controls }

    pub fn controls_mut(&mut self) -> &mut [Control] { &mut self.controls }

    pub fn text(&self) -> &str { &self.text }
}

/// Read-only view of a finished frame: the controls in pre-order plus the focused text field's edit state.
pub struct ControlList<'a> {
    pub(crate) controls: &'a [Control],
    pub(crate) text: &'a str,
    pub(crate) view: Dimensioni,
    pub(crate) caret: usize,
    pub(crate) select_start: usize,
    pub(crate) select_length: usize,
    pub(crate) stats: FrameStats,
}

impl<'a> ControlList<'a> {
    /// Controls in declaration order; container begin markers precede their children and end markers follow them.
    pub fn controls(&self) -> &'a [Control] { self.controls }

    /// Iterates the controls.
    pub fn iter(&self) -> std::slice::Iter<'a, Control> { self.controls.iter() }

    /// Number of controls.
    pub fn len(&self) -> usize { self.controls.len() }

    /// Returns `true` if the frame emitted no controls.
    pub fn is_empty(&self) -> bool { self.controls.is_empty() }

    /// Returns the control at `idx`.
    pub fn get(&self, idx: ControlIndex) -> Option<&'a Control> { self.controls.get(idx.raw()) }

    /// Text of a control, empty for controls without a text payload.
    pub fn text(&self, control: &Control) -> &'a str {
        match control.data {
            ControlData::Text(span) => self.text.get(span.start..span.start + span.len).unwrap_or(""),
            _ => "",
        }
    }

    /// Viewport the frame was laid out in.
    pub fn view(&self) -> Dimensioni { self.view }

    /// Caret of the focused text field, in bytes.
    pub fn caret(&self) -> usize { self.caret }

    /// First selected byte of the focused text field.
    pub fn select_start(&self) -> usize { self.select_start }

    /// Selected byte count of the focused text field.
    pub fn select_length(&self) -> usize { self.select_length }

    /// Capacity counters of the frame.
    pub fn stats(&self) -> FrameStats { self.stats }
}
