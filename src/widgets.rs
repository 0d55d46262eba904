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
//! Leaf widgets. Each one restores focus, replays last frame's input when focused, then records its
//! control and a single layout command.

use crate::{
    CmdIndex, Control, ControlData, ControlIndex, ControlType, LayoutRect, ScrollAxis, ScrollData, StyleId, TextFilter, TextSpan, Ui, UiFlags,
};

#[derive(Copy, Clone, Debug)]
/// Outcome of a widget call.
pub struct Response {
    /// Layout handle of the widget.
    pub handle: CmdIndex,
    /// Interaction flags resolved for this frame.
    pub flags: UiFlags,
}

impl Response {
    /// Returns `true` when the widget was activated (mouse released over it, or Enter).
    pub fn is_clicked(&self) -> bool { self.flags.is_clicked() }
    /// Returns `true` while the widget is held down.
    pub fn is_pressed(&self) -> bool { self.flags.is_pressed() }
    /// Returns `true` when the widget owns the keyboard focus.
    pub fn is_focused(&self) -> bool { self.flags.is_focused() }
    /// Returns `true` when the widget's value was edited this frame.
    pub fn is_changed(&self) -> bool { self.flags.is_changed() }
}

/// Number of bytes needed to print any value of `[min, max]`.
fn digit_capacity(min: i32, max: i32) -> usize { min.to_string().len().max(max.to_string().len()) }

impl Ui {
    /// Index the next leaf control will take, or `None` when it would be dropped.
    fn next_leaf(&self) -> Option<ControlIndex> {
        if self.is_overflowing() || !self.can_place(self.parent_cmd()) || self.controls.is_full() {
            return None;
        }
        Some(self.controls.next_index())
    }

    /// Restores last frame's focus onto the control about to be pushed at `slot`.
    fn restore_focus(&mut self, slot: Option<ControlIndex>, ty: ControlType, style: StyleId, flags: UiFlags) -> bool {
        match slot {
            Some(index) if !flags.is_disabled() => {
                let parent = self.focus_parent();
                self.input.try_focus_restore(parent, index, ty, style)
            }
            _ => false,
        }
    }

    fn push_text(&mut self, slot: Option<ControlIndex>, text: &str, capacity: usize) -> TextSpan {
        match slot {
            Some(_) => self.controls.push_text(text, capacity, &mut self.stats),
            None => TextSpan::default(),
        }
    }

    fn leaf(&mut self, slot: Option<ControlIndex>, control: Control, rect: LayoutRect, target: Option<CmdIndex>) -> Response {
        if self.is_overflowing() {
            return Response { handle: CmdIndex::FULL, flags: control.flags };
        }
        let (handle, index) = self.place_leaf(control, rect, target);
        debug_assert!(slot.is_none() || slot == index);
        Response { handle, flags: control.flags }
    }

    /// Push button. Focused buttons report PRESSED while held and CLICKED on release or Enter.
    pub fn button(&mut self, style: StyleId, flags: UiFlags, rect: LayoutRect, text: &str) -> Response {
        let style = self.checked_style(style);
        let slot = self.next_leaf();
        let mut flags = flags;
        if self.restore_focus(slot, ControlType::Button, style, flags) {
            flags |= self.input.button();
        } else {
            flags.remove(UiFlags::FOCUS);
        }
        let span = self.push_text(slot, text, text.len());
        self.leaf(slot, Control::new(ControlType::Button, style, flags, ControlData::Text(span)), rect, None)
    }

    /// Static text. Labels are always disabled, so they never take hover or focus.
    pub fn label(&mut self, style: StyleId, rect: LayoutRect, text: &str) -> CmdIndex {
        let style = self.checked_style(style);
        let slot = self.next_leaf();
        let span = self.push_text(slot, text, text.len());
        self.leaf(slot, Control::new(ControlType::Label, style, UiFlags::DISABLED, ControlData::Text(span)), rect, None).handle
    }

    /// Single line text field editing `buf`, which never grows past `capacity` bytes.
    pub fn textbox(&mut self, style: StyleId, flags: UiFlags, rect: LayoutRect, buf: &mut String, capacity: usize) -> Response {
        let style = self.checked_style(style);
        let slot = self.next_leaf();
        let mut flags = flags;
        if self.restore_focus(slot, ControlType::TextBox, style, flags) {
            if let Some(st) = self.styles.get(style.raw()) {
                flags |= self.input.text(TextFilter::Print, st, buf, capacity);
            }
        } else {
            flags.remove(UiFlags::FOCUS);
        }
        let span = self.push_text(slot, buf, capacity);
        self.leaf(slot, Control::new(ControlType::TextBox, style, flags, ControlData::Text(span)), rect, None)
    }

    /// Integer field clamped to `[min, max]`. Edits that leave the range, or do not parse, revert.
    pub fn numberbox(&mut self, style: StyleId, flags: UiFlags, rect: LayoutRect, min: i32, max: i32, value: &mut i32) -> Response {
        let style = self.checked_style(style);
        let slot = self.next_leaf();
        let capacity = digit_capacity(min, max);
        let mut flags = flags;
        let mut text = value.to_string();
        if self.restore_focus(slot, ControlType::NumberBox, style, flags) {
            if let Some(st) = self.styles.get(style.raw()) {
                flags |= self.input.text(TextFilter::Numeric, st, &mut text, capacity);
            }
            if flags.is_changed() {
                // an emptied field reads as zero
                let parsed = if text.is_empty() { Some(0) } else { text.parse::<i32>().ok() };
                match parsed {
                    Some(v) if (min..=max).contains(&v) && v != *value => *value = v,
                    _ => flags.remove(UiFlags::CHANGED),
                }
                text = value.to_string();
            }
        } else {
            flags.remove(UiFlags::FOCUS);
        }
        let span = self.push_text(slot, &text, capacity);
        self.leaf(slot, Control::new(ControlType::NumberBox, style, flags, ControlData::Text(span)), rect, None)
    }

    /// Vertical scrollbar driving the scroll value of the `target` container.
    pub fn vscrollbar(&mut self, pane_style: StyleId, slider_style: StyleId, flags: UiFlags, rect: LayoutRect, target: CmdIndex, value: &mut i32) -> Response {
        self.scrollbar(ScrollAxis::Vertical, pane_style, slider_style, flags, rect, target, value)
    }

    /// Horizontal scrollbar driving the scroll value of the `target` container.
    pub fn hscrollbar(&mut self, pane_style: StyleId, slider_style: StyleId, flags: UiFlags, rect: LayoutRect, target: CmdIndex, value: &mut i32) -> Response {
        self.scrollbar(ScrollAxis::Horizontal, pane_style, slider_style, flags, rect, target, value)
    }

    #[allow(clippy::too_many_arguments)]
    fn scrollbar(&mut self, axis: ScrollAxis, pane_style: StyleId, slider_style: StyleId, flags: UiFlags, rect: LayoutRect, target: CmdIndex, value: &mut i32) -> Response {
        let style = self.checked_style(pane_style);
        let slider_style = self.checked_style(slider_style);
        let ty = match axis {
            ScrollAxis::Vertical => ControlType::VScrollbar,
            ScrollAxis::Horizontal => ControlType::HScrollbar,
        };
        let slot = self.next_leaf();
        let mut flags = flags;
        if self.restore_focus(slot, ty, style, flags) {
            flags |= self.input.scroll(value);
        } else {
            flags.remove(UiFlags::FOCUS);
        }
        let data = ScrollData { axis, range: 0, value: *value, slider_style, pane: Default::default(), slider: Default::default() };
        self.leaf(slot, Control::new(ty, style, flags, ControlData::Scroll(data)), rect, Some(target))
    }
}
