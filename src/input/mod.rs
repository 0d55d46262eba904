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
//! Input and focus state machine.
//!
//! Input is double buffered: `begin` turns the generation built during the last frame into the
//! previous one and starts a new one from the fresh device snapshot. Widgets declared this frame
//! replay the *previous* generation's events against the focused control, whose rects are known
//! from the previous frame. Focus changes caused by clicks are resolved against the *new*
//! generation at `end`, once every control of this frame has a rect.

mod navigation;
mod text_edit;

use bitflags::*;

use crate::{
    Control, ControlIndex, ControlType, FrameStats, Recti, ScrollAxis, Style, StyleId, UiFlags, Vec2i,
    geometry::contains_point,
    scrollbar::drag_delta,
};

pub(crate) use navigation::is_focusable;
pub(crate) use text_edit::{TextEditState, text_origin, text_scroll};

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    /// Mouse button state as reported by the input system.
    pub struct MouseButton : u32 {
        /// Middle mouse button.
        const MIDDLE = 4;
        /// Right mouse button.
        const RIGHT = 2;
        /// Left mouse button.
        const LEFT = 1;
        /// No buttons pressed.
        const NONE = 0;
    }
}

impl MouseButton {
    /// Returns `true` if the middle mouse button is pressed.
    pub fn is_middle(&self) -> bool { self.intersects(Self::MIDDLE) }
    /// Returns `true` if the right mouse button is pressed.
    pub fn is_right(&self) -> bool { self.intersects(Self::RIGHT) }
    /// Returns `true` if the left mouse button is pressed.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
    /// Returns `true` if no mouse buttons are pressed.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    /// Held keys the UI cares about.
    pub struct KeyMode : u32 {
        /// Return/Enter key held.
        const RETURN = 16;
        /// Alt key held.
        const ALT = 4;
        /// Control key held.
        const CTRL = 2;
        /// Shift key held.
        const SHIFT = 1;
        /// No keys held.
        const NONE = 0;
    }
}

impl KeyMode {
    /// Returns `true` if no keys are held.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
    /// Returns `true` if Return/Enter is held.
    pub fn is_return(&self) -> bool { self.intersects(Self::RETURN) }
    /// Returns `true` if Alt is held.
    pub fn is_alt(&self) -> bool { self.intersects(Self::ALT) }
    /// Returns `true` if Control is held.
    pub fn is_ctrl(&self) -> bool { self.intersects(Self::CTRL) }
    /// Returns `true` if Shift is held.
    pub fn is_shift(&self) -> bool { self.intersects(Self::SHIFT) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Keys with a meaning to the UI; everything else arrives as [`Key::Other`].
pub enum Key {
    /// Focus navigation.
    Tab,
    /// Activates buttons.
    Enter,
    /// Deletes the character before the caret.
    Backspace,
    /// Deletes the character after the caret.
    Delete,
    /// Moves the caret to the start.
    Home,
    /// Moves the caret to the end.
    End,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Escape.
    Escape,
    /// Either shift key.
    Shift,
    /// Either control key.
    Ctrl,
    /// Either alt key.
    Alt,
    /// Any other key, identified by the platform keycode.
    Other(u32),
}

impl Key {
    fn mode(self) -> KeyMode {
        match self {
            Key::Shift => KeyMode::SHIFT,
            Key::Ctrl => KeyMode::CTRL,
            Key::Alt => KeyMode::ALT,
            Key::Enter => KeyMode::RETURN,
            _ => KeyMode::NONE,
        }
    }
}

#[derive(Copy, Clone, Debug)]
/// Discrete device event.
pub enum DeviceEvent {
    /// A key went down; `ascii` is the typed character, or 0.
    KeyDown {
        /// Key pressed.
        key: Key,
        /// ASCII character produced by the key, 0 if none.
        ascii: u8,
    },
    /// A key was released.
    KeyUp {
        /// Key released.
        key: Key,
    },
    /// A mouse button went down.
    MouseDown {
        /// Cursor position.
        pos: Vec2i,
        /// Button pressed.
        button: MouseButton,
    },
    /// A mouse button was released.
    MouseUp {
        /// Cursor position.
        pos: Vec2i,
        /// Button released.
        button: MouseButton,
    },
    /// The cursor moved.
    MouseMove {
        /// Cursor position.
        pos: Vec2i,
        /// Buttons held during the move.
        buttons: MouseButton,
    },
}

impl DeviceEvent {
    fn is_relevant(&self) -> bool {
        match self {
            DeviceEvent::KeyDown { .. } | DeviceEvent::KeyUp { .. } | DeviceEvent::MouseMove { .. } => true,
            DeviceEvent::MouseDown { button, .. } | DeviceEvent::MouseUp { button, .. } => button.is_left(),
        }
    }
}

#[derive(Clone, Debug, Default)]
/// Device state handed to [`crate::Ui::begin`]: held keys, the mouse and the events of this tick.
pub struct InputSnapshot {
    /// Held keys.
    pub keys: KeyMode,
    /// Cursor position.
    pub mouse_pos: Vec2i,
    /// Held mouse buttons.
    pub mouse_buttons: MouseButton,
    /// Events in arrival order.
    pub events: Vec<DeviceEvent>,
}

impl InputSnapshot {
    /// Records a cursor movement.
    pub fn mousemove(&mut self, x: i32, y: i32) {
        self.mouse_pos = Vec2i::new(x, y);
        self.events.push(DeviceEvent::MouseMove { pos: self.mouse_pos, buttons: self.mouse_buttons });
    }

    /// Records that a mouse button was pressed.
    pub fn mousedown(&mut self, x: i32, y: i32, button: MouseButton) {
        self.mouse_pos = Vec2i::new(x, y);
        self.mouse_buttons |= button;
        self.events.push(DeviceEvent::MouseDown { pos: self.mouse_pos, button });
    }

    /// Records that a mouse button was released.
    pub fn mouseup(&mut self, x: i32, y: i32, button: MouseButton) {
        self.mouse_pos = Vec2i::new(x, y);
        self.mouse_buttons &= !button;
        self.events.push(DeviceEvent::MouseUp { pos: self.mouse_pos, button });
    }

    /// Records a key press along with the character it typed (0 for none).
    pub fn keydown(&mut self, key: Key, ascii: u8) {
        self.keys |= key.mode();
        self.events.push(DeviceEvent::KeyDown { key, ascii });
    }

    /// Records a key release.
    pub fn keyup(&mut self, key: Key) {
        self.keys &= !key.mode();
        self.events.push(DeviceEvent::KeyUp { key });
    }

    /// Records a press and release of a printable character.
    pub fn type_char(&mut self, c: u8) {
        self.keydown(Key::Other(c as u32), c);
        self.keyup(Key::Other(c as u32));
    }

    /// Drops the events while keeping the held state, ready for the next tick.
    pub fn clear_events(&mut self) { self.events.clear(); }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Which character class a text field accepts.
pub enum TextFilter {
    /// Every character except tab.
    None,
    /// Digits and `-`.
    Numeric,
    /// Printable ASCII, space included.
    Print,
}

impl TextFilter {
    pub(crate) fn accepts(self, ascii: u8) -> bool {
        match self {
            TextFilter::None => ascii != 0 && ascii != b'\t',
            TextFilter::Numeric => ascii.is_ascii_digit() || ascii == b'-',
            TextFilter::Print => ascii == b' ' || ascii.is_ascii_graphic(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Claim kinds resolved once per frame by [`InputState::try_capture`].
pub enum CaptureKind {
    /// The control under the cursor.
    Hover,
    /// The control under the frame's first left click.
    Focus,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct FrameEvent {
    pub event: DeviceEvent,
    pub consumed: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Container range the focused control belongs to, used to restore focus and to bound arrow navigation.
pub(crate) struct FocusParent {
    pub begin: ControlIndex,
    pub end: ControlIndex,
}

#[derive(Clone, Default)]
struct Generation {
    focus_control: Option<Control>,
    keys: KeyMode,
    mouse_pos: Vec2i,
    mouse_buttons: MouseButton,
    events: Vec<FrameEvent>,
    focus_index: Option<ControlIndex>,
    focus_parent: Option<FocusParent>,
    edit: TextEditState,
    dragging: bool,
    drag_pos: Vec2i,
}

/// Two generations of input plus this frame's capture flags.
pub(crate) struct InputState {
    slots: [Generation; 2],
    parity: usize,
    hover_captured: bool,
    focus_captured: bool,
    max_events: usize,
}

impl InputState {
    pub fn new(max_events: usize) -> Self {
        Self {
            slots: [Generation::default(), Generation::default()],
            parity: 0,
            hover_captured: false,
            focus_captured: false,
            max_events,
        }
    }

    fn prev(&self) -> &Generation { &self.slots[self.parity ^ 1] }

    fn next(&self) -> &Generation { &self.slots[self.parity] }

    fn next_mut(&mut self) -> &mut Generation { &mut self.slots[self.parity] }

    /// Previous and next generation, borrowed together.
    fn split(&mut self) -> (&mut Generation, &mut Generation) {
        let (a, b) = self.slots.split_at_mut(1);
        if self.parity == 0 { (&mut b[0], &mut a[0]) } else { (&mut a[0], &mut b[0]) }
    }

    pub fn begin(&mut self, snapshot: &InputSnapshot, stats: &mut FrameStats) {
        self.parity ^= 1;
        let max_events = self.max_events;
        let (prev, next) = self.split();
        next.clone_from(prev);

        next.events.clear();
        for event in snapshot.events.iter().filter(|e| e.is_relevant()) {
            // consecutive moves collapse into the latest one
            if let (DeviceEvent::MouseMove { .. }, Some(FrameEvent { event: DeviceEvent::MouseMove { .. }, .. })) = (event, next.events.last()) {
                if let Some(last) = next.events.last_mut() {
                    last.event = *event;
                }
                continue;
            }
            if next.events.len() == max_events {
                stats.dropped_events += 1;
                continue;
            }
            next.events.push(FrameEvent { event: *event, consumed: false });
        }
        if stats.dropped_events > 0 {
            log::debug!("dropped {} input events past the per-frame limit", stats.dropped_events);
        }

        next.focus_index = None;
        next.dragging = false;
        next.keys = snapshot.keys;
        next.mouse_pos = snapshot.mouse_pos;
        next.mouse_buttons = snapshot.mouse_buttons;
        self.hover_captured = false;
        self.focus_captured = false;
    }

    /// Claims `kind` for the first caller whose `clip` contains the relevant point this frame.
    pub fn try_capture(&mut self, kind: CaptureKind, clip: Recti) -> bool {
        let (captured, point) = match kind {
            CaptureKind::Hover => (self.hover_captured, Some(self.next().mouse_pos)),
            CaptureKind::Focus => (self.focus_captured, self.click_point()),
        };
        if captured {
            return false;
        }
        let hit = point.is_some_and(|p| contains_point(clip, p));
        match kind {
            CaptureKind::Hover => self.hover_captured |= hit,
            CaptureKind::Focus => self.focus_captured |= hit,
        }
        hit
    }

    /// Position of the new generation's first left click.
    fn click_point(&self) -> Option<Vec2i> {
        self.next().events.iter().find_map(|e| match e.event {
            DeviceEvent::MouseDown { pos, button } if button.is_left() => Some(pos),
            _ => None,
        })
    }

    /// Re-establishes focus for the control that held it last frame.
    pub fn try_focus_restore(&mut self, parent: Option<ControlIndex>, index: ControlIndex, ty: ControlType, style: StyleId) -> bool {
        let prev = self.prev();
        let same_control = prev.focus_index == Some(index) && prev.focus_control.is_some_and(|c| c.ty == ty && c.style == style);
        let same_parent = match prev.focus_parent {
            None => true,
            Some(fp) => parent == Some(fp.begin) || parent == Some(fp.end),
        };
        if !(same_control && same_parent) {
            return false;
        }
        let next = self.next_mut();
        next.focus_index = Some(index);
        next.focus_parent = parent.map(|p| FocusParent { begin: p, end: p });
        true
    }

    /// `true` when last frame's focus lies strictly inside the container `begin..end`.
    pub fn focus_within(&self, begin: ControlIndex, end: ControlIndex) -> bool { self.prev().focus_index.is_some_and(|f| f > begin && f < end) }

    /// Closes the focus parent range opened by the container starting at `begin`.
    ///
    /// Returns `true` when that container is the immediate parent of the focused control.
    pub fn close_focus_parent(&mut self, begin: ControlIndex, end: ControlIndex) -> bool {
        match self.next_mut().focus_parent.as_mut() {
            Some(fp) if fp.begin == begin => {
                fp.end = end;
                true
            }
            _ => false,
        }
    }

    /// Rect and clip rect of last frame's focused control.
    pub fn focused_rects(&self) -> Option<(Recti, Recti)> { self.prev().focus_control.map(|c| (c.rect, c.clip_rect)) }

    pub fn focus_index(&self) -> Option<ControlIndex> { self.next().focus_index }

    pub fn edit_state(&self) -> TextEditState { self.next().edit }

    /// Replays last frame's events against a focused button or container.
    pub fn button(&mut self) -> UiFlags {
        let (prev, _) = self.split();
        let mut flags = UiFlags::FOCUS;
        let Some(rect) = prev.focus_control.map(|c| c.rect) else {
            return flags;
        };
        if prev.mouse_buttons.is_left() && contains_point(rect, prev.mouse_pos) {
            flags |= UiFlags::PRESSED;
        }
        if prev.keys.is_return() {
            flags |= UiFlags::PRESSED;
        }
        for e in prev.events.iter_mut() {
            match e.event {
                DeviceEvent::KeyDown { key: Key::Enter, .. } if !e.consumed => {
                    flags |= UiFlags::CLICKED;
                    e.consumed = true;
                }
                DeviceEvent::MouseUp { pos, button } if button.is_left() && contains_point(rect, pos) => flags |= UiFlags::CLICKED,
                _ => {}
            }
        }
        flags
    }

    /// Replays last frame's events against a focused text field.
    pub fn text(&mut self, filter: TextFilter, style: &Style, buf: &mut String, capacity: usize) -> UiFlags {
        let (prev, next) = self.split();
        let Some(control) = prev.focus_control else {
            return UiFlags::FOCUS;
        };
        let content = style.content_insets().shrink(control.rect);
        let origin_x = text_edit::text_origin(style, buf, next.edit.caret, content);
        let changed = text_edit::replay(&mut next.edit, &mut prev.events, prev.keys, filter, style, origin_x, buf, capacity);
        if changed { UiFlags::FOCUS | UiFlags::CHANGED } else { UiFlags::FOCUS }
    }

    /// Replays last frame's events against a focused scrollbar.
    pub fn scroll(&mut self, value: &mut i32) -> UiFlags {
        let (prev, next) = self.split();
        let mut flags = UiFlags::FOCUS;
        let Some(data) = prev.focus_control.as_ref().and_then(|c| c.scroll()).copied() else {
            return flags;
        };
        let axis = data.axis;
        let mut delta = 0;
        if prev.mouse_buttons.is_left() {
            let pointer = prev.mouse_pos;
            if prev.dragging {
                delta = axis.component(pointer) - axis.component(prev.drag_pos);
                next.dragging = true;
                next.drag_pos = pointer;
            } else if contains_point(data.pane, pointer) {
                let slider_start = axis.component(Vec2i::new(data.slider.x, data.slider.y));
                let slider_end = slider_start + axis.len(data.slider);
                let p = axis.component(pointer);
                if p < slider_start {
                    delta -= 1;
                } else if p >= slider_end {
                    delta += 1;
                }
            }
        }

        let (back, forward) = match axis {
            ScrollAxis::Vertical => (Key::Up, Key::Down),
            ScrollAxis::Horizontal => (Key::Left, Key::Right),
        };
        let page = axis.len(data.slider);
        for e in prev.events.iter_mut() {
            match e.event {
                DeviceEvent::KeyDown { key, .. } if !e.consumed => {
                    let step = if key == back {
                        -1
                    } else if key == forward {
                        1
                    } else if key == Key::PageUp {
                        -page
                    } else if key == Key::PageDown {
                        page
                    } else {
                        continue;
                    };
                    delta += step;
                    e.consumed = true;
                }
                DeviceEvent::MouseDown { pos, button } if button.is_left() && contains_point(data.slider, pos) => {
                    next.dragging = true;
                    next.drag_pos = pos;
                }
                _ => {}
            }
        }

        if delta != 0 {
            let d = match axis {
                ScrollAxis::Vertical => Vec2i::new(0, delta),
                ScrollAxis::Horizontal => Vec2i::new(delta, 0),
            };
            let step = drag_delta(axis, d, data.range, data.pane, data.slider);
            let v = (*value + step).clamp(0, data.range.max(0));
            if v != *value {
                *value = v;
                flags |= UiFlags::CHANGED;
            }
        }
        flags
    }

    /// Resolves keyboard navigation and click focus for the frame that just ended.
    pub fn end(&mut self, controls: &[Control]) {
        let (prev, next) = self.split();
        let mut focus = next.focus_index;

        if let Some(target) = navigation::navigate(controls, prev.focus_index, prev.focus_control.as_ref(), prev.focus_parent, &prev.events, prev.keys) {
            focus = Some(target);
        }

        if let Some(point) = self.click_point() {
            focus = None;
            for (i, c) in controls.iter().enumerate().rev() {
                if !navigation::is_focusable(c) {
                    continue;
                }
                if self.try_capture(CaptureKind::Focus, c.clip_rect) {
                    focus = Some(ControlIndex(i as u32));
                    break;
                }
            }
            log::trace!("click at ({}, {}) focuses {:?}", point.x, point.y, focus);
        }

        let prev_focus = self.prev().focus_index;
        let next = self.next_mut();
        next.focus_index = focus;
        if focus != prev_focus {
            next.focus_parent = None;
            next.edit = TextEditState::default();
        }
        if let Some(f) = focus {
            next.focus_control = controls.get(f.raw()).copied();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ControlData, ScrollData, rect};

    fn control(ty: ControlType, r: Recti) -> Control {
        let mut c = Control::new(ty, StyleId(0), UiFlags::NONE, ControlData::Id(0));
        c.rect = r;
        c.clip_rect = r;
        c
    }

    fn frame(input: &mut InputState, snapshot: &InputSnapshot) {
        let mut stats = FrameStats::default();
        input.begin(snapshot, &mut stats);
    }

    #[test]
    fn begin_filters_and_coalesces_events() {
        let mut input = InputState::new(16);
        let mut snap = InputSnapshot::default();
        snap.mousemove(1, 1);
        snap.mousemove(2, 2);
        snap.mousedown(2, 2, MouseButton::RIGHT);
        snap.mousedown(3, 3, MouseButton::LEFT);
        snap.keydown(Key::Shift, 0);
        frame(&mut input, &snap);
        let events = &input.next().events;
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0].event, DeviceEvent::MouseMove { pos, .. } if pos.x == 2));
        assert!(matches!(events[1].event, DeviceEvent::MouseDown { button, .. } if button.is_left()));
        assert!(input.next().keys.is_shift());
    }

    #[test]
    fn event_limit_is_counted() {
        let mut input = InputState::new(2);
        let mut snap = InputSnapshot::default();
        for c in b"abcd" {
            snap.keydown(Key::Other(*c as u32), *c);
        }
        let mut stats = FrameStats::default();
        input.begin(&snap, &mut stats);
        assert_eq!(input.next().events.len(), 2);
        assert_eq!(stats.dropped_events, 2);
    }

    #[test]
    fn capture_is_exclusive_per_kind() {
        let mut input = InputState::new(16);
        let mut snap = InputSnapshot::default();
        snap.mousedown(10, 10, MouseButton::LEFT);
        frame(&mut input, &snap);
        let a = rect(0, 0, 50, 50);
        let b = rect(5, 5, 50, 50);
        assert!(input.try_capture(CaptureKind::Hover, a));
        assert!(!input.try_capture(CaptureKind::Hover, b));
        assert!(input.try_capture(CaptureKind::Focus, b));
        assert!(!input.try_capture(CaptureKind::Focus, a));
        frame(&mut input, &InputSnapshot { mouse_pos: Vec2i::new(10, 10), ..Default::default() });
        assert!(input.try_capture(CaptureKind::Hover, b));
        assert!(!input.try_capture(CaptureKind::Focus, b));
    }

    #[test]
    fn click_focus_is_deferred_and_restored() {
        let mut input = InputState::new(16);
        let controls = vec![control(ControlType::Button, rect(0, 0, 50, 20)), control(ControlType::Button, rect(0, 30, 50, 20))];

        let mut snap = InputSnapshot::default();
        snap.mousedown(10, 35, MouseButton::LEFT);
        frame(&mut input, &snap);
        assert!(!input.try_focus_restore(None, ControlIndex(1), ControlType::Button, StyleId(0)));
        input.end(&controls);
        assert_eq!(input.focus_index(), Some(ControlIndex(1)));

        snap.clear_events();
        snap.mouseup(10, 35, MouseButton::LEFT);
        frame(&mut input, &snap);
        assert!(!input.try_focus_restore(None, ControlIndex(1), ControlType::Label, StyleId(0)));
        assert!(!input.try_focus_restore(None, ControlIndex(1), ControlType::Button, StyleId(3)));
        assert!(input.try_focus_restore(None, ControlIndex(1), ControlType::Button, StyleId(0)));
        let flags = input.button();
        assert!(flags.is_focused());
        assert!(flags.is_pressed());
        input.end(&controls);

        snap.clear_events();
        frame(&mut input, &snap);
        assert!(input.try_focus_restore(None, ControlIndex(1), ControlType::Button, StyleId(0)));
        assert!(input.button().is_clicked());
    }

    #[test]
    fn click_on_nothing_clears_focus() {
        let mut input = InputState::new(16);
        let controls = vec![control(ControlType::Button, rect(0, 0, 50, 20))];
        let mut snap = InputSnapshot::default();
        snap.mousedown(5, 5, MouseButton::LEFT);
        frame(&mut input, &snap);
        input.end(&controls);
        assert_eq!(input.focus_index(), Some(ControlIndex(0)));

        let mut snap = InputSnapshot::default();
        snap.mousedown(300, 300, MouseButton::LEFT);
        frame(&mut input, &snap);
        assert!(input.try_focus_restore(None, ControlIndex(0), ControlType::Button, StyleId(0)));
        input.end(&controls);
        assert_eq!(input.focus_index(), None);
    }

    #[test]
    fn focused_scrollbar_steps_with_keys() {
        let mut input = InputState::new(16);
        let mut bar = control(ControlType::VScrollbar, rect(0, 0, 20, 200));
        bar.data = ControlData::Scroll(ScrollData {
            axis: ScrollAxis::Vertical,
            range: 800,
            value: 0,
            slider_style: StyleId(0),
            pane: rect(0, 0, 20, 200),
            slider: rect(0, 0, 20, 40),
        });
        let controls = vec![bar];
        let mut snap = InputSnapshot::default();
        snap.mousedown(5, 100, MouseButton::LEFT);
        snap.mouseup(5, 100, MouseButton::LEFT);
        frame(&mut input, &snap);
        input.end(&controls);

        let mut value = 0;
        let mut snap = InputSnapshot::default();
        snap.keydown(Key::PageDown, 0);
        frame(&mut input, &snap);
        assert!(input.try_focus_restore(None, ControlIndex(0), ControlType::VScrollbar, StyleId(0)));
        assert!(!input.scroll(&mut value).is_changed());
        input.end(&controls);

        frame(&mut input, &InputSnapshot::default());
        assert!(input.try_focus_restore(None, ControlIndex(0), ControlType::VScrollbar, StyleId(0)));
        let flags = input.scroll(&mut value);
        // one page is the slider length: 40 px * 800 / 160
        assert_eq!(value, 200);
        assert!(flags.is_changed());
    }
}
