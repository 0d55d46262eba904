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
use super::{DeviceEvent, FrameEvent, Key, KeyMode, TextFilter};
use crate::{Recti, Style, geometry::align_shift};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Caret and selection of the focused text field, as byte offsets.
pub(crate) struct TextEditState {
    pub caret: usize,
    pub sel_min: usize,
    pub sel_max: usize,
}

impl TextEditState {
    pub fn select_start(&self) -> usize { self.sel_min }

    pub fn select_len(&self) -> usize { self.sel_max - self.sel_min }

    fn has_selection(&self) -> bool { self.sel_min < self.sel_max }

    fn collapse(&mut self) {
        self.sel_min = self.caret;
        self.sel_max = self.caret;
    }

    /// Pulls every offset back inside `buf`, onto a char boundary.
    fn clamp(&mut self, buf: &str) {
        self.caret = floor_boundary(buf, self.caret);
        self.sel_min = floor_boundary(buf, self.sel_min);
        self.sel_max = floor_boundary(buf, self.sel_max);
        if self.sel_min > self.sel_max {
            std::mem::swap(&mut self.sel_min, &mut self.sel_max);
        }
    }

    /// Moves the caret while keeping the far end of the selection fixed.
    fn select_to(&mut self, caret: usize) {
        let anchor = if !self.has_selection() {
            self.caret
        } else if self.caret == self.sel_min {
            self.sel_max
        } else {
            self.sel_min
        };
        self.caret = caret;
        self.sel_min = anchor.min(caret);
        self.sel_max = anchor.max(caret);
    }

    fn delete_selection(&mut self, buf: &mut String) {
        buf.replace_range(self.sel_min..self.sel_max, "");
        self.caret = self.sel_min;
        self.collapse();
    }
}

fn floor_boundary(buf: &str, pos: usize) -> usize {
    let mut pos = pos.min(buf.len());
    while pos > 0 && !buf.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

fn delete_prev(buf: &mut String, cursor: &mut usize) -> bool {
    if *cursor == 0 {
        return false;
    }
    let start = move_left(buf, *cursor);
    buf.replace_range(start..*cursor, "");
    *cursor = start;
    true
}

fn delete_next(buf: &mut String, cursor: usize) -> bool {
    if cursor >= buf.len() {
        return false;
    }
    let end = move_right(buf, cursor);
    buf.replace_range(cursor..end, "");
    true
}

fn move_left(buf: &str, cursor: usize) -> usize {
    if cursor == 0 {
        return 0;
    }
    floor_boundary(buf, cursor - 1)
}

fn move_right(buf: &str, cursor: usize) -> usize {
    if cursor >= buf.len() {
        return buf.len();
    }
    let mut next = cursor + 1;
    while next < buf.len() && !buf.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// Horizontal scroll that keeps the caret (and a caret glyph) visible inside `width`.
pub(crate) fn text_scroll(style: &Style, text: &str, caret: usize, width: i32) -> i32 {
    let caret = floor_boundary(text, caret);
    let caret_end = style.text_width(&text[..caret]) + style.font.as_ref().map_or(0, |f| f.advance_width('|'));
    (caret_end - width).max(0)
}

/// Screen x of the first glyph of an edited field: the style's alignment inside `content`, minus the
/// scroll that keeps the caret visible.
pub(crate) fn text_origin(style: &Style, text: &str, caret: usize, content: Recti) -> i32 {
    let shift = align_shift(style.halign, style.text_width(text), content.width);
    content.x + shift - text_scroll(style, text, caret, content.width)
}

/// Byte offset of the glyph under a click at `x`, the text starting at `origin_x`. Clicks past the
/// last glyph land at the end.
pub(crate) fn caret_from_x(buf: &str, style: &Style, origin_x: i32, x: i32) -> usize {
    let Some(font) = style.font.as_ref() else {
        return buf.len();
    };
    let mut acc = origin_x;
    for (idx, ch) in buf.char_indices() {
        acc += font.advance_width(ch);
        if x < acc {
            return idx;
        }
    }
    buf.len()
}

/// Applies one key press. Returns whether the event was consumed.
#[allow(clippy::too_many_arguments)]
fn apply_key(state: &mut TextEditState, key: Key, ascii: u8, shift: bool, filter: TextFilter, buf: &mut String, capacity: usize, changed: &mut bool) -> bool {
    let len = buf.len();
    match key {
        Key::Home | Key::End | Key::Left | Key::Right if shift => {
            let caret = match key {
                Key::Home => 0,
                Key::End => len,
                Key::Left => move_left(buf, state.caret),
                _ => move_right(buf, state.caret),
            };
            state.select_to(caret);
            true
        }
        Key::Home => {
            state.caret = 0;
            state.collapse();
            true
        }
        Key::End => {
            state.caret = len;
            state.collapse();
            true
        }
        Key::Left => {
            state.caret = if state.has_selection() { state.sel_min } else { move_left(buf, state.caret) };
            state.collapse();
            true
        }
        Key::Right => {
            state.caret = if state.has_selection() { state.sel_max } else { move_right(buf, state.caret) };
            state.collapse();
            true
        }
        Key::Backspace => {
            if state.has_selection() {
                state.delete_selection(buf);
                *changed = true;
            } else if delete_prev(buf, &mut state.caret) {
                state.collapse();
                *changed = true;
            }
            true
        }
        Key::Delete => {
            if state.has_selection() {
                state.delete_selection(buf);
                *changed = true;
            } else if delete_next(buf, state.caret) {
                *changed = true;
            }
            true
        }
        Key::Tab | Key::Enter | Key::Up | Key::Down | Key::PageUp | Key::PageDown | Key::Escape | Key::Shift | Key::Ctrl | Key::Alt => false,
        Key::Other(_) => {
            if !filter.accepts(ascii) {
                return false;
            }
            if state.has_selection() {
                state.delete_selection(buf);
                *changed = true;
            }
            let ch = ascii as char;
            if buf.len() + ch.len_utf8() <= capacity {
                buf.insert(state.caret, ch);
                state.caret += ch.len_utf8();
                state.collapse();
                *changed = true;
            }
            true
        }
    }
}

/// Replays unconsumed events against the focused text field and returns whether `buf` changed.
///
/// `capacity` is the hard length limit of `buf` in bytes; insertions that would exceed it are
/// swallowed.
#[allow(clippy::too_many_arguments)]
pub(crate) fn replay(state: &mut TextEditState, events: &mut [FrameEvent], keys: KeyMode, filter: TextFilter, style: &Style, origin_x: i32, buf: &mut String, capacity: usize) -> bool {
    state.clamp(buf);
    let mut changed = false;
    for e in events.iter_mut().filter(|e| !e.consumed) {
        match e.event {
            DeviceEvent::KeyDown { key, ascii } => {
                e.consumed = apply_key(state, key, ascii, keys.is_shift(), filter, buf, capacity, &mut changed);
            }
            DeviceEvent::MouseDown { pos, button } if button.is_left() => {
                let caret = caret_from_x(buf, style, origin_x, pos.x);
                if keys.is_shift() {
                    state.select_to(caret);
                } else {
                    state.caret = caret;
                    state.collapse();
                }
                e.consumed = true;
            }
            DeviceEvent::MouseMove { pos, buttons } if buttons.is_left() => {
                let caret = caret_from_x(buf, style, origin_x, pos.x);
                state.caret = caret;
                state.sel_min = state.sel_min.min(caret);
                state.sel_max = state.sel_max.max(caret);
                e.consumed = true;
            }
            _ => {}
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitmapFont, Dimensioni, TextureId, Vec2i};
    use std::rc::Rc;

    fn style() -> Style {
        Style { font: Some(Rc::new(BitmapFont::monospace(TextureId::new(0), Dimensioni::new(8, 12)))), ..Style::default() }
    }

    fn key(key: Key, ascii: u8) -> FrameEvent { FrameEvent { event: DeviceEvent::KeyDown { key, ascii }, consumed: false } }

    fn ch(c: u8) -> FrameEvent { key(Key::Other(c as u32), c) }

    fn run(state: &mut TextEditState, buf: &mut String, keys: KeyMode, events: &mut [FrameEvent]) -> bool {
        replay(state, events, keys, TextFilter::Print, &style(), 0, buf, 16)
    }

    #[test]
    fn insert_then_backspace_round_trips() {
        let mut buf = String::from("hello");
        let mut state = TextEditState { caret: 2, sel_min: 2, sel_max: 2 };
        assert!(run(&mut state, &mut buf, KeyMode::NONE, &mut [ch(b'x')]));
        assert_eq!(buf, "hexllo");
        assert_eq!(state.caret, 3);
        assert!(run(&mut state, &mut buf, KeyMode::NONE, &mut [key(Key::Backspace, 8)]));
        assert_eq!(buf, "hello");
        assert_eq!(state.caret, 2);
    }

    #[test]
    fn typing_replaces_the_selection() {
        let mut buf = String::from("abcdef");
        let mut state = TextEditState { caret: 4, sel_min: 1, sel_max: 4 };
        run(&mut state, &mut buf, KeyMode::NONE, &mut [ch(b'Z')]);
        assert_eq!(buf, "aZef");
        assert_eq!(state.caret, 2);
        assert_eq!(state.select_len(), 0);
    }

    #[test]
    fn shift_arrows_grow_and_shrink_from_the_anchor() {
        let mut buf = String::from("abcdef");
        let mut state = TextEditState { caret: 3, sel_min: 3, sel_max: 3 };
        run(&mut state, &mut buf, KeyMode::SHIFT, &mut [key(Key::Right, 0), key(Key::Right, 0)]);
        assert_eq!((state.sel_min, state.sel_max, state.caret), (3, 5, 5));
        run(&mut state, &mut buf, KeyMode::SHIFT, &mut [key(Key::Left, 0)]);
        assert_eq!((state.sel_min, state.sel_max, state.caret), (3, 4, 4));
        run(&mut state, &mut buf, KeyMode::SHIFT, &mut [key(Key::Home, 0)]);
        assert_eq!((state.sel_min, state.sel_max, state.caret), (0, 3, 0));
        run(&mut state, &mut buf, KeyMode::NONE, &mut [key(Key::Right, 0)]);
        assert_eq!((state.sel_min, state.sel_max, state.caret), (3, 3, 3));
    }

    #[test]
    fn capacity_is_a_hard_byte_limit() {
        let mut buf = String::from("abc");
        let mut state = TextEditState { caret: 3, sel_min: 3, sel_max: 3 };
        let mut events = [ch(b'd'), ch(b'e')];
        replay(&mut state, &mut events, KeyMode::NONE, TextFilter::Print, &style(), 0, &mut buf, 4);
        assert_eq!(buf, "abcd");
        assert!(events.iter().all(|e| e.consumed));
    }

    #[test]
    fn filters_and_pass_through_keys() {
        let mut buf = String::new();
        let mut state = TextEditState::default();
        let mut events = [ch(b'1'), ch(b'a'), ch(b'-'), key(Key::Tab, b'\t'), key(Key::Up, 0)];
        replay(&mut state, &mut events, KeyMode::NONE, TextFilter::Numeric, &style(), 0, &mut buf, 8);
        assert_eq!(buf, "1-");
        let consumed: Vec<bool> = events.iter().map(|e| e.consumed).collect();
        assert_eq!(consumed, vec![true, false, true, false, false]);
    }

    #[test]
    fn stale_offsets_are_clamped() {
        let mut buf = String::from("ab");
        let mut state = TextEditState { caret: 10, sel_min: 7, sel_max: 9 };
        run(&mut state, &mut buf, KeyMode::NONE, &mut [key(Key::Delete, 0)]);
        assert_eq!(buf, "ab");
        assert_eq!(state.caret, 2);
    }

    #[test]
    fn multibyte_characters_are_deleted_whole() {
        let mut buf = String::from("aé");
        let mut state = TextEditState { caret: 3, sel_min: 3, sel_max: 3 };
        run(&mut state, &mut buf, KeyMode::NONE, &mut [key(Key::Left, 0), key(Key::Delete, 0)]);
        assert_eq!(buf, "a");
        assert_eq!(state.caret, 1);
    }

    #[test]
    fn click_and_drag_select() {
        let mut buf = String::from("abcdef");
        let mut state = TextEditState::default();
        let mut events = [
            FrameEvent { event: DeviceEvent::MouseDown { pos: Vec2i::new(17, 0), button: crate::MouseButton::LEFT }, consumed: false },
            FrameEvent { event: DeviceEvent::MouseMove { pos: Vec2i::new(41, 0), buttons: crate::MouseButton::LEFT }, consumed: false },
        ];
        run(&mut state, &mut buf, KeyMode::NONE, &mut events);
        assert_eq!((state.sel_min, state.sel_max, state.caret), (2, 5, 5));
    }

    #[test]
    fn click_lands_on_the_glyph_under_the_pointer() {
        let buf = "abc";
        let s = style();
        // left and right half of 'a', then 'b' and past the end
        assert_eq!(caret_from_x(buf, &s, 0, 1), 0);
        assert_eq!(caret_from_x(buf, &s, 0, 5), 0);
        assert_eq!(caret_from_x(buf, &s, 0, 15), 1);
        assert_eq!(caret_from_x(buf, &s, 0, 40), 3);
        assert_eq!(caret_from_x(buf, &s, 10, 13), 0);
    }

    #[test]
    fn drag_extends_to_the_glyph_under_the_pointer() {
        let mut buf = String::from("abcdef");
        let mut state = TextEditState::default();
        let mut events = [
            FrameEvent { event: DeviceEvent::MouseDown { pos: Vec2i::new(14, 0), button: crate::MouseButton::LEFT }, consumed: false },
            FrameEvent { event: DeviceEvent::MouseMove { pos: Vec2i::new(38, 0), buttons: crate::MouseButton::LEFT }, consumed: false },
        ];
        run(&mut state, &mut buf, KeyMode::NONE, &mut events);
        assert_eq!((state.sel_min, state.sel_max, state.caret), (1, 4, 4));
    }

    #[test]
    fn origin_follows_the_style_alignment() {
        let mut s = style();
        let content = crate::rect(10, 0, 100, 12);
        assert_eq!(text_origin(&s, "ab", 0, content), 10);
        s.halign = crate::HAlign::Right;
        assert_eq!(text_origin(&s, "ab", 0, content), 10 + 100 - 16);
        s.halign = crate::HAlign::Center;
        assert_eq!(text_origin(&s, "ab", 0, content), 10 + 42);
        // overflowing text is scrolled so the caret stays visible
        s.halign = crate::HAlign::Left;
        assert_eq!(text_origin(&s, "abcdefghijklmn", 14, content), 10 - (14 * 8 + 8 - 100));
    }

    #[test]
    fn scroll_keeps_caret_visible() {
        let s = style();
        assert_eq!(text_scroll(&s, "abcdefghij", 2, 40), 0);
        // caret after 10 glyphs plus the caret glyph: 88 - 40
        assert_eq!(text_scroll(&s, "abcdefghij", 10, 40), 48);
    }
}
