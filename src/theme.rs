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
//! Visual lookup by style and interaction flags, and the walk that turns a control list into
//! draw list geometry.

use thiserror::Error;

use crate::{
    Color, Control, ControlList, ControlType, DrawListBuilder, HAlign, Recti, Style, StyleId, TextureId, UiFlags, Vec2f, Vec2i,
    input::{text_origin, text_scroll},
    rect,
    style::lookup,
    vec2f,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Rejected visual map edits.
pub enum ThemeError {
    /// The style id is outside the sheet the map was sized for.
    #[error("style id {0} is outside the style sheet")]
    UnknownStyle(usize),
    /// The map already holds its maximum number of visuals.
    #[error("visual map is full ({0} entries)")]
    CapacityExceeded(usize),
}

#[derive(Copy, Clone, Default)]
/// Texture coordinates and pixel size of one piece of a visual.
pub struct VisualRect {
    /// Top-left texture coordinate.
    pub uv0: Vec2f,
    /// Bottom-right texture coordinate.
    pub uv1: Vec2f,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

/// Builds a [`VisualRect`] covering the inclusive pixel range `(l, t)..=(r, b)` of a `tex_w` by `tex_h` texture.
///
/// Reversed ranges mirror the piece.
pub fn calc_visual_rect(tex_w: i32, tex_h: i32, l: i32, t: i32, r: i32, b: i32) -> VisualRect {
    let (l, r, width) = if r >= l { (l, r + 1, r + 1 - l) } else { (l + 1, r, l + 1 - r) };
    let (t, b, height) = if b >= t { (t, b + 1, b + 1 - t) } else { (t + 1, b, t + 1 - b) };
    let (tw, th) = (tex_w.max(1) as f32, tex_h.max(1) as f32);
    VisualRect { uv0: vec2f(l as f32 / tw, t as f32 / th), uv1: vec2f(r as f32 / tw, b as f32 / th), width, height }
}

#[derive(Copy, Clone, Default)]
/// Nine-slice decomposition of a framed rectangle.
pub struct NineSlice {
    /// Top-left corner.
    pub top_left: VisualRect,
    /// Top edge, stretched horizontally.
    pub top: VisualRect,
    /// Top-right corner.
    pub top_right: VisualRect,
    /// Left edge, stretched vertically.
    pub left: VisualRect,
    /// Background, stretched both ways.
    pub center: VisualRect,
    /// Right edge, stretched vertically.
    pub right: VisualRect,
    /// Bottom-left corner.
    pub bottom_left: VisualRect,
    /// Bottom edge, stretched horizontally.
    pub bottom: VisualRect,
    /// Bottom-right corner.
    pub bottom_right: VisualRect,
}

#[derive(Copy, Clone, Default)]
/// How one style looks under one combination of interaction flags.
pub struct Visual {
    /// Texture every piece is sampled from.
    pub texture: TextureId,
    /// Text and caret color.
    pub fg_color: Color,
    /// Background color; fully transparent skips the background.
    pub bg_color: Color,
    /// Border color; fully transparent skips the frame.
    pub border_color: Color,
    /// Frame pieces.
    pub pieces: NineSlice,
}

#[derive(Copy, Clone)]
struct Entry {
    style: StyleId,
    flags: UiFlags,
    visual: Visual,
}

/// Visuals sorted by style id. Within a style, entries keep insertion order.
pub struct VisualMap {
    styles: usize,
    capacity: usize,
    entries: Vec<Entry>,
}

impl VisualMap {
    /// Creates an empty map for `styles` styles holding at most `visuals` entries.
    pub fn with_capacity(styles: usize, visuals: usize) -> Self { Self { styles, capacity: visuals, entries: Vec::with_capacity(visuals) } }

    /// Number of stored visuals.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns `true` when no visual is stored.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    fn style_range(&self, style: StyleId) -> std::ops::Range<usize> {
        let start = self.entries.partition_point(|e| e.style < style);
        let end = self.entries.partition_point(|e| e.style <= style);
        start..end
    }

    /// Registers `visual` for `style` when every flag of `flags` is set. An exact key is replaced.
    pub fn insert(&mut self, style: StyleId, flags: UiFlags, visual: Visual) -> Result<(), ThemeError> {
        if style.raw() >= self.styles {
            return Err(ThemeError::UnknownStyle(style.raw()));
        }
        let range = self.style_range(style);
        if let Some(e) = self.entries[range.clone()].iter_mut().find(|e| e.flags == flags) {
            e.visual = visual;
            return Ok(());
        }
        if self.entries.len() >= self.capacity {
            return Err(ThemeError::CapacityExceeded(self.capacity));
        }
        self.entries.insert(range.end, Entry { style, flags, visual });
        Ok(())
    }

    /// Best visual for a control: the entry with the most flags that are all present in `flags`.
    ///
    /// Later entries win ties. When no entry's flags are a subset, the style's first entry is used.
    pub fn find(&self, style: StyleId, flags: UiFlags) -> Option<&Visual> {
        let entries = &self.entries[self.style_range(style)];
        let mut best: Option<(&Entry, u32)> = None;
        for e in entries.iter().filter(|e| flags.contains(e.flags)) {
            let score = e.flags.bits().count_ones();
            if best.is_none_or(|(_, s)| score >= s) {
                best = Some((e, score));
            }
        }
        best.map(|(e, _)| e).or_else(|| entries.first()).map(|e| &e.visual)
    }
}

/// Draws control lists with the visuals of a [`VisualMap`].
pub struct Theme {
    visuals: VisualMap,
}

impl Theme {
    /// Wraps a populated visual map.
    pub fn new(visuals: VisualMap) -> Self { Self { visuals } }

    /// The visuals used for drawing.
    pub fn visuals(&self) -> &VisualMap { &self.visuals }

    /// Mutable access for edits between frames.
    pub fn visuals_mut(&mut self) -> &mut VisualMap { &mut self.visuals }

    /// Appends the geometry of every control of `list` to `out`, in list order.
    pub fn render(&self, list: &ControlList<'_>, styles: &[Style], out: &mut DrawListBuilder) {
        for control in list.iter() {
            let Some(style) = lookup(styles, control.style) else {
                continue;
            };
            match control.ty {
                ControlType::ContainerEnd => {}
                ControlType::ContainerBegin => self.draw_frame(control.style, control.flags, style, control.rect, control.clip_rect, out),
                ControlType::VScrollbar | ControlType::HScrollbar => {
                    self.draw_frame(control.style, control.flags, style, control.rect, control.clip_rect, out);
                    if let Some(data) = control.scroll() {
                        if data.slider.width > 0 && data.slider.height > 0 {
                            if let Some(slider_style) = lookup(styles, data.slider_style) {
                                self.draw_frame(data.slider_style, control.flags, slider_style, data.slider, control.clip_rect, out);
                            }
                        }
                    }
                }
                ControlType::Button | ControlType::Label | ControlType::TextBox | ControlType::NumberBox => {
                    self.draw_frame(control.style, control.flags, style, control.rect, control.clip_rect, out);
                    self.draw_text(control, list, style, out);
                }
            }
        }
    }

    fn draw_frame(&self, id: StyleId, flags: UiFlags, style: &Style, r: Recti, clip: Recti, out: &mut DrawListBuilder) {
        let Some(visual) = self.visuals.find(id, flags) else {
            return;
        };
        let p = &visual.pieces;
        let b = style.border;

        if visual.bg_color.a != 0 {
            let (w, h) = (r.width - b.left - b.right, r.height - b.top - b.bottom);
            if w > 0 && h > 0 {
                piece(out, visual, visual.bg_color, rect(r.x + b.left, r.y + b.top, w, h), &p.center, clip);
            }
        }
        if visual.border_color.a == 0 {
            return;
        }

        // edges use the pixel size of their pieces, so a frame may overlap the background
        let c = visual.border_color;
        let (xr, yb) = (r.x + r.width, r.y + r.height);
        let (lw, rw, th, bh) = (p.left.width, p.right.width, p.top.height, p.bottom.height);
        let (cw, ch) = (r.width - lw - rw, r.height - th - bh);
        if b.left > 0 && b.top > 0 {
            piece(out, visual, c, rect(r.x, r.y, p.top_left.width, p.top_left.height), &p.top_left, clip);
        }
        if b.right > 0 && b.top > 0 {
            piece(out, visual, c, rect(xr - rw, r.y, p.top_right.width, p.top_right.height), &p.top_right, clip);
        }
        if b.left > 0 && b.bottom > 0 {
            piece(out, visual, c, rect(r.x, yb - bh, p.bottom_left.width, p.bottom_left.height), &p.bottom_left, clip);
        }
        if b.right > 0 && b.bottom > 0 {
            piece(out, visual, c, rect(xr - rw, yb - bh, p.bottom_right.width, p.bottom_right.height), &p.bottom_right, clip);
        }
        if b.left > 0 {
            piece(out, visual, c, rect(r.x, r.y + th, lw, ch), &p.left, clip);
        }
        if b.right > 0 {
            piece(out, visual, c, rect(xr - rw, r.y + th, rw, ch), &p.right, clip);
        }
        if b.top > 0 {
            piece(out, visual, c, rect(r.x + lw, r.y, cw, th), &p.top, clip);
        }
        if b.bottom > 0 {
            piece(out, visual, c, rect(r.x + lw, yb - bh, cw, bh), &p.bottom, clip);
        }
    }

    fn draw_text(&self, control: &Control, list: &ControlList<'_>, style: &Style, out: &mut DrawListBuilder) {
        let (Some(font), Some(visual)) = (style.font.as_deref(), self.visuals.find(control.style, control.flags)) else {
            return;
        };
        let text = list.text(control);
        let content = style.content_insets().shrink(control.rect);
        if content.width <= 0 || content.height <= 0 {
            return;
        }

        let editing = control.flags.is_focused() && matches!(control.ty, ControlType::TextBox | ControlType::NumberBox);
        let mut scroll = 0;
        if editing {
            let caret = list.caret().min(text.len());
            let prefix = text.get(..caret).unwrap_or(text);
            // same origin the click replay maps the pointer against
            let origin = text_origin(style, text, caret, content);
            scroll = text_scroll(style, text, caret, content.width);
            let caret_rect = rect(origin + font.text_width(prefix), content.y, font.advance_width('|'), content.height);
            out.add_text(font, visual.fg_color, "|", caret_rect, Vec2i::default(), HAlign::Left, style.valign, control.clip_rect);
        }
        out.add_text(font, visual.fg_color, text, content, Vec2i::new(scroll, 0), style.halign, style.valign, control.clip_rect);
    }
}

fn piece(out: &mut DrawListBuilder, visual: &Visual, color: Color, r: Recti, piece: &VisualRect, clip: Recti) {
    out.add_rect(visual.texture, color, r, clip, piece.uv0, piece.uv1);
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{BitmapFont, Dimensioni, DrawListConfig, InputSnapshot, Insets, LayoutRect, MouseButton, Ui, UiConfig, color};

    fn tinted(fg: u8) -> Visual {
        Visual { fg_color: color(fg, fg, fg, 255), bg_color: color(0, 0, 0, 255), ..Default::default() }
    }

    #[test]
    fn visual_rect_covers_inclusive_pixels() {
        let r = calc_visual_rect(64, 32, 0, 0, 15, 7);
        assert_eq!((r.width, r.height), (16, 8));
        assert_eq!((r.uv0.x, r.uv0.y, r.uv1.x, r.uv1.y), (0.0, 0.0, 0.25, 0.25));
        let m = calc_visual_rect(64, 32, 15, 0, 0, 7);
        assert_eq!(m.width, 16);
        assert_eq!((m.uv0.x, m.uv1.x), (0.25, 0.0));
    }

    #[test]
    fn find_prefers_the_most_specific_subset() {
        let mut map = VisualMap::with_capacity(2, 8);
        map.insert(StyleId(1), UiFlags::NONE, tinted(1)).unwrap();
        map.insert(StyleId(1), UiFlags::HOVER, tinted(2)).unwrap();
        map.insert(StyleId(1), UiFlags::HOVER | UiFlags::FOCUS, tinted(3)).unwrap();
        map.insert(StyleId(1), UiFlags::FOCUS, tinted(4)).unwrap();
        map.insert(StyleId(0), UiFlags::PRESSED, tinted(5)).unwrap();

        let fg = |s: usize, f: UiFlags| map.find(StyleId(s), f).map(|v| v.fg_color.r);
        assert_eq!(fg(1, UiFlags::NONE), Some(1));
        assert_eq!(fg(1, UiFlags::HOVER | UiFlags::DISABLED), Some(2));
        assert_eq!(fg(1, UiFlags::HOVER | UiFlags::FOCUS), Some(3));
        assert_eq!(fg(1, UiFlags::FOCUS), Some(4));
        // nothing matches: first entry of the style
        assert_eq!(fg(0, UiFlags::NONE), Some(5));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn equally_specific_matches_prefer_the_later_entry() {
        let mut map = VisualMap::with_capacity(1, 8);
        map.insert(StyleId(0), UiFlags::HOVER, tinted(1)).unwrap();
        map.insert(StyleId(0), UiFlags::FOCUS, tinted(2)).unwrap();
        assert_eq!(map.find(StyleId(0), UiFlags::HOVER | UiFlags::FOCUS).map(|v| v.fg_color.r), Some(2));
    }

    #[test]
    fn insert_replaces_and_validates() {
        let mut map = VisualMap::with_capacity(1, 1);
        map.insert(StyleId(0), UiFlags::NONE, tinted(1)).unwrap();
        map.insert(StyleId(0), UiFlags::NONE, tinted(9)).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.find(StyleId(0), UiFlags::NONE).map(|v| v.fg_color.r), Some(9));
        assert_eq!(map.insert(StyleId(0), UiFlags::HOVER, tinted(2)), Err(ThemeError::CapacityExceeded(1)));
        assert_eq!(map.insert(StyleId(3), UiFlags::NONE, tinted(2)), Err(ThemeError::UnknownStyle(3)));
        assert!(map.find(StyleId(5), UiFlags::NONE).is_none());
    }

    #[test]
    fn renders_frames_text_and_caret() {
        let font = Rc::new(BitmapFont::monospace(TextureId::new(7), Dimensioni::new(8, 16)));
        let styles = vec![Style { font: Some(font), padding: Insets::uniform(2), ..Default::default() }];
        let mut ui = Ui::new(UiConfig::default(), styles.clone()).unwrap();
        let mut map = VisualMap::with_capacity(1, 4);
        map.insert(StyleId(0), UiFlags::NONE, Visual { texture: TextureId::new(3), ..tinted(200) }).unwrap();
        let theme = Theme::new(map);
        let mut builder = DrawListBuilder::new(DrawListConfig::default()).unwrap();

        let mut text = String::from("ab");
        let r = LayoutRect::fixed(0, 0, 100, 20);
        let mut click = InputSnapshot::default();
        click.mousedown(90, 5, MouseButton::LEFT);
        ui.frame(Dimensioni::new(200, 100), &click, |ui| {
            ui.textbox(StyleId(0), UiFlags::NONE, r, &mut text, 8);
        });
        let list = ui.frame(Dimensioni::new(200, 100), &InputSnapshot::default(), |ui| {
            ui.textbox(StyleId(0), UiFlags::NONE, r, &mut text, 8);
        });
        assert!(list.controls()[0].flags.is_focused());
        assert_eq!(list.caret(), 2);

        builder.begin();
        theme.render(&list, &styles, &mut builder);
        let out = builder.end();
        // background, then caret and text in the font texture
        let textures: Vec<_> = out.commands.iter().map(|c| c.texture.raw()).collect();
        assert_eq!(textures, vec![3, 7]);
        assert_eq!(out.commands[1].vertex_count, 18);
        let caret = out.vertices[6].position();
        assert_eq!(caret.x, 2.0 + 16.0);
    }

    #[test]
    fn caret_and_click_follow_right_aligned_text() {
        let font = Rc::new(BitmapFont::monospace(TextureId::new(7), Dimensioni::new(8, 16)));
        let styles = vec![Style { font: Some(font), halign: HAlign::Right, padding: Insets::uniform(2), ..Default::default() }];
        let mut ui = Ui::new(UiConfig::default(), styles.clone()).unwrap();
        let mut map = VisualMap::with_capacity(1, 4);
        map.insert(StyleId(0), UiFlags::NONE, tinted(200)).unwrap();
        let theme = Theme::new(map);
        let mut builder = DrawListBuilder::new(DrawListConfig::default()).unwrap();

        // content spans 2..98, so "ab" is drawn over 82..98
        let mut text = String::from("ab");
        let r = LayoutRect::fixed(0, 0, 100, 20);
        let mut click = InputSnapshot::default();
        click.mousedown(85, 5, MouseButton::LEFT);
        ui.frame(Dimensioni::new(200, 100), &click, |ui| {
            ui.textbox(StyleId(0), UiFlags::NONE, r, &mut text, 8);
        });
        let list = ui.frame(Dimensioni::new(200, 100), &InputSnapshot::default(), |ui| {
            ui.textbox(StyleId(0), UiFlags::NONE, r, &mut text, 8);
        });
        assert_eq!(list.caret(), 0);

        builder.begin();
        theme.render(&list, &styles, &mut builder);
        let out = builder.end();
        let font_cmd = out.commands.iter().find(|c| c.texture.raw() == 7).unwrap();
        let caret = out.vertices[font_cmd.vertex_offset].position();
        let first_glyph = out.vertices[font_cmd.vertex_offset + 6].position();
        assert_eq!(caret.x, 82.0);
        assert_eq!(first_glyph.x, 82.0);
    }
}
