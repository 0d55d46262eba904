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
//! Two-pass layout solver.
//!
//! Commands are appended in pre-order while the client declares its widgets, so every command's
//! children occupy the contiguous index range `[child_begin, child_end)` right after it. Sizes are
//! solved bottom-up by sweeping the array backwards; positions and clip rects are then solved
//! top-down by sweeping it forwards.

use crate::{
    ControlData, ControlIndex, ControlType, FrameStats, HAlign, Recti, ScrollAxis, Style, VAlign, Vec2i,
    control::ControlBuffer,
    geometry::{Anchor, anchor, intersect, union_opt},
    rect,
    scrollbar::{scroll_range, slider_rect},
    style::lookup,
};

/// Describes how a layout dimension should be resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizePolicy {
    /// Shrinks to the content: text width, field capacity or the children's extent.
    Auto,
    /// Uses the style's `default_width` / `default_height`.
    Default,
    /// Exactly this many pixels.
    Fixed(i32),
    /// Takes the space left over by the non-fill siblings.
    Fill,
}

impl Default for SizePolicy {
    fn default() -> Self { SizePolicy::Auto }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Requested placement of a widget or group: an offset from its anchor plus size policies.
pub struct LayoutRect {
    /// Horizontal offset from the anchor chosen by the alignment.
    pub x: i32,
    /// Vertical offset from the anchor chosen by the alignment.
    pub y: i32,
    /// Width policy.
    pub width: SizePolicy,
    /// Height policy.
    pub height: SizePolicy,
}

impl LayoutRect {
    /// Creates a layout rect from an offset and two policies.
    pub fn new(x: i32, y: i32, width: SizePolicy, height: SizePolicy) -> Self { Self { x, y, width, height } }

    /// Fixed size at an offset.
    pub fn fixed(x: i32, y: i32, w: i32, h: i32) -> Self { Self::new(x, y, SizePolicy::Fixed(w), SizePolicy::Fixed(h)) }

    /// Content-sized at the anchor.
    pub fn auto() -> Self { Self::new(0, 0, SizePolicy::Auto, SizePolicy::Auto) }

    /// Takes all the space the parent hands out.
    pub fn fill() -> Self { Self::new(0, 0, SizePolicy::Fill, SizePolicy::Fill) }

    /// Style default size at the anchor.
    pub fn default_size() -> Self { Self::new(0, 0, SizePolicy::Default, SizePolicy::Default) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// How a command arranges its direct children.
pub enum LayoutMode {
    /// Each child is anchored independently inside the content rect.
    Absolute,
    /// Children are laid out left to right.
    Columns,
    /// Children are laid out top to bottom.
    Rows,
    /// Reserved for grid layouts; currently arranged like [`LayoutMode::Absolute`].
    Table,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Handle of a layout command, valid until the next frame begins.
pub struct CmdIndex(u32);

impl CmdIndex {
    /// Returned by pushes that did not fit; commands pushed under it are ignored.
    pub const FULL: CmdIndex = CmdIndex(u32::MAX);

    /// Returns `true` for the [`CmdIndex::FULL`] sentinel.
    pub fn is_full(self) -> bool { self == Self::FULL }

    /// Returns the raw index.
    pub fn raw(self) -> usize { self.0 as usize }
}

/// Everything a command needs besides its parent.
#[derive(Copy, Clone)]
pub(crate) struct CommandDesc {
    pub mode: LayoutMode,
    pub halign: HAlign,
    pub valign: VAlign,
    pub spacing: i32,
    pub target: Option<CmdIndex>,
    pub control: Option<ControlIndex>,
    pub scroll: Vec2i,
    pub rect: LayoutRect,
}

impl CommandDesc {
    pub fn group(mode: LayoutMode, halign: HAlign, valign: VAlign, spacing: i32, rect: LayoutRect) -> Self {
        Self { mode, halign, valign, spacing, target: None, control: None, scroll: Vec2i::default(), rect }
    }
}

#[derive(Clone)]
pub(crate) struct LayoutCommand {
    desc: CommandDesc,
    parent: Option<CmdIndex>,
    trailing: Option<ControlIndex>,
    child_begin: usize,
    child_end: usize,
    auto_w: i32,
    auto_h: i32,
    rect: Recti,
    content_rect: Recti,
    clip_rect: Recti,
    child_clip: Recti,
    child_area: Option<Recti>,
}

impl LayoutCommand {
    fn has_control(&self) -> bool { self.desc.control.is_some() }
}

/// Per-frame command arena.
pub(crate) struct LayoutList {
    cmds: Vec<LayoutCommand>,
    capacity: usize,
    scratch: Vec<usize>,
}

impl LayoutList {
    pub fn new(capacity: usize) -> Self { Self { cmds: Vec::with_capacity(capacity), capacity, scratch: Vec::new() } }

    pub fn begin(&mut self) { self.cmds.clear(); }

    pub fn len(&self) -> usize { self.cmds.len() }

    /// `true` while another command fits into the arena.
    pub fn has_room(&self) -> bool { self.cmds.len() < self.capacity }

    pub fn push(&mut self, parent: Option<CmdIndex>, desc: CommandDesc, stats: &mut FrameStats) -> CmdIndex {
        if parent.is_some_and(|p| p.is_full()) {
            return CmdIndex::FULL;
        }
        if self.cmds.len() >= self.capacity {
            stats.dropped_commands += 1;
            if stats.dropped_commands == 1 {
                log::warn!("layout command arena full, dropping widgets for this frame");
            }
            return CmdIndex::FULL;
        }
        let index = self.cmds.len();
        self.cmds.push(LayoutCommand {
            desc,
            parent,
            trailing: None,
            child_begin: index + 1,
            child_end: index + 1,
            auto_w: 0,
            auto_h: 0,
            rect: Recti::default(),
            content_rect: Recti::default(),
            clip_rect: Recti::default(),
            child_clip: Recti::default(),
            child_area: None,
        });
        CmdIndex(index as u32)
    }

    /// Closes the child range of `cmd` and records the control emitted after its children.
    pub fn pop(&mut self, cmd: CmdIndex, trailing: Option<ControlIndex>) {
        let end = self.cmds.len();
        if let Some(c) = self.cmds.get_mut(cmd.raw()) {
            c.child_end = end;
            c.trailing = trailing;
        }
    }

    pub fn set_scroll(&mut self, cmd: CmdIndex, scroll: Vec2i) {
        if let Some(c) = self.cmds.get_mut(cmd.raw()) {
            c.desc.scroll = scroll;
        }
    }

    pub fn rect(&self, cmd: CmdIndex) -> Option<Recti> { self.cmds.get(cmd.raw()).map(|c| c.rect) }

    pub fn content_rect(&self, cmd: CmdIndex) -> Option<Recti> { self.cmds.get(cmd.raw()).map(|c| c.content_rect) }

    pub fn clip_rect(&self, cmd: CmdIndex) -> Option<Recti> { self.cmds.get(cmd.raw()).map(|c| c.clip_rect) }

    /// Extent of the children of `cmd` as `(width, height)`.
    pub fn children_size(&self, cmd: CmdIndex) -> Option<(i32, i32)> {
        self.cmds.get(cmd.raw()).map(|c| c.child_area.map_or((0, 0), |a| (a.width.max(0), a.height.max(0))))
    }

    fn collect_children(&self, begin: usize, end: usize, out: &mut Vec<usize>) {
        out.clear();
        let mut i = begin;
        while i < end.min(self.cmds.len()) {
            out.push(i);
            i = self.cmds[i].child_end.max(i + 1);
        }
    }

    pub fn end(&mut self, styles: &[Style], controls: &mut ControlBuffer, screen: Recti) {
        self.measure(styles, controls);
        self.place(styles, controls, screen);
        self.accumulate_child_areas();
        self.resolve_scrollbars(styles, controls);
    }

    // --- pass 0 ------------------------------------------------------------------------------

    fn measure(&mut self, styles: &[Style], controls: &ControlBuffer) {
        let mut children = std::mem::take(&mut self.scratch);
        for i in (0..self.cmds.len()).rev() {
            let cmd = &self.cmds[i];
            self.collect_children(cmd.child_begin, cmd.child_end, &mut children);
            let (natural_w, natural_h) = self.natural_size(i, &children, styles, controls);
            let default = cmd.desc.control.and_then(|ci| controls.get(ci)).and_then(|c| lookup(styles, c.style));
            let default_w = default.map_or(0, |s| s.default_width);
            let default_h = default.map_or(0, |s| s.default_height);

            let cmd = &mut self.cmds[i];
            cmd.auto_w = resolve_size(cmd.desc.rect.width, natural_w, default_w);
            cmd.auto_h = resolve_size(cmd.desc.rect.height, natural_h, default_h);
            cmd.rect.width = if cmd.desc.rect.width == SizePolicy::Fill { 0 } else { cmd.auto_w };
            cmd.rect.height = if cmd.desc.rect.height == SizePolicy::Fill { 0 } else { cmd.auto_h };
        }
        self.scratch = children;
    }

    fn natural_size(&self, i: usize, children: &[usize], styles: &[Style], controls: &ControlBuffer) -> (i32, i32) {
        let cmd = &self.cmds[i];
        let mut w = 0;
        let mut h = 0;
        if let Some(control) = cmd.desc.control.and_then(|ci| controls.get(ci)) {
            if let Some(style) = lookup(styles, control.style) {
                let insets = style.content_insets();
                w += insets.horizontal();
                h += insets.vertical();
                match control.ty {
                    ControlType::Button | ControlType::Label => {
                        let text = control.text_span().and_then(|s| controls.text().get(s.start..s.start + s.len)).unwrap_or("");
                        w += style.text_width(text);
                        h += style.line_height();
                    }
                    ControlType::TextBox | ControlType::NumberBox => {
                        let capacity = control.text_span().map_or(0, |s| s.capacity) as i32;
                        w += style.max_char_width().saturating_mul(capacity);
                        h += style.line_height();
                    }
                    ControlType::VScrollbar | ControlType::HScrollbar => {
                        if let Some(slider) = control.scroll().and_then(|s| lookup(styles, s.slider_style)) {
                            let insets = slider.content_insets();
                            w += insets.horizontal();
                            h += insets.vertical();
                        }
                    }
                    ControlType::ContainerBegin | ControlType::ContainerEnd => {}
                }
            }
        }

        let spacing = cmd.desc.spacing;
        let mut content_w = 0;
        let mut content_h = 0;
        for (n, &c) in children.iter().enumerate() {
            let child = &self.cmds[c];
            let gap = if n > 0 { spacing } else { 0 };
            match cmd.desc.mode {
                LayoutMode::Columns => {
                    content_w += gap + child.auto_w;
                    content_h = content_h.max(child.desc.rect.y + child.auto_h);
                }
                LayoutMode::Rows => {
                    content_w = content_w.max(child.desc.rect.x + child.auto_w);
                    content_h += gap + child.auto_h;
                }
                LayoutMode::Absolute | LayoutMode::Table => {
                    content_w = content_w.max(child.desc.rect.x + child.auto_w);
                    content_h = content_h.max(child.desc.rect.y + child.auto_h);
                }
            }
        }
        (w + content_w.max(0), h + content_h.max(0))
    }

    // --- pass 1 ------------------------------------------------------------------------------

    fn place(&mut self, styles: &[Style], controls: &mut ControlBuffer, screen: Recti) {
        let mut children = std::mem::take(&mut self.scratch);
        self.collect_children(0, self.cmds.len(), &mut children);
        self.arrange(&children, LayoutMode::Absolute, HAlign::Left, VAlign::Top, 0, screen);

        for i in 0..self.cmds.len() {
            let parent_clip = match self.cmds[i].parent {
                Some(p) => self.cmds.get(p.raw()).map_or(screen, |p| p.child_clip),
                None => screen,
            };
            let cmd = &self.cmds[i];
            let clip = intersect(cmd.rect, parent_clip);
            let insets = cmd
                .desc
                .control
                .and_then(|ci| controls.get(ci))
                .and_then(|c| lookup(styles, c.style))
                .map(|s| s.content_insets())
                .unwrap_or_default();
            let content = insets.shrink(cmd.rect);

            for ci in [cmd.desc.control, cmd.trailing].into_iter().flatten() {
                if let Some(control) = controls.get_mut(ci) {
                    control.rect = cmd.rect;
                    control.clip_rect = clip;
                }
            }

            let scroll = cmd.desc.scroll;
            let (mode, halign, valign, spacing) = (cmd.desc.mode, cmd.desc.halign, cmd.desc.valign, cmd.desc.spacing);
            let (begin, end) = (cmd.child_begin, cmd.child_end);
            let cmd = &mut self.cmds[i];
            cmd.clip_rect = clip;
            cmd.content_rect = content;
            cmd.child_clip = intersect(content, clip);

            self.collect_children(begin, end, &mut children);
            let origin = rect(content.x - scroll.x, content.y - scroll.y, content.width, content.height);
            self.arrange(&children, mode, halign, valign, spacing, origin);
        }
        self.scratch = children;
    }

    fn arrange(&mut self, children: &[usize], mode: LayoutMode, halign: HAlign, valign: VAlign, spacing: i32, content: Recti) {
        match mode {
            LayoutMode::Absolute | LayoutMode::Table => {
                for &c in children {
                    let cmd = &mut self.cmds[c];
                    let w = if cmd.desc.rect.width == SizePolicy::Fill { content.width } else { cmd.rect.width };
                    let h = if cmd.desc.rect.height == SizePolicy::Fill { content.height } else { cmd.rect.height };
                    let x = anchor(cmd.desc.halign.into(), cmd.desc.rect.x, w, content.x, content.width);
                    let y = anchor(cmd.desc.valign.into(), cmd.desc.rect.y, h, content.y, content.height);
                    cmd.rect = rect(x, y, w, h);
                }
            }
            LayoutMode::Columns => self.arrange_line(children, true, valign.into(), spacing, content),
            LayoutMode::Rows => self.arrange_line(children, false, halign.into(), spacing, content),
        }
    }

    /// Sequential placement along one axis. `cross` anchors every child on the other axis.
    fn arrange_line(&mut self, children: &[usize], horizontal: bool, cross: Anchor, spacing: i32, content: Recti) {
        if children.is_empty() {
            return;
        }
        let is_fill = |c: &LayoutCommand| if horizontal { c.desc.rect.width == SizePolicy::Fill } else { c.desc.rect.height == SizePolicy::Fill };
        let main_len = |r: Recti| if horizontal { r.width } else { r.height };

        let mut fixed = spacing * (children.len() as i32 - 1);
        let mut fills = 0;
        for &c in children {
            let cmd = &self.cmds[c];
            if is_fill(cmd) {
                fills += 1;
            } else {
                fixed += main_len(cmd.rect);
            }
        }
        let avail = main_len(content);
        let remaining = (avail - fixed).max(0);
        let (share, extra) = if fills > 0 { (remaining / fills, remaining % fills) } else { (0, 0) };

        let mut cursor = if horizontal { content.x } else { content.y };
        let mut seen = 0;
        for &c in children {
            let cmd = &mut self.cmds[c];
            let main = if is_fill(&*cmd) {
                seen += 1;
                // the last fill sibling absorbs the division remainder
                if seen == fills { share + extra } else { share }
            } else {
                main_len(cmd.rect)
            };
            if horizontal {
                let h = if cmd.desc.rect.height == SizePolicy::Fill { content.height } else { cmd.rect.height };
                let y = anchor(cross, cmd.desc.rect.y, h, content.y, content.height);
                cmd.rect = rect(cursor, y, main, h);
            } else {
                let w = if cmd.desc.rect.width == SizePolicy::Fill { content.width } else { cmd.rect.width };
                let x = anchor(cross, cmd.desc.rect.x, w, content.x, content.width);
                cmd.rect = rect(x, cursor, w, main);
            }
            cursor += main + spacing;
        }
    }

    fn accumulate_child_areas(&mut self) {
        let mut children = std::mem::take(&mut self.scratch);
        for i in (0..self.cmds.len()).rev() {
            self.collect_children(self.cmds[i].child_begin, self.cmds[i].child_end, &mut children);
            let mut area = None;
            for &c in &children {
                let child = &self.cmds[c];
                // groups are transparent unless empty, then they act as spacers
                if child.has_control() || child.child_begin == child.child_end {
                    area = union_opt(area, child.rect);
                } else if let Some(a) = child.child_area {
                    area = union_opt(area, a);
                }
            }
            self.cmds[i].child_area = area;
        }
        self.scratch = children;
    }

    fn resolve_scrollbars(&mut self, styles: &[Style], controls: &mut ControlBuffer) {
        for i in 0..self.cmds.len() {
            let cmd = &self.cmds[i];
            let (Some(target), Some(ci)) = (cmd.desc.target, cmd.desc.control) else {
                continue;
            };
            let Some(target) = self.cmds.get(target.raw()) else {
                continue;
            };
            let pane = cmd.content_rect;
            let (children_w, children_h) = target.child_area.map_or((0, 0), |a| (a.width.max(0), a.height.max(0)));
            let view = target.content_rect;
            let Some(control) = controls.get_mut(ci) else {
                continue;
            };
            let ControlData::Scroll(data) = &mut control.data else {
                continue;
            };
            let (view_len, content_len) = match data.axis {
                ScrollAxis::Vertical => (view.height, children_h),
                ScrollAxis::Horizontal => (view.width, children_w),
            };
            let min_len = lookup(styles, data.slider_style).map_or(0, |s| {
                let insets = s.content_insets();
                match data.axis {
                    ScrollAxis::Vertical => insets.vertical(),
                    ScrollAxis::Horizontal => insets.horizontal(),
                }
            });
            data.range = scroll_range(content_len, view_len);
            data.value = data.value.clamp(0, data.range);
            data.pane = pane;
            data.slider = slider_rect(data.axis, pane, view_len, content_len, data.value, min_len);
        }
    }
}

fn resolve_size(policy: SizePolicy, natural: i32, default: i32) -> i32 {
    match policy {
        SizePolicy::Fixed(v) => v.max(0),
        SizePolicy::Default => default.max(0),
        SizePolicy::Auto | SizePolicy::Fill => natural.max(0),
    }
}
