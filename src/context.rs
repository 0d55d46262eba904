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
//! Frame driver: the push/pop stack, frame boundaries and hover/focus resolution.

use crate::{
    CmdIndex, ConfigError, Control, ControlData, ControlIndex, ControlList, ControlType, Dimensioni, FrameStats, HAlign, InputSnapshot, LayoutMode,
    LayoutRect, Recti, Style, StyleId, UiConfig, UiFlags, VAlign, Vec2i,
    control::ControlBuffer,
    input::{CaptureKind, InputState, is_focusable},
    layout::{CommandDesc, LayoutList},
    rect,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScopeKind {
    Root,
    Group,
    Container,
}

/// State a container keeps open between its push and its pop.
#[derive(Copy, Clone)]
struct OpenContainer {
    begin: Option<ControlIndex>,
    outer_parent: Option<ControlIndex>,
    style: StyleId,
    flags: UiFlags,
    id: u32,
    scroll: Vec2i,
}

#[derive(Copy, Clone)]
struct Scope {
    kind: ScopeKind,
    cmd: Option<CmdIndex>,
    /// Begin marker of the nearest enclosing container, the focus parent of controls declared here.
    parent: Option<ControlIndex>,
    container: Option<OpenContainer>,
}

impl Scope {
    fn root() -> Self { Self { kind: ScopeKind::Root, cmd: None, parent: None, container: None } }
}

/// What [`Ui::pop_container`] reports about the container it closed.
#[derive(Copy, Clone, Debug)]
pub struct ContainerResponse {
    /// Layout handle of the container, usable as a scrollbar target.
    pub handle: CmdIndex,
    /// Interaction flags, including FOCUS propagated from a focused descendant.
    pub flags: UiFlags,
    /// Scroll offset after scrolling the focused child into view.
    pub scroll: Vec2i,
}

impl ContainerResponse {
    fn dropped() -> Self { Self { handle: CmdIndex::FULL, flags: UiFlags::NONE, scroll: Vec2i::default() } }
}

/// Immediate mode UI context.
///
/// Every frame the client calls [`Ui::begin`], re-declares the whole widget tree and collects the
/// resolved controls from [`Ui::end`]. All storage is sized once by [`UiConfig`].
pub struct Ui {
    config: UiConfig,
    pub(crate) styles: Vec<Style>,
    pub(crate) controls: ControlBuffer,
    pub(crate) layout: LayoutList,
    pub(crate) input: InputState,
    pub(crate) stats: FrameStats,
    stack: Vec<Scope>,
    overflow_depth: usize,
    view: Dimensioni,
    next_id: u32,
    frame: usize,
    in_frame: bool,
}

impl Ui {
    /// Creates a context with the given capacities and style sheet.
    pub fn new(config: UiConfig, styles: Vec<Style>) -> Result<Self, ConfigError> {
        config.validate()?;
        if styles.is_empty() {
            return Err(ConfigError::EmptyStylesheet);
        }
        Ok(Self {
            controls: ControlBuffer::new(config.max_controls, config.max_text),
            layout: LayoutList::new(config.max_controls),
            input: InputState::new(config.max_events),
            stats: FrameStats::default(),
            stack: Vec::with_capacity(config.stack_capacity),
            overflow_depth: 0,
            view: Dimensioni::new(0, 0),
            next_id: 0,
            frame: 0,
            in_frame: false,
            config,
            styles,
        })
    }

    /// Capacities this context was built with.
    pub fn config(&self) -> &UiConfig { &self.config }

    /// The style sheet.
    pub fn styles(&self) -> &[Style] { &self.styles }

    /// Mutable access to the style sheet, e.g. to swap fonts between frames.
    pub fn styles_mut(&mut self) -> &mut [Style] { &mut self.styles }

    /// Number of frames started so far.
    pub fn frame_count(&self) -> usize { self.frame }

    /// Current push depth, zero outside of any group or container.
    pub fn depth(&self) -> usize { self.stack.len().saturating_sub(1) + self.overflow_depth }

    /// Counters of the current (or last finished) frame.
    pub fn stats(&self) -> FrameStats { self.stats }

    /// Index of the focused control, once the frame has ended.
    pub fn focus(&self) -> Option<ControlIndex> { self.input.focus_index() }

    /// Resolved rectangle of a layout handle from the last finished frame.
    pub fn rect(&self, handle: CmdIndex) -> Option<Recti> { self.layout.rect(handle) }

    /// Resolved content rectangle (rect minus border and padding) of a layout handle.
    pub fn content_rect(&self, handle: CmdIndex) -> Option<Recti> { self.layout.content_rect(handle) }

    /// Resolved clip rectangle of a layout handle.
    pub fn clip_rect(&self, handle: CmdIndex) -> Option<Recti> { self.layout.clip_rect(handle) }

    /// Extent `(width, height)` of everything declared inside a layout handle, before clipping.
    pub fn children_size(&self, handle: CmdIndex) -> Option<(i32, i32)> { self.layout.children_size(handle) }

    /// Returns a fresh identifier, unique within the frame.
    pub fn generate_id(&mut self) -> u32 {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }

    /// Starts a frame over a `view` sized screen with this frame's input.
    pub fn begin(&mut self, view: Dimensioni, input: &InputSnapshot) {
        debug_assert!(!self.in_frame, "begin() called twice without end()");
        self.in_frame = true;
        self.frame += 1;
        self.view = view;
        self.next_id = 0;
        self.stats = FrameStats::default();
        self.controls.clear();
        self.layout.begin();
        self.input.begin(input, &mut self.stats);
        self.stack.clear();
        self.stack.push(Scope::root());
        self.overflow_depth = 0;
    }

    /// Finishes the frame: solves layout, resolves focus and hover, and returns the control list.
    pub fn end(&mut self) -> ControlList<'_> {
        let open = self.depth();
        if open > 0 {
            debug_assert!(open == 0, "end() with {} unclosed push call(s)", open);
            log::error!("end() with {} unclosed push call(s), closing them", open);
            self.overflow_depth = 0;
            while self.stack.len() > 1 {
                let kind = self.stack.last().map_or(ScopeKind::Root, |s| s.kind);
                self.close_scope(kind);
            }
        }
        self.in_frame = false;

        let screen = rect(0, 0, self.view.width, self.view.height);
        self.layout.end(&self.styles, &mut self.controls, screen);
        self.input.end(self.controls.controls());

        // topmost control wins the hover
        for c in self.controls.controls_mut().iter_mut().rev() {
            if is_focusable(c) && self.input.try_capture(CaptureKind::Hover, c.clip_rect) {
                c.flags |= UiFlags::HOVER;
                break;
            }
        }

        log::trace!(
            "frame {}: {} controls, {} layout commands, focus {:?}",
            self.frame,
            self.controls.len(),
            self.layout.len(),
            self.input.focus_index()
        );

        let edit = self.input.edit_state();
        ControlList {
            controls: self.controls.controls(),
            text: self.controls.text(),
            view: self.view,
            caret: edit.caret,
            select_start: edit.select_start(),
            select_length: edit.select_len(),
            stats: self.stats,
        }
    }

    /// Runs `f` between [`Ui::begin`] and [`Ui::end`].
    pub fn frame<F: FnOnce(&mut Self)>(&mut self, view: Dimensioni, input: &InputSnapshot, f: F) -> ControlList<'_> {
        self.begin(view, input);
        f(self);
        self.end()
    }

    // --- layout groups -----------------------------------------------------------------------

    /// Opens an absolute group: children are anchored inside `rect` by their own alignment.
    pub fn push_rect(&mut self, halign: HAlign, valign: VAlign, rect: LayoutRect) -> CmdIndex {
        self.push_group(LayoutMode::Absolute, halign, valign, 0, rect)
    }

    /// Closes the group opened by [`Ui::push_rect`].
    pub fn pop_rect(&mut self) { self.close_scope(ScopeKind::Group); }

    /// Opens a group that stacks its children top to bottom, aligned horizontally by `halign`.
    pub fn push_rows(&mut self, halign: HAlign, valign: VAlign, spacing: i32, rect: LayoutRect) -> CmdIndex {
        self.push_group(LayoutMode::Rows, halign, valign, spacing, rect)
    }

    /// Closes the group opened by [`Ui::push_rows`].
    pub fn pop_rows(&mut self) { self.close_scope(ScopeKind::Group); }

    /// Opens a group that places its children left to right, aligned vertically by `valign`.
    pub fn push_cols(&mut self, halign: HAlign, valign: VAlign, spacing: i32, rect: LayoutRect) -> CmdIndex {
        self.push_group(LayoutMode::Columns, halign, valign, spacing, rect)
    }

    /// Closes the group opened by [`Ui::push_cols`].
    pub fn pop_cols(&mut self) { self.close_scope(ScopeKind::Group); }

    /// Opens a table group. Tables are placed like absolute groups.
    pub fn push_table(&mut self, halign: HAlign, valign: VAlign, rect: LayoutRect) -> CmdIndex {
        self.push_group(LayoutMode::Table, halign, valign, 0, rect)
    }

    /// Closes the group opened by [`Ui::push_table`].
    pub fn pop_table(&mut self) { self.close_scope(ScopeKind::Group); }

    /// Declares a rows group whose children are emitted by `f`.
    pub fn rows<F: FnOnce(&mut Self)>(&mut self, halign: HAlign, spacing: i32, rect: LayoutRect, f: F) -> CmdIndex {
        let handle = self.push_rows(halign, VAlign::Top, spacing, rect);
        f(self);
        self.pop_rows();
        handle
    }

    /// Declares a columns group whose children are emitted by `f`.
    pub fn cols<F: FnOnce(&mut Self)>(&mut self, valign: VAlign, spacing: i32, rect: LayoutRect, f: F) -> CmdIndex {
        let handle = self.push_cols(HAlign::Left, valign, spacing, rect);
        f(self);
        self.pop_cols();
        handle
    }

    fn push_group(&mut self, mode: LayoutMode, halign: HAlign, valign: VAlign, spacing: i32, rect: LayoutRect) -> CmdIndex {
        if self.enter_overflow() {
            return CmdIndex::FULL;
        }
        let parent = self.focus_parent();
        let cmd = self.layout.push(self.parent_cmd(), CommandDesc::group(mode, halign, valign, spacing, rect), &mut self.stats);
        self.stack.push(Scope { kind: ScopeKind::Group, cmd: Some(cmd), parent, container: None });
        cmd
    }

    // --- containers --------------------------------------------------------------------------

    /// Opens a focusable, scrollable container. Children are anchored inside its content rect.
    pub fn push_container(&mut self, style: StyleId, flags: UiFlags, rect: LayoutRect, scroll: Vec2i, id: u32) -> CmdIndex {
        if self.enter_overflow() {
            return CmdIndex::FULL;
        }
        let style = self.checked_style(style);
        let outer_parent = self.focus_parent();
        let parent_cmd = self.parent_cmd();
        let begin = if self.can_place(parent_cmd) {
            self.controls
                .push_begin(Control::new(ControlType::ContainerBegin, style, flags, ControlData::Id(id)), &mut self.stats)
        } else {
            None
        };
        let (halign, valign) = self.alignment(style);
        let desc = CommandDesc {
            mode: LayoutMode::Absolute,
            halign,
            valign,
            spacing: 0,
            target: None,
            control: begin,
            scroll,
            rect,
        };
        let cmd = self.layout.push(parent_cmd, desc, &mut self.stats);
        self.stack.push(Scope {
            kind: ScopeKind::Container,
            cmd: Some(cmd),
            parent: begin.or(outer_parent),
            container: Some(OpenContainer { begin, outer_parent, style, flags, id, scroll }),
        });
        cmd
    }

    /// Closes the innermost container and reports its interaction state.
    pub fn pop_container(&mut self) -> ContainerResponse { self.close_scope(ScopeKind::Container) }

    fn close_container(&mut self, cmd: Option<CmdIndex>, open: OpenContainer) -> ContainerResponse {
        let mut flags = open.flags;
        let mut scroll = open.scroll;
        let handle = cmd.unwrap_or(CmdIndex::FULL);
        let Some(begin) = open.begin else {
            if let Some(cmd) = cmd {
                self.layout.pop(cmd, None);
            }
            return ContainerResponse { handle, flags, scroll };
        };

        let end = self.controls.next_index();
        // children had their chance at focus first, the container only claims what is left
        if !flags.is_disabled() && self.input.try_focus_restore(open.outer_parent, begin, ControlType::ContainerBegin, open.style) {
            flags |= self.input.button();
        } else if self.input.focus_within(begin, end) {
            flags |= UiFlags::FOCUS;
            if self.input.close_focus_parent(begin, end) {
                if let Some((child, clip)) = self.input.focused_rects() {
                    scroll = scroll_into_view(scroll, child, clip);
                    self.layout.set_scroll(handle, scroll);
                }
            }
        }

        let end = self.controls.push_end(Control::new(ControlType::ContainerEnd, open.style, flags, ControlData::Id(open.id)));
        if let Some(c) = self.controls.get_mut(begin) {
            c.flags = flags;
        }
        self.layout.pop(handle, Some(end));
        ContainerResponse { handle, flags, scroll }
    }

    // --- stack plumbing ----------------------------------------------------------------------

    fn close_scope(&mut self, expected: ScopeKind) -> ContainerResponse {
        if self.overflow_depth > 0 {
            self.overflow_depth -= 1;
            return ContainerResponse::dropped();
        }
        if self.stack.len() <= 1 {
            debug_assert!(self.stack.len() > 1, "pop without a matching push");
            log::error!("pop without a matching push, ignored");
            return ContainerResponse::dropped();
        }
        let Some(scope) = self.stack.pop() else {
            return ContainerResponse::dropped();
        };
        if scope.kind != expected {
            debug_assert!(scope.kind == expected, "mismatched pop: closing {:?} with a {:?} pop", scope.kind, expected);
            log::error!("mismatched pop: closing {:?} with a {:?} pop", scope.kind, expected);
        }
        match scope.container {
            Some(open) => self.close_container(scope.cmd, open),
            None => {
                let handle = scope.cmd.unwrap_or(CmdIndex::FULL);
                self.layout.pop(handle, None);
                ContainerResponse { handle, flags: UiFlags::NONE, scroll: Vec2i::default() }
            }
        }
    }

    /// Counts a push beyond the stack capacity. Everything declared inside it is dropped.
    fn enter_overflow(&mut self) -> bool {
        if self.overflow_depth == 0 && self.stack.len() < self.config.stack_capacity {
            return false;
        }
        self.overflow_depth += 1;
        self.stats.stack_overflows += 1;
        if self.stats.stack_overflows == 1 {
            log::warn!("push depth exceeds the stack capacity of {}, dropping nested widgets", self.config.stack_capacity);
        }
        true
    }

    pub(crate) fn parent_cmd(&self) -> Option<CmdIndex> { self.stack.last().and_then(|s| s.cmd) }

    pub(crate) fn focus_parent(&self) -> Option<ControlIndex> { self.stack.last().and_then(|s| s.parent) }

    pub(crate) fn is_overflowing(&self) -> bool { self.overflow_depth > 0 }

    /// `true` when a control under `parent` would get a layout command.
    pub(crate) fn can_place(&self, parent: Option<CmdIndex>) -> bool { !parent.is_some_and(|p| p.is_full()) && self.layout.has_room() }

    pub(crate) fn checked_style(&self, id: StyleId) -> StyleId {
        if id.raw() < self.styles.len() {
            return id;
        }
        debug_assert!(id.raw() < self.styles.len(), "unknown style id {}", id.raw());
        log::error!("unknown style id {}, using style 0", id.raw());
        StyleId(0)
    }

    pub(crate) fn style(&self, id: StyleId) -> Option<&Style> { self.styles.get(id.raw()) }

    pub(crate) fn alignment(&self, id: StyleId) -> (HAlign, VAlign) { self.style(id).map_or((HAlign::Left, VAlign::Top), |s| (s.halign, s.valign)) }

    /// Pushes a leaf control plus its layout command, anchored by the control's style.
    pub(crate) fn place_leaf(&mut self, control: Control, rect: LayoutRect, target: Option<CmdIndex>) -> (CmdIndex, Option<ControlIndex>) {
        let parent = self.parent_cmd();
        let index = if self.can_place(parent) { self.controls.push(control, &mut self.stats) } else { None };
        let (halign, valign) = self.alignment(control.style);
        let desc = CommandDesc { mode: LayoutMode::Absolute, halign, valign, spacing: 0, target, control: index, scroll: Vec2i::default(), rect };
        let cmd = self.layout.push(parent, desc, &mut self.stats);
        self.layout.pop(cmd, None);
        (cmd, index)
    }
}

/// Adjusts `scroll` so the `child` rect moves inside its visible part `clip`.
fn scroll_into_view(scroll: Vec2i, child: Recti, clip: Recti) -> Vec2i {
    let mut s = scroll;
    if clip.x > child.x {
        s.x -= clip.x - child.x;
    }
    if clip.x + clip.width < child.x + child.width {
        s.x += child.x + child.width - (clip.x + clip.width);
    }
    if clip.y > child.y {
        s.y -= clip.y - child.y;
    }
    if clip.y + clip.height < child.y + child.height {
        s.y += child.y + child.height - (clip.y + clip.height);
    }
    s
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{BitmapFont, Key, MouseButton, SizePolicy, TextureId, geometry::contains_rect, vec2};

    fn sheet() -> Vec<Style> {
        let font = Rc::new(BitmapFont::monospace(TextureId::new(1), Dimensioni::new(8, 16)));
        vec![Style { font: Some(font), default_width: 60, default_height: 20, ..Default::default() }]
    }

    fn ui_with(config: UiConfig) -> Ui { Ui::new(config, sheet()).unwrap() }

    fn view() -> Dimensioni { Dimensioni::new(400, 300) }

    fn key(k: Key) -> InputSnapshot {
        let mut s = InputSnapshot::default();
        s.keydown(k, 0);
        s
    }

    #[test]
    fn construction_is_validated() {
        assert_eq!(Ui::new(UiConfig::default(), Vec::new()).err(), Some(ConfigError::EmptyStylesheet));
        let cfg = UiConfig { max_events: 0, ..UiConfig::default() };
        assert_eq!(Ui::new(cfg, sheet()).err(), Some(ConfigError::ZeroCapacity("max_events")));
    }

    #[test]
    fn ids_restart_every_frame() {
        let mut ui = ui_with(UiConfig::default());
        let mut ids = Vec::new();
        for _ in 0..2 {
            ui.frame(view(), &InputSnapshot::default(), |ui| ids.push((ui.generate_id(), ui.generate_id())));
        }
        assert_eq!(ids, vec![(1, 2), (1, 2)]);
        assert_eq!(ui.frame_count(), 2);
    }

    #[test]
    fn tab_walks_enabled_controls_and_wraps() {
        let mut ui = ui_with(UiConfig::default());
        let run = |ui: &mut Ui, input: InputSnapshot| {
            ui.frame(view(), &input, |ui| {
                ui.rows(HAlign::Left, 2, LayoutRect::fill(), |ui| {
                    ui.button(StyleId(0), UiFlags::NONE, LayoutRect::default_size(), "a");
                    ui.label(StyleId(0), LayoutRect::auto(), "-");
                    ui.button(StyleId(0), UiFlags::DISABLED, LayoutRect::default_size(), "b");
                    ui.button(StyleId(0), UiFlags::NONE, LayoutRect::default_size(), "c");
                });
            });
            ui.focus().map(|f| f.raw())
        };

        assert_eq!(run(&mut ui, key(Key::Tab)), None);
        assert_eq!(run(&mut ui, key(Key::Tab)), Some(0));
        assert_eq!(run(&mut ui, key(Key::Tab)), Some(3));
        let mut back = key(Key::Shift);
        back.keydown(Key::Tab, 0);
        assert_eq!(run(&mut ui, back), Some(0));
        assert_eq!(run(&mut ui, InputSnapshot::default()), Some(3));
    }

    #[test]
    fn tab_on_an_empty_ui_terminates() {
        let mut ui = ui_with(UiConfig::default());
        for _ in 0..3 {
            let list = ui.frame(view(), &key(Key::Tab), |_| {});
            assert!(list.is_empty());
        }
        assert_eq!(ui.focus(), None);
    }

    #[test]
    fn hover_goes_to_the_topmost_control() {
        let mut ui = ui_with(UiConfig::default());
        let input = InputSnapshot { mouse_pos: vec2(15, 15), ..Default::default() };
        let list = ui.frame(view(), &input, |ui| {
            ui.button(StyleId(0), UiFlags::NONE, LayoutRect::fixed(0, 0, 50, 50), "under");
            ui.button(StyleId(0), UiFlags::NONE, LayoutRect::fixed(10, 10, 50, 50), "over");
        });
        let hovered: Vec<bool> = list.iter().map(|c| c.flags.is_hovered()).collect();
        assert_eq!(hovered, vec![false, true]);
    }

    fn scroll_frame(ui: &mut Ui, input: InputSnapshot, scroll: Vec2i) -> ContainerResponse {
        let mut resp = None;
        ui.frame(view(), &input, |ui| {
            ui.push_container(StyleId(0), UiFlags::NONE, LayoutRect::fixed(0, 0, 100, 50), scroll, 7);
            ui.rows(HAlign::Left, 0, LayoutRect::fill(), |ui| {
                for _ in 0..4 {
                    ui.button(StyleId(0), UiFlags::NONE, LayoutRect::fixed(0, 0, 100, 20), "b");
                }
            });
            resp = Some(ui.pop_container());
        });
        resp.unwrap()
    }

    #[test]
    fn container_takes_focus_first_and_scrolls_focused_child_into_view() {
        let mut ui = ui_with(UiConfig::default());
        let origin = Vec2i::default();
        scroll_frame(&mut ui, key(Key::Tab), origin);
        for expected in 0..4 {
            scroll_frame(&mut ui, key(Key::Tab), origin);
            assert_eq!(ui.focus(), Some(ControlIndex(expected)));
        }
        // the third button (40..60) sticks out of the 50 px viewport
        let resp = scroll_frame(&mut ui, InputSnapshot::default(), origin);
        assert!(resp.flags.is_focused());
        assert_eq!((resp.scroll.x, resp.scroll.y), (0, 10));
        assert_eq!(ui.rect(resp.handle).map(|r| (r.width, r.height)), Some((100, 50)));
        assert_eq!(ui.children_size(resp.handle), Some((100, 80)));
    }

    #[test]
    fn container_behaves_like_a_button() {
        let mut ui = ui_with(UiConfig::default());
        let run = |ui: &mut Ui, input: InputSnapshot| {
            let mut resp = None;
            ui.frame(view(), &input, |ui| {
                ui.push_container(StyleId(0), UiFlags::NONE, LayoutRect::fixed(0, 0, 100, 50), Vec2i::default(), 1);
                resp = Some(ui.pop_container());
            });
            resp.unwrap().flags
        };
        let mut down = InputSnapshot::default();
        down.mousedown(10, 10, MouseButton::LEFT);
        let mut up = InputSnapshot::default();
        up.mouseup(10, 10, MouseButton::LEFT);
        assert!(!run(&mut ui, down).is_focused());
        assert!(run(&mut ui, up).is_pressed());
        assert!(run(&mut ui, InputSnapshot::default()).is_clicked());
    }

    #[test]
    fn arrow_keys_stay_inside_the_focused_container() {
        let mut ui = ui_with(UiConfig::default());
        let run = |ui: &mut Ui, input: InputSnapshot| {
            ui.frame(view(), &input, |ui| {
                ui.push_container(StyleId(0), UiFlags::NONE, LayoutRect::fixed(0, 0, 150, 40), Vec2i::default(), 1);
                ui.button(StyleId(0), UiFlags::NONE, LayoutRect::fixed(0, 0, 50, 20), "a");
                ui.button(StyleId(0), UiFlags::NONE, LayoutRect::fixed(60, 0, 50, 20), "b");
                ui.pop_container();
                ui.push_container(StyleId(0), UiFlags::NONE, LayoutRect::fixed(160, 0, 150, 40), Vec2i::default(), 2);
                ui.button(StyleId(0), UiFlags::NONE, LayoutRect::fixed(0, 0, 50, 20), "c");
                ui.pop_container();
            });
            ui.focus().map(|f| f.raw())
        };

        let mut click = InputSnapshot::default();
        click.mousedown(10, 10, MouseButton::LEFT);
        assert_eq!(run(&mut ui, click), Some(1));
        assert_eq!(run(&mut ui, InputSnapshot::default()), Some(1));
        assert_eq!(run(&mut ui, key(Key::Right)), Some(1));
        assert_eq!(run(&mut ui, InputSnapshot::default()), Some(2));
        // the second container sits to the right of "b" but is not its sibling
        assert_eq!(run(&mut ui, key(Key::Right)), Some(2));
        assert_eq!(run(&mut ui, InputSnapshot::default()), Some(2));
    }

    #[test]
    fn pushes_past_the_stack_capacity_are_dropped() {
        let mut ui = ui_with(UiConfig { stack_capacity: 2, ..UiConfig::default() });
        let list = ui.frame(view(), &InputSnapshot::default(), |ui| {
            ui.push_rows(HAlign::Left, VAlign::Top, 0, LayoutRect::fill());
            ui.button(StyleId(0), UiFlags::NONE, LayoutRect::default_size(), "kept");
            let inner = ui.push_cols(HAlign::Left, VAlign::Top, 0, LayoutRect::fill());
            assert!(inner.is_full());
            assert!(ui.button(StyleId(0), UiFlags::NONE, LayoutRect::default_size(), "lost").handle.is_full());
            ui.pop_cols();
            ui.pop_rows();
            assert_eq!(ui.depth(), 0);
        });
        assert_eq!(list.len(), 1);
        assert_eq!(list.text(&list.controls()[0]), "kept");
        assert_eq!(list.stats().stack_overflows, 1);
    }

    #[test]
    fn control_capacity_drops_extra_widgets() {
        let mut ui = ui_with(UiConfig { max_controls: 3, ..UiConfig::default() });
        let list = ui.frame(view(), &InputSnapshot::default(), |ui| {
            for _ in 0..5 {
                ui.button(StyleId(0), UiFlags::NONE, LayoutRect::default_size(), "x");
            }
        });
        assert_eq!(list.len(), 3);
        assert!(!list.stats().is_clean());
        assert_eq!(list.stats().dropped_commands, 2);
    }

    #[test]
    fn scroll_into_view_moves_by_the_hidden_part() {
        let s = scroll_into_view(Vec2i::default(), rect(-5, 40, 20, 20), rect(0, 40, 15, 10));
        assert_eq!((s.x, s.y), (-5, 10));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "mismatched pop")]
    fn mismatched_pop_asserts() {
        let mut ui = ui_with(UiConfig::default());
        ui.begin(view(), &InputSnapshot::default());
        ui.push_rows(HAlign::Left, VAlign::Top, 0, LayoutRect::fill());
        ui.pop_container();
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "unclosed")]
    fn unbalanced_frame_asserts() {
        let mut ui = ui_with(UiConfig::default());
        ui.begin(view(), &InputSnapshot::default());
        ui.push_cols(HAlign::Left, VAlign::Top, 0, LayoutRect::fill());
        ui.end();
    }

    fn random_policy(rng: &mut StdRng) -> SizePolicy {
        match rng.random_range(0..4) {
            0 => SizePolicy::Auto,
            1 => SizePolicy::Default,
            2 => SizePolicy::Fixed(rng.random_range(0..120)),
            _ => SizePolicy::Fill,
        }
    }

    fn random_rect(rng: &mut StdRng) -> LayoutRect {
        let (x, y) = (rng.random_range(-10..40), rng.random_range(-10..40));
        LayoutRect::new(x, y, random_policy(rng), random_policy(rng))
    }

    fn random_tree(ui: &mut Ui, rng: &mut StdRng, depth: u32) {
        for _ in 0..rng.random_range(1..5) {
            let nested = depth < 4;
            match rng.random_range(0..6) {
                0 if nested => {
                    ui.push_rows(HAlign::Center, VAlign::Top, rng.random_range(0..5), random_rect(rng));
                    random_tree(ui, rng, depth + 1);
                    ui.pop_rows();
                }
                1 if nested => {
                    ui.push_cols(HAlign::Left, VAlign::Bottom, rng.random_range(0..5), random_rect(rng));
                    random_tree(ui, rng, depth + 1);
                    ui.pop_cols();
                }
                2 if nested => {
                    let scroll = vec2(rng.random_range(0..30), rng.random_range(0..30));
                    let id = ui.generate_id();
                    ui.push_container(StyleId(0), UiFlags::NONE, random_rect(rng), scroll, id);
                    random_tree(ui, rng, depth + 1);
                    ui.pop_container();
                }
                3 => {
                    ui.label(StyleId(0), random_rect(rng), "label");
                }
                _ => {
                    ui.button(StyleId(0), UiFlags::NONE, random_rect(rng), "button");
                }
            }
        }
    }

    type Snapshot = Vec<(i32, i32, i32, i32, i32, i32, i32, i32)>;

    fn solve_random(ui: &mut Ui, seed: u64) -> Snapshot {
        let mut rng = StdRng::seed_from_u64(seed);
        let list = ui.frame(view(), &InputSnapshot::default(), |ui| random_tree(ui, &mut rng, 0));

        let screen = rect(0, 0, 400, 300);
        let mut clips = vec![screen];
        for c in list.iter() {
            let parent = clips.last().copied().unwrap_or(screen);
            assert!(c.clip_rect.width >= 0 && c.clip_rect.height >= 0);
            assert!(contains_rect(parent, c.clip_rect), "clip {:?} escapes {:?}", c.clip_rect, parent);
            match c.ty {
                ControlType::ContainerBegin => clips.push(c.clip_rect),
                ControlType::ContainerEnd => {
                    clips.pop();
                }
                _ => {}
            }
        }
        list.iter()
            .map(|c| (c.rect.x, c.rect.y, c.rect.width, c.rect.height, c.clip_rect.x, c.clip_rect.y, c.clip_rect.width, c.clip_rect.height))
            .collect()
    }

    #[test]
    fn random_layouts_are_deterministic_and_clipped() {
        for seed in 0..32 {
            let mut a = ui_with(UiConfig::default());
            let mut b = ui_with(UiConfig::default());
            let first = solve_random(&mut a, seed);
            let again = solve_random(&mut a, seed);
            let fresh = solve_random(&mut b, seed);
            assert!(!first.is_empty());
            assert_eq!(first, again);
            assert_eq!(first, fresh);
        }
    }
}
