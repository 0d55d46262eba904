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
//! Texture-batched vertex output.
//!
//! Geometry is appended as unindexed triangle lists. A command covers a contiguous vertex range
//! bound to one texture; consecutive draws with the same texture always extend the current command.

use crate::{Color, Color4b, ConfigError, Dimensioni, DrawListConfig, Font, HAlign, Recti, TextureId, VAlign, Vec2f, Vec2i, geometry::align_shift, vec2f};

#[derive(Default, Copy, Clone)]
#[repr(C)]
/// Vertex format emitted by the draw list: screen position, texture coordinate and color.
pub struct Vertex {
    pos: Vec2f,
    tex: Vec2f,
    color: Color4b,
}

impl Vertex {
    /// Creates a vertex with the provided position, texture coordinate, and color.
    pub fn new(pos: Vec2f, tex: Vec2f, color: Color4b) -> Self { Self { pos, tex, color } }

    /// Returns the position of the vertex in screen space.
    pub fn position(&self) -> Vec2f { self.pos }

    /// Returns the texture coordinates associated with the vertex.
    pub fn tex_coord(&self) -> Vec2f { self.tex }

    /// Returns the vertex color.
    pub fn color(&self) -> Color4b { self.color }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// One draw call: a vertex range rendered with a single texture bound.
pub struct DrawCommand {
    /// Texture to bind.
    pub texture: TextureId,
    /// First vertex of the range.
    pub vertex_offset: usize,
    /// Number of vertices, always a multiple of 3.
    pub vertex_count: usize,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Geometry dropped during the current frame.
pub struct DrawStats {
    /// Draws that needed a new command past `max_commands`.
    pub dropped_commands: usize,
    /// Rects that did not fit into the vertex buffer.
    pub dropped_rects: usize,
    /// Text runs cut short by the vertex buffer limit.
    pub truncated_texts: usize,
}

impl DrawStats {
    /// Returns `true` when nothing was dropped.
    pub fn is_clean(&self) -> bool { *self == Self::default() }
}

/// A finished frame of geometry, ready for a renderer.
pub struct DrawList<'a> {
    /// Vertex buffer.
    pub vertices: &'a [Vertex],
    /// Draw commands in submission order.
    pub commands: &'a [DrawCommand],
    /// What had to be dropped while building it.
    pub stats: DrawStats,
}

#[derive(Default)]
struct Buffer {
    vertices: Vec<Vertex>,
    commands: Vec<DrawCommand>,
    stats: DrawStats,
}

/// Builds draw lists into two alternating buffers, so the list of frame `n` stays readable while
/// frame `n + 1` is being written.
pub struct DrawListBuilder {
    config: DrawListConfig,
    buffers: [Buffer; 2],
    write: usize,
}

impl DrawListBuilder {
    /// Creates a builder whose buffers are sized once from `config`.
    pub fn new(config: DrawListConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let buffer = || Buffer {
            vertices: Vec::with_capacity(config.max_vertices),
            commands: Vec::with_capacity(config.max_commands),
            stats: DrawStats::default(),
        };
        Ok(Self { config, buffers: [buffer(), buffer()], write: 0 })
    }

    /// Resets the write buffer.
    pub fn begin(&mut self) {
        let buf = &mut self.buffers[self.write];
        buf.vertices.clear();
        buf.commands.clear();
        buf.stats = DrawStats::default();
    }

    /// Finishes the write buffer, returns it and makes the other buffer the next write target.
    pub fn end(&mut self) -> DrawList<'_> {
        let written = self.write;
        if self.buffers[written].commands.last().is_some_and(|c| c.vertex_count == 0) {
            self.buffers[written].commands.pop();
        }
        self.write ^= 1;
        let buf = &self.buffers[written];
        DrawList { vertices: &buf.vertices, commands: &buf.commands, stats: buf.stats }
    }

    /// The list finished by the last [`DrawListBuilder::end`].
    pub fn front(&self) -> DrawList<'_> {
        let buf = &self.buffers[self.write ^ 1];
        DrawList { vertices: &buf.vertices, commands: &buf.commands, stats: buf.stats }
    }

    /// Makes sure the current command uses `texture`, opening a new one when it must.
    fn bind(&mut self, texture: TextureId) -> bool {
        let max_commands = self.config.max_commands;
        let buf = &mut self.buffers[self.write];
        let offset = buf.vertices.len();
        match buf.commands.last_mut() {
            Some(cmd) if cmd.texture == texture => return true,
            Some(cmd) if cmd.vertex_count == 0 => {
                cmd.texture = texture;
                cmd.vertex_offset = offset;
                return true;
            }
            _ => {}
        }
        if buf.commands.len() >= max_commands {
            buf.stats.dropped_commands += 1;
            if buf.stats.dropped_commands == 1 {
                log::warn!("draw command buffer full ({} commands), dropping geometry", max_commands);
            }
            return false;
        }
        buf.commands.push(DrawCommand { texture, vertex_offset: offset, vertex_count: 0 });
        true
    }

    /// Adds a textured rect clipped to `clip`. UVs are interpolated along clipped edges.
    pub fn add_rect(&mut self, texture: TextureId, color: Color, rect: Recti, clip: Recti, uv0: Vec2f, uv1: Vec2f) {
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.x + rect.width, rect.y + rect.height);
        let (cx0, cy0) = (clip.x, clip.y);
        let (cx1, cy1) = (clip.x + clip.width, clip.y + clip.height);
        if x0 >= cx1 || x1 <= cx0 || y0 >= cy1 || y1 <= cy0 {
            return;
        }

        let max_vertices = self.config.max_vertices;
        let buf = &mut self.buffers[self.write];
        if buf.vertices.len() + 6 > max_vertices {
            buf.stats.dropped_rects += 1;
            if buf.stats.dropped_rects == 1 {
                log::warn!("vertex buffer full ({} vertices), dropping rects", max_vertices);
            }
            return;
        }
        if !self.bind(texture) {
            return;
        }

        let (mut p0, mut p1) = (vec2f(x0 as f32, y0 as f32), vec2f(x1 as f32, y1 as f32));
        let (mut t0, mut t1) = (uv0, uv1);
        let (w, h) = (rect.width as f32, rect.height as f32);
        if cx0 > x0 {
            t0.x = lerp(uv0.x, uv1.x, (cx0 - x0) as f32 / w);
            p0.x = cx0 as f32;
        }
        if cy0 > y0 {
            t0.y = lerp(uv0.y, uv1.y, (cy0 - y0) as f32 / h);
            p0.y = cy0 as f32;
        }
        if cx1 < x1 {
            t1.x = lerp(uv1.x, uv0.x, (x1 - cx1) as f32 / w);
            p1.x = cx1 as f32;
        }
        if cy1 < y1 {
            t1.y = lerp(uv1.y, uv0.y, (y1 - cy1) as f32 / h);
            p1.y = cy1 as f32;
        }

        let col = color.to_color4b();
        let lt = Vertex::new(p0, t0, col);
        let lb = Vertex::new(vec2f(p0.x, p1.y), vec2f(t0.x, t1.y), col);
        let rt = Vertex::new(vec2f(p1.x, p0.y), vec2f(t1.x, t0.y), col);
        let rb = Vertex::new(p1, t1, col);

        let buf = &mut self.buffers[self.write];
        buf.vertices.extend_from_slice(&[lt, lb, rt, rt, lb, rb]);
        if let Some(cmd) = buf.commands.last_mut() {
            cmd.vertex_count += 6;
        }
    }

    /// Adds `text` aligned inside `rect`, shifted by `scroll` and clipped to `clip`.
    ///
    /// Text larger than the box is aligned by scrolling it instead of moving the origin.
    #[allow(clippy::too_many_arguments)]
    pub fn add_text(&mut self, font: &dyn Font, color: Color, text: &str, rect: Recti, scroll: Vec2i, halign: HAlign, valign: VAlign, clip: Recti) {
        let (mut x, mut y, mut w, mut h) = (rect.x, rect.y, rect.width, rect.height);
        let mut scroll = scroll;

        let shift = align_shift(halign, font.text_width(text), w);
        if shift >= 0 {
            x += shift;
        } else {
            scroll.x -= shift;
        }
        let text_h = font.line_height();
        match valign {
            VAlign::Top => {}
            VAlign::Center if text_h <= h => y += (h - text_h) >> 1,
            VAlign::Center => scroll.y += (text_h - h) >> 1,
            VAlign::Bottom if h > text_h => y += h - text_h,
            VAlign::Bottom => scroll.y += text_h - h,
        }

        if x + w > clip.x + clip.width {
            w = clip.x + clip.width - x;
        }
        if x < clip.x {
            scroll.x += clip.x - x;
            w -= clip.x - x;
            x = clip.x;
        }
        if y + h > clip.y + clip.height {
            h = clip.y + clip.height - y;
        }
        if y < clip.y {
            scroll.y += clip.y - y;
            h -= clip.y - y;
            y = clip.y;
        }
        if w <= 0 || h <= 0 || !self.bind(font.texture()) {
            return;
        }

        let max_vertices = self.config.max_vertices;
        let buf = &mut self.buffers[self.write];
        let room = max_vertices.saturating_sub(buf.vertices.len());
        let run = font.gen_glyph_quads(text, Vec2i::new(x, y), Dimensioni::new(w, h), scroll, color, &mut buf.vertices, room);
        if let Some(cmd) = buf.commands.last_mut() {
            cmd.vertex_count += run.vertices;
        }
        if run.truncated {
            buf.stats.truncated_texts += 1;
            if buf.stats.truncated_texts == 1 {
                log::warn!("vertex buffer full ({} vertices), truncating text", max_vertices);
            }
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitmapFont, color, rect};

    const A: TextureId = TextureId::new(1);
    const B: TextureId = TextureId::new(2);

    fn builder(max_commands: usize, max_vertices: usize) -> DrawListBuilder { DrawListBuilder::new(DrawListConfig { max_commands, max_vertices }).unwrap() }

    fn white() -> Color { color(255, 255, 255, 255) }

    fn quad(b: &mut DrawListBuilder, texture: TextureId, r: Recti) { b.add_rect(texture, white(), r, rect(0, 0, 100, 100), vec2f(0.0, 0.0), vec2f(1.0, 1.0)); }

    #[test]
    fn alternating_textures_are_never_merged() {
        let mut b = builder(8, 1024);
        b.begin();
        quad(&mut b, A, rect(0, 0, 10, 10));
        quad(&mut b, B, rect(0, 0, 10, 10));
        quad(&mut b, A, rect(0, 0, 10, 10));
        let list = b.end();
        let textures: Vec<_> = list.commands.iter().map(|c| c.texture).collect();
        assert_eq!(textures, vec![A, B, A]);
        assert_eq!(list.commands[2].vertex_offset, 12);
        assert_eq!(list.vertices.len(), 18);
    }

    #[test]
    fn same_texture_runs_coalesce() {
        let font = BitmapFont::monospace(A, Dimensioni::new(8, 10));
        let mut b = builder(8, 1024);
        b.begin();
        quad(&mut b, A, rect(0, 0, 10, 10));
        b.add_text(&font, white(), "hi", rect(0, 0, 50, 10), Vec2i::new(0, 0), HAlign::Left, VAlign::Top, rect(0, 0, 100, 100));
        quad(&mut b, A, rect(20, 20, 10, 10));
        let list = b.end();
        assert_eq!(list.commands.len(), 1);
        assert_eq!(list.commands[0].vertex_count, 24);
    }

    #[test]
    fn clipping_interpolates_uvs() {
        let mut b = builder(8, 1024);
        b.begin();
        b.add_rect(A, white(), rect(-10, 0, 20, 20), rect(0, 0, 100, 10), vec2f(0.0, 0.0), vec2f(1.0, 1.0));
        // fully outside: rejected without touching the command list
        b.add_rect(B, white(), rect(200, 200, 5, 5), rect(0, 0, 100, 10), vec2f(0.0, 0.0), vec2f(1.0, 1.0));
        let list = b.end();
        assert_eq!(list.commands.len(), 1);
        let lt = list.vertices[0];
        let rb = list.vertices[5];
        assert_eq!((lt.position().x, lt.position().y), (0.0, 0.0));
        assert_eq!((lt.tex_coord().x, lt.tex_coord().y), (0.5, 0.0));
        assert_eq!((rb.position().x, rb.position().y), (10.0, 10.0));
        assert_eq!((rb.tex_coord().x, rb.tex_coord().y), (1.0, 0.5));
    }

    #[test]
    fn overflow_drops_geometry_but_keeps_earlier_commands() {
        let mut b = builder(2, 1024);
        b.begin();
        quad(&mut b, A, rect(0, 0, 10, 10));
        quad(&mut b, B, rect(0, 0, 10, 10));
        quad(&mut b, A, rect(0, 0, 10, 10));
        let list = b.end();
        assert_eq!(list.commands.len(), 2);
        assert_eq!(list.stats.dropped_commands, 1);
        assert_eq!(list.vertices.len(), 12);

        let mut b = builder(8, 12);
        b.begin();
        for _ in 0..3 {
            quad(&mut b, A, rect(0, 0, 10, 10));
        }
        let list = b.end();
        assert_eq!(list.commands[0].vertex_count, 12);
        assert_eq!(list.stats.dropped_rects, 1);
    }

    #[test]
    fn text_cut_by_the_vertex_limit_is_counted() {
        let font = BitmapFont::monospace(A, Dimensioni::new(8, 10));
        let mut b = builder(8, 12);
        b.begin();
        b.add_text(&font, white(), "abcd", rect(0, 0, 100, 10), Vec2i::new(0, 0), HAlign::Left, VAlign::Top, rect(0, 0, 100, 100));
        let list = b.end();
        assert_eq!(list.vertices.len(), 12);
        assert_eq!(list.commands[0].vertex_count, 12);
        assert_eq!(list.stats.truncated_texts, 1);
        assert!(!list.stats.is_clean());
    }

    #[test]
    fn clipped_text_does_not_open_a_command() {
        let font = BitmapFont::monospace(B, Dimensioni::new(8, 10));
        let mut b = builder(1, 1024);
        b.begin();
        quad(&mut b, A, rect(0, 0, 10, 10));
        b.add_text(&font, white(), "hidden", rect(500, 500, 60, 10), Vec2i::new(0, 0), HAlign::Left, VAlign::Top, rect(0, 0, 100, 100));
        let list = b.end();
        assert_eq!(list.commands.len(), 1);
        assert_eq!(list.commands[0].texture, A);
        assert!(list.stats.is_clean());
    }

    #[test]
    fn text_is_aligned_inside_the_box() {
        let font = BitmapFont::monospace(A, Dimensioni::new(8, 10));
        let mut b = builder(8, 1024);
        b.begin();
        b.add_text(&font, white(), "ab", rect(0, 0, 100, 30), Vec2i::new(0, 0), HAlign::Right, VAlign::Center, rect(0, 0, 100, 100));
        let list = b.end();
        let first = list.vertices[0].position();
        assert_eq!((first.x, first.y), (84.0, 10.0));
    }

    #[test]
    fn buffers_alternate() {
        let mut b = builder(8, 1024);
        b.begin();
        quad(&mut b, A, rect(0, 0, 10, 10));
        b.end();
        b.begin();
        let list = b.end();
        assert!(list.commands.is_empty());
        b.begin();
        assert_eq!(b.front().commands.len(), 0);
        quad(&mut b, B, rect(0, 0, 10, 10));
        assert!(b.front().commands.is_empty());
        let list = b.end();
        assert_eq!(list.commands[0].texture, B);
        assert!(list.stats.is_clean());
    }
}
