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
use crate::{Color, Dimensioni, TextureId, Vec2f, Vec2i, Vertex, vec2f};

/// Glyph metrics provider consumed by the layout solver, the text editor and the draw list.
///
/// Rasterisation and loading of the glyph atlas live outside this crate; a font only has to
/// answer metric queries and emit clipped glyph quads.
pub trait Font {
    /// Texture holding the glyph atlas.
    fn texture(&self) -> TextureId;
    /// Height of a text line in pixels.
    fn line_height(&self) -> i32;
    /// Widest advance of any glyph, used to size fixed-capacity text fields.
    fn max_char_width(&self) -> i32;
    /// Horizontal advance of `c` in pixels.
    fn advance_width(&self, c: char) -> i32;
    /// Total advance of `text` in pixels.
    fn text_width(&self, text: &str) -> i32 { text.chars().map(|c| self.advance_width(c)).sum() }
    /// Appends glyph quads for `text` laid out from `origin` and clipped to the box `origin..origin+size`.
    ///
    /// `scroll` shifts the text against the box. Emission stops once `max_vertices` more vertices
    /// would not fit; the returned run reports how many were appended and whether visible glyphs
    /// were cut.
    #[allow(clippy::too_many_arguments)]
    fn gen_glyph_quads(&self, text: &str, origin: Vec2i, size: Dimensioni, scroll: Vec2i, color: Color, out: &mut Vec<Vertex>, max_vertices: usize) -> GlyphRun;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Result of [`Font::gen_glyph_quads`].
pub struct GlyphRun {
    /// Vertices appended to the output.
    pub vertices: usize,
    /// `true` when the vertex limit cut off visible glyphs.
    pub truncated: bool,
}

#[derive(Copy, Clone, Default)]
/// Advance and texture coordinates of one glyph of a [`BitmapFont`].
pub struct Glyph {
    /// Horizontal advance in pixels; also the quad width.
    pub width: i32,
    /// Top-left texture coordinate.
    pub uv0: Vec2f,
    /// Bottom-right texture coordinate.
    pub uv1: Vec2f,
}

/// Fixed-height bitmap font described by a 256-entry glyph table.
pub struct BitmapFont {
    texture: TextureId,
    char_height: i32,
    max_char_width: i32,
    glyphs: Vec<Glyph>,
}

const FALLBACK_GLYPH: usize = b'?' as usize;

impl BitmapFont {
    /// Number of entries in the glyph table.
    pub const GLYPH_COUNT: usize = 256;

    /// Creates a font from its glyph table. Missing trailing entries are zero-width.
    pub fn new(texture: TextureId, char_height: i32, glyphs: &[Glyph]) -> Self {
        let mut table = vec![Glyph::default(); Self::GLYPH_COUNT];
        for (dst, src) in table.iter_mut().zip(glyphs) {
            *dst = *src;
        }
        let max_char_width = table.iter().map(|g| g.width).max().unwrap_or(0);
        Self { texture, char_height, max_char_width, glyphs: table }
    }

    /// Builds a monospaced font whose glyphs are laid out on a 16x16 grid of `cell` pixels.
    pub fn monospace(texture: TextureId, cell: Dimensioni) -> Self {
        let tex_w = (cell.width * 16) as f32;
        let tex_h = (cell.height * 16) as f32;
        let glyphs: Vec<Glyph> = (0..Self::GLYPH_COUNT)
            .map(|i| {
                let cx = (i % 16) as i32 * cell.width;
                let cy = (i / 16) as i32 * cell.height;
                Glyph {
                    width: cell.width,
                    uv0: vec2f(cx as f32 / tex_w, cy as f32 / tex_h),
                    uv1: vec2f((cx + cell.width) as f32 / tex_w, (cy + cell.height) as f32 / tex_h),
                }
            })
            .collect();
        Self::new(texture, cell.height, &glyphs)
    }

    /// Returns the glyph used to draw `c`.
    pub fn glyph(&self, c: char) -> &Glyph {
        let idx = c as usize;
        if idx < self.glyphs.len() { &self.glyphs[idx] } else { &self.glyphs[FALLBACK_GLYPH] }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }

impl Font for BitmapFont {
    fn texture(&self) -> TextureId { self.texture }

    fn line_height(&self) -> i32 { self.char_height }

    fn max_char_width(&self) -> i32 { self.max_char_width }

    fn advance_width(&self, c: char) -> i32 { self.glyph(c).width }

    fn gen_glyph_quads(&self, text: &str, origin: Vec2i, size: Dimensioni, scroll: Vec2i, color: Color, out: &mut Vec<Vertex>, max_vertices: usize) -> GlyphRun {
        let ymin = origin.y as f32;
        let ymax = (origin.y + size.height) as f32;
        let top = (origin.y - scroll.y) as f32;
        let bottom = top + self.char_height as f32;
        if bottom <= ymin || top >= ymax || self.char_height <= 0 {
            return GlyphRun::default();
        }

        // vertical clip, as a fraction of the glyph height
        let yt = top.max(ymin);
        let yb = bottom.min(ymax);
        let ch = self.char_height as f32;
        let ft = (yt - top) / ch;
        let fb = (yb - top) / ch;

        let xmin = origin.x as f32;
        let xmax = (origin.x + size.width) as f32;
        let col = color.to_color4b();
        let mut cx = origin.x - scroll.x;
        let mut run = GlyphRun::default();
        for c in text.chars() {
            if cx >= origin.x + size.width {
                break;
            }
            let g = self.glyph(c);
            let xl = cx as f32;
            let xr = (cx + g.width) as f32;
            cx += g.width;
            if xr <= xmin || g.width <= 0 {
                continue;
            }
            if run.vertices + 6 > max_vertices {
                run.truncated = true;
                break;
            }

            let gw = g.width as f32;
            let cl = xl.max(xmin);
            let cr = xr.min(xmax);
            let ul = lerp(g.uv0.x, g.uv1.x, (cl - xl) / gw);
            let ur = lerp(g.uv0.x, g.uv1.x, (cr - xl) / gw);
            let vt = lerp(g.uv0.y, g.uv1.y, ft);
            let vb = lerp(g.uv0.y, g.uv1.y, fb);

            let lt = Vertex::new(vec2f(cl, yt), vec2f(ul, vt), col);
            let lb = Vertex::new(vec2f(cl, yb), vec2f(ul, vb), col);
            let rt = Vertex::new(vec2f(cr, yt), vec2f(ur, vt), col);
            let rb = Vertex::new(vec2f(cr, yb), vec2f(ur, vb), col);
            out.extend_from_slice(&[lt, lb, rt, rt, lb, rb]);
            run.vertices += 6;
        }
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    fn font() -> BitmapFont { BitmapFont::monospace(TextureId::new(1), Dimensioni::new(8, 12)) }

    #[test]
    fn metrics() {
        let f = font();
        assert_eq!(f.text_width("hello"), 40);
        assert_eq!(f.max_char_width(), 8);
        assert_eq!(f.line_height(), 12);
        assert_eq!(f.advance_width('\u{2603}'), 8);
    }

    #[test]
    fn quads_are_clipped_to_the_box() {
        let f = font();
        let mut out = Vec::new();
        let run = f.gen_glyph_quads("abcd", Vec2i::new(0, 0), Dimensioni::new(20, 12), Vec2i::new(0, 0), color(255, 255, 255, 255), &mut out, 1024);
        // 'a', 'b' and half of 'c'
        assert_eq!(run, GlyphRun { vertices: 18, truncated: false });
        assert_eq!(out.len(), 18);
        let last = out[17].position();
        assert_eq!(last.x, 20.0);
    }

    #[test]
    fn quads_stop_at_capacity() {
        let f = font();
        let mut out = Vec::new();
        let run = f.gen_glyph_quads("abcd", Vec2i::new(0, 0), Dimensioni::new(100, 12), Vec2i::new(0, 0), color(0, 0, 0, 255), &mut out, 13);
        assert_eq!(run, GlyphRun { vertices: 12, truncated: true });
        // an exact fit is not a cut
        let run = f.gen_glyph_quads("ab", Vec2i::new(0, 0), Dimensioni::new(100, 12), Vec2i::new(0, 0), color(0, 0, 0, 255), &mut out, 12);
        assert!(!run.truncated);
    }

    #[test]
    fn scrolled_out_text_emits_nothing() {
        let f = font();
        let mut out = Vec::new();
        let run = f.gen_glyph_quads("ab", Vec2i::new(0, 0), Dimensioni::new(100, 12), Vec2i::new(0, 20), color(0, 0, 0, 255), &mut out, 64);
        assert_eq!(run.vertices, 0);
    }
}
