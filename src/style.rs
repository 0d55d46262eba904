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
use std::rc::Rc;

use crate::{Font, HAlign, Insets, VAlign};

/// Shared handle to a glyph metrics provider.
pub type FontRef = Rc<dyn Font>;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Index into the style sheet a [`crate::Ui`] was created with.
pub struct StyleId(pub usize);

impl StyleId {
    /// Returns the raw index.
    pub fn raw(self) -> usize { self.0 }
}

#[derive(Clone, Default)]
/// Spacing, alignment and font settings shared by every control that uses the same [`StyleId`].
pub struct Style {
    /// Font used for text content and auto sizing; `None` measures every string as zero.
    pub font: Option<FontRef>,
    /// Horizontal alignment of the control inside an absolute parent and of its text.
    pub halign: HAlign,
    /// Vertical alignment of the control inside an absolute parent and of its text.
    pub valign: VAlign,
    /// Outer spacing reserved by the theme.
    pub margin: Insets,
    /// Border thickness, drawn by the theme's nine-slice corners and edges.
    pub border: Insets,
    /// Inner spacing between the border and the content.
    pub padding: Insets,
    /// Width used when a control requests [`crate::SizePolicy::Default`].
    pub default_width: i32,
    /// Height used when a control requests [`crate::SizePolicy::Default`].
    pub default_height: i32,
}

impl Style {
    /// Border plus padding: the distance from a control's rect to its content rect.
    pub fn content_insets(&self) -> Insets { self.border.add(&self.padding) }

    /// Width of `text` in the style's font.
    pub fn text_width(&self, text: &str) -> i32 { self.font.as_ref().map_or(0, |f| f.text_width(text)) }

    /// Line height of the style's font.
    pub fn line_height(&self) -> i32 { self.font.as_ref().map_or(0, |f| f.line_height()) }

    /// Widest glyph advance of the style's font.
    pub fn max_char_width(&self) -> i32 { self.font.as_ref().map_or(0, |f| f.max_char_width()) }
}

/// Resolves a style id, falling back to the first style for ids outside the sheet.
pub(crate) fn lookup(styles: &[Style], id: StyleId) -> Option<&Style> { styles.get(id.raw()).or_else(|| styles.first()) }
