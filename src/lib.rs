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
#![deny(missing_docs)]
//! `stackui` is an immediate-mode UI runtime. Each frame the client re-declares its widget tree through a
//! stack of push/pop calls; the runtime solves layout in two passes, resolves hover and focus, replays input
//! against the focused control and hands back a flat, pre-ordered list of positioned and clipped controls.
//! A separate [`DrawListBuilder`] turns that list into texture-batched vertex ranges for any GPU backend.

mod config;
mod context;
mod control;
mod draw_list;
mod font;
mod geometry;
mod input;
mod layout;
mod scrollbar;
mod style;
mod theme;
mod widgets;

pub use config::*;
pub use context::*;
pub use control::*;
pub use draw_list::*;
pub use font::*;
pub use geometry::*;
pub use input::{CaptureKind, DeviceEvent, InputSnapshot, Key, KeyMode, MouseButton, TextFilter};
pub use layout::{CmdIndex, LayoutMode, LayoutRect, SizePolicy};
pub use rs_math3d::*;
pub use scrollbar::ScrollAxis;
pub use style::*;
pub use theme::*;
pub use widgets::*;

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Horizontal alignment of a rectangle or a text run inside its container.
pub enum HAlign {
    /// Anchored to the left edge.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Anchored to the right edge.
    Right,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// Vertical alignment of a rectangle or a text run inside its container.
pub enum VAlign {
    /// Anchored to the top edge.
    #[default]
    Top,
    /// Centered.
    Center,
    /// Anchored to the bottom edge.
    Bottom,
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Converts the color to the vertex color representation.
    pub fn to_color4b(self) -> Color4b { color4b(self.r, self.g, self.b, self.a) }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// Handle referencing a renderer-owned texture.
pub struct TextureId(u32);

impl TextureId {
    /// Wraps a renderer texture handle.
    pub const fn new(raw: u32) -> Self { Self(raw) }
    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

/// Convenience constructor for [`Vec2i`].
pub fn vec2(x: i32, y: i32) -> Vec2i { Vec2i { x, y } }

/// Convenience constructor for [`Vec2f`].
pub fn vec2f(x: f32, y: f32) -> Vec2f { Vec2f { x, y } }

/// Convenience constructor for [`Recti`].
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Recti { Recti { x, y, width: w, height: h } }

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }
