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
use super::{DeviceEvent, FocusParent, FrameEvent, Key, KeyMode};
use crate::{Control, ControlIndex, ControlType};

/// Controls that can take focus through Tab, arrows or a click.
pub(crate) fn is_focusable(c: &Control) -> bool { !c.flags.is_disabled() && c.ty != ControlType::ContainerEnd && c.ty != ControlType::Label }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NavKey {
    Next,
    Previous,
    Left,
    Right,
    Up,
    Down,
}

fn first_nav_key(events: &[FrameEvent], keys: KeyMode) -> Option<NavKey> {
    events.iter().filter(|e| !e.consumed).find_map(|e| match e.event {
        DeviceEvent::KeyDown { key, .. } => match key {
            Key::Tab if keys.is_shift() => Some(NavKey::Previous),
            Key::Tab => Some(NavKey::Next),
            Key::Left => Some(NavKey::Left),
            Key::Right => Some(NavKey::Right),
            Key::Up => Some(NavKey::Up),
            Key::Down => Some(NavKey::Down),
            _ => None,
        },
        _ => None,
    })
}

/// Picks the control that the first unconsumed navigation key moves focus to.
pub(crate) fn navigate(
    controls: &[Control],
    focus: Option<ControlIndex>,
    focus_control: Option<&Control>,
    focus_parent: Option<FocusParent>,
    events: &[FrameEvent],
    keys: KeyMode,
) -> Option<ControlIndex> {
    let key = first_nav_key(events, keys)?;
    let focus = focus.filter(|f| f.raw() < controls.len());
    match key {
        NavKey::Next | NavKey::Previous => tab(controls, focus, key == NavKey::Next),
        _ => spatial(controls, focus?, focus_control?, focus_parent, key),
    }
}

/// Linear scan with wrap around. Stops when it comes back to the focused control, so a frame
/// without any focusable control terminates with `None`.
fn tab(controls: &[Control], focus: Option<ControlIndex>, forward: bool) -> Option<ControlIndex> {
    let n = controls.len();
    if n == 0 {
        return None;
    }
    let start = match focus {
        Some(f) => f.raw(),
        // nothing focused: begin just outside the list so the first step lands on an end
        None if forward => n - 1,
        None => 0,
    };
    let mut i = start;
    for _ in 0..n {
        i = if forward { (i + 1) % n } else { (i + n - 1) % n };
        if Some(i) == focus.map(|f| f.raw()) {
            break;
        }
        if is_focusable(&controls[i]) {
            return Some(ControlIndex(i as u32));
        }
    }
    None
}

/// Nearest control in the direction of `key`, searched among the focused control's siblings only.
fn spatial(controls: &[Control], focus: ControlIndex, focus_control: &Control, parent: Option<FocusParent>, key: NavKey) -> Option<ControlIndex> {
    let r = focus_control.rect;
    let (mut minx, mut maxx, mut miny, mut maxy) = (r.x, r.x + r.width, r.y, r.y + r.height);
    match key {
        NavKey::Left => {
            minx = i32::MIN;
            maxx = r.x;
        }
        NavKey::Right => {
            minx = r.x + r.width - 1;
            maxx = i32::MAX;
        }
        NavKey::Up => {
            miny = i32::MIN;
            maxy = r.y;
        }
        NavKey::Down => {
            miny = r.y + r.height - 1;
            maxy = i32::MAX;
        }
        NavKey::Next | NavKey::Previous => return None,
    }

    let (begin, end) = match parent {
        Some(p) if p.end > p.begin => (p.begin.raw() + 1, p.end.raw().min(controls.len())),
        _ => (0, controls.len()),
    };

    let mut best = None;
    let mut depth = 0i32;
    for (i, c) in controls.iter().enumerate().take(end).skip(begin) {
        if depth == 0 && is_focusable(c) {
            let cr = c.rect;
            let horizontal_hit = cr.x > minx && cr.x < maxx && cr.y <= maxy && cr.y + cr.height >= miny;
            let vertical_hit = cr.y > miny && cr.y < maxy && cr.x <= maxx && cr.x + cr.width >= minx;
            match key {
                NavKey::Left if horizontal_hit => {
                    minx = cr.x;
                    best = Some(i);
                }
                NavKey::Right if horizontal_hit => {
                    maxx = cr.x;
                    best = Some(i);
                }
                NavKey::Up if vertical_hit => {
                    miny = cr.y;
                    best = Some(i);
                }
                NavKey::Down if vertical_hit => {
                    maxy = cr.y;
                    best = Some(i);
                }
                _ => {}
            }
        }
        match c.ty {
            ControlType::ContainerBegin => depth += 1,
            ControlType::ContainerEnd => depth -= 1,
            _ => {}
        }
    }
    best.filter(|&b| b != focus.raw()).map(|b| ControlIndex(b as u32))
}
