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
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Rejected construction parameters.
pub enum ConfigError {
    /// A capacity that must be at least one was zero.
    #[error("`{0}` must be greater than zero")]
    ZeroCapacity(&'static str),
    /// The stack must hold the root plus at least one level.
    #[error("stack capacity {0} is too shallow, at least 2 levels are required")]
    StackTooShallow(usize),
    /// A UI needs at least one style.
    #[error("the style sheet is empty")]
    EmptyStylesheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
/// Capacities of a [`crate::Ui`], fixed at construction.
pub struct UiConfig {
    /// Maximum nesting depth of push/pop calls, root included.
    pub stack_capacity: usize,
    /// Maximum controls (and layout commands) per frame.
    pub max_controls: usize,
    /// Maximum bytes of control text per frame.
    pub max_text: usize,
    /// Maximum input events kept per frame.
    pub max_events: usize,
}

impl Default for UiConfig {
    fn default() -> Self { Self { stack_capacity: 32, max_controls: 1024, max_text: 16 * 1024, max_events: 16 } }
}

impl UiConfig {
    /// Checks that every capacity is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stack_capacity < 2 {
            return Err(ConfigError::StackTooShallow(self.stack_capacity));
        }
        if self.max_controls == 0 {
            return Err(ConfigError::ZeroCapacity("max_controls"));
        }
        if self.max_text == 0 {
            return Err(ConfigError::ZeroCapacity("max_text"));
        }
        if self.max_events == 0 {
            return Err(ConfigError::ZeroCapacity("max_events"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
/// Capacities of a [`crate::DrawListBuilder`].
pub struct DrawListConfig {
    /// Maximum draw commands per frame.
    pub max_commands: usize,
    /// Maximum vertices per frame.
    pub max_vertices: usize,
}

impl Default for DrawListConfig {
    fn default() -> Self { Self { max_commands: 256, max_vertices: 64 * 1024 } }
}

impl DrawListConfig {
    /// Checks that every capacity is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_commands == 0 {
            return Err(ConfigError::ZeroCapacity("max_commands"));
        }
        if self.max_vertices == 0 {
            return Err(ConfigError::ZeroCapacity("max_vertices"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(UiConfig::default().validate(), Ok(()));
        assert_eq!(DrawListConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_unusable_capacities() {
        let cfg = UiConfig { stack_capacity: 1, ..UiConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::StackTooShallow(1)));
        let cfg = UiConfig { max_text: 0, ..UiConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCapacity("max_text")));
        assert_eq!(ConfigError::ZeroCapacity("max_text").to_string(), "`max_text` must be greater than zero");
        let cfg = DrawListConfig { max_vertices: 0, ..DrawListConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
