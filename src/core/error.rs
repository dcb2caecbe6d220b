// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Renderer error types
use thiserror::Error;

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Main error type for the renderer
///
/// Hot-path operations never return errors: malformed draws silently produce
/// no pixels, and programmer errors are caught by debug assertions. These
/// variants cover the configuration and boundary layer only.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid viewport size: {width}x{height}")]
    InvalidViewport { width: usize, height: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Device error: {0}")]
    Device(String),
}
