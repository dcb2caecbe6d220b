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

//! Renderer configuration
//!
//! Runtime knobs for the pipeline, loadable from a TOML file. Every field
//! has a default so a missing or partial file still yields a usable config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{RenderError, Result};

/// Renderer configuration
///
/// # Examples
///
/// ```
/// use softpoly::core::RenderConfig;
///
/// let config = RenderConfig::default();
/// assert_eq!(config.max_portal_depth, 4);
/// assert!(config.true_color);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of rasterizer worker threads (0 = one per available core)
    pub threads: usize,

    /// Maximum portal nesting depth
    ///
    /// Portals nested deeper than this render their surface stencil-only
    /// instead of recursing.
    pub max_portal_depth: usize,

    /// True-color rendering
    ///
    /// Selects the 32-bit pixel path; false selects the 8-bit palette path.
    pub true_color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            max_portal_depth: 4,
            true_color: true,
        }
    }
}

impl RenderConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ConfigNotFound`] if the file does not exist,
    /// or a parse error for malformed TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RenderError::ConfigNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Resolved worker thread count
    ///
    /// Maps the `0 = auto` setting to the number of available cores.
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.threads, 0);
        assert_eq!(config.max_portal_depth, 4);
        assert!(config.true_color);
        assert!(config.worker_threads() >= 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "threads = 4\nmax_portal_depth = 2\ntrue_color = false").unwrap();

        let config = RenderConfig::load(file.path()).unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.max_portal_depth, 2);
        assert!(!config.true_color);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "threads = 2").unwrap();

        let config = RenderConfig::load(file.path()).unwrap();
        assert_eq!(config.threads, 2);
        assert_eq!(config.max_portal_depth, 4);
    }

    #[test]
    fn test_missing_file() {
        let result = RenderConfig::load("/nonexistent/softpoly.toml");
        assert!(matches!(result, Err(RenderError::ConfigNotFound(_))));
    }
}
