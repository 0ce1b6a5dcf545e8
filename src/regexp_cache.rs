// Copyright (C) 2009 The Libphonenumber Authors
// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("An error occurred while trying to create regex: {0}")]
pub struct InvalidRegexError(#[from] regex::Error);

/// Compiled metadata patterns, shared between threads.
///
/// Metadata patterns are written without anchors. The same pattern is needed
/// in three shapes: as is (for searching), anchored at both ends (a "full
/// match" in the C++ sense) and anchored at the start only (a "consume" or
/// "lookingAt"). Each shape gets its own map so lookups can borrow the pattern
/// text without building the anchored source first.
pub struct RegexCache {
    cache: DashMap<String, Arc<regex::Regex>>,
    full_match_cache: DashMap<String, Arc<regex::Regex>>,
    prefix_cache: DashMap<String, Arc<regex::Regex>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: DashMap::with_capacity(capacity),
            full_match_cache: DashMap::with_capacity(capacity),
            prefix_cache: DashMap::with_capacity(capacity),
        }
    }

    fn get_or_compile(
        map: &DashMap<String, Arc<regex::Regex>>,
        pattern: &str,
        source: impl FnOnce() -> String,
    ) -> Result<Arc<regex::Regex>, InvalidRegexError> {
        if let Some(regex) = map.get(pattern) {
            return Ok(regex.value().clone());
        }
        let entry = map
            .entry(pattern.to_string())
            .or_try_insert_with(|| regex::Regex::new(&source()).map(Arc::new))?;
        Ok(entry.value().clone())
    }

    /// Returns the pattern compiled as written.
    pub fn get_regex(&self, pattern: &str) -> Result<Arc<regex::Regex>, InvalidRegexError> {
        Self::get_or_compile(&self.cache, pattern, || pattern.to_owned())
    }

    /// Returns the pattern compiled so that it only matches a whole string.
    pub fn get_full_match_regex(
        &self,
        pattern: &str,
    ) -> Result<Arc<regex::Regex>, InvalidRegexError> {
        Self::get_or_compile(&self.full_match_cache, pattern, || {
            fast_cat::concat_str!("^(?:", pattern, ")$")
        })
    }

    /// Returns the pattern compiled so that it only matches at the start of a
    /// string. Capturing groups keep their numbers.
    pub fn get_prefix_regex(&self, pattern: &str) -> Result<Arc<regex::Regex>, InvalidRegexError> {
        Self::get_or_compile(&self.prefix_cache, pattern, || {
            fast_cat::concat_str!("^(?:", pattern, ")")
        })
    }

    pub fn full_match(&self, pattern: &str, s: &str) -> Result<bool, InvalidRegexError> {
        Ok(self.get_full_match_regex(pattern)?.is_match(s))
    }

    pub fn matches_start(&self, pattern: &str, s: &str) -> Result<bool, InvalidRegexError> {
        Ok(self.get_prefix_regex(pattern)?.is_match(s))
    }

    /// Compiles every shape of the pattern up front, reporting the first
    /// compilation error.
    pub fn warm_up(&self, pattern: &str) -> Result<(), InvalidRegexError> {
        self.get_full_match_regex(pattern)?;
        self.get_prefix_regex(pattern)?;
        self.get_regex(pattern)?;
        Ok(())
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}
