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

use regex::{Match, Regex};

/// "lookingAt" style helpers for unanchored regexes.
///
/// The leftmost match of a regex starts at zero whenever any match does, so
/// these are exact. Whole string matching is not: use
/// [`crate::regexp_cache::RegexCache::get_full_match_regex`] or an anchored
/// pattern for that.
pub trait RegexConsume {
    fn matches_start(&self, s: &str) -> bool {
        self.find_start(s).is_some()
    }

    /// Returns the rest of `s` after a match found at its start.
    fn consume_start<'a>(&self, s: &'a str) -> Option<&'a str> {
        self.find_start(s).map(|found| &s[found.end()..])
    }

    fn find_start<'a>(&self, s: &'a str) -> Option<Match<'a>>;
}

impl RegexConsume for Regex {
    fn find_start<'a>(&self, s: &'a str) -> Option<Match<'a>> {
        let found = self.find(s)?;
        if found.start() != 0 {
            return None;
        }
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::RegexConsume;

    #[test]
    fn consume_only_at_start() {
        let separators = Regex::new("[- ]+").unwrap();
        assert_eq!(Some("123"), separators.consume_start("- 123"));
        assert_eq!(None, separators.consume_start("1-23"));
        assert!(!separators.matches_start("1 "));
    }
}
