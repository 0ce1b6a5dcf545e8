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

use log::error;

use crate::{
    interfaces,
    phonemetadata::PhoneNumberDesc,
    regexp_cache::{InvalidRegexError, RegexCache},
};

pub struct RegexBasedMatcher {
    cache: Arc<RegexCache>,
}

impl RegexBasedMatcher {
    pub fn new(cache: Arc<RegexCache>) -> Self {
        Self { cache }
    }

    fn match_number(
        &self,
        phone_number: &str,
        number_pattern: &str,
        allow_prefix_match: bool,
    ) -> Result<bool, InvalidRegexError> {
        if allow_prefix_match {
            self.cache.matches_start(number_pattern, phone_number)
        } else {
            self.cache.full_match(number_pattern, phone_number)
        }
    }

    fn match_or_log(&self, phone_number: &str, pattern: &str, allow_prefix_match: bool) -> bool {
        // We don't want to consider it a prefix match when matching non-empty input
        // against an empty pattern.
        if pattern.is_empty() {
            return false;
        }
        match self.match_number(phone_number, pattern, allow_prefix_match) {
            Ok(res) => res,
            Err(err) => {
                error!("Invalid regex! {}: {}", pattern, err);
                false
            }
        }
    }
}

impl interfaces::MatcherApi for RegexBasedMatcher {
    fn match_national_number(
        &self,
        number: &str,
        number_desc: &PhoneNumberDesc,
        allow_prefix_match: bool,
    ) -> bool {
        self.match_or_log(
            number,
            number_desc.national_number_pattern(),
            allow_prefix_match,
        )
    }

    fn match_possible_number(&self, number: &str, number_desc: &PhoneNumberDesc) -> bool {
        self.match_or_log(number, number_desc.possible_number_pattern(), false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::RegexBasedMatcher;
    use crate::{interfaces::MatcherApi, phonemetadata::PhoneNumberDesc, regexp_cache::RegexCache};

    #[test]
    fn empty_pattern_never_matches() {
        let matcher = RegexBasedMatcher::new(Arc::new(RegexCache::new()));
        let desc = PhoneNumberDesc::default();
        assert!(!matcher.match_national_number("", &desc, true));
        assert!(!matcher.match_possible_number("123", &desc));
    }

    #[test]
    fn prefix_and_full_matching() {
        let matcher = RegexBasedMatcher::new(Arc::new(RegexCache::new()));
        let mut desc = PhoneNumberDesc::default();
        desc.set_national_number_pattern("900\\d{7}");
        desc.set_possible_number_pattern("\\d{7}(?:\\d{3})?");
        assert!(matcher.match_national_number("9002530000", &desc, false));
        assert!(!matcher.match_national_number("90025300001", &desc, false));
        assert!(matcher.match_national_number("90025300001", &desc, true));
        assert!(matcher.match_possible_number("2530000", &desc));
        assert!(!matcher.match_possible_number("25300001", &desc));
    }
}
