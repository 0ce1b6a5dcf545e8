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


use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use regex::Regex;

use crate::{
    phonenumberutil::{
        helper_constants::{
            DIGITS, MIN_LENGTH_FOR_NSN, PLUS_CHARS, PLUS_SIGN,
            RFC3966_VISUAL_SEPARATOR, SECOND_NUMBER_START, STAR_SIGN, VALID_ALPHA, VALID_ALPHA_INCL_UPPERCASE,
            VALID_PUNCTUATION,
        },
        helper_functions::create_extn_pattern,
    },
    regexp_cache::{InvalidRegexError, RegexCache},
};

pub(crate) struct PhoneNumberRegExpsAndMappings {
    /// Compiled metadata patterns. Shared with the matcher so that every
    /// pattern is compiled once.
    pub regexp_cache: Arc<RegexCache>,

    /// A map that contains characters that are essential when dialling. That means
    /// any of the characters in this map must not be removed from a number when
    /// dialing, otherwise the call will not reach the intended destination.
    pub diallable_char_mappings: HashMap<char, char>,
    /// These mappings map a character (key) to a specific digit that should
    /// replace it for normalization purposes.
    pub alpha_mappings: HashMap<char, char>,
    /// For performance reasons, store a map of combining alpha_mappings with ASCII
    /// digits.
    pub alpha_phone_mappings: HashMap<char, char>,

    /// Separate map of all symbols that we wish to retain when formatting alpha
    /// numbers. This includes digits, ascii letters and number grouping symbols
    /// such as "-" and " ".
    pub all_plus_number_grouping_symbols: HashMap<char, char>,

    /// Map of country calling codes that use a mobile token before the area code.
    /// One example of when this is relevant is when determining the length of the
    /// national destination code, which should be the length of the area code plus
    /// the length of the mobile token.
    pub mobile_token_mappings: HashMap<i32, char>,

    /// Set of country codes that doesn't have national prefix, but it has area
    /// codes.
    pub countries_without_national_prefix_with_area_codes: HashSet<i32>,

    /// Set of country codes that have geographically assigned mobile numbers (see
    /// geo_mobile_countries below) which are not based on *area codes*. For
    /// example, in China mobile numbers start with a carrier indicator, and beyond
    /// that are geographically assigned: this carrier indicator is not considered
    /// to be an area code.
    pub geo_mobile_countries_without_mobile_area_codes: HashSet<i32>,

    /// Set of country calling codes that have geographically assigned mobile
    /// numbers. This may not be complete; we add calling codes case by case, as we
    /// find geographical mobile numbers or hear from user reports.
    pub geo_mobile_countries: HashSet<i32>,

    /// Whole-string pattern telling a single international prefix (digits and
    /// possibly a tilde for "wait for the tone", e.g. 8~10) from a regex
    /// describing several of them.
    pub single_international_prefix: Regex,

    pub capturing_digit_pattern: Regex,

    /// Acceptable first characters of a phone number: digits and plus signs.
    /// Letters and punctuation only count further in.
    pub valid_start_char_pattern: Regex,

    /// Start of a second number written after the first one, e.g. the
    /// "/x" of "x302/x2303".
    pub second_number_start_pattern: Regex,

    /// Trailing characters that are neither letters, digits nor '#'. The hash
    /// is kept since it may end an extension.
    pub unwanted_end_char_pattern: Regex,

    /// Regular expression of groups of valid punctuation characters.
    pub separator_pattern: Regex,

    /// Regexp of all known extension prefixes used by different regions followed
    /// by 1 or more valid digits, for use when parsing. Anchored at the end.
    pub extn_pattern: Regex,

    /// The whole-string "viable phone number" pattern with an optional
    /// extension at the end, matched case-insensitively.
    pub valid_phone_number_pattern: Regex,

    /// Whole-string check for at least three letters. Such numbers are
    /// normalized through the keypad mapping.
    pub valid_alpha_phone_pattern: Regex,

    /// The first group reference of a format. `$\d` rather than `$1` since
    /// some regions (Argentina) do not use their first group in the national
    /// format.
    pub first_group_capturing_pattern: Regex,

    pub carrier_code_pattern: Regex,

    /// A `$N` group reference inside a format template.
    pub group_reference_pattern: Regex,

    pub plus_chars_pattern: Regex,

    pub non_digits_pattern: Regex,

    /// Regular expression of valid global-number-digits for the phone-context
    /// parameter, following the syntax defined in RFC3966.
    pub rfc3966_global_number_digits_pattern: Regex,

    /// Regular expression of valid domainname for the phone-context parameter,
    /// following the syntax defined in RFC3966.
    pub rfc3966_domainname_pattern: Regex,

    /// Formats the as you type formatter may use: group references separated
    /// by punctuation only, the first group included. Keeps symbols such as
    /// the star of Israeli star numbers out of its output.
    pub is_format_eligible_as_you_type_formatting_regex: Regex,

    /// A national prefix formatting rule made of the first group only,
    /// possibly in (unbalanced) parentheses.
    pub formatting_rule_has_first_group_only_regex: Regex,

    /// Characters after which the as you type formatter puts no extra space
    /// behind a national prefix.
    pub national_prefix_separators_pattern: Regex,
}

impl PhoneNumberRegExpsAndMappings {
    fn initialize_regexp_mappings(&mut self) {
        self.mobile_token_mappings.insert(54, '9');

        self.geo_mobile_countries_without_mobile_area_codes.insert(86); // China

        self.countries_without_national_prefix_with_area_codes.insert(52); // Mexico

        self.geo_mobile_countries.insert(52); // Mexico
        self.geo_mobile_countries.insert(54); // Argentina
        self.geo_mobile_countries.insert(55); // Brazil
        self.geo_mobile_countries.insert(62); // Indonesia: some prefixes only (fixed CMDA wireless)
        self.geo_mobile_countries
            .extend(&self.geo_mobile_countries_without_mobile_area_codes);

        let ascii_digit_mappings: HashMap<char, char> = ('0'..='9').map(|d| (d, d)).collect();

        // Telephone keypad letters. Only uppercase keys: lookups uppercase first.
        let keypad = [
            ("ABC", '2'),
            ("DEF", '3'),
            ("GHI", '4'),
            ("JKL", '5'),
            ("MNO", '6'),
            ("PQRS", '7'),
            ("TUV", '8'),
            ("WXYZ", '9'),
        ];
        self.alpha_mappings = keypad
            .iter()
            .flat_map(|(letters, digit)| letters.chars().map(move |letter| (letter, *digit)))
            .collect();

        self.alpha_phone_mappings = self
            .alpha_mappings
            .iter()
            .chain(ascii_digit_mappings.iter())
            .map(|(k, v)| (*k, *v))
            .collect();

        let mut diallable_char_map = ascii_digit_mappings.clone();
        diallable_char_map.insert('+', '+');
        diallable_char_map.insert('*', '*');
        diallable_char_map.insert('#', '#');
        self.diallable_char_mappings = diallable_char_map;

        let mut all_plus_number_groupings = HashMap::new();
        // insert (lower letter -> upper letter) and (upper letter -> upper letter) mappings.
        for c in self.alpha_mappings.keys() {
            all_plus_number_groupings.insert(c.to_ascii_lowercase(), *c);
            all_plus_number_groupings.insert(*c, *c);
        }
        all_plus_number_groupings.extend(ascii_digit_mappings.iter());
        // insert grouping symbols.
        for dash in ['-', '\u{FF0D}', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}',
            '\u{2015}', '\u{2212}']
        {
            all_plus_number_groupings.insert(dash, '-');
        }
        all_plus_number_groupings.insert('/', '/');
        all_plus_number_groupings.insert('\u{FF0F}', '/');
        all_plus_number_groupings.insert(' ', ' ');
        all_plus_number_groupings.insert('\u{3000}', ' ');
        all_plus_number_groupings.insert('\u{2060}', ' ');
        all_plus_number_groupings.insert('.', '.');
        all_plus_number_groupings.insert('\u{FF0E}', '.');
        self.all_plus_number_grouping_symbols = all_plus_number_groupings;
    }

    pub fn new() -> Result<Self, InvalidRegexError> {
        let alphanum = fast_cat::concat_str!(VALID_ALPHA_INCL_UPPERCASE, DIGITS);
        let extn_patterns_for_parsing = create_extn_pattern(true);
        // it'll be initialized only once, so we can use slow format!
        let valid_phone_number = format!(
            "{}{{{}}}|[{}]*(?:[{}{}]*{}){{3,}}[{}{}{}{}]*",
            DIGITS,
            MIN_LENGTH_FOR_NSN,
            PLUS_CHARS,
            VALID_PUNCTUATION,
            STAR_SIGN,
            DIGITS,
            VALID_PUNCTUATION,
            STAR_SIGN,
            VALID_ALPHA,
            DIGITS,
        );

        let rfc3966_phone_digit = format!("(?:{}|{})", DIGITS, RFC3966_VISUAL_SEPARATOR);
        let rfc3966_domainlabel = format!("[{}]+(?:-*[{}])*", alphanum, alphanum);
        let rfc3966_toplabel = format!("[{}]+(?:-*[{}])*", VALID_ALPHA_INCL_UPPERCASE, alphanum);

        let mut instance = Self {
            regexp_cache: Arc::new(RegexCache::with_capacity(128)),
            diallable_char_mappings: Default::default(),
            alpha_mappings: Default::default(),
            alpha_phone_mappings: Default::default(),
            all_plus_number_grouping_symbols: Default::default(),
            mobile_token_mappings: Default::default(),
            countries_without_national_prefix_with_area_codes: Default::default(),
            geo_mobile_countries: Default::default(),
            geo_mobile_countries_without_mobile_area_codes: Default::default(),
            single_international_prefix: Regex::new(
                "^[\\d]+(?:[~\u{2053}\u{223C}\u{FF5E}][\\d]+)?$",
            )?,
            capturing_digit_pattern: Regex::new(&format!("([{}])", DIGITS))?,
            valid_start_char_pattern: Regex::new(&format!("[{}{}]", PLUS_CHARS, DIGITS))?,
            second_number_start_pattern: Regex::new(SECOND_NUMBER_START)?,
            unwanted_end_char_pattern: Regex::new("[^\\p{N}\\p{L}#]+$")?,
            separator_pattern: Regex::new(&format!("[{}]+", VALID_PUNCTUATION))?,
            extn_pattern: Regex::new(&format!("(?i)(?:{})$", &extn_patterns_for_parsing))?,
            valid_phone_number_pattern: Regex::new(&format!(
                "(?i)^(?:{})(?:{})?$",
                &valid_phone_number, &extn_patterns_for_parsing
            ))?,
            valid_alpha_phone_pattern: Regex::new("(?s)^(?:.*?[A-Za-z]){3}.*$")?,
            first_group_capturing_pattern: Regex::new("(\\$\\d)")?,
            carrier_code_pattern: Regex::new("\\$CC")?,
            group_reference_pattern: Regex::new("\\$(\\d)")?,
            plus_chars_pattern: Regex::new(&format!("[{}]+", PLUS_CHARS))?,
            non_digits_pattern: Regex::new("\\D+")?,
            rfc3966_global_number_digits_pattern: Regex::new(&format!(
                "^\\{}{}*{}{}*$",
                PLUS_SIGN, &rfc3966_phone_digit, DIGITS, &rfc3966_phone_digit
            ))?,
            rfc3966_domainname_pattern: Regex::new(&format!(
                "^(?:{}\\.)*{}\\.?$",
                rfc3966_domainlabel, rfc3966_toplabel
            ))?,
            is_format_eligible_as_you_type_formatting_regex: Regex::new(&format!(
                "^[{}]*\\$1[{}]*(?:\\$\\d[{}]*)*$",
                VALID_PUNCTUATION, VALID_PUNCTUATION, VALID_PUNCTUATION
            ))?,
            formatting_rule_has_first_group_only_regex: Regex::new("^\\(?\\$1\\)?$")?,
            national_prefix_separators_pattern: Regex::new("[- ]")?,
        };
        instance.initialize_regexp_mappings();
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::PhoneNumberRegExpsAndMappings;

    #[test]
    fn check_regexps_are_compiling() {
        assert!(PhoneNumberRegExpsAndMappings::new().is_ok());
    }

    #[test]
    fn valid_phone_number_shapes() {
        let reg_exps = PhoneNumberRegExpsAndMappings::new().unwrap();
        let pattern = &reg_exps.valid_phone_number_pattern;
        assert!(pattern.is_match("12"));
        assert!(pattern.is_match("+1 (650) 253-0000"));
        assert!(pattern.is_match("1800 six-flags"));
        assert!(pattern.is_match("[650] 253 0000"));
        assert!(pattern.is_match("650 253 0000 ext. 1234"));
        assert!(!pattern.is_match("1 2"));
        assert!(!pattern.is_match("+44\u{0096}2087654321"));
    }

    #[test]
    fn single_international_prefix() {
        let reg_exps = PhoneNumberRegExpsAndMappings::new().unwrap();
        assert!(reg_exps.single_international_prefix.is_match("011"));
        assert!(reg_exps.single_international_prefix.is_match("8~10"));
        assert!(!reg_exps.single_international_prefix.is_match("0[0-3]\\d"));
    }

    #[test]
    fn keypad_mappings() {
        let reg_exps = PhoneNumberRegExpsAndMappings::new().unwrap();
        assert_eq!(Some(&'7'), reg_exps.alpha_mappings.get(&'S'));
        assert_eq!(Some(&'9'), reg_exps.alpha_phone_mappings.get(&'Z'));
        assert_eq!(Some(&'5'), reg_exps.alpha_phone_mappings.get(&'5'));
        assert_eq!(None, reg_exps.alpha_mappings.get(&'s'));
        assert_eq!(Some(&'-'), reg_exps.all_plus_number_grouping_symbols.get(&'\u{2013}'));
    }
}
