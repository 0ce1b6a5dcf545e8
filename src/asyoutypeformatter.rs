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

//! Formatting of phone numbers while they are being typed.

use log::{error, trace};

use crate::{
    i18n::RegionCode,
    phonemetadata::{NumberFormat, PhoneMetadata},
    phonenumberutil::{
        PhoneNumberUtil, RegexResult,
        helper_constants::{PLUS_SIGN, REGION_CODE_FOR_NON_GEO_ENTITY},
        helper_functions::{normalize_digit, to_replacement_template},
    },
};

// Character used when appropriate to separate a prefix, such as a long NDD or a
// country calling code, from the national number.
const SEPARATOR_BEFORE_NATIONAL_NUMBER: char = ' ';

// The minimum number of digits of the national number (excluding the national
// prefix) needed before a formatting template is looked for.
const MIN_LEADING_DIGITS_LENGTH: usize = 3;

// A pattern that is used to determine if a number_format under available_formats
// is eligible to be used by the formatter. The digit placeholder fills the gaps
// in the template.
const DIGIT_PLACEHOLDER: char = '\u{2008}';

// A number long enough to be matched by every formatting pattern.
const LONGEST_PHONE_NUMBER: &str = "999999999999999";

// International prefix used when the region of the formatter is unknown. It
// never matches, so only numbers typed with a plus sign can be formatted.
const UNKNOWN_REGION_INTERNATIONAL_PREFIX: &str = "NA";

/// Formats a phone number digit by digit, as a user types it.
///
/// A formatter is created for the region the number is dialled from and fed
/// one character at a time with [`AsYouTypeFormatter::input_digit`]. Each call
/// returns the whole number typed so far, formatted. Characters other than
/// digits (and a leading plus sign) stop the formatting for the rest of the
/// session; [`AsYouTypeFormatter::clear`] starts a new one.
///
/// ```ignore
/// let mut formatter = util.get_as_you_type_formatter("US");
/// for c in "6502530000".chars() {
///     println!("{}", formatter.input_digit(c));
/// }
/// // 650 253 0000
/// ```
pub struct AsYouTypeFormatter<'a> {
    util: &'a PhoneNumberUtil,

    current_output: String,
    formatting_template: String,
    // The pattern from numberFormat that is currently used to create
    // formatting_template.
    current_formatting_pattern: String,
    accrued_input: String,
    accrued_input_without_formatting: String,
    // This indicates whether AsYouTypeFormatter is currently doing the
    // formatting.
    able_to_format: bool,
    // Set to true when users enter their own formatting. AsYouTypeFormatter will
    // do no formatting at all when this is set to true.
    input_has_formatting: bool,
    // This is set to true when we know the user is entering a full national
    // significant number, since we have either detected a national prefix or an
    // international dialing prefix. When this is true, we will no longer use
    // local number formatting patterns.
    is_complete_number: bool,
    is_expecting_country_calling_code: bool,
    default_country: String,

    // `None` stands for a region without metadata.
    default_metadata: Option<&'a PhoneMetadata>,
    current_metadata: Option<&'a PhoneMetadata>,

    // Byte offset of the last digit written into formatting_template.
    last_match_position: usize,
    // The position of a digit upon which input_digit_and_remember_position is
    // most recently invoked, as found in accrued_input.
    original_position: usize,
    // The position of a digit upon which input_digit_and_remember_position is
    // most recently invoked, as found in accrued_input_without_formatting.
    position_to_remember: usize,
    // This contains anything that has been entered so far preceding the national
    // significant number, and it is formatted (e.g. with space inserted). For
    // example, this can contain IDD, country code, and/or NDD, etc.
    prefix_before_national_number: String,
    should_add_space_after_national_prefix: bool,
    // This contains the national prefix that has been extracted. It contains
    // only digits without formatting.
    extracted_national_prefix: String,
    national_number: String,
    possible_formats: Vec<&'a NumberFormat>,
}

impl<'a> AsYouTypeFormatter<'a> {
    /// Creates a formatter for numbers dialled from `region_code`. An unknown
    /// region still formats numbers typed with a leading plus sign.
    pub fn new(util: &'a PhoneNumberUtil, region_code: &str) -> Self {
        let default_metadata = Self::get_metadata_for_region(util, region_code);
        Self {
            util,
            current_output: String::new(),
            formatting_template: String::new(),
            current_formatting_pattern: String::new(),
            accrued_input: String::new(),
            accrued_input_without_formatting: String::new(),
            able_to_format: true,
            input_has_formatting: false,
            is_complete_number: false,
            is_expecting_country_calling_code: false,
            default_country: region_code.to_owned(),
            default_metadata,
            current_metadata: default_metadata,
            last_match_position: 0,
            original_position: 0,
            position_to_remember: 0,
            prefix_before_national_number: String::new(),
            should_add_space_after_national_prefix: false,
            extracted_national_prefix: String::new(),
            national_number: String::new(),
            possible_formats: Vec::new(),
        }
    }

    /// The metadata of the main region of the calling code used by
    /// `region_code`, since formatting rules live there.
    fn get_metadata_for_region(
        util: &'a PhoneNumberUtil,
        region_code: &str,
    ) -> Option<&'a PhoneMetadata> {
        let country_calling_code = util.get_country_code_for_region(region_code);
        let main_country = util.get_region_code_for_country_code(country_calling_code);
        util.get_metadata_for_region(main_country)
    }

    /// Clears the internal state of the formatter, so it can be reused.
    pub fn clear(&mut self) {
        self.current_output.clear();
        self.accrued_input.clear();
        self.accrued_input_without_formatting.clear();
        self.formatting_template.clear();
        self.last_match_position = 0;
        self.current_formatting_pattern.clear();
        self.prefix_before_national_number.clear();
        self.extracted_national_prefix.clear();
        self.national_number.clear();
        self.able_to_format = true;
        self.input_has_formatting = false;
        self.position_to_remember = 0;
        self.original_position = 0;
        self.is_complete_number = false;
        self.is_expecting_country_calling_code = false;
        self.possible_formats.clear();
        self.should_add_space_after_national_prefix = false;
        self.current_metadata = self.default_metadata;
    }

    /// Formats a phone number on-the-fly as each digit is entered.
    ///
    /// Returns the partially formatted phone number.
    pub fn input_digit(&mut self, next_char: char) -> String {
        self.current_output = self.input_digit_with_option_to_remember_position(next_char, false);
        self.current_output.clone()
    }

    /// Same as [`Self::input_digit`], but remembers the position where
    /// `next_char` is inserted, so that it can be retrieved later by using
    /// [`Self::get_remembered_position`]. The remembered position will be
    /// automatically adjusted if additional formatting characters are later
    /// inserted/removed in front of `next_char`.
    pub fn input_digit_and_remember_position(&mut self, next_char: char) -> String {
        self.current_output = self.input_digit_with_option_to_remember_position(next_char, true);
        self.current_output.clone()
    }

    /// Returns the current position in the partially formatted phone number of
    /// the character which was previously passed in as the parameter of
    /// [`Self::input_digit_and_remember_position`]. The position counts
    /// characters, not bytes.
    pub fn get_remembered_position(&self) -> usize {
        if !self.able_to_format {
            return self.original_position;
        }
        let unformatted: Vec<char> = self.accrued_input_without_formatting.chars().collect();
        let mut accrued_input_index = 0;
        let mut current_output_index = 0;
        for output_char in self.current_output.chars() {
            if accrued_input_index >= self.position_to_remember {
                break;
            }
            if unformatted.get(accrued_input_index) == Some(&output_char) {
                accrued_input_index += 1;
            }
            current_output_index += 1;
        }
        current_output_index
    }

    /// The national prefix (or NANPA `1`) taken off the national number so
    /// far, digits only.
    pub fn get_extracted_national_prefix(&self) -> &str {
        &self.extracted_national_prefix
    }

    fn input_digit_with_option_to_remember_position(
        &mut self,
        next_char: char,
        remember_position: bool,
    ) -> String {
        match self.input_digit_internal(next_char, remember_position) {
            Ok(output) => output,
            Err(err) => {
                error!("Invalid regex while formatting as you type: {err}");
                self.able_to_format = false;
                self.accrued_input.clone()
            }
        }
    }

    fn input_digit_internal(
        &mut self,
        next_char: char,
        remember_position: bool,
    ) -> RegexResult<String> {
        self.accrued_input.push(next_char);
        if remember_position {
            self.original_position = self.accrued_input.chars().count();
        }
        // We do formatting on-the-fly only when each character entered is either a
        // digit, or a plus sign (accepted at the start of the number only).
        let next_char = match self.normalize_digit_or_leading_plus_sign(next_char) {
            Some(normalized_char) => {
                self.accrue_digit_or_plus_sign(normalized_char, remember_position);
                normalized_char
            }
            None => {
                self.able_to_format = false;
                self.input_has_formatting = true;
                next_char
            }
        };

        if !self.able_to_format {
            // When we are unable to format because of reasons other than that
            // formatting chars have been entered, it can be due to really long IDDs or
            // NDDs. If that is the case, we might be able to do formatting again after
            // extracting them.
            if self.input_has_formatting {
                return Ok(self.accrued_input.clone());
            } else if self.attempt_to_extract_idd()? {
                if self.attempt_to_extract_country_calling_code() {
                    return self.attempt_to_choose_pattern_with_prefix_extracted();
                }
            } else if self.able_to_extract_longer_ndd()? {
                // Add an additional space to separate long NDD and national significant
                // number for readability. We don't set
                // should_add_space_after_national_prefix to true, since we don't want
                // this to change later when we choose formatting templates.
                self.prefix_before_national_number
                    .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
                return self.attempt_to_choose_pattern_with_prefix_extracted();
            }
            return Ok(self.accrued_input.clone());
        }

        // We start to attempt to format only when at least
        // MIN_LEADING_DIGITS_LENGTH digits (the plus sign is counted as a digit as
        // well for this purpose) have been entered.
        match self.accrued_input_without_formatting.len() {
            0..=2 => return Ok(self.accrued_input.clone()),
            3 => {
                if self.attempt_to_extract_idd()? {
                    self.is_expecting_country_calling_code = true;
                } else {
                    // No IDD or plus sign is found, might be entering in national format.
                    self.extracted_national_prefix = self.remove_national_prefix_from_national_number()?;
                    return self.attempt_to_choose_formatting_pattern();
                }
            }
            _ => {}
        }
        if self.is_expecting_country_calling_code {
            if self.attempt_to_extract_country_calling_code() {
                self.is_expecting_country_calling_code = false;
            }
            return Ok(fast_cat::concat_str!(
                &self.prefix_before_national_number,
                &self.national_number
            ));
        }
        if self.possible_formats.is_empty() {
            return self.attempt_to_choose_formatting_pattern();
        }
        // The formatting patterns are already chosen.
        let temp_national_number = self.input_digit_helper(next_char);
        // See if the accrued digits can be formatted properly already. If not, use
        // the results from input_digit_helper, which does formatting based on the
        // formatting pattern chosen.
        if let Some(formatted_number) = self.attempt_to_format_accrued_digits()? {
            return Ok(formatted_number);
        }
        let national_number = self.national_number.clone();
        self.narrow_down_possible_formats(&national_number)?;
        if self.maybe_create_new_template()? {
            return Ok(self.input_accrued_national_number());
        }
        Ok(if self.able_to_format {
            self.append_national_number(&temp_national_number)
        } else {
            self.accrued_input.clone()
        })
    }

    /// Returns the ASCII form of a digit, or `+` for a plus sign typed as the
    /// first character. `None` for everything else.
    fn normalize_digit_or_leading_plus_sign(&self, next_char: char) -> Option<char> {
        if let Some(digit) = normalize_digit(next_char) {
            return Some(digit);
        }
        let is_leading = self.accrued_input.chars().count() == 1;
        let is_plus = matches!(next_char, '+' | '\u{FF0B}');
        (is_leading && is_plus).then_some('+')
    }

    // Accrues digits and the plus sign to accrued_input_without_formatting for
    // later use. Digits also go to the national number.
    fn accrue_digit_or_plus_sign(&mut self, normalized_char: char, remember_position: bool) {
        self.accrued_input_without_formatting.push(normalized_char);
        if normalized_char != '+' {
            self.national_number.push(normalized_char);
        }
        if remember_position {
            self.position_to_remember = self.accrued_input_without_formatting.len();
        }
    }

    fn attempt_to_choose_pattern_with_prefix_extracted(&mut self) -> RegexResult<String> {
        self.able_to_format = true;
        self.is_expecting_country_calling_code = false;
        self.possible_formats.clear();
        self.last_match_position = 0;
        self.formatting_template.clear();
        self.current_formatting_pattern.clear();
        self.attempt_to_choose_formatting_pattern()
    }

    // Some national prefixes are a substring of others. If extracting the
    // shorter NDD doesn't result in a number we can format, we try to see if we
    // can extract a longer version here.
    fn able_to_extract_longer_ndd(&mut self) -> RegexResult<bool> {
        if !self.extracted_national_prefix.is_empty() {
            // Put the extracted NDD back to the national number before attempting to
            // extract a new NDD.
            self.national_number
                .insert_str(0, &self.extracted_national_prefix);
            // Remove the previously extracted NDD from prefix_before_national_number.
            // We cannot simply set it to empty string because people sometimes
            // incorrectly enter national prefix after the country code, e.g.
            // +44 (0)20-1234-5678.
            if let Some(index_of_previous_ndd) = self
                .prefix_before_national_number
                .rfind(&self.extracted_national_prefix)
            {
                self.prefix_before_national_number
                    .truncate(index_of_previous_ndd);
            }
        }
        let new_national_prefix = self.remove_national_prefix_from_national_number()?;
        Ok(self.extracted_national_prefix != new_national_prefix)
    }

    // Attempts to set the formatting template and returns a string which contains
    // the formatted version of the digits entered so far.
    fn attempt_to_choose_formatting_pattern(&mut self) -> RegexResult<String> {
        // We start to attempt to format only when at least
        // MIN_LEADING_DIGITS_LENGTH digits of national number (excluding national
        // prefix) have been entered.
        if self.national_number.len() < MIN_LEADING_DIGITS_LENGTH {
            return Ok(self.append_national_number(&self.national_number));
        }
        let national_number = self.national_number.clone();
        self.get_available_formats(&national_number)?;
        // See if the accrued digits can be formatted properly already.
        if let Some(formatted_number) = self.attempt_to_format_accrued_digits()? {
            return Ok(formatted_number);
        }
        Ok(if self.maybe_create_new_template()? {
            self.input_accrued_national_number()
        } else {
            self.accrued_input.clone()
        })
    }

    // Invokes input_digit_helper on each digit of the national number accrued,
    // and returns a formatted string in the end.
    fn input_accrued_national_number(&mut self) -> String {
        if self.national_number.is_empty() {
            return self.prefix_before_national_number.clone();
        }
        let national_number = self.national_number.clone();
        let mut temp_national_number = String::new();
        for digit in national_number.chars() {
            temp_national_number = self.input_digit_helper(digit);
        }
        if self.able_to_format {
            self.append_national_number(&temp_national_number)
        } else {
            self.accrued_input.clone()
        }
    }

    /// Combines the national number with any prefix (IDD/+ and country code or
    /// national prefix) that was collected. A space will be inserted between
    /// them if the current formatting template indicates this to be suitable.
    fn append_national_number(&self, national_number: &str) -> String {
        let prefix = &self.prefix_before_national_number;
        if self.should_add_space_after_national_prefix
            && !prefix.is_empty()
            && !prefix.ends_with(SEPARATOR_BEFORE_NATIONAL_NUMBER)
        {
            // We want to add a space after the national prefix if the national prefix
            // formatting rule indicates that this would normally be done, with the
            // exception of the case where we already appended a space because the NDD
            // was surprisingly long.
            fast_cat::concat_str!(prefix, " ", national_number)
        } else {
            fast_cat::concat_str!(prefix, national_number)
        }
    }

    // Returns true if a new template is created as opposed to reusing the existing
    // template.
    fn maybe_create_new_template(&mut self) -> RegexResult<bool> {
        // When there are multiple available formats, the formatter uses the first
        // format where a formatting template could be created.
        let mut index = 0;
        while index < self.possible_formats.len() {
            let number_format = self.possible_formats[index];
            let pattern = number_format.pattern();
            if self.current_formatting_pattern == pattern {
                return Ok(false);
            }
            if self.create_formatting_template(number_format)? {
                self.current_formatting_pattern = pattern.to_owned();
                self.should_add_space_after_national_prefix = self
                    .util
                    .reg_exps
                    .national_prefix_separators_pattern
                    .is_match(number_format.national_prefix_formatting_rule());
                // With a new formatting template, the matched position using the old
                // template needs to be reset.
                self.last_match_position = 0;
                return Ok(true);
            }
            // Remove the current number format from possible_formats.
            self.possible_formats.remove(index);
        }
        trace!("No formatting template fits '{}'", self.national_number);
        self.able_to_format = false;
        Ok(false)
    }

    fn get_available_formats(&mut self, leading_digits: &str) -> RegexResult<()> {
        let Some(metadata) = self.current_metadata else {
            return Ok(());
        };
        let reg_exps = &self.util.reg_exps;
        // First decide whether we should use international or national number
        // rules.
        let is_international_number =
            self.is_complete_number && self.extracted_national_prefix.is_empty();
        let format_list = if is_international_number && !metadata.intl_number_format.is_empty() {
            &metadata.intl_number_format
        } else {
            &metadata.number_format
        };
        for format in format_list {
            let has_first_group_only = self
                .util
                .formatting_rule_has_first_group_only(format.national_prefix_formatting_rule());
            // Discard a few formats that we know are not relevant based on the
            // presence of the national prefix.
            if !self.extracted_national_prefix.is_empty()
                && has_first_group_only
                && !format.national_prefix_optional_when_formatting()
                && !format.has_domestic_carrier_code_formatting_rule()
            {
                // If it is a national number that had a national prefix, any rules that
                // aren't valid with a national prefix should be excluded. A rule that
                // has a carrier-code formatting rule is kept since the national prefix
                // might actually be an extracted carrier code - we don't distinguish
                // between these when extracting it in the formatter.
                continue;
            } else if self.extracted_national_prefix.is_empty()
                && !self.is_complete_number
                && !has_first_group_only
                && !format.national_prefix_optional_when_formatting()
            {
                // This number was entered without a national prefix, and this
                // formatting rule requires one, so we discard it.
                continue;
            }
            if reg_exps
                .is_format_eligible_as_you_type_formatting_regex
                .is_match(format.format())
            {
                self.possible_formats.push(format);
            }
        }
        self.narrow_down_possible_formats(leading_digits)
    }

    fn narrow_down_possible_formats(&mut self, leading_digits: &str) -> RegexResult<()> {
        let cache = &self.util.reg_exps.regexp_cache;
        // Formats are only gathered once MIN_LEADING_DIGITS_LENGTH national digits
        // exist (attempt_to_choose_formatting_pattern), including after an IDD
        // and calling code were split off, so the subtraction does not saturate.
        let index_of_leading_digits_pattern =
            leading_digits.len().saturating_sub(MIN_LEADING_DIGITS_LENGTH);
        let mut narrowed = Vec::with_capacity(self.possible_formats.len());
        for format in self.possible_formats.drain(..) {
            let pattern_count = format.leading_digits_pattern.len();
            if pattern_count == 0 {
                // Keep everything that isn't restricted by leading digits.
                narrowed.push(format);
                continue;
            }
            let last_leading_digits_pattern = index_of_leading_digits_pattern.min(pattern_count - 1);
            let leading_digits_pattern = &format.leading_digits_pattern[last_leading_digits_pattern];
            if cache.matches_start(leading_digits_pattern, leading_digits)? {
                narrowed.push(format);
            }
        }
        self.possible_formats = narrowed;
        Ok(())
    }

    fn create_formatting_template(&mut self, format: &NumberFormat) -> RegexResult<bool> {
        self.formatting_template.clear();
        let temp_template = self.get_formatting_template(format.pattern(), format.format())?;
        if temp_template.is_empty() {
            return Ok(false);
        }
        self.formatting_template = temp_template;
        Ok(true)
    }

    // Gets a formatting template which can be used to efficiently format a
    // partial number where digits are added one by one.
    fn get_formatting_template(&self, number_pattern: &str, number_format: &str) -> RegexResult<String> {
        let reg_exps = &self.util.reg_exps;
        let pattern = reg_exps.regexp_cache.get_regex(number_pattern)?;
        // Creates a phone number consisting only of the digit 9 that matches the
        // number_pattern by applying the pattern to the longest_phone_number string.
        let Some(found) = pattern.find(LONGEST_PHONE_NUMBER) else {
            return Ok(String::new());
        };
        let a_phone_number = found.as_str();
        // No formatting template can be created if the number of digits entered so
        // far is longer than the maximum the current formatting rule can
        // accommodate.
        if a_phone_number.len() < self.national_number.len() {
            return Ok(String::new());
        }
        // Formats the number according to number_format.
        let replacement = to_replacement_template(&reg_exps.group_reference_pattern, number_format);
        let template = pattern.replace_all(a_phone_number, &*replacement);
        // Replaces each digit with character DIGIT_PLACEHOLDER.
        Ok(template.replace('9', DIGIT_PLACEHOLDER.encode_utf8(&mut [0; 4])))
    }

    /// Checks to see if there is an exact pattern match for these digits. If so,
    /// we should use this instead of any other formatting template whose
    /// leading_digits_pattern also matches the input.
    fn attempt_to_format_accrued_digits(&mut self) -> RegexResult<Option<String>> {
        let reg_exps = &self.util.reg_exps;
        for number_format in self.possible_formats.iter().copied() {
            let pattern = reg_exps
                .regexp_cache
                .get_full_match_regex(number_format.pattern())?;
            if !pattern.is_match(&self.national_number) {
                continue;
            }
            let should_add_space = reg_exps
                .national_prefix_separators_pattern
                .is_match(number_format.national_prefix_formatting_rule());
            let replacement =
                to_replacement_template(&reg_exps.group_reference_pattern, number_format.format());
            let formatted_number = pattern.replace(&self.national_number, &*replacement).into_owned();
            self.should_add_space_after_national_prefix = should_add_space;
            // Check that we did not remove nor add any extra digits when we matched
            // this formatting pattern. This usually happens after we entered the last
            // digit during formatting, e.g. a mobile token swallowed by the format.
            let full_output = self.append_national_number(&formatted_number);
            let formatted_number_digits_only = self.util.normalize_diallable_chars_only(&full_output);
            if formatted_number_digits_only == self.accrued_input_without_formatting {
                // If it's the same (i.e entered number and format is same), then it's
                // safe to return this in formatted number as nothing is lost / added.
                return Ok(Some(full_output));
            }
        }
        Ok(None)
    }

    /// Returns true if the current country is a NANPA country and the national
    /// number begins with the national prefix.
    fn is_nanpa_number_with_national_prefix(&self) -> bool {
        // For NANPA numbers beginning with 1[2-9], treat the 1 as the national
        // prefix. The reason is that national significant numbers in NANPA always
        // start with [2-9] after the national prefix. Numbers beginning with 1[01]
        // can only be short/emergency numbers, which don't need the national
        // prefix.
        let is_nanpa = self
            .current_metadata
            .is_some_and(|metadata| metadata.country_code() == 1);
        let bytes = self.national_number.as_bytes();
        is_nanpa && bytes.len() > 1 && bytes[0] == b'1' && bytes[1] != b'0' && bytes[1] != b'1'
    }

    // Returns the national prefix extracted, or an empty string if it is not
    // present.
    fn remove_national_prefix_from_national_number(&mut self) -> RegexResult<String> {
        let mut start_of_national_number = 0;
        if self.is_nanpa_number_with_national_prefix() {
            start_of_national_number = 1;
            self.prefix_before_national_number.push('1');
            self.prefix_before_national_number
                .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
            self.is_complete_number = true;
        } else if let Some(metadata) = self
            .current_metadata
            .filter(|metadata| metadata.has_national_prefix_for_parsing())
        {
            let national_prefix_for_parsing = self
                .util
                .reg_exps
                .regexp_cache
                .get_prefix_regex(metadata.national_prefix_for_parsing())?;
            // Since some national prefix patterns are entirely optional, check that a
            // national prefix could actually be extracted.
            if let Some(found) = national_prefix_for_parsing.find(&self.national_number) {
                if found.end() > 0 {
                    // When the national prefix is detected, we use international
                    // formatting rules instead of national ones, because national
                    // formatting rules could contain local formatting rules for numbers
                    // entered without area code.
                    self.is_complete_number = true;
                    start_of_national_number = found.end();
                    self.prefix_before_national_number
                        .push_str(&self.national_number[..start_of_national_number]);
                }
            }
        }
        let national_prefix: String = self
            .national_number
            .drain(..start_of_national_number)
            .collect();
        Ok(national_prefix)
    }

    /// Extracts IDD and plus sign to prefix_before_national_number when they
    /// are available, and places the remaining input into national_number.
    ///
    /// Returns true when accrued_input_without_formatting begins with the plus
    /// sign or valid IDD for default_country.
    fn attempt_to_extract_idd(&mut self) -> RegexResult<bool> {
        let international_prefix = self
            .current_metadata
            .map_or(UNKNOWN_REGION_INTERNATIONAL_PREFIX, |metadata| {
                metadata.international_prefix()
            });
        let pattern = fast_cat::concat_str!("\\", PLUS_SIGN, "|", international_prefix);
        let idd_regex = self.util.reg_exps.regexp_cache.get_prefix_regex(&pattern)?;
        let Some(idd_match) = idd_regex.find(&self.accrued_input_without_formatting) else {
            return Ok(false);
        };
        self.is_complete_number = true;
        let start_of_country_calling_code = idd_match.end();
        self.national_number.clear();
        self.national_number
            .push_str(&self.accrued_input_without_formatting[start_of_country_calling_code..]);
        self.prefix_before_national_number.clear();
        self.prefix_before_national_number
            .push_str(&self.accrued_input_without_formatting[..start_of_country_calling_code]);
        if !self.accrued_input_without_formatting.starts_with(PLUS_SIGN) {
            self.prefix_before_national_number
                .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
        }
        Ok(true)
    }

    /// Extracts the country calling code from the beginning of
    /// national_number to prefix_before_national_number when they are
    /// available, and places the remaining input into national_number.
    ///
    /// Returns true when a valid country calling code can be found.
    fn attempt_to_extract_country_calling_code(&mut self) -> bool {
        if self.national_number.is_empty() {
            return false;
        }
        let Some((country_code, number_without_country_calling_code)) =
            self.util.extract_country_code(&self.national_number)
        else {
            return false;
        };
        let number_without_country_calling_code = number_without_country_calling_code.to_owned();
        self.national_number = number_without_country_calling_code;
        let new_region_code = self.util.get_region_code_for_country_code(country_code);
        if new_region_code == REGION_CODE_FOR_NON_GEO_ENTITY {
            self.current_metadata = self
                .util
                .get_metadata_for_non_geographical_region(country_code);
        } else if new_region_code != self.default_country {
            self.current_metadata = Self::get_metadata_for_region(self.util, new_region_code);
        }
        if new_region_code == RegionCode::get_unknown() {
            trace!("Calling code {country_code} has no region");
        }
        let mut buf = itoa::Buffer::new();
        self.prefix_before_national_number
            .push_str(buf.format(country_code));
        self.prefix_before_national_number
            .push(SEPARATOR_BEFORE_NATIONAL_NUMBER);
        // When we have successfully extracted the IDD, the previously extracted NDD
        // should be cleared because it is no longer valid.
        self.extracted_national_prefix.clear();
        true
    }

    fn input_digit_helper(&mut self, next_char: char) -> String {
        // Note that formatting_template is not guaranteed to have a value, it could
        // be empty, e.g. when the next digit is entered after extracting an IDD or
        // NDD.
        let placeholder = self
            .formatting_template
            .get(self.last_match_position..)
            .and_then(|rest| rest.find(DIGIT_PLACEHOLDER))
            .map(|offset| offset + self.last_match_position);
        match placeholder {
            Some(position) => {
                let mut buf = [0; 4];
                self.formatting_template.replace_range(
                    position..position + DIGIT_PLACEHOLDER.len_utf8(),
                    next_char.encode_utf8(&mut buf),
                );
                self.last_match_position = position;
                self.formatting_template[..position + next_char.len_utf8()].to_owned()
            }
            None => {
                if self.possible_formats.len() == 1 {
                    // More digits are entered than we could handle, and there are no other
                    // valid patterns to try.
                    self.able_to_format = false;
                } // else, we just reset the formatting pattern.
                self.current_formatting_pattern.clear();
                self.accrued_input.clone()
            }
        }
    }
}
