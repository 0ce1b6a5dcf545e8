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
    borrow::Cow,
    collections::{HashMap, HashSet},
};

use regex::Regex;
use strum::IntoEnumIterator;

use crate::{
    interfaces::MatcherApi,
    phonemetadata::{PhoneMetadata, PhoneNumberDesc},
    phonenumber::PhoneNumber,
    regexp_cache::{InvalidRegexError, RegexCache},
};

use super::{
    PhoneNumberFormat, PhoneNumberType,
    errors::ValidationError,
    helper_constants::{
        OPTIONAL_EXT_SUFFIX, PLUS_SIGN, POSSIBLE_CHARS_AFTER_EXT_LABEL,
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL, RFC3966_EXTN_PREFIX, RFC3966_PREFIX,
    },
};

/// Returns a pointer to the description inside the metadata of the appropriate
/// type.
pub(super) fn get_number_desc_by_type(
    metadata: &PhoneMetadata,
    phone_number_type: PhoneNumberType,
) -> &PhoneNumberDesc {
    match phone_number_type {
        PhoneNumberType::PremiumRate => &metadata.premium_rate,
        PhoneNumberType::TollFree => &metadata.toll_free,
        PhoneNumberType::Mobile => &metadata.mobile,
        PhoneNumberType::FixedLine | PhoneNumberType::FixedLineOrMobile => &metadata.fixed_line,
        PhoneNumberType::SharedCost => &metadata.shared_cost,
        PhoneNumberType::VoIP => &metadata.voip,
        PhoneNumberType::PersonalNumber => &metadata.personal_number,
        PhoneNumberType::Pager => &metadata.pager,
        PhoneNumberType::UAN => &metadata.uan,
        PhoneNumberType::VoiceMail => &metadata.voicemail,
        // Instead of the default case, we only match `Unknown`
        PhoneNumberType::Unknown => &metadata.general_desc,
    }
}

/// A helper function that is used by Format and FormatByPattern.
pub(super) fn prefix_number_with_country_calling_code(
    country_calling_code: i32,
    number_format: PhoneNumberFormat,
    formatted_number: &mut String,
) {
    if let PhoneNumberFormat::National = number_format {
        return;
    }
    let mut buf = itoa::Buffer::new();
    let country_calling_code_str = buf.format(country_calling_code);

    // we anyway allocate a new string in concatenation, so we'l do it once
    // with capacity of resulting string
    match number_format {
        PhoneNumberFormat::E164 => {
            let new_str =
                fast_cat::concat_str!(PLUS_SIGN, country_calling_code_str, &formatted_number);
            *formatted_number = new_str;
        }
        PhoneNumberFormat::International => {
            let new_str =
                fast_cat::concat_str!(PLUS_SIGN, country_calling_code_str, " ", &formatted_number);

            *formatted_number = new_str;
        }
        PhoneNumberFormat::RFC3966 => {
            let new_str = fast_cat::concat_str!(
                RFC3966_PREFIX,
                PLUS_SIGN,
                country_calling_code_str,
                "-",
                &formatted_number
            );

            *formatted_number = new_str;
        }
        // here code is already returned
        PhoneNumberFormat::National => {}
    }
}

// Returns true when one national number is the suffix of the other or both are
// the same.
pub(super) fn is_national_number_suffix_of_the_other(
    first_number: &PhoneNumber,
    second_number: &PhoneNumber,
) -> bool {
    let mut buf = itoa::Buffer::new();
    let first_number_national_number = buf.format(first_number.national_number());
    let mut buf = itoa::Buffer::new();
    let second_number_national_number = buf.format(second_number.national_number());
    // Note that ends_with returns true if the numbers are equal.
    first_number_national_number.ends_with(second_number_national_number)
        || second_number_national_number.ends_with(first_number_national_number)
}

/// Helper method for constructing regular expressions for parsing. Creates an
/// expression that captures up to max_length digits.
pub(super) fn extn_digits(max_length: u32) -> String {
    let mut buf = itoa::Buffer::new();
    let max_length_str = buf.format(max_length);
    const HELPER_STR_LEN: usize = 2 + 4 + 2;

    let mut expr = String::with_capacity(
        HELPER_STR_LEN + super::helper_constants::DIGITS.len() + max_length_str.len(),
    );

    expr.push_str("([");
    // Fully qualify DIGITS const as its common name
    expr.push_str(super::helper_constants::DIGITS);
    expr.push_str("]{1,");
    expr.push_str(max_length_str);
    expr.push_str("})");

    expr
}

// Helper initialiser method to create the regular-expression pattern to match
// extensions. Note that:
// - There are currently six capturing groups for the extension itself. If this
// number is changed, MaybeStripExtension needs to be updated.
// - The only capturing groups should be around the digits that you want to
// capture as part of the extension, or else parsing will fail!
pub(super) fn create_extn_pattern(for_parsing: bool) -> String {
    // We cap the maximum length of an extension based on the ambiguity of the
    // way the extension is prefixed. As per ITU, the officially allowed
    // length for extensions is actually 40, but we don't support this since we
    // haven't seen real examples and this introduces many false interpretations
    // as the extension labels are not standardized.
    let ext_limit_after_explicit_label = 20;
    let ext_limit_after_likely_label = 15;
    let ext_limit_after_ambiguous_char = 9;
    let ext_limit_when_not_sure = 6;

    // Canonical-equivalence doesn't seem to be an option with RE2, so we allow
    // two options for representing any non-ASCII character like ó - the character
    // itself, and one in the unicode decomposed form with the combining acute
    // accent.

    // Here the extension is called out in a more explicit way, i.e mentioning it
    // obvious patterns like "ext.".
    let explicit_ext_labels = "(?:e?xt(?:ensi(?:o\u{0301}?|\u{00F3}))?n?|(?:\u{FF45})?\u{FF58}\u{FF54}(?:\u{FF4E})?|\u{0434}\u{043E}\u{0431}|anexo)";
    // One-character symbols that can be used to indicate an extension, and less
    // commonly used or more ambiguous extension labels.
    let ambiguous_ext_labels = "(?:[x\u{FF58}#\u{FF03}~\u{FF5E}]|int|\u{FF49}\u{FF4E}\u{FF54})";
    // When extension is not separated clearly.
    let ambiguous_separator = "[- ]+";

    let rfc_extn = fast_cat::concat_str!(
        RFC3966_EXTN_PREFIX,
        &extn_digits(ext_limit_after_explicit_label)
    );
    let explicit_extn = fast_cat::concat_str!(
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        explicit_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_explicit_label),
        OPTIONAL_EXT_SUFFIX
    );
    let ambiguous_extn = fast_cat::concat_str!(
        POSSIBLE_SEPARATORS_BETWEEN_NUMBER_AND_EXT_LABEL,
        ambiguous_ext_labels,
        POSSIBLE_CHARS_AFTER_EXT_LABEL,
        &extn_digits(ext_limit_after_ambiguous_char),
        OPTIONAL_EXT_SUFFIX
    );

    let american_style_extn_with_suffix = fast_cat::concat_str!(
        ambiguous_separator,
        &extn_digits(ext_limit_when_not_sure),
        "#"
    );

    // The first regular expression covers RFC 3966 format, where the extension is
    // added using ";ext=". The second more generic where extension is mentioned
    // with explicit labels like "ext:". In both the above cases we allow more
    // numbers in extension than any other extension labels. The third one
    // captures when single character extension labels or less commonly used
    // labels are present. In such cases we capture fewer extension digits in
    // order to reduce the chance of falsely interpreting two numbers beside each
    // other as a number + extension. The fourth one covers the special case of
    // American numbers where the extension is written with a hash at the end,
    // such as "- 503#".
    let extension_pattern = fast_cat::concat_str!(
        &rfc_extn,
        "|",
        &explicit_extn,
        "|",
        &ambiguous_extn,
        "|",
        &american_style_extn_with_suffix
    );
    // Additional pattern that is supported when parsing extensions, not when
    // matching.
    if for_parsing {
        // ",," is commonly used for auto dialling the extension when connected.
        // Semi-colon works in Iphone and also in Android to pop up a button with
        // the extension number following.
        let auto_dialling_and_ext_labels_found = "(?:,{2}|;)";
        // This is same as kPossibleSeparatorsBetweenNumberAndExtLabel, but not
        // matching comma as extension label may have it.
        let possible_separators_number_ext_label_no_comma = "[ \u{00A0}\t]*";

        let auto_dialling_extn = fast_cat::concat_str!(
            possible_separators_number_ext_label_no_comma,
            auto_dialling_and_ext_labels_found,
            POSSIBLE_CHARS_AFTER_EXT_LABEL,
            &extn_digits(ext_limit_after_likely_label),
            OPTIONAL_EXT_SUFFIX
        );
        let only_commas_extn = fast_cat::concat_str!(
            possible_separators_number_ext_label_no_comma,
            "(?:,)+",
            POSSIBLE_CHARS_AFTER_EXT_LABEL,
            &extn_digits(ext_limit_after_ambiguous_char),
            OPTIONAL_EXT_SUFFIX
        );
        // Here the first pattern is exclusive for extension autodialling formats
        // which are used when dialling and in this case we accept longer
        // extensions. However, the second pattern is more liberal on number of
        // commas that acts as extension labels, so we have strict cap on number of
        // digits in such extensions.
        return fast_cat::concat_str!(
            &extension_pattern,
            "|",
            &auto_dialling_extn,
            "|",
            &only_commas_extn
        );
    }
    extension_pattern
}

/// Normalizes a string of characters representing a phone number by replacing
/// all characters found in the accompanying map with the values therein, and
/// stripping all other characters if remove_non_matches is true.
///
/// Parameters:
/// * `normalization_replacements` - a mapping of characters to what they should be
///   replaced by in the normalized version of the phone number. Lookups are
///   done with the uppercase form of every character.
/// * `remove_non_matches` - indicates whether characters that are not able to be
///   replaced should be stripped from the number. If this is false, they will be
///   left unchanged in the number.
/// * `phone_number` - the string of characters representing a phone number to
///   be normalized.
pub(super) fn normalize_helper(
    normalization_replacements: &HashMap<char, char>,
    remove_non_matches: bool,
    phone_number: &str,
) -> String {
    let mut normalized_number = String::with_capacity(phone_number.len());
    for phone_char in phone_number.chars() {
        if let Some(replacement) = normalization_replacements.get(&phone_char.to_ascii_uppercase()) {
            normalized_number.push(*replacement);
        } else if !remove_non_matches {
            normalized_number.push(phone_char);
        }
        // If neither of the above are true, we remove this character.
    }
    normalized_number
}

/// Returns the decimal digits of `phone_number` converted to ASCII, dropping
/// everything else. Digits of any script are recognised, e.g. `"٥"` becomes
/// `"5"`.
pub(crate) fn normalize_digits_only(phone_number: &str) -> String {
    dec_from_char::normalize_decimals(phone_number)
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// Converts a single decimal digit of any script into its ASCII form.
pub(crate) fn normalize_digit(digit: char) -> Option<char> {
    let mut buf = [0u8; 4];
    dec_from_char::normalize_decimals(digit.encode_utf8(&mut buf))
        .chars()
        .next()
        .filter(char::is_ascii_digit)
}

/// Rewrites `$N` group references of a metadata template into the braced
/// `${N}` form understood by [`regex::Regex::replace`]. Without the braces a
/// reference followed by a digit or a letter would name another group.
pub(crate) fn to_replacement_template<'a>(
    group_reference_pattern: &Regex,
    template: &'a str,
) -> Cow<'a, str> {
    group_reference_pattern.replace_all(template, "$${${1}}")
}

/// Returns `true` if there is any data set for a particular PhoneNumberDesc.
pub(super) fn desc_has_data(desc: &PhoneNumberDesc) -> bool {
    desc.has_example_number()
        || desc.has_possible_number_pattern()
        || desc.has_national_number_pattern()
}

/// Returns the types we have metadata for based on the PhoneMetadata object
/// passed in.
pub(super) fn get_supported_types_for_metadata(metadata: &PhoneMetadata) -> HashSet<PhoneNumberType> {
    PhoneNumberType::iter()
        // Never return FIXED_LINE_OR_MOBILE (it is a convenience type, and
        // represents that a particular number type can't be
        // determined) or UNKNOWN (the non-type).
        .filter(|number_type| {
            !matches!(
                number_type,
                PhoneNumberType::FixedLineOrMobile | PhoneNumberType::Unknown
            )
        })
        .filter(|number_type| desc_has_data(get_number_desc_by_type(metadata, *number_type)))
        .collect()
}

/// Checks a number against the possible number pattern of a description.
///
/// The outer error reports a broken pattern. The inner result tells whether
/// the whole number matches (`Ok`), only a prefix of it does (`TooLong`) or
/// nothing does (`TooShort`).
pub(super) fn test_number_length_against_pattern(
    regexp_cache: &RegexCache,
    possible_number_pattern: &str,
    number: &str,
) -> Result<Result<(), ValidationError>, InvalidRegexError> {
    if regexp_cache.full_match(possible_number_pattern, number)? {
        return Ok(Ok(()));
    }
    if regexp_cache.matches_start(possible_number_pattern, number)? {
        Ok(Err(ValidationError::TooLong))
    } else {
        Ok(Err(ValidationError::TooShort))
    }
}

/// Returns a new phone number containing only the fields needed to uniquely
/// identify a phone number, rather than any fields that capture the context in
/// which the phone number was created.
/// These fields correspond to those set in `parse()` rather than
/// `parse_and_keep_raw_input()`.
pub(crate) fn copy_core_fields_only(from_number: &PhoneNumber) -> PhoneNumber {
    let mut to_number = PhoneNumber::new();
    to_number.set_country_code(from_number.country_code());
    to_number.set_national_number(from_number.national_number());
    if from_number.has_extension() {
        to_number.set_extension(from_number.extension().to_owned());
    }
    if from_number.italian_leading_zero() {
        to_number.set_italian_leading_zero(true);
        // This field is only relevant if there are leading zeros at all.
        to_number.set_number_of_leading_zeros(from_number.number_of_leading_zeros());
    }
    to_number
}

/// Determines whether the given number is a national number match for the given
/// PhoneNumberDesc. Does not check against the possible number pattern!
pub(super) fn is_match(
    matcher_api: &dyn MatcherApi,
    number: &str,
    number_desc: &PhoneNumberDesc,
) -> bool {
    matcher_api.match_national_number(number, number_desc, false)
}

/// A number belongs to a description when it fits both its possible number
/// pattern and its national number pattern.
pub(super) fn is_number_matching_desc(
    matcher_api: &dyn MatcherApi,
    national_number: &str,
    number_desc: &PhoneNumberDesc,
) -> bool {
    matcher_api.match_possible_number(national_number, number_desc)
        && is_match(matcher_api, national_number, number_desc)
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    #[test]
    fn digits_of_any_script_are_normalized() {
        assert_eq!("5123", normalize_digits_only("\u{0665}1-2 3a"));
        assert_eq!("034", normalize_digits_only("\u{FF10}3\u{0664}"));
        assert_eq!(Some('7'), normalize_digit('\u{0667}'));
        assert_eq!(None, normalize_digit('x'));
    }

    #[test]
    fn templates_get_braced_group_references() {
        let group_reference = Regex::new("\\$(\\d)").unwrap();
        assert_eq!("${1} ${2}-${3}", to_replacement_template(&group_reference, "$1 $2-$3"));
        let regex = Regex::new("(\\d{2})(\\d)").unwrap();
        let template = to_replacement_template(&group_reference, "$1x$2");
        assert_eq!("12x3", regex.replace("123", &*template));
    }

    #[test]
    fn length_against_pattern() {
        let cache = RegexCache::new();
        assert_eq!(Ok(Ok(())), test_number_length_against_pattern(&cache, "\\d{7}(?:\\d{3})?", "2530000"));
        assert_eq!(
            Ok(Err(ValidationError::TooShort)),
            test_number_length_against_pattern(&cache, "\\d{7}(?:\\d{3})?", "253000")
        );
        assert_eq!(
            Ok(Err(ValidationError::TooLong)),
            test_number_length_against_pattern(&cache, "\\d{7}(?:\\d{3})?", "65025300001")
        );
    }

    #[test]
    fn core_fields_drop_parsing_context() {
        let mut number = PhoneNumber::new();
        number.set_country_code(39);
        number.set_national_number(236618300);
        number.set_italian_leading_zero(true);
        number.set_raw_input("02 3661 8300".to_owned());
        let core = copy_core_fields_only(&number);
        assert!(!core.has_raw_input());
        assert!(core.italian_leading_zero());
        assert_eq!(1, core.number_of_leading_zeros());
    }
}
