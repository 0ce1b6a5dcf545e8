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

//! Turning free-form text into [`PhoneNumber`] values.

use std::borrow::Cow;

use log::trace;

use super::{
    PhoneNumberUtil, RegexResult,
    errors::{ExtractNumberError, NotANumberError, ParseError, ParseErrorInternal, ValidationError},
    helper_constants::{
        MAX_INPUT_STRING_LENGTH, MAX_LENGTH_COUNTRY_CODE, MAX_LENGTH_FOR_NSN, MIN_LENGTH_FOR_NSN,
        PLUS_SIGN, RFC3966_ISDN_SUBADDRESS, RFC3966_PHONE_CONTEXT, RFC3966_PREFIX,
    },
    helper_functions::{
        normalize_digits_only, normalize_helper, test_number_length_against_pattern,
        to_replacement_template,
    },
    helper_types::{CountryCodeExtraction, NationalPrefixStripping, PhoneNumberWithCountryCodeSource},
};
use crate::{
    phonemetadata::PhoneMetadata,
    phonenumber::{CountryCodeSource, PhoneNumber},
    regex_util::RegexConsume,
};

impl PhoneNumberUtil {
    /// Normalizes a string of characters representing a phone number.
    ///
    /// Text holding at least three letters is read as a vanity number: letters
    /// become their keypad digits and ASCII digits are kept. Otherwise every
    /// decimal digit, whatever its script, becomes its ASCII form. All other
    /// characters are dropped.
    pub fn normalize(&self, phone_number: &str) -> String {
        if self.reg_exps.valid_alpha_phone_pattern.is_match(phone_number) {
            normalize_helper(&self.reg_exps.alpha_phone_mappings, true, phone_number)
        } else {
            normalize_digits_only(phone_number)
        }
    }

    /// Keeps the decimal digits of `phone_number`, converted to ASCII.
    pub fn normalize_digits_only(phone_number: &str) -> String {
        normalize_digits_only(phone_number)
    }

    /// Converts letters to their keypad digits, leaving every other character
    /// untouched, e.g. "1-800-FLOWERS" becomes "1-800-3569377".
    pub fn convert_alpha_characters_in_number(&self, number: &str) -> String {
        normalize_helper(&self.reg_exps.alpha_phone_mappings, false, number)
    }

    /// Attempts to extract a possible number from the string passed in.
    ///
    /// Everything before the first plus sign or digit is dropped, as are
    /// trailing characters that are neither letters, digits nor `#`. A second
    /// number introduced by `/ x` or `\ x` is cut off. The result may still be
    /// no phone number at all.
    pub fn extract_possible_number<'b>(
        &self,
        phone_number: &'b str,
    ) -> Result<&'b str, ExtractNumberError> {
        let Some(start) = self.reg_exps.valid_start_char_pattern.find(phone_number) else {
            return Err(ExtractNumberError::NoValidStartCharacter);
        };
        let mut extracted = &phone_number[start.start()..];
        // Remove trailing non-alpha non-numerical characters.
        if let Some(trailing) = self.reg_exps.unwanted_end_char_pattern.find(extracted) {
            extracted = &extracted[..trailing.start()];
        }
        // Check for extra numbers at the end.
        if let Some(second_number) = self.reg_exps.second_number_start_pattern.find(extracted) {
            extracted = &extracted[..second_number.start()];
        }
        if extracted.is_empty() {
            return Err(ExtractNumberError::NotANumber);
        }
        Ok(extracted)
    }

    /// Checks to see if the string of characters could possibly be a phone
    /// number at all. At the moment, checks to see that the string begins with
    /// at least 2 digits, ignoring any punctuation commonly found in phone
    /// numbers. This method does not require the number to be normalized in
    /// advance - but does assume that leading non-number symbols have been
    /// removed, such as by [`Self::extract_possible_number`].
    pub fn is_viable_phone_number(&self, phone_number: &str) -> bool {
        if phone_number.chars().count() < MIN_LENGTH_FOR_NSN {
            return false;
        }
        self.reg_exps.valid_phone_number_pattern.is_match(phone_number)
    }

    /// Checks if the number is a valid vanity (alpha) number such as
    /// "800 MICROSOFT". A valid vanity number will start with at least 3
    /// digits and will have three or more alpha characters. This does not do
    /// region-specific checks - to work out if this number is actually valid
    /// for a region, it should be parsed and methods such as
    /// [`Self::is_possible_number`] and [`Self::is_valid_number`] should be
    /// used.
    pub fn is_alpha_number(&self, number: &str) -> bool {
        if !self.is_viable_phone_number(number) {
            // Number is too short, or doesn't match the basic phone number pattern.
            return false;
        }
        let (stripped_number, _) = self.maybe_strip_extension(number);
        self.reg_exps
            .valid_alpha_phone_pattern
            .is_match(stripped_number)
    }

    /// Splits a trailing extension off `phone_number`. The extension is only
    /// taken when the text in front of it is still a viable phone number.
    pub(crate) fn maybe_strip_extension<'b>(&self, phone_number: &'b str) -> (&'b str, Option<&'b str>) {
        let Some(captures) = self.reg_exps.extn_pattern.captures(phone_number) else {
            return (phone_number, None);
        };
        let Some(full_match) = captures.get(0) else {
            return (phone_number, None);
        };
        // If we find a potential extension, and the number preceding this is a
        // viable number, we assume it is an extension.
        let number_before_extension = &phone_number[..full_match.start()];
        if !self.is_viable_phone_number(number_before_extension) {
            return (phone_number, None);
        }
        // The numbers are captured into groups in the regular expression.
        let extension = captures
            .iter()
            .skip(1)
            .flatten()
            .map(|group| group.as_str())
            .next();
        match extension {
            Some(extension) => (number_before_extension, Some(extension)),
            None => (phone_number, None),
        }
    }

    /// Parses a string and returns it as a phone number.
    ///
    /// `default_region` is the region the number is assumed to be dialled
    /// from; it only matters for numbers written without an international
    /// prefix. Pass `"ZZ"` when only international numbers are expected.
    /// Letters of vanity numbers are converted to digits, and an extension
    /// written after the number is kept.
    pub fn parse(&self, number_to_parse: &str, default_region: &str) -> Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, Some(default_region), false, true)
            .map_err(ParseErrorInternal::into_public)
    }

    /// Same as [`Self::parse`], but also records the raw input, the source
    /// of the country calling code and any domestic carrier code that was
    /// dialled. This is needed by [`Self::format_in_original_format`].
    pub fn parse_and_keep_raw_input(
        &self,
        number_to_parse: &str,
        default_region: &str,
    ) -> Result<PhoneNumber, ParseError> {
        self.parse_helper(number_to_parse, Some(default_region), true, true)
            .map_err(ParseErrorInternal::into_public)
    }

    /// Parses a string into a phone number. `check_region` decides whether
    /// numbers without a calling code are refused when no valid default
    /// region was given; number matching turns it off to compare numbers
    /// written without any calling code.
    pub(crate) fn parse_helper(
        &self,
        number_to_parse: &str,
        default_region: Option<&str>,
        keep_raw_input: bool,
        check_region: bool,
    ) -> Result<PhoneNumber, ParseErrorInternal> {
        if number_to_parse.chars().count() > MAX_INPUT_STRING_LENGTH {
            trace!("The string supplied was too long to parse.");
            return Err(ParseError::TooLongNsn.into());
        }

        let national_number = self.build_national_number_for_parsing(number_to_parse)?;

        if !self.is_viable_phone_number(&national_number) {
            trace!("The string supplied did not seem to be a phone number '{number_to_parse}'.");
            return Err(NotANumberError::NotMatchedValidNumberPattern.into());
        }

        // Check the region supplied is valid, or that the extracted number starts
        // with some sort of + sign so the number's region can be determined.
        if check_region && !self.check_region_for_parsing(&national_number, default_region) {
            trace!("Missing or invalid default country.");
            return Err(ParseError::InvalidCountryCode.into());
        }

        let mut phone_number = PhoneNumber::new();
        if keep_raw_input {
            phone_number.set_raw_input(number_to_parse.to_owned());
        }
        // Attempt to parse extension first, since it doesn't require
        // region-specific data and we want to have the non-normalised number here.
        let (national_number, extension) = self.maybe_strip_extension(&national_number);
        if let Some(extension) = extension {
            phone_number.set_extension(extension.to_owned());
        }

        let default_region_metadata = default_region.and_then(|region| self.get_metadata_for_region(region));
        let mut region_metadata = default_region_metadata;
        // Check to see if the number is given in international format so we know
        // whether this number is from the default region or not.
        let extraction = match self.maybe_extract_country_code(national_number, region_metadata) {
            Ok(extraction) => extraction,
            Err(ParseErrorInternal::FailedToParse(ParseError::InvalidCountryCode)) => {
                let Some(number_without_plus) = self
                    .reg_exps
                    .plus_chars_pattern
                    .consume_start(national_number)
                else {
                    return Err(ParseError::InvalidCountryCode.into());
                };
                // Strip the plus-char, and try again.
                let extraction =
                    self.maybe_extract_country_code(number_without_plus, region_metadata)?;
                if extraction.country_code == 0 {
                    trace!("Could not interpret numbers after plus-sign.");
                    return Err(ParseError::InvalidCountryCode.into());
                }
                extraction
            }
            Err(err) => return Err(err),
        };
        if keep_raw_input {
            if let Some(country_code_source) = extraction.country_code_source {
                phone_number.set_country_code_source(country_code_source);
            }
        }

        let mut country_code = extraction.country_code;
        let mut normalized_national_number = extraction.national_number;
        if country_code != 0 {
            let phone_number_region = self.get_region_code_for_country_code(country_code);
            if Some(phone_number_region) != default_region {
                // Metadata cannot be None because the country calling code is valid.
                region_metadata =
                    self.get_metadata_for_region_or_calling_code(country_code, phone_number_region);
            }
        } else {
            // If no extracted country calling code, use the region supplied instead.
            // The national number is just the normalized version of the number we
            // were given to parse.
            normalized_national_number = self.normalize(national_number);
            if let Some(metadata) = default_region_metadata {
                country_code = metadata.country_code();
            } else if keep_raw_input {
                phone_number.clear_country_code_source();
            }
        }
        phone_number.set_country_code(country_code);

        if normalized_national_number.len() < MIN_LENGTH_FOR_NSN {
            trace!("The string supplied is too short to be a phone number.");
            return Err(ParseError::TooShortNsn.into());
        }

        if let Some(metadata) = region_metadata {
            let stripping =
                self.maybe_strip_national_prefix_and_carrier_code(metadata, &normalized_national_number)?;
            // We require that the NSN remaining after stripping the national prefix
            // and carrier code be of a possible length for the region. Otherwise, we
            // don't do the stripping, since the original number could be a valid short
            // number.
            let validation_result = test_number_length_against_pattern(
                &self.reg_exps.regexp_cache,
                metadata.general_desc.possible_number_pattern(),
                &stripping.national_number,
            )?;
            if validation_result != Err(ValidationError::TooShort) {
                let carrier_code = stripping.carrier_code.map(str::to_owned);
                let stripped_number = stripping.national_number.into_owned();
                normalized_national_number = stripped_number;
                if keep_raw_input {
                    if let Some(carrier_code) = carrier_code.filter(|code| !code.is_empty()) {
                        phone_number.set_preferred_domestic_carrier_code(carrier_code);
                    }
                }
            }
        }

        let length_of_national_number = normalized_national_number.len();
        if length_of_national_number < MIN_LENGTH_FOR_NSN {
            trace!("The string supplied is too short to be a phone number.");
            return Err(ParseError::TooShortNsn.into());
        }
        if length_of_national_number > MAX_LENGTH_FOR_NSN {
            trace!("The string supplied is too long to be a phone number.");
            return Err(ParseError::TooLongNsn.into());
        }
        Self::set_italian_leading_zeros(&normalized_national_number, &mut phone_number);
        let national_number_value = normalized_national_number
            .parse::<u64>()
            .map_err(NotANumberError::FailedToParseNumberAsInt)?;
        phone_number.set_national_number(national_number_value);
        Ok(phone_number)
    }

    /// Converts `number_to_parse` to a form that we can parse and returns it
    /// if it is written in RFC3966; otherwise extracts a possible number out
    /// of it and returns it.
    fn build_national_number_for_parsing(
        &self,
        number_to_parse: &str,
    ) -> Result<String, NotANumberError> {
        let index_of_phone_context = number_to_parse.find(RFC3966_PHONE_CONTEXT);
        let phone_context = Self::extract_phone_context(number_to_parse, index_of_phone_context);
        if !self.is_phone_context_valid(phone_context) {
            trace!("The phone-context value '{phone_context:?}' is invalid.");
            return Err(NotANumberError::InvalidPhoneContext);
        }

        let mut national_number = String::new();
        if let (Some(phone_context), Some(index_of_phone_context)) =
            (phone_context, index_of_phone_context)
        {
            // If the phone context contains a phone number prefix, we need to capture
            // it, whereas domains will be ignored.
            if phone_context.starts_with(PLUS_SIGN) {
                // Additional parameters might follow the phone context. If so, we will
                // remove them here because the parameters after phone context are not
                // important for parsing the phone number.
                national_number.push_str(phone_context);
            }
            // Now append everything between the "tel:" prefix and the phone-context.
            // This should include the national number, an optional extension or
            // isdn-subaddress component. Note we also handle the case when "tel:" is
            // missing, as we have seen in some of the phone number inputs. In that
            // case, we append everything from the beginning.
            let index_of_national_number = number_to_parse
                .find(RFC3966_PREFIX)
                .map(|index| index + RFC3966_PREFIX.len())
                .unwrap_or(0);
            if index_of_national_number <= index_of_phone_context {
                national_number
                    .push_str(&number_to_parse[index_of_national_number..index_of_phone_context]);
            }
        } else {
            // Extract a possible number from the string passed in (this strips leading
            // characters that could not be the start of a phone number.)
            national_number.push_str(self.extract_possible_number(number_to_parse)?);
        }

        // Delete the isdn-subaddress and everything after it if it is present. Note
        // extension won't appear at the same time with isdn-subaddress according to
        // paragraph 5.3 of the RFC3966 spec.
        if let Some(index_of_isdn) = national_number.find(RFC3966_ISDN_SUBADDRESS) {
            if index_of_isdn > 0 {
                national_number.truncate(index_of_isdn);
            }
        }
        // If both phone context and isdn-subaddress are absent but other parameters
        // are present, the parameters are left in national_number. This is because
        // we are concerned about deleting content from a potential number string
        // when there is no strong evidence that the number is actually written in
        // RFC3966.
        Ok(national_number)
    }

    /// Returns the value of the phone-context parameter, `Some("")` when the
    /// parameter is present without a value and `None` when it is absent.
    fn extract_phone_context(
        number_to_extract_from: &str,
        index_of_phone_context: Option<usize>,
    ) -> Option<&str> {
        let index_of_phone_context = index_of_phone_context?;
        let phone_context_start = index_of_phone_context + RFC3966_PHONE_CONTEXT.len();
        // If phone-context parameter is empty
        if phone_context_start >= number_to_extract_from.len() {
            return Some("");
        }
        let rest = &number_to_extract_from[phone_context_start..];
        // If phone-context is not the last parameter
        match rest.find(';') {
            Some(phone_context_end) => Some(&rest[..phone_context_end]),
            None => Some(rest),
        }
    }

    /// A phone context is either a global number (`+` and digits with visual
    /// separators) or a domain name.
    fn is_phone_context_valid(&self, phone_context: Option<&str>) -> bool {
        let Some(phone_context) = phone_context else {
            return true;
        };
        if phone_context.is_empty() {
            return false;
        }
        // Does phone-context value match pattern of global-number-digits or
        // domainname.
        self.reg_exps
            .rfc3966_global_number_digits_pattern
            .is_match(phone_context)
            || self
                .reg_exps
                .rfc3966_domainname_pattern
                .is_match(phone_context)
    }

    /// Checks to see that the region code used is valid, or if it is not valid,
    /// that the number to parse starts with a + symbol so that we can attempt to
    /// infer the region from the number.
    fn check_region_for_parsing(&self, number_to_parse: &str, default_region: Option<&str>) -> bool {
        let has_valid_region =
            default_region.is_some_and(|region| self.is_valid_region_code(region));
        // If the number is empty, we can't infer the region.
        has_valid_region
            || (!number_to_parse.is_empty()
                && self
                    .reg_exps
                    .plus_chars_pattern
                    .matches_start(number_to_parse))
    }

    /// Tries to extract a country calling code from a number.
    ///
    /// The calling code is recognised after a plus sign or after the
    /// international prefix of the default region. A number written with the
    /// calling code of the default region but without any prefix is also
    /// recognised when the stripped reading fits the region better. When
    /// nothing is found the extraction carries country code 0 and no national
    /// number.
    pub(crate) fn maybe_extract_country_code(
        &self,
        number: &str,
        default_region_metadata: Option<&PhoneMetadata>,
    ) -> Result<CountryCodeExtraction, ParseErrorInternal> {
        if number.is_empty() {
            return Ok(CountryCodeExtraction::default());
        }
        let possible_country_idd_prefix =
            default_region_metadata.map(|metadata| metadata.international_prefix());
        let PhoneNumberWithCountryCodeSource {
            phone_number: full_number,
            country_code_source,
        } = self.maybe_strip_international_prefix_and_normalize(number, possible_country_idd_prefix)?;

        if country_code_source != CountryCodeSource::FromDefaultCountry {
            if full_number.len() <= MIN_LENGTH_FOR_NSN {
                trace!("Phone number had an IDD, but after this was not long enough to be a viable phone number.");
                return Err(ParseError::TooShortAfterIdd.into());
            }
            let Some((country_code, national_number)) = self.extract_country_code(&full_number)
            else {
                // If this fails, they must be using a strange country calling code that
                // we don't recognize, or that doesn't exist.
                trace!("Country calling code supplied was not recognised.");
                return Err(ParseError::InvalidCountryCode.into());
            };
            return Ok(CountryCodeExtraction {
                country_code,
                national_number: national_number.to_owned(),
                country_code_source: Some(country_code_source),
            });
        }

        if let Some(metadata) = default_region_metadata {
            // Check to see if the number starts with the country calling code for the
            // default region. If so, we remove the country calling code, and do some
            // checks on the validity of the number before and after.
            let default_country_code = metadata.country_code();
            let mut buf = itoa::Buffer::new();
            let default_country_code_str = buf.format(default_country_code);
            if let Some(potential_national_number) = full_number.strip_prefix(default_country_code_str) {
                let general_desc = &metadata.general_desc;
                let valid_number_pattern = general_desc.national_number_pattern();
                let stripping = self
                    .maybe_strip_national_prefix_and_carrier_code(metadata, potential_national_number)?;
                let potential_national_number = stripping.national_number;
                let cache = &self.reg_exps.regexp_cache;
                // If the number was not valid before but is valid now, or if it was too
                // long before, we consider the number with the country calling code
                // stripped to be a better result and keep that instead.
                if (!cache.full_match(valid_number_pattern, &full_number)?
                    && cache.full_match(valid_number_pattern, &potential_national_number)?)
                    || test_number_length_against_pattern(
                        cache,
                        general_desc.possible_number_pattern(),
                        &full_number,
                    )? == Err(ValidationError::TooLong)
                {
                    trace!("Number '{full_number}' starts with the calling code of its region, stripping it.");
                    return Ok(CountryCodeExtraction {
                        country_code: default_country_code,
                        national_number: potential_national_number.into_owned(),
                        country_code_source: Some(CountryCodeSource::FromNumberWithoutPlusSign),
                    });
                }
            }
        }
        // No country calling code present.
        Ok(CountryCodeExtraction {
            country_code: 0,
            national_number: String::new(),
            country_code_source: Some(country_code_source),
        })
    }

    /// Strips the IDD from the start of the number if present. Helper function
    /// used by [`Self::maybe_extract_country_code`].
    ///
    /// The returned number is normalized. Its source tells whether a plus sign,
    /// the IDD or nothing at all was found in front of it.
    pub(crate) fn maybe_strip_international_prefix_and_normalize<'b>(
        &self,
        phone_number: &'b str,
        possible_idd_prefix: Option<&str>,
    ) -> RegexResult<PhoneNumberWithCountryCodeSource<'b>> {
        if phone_number.is_empty() {
            return Ok(PhoneNumberWithCountryCodeSource::new(
                Cow::Borrowed(phone_number),
                CountryCodeSource::FromDefaultCountry,
            ));
        }
        // Check to see if the number begins with one or more plus signs.
        if let Some(rest) = self.reg_exps.plus_chars_pattern.consume_start(phone_number) {
            // Can now normalize the rest of the number since we've consumed the "+"
            // sign at the start.
            return Ok(PhoneNumberWithCountryCodeSource::new(
                Cow::Owned(self.normalize(rest)),
                CountryCodeSource::FromNumberWithPlusSign,
            ));
        }
        // Attempt to parse the first digits as an international prefix.
        let normalized_number = self.normalize(phone_number);
        if let Some(idd_prefix) = possible_idd_prefix.filter(|prefix| !prefix.is_empty()) {
            if let Some(rest) = self.parse_prefix_as_idd(idd_prefix, &normalized_number)? {
                return Ok(PhoneNumberWithCountryCodeSource::new(
                    Cow::Owned(rest.to_owned()),
                    CountryCodeSource::FromNumberWithIdd,
                ));
            }
        }
        Ok(PhoneNumberWithCountryCodeSource::new(
            Cow::Owned(normalized_number),
            CountryCodeSource::FromDefaultCountry,
        ))
    }

    /// Strips the IDD from the start of the number if present, returning what
    /// follows it. A match is refused when the next digit is 0, since country
    /// calling codes cannot begin with 0.
    fn parse_prefix_as_idd<'b>(&self, idd_pattern: &str, number: &'b str) -> RegexResult<Option<&'b str>> {
        let idd_regex = self.reg_exps.regexp_cache.get_prefix_regex(idd_pattern)?;
        let Some(idd_match) = idd_regex.find(number) else {
            return Ok(None);
        };
        let rest = &number[idd_match.end()..];
        // Only strip this if the first digit after the match is not a 0, since
        // country calling codes cannot begin with 0.
        if let Some(digit) = self.reg_exps.capturing_digit_pattern.captures(rest) {
            let normalized_group = normalize_digits_only(digit.get(1).map_or("", |m| m.as_str()));
            if normalized_group == "0" {
                return Ok(None);
            }
        }
        Ok(Some(rest))
    }

    /// Extracts the country calling code from the beginning of a normalized
    /// number, returning it with the rest of the number. Calling codes are 1
    /// to 3 digits long and never start with 0; the shortest known one wins.
    pub(crate) fn extract_country_code<'b>(&self, full_number: &'b str) -> Option<(i32, &'b str)> {
        if full_number.is_empty() || full_number.starts_with('0') {
            // Country codes do not begin with a '0'.
            return None;
        }
        for i in 1..=MAX_LENGTH_COUNTRY_CODE.min(full_number.len()) {
            let Some(prefix) = full_number.get(..i) else {
                break;
            };
            let Ok(potential_country_code) = prefix.parse::<i32>() else {
                break;
            };
            if self.has_valid_country_calling_code(potential_country_code) {
                return Some((potential_country_code, &full_number[i..]));
            }
        }
        None
    }

    /// Strips any national prefix (such as 0, 1) present in the number
    /// provided, applying the region's transform rule when there is one.
    ///
    /// A number that fully matched the general national pattern is left alone
    /// when stripping would break that match. The carrier code captured by
    /// the national prefix pattern, if any, is returned alongside.
    pub(crate) fn maybe_strip_national_prefix_and_carrier_code<'b>(
        &self,
        metadata: &PhoneMetadata,
        number: &'b str,
    ) -> RegexResult<NationalPrefixStripping<'b>> {
        let unchanged = NationalPrefixStripping {
            national_number: Cow::Borrowed(number),
            carrier_code: None,
        };
        let possible_national_prefix = metadata.national_prefix_for_parsing();
        if number.is_empty() || possible_national_prefix.is_empty() {
            // Early return for numbers of zero length.
            return Ok(unchanged);
        }
        let cache = &self.reg_exps.regexp_cache;
        // Attempt to parse the first digits as a national prefix.
        let prefix_regex = cache.get_prefix_regex(possible_national_prefix)?;
        let Some(captures) = prefix_regex.captures(number) else {
            return Ok(unchanged);
        };
        let prefix_end = captures.get(0).map_or(0, |m| m.end());
        let national_number_rule = metadata.general_desc.national_number_pattern();
        // Check if the original number is viable.
        let is_viable_original_number = cache.full_match(national_number_rule, number)?;
        // prefix_regex.captures_len() also counts the implicit group of the whole
        // match, so the last explicit group has index num_of_groups.
        let num_of_groups = prefix_regex.captures_len() - 1;
        let last_group = captures.get(num_of_groups);
        let transform_rule = metadata.national_prefix_transform_rule();
        if transform_rule.is_empty() || last_group.is_none_or(|m| m.as_str().is_empty()) {
            let stripped_number = &number[prefix_end..];
            // If the original number was viable, and the resultant number is not,
            // we return.
            if is_viable_original_number && !cache.full_match(national_number_rule, stripped_number)? {
                return Ok(unchanged);
            }
            let carrier_code = if num_of_groups > 0 {
                captures.get(1).map(|m| m.as_str())
            } else {
                None
            };
            return Ok(NationalPrefixStripping {
                national_number: Cow::Borrowed(stripped_number),
                carrier_code,
            });
        }
        // Check that the resultant number is still viable. If not, return. Check
        // this by copying the number and making the transformation on the copy
        // first.
        let template = to_replacement_template(&self.reg_exps.group_reference_pattern, transform_rule);
        let mut transformed_number = String::with_capacity(number.len());
        captures.expand(&template, &mut transformed_number);
        transformed_number.push_str(&number[prefix_end..]);
        if is_viable_original_number && !cache.full_match(national_number_rule, &transformed_number)? {
            return Ok(unchanged);
        }
        let carrier_code = if num_of_groups > 1 {
            captures.get(1).map(|m| m.as_str())
        } else {
            None
        };
        Ok(NationalPrefixStripping {
            national_number: Cow::Owned(transformed_number),
            carrier_code,
        })
    }

    /// Records the leading zeros of a national number that integer storage
    /// would drop. A number made of zeros only keeps its last zero in the
    /// integer part.
    pub(crate) fn set_italian_leading_zeros(national_number: &str, phone_number: &mut PhoneNumber) {
        let bytes = national_number.as_bytes();
        if bytes.len() > 1 && bytes[0] == b'0' {
            phone_number.set_italian_leading_zero(true);
            let mut number_of_leading_zeros = 1;
            // Note that if the national number is all "0"s, the last "0" is not
            // counted as a leading zero.
            while number_of_leading_zeros < bytes.len() - 1 && bytes[number_of_leading_zeros] == b'0' {
                number_of_leading_zeros += 1;
            }
            if number_of_leading_zeros != 1 {
                phone_number.set_number_of_leading_zeros(number_of_leading_zeros as i32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::phonenumber::PhoneNumber;

    use super::PhoneNumberUtil;

    #[test]
    fn italian_leading_zeros() {
        let mut number = PhoneNumber::new();
        PhoneNumberUtil::set_italian_leading_zeros("0212345678", &mut number);
        assert!(number.italian_leading_zero());
        assert!(!number.has_number_of_leading_zeros());

        let mut number = PhoneNumber::new();
        PhoneNumberUtil::set_italian_leading_zeros("00012", &mut number);
        assert_eq!(3, number.number_of_leading_zeros());

        let mut number = PhoneNumber::new();
        PhoneNumberUtil::set_italian_leading_zeros("000", &mut number);
        assert_eq!(2, number.number_of_leading_zeros());

        let mut number = PhoneNumber::new();
        PhoneNumberUtil::set_italian_leading_zeros("0", &mut number);
        assert!(!number.has_italian_leading_zero());
    }

    #[test]
    fn phone_context_extraction() {
        assert_eq!(
            None,
            PhoneNumberUtil::extract_phone_context("tel:1234", None)
        );
        let number = "tel:1234;phone-context=+64;isub=12";
        let index = number.find(";phone-context=");
        assert_eq!(Some("+64"), PhoneNumberUtil::extract_phone_context(number, index));
        let number = "tel:1234;phone-context=";
        let index = number.find(";phone-context=");
        assert_eq!(Some(""), PhoneNumberUtil::extract_phone_context(number, index));
    }
}
