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
    collections::{HashMap, HashSet, VecDeque},
};

use log::{trace, warn};
use regex::NoExpand;

use super::{
    PhoneNumberFormat, PhoneNumberType,
    errors::{
        GetExampleNumberError, GetExampleNumberErrorInternal, MetadataError, ValidationError,
        ValidationErrorInternal,
    },
    helper_constants::{
        COLOMBIA_MOBILE_TO_FIXED_LINE_PREFIX, DEFAULT_EXTN_PREFIX, FG_STRING, MAX_LENGTH_FOR_NSN,
        MIN_LENGTH_FOR_NSN, NANPA_COUNTRY_CODE, NP_STRING, PLUS_SIGN,
        REGION_CODE_FOR_NON_GEO_ENTITY, RFC3966_EXTN_PREFIX,
    },
    helper_functions::{
        self, get_number_desc_by_type, get_supported_types_for_metadata, normalize_digits_only,
        normalize_helper, prefix_number_with_country_calling_code,
        test_number_length_against_pattern, to_replacement_template,
    },
    phone_number_regexps_and_mappings::PhoneNumberRegExpsAndMappings,
};
use crate::{
    asyoutypeformatter::AsYouTypeFormatter,
    i18n::RegionCode,
    interfaces::MatcherApi,
    macros::owned_from_cow_or,
    phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc},
    phonenumber::{CountryCodeSource, PhoneNumber},
    regex_based_matcher::RegexBasedMatcher,
    regex_util::RegexConsume,
    regexp_cache::InvalidRegexError,
};

/// Result of operations that only fail when a metadata pattern does not
/// compile. Metadata is checked when the engine is built, so callers may
/// treat the error as unreachable.
pub type RegexResult<T> = std::result::Result<T, InvalidRegexError>;

/// Parses, formats and validates phone numbers against a metadata
/// collection.
///
/// The engine is immutable once built and can be shared between threads.
pub struct PhoneNumberUtil {
    /// An API for validation checking.
    pub(crate) matcher_api: Box<dyn MatcherApi>,

    /// Helper class holding useful regular expressions and character mappings.
    pub(crate) reg_exps: PhoneNumberRegExpsAndMappings,

    /// A mapping from a country calling code to the region codes which denote
    /// the regions represented by that country calling code. Note regions under
    /// NANPA share the country calling code 1 and Russia and Kazakhstan share the
    /// country calling code 7. The main region of a code comes first. This is
    /// implemented as a sorted vector to achieve better performance.
    pub(crate) country_calling_code_to_region_code_map: Vec<(i32, Vec<String>)>,

    /// The set of regions that share country calling code 1.
    pub(crate) nanpa_regions: HashSet<String>,

    /// A mapping from a region code to a PhoneMetadata for that region.
    pub(crate) region_to_metadata_map: HashMap<String, PhoneMetadata>,

    /// A mapping from a country calling code for a non-geographical entity to the
    /// PhoneMetadata for that country calling code. Examples of the country
    /// calling codes include 800 (International Toll Free Service) and 808
    /// (International Shared Cost Service).
    pub(crate) country_code_to_non_geographical_metadata_map: HashMap<i32, PhoneMetadata>,
}

/// Every pattern of a metadata record, so they can be compiled up front.
fn metadata_patterns(metadata: &PhoneMetadata) -> Vec<&str> {
    let descs: [&PhoneNumberDesc; 12] = [
        &metadata.general_desc,
        &metadata.fixed_line,
        &metadata.mobile,
        &metadata.toll_free,
        &metadata.premium_rate,
        &metadata.shared_cost,
        &metadata.personal_number,
        &metadata.voip,
        &metadata.pager,
        &metadata.uan,
        &metadata.voicemail,
        &metadata.no_international_dialling,
    ];
    let mut patterns: Vec<&str> = descs
        .into_iter()
        .flat_map(|desc| {
            [
                desc.national_number_pattern.as_deref(),
                desc.possible_number_pattern.as_deref(),
            ]
        })
        .flatten()
        .collect();
    patterns.extend(
        [
            metadata.international_prefix.as_deref(),
            metadata.national_prefix_for_parsing.as_deref(),
            metadata.leading_digits.as_deref(),
        ]
        .into_iter()
        .flatten(),
    );
    for format in metadata
        .number_format
        .iter()
        .chain(metadata.intl_number_format.iter())
    {
        patterns.push(&format.pattern);
        patterns.extend(format.leading_digits_pattern.iter().map(String::as_str));
    }
    patterns
}

impl PhoneNumberUtil {
    /// Builds an engine from a metadata collection.
    ///
    /// Every record is finalized and every pattern it carries is compiled, so
    /// broken metadata is reported here rather than while handling numbers.
    pub fn new_for_metadata(
        metadata_collection: PhoneMetadataCollection,
    ) -> Result<Self, MetadataError> {
        let reg_exps = PhoneNumberRegExpsAndMappings::new().map_err(MetadataError::BuiltInRegex)?;
        let mut instance = Self {
            matcher_api: Box::new(RegexBasedMatcher::new(reg_exps.regexp_cache.clone())),
            reg_exps,
            country_calling_code_to_region_code_map: Default::default(),
            nanpa_regions: Default::default(),
            region_to_metadata_map: Default::default(),
            country_code_to_non_geographical_metadata_map: Default::default(),
        };
        // Storing data in a temporary map to make it easier to find other regions
        // that share a country calling code when inserting data.
        let mut country_calling_code_to_region_map = HashMap::<i32, VecDeque<String>>::new();
        for mut metadata in metadata_collection.metadata {
            let region_code = metadata.id().to_owned();
            if RegionCode::get_unknown() == region_code {
                continue;
            }
            if metadata.country_code() <= 0 {
                return Err(MetadataError::MissingCountryCode(region_code));
            }
            metadata.finalize();
            for pattern in metadata_patterns(&metadata) {
                instance
                    .reg_exps
                    .regexp_cache
                    .warm_up(pattern)
                    .map_err(|source| MetadataError::InvalidRegex {
                        region: region_code.clone(),
                        source,
                    })?;
            }

            let main_country_code = metadata.main_country_for_code();
            let country_calling_code = metadata.country_code();
            if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
                instance
                    .country_code_to_non_geographical_metadata_map
                    .insert(country_calling_code, metadata);
            } else {
                instance
                    .region_to_metadata_map
                    .insert(region_code.clone(), metadata);
            }

            let regions = country_calling_code_to_region_map
                .entry(country_calling_code)
                .or_default();
            if main_country_code {
                regions.push_front(region_code.clone());
            } else {
                regions.push_back(region_code.clone());
            }
            if country_calling_code == NANPA_COUNTRY_CODE {
                instance.nanpa_regions.insert(region_code);
            }
        }

        instance.country_calling_code_to_region_code_map.extend(
            country_calling_code_to_region_map
                .into_iter()
                .map(|(k, v)| (k, Vec::from(v))),
        );
        // Sort all the pairs in ascending order according to country calling code.
        instance
            .country_calling_code_to_region_code_map
            .sort_by_key(|(a, _)| *a);
        trace!(
            "Loaded metadata for {} regions and {} non-geographical calling codes",
            instance.region_to_metadata_map.len(),
            instance.country_code_to_non_geographical_metadata_map.len()
        );
        Ok(instance)
    }

    /// Reads a json metadata collection and builds an engine from it.
    pub fn new_for_json(json: &str) -> Result<Self, MetadataError> {
        Self::new_for_metadata(PhoneMetadataCollection::from_json_str(json)?)
    }

    /// Starts an as you type formatting session for numbers dialled in
    /// `region_code`.
    pub fn get_as_you_type_formatter(&self, region_code: &str) -> AsYouTypeFormatter<'_> {
        AsYouTypeFormatter::new(self, region_code)
    }

    pub fn get_supported_regions(&self) -> impl Iterator<Item = &str> {
        self.region_to_metadata_map.keys().map(String::as_str)
    }

    pub fn get_supported_global_network_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_code_to_non_geographical_metadata_map
            .keys()
            .copied()
    }

    pub fn get_supported_calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.country_calling_code_to_region_code_map
            .iter()
            .map(|(code, _)| *code)
    }

    pub fn get_supported_types_for_region(
        &self,
        region_code: &str,
    ) -> Option<HashSet<PhoneNumberType>> {
        let Some(metadata) = self.region_to_metadata_map.get(region_code) else {
            warn!("Invalid or unknown region code provided: {}", region_code);
            return None;
        };
        Some(get_supported_types_for_metadata(metadata))
    }

    pub fn get_supported_types_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Option<HashSet<PhoneNumberType>> {
        let Some(metadata) = self
            .country_code_to_non_geographical_metadata_map
            .get(&country_calling_code)
        else {
            warn!(
                "Unknown country calling code for a non-geographical entity provided: {}",
                country_calling_code
            );
            return None;
        };
        Some(get_supported_types_for_metadata(metadata))
    }

    pub fn get_metadata_for_region(&self, region_code: &str) -> Option<&PhoneMetadata> {
        self.region_to_metadata_map.get(region_code)
    }

    pub fn get_metadata_for_non_geographical_region(
        &self,
        country_calling_code: i32,
    ) -> Option<&PhoneMetadata> {
        self.country_code_to_non_geographical_metadata_map
            .get(&country_calling_code)
    }

    pub(crate) fn get_metadata_for_region_or_calling_code(
        &self,
        country_calling_code: i32,
        region_code: &str,
    ) -> Option<&PhoneMetadata> {
        if REGION_CODE_FOR_NON_GEO_ENTITY == region_code {
            self.get_metadata_for_non_geographical_region(country_calling_code)
        } else {
            self.get_metadata_for_region(region_code)
        }
    }

    /// Checks if this is a region under the North American Numbering Plan
    /// Administration (NANPA).
    pub fn is_nanpa_country(&self, region_code: &str) -> bool {
        self.nanpa_regions.contains(region_code)
    }

    pub(crate) fn is_valid_region_code(&self, region_code: &str) -> bool {
        self.region_to_metadata_map.contains_key(region_code)
    }

    pub(crate) fn has_valid_country_calling_code(&self, country_calling_code: i32) -> bool {
        self.country_calling_code_to_region_code_map
            .binary_search_by_key(&country_calling_code, |(k, _)| *k)
            .is_ok()
    }

    /// Returns the country calling code of a region, or 0 for an unknown
    /// region.
    pub fn get_country_code_for_region(&self, region_code: &str) -> i32 {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return 0;
        };
        metadata.country_code()
    }

    /// Returns the region code that matches the specific country calling code. In
    /// the case of no region code being found, the unknown region code will be
    /// returned.
    pub fn get_region_code_for_country_code(&self, country_calling_code: i32) -> &str {
        self.get_region_codes_for_country_calling_code(country_calling_code)
            .first()
            .copied()
            .unwrap_or(RegionCode::get_unknown())
    }

    /// Returns the region codes that matches the specific country calling code,
    /// the main region first. Empty for unknown codes.
    pub fn get_region_codes_for_country_calling_code(&self, country_calling_code: i32) -> Vec<&str> {
        self.country_calling_code_to_region_code_map
            .binary_search_by_key(&country_calling_code, |(code, _)| *code)
            .map(|index| {
                self.country_calling_code_to_region_code_map[index]
                    .1
                    .iter()
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the national dialling prefix of a region, e.g. "0" for GB.
    /// With `strip_non_digits` the `~` (wait for dial tone) markers are
    /// removed. `None` for unknown regions and regions without a prefix.
    pub fn get_ndd_prefix_for_region(
        &self,
        region_code: &str,
        strip_non_digits: bool,
    ) -> Option<String> {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return None;
        };
        let national_prefix = metadata.national_prefix();
        if national_prefix.is_empty() {
            return None;
        }
        if strip_non_digits {
            Some(national_prefix.replace('~', ""))
        } else {
            Some(national_prefix.to_owned())
        }
    }

    /// Returns the mobile token of a calling code, the digit written before
    /// the area code of mobile numbers when dialled internationally.
    pub fn get_country_mobile_token(&self, country_calling_code: i32) -> Option<char> {
        self.reg_exps
            .mobile_token_mappings
            .get(&country_calling_code)
            .copied()
    }

    /// Returns the national significant number: the national number with its
    /// italian leading zeros restored.
    pub fn get_national_significant_number(phone_number: &PhoneNumber) -> String {
        let mut buf = itoa::Buffer::new();
        let national_number = buf.format(phone_number.national_number());

        // If leading zero(s) have been set, we prefix this now. Note this is not a
        // national prefix.
        if phone_number.italian_leading_zero() && phone_number.number_of_leading_zeros() > 0 {
            let zeros = "0".repeat(phone_number.number_of_leading_zeros() as usize);
            return fast_cat::concat_str!(&zeros, national_number);
        }
        national_number.to_owned()
    }

    pub fn normalize_diallable_chars_only(&self, phone_number: &str) -> String {
        normalize_helper(&self.reg_exps.diallable_char_mappings, true, phone_number)
    }

    // ------------------------------------------------------------------
    // Formatting
    // ------------------------------------------------------------------

    /// Formats a phone number in the specified format using default rules.
    ///
    /// Numbers with an unknown calling code come back as their national
    /// significant number. A number holding only a raw input (national number
    /// 0) is returned as that input.
    pub fn format<'b>(
        &self,
        phone_number: &'b PhoneNumber,
        number_format: PhoneNumberFormat,
    ) -> RegexResult<Cow<'b, str>> {
        if phone_number.national_number() == 0 {
            let raw_input = phone_number.raw_input();
            if !raw_input.is_empty() {
                // Unparseable numbers that kept their raw input just use that.
                // This is the only case where a number can be formatted as E164 without a
                // leading '+' symbol (but the original number wasn't parseable anyway).
                return Ok(Cow::Borrowed(raw_input));
            }
        }
        let country_calling_code = phone_number.country_code();
        let mut formatted_number = Self::get_national_significant_number(phone_number);

        if number_format == PhoneNumberFormat::E164 {
            // Early exit for E164 case (even if the country calling code is invalid)
            // since no formatting of the national number needs to be applied.
            // Extensions are not formatted.
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::E164,
                &mut formatted_number,
            );
            return Ok(Cow::Owned(formatted_number));
        }
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(Cow::Owned(formatted_number));
        }
        // Note here that all NANPA formatting rules are contained by US, so we use
        // that to format NANPA numbers. The same applies to Russian Fed regions -
        // rules are contained by Russia.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Ok(Cow::Owned(formatted_number));
        };

        formatted_number = owned_from_cow_or!(
            self.format_nsn(&formatted_number, metadata, number_format)?,
            formatted_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, metadata, number_format)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted_number,
        );
        Ok(Cow::Owned(formatted_number))
    }

    pub(crate) fn format_nsn<'b>(
        &self,
        phone_number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> RegexResult<Cow<'b, str>> {
        self.format_nsn_with_carrier(phone_number, metadata, number_format, "")
    }

    fn format_nsn_with_carrier<'b>(
        &self,
        number: &'b str,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> RegexResult<Cow<'b, str>> {
        // When the intl_number_formats exists, we use that to format national number
        // for the INTERNATIONAL format instead of using the number_formats.
        let available_formats = if metadata.intl_number_format.is_empty()
            || number_format == PhoneNumberFormat::National
        {
            &metadata.number_format
        } else {
            &metadata.intl_number_format
        };
        let formatting_pattern =
            self.choose_formatting_pattern_for_number(available_formats, number)?;
        if let Some(formatting_pattern) = formatting_pattern {
            self.format_nsn_using_pattern_with_carrier(
                number,
                formatting_pattern,
                number_format,
                carrier_code,
            )
        } else {
            Ok(Cow::Borrowed(number))
        }
    }

    pub(crate) fn choose_formatting_pattern_for_number<'b>(
        &self,
        available_formats: &'b [NumberFormat],
        national_number: &str,
    ) -> RegexResult<Option<&'b NumberFormat>> {
        for format in available_formats {
            // We always use the last leading_digits_pattern, as it is the most
            // detailed.
            if let Some(leading_digits) = format.leading_digits_pattern.last() {
                if !self
                    .reg_exps
                    .regexp_cache
                    .matches_start(leading_digits, national_number)?
                {
                    continue;
                }
            }
            if self
                .reg_exps
                .regexp_cache
                .full_match(format.pattern(), national_number)?
            {
                return Ok(Some(format));
            }
        }
        Ok(None)
    }

    // Note that carrier_code is optional - if an empty string, no carrier code
    // replacement will take place.
    fn format_nsn_using_pattern_with_carrier<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
        carrier_code: &str,
    ) -> RegexResult<Cow<'b, str>> {
        let group_reference = &self.reg_exps.group_reference_pattern;
        let mut number_format_rule = Cow::Borrowed(formatting_pattern.format());
        if number_format == PhoneNumberFormat::National
            && !carrier_code.is_empty()
            && !formatting_pattern
                .domestic_carrier_code_formatting_rule()
                .is_empty()
        {
            // Replace the $CC in the formatting rule with the desired carrier code.
            let carrier_code_formatting_rule = self.reg_exps.carrier_code_pattern.replace(
                formatting_pattern.domestic_carrier_code_formatting_rule(),
                NoExpand(carrier_code),
            );
            let rule = to_replacement_template(group_reference, &carrier_code_formatting_rule);
            number_format_rule = Cow::Owned(
                self.reg_exps
                    .first_group_capturing_pattern
                    .replace(&number_format_rule, &*rule)
                    .into_owned(),
            );
        } else {
            // Use the national prefix formatting rule instead.
            let national_prefix_formatting_rule =
                formatting_pattern.national_prefix_formatting_rule();
            if number_format == PhoneNumberFormat::National
                && !national_prefix_formatting_rule.is_empty()
            {
                // Apply the national_prefix_formatting_rule as the formatting_pattern
                // contains only information on how the national significant number
                // should be formatted at this point.
                let rule = to_replacement_template(group_reference, national_prefix_formatting_rule);
                number_format_rule = Cow::Owned(
                    self.reg_exps
                        .first_group_capturing_pattern
                        .replace(&number_format_rule, &*rule)
                        .into_owned(),
                );
            }
        }

        let pattern_to_match = self
            .reg_exps
            .regexp_cache
            .get_full_match_regex(formatting_pattern.pattern())?;
        let template = to_replacement_template(group_reference, &number_format_rule);
        let mut formatted_number = pattern_to_match.replace(national_number, &*template);

        if number_format == PhoneNumberFormat::RFC3966 {
            // First consume any leading punctuation, if any was present.
            if let Some(rest) = self
                .reg_exps
                .separator_pattern
                .consume_start(&formatted_number)
            {
                formatted_number = Cow::Owned(rest.to_owned());
            }
            // Then replace all separators with a "-".
            let replaced = self
                .reg_exps
                .separator_pattern
                .replace_all(&formatted_number, "-")
                .into_owned();
            formatted_number = Cow::Owned(replaced);
        }
        Ok(formatted_number)
    }

    /// Simple wrapper of format_nsn_using_pattern_with_carrier for the common
    /// case of no carrier code.
    pub(crate) fn format_nsn_using_pattern<'b>(
        &self,
        national_number: &'b str,
        formatting_pattern: &NumberFormat,
        number_format: PhoneNumberFormat,
    ) -> RegexResult<Cow<'b, str>> {
        self.format_nsn_using_pattern_with_carrier(
            national_number,
            formatting_pattern,
            number_format,
            "",
        )
    }

    // Returns the formatted extension of a phone number, if the phone number had an
    // extension specified else None.
    fn get_formatted_extension(
        phone_number: &PhoneNumber,
        metadata: &PhoneMetadata,
        number_format: PhoneNumberFormat,
    ) -> Option<String> {
        if phone_number.extension().is_empty() {
            return None;
        }

        let prefix = if number_format == PhoneNumberFormat::RFC3966 {
            RFC3966_EXTN_PREFIX
        } else if metadata.has_preferred_extn_prefix() {
            metadata.preferred_extn_prefix()
        } else {
            DEFAULT_EXTN_PREFIX
        };
        Some(fast_cat::concat_str!(prefix, phone_number.extension()))
    }

    /// Formats a phone number with caller supplied rules. `$NP` and `$FG` of
    /// the national prefix formatting rules are resolved against the number's
    /// region.
    pub fn format_by_pattern(
        &self,
        phone_number: &PhoneNumber,
        number_format: PhoneNumberFormat,
        user_defined_formats: &[NumberFormat],
    ) -> RegexResult<String> {
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(national_significant_number);
        }
        // Note get_region_code_for_country_code() is used because formatting information
        // for regions which share a country calling code is contained by only one
        // region for performance reasons. For example, for NANPA regions it will be
        // contained in the metadata for US.
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Ok(national_significant_number);
        };

        let formatting_pattern = self.choose_formatting_pattern_for_number(
            user_defined_formats,
            &national_significant_number,
        )?;

        let mut formatted_number = if let Some(formatting_pattern) = formatting_pattern {
            // Before we do a replacement of the national prefix pattern $NP with the
            // national prefix, we need to copy the rule so that subsequent replacements
            // for different numbers have the appropriate national prefix.
            let mut num_format_copy = formatting_pattern.clone();

            let national_prefix_formatting_rule =
                formatting_pattern.national_prefix_formatting_rule();
            if !national_prefix_formatting_rule.is_empty() {
                let national_prefix = metadata.national_prefix();
                if !national_prefix.is_empty() {
                    // Replace $NP with national prefix and $FG with the first group ($1).
                    let rule = national_prefix_formatting_rule
                        .replace(NP_STRING, national_prefix)
                        .replace(FG_STRING, "$1");
                    num_format_copy.set_national_prefix_formatting_rule(rule);
                } else {
                    // We don't want to have a rule for how to format the national prefix if
                    // there isn't one.
                    num_format_copy.clear_national_prefix_formatting_rule();
                }
            }
            self.format_nsn_using_pattern(
                &national_significant_number,
                &num_format_copy,
                number_format,
            )?
            .into_owned()
        } else {
            national_significant_number
        };
        if let Some(extension) =
            Self::get_formatted_extension(phone_number, metadata, number_format)
        {
            formatted_number.push_str(&extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            number_format,
            &mut formatted_number,
        );
        Ok(formatted_number)
    }

    /// Formats a number in national format for dialing using the carrier as
    /// specified in `carrier_code`. The carrier code is always used regardless
    /// of whether the number already has a preferred domestic carrier code
    /// stored. An empty carrier code formats like the plain national format.
    pub fn format_national_number_with_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        carrier_code: &str,
    ) -> RegexResult<String> {
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(national_significant_number);
        }
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Ok(national_significant_number);
        };

        let mut formatted_number = owned_from_cow_or!(
            self.format_nsn_with_carrier(
                &national_significant_number,
                metadata,
                PhoneNumberFormat::National,
                carrier_code,
            )?,
            national_significant_number
        );
        if let Some(formatted_extension) =
            Self::get_formatted_extension(phone_number, metadata, PhoneNumberFormat::National)
        {
            formatted_number.push_str(&formatted_extension);
        }
        prefix_number_with_country_calling_code(
            country_calling_code,
            PhoneNumberFormat::National,
            &mut formatted_number,
        );
        Ok(formatted_number)
    }

    /// Formats a number in national format for dialing using the preferred
    /// domestic carrier code of the number, or `fallback_carrier_code` when
    /// none is stored.
    pub fn format_national_number_with_preferred_carrier_code(
        &self,
        phone_number: &PhoneNumber,
        fallback_carrier_code: &str,
    ) -> RegexResult<String> {
        // Historically, we set this to an empty string when parsing with raw
        // input if none was found in the input string. However, this doesn't
        // result in a number we can dial. For this reason, we treat the empty
        // string the same as if it isn't set at all.
        let carrier_code = if !phone_number.preferred_domestic_carrier_code().is_empty() {
            phone_number.preferred_domestic_carrier_code()
        } else {
            fallback_carrier_code
        };
        self.format_national_number_with_carrier_code(phone_number, carrier_code)
    }

    /// Returns a number formatted in such a way that it can be dialed from a
    /// mobile phone in a specific region. If the number cannot be reached from
    /// the region (e.g. some countries block toll-free numbers from being
    /// called outside of the country), the method returns an empty string.
    pub fn format_number_for_mobile_dialing<'b>(
        &self,
        phone_number: &'b PhoneNumber,
        region_calling_from: &str,
        with_formatting: bool,
    ) -> RegexResult<Cow<'b, str>> {
        let country_calling_code = phone_number.country_code();
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(Cow::Borrowed(phone_number.raw_input()));
        }

        let mut formatted_number = String::new();
        // Clear the extension, as that part cannot normally be dialed together with
        // the main number.
        let mut number_no_extension = phone_number.clone();
        number_no_extension.clear_extension();
        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let number_type = self.get_number_type(&number_no_extension)?;
        let is_valid_number = number_type != PhoneNumberType::Unknown;
        if region_calling_from == region_code {
            let is_fixed_line_or_mobile = number_type.is_fixed_line_or_mobile();
            // Carrier codes may be needed in some countries. We handle this here.
            if region_code == "CO" && number_type == PhoneNumberType::FixedLine {
                formatted_number = self.format_national_number_with_carrier_code(
                    &number_no_extension,
                    COLOMBIA_MOBILE_TO_FIXED_LINE_PREFIX,
                )?;
            } else if region_code == "BR" && is_fixed_line_or_mobile {
                // Brazilian fixed line and mobile numbers need to be dialed with a
                // carrier code when called within Brazil. Without that, most of the
                // carriers won't connect the call. Because of that, we return an empty
                // string here.
                if !number_no_extension
                    .preferred_domestic_carrier_code()
                    .is_empty()
                {
                    formatted_number = self
                        .format_national_number_with_preferred_carrier_code(&number_no_extension, "")?;
                }
            } else if country_calling_code == NANPA_COUNTRY_CODE {
                // For NANPA countries, we output international format for numbers that
                // can be dialed internationally, since that always works, except for
                // numbers which might potentially be short numbers, which are always
                // dialled in national format.
                let national_number = Self::get_national_significant_number(&number_no_extension);
                let is_too_short = match self.get_metadata_for_region(region_calling_from) {
                    Some(region_metadata) => {
                        test_number_length_against_pattern(
                            &self.reg_exps.regexp_cache,
                            region_metadata.general_desc.possible_number_pattern(),
                            &national_number,
                        )? == Err(ValidationError::TooShort)
                    }
                    None => true,
                };
                let format = if self.can_be_internationally_dialled(&number_no_extension)?
                    && !is_too_short
                {
                    PhoneNumberFormat::International
                } else {
                    PhoneNumberFormat::National
                };
                formatted_number = self.format(&number_no_extension, format)?.into_owned();
            } else {
                // For non-geographical countries, and Mexican, Chilean and Uzbek fixed
                // line and mobile numbers, we output international format for numbers
                // that can be dialed internationally as that always works.
                //
                // MX fixed line and mobile numbers should always be formatted in
                // international format, even when dialed within MX. For national
                // format to work, a carrier code needs to be used, and the correct
                // carrier code depends on if the caller and callee are from the same
                // local area. CL fixed line numbers need the national prefix when
                // dialing in the national format, but don't have it when used for
                // display; the reverse is true for mobile numbers. UZ numbers need
                // special codes we have no complete data for.
                let format = if (region_code == REGION_CODE_FOR_NON_GEO_ENTITY
                    || (matches!(region_code, "MX" | "CL" | "UZ") && is_fixed_line_or_mobile))
                    && self.can_be_internationally_dialled(&number_no_extension)?
                {
                    PhoneNumberFormat::International
                } else {
                    PhoneNumberFormat::National
                };
                formatted_number = self.format(&number_no_extension, format)?.into_owned();
            }
        } else if is_valid_number && self.can_be_internationally_dialled(&number_no_extension)? {
            // We assume that short numbers are not diallable from outside their
            // region, so if a number is not a valid regular length phone number, we
            // treat it as if it cannot be internationally dialled.
            let format = if with_formatting {
                PhoneNumberFormat::International
            } else {
                PhoneNumberFormat::E164
            };
            return Ok(Cow::Owned(
                self.format(&number_no_extension, format)?.into_owned(),
            ));
        }
        if with_formatting {
            Ok(Cow::Owned(formatted_number))
        } else {
            Ok(Cow::Owned(
                self.normalize_diallable_chars_only(&formatted_number),
            ))
        }
    }

    /// The prefix to dial from `metadata`'s region before a foreign calling
    /// code: its international prefix when that is a single prefix, else its
    /// preferred one. Empty when neither applies.
    fn international_prefix_for_formatting<'b>(&self, metadata: &'b PhoneMetadata) -> &'b str {
        let international_prefix = metadata.international_prefix();
        if self
            .reg_exps
            .single_international_prefix
            .is_match(international_prefix)
        {
            international_prefix
        } else {
            metadata.preferred_international_prefix()
        }
    }

    /// Formats a phone number for out-of-country dialing purposes.
    ///
    /// The number is prefixed with the international prefix of
    /// `region_calling_from` when it has a single one (or a preferred one),
    /// and with `+` otherwise. Numbers sharing the calling code of the
    /// calling region are formatted nationally, NANPA numbers called from a
    /// NANPA region as `1 ` followed by the national format.
    pub fn format_out_of_country_calling_number(
        &self,
        phone_number: &PhoneNumber,
        region_calling_from: &str,
    ) -> RegexResult<String> {
        let Some(metadata_for_region_calling_from) =
            self.get_metadata_for_region(region_calling_from)
        else {
            warn!(
                "Trying to format number from invalid region {}. International formatting applied.",
                region_calling_from
            );
            return Ok(self
                .format(phone_number, PhoneNumberFormat::International)?
                .into_owned());
        };
        let country_calling_code = phone_number.country_code();
        let national_significant_number = Self::get_national_significant_number(phone_number);
        if !self.has_valid_country_calling_code(country_calling_code) {
            return Ok(national_significant_number);
        }
        if country_calling_code == NANPA_COUNTRY_CODE {
            if self.is_nanpa_country(region_calling_from) {
                // For NANPA regions, return the national format for these regions but
                // prefix it with the country calling code.
                let national = self.format(phone_number, PhoneNumberFormat::National)?;
                let mut buf = itoa::Buffer::new();
                return Ok(fast_cat::concat_str!(
                    buf.format(country_calling_code),
                    " ",
                    &national
                ));
            }
        } else if country_calling_code == metadata_for_region_calling_from.country_code() {
            // If regions share a country calling code, the country calling code need
            // not be dialled. This also applies when dialling within a region, so this
            // if clause covers both these cases. Technically this is the case for
            // dialling from La Reunion to other overseas departments of France (French
            // Guiana, Martinique, Guadeloupe), but not vice versa - so we don't cover
            // this edge case for now and for those cases return the version including
            // country calling code.
            return Ok(self
                .format(phone_number, PhoneNumberFormat::National)?
                .into_owned());
        }
        // For regions that have multiple international prefixes, the international
        // format of the number is returned, unless there is a preferred international
        // prefix.
        let international_prefix_for_formatting =
            self.international_prefix_for_formatting(metadata_for_region_calling_from);

        let region_code = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata_for_region) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, region_code)
        else {
            return Ok(national_significant_number);
        };
        let mut formatted_number = self
            .format_nsn(
                &national_significant_number,
                metadata_for_region,
                PhoneNumberFormat::International,
            )?
            .into_owned();
        if let Some(formatted_extension) = Self::get_formatted_extension(
            phone_number,
            metadata_for_region,
            PhoneNumberFormat::International,
        ) {
            formatted_number.push_str(&formatted_extension);
        }
        if !international_prefix_for_formatting.is_empty() {
            let mut buf = itoa::Buffer::new();
            formatted_number = fast_cat::concat_str!(
                international_prefix_for_formatting,
                " ",
                buf.format(country_calling_code),
                " ",
                &formatted_number
            );
        } else {
            prefix_number_with_country_calling_code(
                country_calling_code,
                PhoneNumberFormat::International,
                &mut formatted_number,
            );
        }
        Ok(formatted_number)
    }

    /// Formats a phone number for out-of-country dialing purposes, keeping the
    /// letters and grouping symbols of the raw input, e.g. "1 800 SIX-FLAG"
    /// called from Australia becomes "0011 1 800 SIX-FLAG".
    ///
    /// Falls back to [`Self::format_out_of_country_calling_number`] when no
    /// raw input was kept.
    pub fn format_out_of_country_keeping_alpha_chars<'b>(
        &self,
        phone_number: &'b PhoneNumber,
        region_calling_from: &str,
    ) -> RegexResult<Cow<'b, str>> {
        let raw_input = phone_number.raw_input();
        // If there is no raw input, then we can't keep alpha characters because there
        // aren't any. In this case, we return format_out_of_country_calling_number.
        if raw_input.is_empty() {
            return Ok(Cow::Owned(
                self.format_out_of_country_calling_number(phone_number, region_calling_from)?,
            ));
        }
        let country_code = phone_number.country_code();
        if !self.has_valid_country_calling_code(country_code) {
            return Ok(Cow::Borrowed(raw_input));
        }
        // Strip any prefix such as country calling code, IDD, that was present. We do
        // this by comparing the number in raw_input with the parsed number. To do
        // this, first we normalize punctuation. We retain number grouping symbols
        // such as " " only.
        let mut normalized_raw_input = normalize_helper(
            &self.reg_exps.all_plus_number_grouping_symbols,
            true,
            raw_input,
        );
        // Now we trim everything before the first three digits in the parsed number.
        // We choose three because all valid alpha numbers have 3 digits at the start -
        // if it does not, then we don't trim anything at all. Similarly, if the
        // national number was less than three digits, we don't trim anything at all.
        let national_number = Self::get_national_significant_number(phone_number);
        if national_number.len() > 3 {
            if let Some(first_national_number_digit) =
                normalized_raw_input.find(&national_number[..3])
            {
                normalized_raw_input.drain(..first_national_number_digit);
            }
        }

        let metadata_for_region_calling_from = self.get_metadata_for_region(region_calling_from);
        if country_code == NANPA_COUNTRY_CODE {
            if self.is_nanpa_country(region_calling_from) {
                let mut buf = itoa::Buffer::new();
                return Ok(Cow::Owned(fast_cat::concat_str!(
                    buf.format(country_code),
                    " ",
                    &normalized_raw_input
                )));
            }
        } else if let Some(metadata) = metadata_for_region_calling_from
            .filter(|metadata| metadata.country_code() == country_code)
        {
            let Some(formatting_pattern) = self
                .choose_formatting_pattern_for_number(&metadata.number_format, &national_number)?
            else {
                // If no pattern above is matched, we format the original input.
                return Ok(Cow::Owned(normalized_raw_input));
            };
            let mut new_format = formatting_pattern.clone();
            // The first group is the first group of digits that the user wrote
            // together.
            new_format.set_pattern("(\\d+)(.*)");
            // Here we just concatenate them back together after the national prefix
            // has been fixed.
            new_format.set_format("$1$2");
            // Now we format using this pattern instead of the default pattern, but
            // with the national prefix prefixed if necessary.
            // This will not work in the cases where the pattern (and not the leading
            // digits) decide whether a national prefix needs to be used, since we have
            // overridden the pattern to match anything, but that is not the case in the
            // metadata to date.
            return Ok(Cow::Owned(
                self.format_nsn_using_pattern(
                    &normalized_raw_input,
                    &new_format,
                    PhoneNumberFormat::National,
                )?
                .into_owned(),
            ));
        }

        // If an unsupported region-calling-from is entered, or a country with
        // multiple international prefixes, the international format of the number
        // is returned, unless there is a preferred international prefix.
        let international_prefix_for_formatting = metadata_for_region_calling_from
            .map(|metadata| self.international_prefix_for_formatting(metadata))
            .unwrap_or("");
        let mut formatted_number = normalized_raw_input;
        let region_code = self.get_region_code_for_country_code(country_code);
        if let Some(metadata_for_region) =
            self.get_metadata_for_region_or_calling_code(country_code, region_code)
        {
            if let Some(formatted_extension) = Self::get_formatted_extension(
                phone_number,
                metadata_for_region,
                PhoneNumberFormat::International,
            ) {
                formatted_number.push_str(&formatted_extension);
            }
        }
        if !international_prefix_for_formatting.is_empty() {
            let mut buf = itoa::Buffer::new();
            formatted_number = fast_cat::concat_str!(
                international_prefix_for_formatting,
                " ",
                buf.format(country_code),
                " ",
                &formatted_number
            );
        } else {
            // Invalid region entered as country-calling-from (so no metadata was found
            // for it) or the region chosen has multiple international dialling
            // prefixes.
            if metadata_for_region_calling_from.is_none() {
                warn!(
                    "Trying to format number from invalid region {}. International formatting applied.",
                    region_calling_from
                );
            }
            prefix_number_with_country_calling_code(
                country_code,
                PhoneNumberFormat::International,
                &mut formatted_number,
            );
        }
        Ok(Cow::Owned(formatted_number))
    }

    /// Formats a phone number using the original phone number format that the
    /// number is parsed from.
    ///
    /// The original format is embedded in the country_code_source field of the
    /// number. If it is absent the number is formatted in the NATIONAL
    /// format. When the result would change a diallable character of the raw
    /// input, the raw input is returned instead.
    pub fn format_in_original_format<'b>(
        &self,
        phone_number: &'b PhoneNumber,
        region_calling_from: &str,
    ) -> RegexResult<Cow<'b, str>> {
        if phone_number.has_raw_input() && !self.has_formatting_pattern_for_number(phone_number)? {
            // We check if we have the formatting pattern because without that, we might
            // format the number as a group without national prefix.
            return Ok(Cow::Borrowed(phone_number.raw_input()));
        }
        if !phone_number.has_country_code_source() {
            return self.format(phone_number, PhoneNumberFormat::National);
        }
        let formatted_number: Cow<'b, str> = match phone_number.country_code_source() {
            CountryCodeSource::FromNumberWithPlusSign => {
                self.format(phone_number, PhoneNumberFormat::International)?
            }
            CountryCodeSource::FromNumberWithIdd => Cow::Owned(
                self.format_out_of_country_calling_number(phone_number, region_calling_from)?,
            ),
            CountryCodeSource::FromNumberWithoutPlusSign => {
                let international = self.format(phone_number, PhoneNumberFormat::International)?;
                let mut chars = international.chars();
                chars.next();
                Cow::Owned(chars.as_str().to_owned())
            }
            CountryCodeSource::FromDefaultCountry | CountryCodeSource::Unspecified => {
                Cow::Owned(self.format_in_national_original_format(phone_number)?)
            }
        };
        // If no digit is inserted/removed/modified as a result of our formatting, we
        // return the formatted phone number; otherwise we return the raw input the
        // user entered.
        let raw_input = phone_number.raw_input();
        if !raw_input.is_empty() {
            let normalized_formatted_number = self.normalize_diallable_chars_only(&formatted_number);
            let normalized_raw_input = self.normalize_diallable_chars_only(raw_input);
            if normalized_formatted_number != normalized_raw_input {
                return Ok(Cow::Borrowed(raw_input));
            }
        }
        Ok(formatted_number)
    }

    /// National format of a number read in its default region, without the
    /// national prefix when the user did not type one.
    fn format_in_national_original_format(&self, phone_number: &PhoneNumber) -> RegexResult<String> {
        let region_code = self.get_region_code_for_country_code(phone_number.country_code());
        // We strip non-digits from the NDD here, and from the raw input later, so
        // that we can compare them easily.
        let national_prefix = self.get_ndd_prefix_for_region(region_code, true);
        let national_format = self
            .format(phone_number, PhoneNumberFormat::National)?
            .into_owned();
        let Some(national_prefix) = national_prefix else {
            // If the region doesn't have a national prefix at all, we can safely return
            // the national format.
            return Ok(national_format);
        };
        // Otherwise, we check if the original number was entered with a national
        // prefix.
        if self.raw_input_contains_national_prefix(
            phone_number.raw_input(),
            &national_prefix,
            region_code,
        )? {
            // If so, we can safely return the national format.
            return Ok(national_format);
        }
        // Metadata cannot be None here because get_ndd_prefix_for_region() (above)
        // returns None if there is no metadata for the region.
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            return Ok(national_format);
        };
        let national_number = Self::get_national_significant_number(phone_number);
        let Some(format_rule) =
            self.choose_formatting_pattern_for_number(&metadata.number_format, &national_number)?
        else {
            // The format rule could still be None here if the national number was 0
            // and there was no raw input (this should not be possible for numbers
            // generated by the phonenumber library as they would also not have a
            // country calling code and we would have exited earlier).
            return Ok(national_format);
        };
        // When the format we apply to this number doesn't contain national prefix,
        // we can just return the national format.
        // We assume that the first-group symbol will never be _before_ the national
        // prefix.
        let candidate_national_prefix_rule = format_rule.national_prefix_formatting_rule();
        let index_of_first_group = match candidate_national_prefix_rule.find("$1") {
            Some(index) if index > 0 => index,
            _ => return Ok(national_format),
        };
        let candidate_national_prefix =
            normalize_digits_only(&candidate_national_prefix_rule[..index_of_first_group]);
        if candidate_national_prefix.is_empty() {
            // National prefix not used when formatting this number.
            return Ok(national_format);
        }
        // Otherwise, remove the national prefix from the formatted number.
        let mut num_format_copy = format_rule.clone();
        num_format_copy.clear_national_prefix_formatting_rule();
        self.format_by_pattern(
            phone_number,
            PhoneNumberFormat::National,
            std::slice::from_ref(&num_format_copy),
        )
    }

    /// Check if raw_input, which is assumed to be in the national format, has a
    /// national prefix. The national prefix is assumed to be in digits-only
    /// form.
    fn raw_input_contains_national_prefix(
        &self,
        raw_input: &str,
        national_prefix: &str,
        region_code: &str,
    ) -> RegexResult<bool> {
        let normalized_national_number = normalize_digits_only(raw_input);
        let Some(without_prefix) = normalized_national_number.strip_prefix(national_prefix) else {
            return Ok(false);
        };
        // Some Japanese numbers (e.g. 00777123) might be mistaken to contain the
        // national prefix when written without it (e.g. 0777123) if we just do
        // prefix matching. To tackle that, we check the validity of the number if
        // the assumed national prefix is removed (777123 won't be valid in Japan).
        match self.parse(without_prefix, region_code) {
            Ok(number_without_national_prefix) => self.is_valid_number(&number_without_national_prefix),
            Err(_) => Ok(false),
        }
    }

    fn has_formatting_pattern_for_number(&self, phone_number: &PhoneNumber) -> RegexResult<bool> {
        let country_calling_code = phone_number.country_code();
        let phone_number_region = self.get_region_code_for_country_code(country_calling_code);
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(country_calling_code, phone_number_region)
        else {
            return Ok(false);
        };
        let national_number = Self::get_national_significant_number(phone_number);
        Ok(self
            .choose_formatting_pattern_for_number(&metadata.number_format, &national_number)?
            .is_some())
    }

    // ------------------------------------------------------------------
    // Classification and validation
    // ------------------------------------------------------------------

    /// Gets the type of a valid phone number.
    pub fn get_number_type(&self, phone_number: &PhoneNumber) -> RegexResult<PhoneNumberType> {
        let region_code = self.get_region_code_for_number(phone_number)?;
        let Some(metadata) =
            self.get_metadata_for_region_or_calling_code(phone_number.country_code(), region_code)
        else {
            return Ok(PhoneNumberType::Unknown);
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        Ok(self.get_number_type_helper(&national_significant_number, metadata))
    }

    /// Returns the region where a phone number is from. This could be used for
    /// geocoding at the region level. Only guarantees correct results for valid,
    /// full numbers (not short-codes, or invalid numbers). Unknown numbers give
    /// "ZZ".
    pub fn get_region_code_for_number(&self, phone_number: &PhoneNumber) -> RegexResult<&str> {
        let country_calling_code = phone_number.country_code();
        let region_codes = self.get_region_codes_for_country_calling_code(country_calling_code);
        match region_codes.as_slice() {
            [] => {
                trace!(
                    "Missing/invalid country calling code ({})",
                    country_calling_code
                );
                Ok(RegionCode::get_unknown())
            }
            [region_code] => Ok(*region_code),
            _ => self.get_region_code_for_number_from_region_list(phone_number, &region_codes),
        }
    }

    fn get_region_code_for_number_from_region_list<'b>(
        &self,
        phone_number: &PhoneNumber,
        region_codes: &[&'b str],
    ) -> RegexResult<&'b str> {
        let national_number = Self::get_national_significant_number(phone_number);
        for code in region_codes {
            // Metadata cannot be None because the region codes come from the country
            // calling code map.
            let Some(metadata) = self.region_to_metadata_map.get(*code) else {
                continue;
            };
            if metadata.has_leading_digits() {
                if self
                    .reg_exps
                    .regexp_cache
                    .matches_start(metadata.leading_digits(), &national_number)?
                {
                    return Ok(*code);
                }
            } else if self.get_number_type_helper(&national_number, metadata)
                != PhoneNumberType::Unknown
            {
                return Ok(*code);
            }
        }
        Ok(RegionCode::get_unknown())
    }

    pub(crate) fn get_number_type_helper(
        &self,
        national_number: &str,
        metadata: &PhoneMetadata,
    ) -> PhoneNumberType {
        let general_desc = &metadata.general_desc;
        if !general_desc.has_national_number_pattern()
            || !self.is_number_matching_desc(national_number, general_desc)
        {
            trace!(
                "Number '{national_number}' type unknown - doesn't match general national number pattern"
            );
            return PhoneNumberType::Unknown;
        }
        let specific_types = [
            (&metadata.premium_rate, PhoneNumberType::PremiumRate),
            (&metadata.toll_free, PhoneNumberType::TollFree),
            (&metadata.shared_cost, PhoneNumberType::SharedCost),
            (&metadata.voip, PhoneNumberType::VoIP),
            (&metadata.personal_number, PhoneNumberType::PersonalNumber),
            (&metadata.pager, PhoneNumberType::Pager),
            (&metadata.uan, PhoneNumberType::UAN),
            (&metadata.voicemail, PhoneNumberType::VoiceMail),
        ];
        for (desc, number_type) in specific_types {
            if self.is_number_matching_desc(national_number, desc) {
                trace!("Number '{national_number}' is of type {number_type:?}.");
                return number_type;
            }
        }

        let is_fixed_line = self.is_number_matching_desc(national_number, &metadata.fixed_line);
        if is_fixed_line {
            if metadata.same_mobile_and_fixed_line_pattern() {
                trace!(
                    "Number '{national_number}': fixed-line and mobile patterns equal, \
                     number is fixed-line or mobile"
                );
                return PhoneNumberType::FixedLineOrMobile;
            } else if self.is_number_matching_desc(national_number, &metadata.mobile) {
                trace!(
                    "Number '{national_number}': Fixed-line and mobile patterns differ, but number is \
                     still fixed-line or mobile"
                );
                return PhoneNumberType::FixedLineOrMobile;
            }
            trace!("Number '{national_number}' is a fixed line number.");
            return PhoneNumberType::FixedLine;
        }
        // Otherwise, test to see if the number is mobile. Only do this if certain
        // that the patterns for mobile and fixed line aren't the same.
        if !metadata.same_mobile_and_fixed_line_pattern()
            && self.is_number_matching_desc(national_number, &metadata.mobile)
        {
            trace!("Number '{national_number}' is a mobile number.");
            return PhoneNumberType::Mobile;
        }
        trace!(
            "Number '{national_number}' type unknown - doesn't match any specific number type pattern."
        );
        PhoneNumberType::Unknown
    }

    pub(crate) fn is_number_matching_desc(
        &self,
        national_number: &str,
        number_desc: &PhoneNumberDesc,
    ) -> bool {
        helper_functions::is_number_matching_desc(
            self.matcher_api.as_ref(),
            national_number,
            number_desc,
        )
    }

    /// An empty rule counts as the first group alone.
    pub(crate) fn formatting_rule_has_first_group_only(&self, national_prefix_formatting_rule: &str) -> bool {
        national_prefix_formatting_rule.is_empty()
            || self
                .reg_exps
                .formatting_rule_has_first_group_only_regex
                .is_match(national_prefix_formatting_rule)
    }

    /// Tests whether a phone number matches a valid pattern. Note this doesn't
    /// verify the number is actually in use, which is impossible to tell by just
    /// looking at a number itself.
    pub fn is_valid_number(&self, phone_number: &PhoneNumber) -> RegexResult<bool> {
        let region_code = self.get_region_code_for_number(phone_number)?;
        Ok(self.is_valid_number_for_region(phone_number, region_code))
    }

    /// Tests whether a phone number is valid for a certain region. Note this
    /// doesn't verify the number is actually in use, which is impossible to tell
    /// by just looking at a number itself. If the country calling code is not the
    /// same as the country calling code for the region, this immediately exits
    /// with false. After this, the specific number pattern rules for the region
    /// are examined.
    pub fn is_valid_number_for_region(&self, phone_number: &PhoneNumber, region_code: &str) -> bool {
        let country_code = phone_number.country_code();
        let Some(metadata) = self.get_metadata_for_region_or_calling_code(country_code, region_code)
        else {
            return false;
        };
        if REGION_CODE_FOR_NON_GEO_ENTITY != region_code && country_code != metadata.country_code() {
            // Either the region code was invalid, or the country calling code for this
            // number does not match that of the region code.
            return false;
        }
        let national_significant_number = Self::get_national_significant_number(phone_number);
        // For regions where we don't have metadata for PhoneNumberDesc, we treat
        // any number passed in as a valid number if its national significant number
        // is between the minimum and maximum lengths defined by ITU for a national
        // significant number.
        if !metadata.general_desc.has_national_number_pattern() {
            let number_length = national_significant_number.len();
            return number_length > MIN_LENGTH_FOR_NSN && number_length <= MAX_LENGTH_FOR_NSN;
        }
        self.get_number_type_helper(&national_significant_number, metadata)
            != PhoneNumberType::Unknown
    }

    /// Checks whether a phone number is a possible number: its calling code
    /// is known and its length fits the general possible number pattern of
    /// the region. This is much cheaper than full validation.
    pub fn is_possible_number_with_reason(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<(), ValidationError> {
        self.is_possible_number_with_reason_internal(phone_number)
            .map_err(ValidationErrorInternal::into_public)
    }

    pub(crate) fn is_possible_number_with_reason_internal(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<(), ValidationErrorInternal> {
        let national_number = Self::get_national_significant_number(phone_number);
        let country_code = phone_number.country_code();
        // Note: For Russian Fed and NANPA numbers, we just use the rules from the
        // default region (US or Russia) since the get_region_code_for_number will
        // not work if the number is possible but not valid. This would need to be
        // revisited if the possible number pattern ever differed between various
        // regions within those plans.
        if !self.has_valid_country_calling_code(country_code) {
            return Err(ValidationError::InvalidCountryCode.into());
        }
        let region_code = self.get_region_code_for_country_code(country_code);
        let Some(metadata) = self.get_metadata_for_region_or_calling_code(country_code, region_code)
        else {
            return Err(ValidationError::InvalidCountryCode.into());
        };
        let number_length = national_number.len();
        if number_length < MIN_LENGTH_FOR_NSN {
            return Err(ValidationError::TooShort.into());
        }
        if number_length > MAX_LENGTH_FOR_NSN {
            return Err(ValidationError::TooLong.into());
        }
        let general_desc = &metadata.general_desc;
        // Handling case of numbers with no metadata.
        if !general_desc.has_national_number_pattern() {
            trace!("Checking if number is possible with incomplete metadata.");
            return Ok(());
        }
        test_number_length_against_pattern(
            &self.reg_exps.regexp_cache,
            general_desc.possible_number_pattern(),
            &national_number,
        )?
        .map_err(ValidationErrorInternal::from)
    }

    pub fn is_possible_number(&self, phone_number: &PhoneNumber) -> bool {
        self.is_possible_number_with_reason(phone_number).is_ok()
    }

    /// Checks whether a phone number written as text is a possible number,
    /// reading it as dialled from `region_dialing_from`. Text that cannot be
    /// parsed is not possible.
    pub fn is_possible_number_for_string(&self, phone_number: &str, region_dialing_from: &str) -> bool {
        match self.parse(phone_number, region_dialing_from) {
            Ok(number) => self.is_possible_number(&number),
            Err(err) => {
                trace!("Could not parse '{phone_number}' as a possible number: {err}");
                false
            }
        }
    }

    /// Attempts to extract a valid number from a phone number that is too long
    /// to be valid, and resets the number to that one. Returns false when no
    /// valid number could be extracted, leaving the number untouched.
    pub fn truncate_too_long_number(&self, phone_number: &mut PhoneNumber) -> RegexResult<bool> {
        if self.is_valid_number(phone_number)? {
            return Ok(true);
        }
        let mut number_copy = phone_number.clone();
        let mut national_number = phone_number.national_number();
        loop {
            national_number /= 10;
            number_copy.set_national_number(national_number);
            let too_short = match self.is_possible_number_with_reason_internal(&number_copy) {
                Err(ValidationErrorInternal::InvalidRegex(err)) => return Err(err),
                Err(ValidationErrorInternal::Validation(ValidationError::TooShort)) => true,
                _ => false,
            };
            if too_short || national_number == 0 {
                return Ok(false);
            }
            if self.is_valid_number(&number_copy)? {
                break;
            }
        }
        phone_number.set_national_number(national_number);
        Ok(true)
    }

    /// Returns true if the number can be dialled from outside the region, or
    /// unknown. If the number can only be dialled from within the region, returns
    /// false. Does not check the number is a valid number.
    pub fn can_be_internationally_dialled(&self, phone_number: &PhoneNumber) -> RegexResult<bool> {
        let region_code = self.get_region_code_for_number(phone_number)?;
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            // Note numbers belonging to non-geographical entities (e.g. +800 numbers)
            // are always internationally diallable, and will be caught here.
            return Ok(true);
        };
        let national_significant_number = Self::get_national_significant_number(phone_number);
        Ok(!self.is_number_matching_desc(
            &national_significant_number,
            &metadata.no_international_dialling,
        ))
    }

    // ------------------------------------------------------------------
    // Geography
    // ------------------------------------------------------------------

    /// Tests whether a phone number has a geographical association. It checks if
    /// the number is associated with a certain region in the country to which it
    /// belongs. Note that this doesn't verify if the number is actually in use.
    pub fn is_number_geographical(&self, phone_number: &PhoneNumber) -> RegexResult<bool> {
        let number_type = self.get_number_type(phone_number)?;
        Ok(self.is_number_geographical_for_type(number_type, phone_number.country_code()))
    }

    fn is_number_geographical_for_type(
        &self,
        number_type: PhoneNumberType,
        country_calling_code: i32,
    ) -> bool {
        matches!(
            number_type,
            PhoneNumberType::FixedLine | PhoneNumberType::FixedLineOrMobile
        ) || (number_type == PhoneNumberType::Mobile
            && self
                .reg_exps
                .geo_mobile_countries
                .contains(&country_calling_code))
    }

    /// Gets the length of the geographical area code from the national number
    /// of a phone number. Returns 0 when the number has no geographical area
    /// code: it is not geographical, it belongs to a closed dialling plan
    /// without area codes, or its region is unknown.
    ///
    /// The area code is not always a prefix of the national number that
    /// callers may rely on to split it; see
    /// [`Self::get_length_of_national_destination_code`].
    pub fn get_length_of_geographical_area_code(
        &self,
        phone_number: &PhoneNumber,
    ) -> RegexResult<usize> {
        let region_code = self.get_region_code_for_number(phone_number)?;
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            return Ok(0);
        };
        let country_calling_code = phone_number.country_code();
        // If a country doesn't use a national prefix, and this number doesn't have
        // an Italian leading zero, we assume it is a closed dialling plan with no
        // area codes.
        if !metadata.has_national_prefix()
            && !phone_number.italian_leading_zero()
            && !self
                .reg_exps
                .countries_without_national_prefix_with_area_codes
                .contains(&country_calling_code)
        {
            return Ok(0);
        }
        let number_type = self.get_number_type(phone_number)?;
        if number_type == PhoneNumberType::Mobile
            && self
                .reg_exps
                .geo_mobile_countries_without_mobile_area_codes
                .contains(&country_calling_code)
        {
            // Note this is a rough heuristic; it doesn't cover Indonesia well, for
            // example, where area codes are present for some mobile phones but not
            // for others. We have no better way of representing this in the
            // metadata at this point.
            return Ok(0);
        }
        if !self.is_number_geographical_for_type(number_type, country_calling_code) {
            return Ok(0);
        }
        self.get_length_of_national_destination_code(phone_number)
    }

    /// Gets the length of the national destination code (NDC) from a phone
    /// number. The NDC is the first group of the international format of the
    /// number; for regions with a mobile token (Argentina) the token is
    /// counted in as well. Returns 0 for numbers formatted as fewer than two
    /// groups.
    pub fn get_length_of_national_destination_code(
        &self,
        phone_number: &PhoneNumber,
    ) -> RegexResult<usize> {
        let mut copied_number = phone_number.clone();
        // We don't want to format the extension.
        copied_number.clear_extension();
        let formatted_number = self.format(&copied_number, PhoneNumberFormat::International)?;
        // The pattern will start with "+COUNTRY_CODE " so the first group will
        // always be the empty string (before the + symbol) and the second group
        // will be the country calling code. The third group will be area code if
        // it is not the last group.
        let mut number_groups: Vec<&str> = self
            .reg_exps
            .non_digits_pattern
            .split(&formatted_number)
            .collect();
        while number_groups.last().is_some_and(|group| group.is_empty()) {
            number_groups.pop();
        }
        if number_groups.len() <= 3 {
            return Ok(0);
        }
        if self.get_number_type(phone_number)? == PhoneNumberType::Mobile
            && self
                .get_country_mobile_token(phone_number.country_code())
                .is_some()
        {
            // For example Argentinian mobile numbers, when formatted in the
            // international format, are in the form of +54 9 NDC XXXX.... As a result,
            // we take the length of the third group (NDC) and add the length of the
            // mobile token, which also forms part of the national significant number.
            // This assumes that the mobile token is always formatted separately from
            // the rest of the phone number.
            return Ok(number_groups[2].len() + number_groups[3].len());
        }
        Ok(number_groups[2].len())
    }

    // ------------------------------------------------------------------
    // Example numbers
    // ------------------------------------------------------------------

    /// Gets a valid fixed-line number for the specified region.
    pub fn get_example_number(&self, region_code: &str) -> Result<PhoneNumber, GetExampleNumberError> {
        self.get_example_number_for_type(region_code, PhoneNumberType::FixedLine)
    }

    /// Gets a valid number of the given type for the specified region.
    pub fn get_example_number_for_type(
        &self,
        region_code: &str,
        number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        self.get_example_number_for_type_internal(region_code, number_type)
            .map_err(GetExampleNumberErrorInternal::into_public)
    }

    fn get_example_number_for_type_internal(
        &self,
        region_code: &str,
        number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberErrorInternal> {
        let Some(metadata) = self.get_metadata_for_region(region_code) else {
            warn!("Invalid or unknown region code ({}) provided.", region_code);
            return Err(GetExampleNumberError::InvalidRegionCode.into());
        };
        let desc = get_number_desc_by_type(metadata, number_type);
        if !desc.has_example_number() {
            return Err(GetExampleNumberError::NoExampleNumber.into());
        }
        Ok(self.parse_helper(desc.example_number(), Some(region_code), false, true)?)
    }

    /// Gets a valid number of the given type from any region, trying the
    /// non-geographical entities last.
    pub fn get_example_number_for_type_in_any_region(
        &self,
        number_type: PhoneNumberType,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        for region_code in self.get_supported_regions() {
            if let Ok(example_number) = self.get_example_number_for_type(region_code, number_type) {
                return Ok(example_number);
            }
        }
        // If there wasn't an example number for a region, try the non-geographical
        // entities.
        for (country_calling_code, metadata) in &self.country_code_to_non_geographical_metadata_map {
            let desc = get_number_desc_by_type(metadata, number_type);
            if desc.has_example_number() {
                match self.parse_non_geo_example(*country_calling_code, desc) {
                    Ok(example_number) => return Ok(example_number),
                    Err(err) => warn!("Example number of +{country_calling_code} is broken: {err}"),
                }
            }
        }
        Err(GetExampleNumberError::NoExampleNumber)
    }

    /// Gets a valid number for the specified non-geographical calling code,
    /// e.g. +800 numbers.
    pub fn get_example_number_for_non_geo_entity(
        &self,
        country_calling_code: i32,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        let Some(metadata) = self.get_metadata_for_non_geographical_region(country_calling_code)
        else {
            warn!(
                "Invalid or unknown country calling code provided: {}",
                country_calling_code
            );
            return Err(GetExampleNumberError::InvalidRegionCode);
        };
        // For geographical entities, fixed-line data is always present. However, for
        // non-geographical entities, this is not the case, so we have to go through
        // different types to find the example number.
        let descs = [
            &metadata.mobile,
            &metadata.toll_free,
            &metadata.shared_cost,
            &metadata.voip,
            &metadata.voicemail,
            &metadata.uan,
            &metadata.premium_rate,
        ];
        for desc in descs {
            if desc.has_example_number() {
                match self.parse_non_geo_example(country_calling_code, desc) {
                    Ok(example_number) => return Ok(example_number),
                    Err(err) => warn!("Example number of +{country_calling_code} is broken: {err}"),
                }
            }
        }
        Err(GetExampleNumberError::NoExampleNumber)
    }

    fn parse_non_geo_example(
        &self,
        country_calling_code: i32,
        desc: &PhoneNumberDesc,
    ) -> Result<PhoneNumber, GetExampleNumberError> {
        let mut buf = itoa::Buffer::new();
        let number = fast_cat::concat_str!(
            PLUS_SIGN,
            buf.format(country_calling_code),
            desc.example_number()
        );
        self.parse(&number, RegionCode::get_unknown())
            .map_err(GetExampleNumberError::FailedToParse)
    }
}
