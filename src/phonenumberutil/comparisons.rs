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

use log::trace;

use super::{
    MatchType, PhoneNumberUtil,
    errors::{InvalidNumberError, InvalidNumberErrorInternal, ParseError, ParseErrorInternal},
    helper_functions::{copy_core_fields_only, is_national_number_suffix_of_the_other},
};
use crate::{i18n::RegionCode, phonenumber::PhoneNumber};

impl PhoneNumberUtil {
    /// Takes two phone numbers and compares them for equality.
    ///
    /// Only the fields set by [`Self::parse`] take part: raw input, calling
    /// code source and carrier codes are ignored.
    ///
    /// Returns `ExactMatch` if the country calling code, NSN, presence of a
    /// leading zero for Italian numbers and any extension present are the
    /// same. Returns `NsnMatch` if either or both has no country calling code
    /// specified, and the NSNs and extensions are the same. Returns
    /// `ShortNsnMatch` if either or both has no country calling code
    /// specified, or the country calling code specified is the same, and one
    /// NSN could be a shorter version of the other number. This includes the
    /// case where one has an extension specified, and the other does not.
    /// Returns `NoMatch` otherwise. For example, the numbers +1 345 657 1234
    /// and 657 1234 are a `ShortNsnMatch`. The numbers +1 345 657 1234 and
    /// 345 657 are a `NoMatch`.
    pub fn is_number_match(
        &self,
        first_number_in: &PhoneNumber,
        second_number_in: &PhoneNumber,
    ) -> MatchType {
        // We only care about the fields that uniquely define a number, so we copy
        // these across explicitly.
        let mut first_number = copy_core_fields_only(first_number_in);
        let second_number = copy_core_fields_only(second_number_in);

        // Early exit if both had extensions and these are different.
        if first_number.has_extension()
            && second_number.has_extension()
            && first_number.extension() != second_number.extension()
        {
            return MatchType::NoMatch;
        }

        let first_number_country_code = first_number.country_code();
        let second_number_country_code = second_number.country_code();
        // Both had country calling code specified.
        if first_number_country_code != 0 && second_number_country_code != 0 {
            if first_number == second_number {
                return MatchType::ExactMatch;
            } else if first_number_country_code == second_number_country_code
                && is_national_number_suffix_of_the_other(&first_number, &second_number)
            {
                // A SHORT_NSN_MATCH occurs if there is a difference because of the
                // presence or absence of an 'Italian leading zero', the presence or
                // absence of an extension, or one NSN being a shorter variant of the
                // other.
                return MatchType::ShortNsnMatch;
            }
            // This is not a match.
            return MatchType::NoMatch;
        }
        // Checks cases where one or both country calling codes were not specified.
        // To make equality checks easier, we first set the country codes to be
        // equal.
        first_number.set_country_code(second_number_country_code);
        // If all else was the same, then this is an NSN_MATCH.
        if first_number == second_number {
            return MatchType::NsnMatch;
        }
        if is_national_number_suffix_of_the_other(&first_number, &second_number) {
            return MatchType::ShortNsnMatch;
        }
        MatchType::NoMatch
    }

    /// Takes two phone numbers as strings and compares them for equality.
    ///
    /// Numbers written with a calling code (`+` or IDD free) are read as such;
    /// when both lack one they are compared as national numbers. Text that
    /// cannot be read as a phone number at all is reported as an error.
    ///
    /// Only the loaded metadata patterns are evaluated here; those were all
    /// compiled when the engine was built, so a regex failure is treated as a
    /// bug and panics instead of being returned.
    pub fn is_number_match_with_two_strings(
        &self,
        first_number: &str,
        second_number: &str,
    ) -> Result<MatchType, InvalidNumberError> {
        self.is_number_match_with_two_strings_internal(first_number, second_number)
            .map_err(InvalidNumberErrorInternal::into_public)
    }

    fn is_number_match_with_two_strings_internal(
        &self,
        first_number: &str,
        second_number: &str,
    ) -> Result<MatchType, InvalidNumberErrorInternal> {
        match self.parse_helper(first_number, Some(RegionCode::get_unknown()), false, true) {
            Ok(first_number_as_proto) => {
                return self.is_number_match_with_one_string_internal(&first_number_as_proto, second_number);
            }
            Err(ParseErrorInternal::FailedToParse(ParseError::InvalidCountryCode)) => {}
            Err(err) => return Err(err.into()),
        }
        match self.parse_helper(second_number, Some(RegionCode::get_unknown()), false, true) {
            Ok(second_number_as_proto) => {
                return self.is_number_match_with_one_string_internal(&second_number_as_proto, first_number);
            }
            Err(ParseErrorInternal::FailedToParse(ParseError::InvalidCountryCode)) => {}
            Err(err) => return Err(err.into()),
        }
        trace!("Neither '{first_number}' nor '{second_number}' has a calling code, comparing national numbers.");
        let first_number_proto = self.parse_helper(first_number, None, false, false)?;
        let second_number_proto = self.parse_helper(second_number, None, false, false)?;
        Ok(self.is_number_match(&first_number_proto, &second_number_proto))
    }

    /// Takes a phone number and a string and compares them for equality.
    ///
    /// A second number written without a calling code is read in the region
    /// of the first one; an exact match found that way is downgraded to
    /// `NsnMatch`.
    ///
    /// Only the loaded metadata patterns are evaluated here; those were all
    /// compiled when the engine was built, so a regex failure is treated as a
    /// bug and panics instead of being returned.
    pub fn is_number_match_with_one_string(
        &self,
        first_number: &PhoneNumber,
        second_number: &str,
    ) -> Result<MatchType, InvalidNumberError> {
        self.is_number_match_with_one_string_internal(first_number, second_number)
            .map_err(InvalidNumberErrorInternal::into_public)
    }

    fn is_number_match_with_one_string_internal(
        &self,
        first_number: &PhoneNumber,
        second_number: &str,
    ) -> Result<MatchType, InvalidNumberErrorInternal> {
        // First see if the second number has an implicit country calling code, by
        // attempting to parse it.
        match self.parse_helper(second_number, Some(RegionCode::get_unknown()), false, true) {
            Ok(second_number_as_proto) => {
                return Ok(self.is_number_match(first_number, &second_number_as_proto));
            }
            Err(ParseErrorInternal::FailedToParse(ParseError::InvalidCountryCode)) => {}
            Err(err) => return Err(err.into()),
        }
        // The second number has no country calling code. EXACT_MATCH is no longer
        // possible. We parse it as if the region was the same as that for the first
        // number, and if EXACT_MATCH is returned, we replace this with NSN_MATCH.
        let first_number_region = self.get_region_code_for_country_code(first_number.country_code());
        if first_number_region != RegionCode::get_unknown() {
            let second_number_with_first_number_region =
                self.parse_helper(second_number, Some(first_number_region), false, true)?;
            let match_type =
                self.is_number_match(first_number, &second_number_with_first_number_region);
            if match_type == MatchType::ExactMatch {
                return Ok(MatchType::NsnMatch);
            }
            return Ok(match_type);
        }
        // If the first number didn't have a valid country calling code, then we
        // parse the second number without one as well.
        let second_number_proto = self.parse_helper(second_number, None, false, false)?;
        Ok(self.is_number_match(first_number, &second_number_proto))
    }
}
