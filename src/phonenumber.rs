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

use serde::{Deserialize, Serialize};

/// Describes how the country calling code of a parsed number was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCodeSource {
    #[default]
    Unspecified,
    /// The number started with a plus sign, e.g. `+44 20 7031 3000`.
    FromNumberWithPlusSign,
    /// The number started with the international dialling prefix of the
    /// default region, e.g. `011 44 20 7031 3000` dialled from the US.
    FromNumberWithIdd,
    /// The number started with the calling code of the default region without
    /// any plus sign or IDD, e.g. `44 20 7031 3000` dialled from GB.
    FromNumberWithoutPlusSign,
    /// No calling code was present; the default region supplied it.
    FromDefaultCountry,
}

/// A parsed phone number.
///
/// Every field keeps track of whether it was set: two numbers are equal only if
/// they carry the same fields with the same values. `parse` sets the fields
/// identifying the number, `parse_and_keep_raw_input` also fills the ones
/// describing how it was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    country_code: Option<i32>,
    national_number: Option<u64>,
    extension: Option<String>,
    italian_leading_zero: Option<bool>,
    number_of_leading_zeros: Option<i32>,
    raw_input: Option<String>,
    country_code_source: Option<CountryCodeSource>,
    preferred_domestic_carrier_code: Option<String>,
}

macro_rules! optional_value_accessors {
    ($($field:ident: $ty:ty = $default:expr, $has:ident, $set:ident, $clear:ident;)+) => {
        $(
            pub fn $field(&self) -> $ty {
                self.$field.unwrap_or($default)
            }

            pub fn $has(&self) -> bool {
                self.$field.is_some()
            }

            pub fn $set(&mut self, value: $ty) {
                self.$field = Some(value);
            }

            pub fn $clear(&mut self) {
                self.$field = None;
            }
        )+
    };
}

macro_rules! optional_string_accessors {
    ($($field:ident, $has:ident, $set:ident, $clear:ident;)+) => {
        $(
            pub fn $field(&self) -> &str {
                self.$field.as_deref().unwrap_or("")
            }

            pub fn $has(&self) -> bool {
                self.$field.is_some()
            }

            pub fn $set(&mut self, value: String) {
                self.$field = Some(value);
            }

            pub fn $clear(&mut self) {
                self.$field = None;
            }
        )+
    };
}

impl PhoneNumber {
    pub fn new() -> Self {
        Self::default()
    }

    optional_value_accessors! {
        country_code: i32 = 0, has_country_code, set_country_code, clear_country_code;
        national_number: u64 = 0, has_national_number, set_national_number, clear_national_number;
        italian_leading_zero: bool = false,
            has_italian_leading_zero, set_italian_leading_zero, clear_italian_leading_zero;
        number_of_leading_zeros: i32 = 1,
            has_number_of_leading_zeros, set_number_of_leading_zeros, clear_number_of_leading_zeros;
        country_code_source: CountryCodeSource = CountryCodeSource::Unspecified,
            has_country_code_source, set_country_code_source, clear_country_code_source;
    }

    optional_string_accessors! {
        extension, has_extension, set_extension, clear_extension;
        raw_input, has_raw_input, set_raw_input, clear_raw_input;
        preferred_domestic_carrier_code, has_preferred_domestic_carrier_code,
            set_preferred_domestic_carrier_code, clear_preferred_domestic_carrier_code;
    }

    /// Resets every field to the unset state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Copies every field set in `other` into `self`.
    pub fn merge_from(&mut self, other: &PhoneNumber) {
        macro_rules! merge {
            ($($field:ident),+) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field.clone();
                    }
                )+
            };
        }
        merge!(
            country_code,
            national_number,
            extension,
            italian_leading_zero,
            number_of_leading_zeros,
            raw_input,
            country_code_source,
            preferred_domestic_carrier_code
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_takes_part_in_equality() {
        let mut first = PhoneNumber::new();
        first.set_country_code(1);
        first.set_national_number(6502530000);

        let mut second = first.clone();
        assert_eq!(first, second);

        second.set_number_of_leading_zeros(1);
        assert_eq!(first.number_of_leading_zeros(), second.number_of_leading_zeros());
        assert_ne!(first, second);

        second.clear_number_of_leading_zeros();
        second.set_extension(String::new());
        assert_ne!(first, second);
    }

    #[test]
    fn merge_keeps_unset_fields() {
        let mut number = PhoneNumber::new();
        number.set_country_code(44);
        number.set_raw_input("020 8765 4321".to_owned());

        let mut other = PhoneNumber::new();
        other.set_national_number(2087654321);
        number.merge_from(&other);

        assert_eq!(44, number.country_code());
        assert_eq!(2087654321, number.national_number());
        assert_eq!("020 8765 4321", number.raw_input());
    }
}
