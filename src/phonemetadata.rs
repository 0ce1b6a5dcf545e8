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

//! Region metadata records.
//!
//! The records are plain serde structures. Every optional text field is
//! exposed through the accessor trio `field()` / `has_field()` /
//! `set_field()` where `field()` yields an empty string when unset, so callers
//! can treat "absent" and "empty" alike when that is what they need.

use serde::{Deserialize, Serialize};

macro_rules! optional_str_accessors {
    ($($field:ident, $has:ident, $set:ident, $clear:ident;)+) => {
        $(
            pub fn $field(&self) -> &str {
                self.$field.as_deref().unwrap_or("")
            }

            pub fn $has(&self) -> bool {
                self.$field.is_some()
            }

            pub fn $set(&mut self, value: impl Into<String>) {
                self.$field = Some(value.into());
            }

            pub fn $clear(&mut self) {
                self.$field = None;
            }
        )+
    };
}

/// Patterns describing one category of numbers of a region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumberDesc {
    pub national_number_pattern: Option<String>,
    pub possible_number_pattern: Option<String>,
    pub example_number: Option<String>,
}

impl PhoneNumberDesc {
    optional_str_accessors! {
        national_number_pattern, has_national_number_pattern,
            set_national_number_pattern, clear_national_number_pattern;
        possible_number_pattern, has_possible_number_pattern,
            set_possible_number_pattern, clear_possible_number_pattern;
        example_number, has_example_number, set_example_number, clear_example_number;
    }
}

/// A single formatting rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub pattern: String,
    pub format: String,
    /// Only the last entry is used when formatting complete numbers; the as
    /// you type formatter walks the list as more digits arrive.
    pub leading_digits_pattern: Vec<String>,
    pub national_prefix_formatting_rule: Option<String>,
    pub national_prefix_optional_when_formatting: Option<bool>,
    pub domestic_carrier_code_formatting_rule: Option<String>,
}

impl NumberFormat {
    pub fn new(pattern: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            format: format.into(),
            ..Default::default()
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    pub fn national_prefix_optional_when_formatting(&self) -> bool {
        self.national_prefix_optional_when_formatting.unwrap_or(false)
    }

    optional_str_accessors! {
        national_prefix_formatting_rule, has_national_prefix_formatting_rule,
            set_national_prefix_formatting_rule, clear_national_prefix_formatting_rule;
        domestic_carrier_code_formatting_rule, has_domestic_carrier_code_formatting_rule,
            set_domestic_carrier_code_formatting_rule, clear_domestic_carrier_code_formatting_rule;
    }
}

/// Everything known about one region, or about one non-geographical calling
/// code (those use the id `"001"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneMetadata {
    pub id: String,
    pub country_code: i32,

    pub international_prefix: Option<String>,
    pub preferred_international_prefix: Option<String>,
    pub national_prefix: Option<String>,
    pub preferred_extn_prefix: Option<String>,
    pub national_prefix_for_parsing: Option<String>,
    pub national_prefix_transform_rule: Option<String>,
    pub leading_digits: Option<String>,

    pub same_mobile_and_fixed_line_pattern: bool,
    pub main_country_for_code: bool,

    // Region level defaults copied into format rules lacking their own.
    pub national_prefix_formatting_rule: Option<String>,
    pub national_prefix_optional_when_formatting: bool,
    pub carrier_code_formatting_rule: Option<String>,

    pub general_desc: PhoneNumberDesc,
    pub fixed_line: PhoneNumberDesc,
    pub mobile: PhoneNumberDesc,
    pub toll_free: PhoneNumberDesc,
    pub premium_rate: PhoneNumberDesc,
    pub shared_cost: PhoneNumberDesc,
    pub personal_number: PhoneNumberDesc,
    pub voip: PhoneNumberDesc,
    pub pager: PhoneNumberDesc,
    pub uan: PhoneNumberDesc,
    pub voicemail: PhoneNumberDesc,
    pub no_international_dialling: PhoneNumberDesc,

    pub number_format: Vec<NumberFormat>,
    pub intl_number_format: Vec<NumberFormat>,
}

impl PhoneMetadata {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn country_code(&self) -> i32 {
        self.country_code
    }

    pub fn same_mobile_and_fixed_line_pattern(&self) -> bool {
        self.same_mobile_and_fixed_line_pattern
    }

    pub fn main_country_for_code(&self) -> bool {
        self.main_country_for_code
    }

    optional_str_accessors! {
        international_prefix, has_international_prefix,
            set_international_prefix, clear_international_prefix;
        preferred_international_prefix, has_preferred_international_prefix,
            set_preferred_international_prefix, clear_preferred_international_prefix;
        national_prefix, has_national_prefix, set_national_prefix, clear_national_prefix;
        preferred_extn_prefix, has_preferred_extn_prefix,
            set_preferred_extn_prefix, clear_preferred_extn_prefix;
        national_prefix_for_parsing, has_national_prefix_for_parsing,
            set_national_prefix_for_parsing, clear_national_prefix_for_parsing;
        national_prefix_transform_rule, has_national_prefix_transform_rule,
            set_national_prefix_transform_rule, clear_national_prefix_transform_rule;
        leading_digits, has_leading_digits, set_leading_digits, clear_leading_digits;
    }

    /// Fills in the values a metadata document is allowed to leave implicit.
    ///
    /// * `national_prefix_for_parsing` defaults to the national prefix.
    /// * Format rules inherit the region national prefix formatting rule,
    ///   its optional flag and the carrier code rule. `$NP` and `$FG` in those
    ///   rules are resolved to the national prefix and `$1`.
    /// * Type descriptions without a possible number pattern inherit the one of
    ///   the general description.
    /// * Fixed-line and mobile descriptions with identical national patterns
    ///   set `same_mobile_and_fixed_line_pattern`.
    ///
    /// Finalizing twice is harmless.
    pub fn finalize(&mut self) {
        if !self.has_national_prefix_for_parsing() && self.has_national_prefix() {
            self.national_prefix_for_parsing = self.national_prefix.clone();
        }

        let national_prefix = self.national_prefix().to_owned();
        let region_rule = self.national_prefix_formatting_rule.clone();
        let region_optional = self.national_prefix_optional_when_formatting;
        let region_carrier_rule = self.carrier_code_formatting_rule.clone();

        let resolve = |rule: &str| rule.replace("$NP", &national_prefix).replace("$FG", "$1");
        for format in self
            .number_format
            .iter_mut()
            .chain(self.intl_number_format.iter_mut())
        {
            if format.national_prefix_formatting_rule.is_none() {
                format.national_prefix_formatting_rule = region_rule.clone();
            }
            format.national_prefix_formatting_rule =
                format.national_prefix_formatting_rule.as_deref().map(resolve);
            if format.national_prefix_optional_when_formatting.is_none() {
                format.national_prefix_optional_when_formatting = Some(region_optional);
            }
            if format.domestic_carrier_code_formatting_rule.is_none() {
                format.domestic_carrier_code_formatting_rule = region_carrier_rule.clone();
            }
            format.domestic_carrier_code_formatting_rule =
                format.domestic_carrier_code_formatting_rule.as_deref().map(resolve);
        }

        let general_possible = self.general_desc.possible_number_pattern.clone();
        for desc in [
            &mut self.fixed_line,
            &mut self.mobile,
            &mut self.toll_free,
            &mut self.premium_rate,
            &mut self.shared_cost,
            &mut self.personal_number,
            &mut self.voip,
            &mut self.pager,
            &mut self.uan,
            &mut self.voicemail,
            &mut self.no_international_dialling,
        ] {
            if desc.has_national_number_pattern() && !desc.has_possible_number_pattern() {
                desc.possible_number_pattern = general_possible.clone();
            }
        }

        if self.fixed_line.has_national_number_pattern()
            && self.fixed_line.national_number_pattern == self.mobile.national_number_pattern
        {
            self.same_mobile_and_fixed_line_pattern = true;
        }
    }
}

/// The whole dataset handed to [`crate::PhoneNumberUtil::new_for_metadata`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneMetadataCollection {
    pub metadata: Vec<PhoneMetadata>,
}

impl PhoneMetadataCollection {
    /// Reads a collection from its json form. The result is not finalized yet,
    /// that happens when the collection is handed to the engine.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_inherits_region_defaults() {
        let mut metadata = PhoneMetadata {
            id: "GB".to_owned(),
            country_code: 44,
            national_prefix: Some("0".to_owned()),
            national_prefix_formatting_rule: Some("($NP$FG)".to_owned()),
            general_desc: PhoneNumberDesc {
                national_number_pattern: Some("\\d{10}".to_owned()),
                possible_number_pattern: Some("\\d{6,10}".to_owned()),
                example_number: None,
            },
            fixed_line: PhoneNumberDesc {
                national_number_pattern: Some("[1-6]\\d{9}".to_owned()),
                ..Default::default()
            },
            number_format: vec![NumberFormat::new("(\\d{2})(\\d{4})(\\d{4})", "$1 $2 $3")],
            ..Default::default()
        };
        metadata.finalize();

        assert_eq!("0", metadata.national_prefix_for_parsing());
        assert_eq!("(0$1)", metadata.number_format[0].national_prefix_formatting_rule());
        assert_eq!("\\d{6,10}", metadata.fixed_line.possible_number_pattern());
        assert!(!metadata.mobile.has_possible_number_pattern());
        assert!(!metadata.same_mobile_and_fixed_line_pattern());
    }

    #[test]
    fn finalize_detects_identical_fixed_and_mobile_patterns() {
        let desc = PhoneNumberDesc {
            national_number_pattern: Some("[2-9]\\d{9}".to_owned()),
            ..Default::default()
        };
        let mut metadata = PhoneMetadata {
            fixed_line: desc.clone(),
            mobile: desc,
            ..Default::default()
        };
        metadata.finalize();
        assert!(metadata.same_mobile_and_fixed_line_pattern());
    }

    #[test]
    fn collection_reads_json() {
        let collection = PhoneMetadataCollection::from_json_str(
            r#"{"metadata": [{"id": "SG", "country_code": 65, "international_prefix": "0[0-3]\\d"}]}"#,
        )
        .unwrap();
        assert_eq!(1, collection.metadata.len());
        assert_eq!("0[0-3]\\d", collection.metadata[0].international_prefix());
        assert!(!collection.metadata[0].has_national_prefix());
    }
}
