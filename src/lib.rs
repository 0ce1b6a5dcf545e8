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

//! Parsing, formatting and validation of international phone numbers.
//!
//! Everything is driven by region metadata loaded at runtime with
//! [`PhoneNumberUtil::new_for_json`]. A loaded [`PhoneNumberUtil`] is
//! immutable and can be shared between threads; [`AsYouTypeFormatter`]
//! sessions borrow it.

mod interfaces;
mod phonemetadata;
mod phonenumber;
mod phonenumberutil;
mod asyoutypeformatter;
mod regexp_cache;
mod regex_based_matcher;
pub mod i18n;
pub(crate) mod regex_util;

/// I decided to create this module because there are many
/// boilerplate places in the code that can be replaced with macros,
/// the name of which will describe what is happening more
/// clearly than a few lines of code.
mod macros;

#[cfg(test)]
mod tests;

pub use asyoutypeformatter::AsYouTypeFormatter;
pub use phonemetadata::{NumberFormat, PhoneMetadata, PhoneMetadataCollection, PhoneNumberDesc};
pub use phonenumber::{CountryCodeSource, PhoneNumber};
pub use phonenumberutil::{
    MatchType, PhoneNumberFormat, PhoneNumberType, PhoneNumberUtil, RegexResult,
    errors::{
        ExtractNumberError, GetExampleNumberError, InvalidNumberError, MetadataError,
        NotANumberError, ParseError, ValidationError,
    },
};
pub use regexp_cache::InvalidRegexError;
