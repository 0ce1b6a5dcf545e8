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

use strum::EnumIter;

/// Output shapes understood by [`crate::PhoneNumberUtil::format`].
///
/// Taking the Google Zurich office as an example:
/// - `E164`: `+41446681800`
/// - `International`: `+41 44 668 1800`
/// - `National`: `044 668 1800`
/// - `RFC3966`: `tel:+41-44-668-1800`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneNumberFormat {
    /// Plus sign, calling code and national significant number with nothing
    /// in between. Extensions are never written.
    E164,
    /// Calling code followed by the number grouped the way the region writes
    /// numbers for international display.
    International,
    /// The number as dialled inside its region, national prefix included
    /// when the region's rules ask for it.
    National,
    /// A `tel:` URI with hyphens between groups and `;ext=` for extensions.
    RFC3966,
}

/// Categories a number can be classified into by
/// [`crate::PhoneNumberUtil::get_number_type`].
#[derive(Debug, EnumIter, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneNumberType {
    FixedLine,
    Mobile,
    /// The region's fixed-line and mobile ranges cannot be told apart (the
    /// USA for instance), or the number falls into both.
    FixedLineOrMobile,
    /// Free for the caller, e.g. 800 numbers in the USA.
    TollFree,
    PremiumRate,
    /// The cost of the call is split between caller and recipient.
    SharedCost,
    /// Voice over IP.
    VoIP,
    /// A number bound to a person and routed to whichever line they choose.
    PersonalNumber,
    Pager,
    /// Universal Access Number: one company number routed to several offices.
    UAN,
    /// Direct access to a voicemail service.
    VoiceMail,
    /// Valid for no category known for the region.
    Unknown,
}

impl PhoneNumberType {
    /// `true` for the categories describing ordinary subscriber lines.
    pub fn is_fixed_line_or_mobile(self) -> bool {
        matches!(
            self,
            PhoneNumberType::FixedLine
                | PhoneNumberType::Mobile
                | PhoneNumberType::FixedLineOrMobile
        )
    }
}

/// How close two numbers are, from no relation to identical.
///
/// Variants are ordered from the weakest to the strongest match. Strings that
/// cannot be read as numbers at all are reported as an error by the string
/// based comparisons instead of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchType {
    NoMatch,
    /// Calling codes agree (or one is missing) and one national number ends
    /// with the other, e.g. `6502530000` and `2530000`.
    ShortNsnMatch,
    /// Same national number but at least one calling code is missing, e.g.
    /// `044 668 1800` read without a region and `+41 44 668 1800`.
    NsnMatch,
    /// Calling code, national number, leading zeros and extension all agree.
    ExactMatch,
}
