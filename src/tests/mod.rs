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

use crate::PhoneNumberUtil;

mod asyoutypeformatter_tests;
mod proptests;

/// Hand written metadata for the regions used by the tests.
pub(crate) const TEST_METADATA: &str = include_str!("test_metadata.json");

static ONCE: std::sync::Once = std::sync::Once::new();

pub(crate) fn get_phone_util() -> PhoneNumberUtil {
    ONCE.call_once(|| {
        colog::default_builder()
            .filter_level(log::LevelFilter::Trace)
            .init()
    });
    PhoneNumberUtil::new_for_json(TEST_METADATA).expect("Metadata should be valid")
}
