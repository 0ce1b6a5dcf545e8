use proptest::prelude::*;

use crate::{PhoneNumber, PhoneNumberFormat, PhoneNumberUtil};

use super::{get_phone_util, region_code::RegionCode};

fn us_national_number() -> impl Strategy<Value = u64> {
    (prop::sample::select(vec![3u64, 4, 5, 6, 8, 9]), 0u64..1_000_000_000)
        .prop_map(|(first, rest)| first * 1_000_000_000 + rest)
}

fn gb_national_number() -> impl Strategy<Value = u64> {
    (1u64..=6, 0u64..1_000_000_000).prop_map(|(first, rest)| first * 1_000_000_000 + rest)
}

fn number(country_code: i32, national_number: u64) -> PhoneNumber {
    let mut phone_number = PhoneNumber::new();
    phone_number.set_country_code(country_code);
    phone_number.set_national_number(national_number);
    phone_number
}

proptest! {
    #[test]
    fn e164_round_trips_through_parse(
        (country_code, national_number) in prop_oneof![
            us_national_number().prop_map(|n| (1, n)),
            gb_national_number().prop_map(|n| (44, n)),
        ]
    ) {
        let phone_util = get_phone_util();
        let phone_number = number(country_code, national_number);
        prop_assert!(phone_util.is_valid_number(&phone_number).unwrap());

        let e164 = phone_util.format(&phone_number, PhoneNumberFormat::E164).unwrap();
        let parsed = phone_util.parse(&e164, RegionCode::zz()).unwrap();
        prop_assert_eq!(&phone_number, &parsed);

        let international = phone_util
            .format(&phone_number, PhoneNumberFormat::International)
            .unwrap();
        let parsed = phone_util.parse(&international, RegionCode::zz()).unwrap();
        prop_assert_eq!(&phone_number, &parsed);
    }

    #[test]
    fn national_format_is_stable(national_number in gb_national_number()) {
        let phone_util = get_phone_util();
        let phone_number = number(44, national_number);
        let national = phone_util
            .format(&phone_number, PhoneNumberFormat::National)
            .unwrap()
            .into_owned();
        let parsed = phone_util.parse(&national, RegionCode::gb()).unwrap();
        prop_assert_eq!(&phone_number, &parsed);
        let formatted_again = phone_util.format(&parsed, PhoneNumberFormat::National).unwrap();
        prop_assert_eq!(national.as_str(), &*formatted_again);
    }

    #[test]
    fn parse_never_panics(input in "[0-9a-zA-Z+() .;=:-]{0,30}") {
        let phone_util = get_phone_util();
        if let Ok(phone_number) = phone_util.parse(&input, RegionCode::us()) {
            phone_util.format(&phone_number, PhoneNumberFormat::International).unwrap();
        }
    }

    #[test]
    fn as_you_type_keeps_every_digit(national_number in us_national_number()) {
        let phone_util = get_phone_util();
        let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
        let digits = national_number.to_string();
        let mut output = String::new();
        for digit in digits.chars() {
            output = formatter.input_digit(digit);
        }
        prop_assert_eq!(digits, PhoneNumberUtil::normalize_digits_only(&output));
    }
}

fn type_all(phone_util: &PhoneNumberUtil, region_code: &str, input: &str) -> String {
    let mut formatter = phone_util.get_as_you_type_formatter(region_code);
    let mut output = String::new();
    for c in input.chars() {
        output = formatter.input_digit(c);
    }
    output
}

proptest! {
    #[test]
    fn as_you_type_ends_in_national_format_for_us(national_number in us_national_number()) {
        let phone_util = get_phone_util();
        let national = phone_util
            .format(&number(1, national_number), PhoneNumberFormat::National)
            .unwrap()
            .into_owned();
        let typed = type_all(&phone_util, RegionCode::us(), &national_number.to_string());
        prop_assert_eq!(national, typed);
    }

    #[test]
    fn as_you_type_ends_in_national_format_for_gb(national_number in gb_national_number()) {
        let phone_util = get_phone_util();
        let national = phone_util
            .format(&number(44, national_number), PhoneNumberFormat::National)
            .unwrap()
            .into_owned();
        // Typed at home with the national prefix.
        let typed = type_all(&phone_util, RegionCode::gb(), &format!("0{national_number}"));
        prop_assert_eq!(national, typed);
    }
}
