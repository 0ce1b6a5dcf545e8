use crate::{AsYouTypeFormatter, PhoneNumberFormat};

use super::{get_phone_util, region_code::RegionCode};

fn type_all(formatter: &mut AsYouTypeFormatter<'_>, input: &str) -> Vec<String> {
    input.chars().map(|c| formatter.input_digit(c)).collect()
}

#[test]
fn aytf_us_national() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!(
        vec![
            "6", "65", "650", "650 2", "650 25", "650 253", "650 2532", "650 253 22",
            "650 253 222", "650 253 2222",
        ],
        type_all(&mut formatter, "6502532222")
    );
    assert_eq!("", formatter.get_extracted_national_prefix());
}

#[test]
fn aytf_us_with_national_prefix() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!(
        vec![
            "1", "16", "1 65", "1 650", "1 650 2", "1 650 25", "1 650 253", "1 650 253 2",
            "1 650 253 22", "1 650 253 222", "1 650 253 2222",
        ],
        type_all(&mut formatter, "16502532222")
    );
    assert_eq!("1", formatter.get_extracted_national_prefix());
}

#[test]
fn aytf_us_international_with_plus() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!(
        vec![
            "+", "+1", "+1 6", "+1 65", "+1 650", "+1 650 2", "+1 650 25", "+1 650 253",
            "+1 650 253 2", "+1 650 253 22", "+1 650 253 222", "+1 650 253 2222",
        ],
        type_all(&mut formatter, "+16502532222")
    );
}

#[test]
fn aytf_us_dialling_abroad_with_idd() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!(
        vec![
            "0", "01", "011 ", "011 4", "011 44 ", "011 44 2", "011 44 20", "011 44 20 8",
            "011 44 20 87", "011 44 20 876", "011 44 20 8765", "011 44 20 8765 4",
            "011 44 20 8765 43", "011 44 20 8765 432", "011 44 20 8765 4321",
        ],
        type_all(&mut formatter, "011442087654321")
    );
}

#[test]
fn aytf_gb_fixed_line() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::gb());
    assert_eq!(
        vec![
            "0", "02", "020", "020 8", "020 87", "020 876", "020 8765", "020 8765 4",
            "020 8765 43", "020 8765 432", "020 8765 4321",
        ],
        type_all(&mut formatter, "02087654321")
    );
    assert_eq!("0", formatter.get_extracted_national_prefix());

    let parsed = phone_util.parse("02087654321", RegionCode::gb()).unwrap();
    assert_eq!(
        "020 8765 4321",
        phone_util.format(&parsed, PhoneNumberFormat::National).unwrap()
    );
}

#[test]
fn aytf_gb_international() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!(
        vec![
            "+", "+4", "+44 ", "+44 2", "+44 20", "+44 20 8", "+44 20 87", "+44 20 876",
            "+44 20 8765", "+44 20 8765 4", "+44 20 8765 43", "+44 20 8765 432",
            "+44 20 8765 4321",
        ],
        type_all(&mut formatter, "+442087654321")
    );
}

#[test]
fn aytf_unknown_region() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::zz());
    assert_eq!(
        vec![
            "+", "+1", "+1 6", "+1 65", "+1 650", "+1 650 2", "+1 650 25", "+1 650 253",
            "+1 650 253 2", "+1 650 253 22", "+1 650 253 222", "+1 650 253 2222",
        ],
        type_all(&mut formatter, "+16502532222")
    );

    // Without a plus sign nothing can be formatted.
    formatter.clear();
    assert_eq!(
        vec!["6", "65", "650", "6502", "65025"],
        type_all(&mut formatter, "65025")
    );
}

#[test]
fn aytf_gives_up_on_formatting_characters() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());
    assert_eq!(
        vec!["6", "65", "650", "650-", "650-2", "650-25"],
        type_all(&mut formatter, "650-25")
    );
}

#[test]
fn aytf_clear_resets_state() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::gb());
    type_all(&mut formatter, "+1650");
    formatter.clear();
    assert_eq!("", formatter.get_extracted_national_prefix());
    assert_eq!(
        vec!["0", "02", "020", "020 8"],
        type_all(&mut formatter, "0208")
    );
}

#[test]
fn aytf_remember_position() {
    let phone_util = get_phone_util();
    let mut formatter = phone_util.get_as_you_type_formatter(RegionCode::us());

    assert_eq!("6", formatter.input_digit_and_remember_position('6'));
    assert_eq!(1, formatter.get_remembered_position());
    type_all(&mut formatter, "50253");
    assert_eq!(1, formatter.get_remembered_position());

    formatter.clear();
    type_all(&mut formatter, "650");
    assert_eq!("650 2", formatter.input_digit_and_remember_position('2'));
    assert_eq!(5, formatter.get_remembered_position());
    assert_eq!(
        vec!["650 25", "650 253", "650 2532", "650 253 22", "650 253 222", "650 253 2222"],
        type_all(&mut formatter, "532222")
    );
    // The space inserted before the remembered digit moves it along.
    assert_eq!(5, formatter.get_remembered_position());
}
