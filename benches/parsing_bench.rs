use criterion::{Criterion, black_box, criterion_group, criterion_main};

use phonefmt::PhoneNumberUtil;

const METADATA: &str = include_str!("../src/tests/test_metadata.json");

/// A spread of inputs: plain national numbers, IDD and plus prefixes, a
/// transformed national prefix, an Italian leading zero and a vanity number.
fn setup_parsing_data() -> Vec<(&'static str, &'static str)> {
    vec![
        ("0011 54 9 11 8765 4321 ext. 1234", "AU"),
        ("(650) 253-0000", "US"),
        ("+44 20 8765 4321", "GB"),
        ("020 8765 4321", "GB"),
        ("011 15 8765-4321", "AR"),
        ("02 3661 8300", "IT"),
        ("1-800-FLOWERS", "US"),
        ("030 1234", "DE"),
    ]
}

fn parsing_benchmark(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let phone_util = PhoneNumberUtil::new_for_json(METADATA).expect("Metadata should be valid");
    let numbers_to_parse = setup_parsing_data();

    let mut group = c.benchmark_group("Parsing");

    group.bench_function("parse()", |b| {
        b.iter(|| {
            for (number_str, region) in &numbers_to_parse {
                let _ = phone_util.parse(black_box(number_str), black_box(region));
            }
        })
    });

    group.bench_function("parse_and_keep_raw_input()", |b| {
        b.iter(|| {
            for (number_str, region) in &numbers_to_parse {
                let _ = phone_util.parse_and_keep_raw_input(black_box(number_str), black_box(region));
            }
        })
    });

    group.bench_function("AsYouTypeFormatter::input_digit()", |b| {
        b.iter(|| {
            let mut formatter = phone_util.get_as_you_type_formatter("US");
            for digit in black_box("16502532222").chars() {
                formatter.input_digit(digit);
            }
        })
    });

    group.finish();
}

criterion_group!(benches, parsing_benchmark);
criterion_main!(benches);
