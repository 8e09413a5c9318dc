#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiguredo_formdata::{Boundary, FormDataBuilder, PartOutcome, parse};

#[derive(Arbitrary, Debug)]
struct FuzzForm {
    fields: Vec<(String, String)>,
    files: Vec<(String, String, Vec<u8>)>,
}

const BOUNDARY: &str = "fuzz-boundary-6f1a2b3c";

/// ヘッダー行に載せられる空でない 1 行
fn header_safe(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_control) && !s.contains(BOUNDARY)
}

/// 空白だけの行を含まない値
fn value_safe(s: &str) -> bool {
    !s.chars().any(char::is_control)
        && !s.contains(BOUNDARY)
        && (s.is_empty() || !s.trim().is_empty())
}

fuzz_target!(|input: FuzzForm| {
    let delimiter = format!("--{}", BOUNDARY);
    let fields: Vec<_> = input
        .fields
        .into_iter()
        .filter(|(name, value)| header_safe(name) && value_safe(value))
        .take(16)
        .collect();
    let files: Vec<_> = input
        .files
        .into_iter()
        .filter(|(name, filename, data)| {
            header_safe(name)
                && header_safe(filename)
                && !data
                    .windows(delimiter.len())
                    .any(|w| w == delimiter.as_bytes())
        })
        .take(16)
        .collect();

    let mut builder = FormDataBuilder::with_boundary(BOUNDARY);
    for (name, value) in &fields {
        builder = builder.text_field(name, value);
    }
    for (name, filename, data) in &files {
        builder = builder.file_field(name, filename, "application/octet-stream", data);
    }

    let body = builder.build();
    let outcomes = parse(&body, &Boundary::new(BOUNDARY).unwrap());
    assert_eq!(outcomes.len(), fields.len() + files.len());

    for ((name, value), outcome) in fields.iter().zip(&outcomes) {
        assert_eq!(
            outcome,
            &PartOutcome::Field {
                name: name.clone(),
                value: value.clone(),
            }
        );
    }
    for ((name, filename, data), outcome) in files.iter().zip(&outcomes[fields.len()..]) {
        match outcome {
            PartOutcome::File {
                name: n,
                filename: f,
                payload,
                ..
            } => {
                assert_eq!(n, name);
                assert_eq!(f, filename);
                assert_eq!(*payload, data.as_slice());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
});
