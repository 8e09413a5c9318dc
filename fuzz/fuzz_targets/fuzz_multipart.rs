#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_formdata::{Boundary, PartOutcome, parse};

fuzz_target!(|data: &[u8]| {
    // 様々な境界でパースを試行
    let boundaries = ["boundary", "----WebKitFormBoundary", "abc123", "-"];

    for boundary in boundaries {
        let Ok(boundary) = Boundary::new(boundary) else {
            continue;
        };

        // パニックしなければ OK
        for outcome in parse(data, &boundary) {
            match outcome {
                PartOutcome::Field { name, .. } => assert!(!name.is_empty()),
                PartOutcome::File {
                    name,
                    filename,
                    payload,
                    separator_found,
                    ..
                } => {
                    assert!(!name.is_empty());
                    assert!(!filename.is_empty());
                    assert!(payload.len() <= data.len());
                    if !separator_found {
                        assert!(payload.is_empty());
                    }
                }
                PartOutcome::Skipped { reason, .. } => {
                    let _ = reason.to_string();
                }
            }
        }
    }

    // 入力の先頭行を Content-Type とみなして境界を導出
    if let Some(line) = data.split(|&b| b == b'\n').next()
        && let Ok(content_type) = std::str::from_utf8(line)
        && let Ok(boundary) = Boundary::from_content_type(Some(content_type))
    {
        let _ = parse(data, &boundary);
    }
});
