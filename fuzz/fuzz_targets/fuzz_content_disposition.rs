#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_formdata::{PartHeader, PartKind};

fuzz_target!(|data: &[u8]| {
    // UTF-8 文字列として解釈できる場合のみテスト
    if let Ok(s) = std::str::from_utf8(data) {
        let header = PartHeader::parse(s);

        // 空のファイル名は返さない
        assert_ne!(header.filename(), Some(""));
        match header.kind() {
            PartKind::File => assert!(header.filename().is_some()),
            PartKind::Field => assert!(header.filename().is_none()),
        }

        // 再構築したヘッダーからも同じ結果になる
        if !header.name().is_empty() {
            let rebuilt = match header.filename() {
                Some(filename) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                    escape(header.name()),
                    escape(filename)
                ),
                None => format!(
                    "Content-Disposition: form-data; name=\"{}\"",
                    escape(header.name())
                ),
            };
            if !rebuilt.contains("\r\n") {
                assert_eq!(PartHeader::parse(&rebuilt), header);
            }
        }
    }
});

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
