//! multipart/form-data パースのプロパティテスト

use pbt::{FilePart, boundary_token, field_name, form, payload, text_value};
use proptest::prelude::*;
use shiguredo_formdata::{Boundary, FormDataBuilder, PartOutcome, SkipReason, parse};

fn build(boundary: &str, fields: &[(String, String)], files: &[FilePart]) -> Vec<u8> {
    let mut builder = FormDataBuilder::with_boundary(boundary);
    for (name, value) in fields {
        builder = builder.text_field(name, value);
    }
    for file in files {
        builder = builder.file_field(&file.name, &file.filename, &file.content_type, &file.data);
    }
    builder.build()
}

// ========================================
// ラウンドトリップ
// ========================================

// ビルダーで組み立てたボディはパート数も中身もそのまま戻る
proptest! {
    #[test]
    fn multipart_form_roundtrip(token in boundary_token(), (fields, files) in form()) {
        let body = build(&token, &fields, &files);
        let boundary = Boundary::new(&token).unwrap();
        let outcomes = parse(&body, &boundary);

        prop_assert_eq!(outcomes.len(), fields.len() + files.len());

        for ((name, value), outcome) in fields.iter().zip(&outcomes) {
            prop_assert_eq!(
                outcome,
                &PartOutcome::Field { name: name.clone(), value: value.clone() }
            );
        }

        for (file, outcome) in files.iter().zip(&outcomes[fields.len()..]) {
            match outcome {
                PartOutcome::File { name, filename, content_type, payload, separator_found } => {
                    prop_assert_eq!(name, &file.name);
                    prop_assert_eq!(filename, &file.filename);
                    prop_assert_eq!(content_type, &file.content_type);
                    prop_assert_eq!(*payload, file.data.as_slice());
                    prop_assert!(*separator_found);
                }
                other => prop_assert!(false, "unexpected outcome: {:?}", other),
            }
        }
    }
}

// Content-Type ヘッダー経由で導出した境界でも同じ結果になる
proptest! {
    #[test]
    fn multipart_boundary_from_builder_content_type(
        token in boundary_token(),
        name in field_name(),
        value in text_value()
    ) {
        let builder = FormDataBuilder::with_boundary(&token).text_field(&name, &value);
        let boundary = Boundary::from_content_type(Some(builder.content_type().as_str())).unwrap();

        let body = builder.build();
        let outcomes = parse(&body, &boundary);
        prop_assert_eq!(outcomes, vec![PartOutcome::Field { name, value }]);
    }
}

// ========================================
// 部分失敗
// ========================================

// 壊れたパートを挟んでも前後のパートは失われない
proptest! {
    #[test]
    fn multipart_garbage_part_is_isolated(
        token in boundary_token(),
        before in field_name(),
        after in field_name(),
        garbage in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,31}"
    ) {
        let head = FormDataBuilder::with_boundary(&token).text_field(&before, "1").build();
        let tail = FormDataBuilder::with_boundary(&token).text_field(&after, "2").build();

        // head の終了デリミタを外し、名前のないパートを挟む
        let closing = format!("--{}--\r\n", token);
        let mut body = head[..head.len() - closing.len()].to_vec();
        body.extend_from_slice(format!("--{}\r\n{}\r\n\r\n", token, garbage).as_bytes());
        body.extend_from_slice(&tail);

        let outcomes = parse(&body, &Boundary::new(&token).unwrap());
        prop_assert_eq!(outcomes.len(), 3);
        prop_assert_eq!(&outcomes[0], &PartOutcome::Field { name: before, value: "1".to_string() });
        prop_assert_eq!(
            &outcomes[1],
            &PartOutcome::Skipped { name: None, reason: SkipReason::MissingName }
        );
        prop_assert_eq!(&outcomes[2], &PartOutcome::Field { name: after, value: "2".to_string() });
    }
}

// 境界が一致しなければ何も取り出さない
proptest! {
    #[test]
    fn multipart_wrong_boundary_yields_nothing(
        token in boundary_token(),
        (fields, files) in form()
    ) {
        let body = build(&token, &fields, &files);
        // 本来のデリミタの直後は CRLF か -- なので、末尾に X を足した境界は現れない
        let other = Boundary::new(&format!("{}X", token)).unwrap();
        prop_assert!(parse(&body, &other).is_empty());
    }
}

// ========================================
// 任意入力
// ========================================

// 任意のバイト列でもパニックせず、ペイロードは入力の部分列
proptest! {
    #[test]
    fn multipart_arbitrary_input_never_panics(data in payload(), token in boundary_token()) {
        let boundary = Boundary::new(&token).unwrap();
        for outcome in parse(&data, &boundary) {
            if let PartOutcome::File { payload, .. } = outcome {
                prop_assert!(payload.len() <= data.len());
            }
        }
    }
}

// 境界文字列を散りばめた入力でもパニックしない
proptest! {
    #[test]
    fn multipart_delimiter_heavy_input_never_panics(
        chunks in proptest::collection::vec(
            prop_oneof![
                Just(b"--b".to_vec()),
                Just(b"--b--".to_vec()),
                Just(b"\r\n".to_vec()),
                Just(b"\r\n\r\n".to_vec()),
                Just(b"Content-Disposition: form-data; name=\"x\"".to_vec()),
                Just(b"; filename=\"a.txt\"".to_vec()),
                proptest::collection::vec(any::<u8>(), 0..8),
            ],
            0..32
        )
    ) {
        let data = chunks.concat();
        let _ = parse(&data, &Boundary::new("b").unwrap());
    }
}
