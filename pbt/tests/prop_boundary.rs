//! 境界解決のプロパティテスト

use pbt::boundary_token;
use proptest::prelude::*;
use shiguredo_formdata::{Boundary, BoundaryError};

// 境界パラメータの表記ゆれ
fn boundary_param_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("boundary".to_string()),
        Just("BOUNDARY".to_string()),
        Just("Boundary".to_string()),
    ]
}

// デリミタは常に "--" + 境界文字列
proptest! {
    #[test]
    fn boundary_delimiter_prefix(
        token in boundary_token(),
        param in boundary_param_name(),
        quoted in any::<bool>(),
        trailing in prop_oneof![Just(""), Just("; charset=utf-8")]
    ) {
        let value = if quoted { format!("\"{}\"", token) } else { token.clone() };
        let content_type = format!("multipart/form-data; {}={}{}", param, value, trailing);

        let boundary = Boundary::from_content_type(Some(content_type.as_str())).unwrap();
        prop_assert_eq!(boundary.token(), token.as_bytes());
        prop_assert_eq!(&boundary.as_bytes()[..2], b"--");
        prop_assert_eq!(boundary.as_bytes().len(), token.len() + 2);
    }
}

// boundary パラメータがなければ失敗する
proptest! {
    #[test]
    fn boundary_missing_parameter(params in proptest::collection::vec("[a-z]{1,8}=[a-z0-9]{1,8}", 0..4)) {
        prop_assume!(params.iter().all(|p| !p.starts_with("boundary=")));
        let mut content_type = "multipart/form-data".to_string();
        for p in &params {
            content_type.push_str("; ");
            content_type.push_str(p);
        }
        prop_assert_eq!(
            Boundary::from_content_type(Some(content_type.as_str())),
            Err(BoundaryError::MissingBoundary)
        );
    }
}

// 任意の Content-Type でもパニックせず、成功すればデリミタは空にならない
proptest! {
    #[test]
    fn boundary_arbitrary_content_type(content_type in ".{0,96}") {
        if let Ok(boundary) = Boundary::from_content_type(Some(content_type.as_str())) {
            prop_assert!(boundary.as_bytes().len() > 2);
        }
    }
}
