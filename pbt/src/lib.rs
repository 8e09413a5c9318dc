//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// フォーム要素生成
// ========================================

/// フィールド名: 先頭は英字
pub fn field_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,15}".prop_map(|s| s)
}

/// テキスト値: 空白だけの行にならない 1 行の値 (空も含む)
pub fn text_value() -> impl Strategy<Value = String> {
    "([a-zA-Z0-9][a-zA-Z0-9 .,!?]{0,63})?".prop_map(|s| s)
}

/// クライアントが送るファイル名: base.ext
pub fn client_filename() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,16}\\.[a-z0-9]{1,4}".prop_map(|s| s)
}

/// 境界文字列
pub fn boundary_token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9'()+_,-]{7,39}".prop_map(|s| s)
}

/// MIME タイプ
pub fn mime_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("text/plain".to_string()),
        Just("application/json".to_string()),
        Just("application/octet-stream".to_string()),
        Just("image/png".to_string()),
        Just("image/jpeg".to_string()),
    ]
}

/// ファイルの中身 (任意のバイト列)
pub fn payload() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

// ========================================
// フォーム全体の生成
// ========================================

/// ファイルパート
#[derive(Debug, Clone)]
pub struct FilePart {
    pub name: String,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// 名前が重複しないフィールド群とファイル群
///
/// フィールド名には `t_`、ファイルのフィールド名には `f_` を付けて衝突を避ける。
pub fn form() -> impl Strategy<Value = (Vec<(String, String)>, Vec<FilePart>)> {
    (
        proptest::collection::btree_map(field_name(), text_value(), 0..6),
        proptest::collection::btree_map(
            field_name(),
            (client_filename(), mime_type(), payload()),
            0..4,
        ),
    )
        .prop_map(|(fields, files)| {
            let fields = fields
                .into_iter()
                .map(|(name, value)| (format!("t_{}", name), value))
                .collect();
            let files = files
                .into_iter()
                .map(|(name, (filename, content_type, data))| FilePart {
                    name: format!("f_{}", name),
                    filename,
                    content_type,
                    data,
                })
                .collect();
            (fields, files)
        })
}
