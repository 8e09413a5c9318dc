//! パートの Content-Type 検出
//!
//! ## 概要
//!
//! パートヘッダーの `Content-Type:` 行から宣言されたメディアタイプを取り出します。
//! 指定がなければ `application/octet-stream` を返します (RFC 7578 Section 4.4)。
//!
//! リクエスト全体の Content-Type が multipart/form-data かどうかの判定もここで行います。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_formdata::content_type::{detect, is_form_data, DEFAULT_CONTENT_TYPE};
//!
//! let header = "Content-Disposition: form-data; name=\"a\"; filename=\"a.png\"\r\nContent-Type: image/png";
//! assert_eq!(detect(header), "image/png");
//! assert_eq!(detect("Content-Disposition: form-data; name=\"a\""), DEFAULT_CONTENT_TYPE);
//!
//! assert!(is_form_data("multipart/form-data; boundary=abc"));
//! assert!(!is_form_data("application/json"));
//! ```

/// Content-Type 指定がない場合の既定値
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// ヘッダーテキストから Content-Type を検出
///
/// ヘッダー名は大文字小文字を区別しない。値が空の行は無視する。
pub fn detect(header: &str) -> &str {
    header
        .split("\r\n")
        .filter_map(|line| line.split_once(':'))
        .find(|(name, value)| {
            name.trim().eq_ignore_ascii_case("Content-Type") && !value.trim().is_empty()
        })
        .map(|(_, value)| value.trim())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// リクエストの Content-Type が multipart/form-data かどうか
pub fn is_form_data(content_type: &str) -> bool {
    let (media_type, _) = split_at_semicolon(content_type);
    media_type.eq_ignore_ascii_case("multipart/form-data")
}

/// セミコロンで分割 (最初のセミコロンのみ)
fn split_at_semicolon(input: &str) -> (&str, &str) {
    if let Some(pos) = input.find(';') {
        (input[..pos].trim(), input[pos + 1..].trim())
    } else {
        (input.trim(), "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        let header = "Content-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\nContent-Type: text/plain";
        assert_eq!(detect(header), "text/plain");
    }

    #[test]
    fn test_detect_with_parameters() {
        let header = "Content-Type: text/plain; charset=utf-8";
        assert_eq!(detect(header), "text/plain; charset=utf-8");
    }

    #[test]
    fn test_detect_case_insensitive() {
        assert_eq!(detect("content-type:   image/jpeg  "), "image/jpeg");
    }

    #[test]
    fn test_detect_default() {
        assert_eq!(detect(""), DEFAULT_CONTENT_TYPE);
        assert_eq!(detect("Content-Disposition: form-data"), DEFAULT_CONTENT_TYPE);
        assert_eq!(detect("Content-Type:"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_is_form_data() {
        assert!(is_form_data("multipart/form-data"));
        assert!(is_form_data("Multipart/Form-Data; boundary=x"));
        assert!(!is_form_data("multipart/mixed; boundary=x"));
        assert!(!is_form_data("application/x-www-form-urlencoded"));
        assert!(!is_form_data(""));
    }

    #[test]
    fn test_split_at_semicolon() {
        assert_eq!(split_at_semicolon("a/b; c=d"), ("a/b", "c=d"));
        assert_eq!(split_at_semicolon("a/b"), ("a/b", ""));
    }
}
