//! multipart 境界の解決 (RFC 2046 Section 5.1.1)
//!
//! ## 概要
//!
//! Content-Type ヘッダーの `boundary` パラメータから、ボディ分割に使う
//! デリミタ (`--` + 境界文字列) を導出します。
//!
//! 値の妥当性は検証しません。不正な値はそのままデリミタになり、
//! 後段の分割でパートが見つからないという形でのみ表面化します。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_formdata::boundary::Boundary;
//!
//! let boundary = Boundary::from_content_type(Some("multipart/form-data; boundary=XYZ")).unwrap();
//! assert_eq!(boundary.as_bytes(), b"--XYZ");
//!
//! assert!(Boundary::from_content_type(None).is_err());
//! ```

use core::fmt;

use crate::content_disposition::{parse_param_value, split_params};

/// 境界解決エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// Content-Type ヘッダーがない
    MissingContentType,
    /// boundary パラメータがない、または値が空
    MissingBoundary,
}

impl fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryError::MissingContentType => write!(f, "no boundary found: missing content-type"),
            BoundaryError::MissingBoundary => write!(f, "no boundary found"),
        }
    }
}

impl std::error::Error for BoundaryError {}

/// パートを区切るデリミタ
///
/// 常に `--` で始まり、空になることはない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    delimiter: Vec<u8>,
}

impl Boundary {
    /// Content-Type ヘッダー値からデリミタを導出
    ///
    /// `boundary=` パラメータ名は大文字小文字を区別しない。
    /// 値は引用符の外にある次の `;` までで、前後の空白と二重引用符を取り除く。
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self, BoundaryError> {
        let content_type = content_type.ok_or(BoundaryError::MissingContentType)?;
        let value = boundary_parameter(content_type).ok_or(BoundaryError::MissingBoundary)?;
        Self::new(&value)
    }

    /// 境界文字列 (先頭の `--` を含まない) からデリミタを作成
    pub fn new(boundary: &str) -> Result<Self, BoundaryError> {
        if boundary.is_empty() {
            return Err(BoundaryError::MissingBoundary);
        }
        let mut delimiter = Vec::with_capacity(boundary.len() + 2);
        delimiter.extend_from_slice(b"--");
        delimiter.extend_from_slice(boundary.as_bytes());
        Ok(Boundary { delimiter })
    }

    /// デリミタ (`--` 付き) をバイト列として取得
    pub fn as_bytes(&self) -> &[u8] {
        &self.delimiter
    }

    /// 境界文字列 (`--` なし) を取得
    pub fn token(&self) -> &[u8] {
        &self.delimiter[2..]
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.delimiter))
    }
}

/// `boundary=` パラメータの値を取り出す
///
/// 引用符内の `;` はパラメータの区切りとみなさない。
fn boundary_parameter(content_type: &str) -> Option<String> {
    for param in split_params(content_type) {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        if !name.trim().eq_ignore_ascii_case("boundary") {
            continue;
        }
        return parse_param_value(value).filter(|v| !v.is_empty());
    }
    None
}
