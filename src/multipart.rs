//! multipart/form-data のパート分割と分類 (RFC 7578)
//!
//! ## 概要
//!
//! バッファ全体をデリミタで分割し、各パートをフィールドかファイルに分類します。
//! パートの解析に失敗しても全体は失敗せず、そのパートを [`PartOutcome::Skipped`] として返します。
//!
//! 境界や空行の検索はすべてバイト列上で行い、ファイルの中身を文字列として扱うことはありません。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_formdata::boundary::Boundary;
//! use shiguredo_formdata::multipart::{parse, FormDataBuilder, PartOutcome};
//!
//! let builder = FormDataBuilder::with_boundary("abc123")
//!     .text_field("title", "hello")
//!     .file_field("avatar", "pic.png", "image/png", b"\x89PNG\r\n\x1a\n\0\0");
//! let body = builder.build();
//!
//! let boundary = Boundary::from_content_type(Some(builder.content_type().as_str())).unwrap();
//! let outcomes = parse(&body, &boundary);
//!
//! assert!(matches!(&outcomes[0], PartOutcome::Field { name, value } if name == "title" && value == "hello"));
//! match &outcomes[1] {
//!     PartOutcome::File { name, payload, .. } => {
//!         assert_eq!(name, "avatar");
//!         assert_eq!(payload.len(), 10);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use core::fmt;

use crate::boundary::Boundary;
use crate::content_disposition::{PartHeader, PartKind};
use crate::content_type;
use crate::filename::FilenameError;

const BLANK_LINE: &[u8] = b"\r\n\r\n";

/// パートを読み飛ばした理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// ヘッダーブロックが UTF-8 ではない
    InvalidHeader,
    /// name 属性がない
    MissingName,
    /// フィールド値が UTF-8 ではない
    InvalidFieldValue,
    /// クライアントのファイル名を保存に使えない
    UnsafeFilename(FilenameError),
    /// ファイルの保存に失敗した
    WriteFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidHeader => write!(f, "invalid part header"),
            SkipReason::MissingName => write!(f, "missing name attribute"),
            SkipReason::InvalidFieldValue => write!(f, "field value is not valid UTF-8"),
            SkipReason::UnsafeFilename(e) => write!(f, "unsafe filename: {}", e),
            SkipReason::WriteFailed(e) => write!(f, "write failed: {}", e),
        }
    }
}

/// 1 パートの解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOutcome<'a> {
    /// 通常のフィールド
    Field { name: String, value: String },
    /// ファイルアップロード
    File {
        name: String,
        filename: String,
        content_type: String,
        payload: &'a [u8],
        /// ヘッダーとボディの区切り (空行) が見つかったかどうか
        ///
        /// false の場合 payload は空。
        separator_found: bool,
    },
    /// 読み飛ばしたパート
    Skipped {
        name: Option<String>,
        reason: SkipReason,
    },
}

/// バッファ全体を解析して、パートごとの結果を順番に返す
pub fn parse<'a>(buffer: &'a [u8], boundary: &Boundary) -> Vec<PartOutcome<'a>> {
    split_parts(buffer, boundary)
        .into_iter()
        .map(|raw| parse_part(raw, boundary))
        .collect()
}

/// バッファをデリミタで分割
///
/// 最後の断片 (終了デリミタの `--` 以降) は捨てる。
/// 空白だけの断片 (先頭のプリアンブルが空の場合など) も返さない。
pub fn split_parts<'a>(buffer: &'a [u8], boundary: &Boundary) -> Vec<&'a [u8]> {
    let delimiter = boundary.as_bytes();
    let mut fragments = Vec::new();
    let mut rest = buffer;

    while let Some(pos) = find_bytes(rest, delimiter) {
        fragments.push(&rest[..pos]);
        rest = &rest[pos + delimiter.len()..];
    }
    // 最後の断片は終了デリミタの残り、または境界が見つからなかったバッファ全体

    fragments
        .into_iter()
        .filter(|fragment| !fragment.iter().all(u8::is_ascii_whitespace))
        .collect()
}

/// 1 パートを解析して分類する
pub fn parse_part<'a>(raw: &'a [u8], boundary: &Boundary) -> PartOutcome<'a> {
    let header_bytes = match find_bytes(raw, BLANK_LINE) {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let Ok(header_text) = std::str::from_utf8(header_bytes) else {
        return PartOutcome::Skipped {
            name: None,
            reason: SkipReason::InvalidHeader,
        };
    };
    let header_text = strip_blank_lines(header_text);

    let header = PartHeader::parse(&header_text);
    if header.name().is_empty() {
        return PartOutcome::Skipped {
            name: None,
            reason: SkipReason::MissingName,
        };
    }
    let name = header.name().to_string();

    let payload = extract_payload(raw, boundary);
    let separator_found = payload.is_some();
    let payload = payload.unwrap_or_default();

    match header.kind() {
        PartKind::Field => match std::str::from_utf8(payload) {
            Ok(value) => PartOutcome::Field {
                name,
                value: strip_blank_lines(value),
            },
            Err(_) => PartOutcome::Skipped {
                name: Some(name),
                reason: SkipReason::InvalidFieldValue,
            },
        },
        PartKind::File => PartOutcome::File {
            name,
            filename: header.filename().unwrap_or_default().to_string(),
            content_type: content_type::detect(&header_text).to_string(),
            payload,
            separator_found,
        },
    }
}

/// パートからボディのバイト列を取り出す
///
/// 最初の空行 (`\r\n\r\n`) の直後から、次のデリミタ (なければパートの終わり) までを返す。
/// デリミタ直前の CRLF はデリミタの一部なので含めない。
/// 空行が見つからない場合は None。
pub fn extract_payload<'a>(raw: &'a [u8], boundary: &Boundary) -> Option<&'a [u8]> {
    let start = find_bytes(raw, BLANK_LINE)? + BLANK_LINE.len();
    let rest = &raw[start..];
    let end = find_bytes(rest, boundary.as_bytes()).unwrap_or(rest.len());
    let payload = &rest[..end];
    Some(payload.strip_suffix(b"\r\n").unwrap_or(payload))
}

/// 空白だけの行を取り除き、残りの行を CRLF で連結する
pub fn strip_blank_lines(text: &str) -> String {
    text.split("\r\n")
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// multipart ボディビルダー
#[derive(Debug, Clone)]
pub struct FormDataBuilder {
    /// 境界文字列
    boundary: String,
    /// パート
    parts: Vec<BuilderPart>,
}

#[derive(Debug, Clone)]
struct BuilderPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl FormDataBuilder {
    /// 乱数値を受け取って境界を生成する
    ///
    /// Sans I/O の原則に従い、乱数生成は呼び出し側の責任となる。
    ///
    /// # 例
    ///
    /// ```
    /// use shiguredo_formdata::multipart::FormDataBuilder;
    ///
    /// let builder = FormDataBuilder::new(12345678901234567890);
    /// assert!(builder.boundary().starts_with("----FormBoundary"));
    /// ```
    pub fn new(random_value: u64) -> Self {
        Self::with_boundary(&format!("----FormBoundary{}", random_value))
    }

    /// 境界を指定して作成
    pub fn with_boundary(boundary: &str) -> Self {
        FormDataBuilder {
            boundary: boundary.to_string(),
            parts: Vec::new(),
        }
    }

    /// 境界文字列を取得
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Content-Type ヘッダー値を取得
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// テキストフィールドを追加
    pub fn text_field(mut self, name: &str, value: &str) -> Self {
        self.parts.push(BuilderPart {
            name: name.to_string(),
            filename: None,
            content_type: None,
            body: value.as_bytes().to_vec(),
        });
        self
    }

    /// ファイルフィールドを追加
    pub fn file_field(
        mut self,
        name: &str,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Self {
        self.parts.push(BuilderPart {
            name: name.to_string(),
            filename: Some(filename.to_string()),
            content_type: Some(content_type.to_string()),
            body: data.to_vec(),
        });
        self
    }

    /// ボディをビルド
    pub fn build(&self) -> Vec<u8> {
        let mut result = Vec::new();

        for part in &self.parts {
            // 境界
            result.extend_from_slice(b"--");
            result.extend_from_slice(self.boundary.as_bytes());
            result.extend_from_slice(b"\r\n");

            result.extend_from_slice(b"Content-Disposition: form-data; name=\"");
            result.extend_from_slice(escape_quoted_string(&part.name).as_bytes());
            result.extend_from_slice(b"\"");
            if let Some(filename) = &part.filename {
                result.extend_from_slice(b"; filename=\"");
                result.extend_from_slice(escape_quoted_string(filename).as_bytes());
                result.extend_from_slice(b"\"");
            }
            result.extend_from_slice(b"\r\n");

            if let Some(ct) = &part.content_type {
                result.extend_from_slice(b"Content-Type: ");
                result.extend_from_slice(ct.as_bytes());
                result.extend_from_slice(b"\r\n");
            }

            // ヘッダーとボディの区切り
            result.extend_from_slice(b"\r\n");

            result.extend_from_slice(&part.body);
            result.extend_from_slice(b"\r\n");
        }

        // 終了境界
        result.extend_from_slice(b"--");
        result.extend_from_slice(self.boundary.as_bytes());
        result.extend_from_slice(b"--\r\n");

        result
    }
}

/// 引用符付き文字列用にエスケープ
fn escape_quoted_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '"' || c == '\\' {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// バイト列から部分列を検索
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }

    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
