//! パートヘッダーの Content-Disposition パース (RFC 7578 Section 4.2)
//!
//! ## 概要
//!
//! multipart/form-data の各パートのヘッダーブロックから、
//! フィールド名 (`name`) とファイル名 (`filename`) を取り出します。
//!
//! - パラメータは二重引用符の外側にある `;` で分割する
//! - 値は quoted-string (バックスラッシュエスケープ対応) または token
//! - パラメータ名は大文字小文字を区別せず完全一致で比較する (`filename` 内の `name` には一致しない)
//! - 空の値は指定なしとして扱う
//! - 同じパラメータが複数ある場合は最初のものを採用する
//! - `filename*` (RFC 5987) があれば `filename` より優先する
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_formdata::content_disposition::PartHeader;
//!
//! let header = PartHeader::parse(
//!     "Content-Disposition: form-data; name=\"avatar\"; filename=\"pic.png\"",
//! );
//! assert_eq!(header.name(), "avatar");
//! assert_eq!(header.filename(), Some("pic.png"));
//! assert!(header.is_file());
//! ```

/// パートの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// 通常のキーと値
    Field,
    /// ファイルアップロード
    File,
}

/// パートヘッダー
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartHeader {
    name: String,
    filename: Option<String>,
}

impl PartHeader {
    /// 空行を取り除いたヘッダーテキストをパース
    ///
    /// Content-Disposition 行があればそれを、なければ最初の空でない行を対象にする。
    /// name が見つからない場合は空文字列になる。
    pub fn parse(header: &str) -> Self {
        let Some(line) = disposition_line(header) else {
            return PartHeader::default();
        };

        let mut name = None;
        let mut filename = None;
        let mut filename_ext = None;

        for param in split_params(line).iter().skip(1) {
            let Some((param_name, param_value)) = param.split_once('=') else {
                continue;
            };
            let param_name = param_name.trim().to_ascii_lowercase();
            let slot = match param_name.as_str() {
                "name" => &mut name,
                "filename" => &mut filename,
                "filename*" => {
                    if filename_ext.is_none() {
                        filename_ext = parse_ext_value(param_value).filter(|v| !v.is_empty());
                    }
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = parse_param_value(param_value).filter(|v| !v.is_empty());
            }
        }

        PartHeader {
            name: name.unwrap_or_default(),
            filename: filename_ext.or(filename),
        }
    }

    /// ヘッダーを直接作成
    pub fn new(name: &str, filename: Option<&str>) -> Self {
        PartHeader {
            name: name.to_string(),
            filename: filename.map(str::to_string),
        }
    }

    /// フィールド名を取得 (見つからなければ空文字列)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// ファイル名を取得
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// パートを分類する
    ///
    /// 空でない filename を持つパートはファイル、それ以外はフィールド。
    pub fn kind(&self) -> PartKind {
        match self.filename.as_deref() {
            Some(f) if !f.is_empty() => PartKind::File,
            _ => PartKind::Field,
        }
    }

    /// ファイルパートかどうか
    pub fn is_file(&self) -> bool {
        self.kind() == PartKind::File
    }
}

/// Content-Disposition の値部分を取り出す
fn disposition_line(header: &str) -> Option<&str> {
    let mut first = None;
    for line in header.split("\r\n") {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.trim().eq_ignore_ascii_case("Content-Disposition")
        {
            return Some(value.trim());
        }
        if first.is_none() {
            first = Some(line);
        }
    }
    first
}

/// 引用符を考慮してセミコロンで分割
pub(crate) fn split_params(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape_next = false;

    for c in input.chars() {
        if escape_next {
            current.push(c);
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_quotes => {
                current.push(c);
                escape_next = true;
            }
            '"' => {
                current.push(c);
                in_quotes = !in_quotes;
            }
            ';' if !in_quotes => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

/// パラメータ値をパース (引用符付きまたはトークン)
///
/// 閉じ引用符がない場合は None。
pub(crate) fn parse_param_value(value: &str) -> Option<String> {
    let value = value.trim();

    if let Some(quoted) = value.strip_prefix('"') {
        let inner = quoted.strip_suffix('"')?;
        parse_quoted_string(inner)
    } else {
        Some(value.to_string())
    }
}

/// 引用符付き文字列をパース (エスケープ処理)
fn parse_quoted_string(s: &str) -> Option<String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            result.push(chars.next()?);
        } else {
            result.push(c);
        }
    }

    Some(result)
}

/// RFC 5987 ext-value をパース
///
/// 形式: charset'language'value (charset は UTF-8 のみ)
fn parse_ext_value(value: &str) -> Option<String> {
    let value = value.trim();
    let (charset, rest) = value.split_once('\'')?;
    let (_language, encoded) = rest.split_once('\'')?;

    if !charset.eq_ignore_ascii_case("UTF-8") {
        return None;
    }

    percent_decode(encoded)
}

/// パーセントデコード
fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            let hex = std::str::from_utf8(hex).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).ok()
}
