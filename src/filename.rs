//! 保存用ファイル名の生成
//!
//! ## 概要
//!
//! クライアントが送ってきたファイル名の拡張子の前に、
//! 8 バイトの乱数から作った 16 桁の 16 進トークンを差し込みます。
//! 同じファイル名が同時にアップロードされても保存先が衝突しません。
//!
//! Sans I/O の原則に従い、乱数と現在時刻は呼び出し側が渡します。
//!
//! ファイル名はそのままパスの一部になるため、以下は拒否します。
//!
//! - `/` `\` NUL などの制御文字を含む
//! - `.` または `..`
//! - 英数字以外を含む拡張子
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_formdata::filename::{generate, placeholder};
//!
//! let name = generate("pic.png", [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01, 0x02, 0x03]).unwrap();
//! assert_eq!(name, "picdeadbeef00010203.png");
//!
//! assert!(generate("../etc/passwd", [0; 8]).is_err());
//! assert_eq!(placeholder(1700000000000), "unknown_file_1700000000000");
//! ```

use core::fmt;

/// ファイル名生成エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    /// パス区切りや制御文字を含む
    UnsafeCharacter,
    /// `.` または `..`
    Reserved,
    /// 拡張子が英数字以外を含む
    InvalidExtension,
}

impl fmt::Display for FilenameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilenameError::UnsafeCharacter => write!(f, "filename contains unsafe character"),
            FilenameError::Reserved => write!(f, "reserved filename"),
            FilenameError::InvalidExtension => write!(f, "invalid filename extension"),
        }
    }
}

impl std::error::Error for FilenameError {}

/// ファイル名がない場合の仮の名前
pub fn placeholder(unix_millis: u128) -> String {
    format!("unknown_file_{}", unix_millis)
}

/// `base + token + "." + extension` 形式の保存用ファイル名を作成
///
/// 最後の `.` より後ろを拡張子とみなす。`.` がなければ拡張子は付けない。
pub fn generate(original: &str, random: [u8; 8]) -> Result<String, FilenameError> {
    validate(original)?;

    let token = hex_token(random);
    match original.rsplit_once('.') {
        Some((base, extension)) => {
            if extension.is_empty() || !extension.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(FilenameError::InvalidExtension);
            }
            Ok(format!("{}{}.{}", base, token, extension))
        }
        None => Ok(format!("{}{}", original, token)),
    }
}

fn validate(original: &str) -> Result<(), FilenameError> {
    if original == "." || original == ".." {
        return Err(FilenameError::Reserved);
    }
    if original
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        return Err(FilenameError::UnsafeCharacter);
    }
    Ok(())
}

fn hex_token(random: [u8; 8]) -> String {
    let mut token = String::with_capacity(16);
    for byte in random {
        token.push_str(&format!("{:02x}", byte));
    }
    token
}
