//! tokio-formdata エラー型

use std::fmt;

use shiguredo_formdata::BoundaryError;

/// tokio-formdata エラー
///
/// デコード全体を失敗させるものだけを表す。
/// パート単位の失敗は [`crate::SkippedPart`] として報告される。
#[derive(Debug)]
pub enum Error {
    /// I/O エラー (リクエストボディの読み取り失敗)
    Io(std::io::Error),
    /// boundary が見つからない
    MissingBoundary(BoundaryError),
    /// ボディサイズ超過
    BodyTooLarge { size: usize, limit: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::MissingBoundary(e) => write!(f, "{}", e),
            Error::BodyTooLarge { size, limit } => {
                write!(f, "body too large: {} > {}", size, limit)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::MissingBoundary(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<BoundaryError> for Error {
    fn from(e: BoundaryError) -> Self {
        Error::MissingBoundary(e)
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
