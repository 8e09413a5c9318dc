//! # shiguredo_formdata
//!
//! 依存なしの multipart/form-data デコーダー (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: ファイル保存や乱数生成は呼び出し側が行う
//! - **バイト列ベース**: 境界や空行の検索はバイト列上で行い、バイナリを壊さない
//! - **部分失敗に強い**: 壊れたパートはスキップし、理由を [`SkipReason`] で返す
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_formdata::{Boundary, PartOutcome, parse};
//!
//! let body = b"--abc123\r\n\
//!     Content-Disposition: form-data; name=\"title\"\r\n\r\n\
//!     hello\r\n\
//!     --abc123--\r\n";
//!
//! let boundary = Boundary::from_content_type(Some("multipart/form-data; boundary=abc123")).unwrap();
//! for outcome in parse(body, &boundary) {
//!     match outcome {
//!         PartOutcome::Field { name, value } => println!("{} = {}", name, value),
//!         PartOutcome::File { name, filename, .. } => println!("{} <- {}", name, filename),
//!         PartOutcome::Skipped { reason, .. } => println!("skipped: {}", reason),
//!     }
//! }
//! ```
//!
//! ファイルの保存まで含めた非同期デコードは `tokio_formdata` クレートを使用してください。

mod body;
pub mod boundary;
pub mod content_disposition;
pub mod content_type;
pub mod filename;
pub mod multipart;

pub use body::{Body, FileDescriptor};
pub use boundary::{Boundary, BoundaryError};
pub use content_disposition::{PartHeader, PartKind};
pub use filename::FilenameError;
pub use multipart::{FormDataBuilder, PartOutcome, SkipReason, parse};
