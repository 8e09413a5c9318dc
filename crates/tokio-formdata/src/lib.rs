//! tokio_formdata - Tokio integration for shiguredo_formdata
//!
//! tokio を使用した multipart/form-data の非同期デコーダー。
//! アップロードされたファイルは保存先に書き込み、その参照パスを結果に載せる。
//!
//! ## 特徴
//!
//! - **shiguredo_formdata ベース**: Sans I/O ライブラリをベースにした設計
//! - **非同期保存**: ファイルパートの書き込みは並行して行い、すべて完了してから結果を返す
//! - **デコード単位の追跡**: 書き込み待ちはデコードごとに管理し、同時リクエスト間で干渉しない
//! - **部分失敗**: 壊れたパートや保存に失敗したファイルは結果から外し、理由を報告する
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_formdata::{FormDataDecoder, UploadConfig};
//!
//! let decoder = FormDataDecoder::new().config(
//!     UploadConfig::new()
//!         .root_dir("uploads")
//!         .public_prefix("/uploads"),
//! );
//!
//! // Content-Type が multipart/form-data でなければ None
//! if let Some(body) = decoder.decode_request(&mut stream, content_type).await? {
//!     for (name, value) in body.fields() {
//!         println!("{} = {}", name, value);
//!     }
//!     if let Some(files) = body.files() {
//!         for (name, file) in files {
//!             println!("{} -> {} ({})", name, file.filepath(), file.content_type());
//!         }
//!     }
//! }
//! ```

pub mod buffer;
pub mod config;
pub mod decoder;
pub mod error;
pub mod pending;
pub mod storage;

pub use config::UploadConfig;
pub use decoder::{Decoded, FormDataDecoder, SkippedPart};
pub use error::{Error, Result};
pub use storage::{DiskStorage, Storage};

// shiguredo_formdata の型を re-export
pub use shiguredo_formdata::{Body, FileDescriptor, SkipReason};
