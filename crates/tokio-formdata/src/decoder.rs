//! multipart/form-data デコーダー
//!
//! パートを順番に分類し、フィールドはその場で結果に設定する。
//! ファイルは保存を非同期に開始し、すべての保存が終わってから結果に載せる。
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_formdata::{FormDataDecoder, UploadConfig};
//!
//! let decoder = FormDataDecoder::new().config(UploadConfig::new().root_dir("uploads"));
//! let body = decoder
//!     .decode(&buffer, Some("multipart/form-data; boundary=abc123"))
//!     .await?;
//!
//! println!("{:?}", body.field("title"));
//! if let Some(file) = body.file("avatar") {
//!     println!("{} ({})", file.filepath(), file.content_type());
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use shiguredo_formdata::content_type::is_form_data;
use shiguredo_formdata::{filename, multipart};
use shiguredo_formdata::{Body, Boundary, FileDescriptor, PartOutcome, SkipReason};
use tokio::io::AsyncRead;

use crate::buffer::read_body;
use crate::config::UploadConfig;
use crate::error::Result;
use crate::pending::{PendingWrites, WriteTicket};
use crate::storage::{DiskStorage, Storage};

/// 読み飛ばしたパート
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPart {
    /// パート番号 (空の断片を除いた 0 始まり)
    pub index: usize,
    /// フィールド名 (分かっている場合)
    pub name: Option<String>,
    /// 理由
    pub reason: SkipReason,
}

/// デコード結果と読み飛ばしたパートの一覧
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    pub body: Body,
    pub skipped: Vec<SkippedPart>,
}

/// multipart/form-data デコーダー
#[derive(Debug)]
pub struct FormDataDecoder<S = DiskStorage> {
    config: UploadConfig,
    storage: Arc<S>,
}

impl FormDataDecoder<DiskStorage> {
    /// ローカルファイルシステムに保存するデコーダーを作成
    pub fn new() -> Self {
        Self::with_storage(DiskStorage)
    }
}

impl Default for FormDataDecoder<DiskStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> FormDataDecoder<S> {
    /// 保存先を指定して作成
    pub fn with_storage(storage: S) -> Self {
        Self {
            config: UploadConfig::default(),
            storage: Arc::new(storage),
        }
    }

    /// 設定を指定
    pub fn config(mut self, config: UploadConfig) -> Self {
        self.config = config;
        self
    }

    /// 設定を取得
    pub fn get_config(&self) -> &UploadConfig {
        &self.config
    }

    /// Content-Type が multipart/form-data のときだけボディを読み込んでデコードする
    ///
    /// それ以外の Content-Type (またはヘッダーなし) では何も読まずに `None` を返す。
    pub async fn decode_request<R>(
        &self,
        reader: &mut R,
        content_type: Option<&str>,
    ) -> Result<Option<Body>>
    where
        R: AsyncRead + Unpin,
    {
        match content_type {
            Some(ct) if is_form_data(ct) => {
                let decoded = self.decode_reader(reader, Some(ct)).await?;
                Ok(Some(decoded.body))
            }
            _ => Ok(None),
        }
    }

    /// ストリームをすべて読み込んでからデコードする
    pub async fn decode_reader<R>(&self, reader: &mut R, content_type: Option<&str>) -> Result<Decoded>
    where
        R: AsyncRead + Unpin,
    {
        let buffer = read_body(
            reader,
            self.config.get_max_body_size(),
            self.config.get_read_buffer_size(),
        )
        .await?;
        self.decode_with_report(&buffer, content_type).await
    }

    /// バッファ済みのボディをデコードする
    pub async fn decode(&self, buffer: &[u8], content_type: Option<&str>) -> Result<Body> {
        Ok(self.decode_with_report(buffer, content_type).await?.body)
    }

    /// バッファ済みのボディをデコードし、読み飛ばしたパートも返す
    ///
    /// boundary が見つからない場合のみ失敗する。
    /// パート単位の失敗は [`Decoded::skipped`] に積まれ、そのパートは結果に現れない。
    pub async fn decode_with_report(
        &self,
        buffer: &[u8],
        content_type: Option<&str>,
    ) -> Result<Decoded> {
        let boundary = Boundary::from_content_type(content_type)?;

        let mut decoded = Decoded::default();
        let mut pending = PendingWrites::new();
        // フィールド名ごとに最後に現れたフィールドパートの番号
        let mut last_field: HashMap<String, usize> = HashMap::new();

        for (index, outcome) in multipart::parse(buffer, &boundary).into_iter().enumerate() {
            match outcome {
                PartOutcome::Field { name, value } => {
                    tracing::debug!(index, name = %name, "field part");
                    decoded.body.set_field(&name, &value);
                    last_field.insert(name, index);
                }
                PartOutcome::File {
                    name,
                    filename: client_filename,
                    content_type,
                    payload,
                    separator_found,
                } => {
                    if !separator_found {
                        tracing::error!(index, name = %name, "could not find binary content start");
                    }
                    let original = match client_filename.trim() {
                        "" => filename::placeholder(unix_millis()),
                        f => f.to_string(),
                    };
                    let stored_filename =
                        match filename::generate(&original, rand::random::<u64>().to_be_bytes()) {
                            Ok(f) => f,
                            Err(e) => {
                                tracing::warn!(index, name = %name, filename = %original, "rejected filename: {}", e);
                                decoded.skipped.push(SkippedPart {
                                    index,
                                    name: Some(name),
                                    reason: SkipReason::UnsafeFilename(e),
                                });
                                continue;
                            }
                        };

                    tracing::debug!(index, name = %name, stored = %stored_filename, size = payload.len(), "file part");
                    let path = self.config.storage_path(&stored_filename);
                    let storage = self.storage.clone();
                    let data = payload.to_vec();
                    pending.spawn(
                        WriteTicket {
                            index,
                            name,
                            stored_filename,
                            content_type,
                        },
                        async move { storage.write(path, data).await },
                    );
                }
                PartOutcome::Skipped { name, reason } => {
                    tracing::warn!(index, name = ?name, "skipped part: {}", reason);
                    decoded.skipped.push(SkippedPart {
                        index,
                        name,
                        reason,
                    });
                }
            }
        }

        let settled_writes = pending.settle().await;

        // 書き込みに失敗したパートは勝者にならない
        let mut winners = last_field;
        for settled in &settled_writes {
            if settled.result.is_ok() {
                let winner = winners
                    .entry(settled.ticket.name.clone())
                    .or_insert(settled.ticket.index);
                *winner = (*winner).max(settled.ticket.index);
            }
        }

        for settled in settled_writes {
            let ticket = settled.ticket;
            match settled.result {
                Ok(()) => {
                    if winners.get(&ticket.name) != Some(&ticket.index) {
                        tracing::debug!(index = ticket.index, name = %ticket.name, "file superseded by a later part");
                        continue;
                    }
                    let descriptor = FileDescriptor::new(
                        &self.config.public_path(&ticket.stored_filename),
                        &ticket.content_type,
                    );
                    decoded.body.set_file(&ticket.name, descriptor);
                }
                Err(e) => {
                    tracing::error!(index = ticket.index, name = %ticket.name, "error writing binary file: {}", e);
                    decoded.skipped.push(SkippedPart {
                        index: ticket.index,
                        name: Some(ticket.name),
                        reason: SkipReason::WriteFailed(e),
                    });
                }
            }
        }

        decoded.skipped.sort_by_key(|s| s.index);
        Ok(decoded)
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
