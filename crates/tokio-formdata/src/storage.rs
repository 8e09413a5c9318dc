//! ファイル保存先
//!
//! デコーダーが必要とするのは「指定パスにバイト列を書き込み、完了か失敗かを返す」ことだけ。

use std::future::Future;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

/// ファイル保存先
pub trait Storage: Send + Sync + 'static {
    /// `path` に `data` を新しいファイルとして書き込む
    fn write(&self, path: PathBuf, data: Vec<u8>) -> impl Future<Output = std::io::Result<()>> + Send;
}

/// ローカルファイルシステムへの保存
///
/// 親ディレクトリがなければ作成する。既存のファイルは上書きしない。
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStorage;

impl Storage for DiskStorage {
    async fn write(&self, path: PathBuf, data: Vec<u8>) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }
}
