//! アップロード設定

use std::path::{Path, PathBuf};

/// アップロード設定
///
/// 保存先のパス (`root_dir`) と、結果に載せる公開用の参照パス (`public_prefix`) は
/// 同じファイル名から別々に組み立てる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// 保存先ディレクトリ (デフォルト: カレントディレクトリの `uploads`)
    root_dir: PathBuf,
    /// 公開用パスの接頭辞 (デフォルト: `/uploads`)
    public_prefix: String,
    /// バッファリングするボディの最大サイズ (デフォルト: 10MB)
    max_body_size: usize,
    /// 読み取りバッファサイズ (デフォルト: 8KB)
    read_buffer_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("uploads"),
            public_prefix: "/uploads".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            read_buffer_size: 8192,
        }
    }
}

impl UploadConfig {
    /// デフォルト設定を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存先ディレクトリを設定
    pub fn root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = dir.into();
        self
    }

    /// 公開用パスの接頭辞を設定
    pub fn public_prefix(mut self, prefix: &str) -> Self {
        self.public_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    /// ボディの最大サイズを設定
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// 保存先ディレクトリを取得
    pub fn get_root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// ボディの最大サイズを取得
    pub fn get_max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// 読み取りバッファサイズを取得
    pub fn get_read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// 保存先のパス
    pub fn storage_path(&self, filename: &str) -> PathBuf {
        self.root_dir.join(filename)
    }

    /// 結果に載せる公開用の参照パス
    pub fn public_path(&self, filename: &str) -> String {
        format!("{}/{}", self.public_prefix, filename)
    }
}
