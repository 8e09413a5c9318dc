//! デコード結果
//!
//! フィールド名から文字列値へのマップと、
//! フィールド名から保存済みファイル情報へのマップを持ちます。
//! 同じ名前が両方のマップに同時に現れることはありません。

use std::collections::BTreeMap;

/// 保存済みファイルの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// 公開用の参照パス (例: `/uploads/pic0123456789abcdef.png`)
    filepath: String,
    /// パートで宣言された Content-Type
    content_type: String,
}

impl FileDescriptor {
    /// 新しい FileDescriptor を作成
    pub fn new(filepath: &str, content_type: &str) -> Self {
        FileDescriptor {
            filepath: filepath.to_string(),
            content_type: content_type.to_string(),
        }
    }

    /// 公開用の参照パスを取得
    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    /// Content-Type を取得
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// multipart/form-data のデコード結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Body {
    fields: BTreeMap<String, String>,
    files: Option<BTreeMap<String, FileDescriptor>>,
}

impl Body {
    /// 空の Body を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// フィールドを設定
    ///
    /// 同じ名前のファイルがあれば取り除く。
    pub fn set_field(&mut self, name: &str, value: &str) {
        if let Some(files) = &mut self.files {
            files.remove(name);
            if files.is_empty() {
                self.files = None;
            }
        }
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// ファイルを設定
    ///
    /// 同じ名前のフィールドがあれば取り除く。
    pub fn set_file(&mut self, name: &str, file: FileDescriptor) {
        self.fields.remove(name);
        self.files
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), file);
    }

    /// フィールド値を取得
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// すべてのフィールドを取得
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// ファイル情報を取得
    pub fn file(&self, name: &str) -> Option<&FileDescriptor> {
        self.files.as_ref()?.get(name)
    }

    /// すべてのファイル情報を取得 (ファイルが 1 つもなければ None)
    pub fn files(&self) -> Option<&BTreeMap<String, FileDescriptor>> {
        self.files.as_ref()
    }

    /// フィールドとファイルの合計数
    pub fn len(&self) -> usize {
        self.fields.len() + self.files.as_ref().map_or(0, BTreeMap::len)
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
