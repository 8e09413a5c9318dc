//! ローカルファイルシステムへの保存を含むデコードのテスト

use shiguredo_formdata::FormDataBuilder;
use tokio_formdata::{DiskStorage, Error, FormDataDecoder, UploadConfig};

fn decoder_in(dir: &std::path::Path) -> FormDataDecoder<DiskStorage> {
    FormDataDecoder::new().config(UploadConfig::new().root_dir(dir.join("uploads")))
}

fn stored_name(filepath: &str) -> &str {
    filepath.strip_prefix("/uploads/").unwrap()
}

/// title フィールドと 10 バイトの avatar ファイル
#[tokio::test]
async fn decode_title_and_avatar() {
    let dir = tempfile::tempdir().unwrap();
    let decoder = decoder_in(dir.path());
    let content = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    let builder = FormDataBuilder::with_boundary("abc123")
        .text_field("title", "hello")
        .file_field("avatar", "pic.png", "image/png", &content);
    let body = decoder
        .decode(&builder.build(), Some("multipart/form-data; boundary=abc123"))
        .await
        .unwrap();

    assert_eq!(body.fields().len(), 1);
    assert_eq!(body.field("title"), Some("hello"));

    let files = body.files().unwrap();
    assert_eq!(files.len(), 1);
    let avatar = &files["avatar"];
    assert_eq!(avatar.content_type(), "image/png");

    let name = stored_name(avatar.filepath());
    let token = name
        .strip_prefix("pic")
        .and_then(|s| s.strip_suffix(".png"))
        .unwrap();
    assert_eq!(token.len(), 16);
    assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));

    let stored = tokio::fs::read(dir.path().join("uploads").join(name))
        .await
        .unwrap();
    assert_eq!(stored, content);
}

#[tokio::test]
async fn decode_reader_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let decoder = decoder_in(dir.path());
    let binary: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 256) as u8).collect();

    let builder = FormDataBuilder::with_boundary("----WebKitFormBoundary7MA4YWxkTrZu0gW")
        .text_field("name", "John")
        .text_field("age", "30")
        .text_field("comment", "日本語のコメント")
        .file_field("photo", "photo.jpg", "image/jpeg", b"\xFF\xD8\xFF\xE0")
        .file_field("blob", "data.bin", "application/octet-stream", &binary);
    let data = builder.build();

    let mut reader = &data[..];
    let decoded = decoder
        .decode_reader(&mut reader, Some(builder.content_type().as_str()))
        .await
        .unwrap();

    assert!(decoded.skipped.is_empty());
    let body = decoded.body;
    assert_eq!(body.field("name"), Some("John"));
    assert_eq!(body.field("age"), Some("30"));
    assert_eq!(body.field("comment"), Some("日本語のコメント"));

    for (field, expected) in [("photo", &b"\xFF\xD8\xFF\xE0"[..]), ("blob", &binary[..])] {
        let file = body.file(field).unwrap();
        let path = dir
            .path()
            .join("uploads")
            .join(stored_name(file.filepath()));
        assert_eq!(tokio::fs::read(path).await.unwrap(), expected);
    }
}

#[tokio::test]
async fn missing_boundary_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let decoder = decoder_in(dir.path());
    let data = FormDataBuilder::with_boundary("b")
        .file_field("f", "a.txt", "text/plain", b"x")
        .build();

    let result = decoder.decode(&data, Some("multipart/form-data")).await;
    assert!(matches!(result, Err(Error::MissingBoundary(_))));
    assert!(!dir.path().join("uploads").exists());
}

#[tokio::test]
async fn unwritable_root_drops_files_only() {
    let dir = tempfile::tempdir().unwrap();
    // 保存先ディレクトリの位置に通常ファイルを置いて書き込みを失敗させる
    let blocker = dir.path().join("uploads");
    tokio::fs::write(&blocker, b"not a directory").await.unwrap();
    let decoder = decoder_in(dir.path());

    let builder = FormDataBuilder::with_boundary("b")
        .text_field("title", "kept")
        .file_field("f", "a.txt", "text/plain", b"lost");
    let decoded = decoder
        .decode_with_report(&builder.build(), Some(builder.content_type().as_str()))
        .await
        .unwrap();

    assert_eq!(decoded.body.field("title"), Some("kept"));
    assert!(decoded.body.files().is_none());
    assert_eq!(decoded.skipped.len(), 1);
    assert_eq!(decoded.skipped[0].name.as_deref(), Some("f"));
}
