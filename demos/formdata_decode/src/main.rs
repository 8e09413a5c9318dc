//! multipart/form-data ボディをファイルから読み込んでデコードする例
//!
//! ファイルパートは --root-dir 以下に保存し、結果を JSON で出力する。
//!
//! 使い方:
//!   cargo run -p formdata_decode -- body.bin -c "multipart/form-data; boundary=abc123"
//!   cargo run -p formdata_decode -- body.bin -c "multipart/form-data; boundary=abc123" --root-dir /tmp/uploads

use shiguredo_formdata::Body;
use tokio_formdata::{FormDataDecoder, SkippedPart, UploadConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = noargs::raw_args();
    args.metadata_mut().app_name = "formdata_decode";

    // --help フラグ
    noargs::HELP_FLAG.take_help(&mut args);

    // --version フラグ
    let version_flag: bool = noargs::flag("version")
        .short('V')
        .doc("Show version")
        .take(&mut args)
        .is_present();
    if version_flag {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    // --content-type オプション
    let content_type: Option<String> = noargs::opt("content-type")
        .short('c')
        .doc("Content-Type header value (e.g., multipart/form-data; boundary=abc123)")
        .take(&mut args)
        .present_and_then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // --root-dir オプション
    let root_dir: String = noargs::opt("root-dir")
        .doc("Directory to store uploaded files (default: uploads)")
        .default("uploads")
        .take(&mut args)
        .then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // --public-prefix オプション
    let public_prefix: String = noargs::opt("public-prefix")
        .doc("Prefix of the file paths in the output (default: /uploads)")
        .default("/uploads")
        .take(&mut args)
        .then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // --max-body-size オプション
    let max_body_size: usize = noargs::opt("max-body-size")
        .doc("Maximum body size in bytes (default: 10485760)")
        .default("10485760")
        .take(&mut args)
        .then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    // 位置引数: ボディファイル
    let body_path: String = noargs::arg("<BODY_FILE>")
        .doc("File containing the raw request body")
        .take(&mut args)
        .then(|a| Ok::<_, &str>(a.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // 未知の引数があればエラー、ヘルプが返されたら表示
    if let Some(help) = args.finish().map_err(|e| format!("{:?}", e))? {
        print!("{}", help);
        return Ok(());
    }

    init_logging();

    let decoder = FormDataDecoder::new().config(
        UploadConfig::new()
            .root_dir(root_dir)
            .public_prefix(&public_prefix)
            .max_body_size(max_body_size),
    );

    let mut file = tokio::fs::File::open(&body_path).await?;
    let decoded = decoder
        .decode_reader(&mut file, content_type.as_deref())
        .await?;

    for skipped in &decoded.skipped {
        eprintln!("{}", describe_skipped(skipped));
    }
    println!("{}", body_json(&decoded.body));

    Ok(())
}

/// RUST_LOG がなければ tokio_formdata の warn 以上を stderr に出す
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokio_formdata=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// フィールドは名前をキーに、ファイルは files 以下にまとめた JSON にする
fn body_json(body: &Body) -> impl std::fmt::Display + '_ {
    nojson::json(move |f| {
        f.set_indent_size(2);
        f.set_spacing(true);
        f.object(|f| {
            for (name, value) in body.fields() {
                f.member(name, value.as_str())?;
            }
            if let Some(files) = body.files() {
                f.member(
                    "files",
                    nojson::json(|f| {
                        f.object(|f| {
                            for (name, file) in files {
                                f.member(
                                    name,
                                    nojson::json(|f| {
                                        f.object(|f| {
                                            f.member("filepath", file.filepath())?;
                                            f.member("content-type", file.content_type())
                                        })
                                    }),
                                )?;
                            }
                            Ok(())
                        })
                    }),
                )?;
            }
            Ok(())
        })
    })
}

fn describe_skipped(skipped: &SkippedPart) -> String {
    match &skipped.name {
        Some(name) => format!(
            "skipped part #{} ({}): {}",
            skipped.index, name, skipped.reason
        ),
        None => format!("skipped part #{}: {}", skipped.index, skipped.reason),
    }
}
