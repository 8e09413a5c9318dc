//! リクエストボディのバッファリング
//!
//! デコードの前にボディ全体をメモリに読み込む。

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// ストリームを終端まで読み込む
///
/// `limit` を超えた時点で [`Error::BodyTooLarge`] を返す。
pub async fn read_body<R>(reader: &mut R, limit: usize, buffer_size: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut body = Vec::new();
    let mut buf = vec![0u8; buffer_size.max(1)];

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(body);
        }

        let size = body.len() + n;
        if size > limit {
            return Err(Error::BodyTooLarge { size, limit });
        }
        body.extend_from_slice(&buf[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_body() {
        let data = vec![7u8; 10_000];
        let mut reader = &data[..];
        let body = read_body(&mut reader, 20_000, 1024).await.unwrap();
        assert_eq!(body, data);
    }

    #[tokio::test]
    async fn test_read_empty() {
        let mut reader: &[u8] = b"";
        assert!(read_body(&mut reader, 10, 8).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_limit() {
        let data = vec![0u8; 100];
        let mut reader = &data[..];
        match read_body(&mut reader, 50, 16).await {
            Err(Error::BodyTooLarge { limit, .. }) => assert_eq!(limit, 50),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error() {
        let mut reader = failing_reader::Failing;
        assert!(matches!(
            read_body(&mut reader, 10, 8).await,
            Err(Error::Io(_))
        ));
    }

    mod failing_reader {
        use std::pin::Pin;
        use std::task::{Context, Poll};

        use tokio::io::{AsyncRead, ReadBuf};

        pub struct Failing;

        impl AsyncRead for Failing {
            fn poll_read(
                self: Pin<&mut Self>,
                _cx: &mut Context<'_>,
                _buf: &mut ReadBuf<'_>,
            ) -> Poll<std::io::Result<()>> {
                Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                )))
            }
        }
    }
}
