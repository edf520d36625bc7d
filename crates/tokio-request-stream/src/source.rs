//! 非同期チャンク供給元
//!
//! ## 使い方
//!
//! ```ignore
//! use std::time::Duration;
//! use tokio_request_stream::AsyncReadChunks;
//!
//! let source = AsyncReadChunks::new(stream)
//!     .read_buffer_size(4096)
//!     .read_timeout(Duration::from_secs(10));
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Result;

/// デフォルトの読み取りバッファサイズ
const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

/// 非同期チャンク供給元
///
/// `None` はストリームの終了を表す。空のチャンクを返してもよい。
pub trait AsyncChunkSource: Send {
    /// 次のチャンクを取得
    fn next_chunk(&mut self) -> impl Future<Output = Option<Vec<u8>>> + Send;
}

/// あらかじめ用意したチャンク列
impl AsyncChunkSource for VecDeque<Vec<u8>> {
    fn next_chunk(&mut self) -> impl Future<Output = Option<Vec<u8>>> + Send {
        std::future::ready(self.pop_front())
    }
}

/// [`AsyncRead`] からチャンクを読み取る供給元
///
/// 1 回の `read()` で得られたデータを 1 チャンクとする。
/// I/O エラーとタイムアウトはログに出力し、ストリーム終了として扱う。
#[derive(Debug)]
pub struct AsyncReadChunks<R> {
    reader: R,
    read_buffer_size: usize,
    read_timeout: Option<Duration>,
}

impl<R: AsyncRead + Unpin + Send> AsyncReadChunks<R> {
    /// 新しい供給元を作成
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            read_timeout: None,
        }
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// 1 回の読み取りのタイムアウトを設定
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// 内部のリーダーを取り出す
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// 次のチャンクを読み取る
    ///
    /// 接続が閉じられた場合は `Ok(None)` を返す。
    pub async fn try_next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buf = vec![0u8; self.read_buffer_size];
        let n = match self.read_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.reader.read(&mut buf)).await??,
            None => self.reader.read(&mut buf).await?,
        };

        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        Ok(Some(buf))
    }
}

impl<R: AsyncRead + Unpin + Send> AsyncChunkSource for AsyncReadChunks<R> {
    async fn next_chunk(&mut self) -> Option<Vec<u8>> {
        match self.try_next_chunk().await {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(error = %e, "chunk read failed, treating as end of stream");
                None
            }
        }
    }
}
