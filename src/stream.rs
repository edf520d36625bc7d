//! チャンク供給元からリクエストを読み取る
//!
//! [`RequestParser`] を駆動し、供給元から 1 チャンクずつ取り出してパースする。
//! 完了または不完全が確定した時点で、それ以上チャンクを要求しない。

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use crate::limits::DecoderLimits;
use crate::parsed::ParsedRequest;
use crate::parser::{ParseStatus, RequestParser};

/// デフォルトの読み取りバッファサイズ
const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

/// チャンクの供給元
///
/// 呼ばれるたびに次のチャンクを返す。`None` はストリームの終了を表す。
/// 空のチャンクを返してもよい。
pub trait ChunkSource {
    fn next_chunk(&mut self) -> Option<Vec<u8>>;
}

/// あらかじめ用意したチャンク列
impl ChunkSource for VecDeque<Vec<u8>> {
    fn next_chunk(&mut self) -> Option<Vec<u8>> {
        self.pop_front()
    }
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn next_chunk(&mut self) -> Option<Vec<u8>> {
        (**self).next_chunk()
    }
}

/// [`Read`] からチャンクを読み取る供給元
///
/// 1 回の `read()` で得られたデータを 1 チャンクとする。
/// I/O エラーはログに出力し、ストリーム終了として扱う。
#[derive(Debug)]
pub struct ReadChunks<R> {
    reader: R,
    buffer_size: usize,
}

impl<R: Read> ReadChunks<R> {
    /// 新しい供給元を作成
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// 1 回に読み取る最大バイト数を設定
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// 内部のリーダーを取り出す
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ChunkSource for ReadChunks<R> {
    fn next_chunk(&mut self) -> Option<Vec<u8>> {
        let mut buf = vec![0u8; self.buffer_size];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return None,
                Ok(n) => {
                    buf.truncate(n);
                    return Some(buf);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "read failed, treating as end of stream");
                    return None;
                }
            }
        }
    }
}

/// 供給元からリクエストを 1 つ読み取る
///
/// ```rust
/// use std::collections::VecDeque;
/// use http11_request_stream::parse_request_stream;
///
/// let chunks: VecDeque<Vec<u8>> = [
///     &b"GET /api/data HTTP/1.1\r\nContent-Leng"[..],
///     b"th: 4\r\n\r\ndata",
/// ]
/// .into_iter()
/// .map(|c| c.to_vec())
/// .collect();
///
/// let request = parse_request_stream(chunks);
/// assert!(request.is_complete);
/// assert_eq!(request.content, "data");
/// ```
pub fn parse_request_stream<S: ChunkSource>(source: S) -> ParsedRequest {
    parse_request_stream_with_limits(source, DecoderLimits::default())
}

/// 制限付きで供給元からリクエストを 1 つ読み取る
pub fn parse_request_stream_with_limits<S: ChunkSource>(
    mut source: S,
    limits: DecoderLimits,
) -> ParsedRequest {
    let mut parser = RequestParser::with_limits(limits);
    while let Some(chunk) = source.next_chunk() {
        if parser.feed(&chunk) != ParseStatus::NeedMore {
            break;
        }
    }
    parser.finish()
}
