//! 非同期リクエスト読み取り

use http11_request_stream::{DecoderLimits, ParseStatus, ParsedRequest, RequestParser};

use crate::source::AsyncChunkSource;

/// 供給元からリクエストを 1 つ読み取る
///
/// 完了または不完全が確定した時点で、それ以上チャンクを要求しない。
pub async fn parse_request_stream<S: AsyncChunkSource>(source: S) -> ParsedRequest {
    parse_request_stream_with_limits(source, DecoderLimits::default()).await
}

/// 制限付きで供給元からリクエストを 1 つ読み取る
pub async fn parse_request_stream_with_limits<S: AsyncChunkSource>(
    mut source: S,
    limits: DecoderLimits,
) -> ParsedRequest {
    let mut parser = RequestParser::with_limits(limits);
    while let Some(chunk) = source.next_chunk().await {
        if parser.feed(&chunk) != ParseStatus::NeedMore {
            break;
        }
    }
    parser.finish()
}
