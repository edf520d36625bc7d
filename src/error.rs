use std::fmt;

/// リクエストが完了しなかった理由
///
/// パーサーは呼び出し元にエラーを返さない。
/// `Error` は [`ParsedRequest::incomplete_reason`](crate::ParsedRequest::incomplete_reason)
/// に記録される診断情報として扱う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 不正なリクエストライン
    InvalidRequestLine(String),
    /// 不正なヘッダー行
    InvalidHeader(String),
    /// Content-Length の値が数値として解釈できない
    InvalidContentLength(String),
    /// Content-Length を超えるコンテンツを受信した
    ContentTooLong { expected: usize, received: usize },
    /// 必要なデータが揃う前にストリームが終了した
    UnexpectedEnd,
    /// バッファサイズ超過
    BufferOverflow { size: usize, limit: usize },
    /// ヘッダー数超過
    TooManyHeaders { count: usize, limit: usize },
    /// ヘッダー行が長すぎる
    HeaderLineTooLong { size: usize, limit: usize },
    /// ボディサイズ超過
    BodyTooLarge { size: usize, limit: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRequestLine(msg) => write!(f, "invalid request line: {}", msg),
            Error::InvalidHeader(msg) => write!(f, "invalid header line: {}", msg),
            Error::InvalidContentLength(value) => {
                write!(f, "invalid Content-Length: {:?}", value)
            }
            Error::ContentTooLong { expected, received } => {
                write!(f, "content too long: {} > {}", received, expected)
            }
            Error::UnexpectedEnd => write!(f, "unexpected end of stream"),
            Error::BufferOverflow { size, limit } => {
                write!(f, "buffer overflow: {} > {}", size, limit)
            }
            Error::TooManyHeaders { count, limit } => {
                write!(f, "too many headers: {} > {}", count, limit)
            }
            Error::HeaderLineTooLong { size, limit } => {
                write!(f, "header line too long: {} > {}", size, limit)
            }
            Error::BodyTooLarge { size, limit } => {
                write!(f, "body too large: {} > {}", size, limit)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::InvalidContentLength("four".to_string()).to_string(),
            "invalid Content-Length: \"four\""
        );
        assert_eq!(
            Error::ContentTooLong {
                expected: 4,
                received: 28
            }
            .to_string(),
            "content too long: 28 > 4"
        );
        assert_eq!(Error::UnexpectedEnd.to_string(), "unexpected end of stream");
    }
}
