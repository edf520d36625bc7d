//! リクエストラインのパース
//!
//! `METHOD SP request-target SP HTTP-version`

use crate::error::Error;
use crate::method::Method;
use crate::uri::Uri;

/// パース済みリクエストライン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// HTTP メソッド
    pub method: Method,
    /// リクエストターゲット
    pub uri: Uri,
    /// HTTP バージョン (HTTP/1.1 等)
    pub version: String,
}

impl RequestLine {
    /// 1 行分のリクエストラインをパース
    ///
    /// 空白で区切った 3 トークンでなければエラー
    pub fn parse(line: &str) -> Result<Self, Error> {
        let mut parts = line.split_whitespace();
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidRequestLine(format!(
                "expected 3 tokens: {:?}",
                line
            )));
        };

        let method = Method::parse(method).ok_or_else(|| {
            Error::InvalidRequestLine(format!("unsupported method: {:?}", method))
        })?;

        let uri = Uri::parse_request_target(target)
            .map_err(|e| Error::InvalidRequestLine(format!("invalid request-target: {e}")))?;

        if !is_valid_http_version(version) {
            return Err(Error::InvalidRequestLine(format!(
                "invalid HTTP version: {:?}",
                version
            )));
        }

        Ok(RequestLine {
            method,
            uri,
            version: version.to_string(),
        })
    }
}

/// HTTP バージョンが有効か確認 (RFC 9112 Section 2.3)
///
/// HTTP-version = HTTP-name "/" DIGIT "." DIGIT
fn is_valid_http_version(version: &str) -> bool {
    match version.strip_prefix("HTTP/").map(str::as_bytes) {
        Some([major, b'.', minor]) => major.is_ascii_digit() && minor.is_ascii_digit(),
        _ => false,
    }
}
