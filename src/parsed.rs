use crate::charset::Charset;
use crate::content_type::MediaType;
use crate::error::Error;
use crate::header::HeaderEntry;
use crate::method::Method;
use crate::uri::Uri;

/// パース結果
///
/// パース 1 回につき 1 つだけ作られる。
/// `is_complete` が `false` の場合も、それまでに得られた値 (ヘッダー等) を保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// HTTP メソッド
    pub method: Option<Method>,
    /// リクエスト URI
    pub uri: Option<Uri>,
    /// HTTP バージョン (HTTP/1.1 等)
    pub http_version: Option<String>,
    /// ヘッダー (受信順)
    pub headers: Vec<HeaderEntry>,
    /// テキストとしてデコードしたコンテンツ
    pub content: String,
    /// コンテンツの生バイト列
    pub body: Vec<u8>,
    /// Content-Length
    pub content_length: Option<usize>,
    /// リクエストコンテンツのメディアタイプ (Content-Type)
    pub request_content_type: MediaType,
    /// リクエストコンテンツの文字セット (Content-Type の charset)
    pub request_content_encoding: Option<Charset>,
    /// クライアントが望むレスポンスのメディアタイプ (Accept)
    pub response_content_type: MediaType,
    /// クライアントが望むレスポンスの文字セット (Accept-Charset)
    pub response_content_encoding: Option<Charset>,
    /// リクエスト全体を受信できたか
    pub is_complete: bool,
    /// 完了しなかった理由
    pub incomplete_reason: Option<Error>,
}

impl ParsedRequest {
    /// ヘッダーを取得 (大文字小文字を区別しない)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.raw_value.as_str())
    }

    /// 指定した名前のヘッダーをすべて取得
    pub fn get_headers(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.raw_value.as_str())
            .collect()
    }

    /// ヘッダーが存在するか確認
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|h| h.name.eq_ignore_ascii_case(name))
    }
}
