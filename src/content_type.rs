//! Content-Type ヘッダーパース (RFC 9110 Section 8.3)
//!
//! ## 概要
//!
//! Content-Type ヘッダーをパースし、リクエストコンテンツのメディアタイプと文字セットを求めます。
//!
//! ## 使い方
//!
//! ```rust
//! use http11_request_stream::content_type::ContentType;
//! use http11_request_stream::{Charset, MediaType};
//!
//! let ct = ContentType::parse("text/xml;charset=utf-8").unwrap();
//! assert_eq!(ct.mime_type(), "text/xml");
//! assert_eq!(ct.charset(), Some("utf-8"));
//!
//! let descriptor = ct.descriptor();
//! assert_eq!(descriptor.media_type, MediaType::Xml);
//! assert_eq!(descriptor.charset, Some(Charset::Utf8));
//! ```

use core::fmt;

use crate::charset::Charset;
use crate::token::{is_token, needs_quoting, quote, split_unquoted, unquote};

/// Content-Type パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypeError {
    /// 空の Content-Type
    Empty,
    /// 不正なメディアタイプ形式
    InvalidMediaType,
    /// 不正なパラメータ形式
    InvalidParameter,
    /// 引用符が閉じていない
    UnterminatedQuote,
}

impl fmt::Display for ContentTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentTypeError::Empty => write!(f, "empty Content-Type"),
            ContentTypeError::InvalidMediaType => write!(f, "invalid media type"),
            ContentTypeError::InvalidParameter => write!(f, "invalid parameter"),
            ContentTypeError::UnterminatedQuote => write!(f, "unterminated quote"),
        }
    }
}

impl std::error::Error for ContentTypeError {}

/// 扱うメディアタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaType {
    /// application/json
    Json,
    /// application/xml, text/xml
    Xml,
    /// text/html
    Html,
    /// text/plain
    Plain,
    /// 未指定、または対応していないメディアタイプ
    #[default]
    Unknown,
}

impl MediaType {
    /// type/subtype からメディアタイプを判定
    pub fn from_mime(media_type: &str, subtype: &str) -> Self {
        let media_type = media_type.to_ascii_lowercase();
        let subtype = subtype.to_ascii_lowercase();
        match (media_type.as_str(), subtype.as_str()) {
            ("application", "json") | ("text", "json") => MediaType::Json,
            ("application", "xml") | ("text", "xml") => MediaType::Xml,
            ("text", "html") => MediaType::Html,
            ("text", "plain") => MediaType::Plain,
            _ => MediaType::Unknown,
        }
    }

    /// Accept のメディアレンジからメディアタイプを判定
    ///
    /// ワイルドカードや対応していないメディアタイプは `None` を返す。
    pub fn from_media_range(range: &str) -> Option<Self> {
        let (media_type, subtype) = range.split_once('/')?;
        match MediaType::from_mime(media_type.trim(), subtype.trim()) {
            MediaType::Unknown => None,
            known => Some(known),
        }
    }

    /// 代表的な MIME タイプ
    pub fn mime_type(&self) -> Option<&'static str> {
        match self {
            MediaType::Json => Some("application/json"),
            MediaType::Xml => Some("application/xml"),
            MediaType::Html => Some("text/html"),
            MediaType::Plain => Some("text/plain"),
            MediaType::Unknown => None,
        }
    }
}

/// メディアタイプと文字セットの組
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentTypeDescriptor {
    /// メディアタイプ
    pub media_type: MediaType,
    /// 文字セット (charset パラメータがない、または対応していない場合は `None`)
    pub charset: Option<Charset>,
}

/// パース済み Content-Type
///
/// ```text
/// Content-Type = media-type
/// media-type = type "/" subtype parameters
/// parameters = *( OWS ";" OWS [ parameter ] )
/// parameter = parameter-name "=" parameter-value
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// メディアタイプ (例: "text")
    media_type: String,
    /// サブタイプ (例: "xml")
    subtype: String,
    /// パラメータ (name, value) のペア
    parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Content-Type 文字列をパース
    ///
    /// パラメータ名は小文字に正規化し、値は大文字小文字を保持する。
    pub fn parse(input: &str) -> Result<Self, ContentTypeError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ContentTypeError::Empty);
        }

        let mut parts = split_unquoted(input, ';').into_iter();
        let essence = parts.next().unwrap_or_default();
        let (media_type, subtype) = essence
            .split_once('/')
            .map(|(t, s)| (t.trim(), s.trim()))
            .filter(|(t, s)| is_token(t) && is_token(s))
            .ok_or(ContentTypeError::InvalidMediaType)?;

        let parameters = parts
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_parameter)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ContentType {
            media_type: media_type.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters,
        })
    }

    /// メディアタイプを取得 (例: "text")
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// サブタイプを取得 (例: "xml")
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// 完全なメディアタイプを取得 (例: "text/xml")
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.media_type, self.subtype)
    }

    /// パラメータを取得
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// すべてのパラメータを取得
    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// charset パラメータを取得
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// メディアタイプと文字セットを求める
    pub fn descriptor(&self) -> ContentTypeDescriptor {
        ContentTypeDescriptor {
            media_type: MediaType::from_mime(&self.media_type, &self.subtype),
            charset: self.charset().and_then(Charset::from_label),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_type, self.subtype)?;
        for (name, value) in &self.parameters {
            if needs_quoting(value) {
                write!(f, "; {}={}", name, quote(value))?;
            } else {
                write!(f, "; {}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// `name=value` 形式のパラメータを 1 つパース
fn parse_parameter(input: &str) -> Result<(String, String), ContentTypeError> {
    let (name, value) = input
        .split_once('=')
        .ok_or(ContentTypeError::InvalidParameter)?;
    let name = name.trim();
    let value = value.trim();
    if !is_token(name) {
        return Err(ContentTypeError::InvalidParameter);
    }

    let value = if value.starts_with('"') {
        let (unquoted, rest) = unquote(value).ok_or(ContentTypeError::UnterminatedQuote)?;
        if !rest.trim().is_empty() {
            return Err(ContentTypeError::InvalidParameter);
        }
        unquoted
    } else if value.is_empty() || value.contains(char::is_whitespace) {
        return Err(ContentTypeError::InvalidParameter);
    } else {
        value.to_string()
    };

    Ok((name.to_ascii_lowercase(), value))
}
