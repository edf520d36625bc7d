//! リクエストターゲットの URI パース (RFC 3986, RFC 9112 Section 3.2)
//!
//! ## 概要
//!
//! リクエストラインの request-target を相対参照または絶対 URI としてパースします。
//!
//! ## 使い方
//!
//! ```rust
//! use http11_request_stream::uri::Uri;
//!
//! // origin-form (相対参照)
//! let uri = Uri::parse_request_target("/api/data?id=1").unwrap();
//! assert!(uri.is_relative());
//! assert_eq!(uri.path(), "/api/data");
//! assert_eq!(uri.query(), Some("id=1"));
//!
//! // absolute-form
//! let uri = Uri::parse_request_target("http://example.com:8080/api").unwrap();
//! assert!(uri.is_absolute());
//! assert_eq!(uri.host(), Some("example.com"));
//! assert_eq!(uri.port(), Some(8080));
//! ```

use core::fmt;

/// URI パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// 空の URI
    Empty,
    /// 不正なパーセントエンコーディング
    InvalidPercentEncoding,
    /// 不正なポート番号
    InvalidPort,
    /// 不正な文字
    InvalidCharacter(char),
    /// 不正なスキーム
    InvalidScheme,
    /// 不正なホスト
    InvalidHost,
    /// 不正な UTF-8 シーケンス
    InvalidUtf8,
}

impl fmt::Display for UriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UriError::Empty => write!(f, "empty URI"),
            UriError::InvalidPercentEncoding => write!(f, "invalid percent encoding"),
            UriError::InvalidPort => write!(f, "invalid port"),
            UriError::InvalidCharacter(c) => write!(f, "invalid character: {:?}", c),
            UriError::InvalidScheme => write!(f, "invalid scheme"),
            UriError::InvalidHost => write!(f, "invalid host"),
            UriError::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
        }
    }
}

impl std::error::Error for UriError {}

/// RFC 3986 で除外されている文字および request-target で許可されない文字
///
/// request-target にはフラグメントが含まれないため "#" も拒否する
const RFC3986_EXCLUDED: &[u8] = b"\"#<>\\^`{|}";

/// パース済み URI
///
/// ```text
///   http://example.com:8042/over/there?name=ferret
///   \__/   \______________/\_________/ \_________/
///    |            |            |            |
/// scheme      authority       path        query
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    /// 元の URI 文字列
    source: String,
    /// スキームの終了位置 (`:` の位置)
    scheme_end: Option<usize>,
    /// authority の範囲 (`//` の後)
    authority: Option<(usize, usize)>,
    /// ホストの終了位置
    host_end: Option<usize>,
    /// ポート番号
    port: Option<u16>,
    /// パスの範囲
    path: (usize, usize),
    /// クエリの範囲 (`?` の後)
    query: Option<(usize, usize)>,
}

impl Uri {
    /// request-target をパース
    ///
    /// 制御文字、RFC 3986 の除外文字、不正なパーセントエンコーディング、
    /// `%00` を含む場合はエラーを返す。
    pub fn parse_request_target(input: &str) -> Result<Self, UriError> {
        validate_request_target(input)?;
        Self::parse(input)
    }

    /// URI 参照をパース
    pub fn parse(input: &str) -> Result<Self, UriError> {
        if input.is_empty() {
            return Err(UriError::Empty);
        }

        let bytes = input.as_bytes();
        let len = bytes.len();
        let mut pos = 0;

        // スキームのパース (RFC 3986 Section 3.1)
        // scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
        let scheme_end = if let Some(colon_pos) = find_scheme_end(bytes) {
            if !bytes[0].is_ascii_alphabetic() {
                return Err(UriError::InvalidScheme);
            }
            pos = colon_pos + 1;
            Some(colon_pos)
        } else {
            None
        };

        // authority のパース (RFC 3986 Section 3.2)
        let (authority, host_end, port) =
            if pos + 1 < len && bytes[pos] == b'/' && bytes[pos + 1] == b'/' {
                pos += 2;
                let start = pos;
                let end = bytes[pos..]
                    .iter()
                    .position(|&b| b == b'/' || b == b'?' || b == b'#')
                    .map(|p| pos + p)
                    .unwrap_or(len);

                let (h_end, port) = parse_authority(&input[start..end])?;
                pos = end;
                (Some((start, end)), Some(start + h_end), port)
            } else {
                (None, None, None)
            };

        // パスのパース (RFC 3986 Section 3.3)
        let path_start = pos;
        let path_end = bytes[pos..]
            .iter()
            .position(|&b| b == b'?' || b == b'#')
            .map(|p| pos + p)
            .unwrap_or(len);
        pos = path_end;

        // クエリのパース (RFC 3986 Section 3.4)
        let query = if pos < len && bytes[pos] == b'?' {
            let start = pos + 1;
            let end = bytes[start..]
                .iter()
                .position(|&b| b == b'#')
                .map(|p| start + p)
                .unwrap_or(len);
            Some((start, end))
        } else {
            None
        };

        Ok(Uri {
            source: input.to_string(),
            scheme_end,
            authority,
            host_end,
            port,
            path: (path_start, path_end),
            query,
        })
    }

    /// スキームを取得
    pub fn scheme(&self) -> Option<&str> {
        self.scheme_end.map(|end| &self.source[..end])
    }

    /// authority 全体を取得
    pub fn authority(&self) -> Option<&str> {
        self.authority.map(|(start, end)| &self.source[start..end])
    }

    /// ホストを取得
    pub fn host(&self) -> Option<&str> {
        let (start, _) = self.authority?;
        let end = self.host_end?;
        let auth = &self.source[start..end];
        // userinfo を除去
        match auth.rfind('@') {
            Some(at_pos) => Some(&auth[at_pos + 1..]),
            None => Some(auth),
        }
    }

    /// ポート番号を取得
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// パスを取得
    pub fn path(&self) -> &str {
        &self.source[self.path.0..self.path.1]
    }

    /// パーセントデコード済みのパスを取得
    pub fn decoded_path(&self) -> Result<String, UriError> {
        percent_decode(self.path())
    }

    /// クエリを取得
    pub fn query(&self) -> Option<&str> {
        self.query.map(|(start, end)| &self.source[start..end])
    }

    /// 元の URI 文字列を取得
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 絶対 URI かどうか
    pub fn is_absolute(&self) -> bool {
        self.scheme_end.is_some()
    }

    /// 相対参照かどうか
    pub fn is_relative(&self) -> bool {
        self.scheme_end.is_none()
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// パーセントデコーディング
///
/// ```rust
/// use http11_request_stream::uri::percent_decode;
///
/// assert_eq!(percent_decode("hello%20world").unwrap(), "hello world");
/// ```
pub fn percent_decode(input: &str) -> Result<String, UriError> {
    let mut result = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();

    while let Some(byte) = bytes.next() {
        if byte == b'%' {
            let high = bytes.next().ok_or(UriError::InvalidPercentEncoding)?;
            let low = bytes.next().ok_or(UriError::InvalidPercentEncoding)?;
            let high = from_hex_char(high).ok_or(UriError::InvalidPercentEncoding)?;
            let low = from_hex_char(low).ok_or(UriError::InvalidPercentEncoding)?;
            result.push((high << 4) | low);
        } else {
            result.push(byte);
        }
    }

    String::from_utf8(result).map_err(|_| UriError::InvalidUtf8)
}

fn from_hex_char(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// request-target に使える文字か確認
///
/// 拒否するもの:
/// - 制御文字 (0x00-0x20, 0x7F)
/// - RFC 3986 で除外されている文字
/// - 不正なパーセントエンコーディング
/// - パーセントエンコーディングされた NUL バイト (%00)
fn validate_request_target(target: &str) -> Result<(), UriError> {
    if target.is_empty() {
        return Err(UriError::Empty);
    }

    let bytes = target.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b <= 0x20 || b == 0x7F || RFC3986_EXCLUDED.contains(&b) {
            return Err(UriError::InvalidCharacter(b as char));
        }

        if b == b'%' {
            if i + 2 >= bytes.len() {
                return Err(UriError::InvalidPercentEncoding);
            }
            let high = bytes[i + 1];
            let low = bytes[i + 2];
            if !high.is_ascii_hexdigit() || !low.is_ascii_hexdigit() {
                return Err(UriError::InvalidPercentEncoding);
            }
            if high == b'0' && low == b'0' {
                return Err(UriError::InvalidPercentEncoding);
            }
            i += 3;
            continue;
        }

        i += 1;
    }

    Ok(())
}

/// スキームの終端位置を探す
fn find_scheme_end(bytes: &[u8]) -> Option<usize> {
    for (i, &b) in bytes.iter().enumerate() {
        if b == b':' {
            if i > 0 {
                return Some(i);
            }
            return None;
        }
        // スキームに使えない文字が出たら終了
        if !b.is_ascii_alphanumeric() && b != b'+' && b != b'-' && b != b'.' {
            return None;
        }
    }
    None
}

/// authority をパース
/// 戻り値: (host_end, port)
fn parse_authority(authority: &str) -> Result<(usize, Option<u16>), UriError> {
    if authority.is_empty() {
        return Ok((0, None));
    }

    let userinfo_len = authority.rfind('@').map(|at_pos| at_pos + 1).unwrap_or(0);
    let host_part = &authority[userinfo_len..];

    // IPv6 アドレス
    if host_part.starts_with('[') {
        let bracket_end = host_part.find(']').ok_or(UriError::InvalidHost)?;
        let after_bracket = &host_part[bracket_end + 1..];
        if after_bracket.is_empty() {
            return Ok((authority.len(), None));
        }
        let port_str = after_bracket
            .strip_prefix(':')
            .ok_or(UriError::InvalidHost)?;
        let port = port_str.parse::<u16>().map_err(|_| UriError::InvalidPort)?;
        return Ok((authority.len() - after_bracket.len(), Some(port)));
    }

    // 通常のホスト:ポート
    if let Some(colon_pos) = host_part.rfind(':') {
        let port_str = &host_part[colon_pos + 1..];
        if !port_str.is_empty() {
            let port = port_str.parse::<u16>().map_err(|_| UriError::InvalidPort)?;
            return Ok((userinfo_len + colon_pos, Some(port)));
        }
    }

    Ok((authority.len(), None))
}
