//! Accept 系ヘッダーのパースとネゴシエーション (RFC 9110 Section 12.5)
//!
//! ## 概要
//!
//! `value;q=weight` をカンマで並べた品質値付きリストをパースし、
//! クライアントが最も優先する値を選びます。
//!
//! 選択規則:
//!
//! - q=0 の候補は除外する
//! - 残りの候補から q 値が最大のものを選ぶ
//! - q 値が同じ場合は先に現れた候補を選ぶ
//!
//! q 値が不正なエントリはそのエントリだけを捨て、ヘッダー全体は失敗にしない。
//!
//! ## 使い方
//!
//! ```rust
//! use http11_request_stream::accept::{QualityList, negotiate_charset, negotiate_media_type};
//! use http11_request_stream::{Charset, MediaType};
//!
//! let list = QualityList::parse_tokens("utf-7;q=0.2, utf-8;q=0.1,*;q=0");
//! assert_eq!(list.items().len(), 3);
//! assert_eq!(list.best().map(|item| item.value()), Some("utf-7"));
//!
//! assert_eq!(negotiate_media_type("application/json,text/xml"), MediaType::Json);
//! assert_eq!(negotiate_charset("utf-7;q=0.2, utf-8;q=0.1,*;q=0"), Some(Charset::Utf7));
//! ```

use core::fmt;

use crate::charset::Charset;
use crate::content_type::MediaType;
use crate::token::{is_token, split_unquoted};

/// Accept 系パースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptError {
    /// 空のエントリ
    Empty,
    /// 不正なメディアレンジ
    InvalidMediaRange,
    /// 不正なトークン
    InvalidToken,
    /// 不正なパラメータ
    InvalidParameter,
    /// 不正な q 値
    InvalidQValue,
}

impl fmt::Display for AcceptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceptError::Empty => write!(f, "empty entry"),
            AcceptError::InvalidMediaRange => write!(f, "invalid media range"),
            AcceptError::InvalidToken => write!(f, "invalid token"),
            AcceptError::InvalidParameter => write!(f, "invalid parameter"),
            AcceptError::InvalidQValue => write!(f, "invalid qvalue"),
        }
    }
}

impl std::error::Error for AcceptError {}

/// q 値 (0.000 - 1.000)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QValue(u16);

impl QValue {
    /// q 値をパース
    pub fn parse(input: &str) -> Result<Self, AcceptError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AcceptError::InvalidQValue);
        }

        if input == "1" {
            return Ok(QValue(1000));
        }

        if let Some(rest) = input.strip_prefix("1.") {
            if rest.len() > 3 || !rest.chars().all(|c| c == '0') {
                return Err(AcceptError::InvalidQValue);
            }
            return Ok(QValue(1000));
        }

        if input == "0" {
            return Ok(QValue(0));
        }

        if let Some(rest) = input.strip_prefix("0.") {
            if rest.len() > 3 || !rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(AcceptError::InvalidQValue);
            }
            let value = rest
                .bytes()
                .enumerate()
                .map(|(idx, b)| (b - b'0') as u16 * 10u16.pow(2 - idx as u32))
                .sum();
            return Ok(QValue(value));
        }

        Err(AcceptError::InvalidQValue)
    }

    /// ミリ単位の q 値 (0-1000)
    pub fn value(&self) -> u16 {
        self.0
    }

    /// f32 に変換
    pub fn as_f32(&self) -> f32 {
        self.0 as f32 / 1000.0
    }

    /// q=0 (受け付けない) かどうか
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for QValue {
    fn default() -> Self {
        QValue(1000)
    }
}

impl fmt::Display for QValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1000 {
            return write!(f, "1");
        }
        if self.0 == 0 {
            return write!(f, "0");
        }

        let mut frac = format!("{:03}", self.0);
        while frac.ends_with('0') {
            frac.pop();
        }
        write!(f, "0.{}", frac)
    }
}

/// 品質値付きの候補
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityItem {
    value: String,
    q: QValue,
}

impl QualityItem {
    /// 候補の値 (パラメータを除いた小文字の値)
    pub fn value(&self) -> &str {
        &self.value
    }

    /// q 値
    pub fn qvalue(&self) -> QValue {
        self.q
    }
}

impl fmt::Display for QualityItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if self.q.value() < 1000 {
            write!(f, ";q={}", self.q)?;
        }
        Ok(())
    }
}

/// 品質値付きリスト
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualityList {
    items: Vec<QualityItem>,
}

impl QualityList {
    /// Accept ヘッダー (メディアレンジのリスト) をパース
    ///
    /// q 以外のメディアレンジパラメータは無視する。
    pub fn parse_accept(input: &str) -> Self {
        Self::parse_with(input, validate_media_range)
    }

    /// Accept-Charset 等のトークンのリストをパース
    ///
    /// q 以外のパラメータは無視する。
    pub fn parse_tokens(input: &str) -> Self {
        Self::parse_with(input, validate_token_or_star)
    }

    fn parse_with(input: &str, validator: fn(&str) -> bool) -> Self {
        let items = split_unquoted(input, ',')
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .filter_map(|part| parse_item(part, validator).ok())
            .collect();
        QualityList { items }
    }

    /// 候補一覧 (出現順)
    pub fn items(&self) -> &[QualityItem] {
        &self.items
    }

    /// 最も優先される候補
    ///
    /// q=0 の候補は選ばない。q 値が同じ場合は先に現れた候補を選ぶ。
    pub fn best(&self) -> Option<&QualityItem> {
        self.best_by(Some).map(|(item, _)| item)
    }

    /// 対応付けできる候補の中で最も優先されるもの
    ///
    /// `map` が `None` を返す候補 (対応していない値) は選ばない。
    pub fn best_by<'a, T>(
        &'a self,
        map: impl Fn(&'a QualityItem) -> Option<T>,
    ) -> Option<(&'a QualityItem, T)> {
        let mut best: Option<(&QualityItem, T)> = None;
        for item in &self.items {
            if item.q.is_zero() {
                continue;
            }
            if best.as_ref().is_some_and(|(current, _)| item.q <= current.q) {
                continue;
            }
            if let Some(mapped) = map(item) {
                best = Some((item, mapped));
            }
        }
        best
    }
}

impl fmt::Display for QualityList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.items.iter().map(|item| item.to_string()).collect();
        write!(f, "{}", values.join(", "))
    }
}

/// Accept ヘッダーからレスポンスのメディアタイプを選ぶ
///
/// 対応するメディアタイプがない場合は [`MediaType::Unknown`] を返す。
pub fn negotiate_media_type(accept: &str) -> MediaType {
    QualityList::parse_accept(accept)
        .best_by(|item| MediaType::from_media_range(item.value()))
        .map(|(_, media_type)| media_type)
        .unwrap_or(MediaType::Unknown)
}

/// Accept-Charset ヘッダーからレスポンスの文字セットを選ぶ
pub fn negotiate_charset(accept_charset: &str) -> Option<Charset> {
    QualityList::parse_tokens(accept_charset)
        .best_by(|item| Charset::from_label(item.value()))
        .map(|(_, charset)| charset)
}

fn parse_item(input: &str, validator: fn(&str) -> bool) -> Result<QualityItem, AcceptError> {
    let mut parts = split_unquoted(input, ';').into_iter();
    let token = parts.next().unwrap_or_default().trim();
    if token.is_empty() {
        return Err(AcceptError::Empty);
    }
    if !validator(token) {
        return Err(AcceptError::InvalidToken);
    }

    let mut qvalue = QValue::default();
    let mut q_seen = false;

    for param in parts {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        let (name, value) = param.split_once('=').ok_or(AcceptError::InvalidParameter)?;
        if name.trim().eq_ignore_ascii_case("q") {
            if q_seen {
                return Err(AcceptError::InvalidQValue);
            }
            qvalue = QValue::parse(value)?;
            q_seen = true;
        }
    }

    Ok(QualityItem {
        value: token.to_ascii_lowercase(),
        q: qvalue,
    })
}

/// メディアレンジ (`*/*`, `type/*`, `type/subtype`) か確認
fn validate_media_range(range: &str) -> bool {
    let Some((media_type, subtype)) = range.split_once('/') else {
        return false;
    };
    let (media_type, subtype) = (media_type.trim(), subtype.trim());
    if media_type == "*" {
        return subtype == "*";
    }
    is_token(media_type) && (subtype == "*" || is_token(subtype))
}

fn validate_token_or_star(token: &str) -> bool {
    token == "*" || is_token(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qvalue_parse() {
        assert_eq!(QValue::parse("1").unwrap().value(), 1000);
        assert_eq!(QValue::parse("1.000").unwrap().value(), 1000);
        assert_eq!(QValue::parse("0").unwrap().value(), 0);
        assert_eq!(QValue::parse("0.2").unwrap().value(), 200);
        assert_eq!(QValue::parse("0.05").unwrap().value(), 50);
        assert_eq!(QValue::parse(" 0.125 ").unwrap().value(), 125);
        assert!(QValue::parse("1.5").is_err());
        assert!(QValue::parse("0.1234").is_err());
        assert!(QValue::parse("high").is_err());
        assert!(QValue::parse("").is_err());
        assert!(QValue::parse("-0.5").is_err());
    }

    #[test]
    fn qvalue_display() {
        assert_eq!(QValue::parse("0.500").unwrap().to_string(), "0.5");
        assert_eq!(QValue::default().to_string(), "1");
        assert_eq!(QValue::parse("0").unwrap().to_string(), "0");
    }

    #[test]
    fn accept_first_listed_wins_on_tie() {
        let list = QualityList::parse_accept("application/json,text/xml");
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.best().unwrap().value(), "application/json");
        assert_eq!(
            negotiate_media_type("application/json,text/xml"),
            MediaType::Json
        );
        assert_eq!(
            negotiate_media_type("text/xml, application/json"),
            MediaType::Xml
        );
    }

    #[test]
    fn accept_highest_weight_wins() {
        assert_eq!(
            negotiate_media_type("application/json;q=0.5, text/xml;q=0.8"),
            MediaType::Xml
        );
    }

    #[test]
    fn accept_skips_unsupported_candidates() {
        assert_eq!(
            negotiate_media_type("image/png, text/html;q=0.9, */*;q=0.1"),
            MediaType::Html
        );
        assert_eq!(negotiate_media_type("image/png, */*"), MediaType::Unknown);
        assert_eq!(negotiate_media_type(""), MediaType::Unknown);
    }

    #[test]
    fn accept_ignores_media_range_parameters() {
        let list = QualityList::parse_accept("text/html; level=1; q=0.7");
        assert_eq!(list.items()[0].value(), "text/html");
        assert_eq!(list.items()[0].qvalue().value(), 700);
    }

    #[test]
    fn charset_entry_keeps_unknown_parameters() {
        let list = QualityList::parse_tokens("utf-8;foo=bar, iso-8859-1;q=0.5;level=1");
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.items()[1].value(), "iso-8859-1");
        assert_eq!(negotiate_charset("utf-8;foo=bar"), Some(Charset::Utf8));
    }

    #[test]
    fn charset_negotiation_excludes_zero_weight() {
        let list = QualityList::parse_tokens("utf-7;q=0.2, utf-8;q=0.1,*;q=0");
        assert_eq!(list.items().len(), 3);
        assert_eq!(list.items()[2].value(), "*");
        assert!(list.items()[2].qvalue().is_zero());
        assert_eq!(
            negotiate_charset("utf-7;q=0.2, utf-8;q=0.1,*;q=0"),
            Some(Charset::Utf7)
        );
    }

    #[test]
    fn wildcard_participates_in_weighting() {
        let list = QualityList::parse_tokens("utf-8;q=0.5, *");
        assert_eq!(list.best().unwrap().value(), "*");
        // ワイルドカードは文字セットに対応付けられないため次点が選ばれる
        assert_eq!(negotiate_charset("utf-8;q=0.5, *"), Some(Charset::Utf8));
    }

    #[test]
    fn malformed_weight_drops_only_that_entry() {
        let list = QualityList::parse_tokens("utf-8;q=abc, iso-8859-1;q=0.3");
        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].value(), "iso-8859-1");
        assert_eq!(
            negotiate_charset("utf-8;q=abc, iso-8859-1;q=0.3"),
            Some(Charset::Iso8859_1)
        );
    }

    #[test]
    fn all_zero_weights_select_nothing() {
        let list = QualityList::parse_tokens("utf-8;q=0, *;q=0");
        assert!(list.best().is_none());
        assert_eq!(negotiate_charset("utf-8;q=0, *;q=0"), None);
    }

    #[test]
    fn empty_entries_are_skipped() {
        let list = QualityList::parse_tokens(" , utf-8 ,, ");
        assert_eq!(list.items().len(), 1);
    }

    #[test]
    fn display_list() {
        let list = QualityList::parse_tokens("UTF-8, utf-7;q=0.50");
        assert_eq!(list.to_string(), "utf-8, utf-7;q=0.5");
    }
}
