//! ヘッダー行のパース

use crate::error::Error;

/// ヘッダー
///
/// 名前は受信したままの大文字小文字で保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    /// ヘッダー名
    pub name: String,
    /// ヘッダー値 (先頭の空白のみ除去した生の値)
    pub raw_value: String,
}

/// 値を解釈するヘッダー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StructuredHeader {
    ContentLength,
    ContentType,
    Accept,
    AcceptCharset,
}

impl StructuredHeader {
    /// ヘッダー名から判定 (大文字小文字を区別しない)
    pub(crate) fn classify(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("Content-Length") {
            Some(StructuredHeader::ContentLength)
        } else if name.eq_ignore_ascii_case("Content-Type") {
            Some(StructuredHeader::ContentType)
        } else if name.eq_ignore_ascii_case("Accept") {
            Some(StructuredHeader::Accept)
        } else if name.eq_ignore_ascii_case("Accept-Charset") {
            Some(StructuredHeader::AcceptCharset)
        } else {
            None
        }
    }
}

/// ヘッダー行をパース
///
/// 最初のコロンで名前と値に分割する。値に含まれるコロンはそのまま残る。
/// 名前の文字種は検証しない。
pub(crate) fn parse_header_line(line: &str) -> Result<HeaderEntry, Error> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| Error::InvalidHeader("missing colon".to_string()))?;
    if name.is_empty() {
        return Err(Error::InvalidHeader("empty name".to_string()));
    }

    Ok(HeaderEntry {
        name: name.to_string(),
        raw_value: value.trim_start_matches([' ', '\t']).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_header() {
        let entry = parse_header_line("Content-Length: 4").unwrap();
        assert_eq!(entry.name, "Content-Length");
        assert_eq!(entry.raw_value, "4");
    }

    #[test]
    fn value_keeps_embedded_colons() {
        let entry = parse_header_line("UnknownHeader: some:value").unwrap();
        assert_eq!(entry.name, "UnknownHeader");
        assert_eq!(entry.raw_value, "some:value");
    }

    #[test]
    fn value_without_leading_space() {
        let entry = parse_header_line("X-Test:value").unwrap();
        assert_eq!(entry.raw_value, "value");
    }

    #[test]
    fn empty_value() {
        let entry = parse_header_line("X-Empty:").unwrap();
        assert_eq!(entry.raw_value, "");
    }

    #[test]
    fn reject_malformed_lines() {
        assert!(parse_header_line("NoColonHere").is_err());
        assert!(parse_header_line(": value").is_err());
    }

    #[test]
    fn name_is_kept_as_received() {
        let entry = parse_header_line("X Name: v").unwrap();
        assert_eq!(entry.name, "X Name");
        assert_eq!(entry.raw_value, "v");

        let entry = parse_header_line("X-Name: caf\u{FFFD}").unwrap();
        assert_eq!(entry.raw_value, "caf\u{FFFD}");
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(
            StructuredHeader::classify("content-length"),
            Some(StructuredHeader::ContentLength)
        );
        assert_eq!(
            StructuredHeader::classify("CONTENT-TYPE"),
            Some(StructuredHeader::ContentType)
        );
        assert_eq!(
            StructuredHeader::classify("Accept"),
            Some(StructuredHeader::Accept)
        );
        assert_eq!(
            StructuredHeader::classify("accept-charset"),
            Some(StructuredHeader::AcceptCharset)
        );
        assert_eq!(StructuredHeader::classify("Accept-Encoding"), None);
        assert_eq!(StructuredHeader::classify("UnknownHeader"), None);
    }
}
