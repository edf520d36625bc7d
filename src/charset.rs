//! 文字セット
//!
//! Content-Type の charset パラメータや Accept-Charset の値を文字セットに対応付け、
//! コンテンツのバイト列をテキストへデコードする。

use core::fmt;

/// 対応している文字セット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Utf7,
    /// UTF-16 (リトルエンディアン)
    Utf16Le,
    /// UTF-16 (ビッグエンディアン)
    Utf16Be,
    UsAscii,
    Iso8859_1,
}

impl Charset {
    /// 文字セット名から判定 (大文字小文字を区別しない)
    ///
    /// ```rust
    /// use http11_request_stream::Charset;
    ///
    /// assert_eq!(Charset::from_label("UTF-8"), Some(Charset::Utf8));
    /// assert_eq!(Charset::from_label("utf-7"), Some(Charset::Utf7));
    /// assert_eq!(Charset::from_label("*"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        let charset = match label.as_str() {
            "utf-8" | "utf8" => Charset::Utf8,
            "utf-7" | "utf7" | "unicode-1-1-utf-7" => Charset::Utf7,
            "utf-16" | "utf-16le" | "unicode" => Charset::Utf16Le,
            "utf-16be" | "unicodefffe" => Charset::Utf16Be,
            "us-ascii" | "ascii" => Charset::UsAscii,
            "iso-8859-1" | "iso_8859-1" | "latin1" => Charset::Iso8859_1,
            _ => return None,
        };
        Some(charset)
    }

    /// 正規の文字セット名
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Utf7 => "utf-7",
            Charset::Utf16Le => "utf-16le",
            Charset::Utf16Be => "utf-16be",
            Charset::UsAscii => "us-ascii",
            Charset::Iso8859_1 => "iso-8859-1",
        }
    }

    /// バイト列をテキストにデコード
    ///
    /// デコードできないバイトは U+FFFD に置き換える。
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Charset::Utf7 => decode_utf7(bytes),
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Charset::UsAscii => bytes
                .iter()
                .map(|&b| {
                    if b.is_ascii() {
                        b as char
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
            Charset::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let odd = !chunks.remainder().is_empty();
    let units = chunks.map(|pair| to_unit([pair[0], pair[1]]));
    let mut text: String = char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if odd {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

/// UTF-7 のデコード (RFC 2152)
///
/// `+` から始まる区間を修正 Base64 の UTF-16 として扱う。
/// 区間は Base64 以外の文字で終わり、終端の `-` は取り除く。`+-` は `+` を表す。
fn decode_utf7(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        i += 1;

        if b != b'+' {
            text.push(if b.is_ascii() {
                b as char
            } else {
                char::REPLACEMENT_CHARACTER
            });
            continue;
        }

        if bytes.get(i) == Some(&b'-') {
            text.push('+');
            i += 1;
            continue;
        }

        let mut units = Vec::new();
        let mut bits: u32 = 0;
        let mut nbits: u32 = 0;
        while let Some(value) = bytes.get(i).copied().and_then(base64_value) {
            bits = (bits << 6) | value;
            nbits += 6;
            if nbits >= 16 {
                nbits -= 16;
                units.push((bits >> nbits) as u16);
                bits &= (1 << nbits) - 1;
            }
            i += 1;
        }
        text.extend(
            char::decode_utf16(units).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
        );

        if bytes.get(i) == Some(&b'-') {
            i += 1;
        }
    }

    text
}

fn base64_value(b: u8) -> Option<u32> {
    let value = match b {
        b'A'..=b'Z' => b - b'A',
        b'a'..=b'z' => b - b'a' + 26,
        b'0'..=b'9' => b - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(value as u32)
}
