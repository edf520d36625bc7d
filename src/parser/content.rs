//! コンテンツの組み立て
//!
//! ヘッダー終端以降のバイトを Content-Length と突き合わせて蓄積する。

use crate::buffer::ByteAccumulator;
use crate::error::Error;

/// コンテンツ読み取りの進捗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentProgress {
    /// まだ足りない
    Continue,
    /// 期待したバイト数ちょうどに達した
    Complete,
}

/// コンテンツの蓄積 (内部用)
#[derive(Debug, Clone)]
pub(crate) struct ContentAssembler {
    /// 期待するバイト数
    expected: usize,
    /// 受信済みコンテンツ
    body: Vec<u8>,
}

impl ContentAssembler {
    pub(crate) fn new(expected: usize) -> Self {
        Self {
            expected,
            body: Vec::new(),
        }
    }

    /// バッファにあるデータをすべてコンテンツとして取り込む
    ///
    /// 期待するバイト数を超えた場合は切り詰めずにエラーとする。
    pub(crate) fn absorb(&mut self, buf: &mut ByteAccumulator) -> Result<ContentProgress, Error> {
        if buf.is_empty() {
            return Ok(self.progress());
        }

        let received = self.body.len() + buf.len();
        if received > self.expected {
            return Err(Error::ContentTooLong {
                expected: self.expected,
                received,
            });
        }

        let available = buf.len();
        self.body.extend_from_slice(&buf.take_remaining(available));
        Ok(self.progress())
    }

    fn progress(&self) -> ContentProgress {
        if self.body.len() == self.expected {
            ContentProgress::Complete
        } else {
            ContentProgress::Continue
        }
    }

    /// 受信済みバイト数
    pub(crate) fn received(&self) -> usize {
        self.body.len()
    }

    pub(crate) fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// Content-Length の値をパース
///
/// 10 進数の非負整数のみ受け付ける。符号や空白を含む値はエラー。
pub(crate) fn parse_content_length(value: &str) -> Result<usize, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidContentLength(value.to_string()));
    }
    trimmed
        .parse()
        .map_err(|_| Error::InvalidContentLength(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_in_one_absorb() {
        let mut buf = ByteAccumulator::new();
        buf.append(b"data");
        let mut content = ContentAssembler::new(4);
        assert_eq!(content.absorb(&mut buf).unwrap(), ContentProgress::Complete);
        assert!(buf.is_empty());
        assert_eq!(content.into_body(), b"data");
    }

    #[test]
    fn complete_across_absorbs() {
        let mut buf = ByteAccumulator::new();
        let mut content = ContentAssembler::new(4);
        for b in b"dat" {
            buf.append(&[*b]);
            assert_eq!(content.absorb(&mut buf).unwrap(), ContentProgress::Continue);
        }
        assert_eq!(content.received(), 3);
        buf.append(b"a");
        assert_eq!(content.absorb(&mut buf).unwrap(), ContentProgress::Complete);
    }

    #[test]
    fn zero_length_completes_immediately() {
        let mut buf = ByteAccumulator::new();
        let mut content = ContentAssembler::new(0);
        assert_eq!(content.absorb(&mut buf).unwrap(), ContentProgress::Complete);
    }

    #[test]
    fn over_length_is_an_error() {
        let mut buf = ByteAccumulator::new();
        buf.append(b"dataplusanotherextrafewbytes");
        let mut content = ContentAssembler::new(4);
        assert_eq!(
            content.absorb(&mut buf),
            Err(Error::ContentTooLong {
                expected: 4,
                received: 28
            })
        );
    }

    #[test]
    fn stray_bytes_with_zero_length() {
        let mut buf = ByteAccumulator::new();
        buf.append(b"x");
        let mut content = ContentAssembler::new(0);
        assert!(content.absorb(&mut buf).is_err());
    }

    #[test]
    fn content_length_values() {
        assert_eq!(parse_content_length("4").unwrap(), 4);
        assert_eq!(parse_content_length(" 0 ").unwrap(), 0);
        assert!(parse_content_length("four").is_err());
        assert!(parse_content_length("-1").is_err());
        assert!(parse_content_length("+4").is_err());
        assert!(parse_content_length("").is_err());
        assert!(parse_content_length("4 4").is_err());
        assert!(parse_content_length("99999999999999999999999999").is_err());
    }
}
