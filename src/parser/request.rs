//! HTTP リクエストパーサー

use crate::accept::{negotiate_charset, negotiate_media_type};
use crate::buffer::ByteAccumulator;
use crate::charset::Charset;
use crate::content_type::{ContentType, ContentTypeDescriptor, MediaType};
use crate::error::Error;
use crate::header::{HeaderEntry, StructuredHeader, parse_header_line};
use crate::limits::DecoderLimits;
use crate::parsed::ParsedRequest;
use crate::request_line::RequestLine;

use super::content::{ContentAssembler, ContentProgress, parse_content_length};
use super::phase::ParsePhase;

/// パースの進行状況
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// データ不足
    NeedMore,
    /// リクエスト全体を受信した
    Complete,
    /// これ以上データを与えても完了しない
    Incomplete,
}

/// HTTP リクエストパーサー (Sans I/O)
///
/// 受信したデータを `feed()` で順に与え、`finish()` で結果を取り出す。
/// 1 つのインスタンスで 1 つのリクエストだけを扱う。
///
/// ```rust
/// use http11_request_stream::{Method, ParseStatus, RequestParser};
///
/// let mut parser = RequestParser::new();
/// assert_eq!(parser.feed(b"GET /api/data HTTP/1.1\r\nContent-Le"), ParseStatus::NeedMore);
/// assert_eq!(parser.feed(b"ngth: 4\r\n\r\nda"), ParseStatus::NeedMore);
/// assert_eq!(parser.feed(b"ta"), ParseStatus::Complete);
///
/// let request = parser.finish();
/// assert!(request.is_complete);
/// assert_eq!(request.method, Some(Method::Get));
/// assert_eq!(request.content, "data");
/// ```
#[derive(Debug)]
pub struct RequestParser {
    buf: ByteAccumulator,
    phase: ParsePhase,
    limits: DecoderLimits,
    request_line: Option<RequestLine>,
    headers: Vec<HeaderEntry>,
    content_length: Option<usize>,
    content_type: ContentTypeDescriptor,
    /// Accept ヘッダーの値 (複数ある場合は出現順)
    accept: Vec<String>,
    /// Accept-Charset ヘッダーの値 (複数ある場合は出現順)
    accept_charset: Vec<String>,
    content: Option<ContentAssembler>,
    /// 連続した空チャンクの数
    empty_chunks: usize,
    failure: Option<Error>,
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestParser {
    /// 新しいパーサーを作成
    pub fn new() -> Self {
        Self::with_limits(DecoderLimits::default())
    }

    /// 制限付きでパーサーを作成
    pub fn with_limits(limits: DecoderLimits) -> Self {
        Self {
            buf: ByteAccumulator::new(),
            phase: ParsePhase::RequestLine,
            limits,
            request_line: None,
            headers: Vec::new(),
            content_length: None,
            content_type: ContentTypeDescriptor::default(),
            accept: Vec::new(),
            accept_charset: Vec::new(),
            content: None,
            empty_chunks: 0,
            failure: None,
        }
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    /// 現在の進行状況
    pub fn status(&self) -> ParseStatus {
        match self.phase {
            ParsePhase::Complete => ParseStatus::Complete,
            ParsePhase::Incomplete => ParseStatus::Incomplete,
            _ => ParseStatus::NeedMore,
        }
    }

    /// 受信したチャンクを与えてパースを進める
    ///
    /// 空のチャンクは何もしない。ただし `max_empty_chunks` を超えて連続した場合は
    /// ストリームが終了したものとして扱う。
    /// 完了または不完全が確定した後のデータは読まない。
    pub fn feed(&mut self, chunk: &[u8]) -> ParseStatus {
        if self.phase.is_terminal() {
            return self.status();
        }

        if chunk.is_empty() {
            self.empty_chunks += 1;
            tracing::trace!(count = self.empty_chunks, "empty chunk");
            if self.empty_chunks > self.limits.max_empty_chunks {
                self.fail(Error::UnexpectedEnd);
            }
            return self.status();
        }

        self.empty_chunks = 0;
        tracing::trace!(len = chunk.len(), "chunk received");
        self.buf.append(chunk);

        if let Err(e) = self.advance() {
            self.fail(e);
        }
        self.status()
    }

    /// パースを終了して結果を取り出す
    ///
    /// 完了していない場合はストリームが終了したものとして扱い、不完全な結果を返す。
    pub fn finish(mut self) -> ParsedRequest {
        if !self.phase.is_terminal() {
            self.fail(Error::UnexpectedEnd);
        }

        let is_complete = self.phase == ParsePhase::Complete;
        let body = self
            .content
            .map(ContentAssembler::into_body)
            .unwrap_or_default();
        let content = self
            .content_type
            .charset
            .unwrap_or(Charset::Utf8)
            .decode(&body);

        let response_content_type = if self.accept.is_empty() {
            MediaType::Unknown
        } else {
            negotiate_media_type(&self.accept.join(","))
        };
        let response_content_encoding = if self.accept_charset.is_empty() {
            None
        } else {
            negotiate_charset(&self.accept_charset.join(","))
        };

        tracing::debug!(
            complete = is_complete,
            headers = self.headers.len(),
            content_len = body.len(),
            "request parse finished"
        );

        let (method, uri, http_version) = match self.request_line {
            Some(line) => (Some(line.method), Some(line.uri), Some(line.version)),
            None => (None, None, None),
        };

        ParsedRequest {
            method,
            uri,
            http_version,
            headers: self.headers,
            content,
            body,
            content_length: self.content_length,
            request_content_type: self.content_type.media_type,
            request_content_encoding: self.content_type.charset,
            response_content_type,
            response_content_encoding,
            is_complete,
            incomplete_reason: self.failure,
        }
    }

    fn fail(&mut self, error: Error) {
        tracing::debug!(error = %error, phase = ?self.phase, "request incomplete");
        self.failure = Some(error);
        self.phase = ParsePhase::Incomplete;
    }

    fn transition(&mut self, next: ParsePhase) {
        tracing::trace!(from = ?self.phase, to = ?next, "phase transition");
        self.phase = next;
    }

    /// バッファにあるデータで進められるところまで状態を進める
    fn advance(&mut self) -> Result<(), Error> {
        loop {
            match self.phase {
                ParsePhase::RequestLine => {
                    let Some(line) = self.take_line()? else {
                        return Ok(());
                    };
                    let line = String::from_utf8(line)
                        .map_err(|e| Error::InvalidRequestLine(format!("invalid UTF-8: {e}")))?;
                    self.request_line = Some(RequestLine::parse(&line)?);
                    self.transition(ParsePhase::Headers);
                }
                ParsePhase::Headers => {
                    let Some(line) = self.take_line()? else {
                        return Ok(());
                    };
                    if line.is_empty() {
                        self.begin_content()?;
                        continue;
                    }

                    if self.headers.len() >= self.limits.max_headers_count {
                        return Err(Error::TooManyHeaders {
                            count: self.headers.len() + 1,
                            limit: self.limits.max_headers_count,
                        });
                    }

                    // obs-text を含む値もそのまま受け付ける
                    let line = String::from_utf8_lossy(&line);
                    let entry = parse_header_line(&line)?;
                    // 値の解釈に失敗したヘッダーも一覧には残す
                    let result = self.apply_structured(&entry);
                    self.headers.push(entry);
                    result?;
                }
                ParsePhase::Content => {
                    let Some(content) = self.content.as_mut() else {
                        return Err(Error::UnexpectedEnd);
                    };
                    let progress = content.absorb(&mut self.buf)?;
                    tracing::trace!(received = content.received(), "content received");
                    if progress == ContentProgress::Complete {
                        self.transition(ParsePhase::Complete);
                    }
                    return Ok(());
                }
                ParsePhase::Complete | ParsePhase::Incomplete => return Ok(()),
            }
        }
    }

    /// 1 行取り出す
    ///
    /// 行終端が見つからない場合は、溜まっているデータ量が制限内か確認する。
    fn take_line(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let limit = self.limits.max_header_line_size;
        if let Some(line) = self.buf.try_take_line() {
            if line.len() > limit {
                return Err(Error::HeaderLineTooLong {
                    size: line.len(),
                    limit,
                });
            }
            return Ok(Some(line));
        }

        if self.buf.len() > self.limits.max_buffer_size {
            return Err(Error::BufferOverflow {
                size: self.buf.len(),
                limit: self.limits.max_buffer_size,
            });
        }

        // 末尾の CR は行終端の一部になりうるので行長に含めない
        let pending = self.buf.as_slice();
        let line_len = pending.strip_suffix(b"\r").unwrap_or(pending).len();
        if line_len > limit {
            return Err(Error::HeaderLineTooLong {
                size: line_len,
                limit,
            });
        }
        Ok(None)
    }

    /// ヘッダー終端に達したのでコンテンツの読み取りを始める
    ///
    /// Content-Length がない場合は 0 バイトとして扱う。
    fn begin_content(&mut self) -> Result<(), Error> {
        let expected = self.content_length.unwrap_or(0);
        if expected > self.limits.max_body_size {
            return Err(Error::BodyTooLarge {
                size: expected,
                limit: self.limits.max_body_size,
            });
        }
        self.content = Some(ContentAssembler::new(expected));
        self.transition(ParsePhase::Content);
        Ok(())
    }

    /// 値を解釈するヘッダーを反映
    fn apply_structured(&mut self, entry: &HeaderEntry) -> Result<(), Error> {
        let Some(kind) = StructuredHeader::classify(&entry.name) else {
            return Ok(());
        };

        match kind {
            StructuredHeader::ContentLength => {
                let len = parse_content_length(&entry.raw_value)?;
                if self.content_length.is_some_and(|prev| prev != len) {
                    return Err(Error::InvalidHeader(
                        "conflicting Content-Length values".to_string(),
                    ));
                }
                self.content_length = Some(len);
            }
            StructuredHeader::ContentType => match ContentType::parse(&entry.raw_value) {
                Ok(content_type) => self.content_type = content_type.descriptor(),
                Err(e) => {
                    tracing::trace!(error = %e, "ignoring unparseable Content-Type");
                    self.content_type = ContentTypeDescriptor::default();
                }
            },
            StructuredHeader::Accept => self.accept.push(entry.raw_value.clone()),
            StructuredHeader::AcceptCharset => self.accept_charset.push(entry.raw_value.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    fn parse_all(chunks: &[&[u8]]) -> ParsedRequest {
        let mut parser = RequestParser::new();
        for chunk in chunks {
            if parser.feed(chunk) != ParseStatus::NeedMore {
                break;
            }
        }
        parser.finish()
    }

    #[test]
    fn single_chunk_complete() {
        let request = parse_all(&[b"GET /api/data HTTP/1.1\r\nContent-Length: 4\r\n\r\ndata"]);
        assert!(request.is_complete);
        assert_eq!(request.method, Some(Method::Get));
        assert_eq!(request.uri.as_ref().map(|u| u.as_str()), Some("/api/data"));
        assert_eq!(request.http_version.as_deref(), Some("HTTP/1.1"));
        assert_eq!(request.content_length, Some(4));
        assert_eq!(request.content, "data");
        assert_eq!(request.body, b"data");
        assert_eq!(request.incomplete_reason, None);
    }

    #[test]
    fn bare_lf_line_endings() {
        let request = parse_all(&[b"POST /x HTTP/1.1\nContent-Length: 2\n\nok"]);
        assert!(request.is_complete);
        assert_eq!(request.method, Some(Method::Post));
        assert_eq!(request.content, "ok");
    }

    #[test]
    fn no_content_length_completes_at_boundary() {
        let request = parse_all(&[b"GET /api/data HTTP/1.1\r\n\r\n"]);
        assert!(request.is_complete);
        assert_eq!(request.content_length, None);
        assert!(request.content.is_empty());
    }

    #[test]
    fn status_transitions() {
        let mut parser = RequestParser::new();
        assert_eq!(parser.status(), ParseStatus::NeedMore);
        assert_eq!(parser.feed(b"GET / HTTP/1.1\r\n"), ParseStatus::NeedMore);
        assert_eq!(parser.feed(b"\r\n"), ParseStatus::Complete);
        // 完了後のデータは読まない
        assert_eq!(parser.feed(b"garbage"), ParseStatus::Complete);
        assert!(parser.finish().is_complete);
    }

    #[test]
    fn finish_before_complete_is_incomplete() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET /api/data HTTP/1.1\r\nContent-Length: 4\r\n\r\nda");
        let request = parser.finish();
        assert!(!request.is_complete);
        assert_eq!(request.incomplete_reason, Some(Error::UnexpectedEnd));
        assert_eq!(request.body, b"da");
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn invalid_content_length_is_incomplete() {
        let mut parser = RequestParser::new();
        let status = parser.feed(b"GET /api/data HTTP/1.1\r\nContent-Length: four\r\n\r\ndata");
        assert_eq!(status, ParseStatus::Incomplete);
        let request = parser.finish();
        assert!(!request.is_complete);
        assert_eq!(request.content_length, None);
        assert_eq!(request.headers[0].raw_value, "four");
        assert_eq!(
            request.incomplete_reason,
            Some(Error::InvalidContentLength("four".to_string()))
        );
    }

    #[test]
    fn over_length_in_same_chunk_is_incomplete() {
        let request = parse_all(&[
            b"GET /api/data HTTP/1.1\r\nContent-Length: 4\r\n\r\ndataplusanotherextrafewbytes",
        ]);
        assert!(!request.is_complete);
        assert_eq!(
            request.incomplete_reason,
            Some(Error::ContentTooLong {
                expected: 4,
                received: 28
            })
        );
    }

    #[test]
    fn zero_content_length_with_stray_bytes_is_incomplete() {
        let request = parse_all(&[b"GET / HTTP/1.1\r\nContent-Length: 0\r\n\r\nx"]);
        assert!(!request.is_complete);
    }

    #[test]
    fn conflicting_content_lengths() {
        let request =
            parse_all(&[b"POST / HTTP/1.1\r\nContent-Length: 4\r\nContent-Length: 5\r\n\r\ndata"]);
        assert!(!request.is_complete);

        let request =
            parse_all(&[b"POST / HTTP/1.1\r\nContent-Length: 4\r\nContent-Length: 4\r\n\r\ndata"]);
        assert!(request.is_complete);
        assert_eq!(request.get_headers("content-length"), vec!["4", "4"]);
    }

    #[test]
    fn malformed_request_line_is_incomplete() {
        let request = parse_all(&[b"get /api/data HTTP/1.1\r\n\r\n"]);
        assert!(!request.is_complete);
        assert_eq!(request.method, None);
        assert!(matches!(
            request.incomplete_reason,
            Some(Error::InvalidRequestLine(_))
        ));
    }

    #[test]
    fn malformed_header_is_incomplete() {
        let request = parse_all(&[b"GET / HTTP/1.1\r\nNoColon\r\n\r\n"]);
        assert!(!request.is_complete);
        assert!(matches!(
            request.incomplete_reason,
            Some(Error::InvalidHeader(_))
        ));
        assert_eq!(request.method, Some(Method::Get));
    }

    #[test]
    fn obs_text_in_unrelated_header_is_accepted() {
        let request = parse_all(&[b"GET / HTTP/1.1\r\nX-Name: caf\xE9\r\nX Spaced: v\r\n\r\n"]);
        assert!(request.is_complete);
        assert_eq!(request.incomplete_reason, None);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers[0].raw_value, "caf\u{FFFD}");
        assert_eq!(request.headers[1].name, "X Spaced");
    }

    #[test]
    fn structured_headers_resolve() {
        let request = parse_all(&[b"GET /api/data HTTP/1.1\r\n\
            Content-Length: 4\r\n\
            Accept: application/json,text/xml\r\n\
            Accept-Charset: utf-7;q=0.2, utf-8;q=0.1,*;q=0\r\n\
            Content-Type: text/xml;charset=utf-8\r\n\
            UnknownHeader: some:value\r\n\
            \r\n\
            data"]);
        assert!(request.is_complete);
        assert_eq!(request.request_content_type, MediaType::Xml);
        assert_eq!(request.request_content_encoding, Some(Charset::Utf8));
        assert_eq!(request.response_content_type, MediaType::Json);
        assert_eq!(request.response_content_encoding, Some(Charset::Utf7));
        assert_eq!(request.get_header("unknownheader"), Some("some:value"));
        assert_eq!(request.headers.len(), 5);
    }

    #[test]
    fn unparseable_content_type_is_not_fatal() {
        let request = parse_all(&[b"POST / HTTP/1.1\r\nContent-Type: nonsense\r\n\r\n"]);
        assert!(request.is_complete);
        assert_eq!(request.request_content_type, MediaType::Unknown);
        assert_eq!(request.request_content_encoding, None);
    }

    #[test]
    fn multiple_accept_headers_are_combined() {
        let request = parse_all(&[
            b"GET / HTTP/1.1\r\nAccept: image/png\r\nAccept: text/plain;q=0.5\r\n\r\n",
        ]);
        assert_eq!(request.response_content_type, MediaType::Plain);
    }

    #[test]
    fn content_decoded_with_request_charset() {
        let mut raw = b"POST / HTTP/1.1\r\nContent-Type: text/plain; charset=iso-8859-1\r\nContent-Length: 3\r\n\r\n".to_vec();
        raw.extend_from_slice(&[b'c', 0xE9, b'!']);
        let request = parse_all(&[&raw]);
        assert!(request.is_complete);
        assert_eq!(request.content, "c\u{E9}!");
    }

    #[test]
    fn empty_chunk_budget() {
        let mut parser = RequestParser::new();
        parser.feed(b"GET / HTTP/1.1\r\nContent-Length: 4\r\n\r\n");
        for _ in 0..3 {
            assert_eq!(parser.feed(b""), ParseStatus::NeedMore);
        }
        assert_eq!(parser.feed(b"data"), ParseStatus::Complete);

        let mut parser = RequestParser::new();
        parser.feed(b"GET / HTTP/1.1\r\nContent-Length: 4\r\n\r\n");
        for _ in 0..3 {
            parser.feed(b"");
        }
        assert_eq!(parser.feed(b""), ParseStatus::Incomplete);
        assert_eq!(parser.feed(b"data"), ParseStatus::Incomplete);
    }

    #[test]
    fn non_empty_chunk_resets_empty_budget() {
        let mut parser = RequestParser::new();
        for part in [&b"GET / HTTP/1.1\r\n"[..], b"Content-Length: 4\r\n\r\n", b"da"] {
            for _ in 0..3 {
                parser.feed(b"");
            }
            assert_eq!(parser.feed(part), ParseStatus::NeedMore);
        }
        assert_eq!(parser.feed(b"ta"), ParseStatus::Complete);
    }

    #[test]
    fn too_many_headers() {
        let limits = DecoderLimits {
            max_headers_count: 1,
            ..DecoderLimits::default()
        };
        let mut parser = RequestParser::with_limits(limits);
        let status = parser.feed(b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\n\r\n");
        assert_eq!(status, ParseStatus::Incomplete);
        assert_eq!(
            parser.finish().incomplete_reason,
            Some(Error::TooManyHeaders { count: 2, limit: 1 })
        );
    }

    #[test]
    fn header_line_too_long_without_terminator() {
        let limits = DecoderLimits {
            max_header_line_size: 16,
            ..DecoderLimits::default()
        };
        let mut parser = RequestParser::with_limits(limits);
        parser.feed(b"GET / HTTP/1.1\r\n");
        assert_eq!(
            parser.feed(b"X-Long: aaaaaaaaaaaaaaaaaaaa"),
            ParseStatus::Incomplete
        );
    }

    #[test]
    fn body_too_large() {
        let limits = DecoderLimits {
            max_body_size: 8,
            ..DecoderLimits::default()
        };
        let mut parser = RequestParser::with_limits(limits);
        let status = parser.feed(b"POST / HTTP/1.1\r\nContent-Length: 9\r\n\r\n");
        assert_eq!(status, ParseStatus::Incomplete);
        assert_eq!(
            parser.finish().incomplete_reason,
            Some(Error::BodyTooLarge { size: 9, limit: 8 })
        );
    }
}
