#![no_main]

use arbitrary::Arbitrary;
use http11_request_stream::{DecoderLimits, ParseStatus, RequestParser};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    chunks: Vec<Vec<u8>>,
    max_headers_count: u8,
    max_header_line_size: u16,
    max_body_size: u16,
    max_empty_chunks: u8,
}

fuzz_target!(|input: Input| {
    let limits = DecoderLimits {
        max_buffer_size: 64 * 1024,
        max_headers_count: input.max_headers_count as usize,
        max_header_line_size: input.max_header_line_size as usize,
        max_body_size: input.max_body_size as usize,
        max_empty_chunks: input.max_empty_chunks as usize,
    };

    let mut parser = RequestParser::with_limits(limits);
    for chunk in &input.chunks {
        if parser.feed(chunk) != ParseStatus::NeedMore {
            break;
        }
    }
    let request = parser.finish();

    assert_eq!(request.is_complete, request.incomplete_reason.is_none());
    if request.is_complete {
        assert!(request.method.is_some());
        assert!(request.uri.is_some());
        assert_eq!(request.body.len(), request.content_length.unwrap_or(0));
    }
});
