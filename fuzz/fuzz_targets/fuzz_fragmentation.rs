#![no_main]

use arbitrary::Arbitrary;
use http11_request_stream::{DecoderLimits, ParseStatus, RequestParser};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    data: Vec<u8>,
    cuts: Vec<u16>,
}

fuzz_target!(|input: Input| {
    let limits = DecoderLimits {
        max_empty_chunks: usize::MAX,
        ..DecoderLimits::default()
    };

    let mut single = RequestParser::with_limits(limits.clone());
    single.feed(&input.data);
    let single = single.finish();

    // 完了したリクエストは分割しても同じ結果になる
    if !single.is_complete {
        return;
    }

    let mut cuts: Vec<usize> = input
        .cuts
        .iter()
        .map(|&c| c as usize % (input.data.len() + 1))
        .collect();
    cuts.sort_unstable();

    let mut parser = RequestParser::with_limits(limits);
    let mut start = 0;
    for cut in cuts.into_iter().chain([input.data.len()]) {
        if parser.feed(&input.data[start..cut]) != ParseStatus::NeedMore {
            break;
        }
        start = cut;
    }
    assert_eq!(single, parser.finish());
});
