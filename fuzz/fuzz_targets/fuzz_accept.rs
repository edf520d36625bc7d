#![no_main]

use http11_request_stream::accept::{QualityList, negotiate_charset, negotiate_media_type};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for list in [QualityList::parse_accept(s), QualityList::parse_tokens(s)] {
            if let Some(best) = list.best() {
                assert!(!best.qvalue().is_zero());
                assert!(list.items().iter().all(|item| item.qvalue() <= best.qvalue()));
            }
            let _ = list.to_string();
        }
        let _ = negotiate_media_type(s);
        let _ = negotiate_charset(s);
    }
});
