#![no_main]

use http11_request_stream::uri::{Uri, percent_decode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(uri) = Uri::parse_request_target(s) {
            let _ = uri.scheme();
            let _ = uri.authority();
            let _ = uri.host();
            let _ = uri.port();
            let _ = uri.query();
            let _ = uri.decoded_path();
            assert_eq!(uri.as_str(), s);
            assert_ne!(uri.is_absolute(), uri.is_relative());
        }
        let _ = Uri::parse(s);
        let _ = percent_decode(s);
    }
});
