#![no_main]

use http11_request_stream::Charset;
use http11_request_stream::content_type::ContentType;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(ct) = ContentType::parse(s) {
            let _ = ct.mime_type();
            let _ = ct.descriptor();
            let displayed = ct.to_string();
            assert_eq!(ContentType::parse(&displayed).ok(), Some(ct));
        }
    }

    for charset in [
        Charset::Utf8,
        Charset::Utf7,
        Charset::Utf16Le,
        Charset::Utf16Be,
        Charset::UsAscii,
        Charset::Iso8859_1,
    ] {
        let _ = charset.decode(data);
    }
});
