//! # http11_request_stream
//!
//! 断片化したバイトストリームから HTTP/1.1 リクエストを読み取るライブラリ (Sans I/O)
//!
//! ## 特徴
//!
//! - **Sans I/O**: パーサー本体は I/O を持たず、チャンクを与えて進める
//! - **分割位置に依存しない**: どこで区切られたチャンクでも同じ結果になる
//! - **失敗しない**: 不正な入力は `is_complete == false` の結果として返す
//!
//! ## 使い方
//!
//! ### パーサーにチャンクを与える
//!
//! ```rust
//! use http11_request_stream::{Charset, MediaType, ParseStatus, RequestParser};
//!
//! let mut parser = RequestParser::new();
//! parser.feed(b"POST /api/data HTTP/1.1\r\n");
//! parser.feed(b"Content-Type: text/xml;charset=utf-8\r\n");
//! parser.feed(b"Accept: application/json,text/xml\r\n");
//! parser.feed(b"Content-Length: 4\r\n\r\n");
//! assert_eq!(parser.feed(b"data"), ParseStatus::Complete);
//!
//! let request = parser.finish();
//! assert!(request.is_complete);
//! assert_eq!(request.request_content_type, MediaType::Xml);
//! assert_eq!(request.request_content_encoding, Some(Charset::Utf8));
//! assert_eq!(request.response_content_type, MediaType::Json);
//! ```
//!
//! ### 供給元から読み取る
//!
//! ```rust
//! use std::io::Cursor;
//! use http11_request_stream::{ReadChunks, parse_request_stream};
//!
//! let reader = Cursor::new(b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n".to_vec());
//! let request = parse_request_stream(ReadChunks::new(reader));
//! assert!(request.is_complete);
//! assert_eq!(request.get_header("host"), Some("example.com"));
//! ```

pub mod accept;
mod buffer;
pub mod charset;
pub mod content_type;
mod error;
mod header;
mod limits;
mod method;
mod parsed;
mod parser;
mod request_line;
mod stream;
mod token;
pub mod uri;

pub use charset::Charset;
pub use content_type::{ContentTypeDescriptor, MediaType};
pub use error::Error;
pub use header::HeaderEntry;
pub use limits::DecoderLimits;
pub use method::Method;
pub use parsed::ParsedRequest;
pub use parser::{ParseStatus, RequestParser};
pub use request_line::RequestLine;
pub use stream::{ChunkSource, ReadChunks, parse_request_stream, parse_request_stream_with_limits};
