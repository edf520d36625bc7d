//! HTTP/1.1 リクエストパーサーモジュール
//!
//! Sans I/O 設計に基づくインクリメンタルパーサーを提供。
//! チャンクの区切り位置はどこでもよく、同じバイト列であれば分割方法によらず同じ結果になる。
//!
//! ## 使い方
//!
//! ```rust
//! use http11_request_stream::{ParseStatus, RequestParser};
//!
//! let mut parser = RequestParser::new();
//!
//! // チャンクを順に投入
//! let chunks: [&[u8]; 3] = [b"POST /items HTTP/1.1\r\n", b"Content-Length: 5\r\n\r\nhel", b"lo"];
//! for chunk in chunks {
//!     if parser.feed(chunk) != ParseStatus::NeedMore {
//!         break;
//!     }
//! }
//!
//! let request = parser.finish();
//! assert!(request.is_complete);
//! assert_eq!(request.content, "hello");
//! ```

mod content;
mod phase;
mod request;

pub use request::{ParseStatus, RequestParser};
