//! tokio_request_stream - Tokio integration for http11_request_stream
//!
//! tokio の [`AsyncRead`](tokio::io::AsyncRead) からチャンクを読み取り、
//! http11_request_stream のパーサーで HTTP/1.1 リクエストを 1 つ読み取る。
//!
//! ## 特徴
//!
//! - **http11_request_stream ベース**: Sans I/O パーサーをそのまま駆動する
//! - **非同期 I/O**: 次のチャンクを待つ間だけ中断する
//! - **読み取りタイムアウト**: 一定時間データが届かない場合はストリーム終了として扱う
//!
//! ## 使い方
//!
//! ```ignore
//! use std::time::Duration;
//! use tokio::net::TcpListener;
//! use tokio_request_stream::{AsyncReadChunks, parse_request_stream};
//!
//! let listener = TcpListener::bind("0.0.0.0:8080").await?;
//! let (stream, _) = listener.accept().await?;
//!
//! let source = AsyncReadChunks::new(stream).read_timeout(Duration::from_secs(30));
//! let request = parse_request_stream(source).await;
//! if request.is_complete {
//!     // ルーティング...
//! }
//! ```

pub mod error;
pub mod source;
mod stream;

pub use error::{Error, Result};
pub use source::{AsyncChunkSource, AsyncReadChunks};
pub use stream::{parse_request_stream, parse_request_stream_with_limits};

// http11_request_stream の型を re-export
pub use http11_request_stream::{DecoderLimits, ParsedRequest};
