//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// リクエスト生成
// ========================================

/// 認識される HTTP メソッド
pub fn http_method() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("GET"),
        Just("POST"),
        Just("PUT"),
        Just("DELETE"),
        Just("PATCH"),
        Just("HEAD"),
        Just("OPTIONS"),
        Just("CONNECT"),
        Just("TRACE"),
    ]
}

/// origin-form のリクエストターゲット
pub fn request_target() -> impl Strategy<Value = String> {
    (
        "(/[a-zA-Z0-9_.~-]{1,12}){0,4}",
        proptest::option::of("[a-z]{1,8}=[a-zA-Z0-9]{0,8}"),
    )
        .prop_map(|(path, query)| {
            let path = if path.is_empty() { "/".to_string() } else { path };
            match query {
                Some(q) => format!("{}?{}", path, q),
                None => path,
            }
        })
}

/// 値を解釈しないヘッダー名
pub fn plain_header_name() -> impl Strategy<Value = String> {
    "X-[A-Za-z0-9-]{1,16}".prop_map(|s| s)
}

/// ヘッダー値 (先頭の空白なし、コロンを含んでもよい)
pub fn header_value() -> impl Strategy<Value = String> {
    "[!-~]([ -~]{0,40}[!-~])?".prop_map(|s| s)
}

/// 行終端
pub fn line_ending() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\r\n"), Just("\n")]
}

/// 生成したリクエスト
#[derive(Debug, Clone)]
pub struct GeneratedRequest {
    pub method: &'static str,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// ワイヤー形式のバイト列
    pub bytes: Vec<u8>,
}

/// Content-Length 付きの完全なリクエスト
pub fn complete_request() -> impl Strategy<Value = GeneratedRequest> {
    (
        http_method(),
        request_target(),
        proptest::collection::vec((plain_header_name(), header_value()), 0..8),
        proptest::collection::vec(any::<u8>(), 0..128),
        line_ending(),
    )
        .prop_map(|(method, target, headers, body, eol)| {
            let mut bytes = format!("{} {} HTTP/1.1{}", method, target, eol).into_bytes();
            for (name, value) in &headers {
                bytes.extend_from_slice(format!("{}: {}{}", name, value, eol).as_bytes());
            }
            bytes.extend_from_slice(format!("Content-Length: {}{}{}", body.len(), eol, eol).as_bytes());
            bytes.extend_from_slice(&body);
            GeneratedRequest {
                method,
                target,
                headers,
                body,
                bytes,
            }
        })
}

// ========================================
// 分割
// ========================================

/// 分割位置 (0.0 以上 1.0 未満の比率)
pub fn split_ratios() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0f64..1.0, 0..16)
}

/// 比率で指定した位置でバイト列を分割する
///
/// 同じ位置が重なった場合は空のチャンクになる。
pub fn fragment(bytes: &[u8], ratios: &[f64]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = ratios
        .iter()
        .map(|r| ((bytes.len() as f64) * r) as usize)
        .collect();
    cuts.sort_unstable();

    let mut chunks = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        chunks.push(bytes[start..cut].to_vec());
        start = cut;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}
