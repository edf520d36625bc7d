//! パース状態の定義

/// パース状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParsePhase {
    /// リクエストライン待ち
    RequestLine,
    /// ヘッダー待ち
    Headers,
    /// コンテンツ読み取り中
    Content,
    /// 完了
    Complete,
    /// 不完全 (これ以上進まない)
    Incomplete,
}

impl ParsePhase {
    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, ParsePhase::Complete | ParsePhase::Incomplete)
    }
}
