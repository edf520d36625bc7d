//! 受信バイト列の蓄積バッファ
//!
//! チャンク単位で届くデータを末尾に追加し、先頭から行単位またはバイト数単位で取り出す。
//! 取り出し済みの先頭部分はカーソルで管理し、一定量たまった時点でまとめて破棄する。

/// 受信データの蓄積バッファ
#[derive(Debug, Default, Clone)]
pub(crate) struct ByteAccumulator {
    buf: Vec<u8>,
    /// 読み取り位置 (これより前は消費済み)
    pos: usize,
    /// 行終端の探索を再開する位置
    scan_from: usize,
}

impl ByteAccumulator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 末尾にデータを追加
    ///
    /// 空のチャンクは何もしない。
    pub(crate) fn append(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        self.compact();
        self.buf.extend_from_slice(chunk);
    }

    /// 未消費のバイト数
    pub(crate) fn len(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 未消費データを参照
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    /// 行終端 (CRLF または LF) までを 1 行として取り出す
    ///
    /// 行終端が見つからない場合は何も消費せずに `None` を返す。
    /// 返す行には行終端を含まない。
    pub(crate) fn try_take_line(&mut self) -> Option<Vec<u8>> {
        let start = self.scan_from.max(self.pos);
        let Some(offset) = self.buf[start..].iter().position(|&b| b == b'\n') else {
            self.scan_from = self.buf.len();
            return None;
        };

        let lf = start + offset;
        let end = if lf > self.pos && self.buf[lf - 1] == b'\r' {
            lf - 1
        } else {
            lf
        };
        let line = self.buf[self.pos..end].to_vec();
        self.pos = lf + 1;
        self.scan_from = self.pos;
        Some(line)
    }

    /// 最大 `n` バイトを取り出す
    pub(crate) fn take_remaining(&mut self, n: usize) -> Vec<u8> {
        let end = self.pos + n.min(self.len());
        let data = self.buf[self.pos..end].to_vec();
        self.pos = end;
        self.scan_from = self.scan_from.max(self.pos);
        data
    }

    /// 消費済みの先頭部分を破棄
    fn compact(&mut self) {
        if self.pos == 0 {
            return;
        }
        if self.pos == self.buf.len() {
            self.buf.clear();
        } else if self.pos >= self.buf.len() / 2 {
            self.buf.drain(..self.pos);
        } else {
            return;
        }
        self.scan_from -= self.pos;
        self.pos = 0;
    }
}
