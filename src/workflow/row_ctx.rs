//! 行处理上下文
//!
//! 封装"我正在处理第几行"这一信息

use std::fmt::Display;

/// 行处理上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCtx {
    /// 行号（从1开始，不含表头）
    pub index: usize,

    /// 总行数（仅用于日志显示）
    pub total: usize,
}

impl RowCtx {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

impl Display for RowCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[行 {}/{}]", self.index, self.total)
    }
}
