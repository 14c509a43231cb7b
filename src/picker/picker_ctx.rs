//! 选择上下文
//!
//! 封装"我正在为哪位作者的哪部作品选位置"这一信息

use std::fmt::Display;

use crate::models::{AuthorId, WorkId};

/// 选择上下文
#[derive(Debug, Clone)]
pub struct PickerCtx {
    /// 作者编号
    pub author: AuthorId,

    /// 作品编号
    pub work: WorkId,

    /// 显示用的作者名（来自补全候选，仅用于日志）
    pub author_name: String,
}

impl PickerCtx {
    /// 创建新的选择上下文
    pub fn new(author: AuthorId, work: WorkId, author_name: String) -> Self {
        Self {
            author,
            work,
            author_name,
        }
    }

    /// "lt0690w001" 形式的全局作品编号
    pub fn universal_id(&self) -> String {
        self.author.universal_id(&self.work)
    }
}

impl Display for PickerCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[作者 {} 作品 {}]", self.author, self.work)
    }
}
