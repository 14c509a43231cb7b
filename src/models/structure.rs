//! 作品结构描述
//!
//! 服务器逐层返回作品的引用层级信息（如 卷/诗/行），
//! 每条响应只描述一个层级

use serde::Deserialize;

use crate::error::{AppError, AppResult, StructureError};

/// 服务器用该值表示"范围未知"（上层层级未定时无法确定取值范围）
pub const UNKNOWN_BOUND: &str = "-9999";

/// 层级总数上限：服务器的行表最多有 level_00 到 level_05 六列
pub const MAX_LEVELS: usize = 6;

/// 作品结构响应
///
/// 例: `{"totallevels": 3, "level": 2, "label": "book", "low": "1", "high": "12", "range": ["1", ..., "12"]}`
#[derive(Debug, Clone, Deserialize)]
pub struct WorkStructure {
    pub totallevels: usize,
    pub level: usize,
    pub label: String,
    pub low: String,
    pub high: String,
    pub range: Vec<String>,
}

impl WorkStructure {
    /// 本层级的取值范围是否已知
    pub fn has_known_bounds(&self) -> bool {
        self.low != UNKNOWN_BOUND
    }

    /// 生成输入框的占位提示
    pub fn placeholder(&self) -> String {
        if self.has_known_bounds() {
            format!("({} {} to {})", self.label, self.low, self.high)
        } else {
            "(awaiting a valid selection...)".to_string()
        }
    }

    /// 校验响应的内部一致性
    ///
    /// 任何一项不满足都按响应损坏处理，调用方不得渲染
    pub fn validate(&self) -> AppResult<()> {
        if self.totallevels == 0 || self.totallevels > MAX_LEVELS {
            return Err(AppError::structure_schema_mismatch(format!(
                "totallevels 非法: {}",
                self.totallevels
            )));
        }
        if self.level >= self.totallevels {
            return Err(AppError::Structure(StructureError::LevelOutOfRange {
                level: self.level,
                total: self.totallevels,
            }));
        }
        if self.label.is_empty() {
            return Err(AppError::structure_schema_mismatch("label 为空".to_string()));
        }
        Ok(())
    }
}
