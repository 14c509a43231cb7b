//! 引用位置（locus）
//!
//! 一个 locus 是作品引用层级里的一个地址（如 卷 2 行 15），
//! 序列化成按 粗到细 顺序用 "|" 连接的层级值。
//!
//! 不变式：只允许从最粗层级开始的连续后缀非空。
//! 必须自上而下逐层选择，没选卷就不能先选行；
//! 也因此最细层级的值永远不会脱离上层语境单独出现在请求里

use regex::Regex;

/// 层级槽位总数，下标 0 是最细层级（如"行"），5 是最粗层级（如"卷"）
pub const LEVEL_COUNT: usize = 6;

/// "尚未选择任何位置"的标记
///
/// 请求结构信息时不会把它拼进路径，对应的路径段直接省略
pub const NO_LOCUS: &str = "firstline";

/// locus 层级取值错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocusError {
    /// 层级下标超出本作品的层级数
    #[error("层级 {level} 超出本作品范围（共 {total} 层）")]
    LevelOutOfRange { level: usize, total: usize },
    /// 更粗的层级还没选，违反自上而下的选择顺序
    #[error("层级 {missing} 尚未选择，不能先填层级 {level}")]
    GapAbove { level: usize, missing: usize },
    /// 清洗后值为空
    #[error("层级值不能为空")]
    EmptyValue,
}

/// 一个 locus：六个层级槽位加上本作品的实际层级数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    levels: [String; LEVEL_COUNT],
    total_levels: usize,
}

impl Default for Locus {
    fn default() -> Self {
        Self::new(LEVEL_COUNT)
    }
}

impl Locus {
    /// 创建空 locus
    pub fn new(total_levels: usize) -> Self {
        Self {
            levels: Default::default(),
            total_levels: total_levels.clamp(1, LEVEL_COUNT),
        }
    }

    /// 本作品的层级数
    pub fn total_levels(&self) -> usize {
        self.total_levels
    }

    /// 最粗层级的下标
    pub fn top_level(&self) -> usize {
        self.total_levels - 1
    }

    /// 按新的层级数重建（换作品后结构才可知），已选值全部清空
    pub fn reset_with_total(&mut self, total_levels: usize) {
        *self = Self::new(total_levels);
    }

    /// 读取某层级已选的值；空串表示未选
    pub fn value(&self, level: usize) -> &str {
        self.levels.get(level).map(|s| s.as_str()).unwrap_or("")
    }

    /// 选择某层级的值
    ///
    /// 要求所有更粗的层级都已选定，并清空所有更细的层级：
    /// 换了卷之后原来选的行不再有意义
    pub fn set(&mut self, level: usize, value: &str) -> Result<(), LocusError> {
        if level >= self.total_levels {
            return Err(LocusError::LevelOutOfRange {
                level,
                total: self.total_levels,
            });
        }
        let value = sanitize(value);
        if value.is_empty() {
            return Err(LocusError::EmptyValue);
        }
        for upper in (level + 1)..self.total_levels {
            if self.levels[upper].is_empty() {
                return Err(LocusError::GapAbove {
                    level,
                    missing: upper,
                });
            }
        }
        self.levels[level] = value;
        for lower in 0..level {
            self.levels[lower].clear();
        }
        Ok(())
    }

    /// 已选定的连续层级数（从最粗层级数起）
    pub fn depth(&self) -> usize {
        (0..self.total_levels)
            .rev()
            .take_while(|&level| !self.levels[level].is_empty())
            .count()
    }

    /// 是否一个层级都还没选
    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// 清空全部层级
    pub fn clear(&mut self) {
        for level in self.levels.iter_mut() {
            level.clear();
        }
    }

    /// 序列化成 "2|5" 形式：按 粗到细 连接非空后缀
    ///
    /// 从最粗层级往下，遇到第一个空层级即停止，更细的值不会被发送
    pub fn serialize(&self) -> String {
        let mut parts = Vec::new();
        for level in (0..self.total_levels).rev() {
            if self.levels[level].is_empty() {
                break;
            }
            parts.push(self.levels[level].as_str());
        }
        parts.join("|")
    }

    /// 序列化成请求用的 partial locus；一层都没选时返回 NO_LOCUS 标记
    pub fn as_partial(&self) -> String {
        let serialized = self.serialize();
        if serialized.is_empty() {
            NO_LOCUS.to_string()
        } else {
            serialized
        }
    }

    /// 从 "2|5" 形式的字符串恢复
    ///
    /// 超出层级数的多余片段按服务器的处理方式丢弃
    pub fn parse(raw: &str, total_levels: usize) -> Result<Self, LocusError> {
        let mut locus = Self::new(total_levels);
        if raw.is_empty() || raw == NO_LOCUS {
            return Ok(locus);
        }
        let mut level = locus.top_level();
        for part in raw.split('|') {
            locus.set(level, part)?;
            if level == 0 {
                break;
            }
            level -= 1;
        }
        Ok(locus)
    }
}

/// 去掉服务器会拒绝的标点，与服务器端的清洗规则保持一致
fn sanitize(value: &str) -> String {
    if let Ok(re) = Regex::new(r"[!@#$%^&*()=|]+") {
        re.replace_all(value.trim(), "").to_string()
    } else {
        value.trim().to_string()
    }
}
