//! 层级输入框状态机
//!
//! 每个引用层级对应一个输入框，状态只有三种：
//! Hidden（上层未定，不可达）-> Pending（候选列表就绪，等待取值）-> Resolved（已选定）。
//! 作者或作品一变，全部输入框打回 Hidden

use crate::models::WorkStructure;

/// 输入框状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelState {
    /// 不可达：上层层级尚未选定
    #[default]
    Hidden,
    /// 可见，候选列表已就绪，等待取值
    Pending,
    /// 已选定，下一个更细层级随之进入 Pending
    Resolved,
}

/// 单个层级的输入框
#[derive(Debug, Clone, Default)]
pub struct LevelField {
    pub state: LevelState,
    pub label: String,
    pub placeholder: String,
    pub options: Vec<String>,
    pub value: String,
}

impl LevelField {
    /// 按结构响应配置并披露本输入框（进入 Pending）
    ///
    /// 重新披露会清掉旧值：上层换了值之后旧值不再有意义
    pub fn reveal(&mut self, ws: &WorkStructure) {
        self.state = LevelState::Pending;
        self.label = ws.label.clone();
        self.placeholder = ws.placeholder();
        self.options = ws.range.clone();
        self.value.clear();
    }

    /// 记录选定值（进入 Resolved）
    pub fn resolve(&mut self, value: &str) {
        self.state = LevelState::Resolved;
        self.value = value.to_string();
    }

    /// 清空并隐藏（回到 Hidden）
    pub fn hide(&mut self) {
        *self = Self::default();
    }

    /// 值是否在候选列表里
    pub fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|option| option == value)
    }

    /// 是否可见（Pending 或 Resolved）
    pub fn is_visible(&self) -> bool {
        self.state != LevelState::Hidden
    }
}
