//! 流程层（Picker）
//!
//! ## 职责
//!
//! 本层定义"逐层披露作品引用层级"的完整流程。
//!
//! ## 模块划分
//!
//! ### `level_state` - 层级输入框状态机
//! - Hidden -> Pending -> Resolved 三态
//! - 单个输入框的配置（标签、占位提示、候选列表）
//!
//! ### `panel` - 选择面板
//! - 界面状态的唯一权威（双轨道十二个输入框 + 两个 locus）
//! - 归约函数 apply_structure（过期响应丢弃、损坏响应拒绝）
//!
//! ### `resolver` - 位置解析器
//! - 流程编排（查询 → 披露 → 选定 → 再查询）
//! - 不持有界面资源，不关心传输细节
//!
//! ### `picker_ctx` - 选择上下文
//! - 封装 作者编号 + 作品编号
//!
//! ## 层次关系
//!
//! ```text
//! resolver (编排一部作品的披露流程)
//!     ↓
//! panel (双轨道状态归约)
//!     ↓
//! level_state (单个输入框)
//! ```

pub mod level_state;
pub mod panel;
pub mod picker_ctx;
pub mod resolver;

// 重新导出主要类型
pub use level_state::{LevelField, LevelState};
pub use panel::{PickerPanel, Track};
pub use picker_ctx::PickerCtx;
pub use resolver::LocusResolver;
