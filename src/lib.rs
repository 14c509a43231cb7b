//! # Locus Picker
//!
//! 古典文献语料库检索界面的位置选择器
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 持有 HTTP 连接，只暴露服务器端点的类型化调用
//! - `CorpusClient` - workstructure / hints / worksof / selection 端点
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程顺序
//! - `StructureService` - 结构查询能力（重试 + 请求票号）
//! - `HintService` - 作者/作品补全能力
//! - `SelectionService` - 选择注册能力
//!
//! ### ③ 流程层（Picker）
//! - `picker/` - 定义"逐层披露引用层级"的完整流程
//! - `PickerPanel` - 界面状态的唯一权威（双轨道状态机 + 响应水位线）
//! - `LocusResolver` - 流程编排（查询 → 披露 → 选定 → 再查询）
//!
//! ### ④ 编排层（App）
//! - `app` - 交互循环，管理资源和会话日志
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod picker;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AuthorId, Corpus, Locus, WorkId, WorkStructure};
pub use picker::{LevelState, LocusResolver, PickerCtx, PickerPanel, Track};
pub use services::{HintService, SelectionService, StructureService, Ticket};
