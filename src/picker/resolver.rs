//! 位置解析流程 - 流程层
//!
//! 核心职责：编排"逐层披露作品引用层级"的完整流程
//!
//! 流程顺序：
//! 1. 选定作者/作品 → 查询最粗层级
//! 2. 每选定一层 → 带上累计 locus 查询下一层
//! 3. 终点轨道按需独立下钻，表达闭区间范围

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, PickerError};
use crate::picker::panel::{PickerPanel, Track};
use crate::picker::picker_ctx::PickerCtx;
use crate::services::StructureService;

/// 位置解析器
///
/// - 编排逐层披露流程，不关心传输细节
/// - 面板是界面状态的唯一权威，解析器只往里灌结构响应
/// - 不持有任何界面资源
pub struct LocusResolver {
    service: StructureService,
    panel: PickerPanel,
    ctx: Option<PickerCtx>,
}

impl LocusResolver {
    /// 创建新的位置解析器
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            service: StructureService::new(config)?,
            panel: PickerPanel::new(),
            ctx: None,
        })
    }

    /// 当前面板状态
    pub fn panel(&self) -> &PickerPanel {
        &self.panel
    }

    /// 当前上下文
    pub fn ctx(&self) -> Option<&PickerCtx> {
        self.ctx.as_ref()
    }

    /// 开始为一部新作品选位置：先整体复位，再披露最粗层级
    pub async fn start(&mut self, ctx: PickerCtx) -> AppResult<bool> {
        self.reset();
        info!("{} 开始披露引用层级", ctx);
        self.ctx = Some(ctx);
        self.resolve_level(Track::Primary).await
    }

    /// 复位：界面回到未选状态，复位前发出的请求全部作废
    pub fn reset(&mut self) {
        self.panel.reset();
        // 领一张屏障票，把两条轨道的水位线抬到它之上
        let barrier = self.service.issue_ticket();
        self.panel.invalidate_up_to(barrier);
        self.ctx = None;
    }

    /// 用某轨道当前累计的 locus 查询并披露下一层级
    ///
    /// # 返回
    /// 返回 false 表示响应过期被丢弃（期间已有更新的请求落盘）
    pub async fn resolve_level(&mut self, track: Track) -> AppResult<bool> {
        let ctx = self
            .ctx
            .clone()
            .ok_or(AppError::Picker(PickerError::NoWorkChosen))?;
        let partial = self.panel.partial_for_next(track);
        debug!("{} 查询 {} 轨道下一层级, partial = {}", ctx, track, partial);
        let (ticket, ws) = self.service.fetch(&ctx.author, &ctx.work, &partial).await?;
        self.panel.apply_structure(track, ticket, &ws)
    }

    /// 输入框获得焦点：上层选择可能变过，带累计 locus 重新披露
    ///
    /// 层级 0 不再往下查（最细层级的值不能单独出现在请求里）
    pub async fn focus_level(&mut self, track: Track, level: usize) -> AppResult<bool> {
        if level == 0 {
            return Ok(false);
        }
        self.resolve_level(track).await
    }

    /// 在某轨道选定某层级的值，并披露下一个更细层级
    pub async fn select_value(
        &mut self,
        track: Track,
        level: usize,
        value: &str,
    ) -> AppResult<bool> {
        self.panel.select_value(track, level, value)?;
        info!("✓ {} 轨道层级 {} 选定: {}", track, level, value);
        if level == 0 {
            // 已到最细层级，披露到此为止
            return Ok(true);
        }
        self.resolve_level(track).await
    }

    /// 打开终点（范围）输入并披露终点轨道的下一层级
    pub async fn open_endpoint(&mut self) -> AppResult<bool> {
        self.panel.open_endpoint()?;
        self.resolve_level(Track::Endpoint).await
    }

    /// 关闭终点输入，退化回单点选择
    pub fn close_endpoint(&mut self) {
        self.panel.close_endpoint();
    }
}
