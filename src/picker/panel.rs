//! 选择面板
//!
//! 界面状态的唯一权威：两条轨道（起点/终点）各六个层级输入框、
//! 对应的两个 locus、以及按轨道记录的响应水位线。
//! 所有状态变更都经过这里的归约函数，不存在散落各处的显示/隐藏逻辑

use tracing::debug;

use crate::error::{AppError, AppResult, PickerError};
use crate::models::locus::{Locus, LEVEL_COUNT};
use crate::models::WorkStructure;
use crate::picker::level_state::LevelField;
use crate::services::structure_service::Ticket;

/// 轨道：起点（主选择）或终点（范围的闭界）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Primary,
    Endpoint,
}

impl Track {
    fn index(self) -> usize {
        match self {
            Track::Primary => 0,
            Track::Endpoint => 1,
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Track::Primary => write!(f, "起点"),
            Track::Endpoint => write!(f, "终点"),
        }
    }
}

/// 选择面板
#[derive(Debug, Default)]
pub struct PickerPanel {
    total_levels: Option<usize>,
    primary: [LevelField; LEVEL_COUNT],
    endpoint: [LevelField; LEVEL_COUNT],
    primary_locus: Locus,
    endpoint_locus: Locus,
    /// 各轨道已应用的最高票号，不高于水位线的响应一律丢弃
    watermarks: [u64; 2],
    endpoint_open: bool,
}

impl PickerPanel {
    /// 创建空面板
    pub fn new() -> Self {
        Self::default()
    }

    /// 已知的作品层级总数（第一条结构响应之后才有值）
    pub fn total_levels(&self) -> Option<usize> {
        self.total_levels
    }

    /// 终点（范围）输入是否已打开
    pub fn endpoint_open(&self) -> bool {
        self.endpoint_open
    }

    /// 某轨道某层级的输入框
    pub fn field(&self, track: Track, level: usize) -> &LevelField {
        match track {
            Track::Primary => &self.primary[level],
            Track::Endpoint => &self.endpoint[level],
        }
    }

    fn locus(&self, track: Track) -> &Locus {
        match track {
            Track::Primary => &self.primary_locus,
            Track::Endpoint => &self.endpoint_locus,
        }
    }

    /// 某输入框当前是否应该显示
    ///
    /// 终点输入框即便配置好了，在用户打开范围输入之前也不显示
    pub fn is_shown(&self, track: Track, level: usize) -> bool {
        match track {
            Track::Primary => self.primary[level].is_visible(),
            Track::Endpoint => self.endpoint_open && self.endpoint[level].is_visible(),
        }
    }

    /// 应用一条结构响应，这是面板唯一的归约入口
    ///
    /// 返回 false 表示响应过期被丢弃；校验失败时返回错误且面板保持原样，
    /// 宁可不渲染也不渲染损坏的数据
    pub fn apply_structure(
        &mut self,
        track: Track,
        ticket: Ticket,
        ws: &WorkStructure,
    ) -> AppResult<bool> {
        let watermark = self.watermarks[track.index()];
        if ticket.0 <= watermark {
            debug!(
                "丢弃过期响应: {} 轨道票号 {} 不高于水位线 {}",
                track, ticket.0, watermark
            );
            return Ok(false);
        }

        ws.validate()?;
        match self.total_levels {
            None => {
                self.total_levels = Some(ws.totallevels);
                self.primary_locus.reset_with_total(ws.totallevels);
                self.endpoint_locus.reset_with_total(ws.totallevels);
            }
            Some(total) if total != ws.totallevels => {
                return Err(AppError::structure_schema_mismatch(format!(
                    "层级总数前后不一致: {} vs {}",
                    total, ws.totallevels
                )));
            }
            Some(_) => {}
        }
        self.watermarks[track.index()] = ticket.0;

        match track {
            Track::Primary => {
                self.primary[ws.level].reveal(ws);
                // 终点轨道同步配置同一层级，并用起点上一层的值播种，
                // 让范围终点的输入不必重跑一遍披露流程
                self.endpoint[ws.level].reveal(ws);
                let seed_level = ws.level + 1;
                if seed_level < ws.totallevels {
                    let seed = self.primary_locus.value(seed_level).to_string();
                    if !seed.is_empty() && self.endpoint_locus.set(seed_level, &seed).is_ok() {
                        self.endpoint[seed_level].resolve(&seed);
                    }
                }
            }
            Track::Endpoint => {
                self.endpoint[ws.level].reveal(ws);
            }
        }
        Ok(true)
    }

    /// 在某轨道选定某层级的值
    ///
    /// 值必须出现在该输入框的候选列表里；选定会让该轨道所有更细的层级失效
    pub fn select_value(&mut self, track: Track, level: usize, value: &str) -> AppResult<()> {
        let total = self
            .total_levels
            .ok_or(AppError::Picker(PickerError::StructureNotLoaded))?;
        if level >= total {
            return Err(AppError::Picker(PickerError::FieldNotReady { level }));
        }
        {
            let field = self.field(track, level);
            if !field.is_visible() {
                return Err(AppError::Picker(PickerError::FieldNotReady { level }));
            }
            if !field.accepts(value) {
                return Err(AppError::Picker(PickerError::ValueNotInRange {
                    level,
                    value: value.to_string(),
                }));
            }
        }
        match track {
            Track::Primary => self.primary_locus.set(level, value)?,
            Track::Endpoint => self.endpoint_locus.set(level, value)?,
        }
        let fields = match track {
            Track::Primary => &mut self.primary,
            Track::Endpoint => &mut self.endpoint,
        };
        fields[level].resolve(value);
        for lower in 0..level {
            fields[lower].hide();
        }
        Ok(())
    }

    /// 某轨道的 locus 序列化结果（"2|5" 形式；未选返回空串）
    pub fn serialized_locus(&self, track: Track) -> String {
        self.locus(track).serialize()
    }

    /// 请求下一层级用的 partial locus
    pub fn partial_for_next(&self, track: Track) -> String {
        self.locus(track).as_partial()
    }

    /// 某轨道已选定的层级深度
    pub fn depth(&self, track: Track) -> usize {
        self.locus(track).depth()
    }

    /// 终点输入是否可以打开（起点至少选定一层才谈得上范围）
    pub fn can_open_endpoint(&self) -> bool {
        self.total_levels.is_some() && self.primary_locus.depth() > 0
    }

    /// 打开终点（范围）输入
    pub fn open_endpoint(&mut self) -> AppResult<()> {
        if !self.can_open_endpoint() {
            return Err(AppError::Picker(PickerError::EndpointUnavailable));
        }
        self.endpoint_open = true;
        Ok(())
    }

    /// 关闭终点输入并清空终点轨道，退化回单点选择
    pub fn close_endpoint(&mut self) {
        self.endpoint_open = false;
        for field in self.endpoint.iter_mut() {
            field.hide();
        }
        self.endpoint_locus.clear();
    }

    /// 整体复位，换作者或作品时调用
    ///
    /// 十二个输入框全部回到 Hidden，两条轨道的 locus 清空，终点输入关闭。
    /// 水位线保持不动：票号全局递增，复位不会使它倒退
    pub fn reset(&mut self) {
        for field in self.primary.iter_mut() {
            field.hide();
        }
        for field in self.endpoint.iter_mut() {
            field.hide();
        }
        self.primary_locus = Locus::default();
        self.endpoint_locus = Locus::default();
        self.total_levels = None;
        self.endpoint_open = false;
    }

    /// 抬高两条轨道的水位线，使所有不高于 ticket 的在途响应失效
    ///
    /// 复位时配合一张屏障票使用：复位前发出、复位后才到的响应不得落盘
    pub fn invalidate_up_to(&mut self, ticket: Ticket) {
        for watermark in self.watermarks.iter_mut() {
            if *watermark < ticket.0 {
                *watermark = ticket.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::locus::NO_LOCUS;
    use crate::picker::level_state::LevelState;

    /// 手工拼一条结构响应
    fn ws(totallevels: usize, level: usize, label: &str, low: &str, high: &str) -> WorkStructure {
        let range = if low == crate::models::UNKNOWN_BOUND {
            Vec::new()
        } else {
            let lo: usize = low.parse().unwrap();
            let hi: usize = high.parse().unwrap();
            (lo..=hi).map(|v| v.to_string()).collect()
        };
        WorkStructure {
            totallevels,
            level,
            label: label.to_string(),
            low: low.to_string(),
            high: high.to_string(),
            range,
        }
    }

    #[test]
    fn test_first_response_reveals_top_level() {
        // resolveLevel("lt1254", "001", firstline) 的样例响应
        let mut panel = PickerPanel::new();
        let applied = panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        assert!(applied);

        let field = panel.field(Track::Primary, 2);
        assert_eq!(field.state, LevelState::Pending);
        assert_eq!(field.placeholder, "(book 1 to 12)");
        assert_eq!(field.options.len(), 12);
        assert_eq!(field.options[0], "1");
        assert_eq!(field.options[11], "12");
        // 更细的层级还不可达
        assert_eq!(panel.field(Track::Primary, 1).state, LevelState::Hidden);
        assert_eq!(panel.partial_for_next(Track::Primary), NO_LOCUS);
    }

    #[test]
    fn test_sentinel_low_renders_awaiting_placeholder() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(
                Track::Primary,
                Ticket(1),
                &ws(2, 1, "poem", crate::models::UNKNOWN_BOUND, "-9999"),
            )
            .unwrap();
        let field = panel.field(Track::Primary, 1);
        assert_eq!(field.state, LevelState::Pending);
        assert_eq!(field.placeholder, "(awaiting a valid selection...)");
        assert!(field.options.is_empty());
    }

    #[test]
    fn test_select_and_drill_down() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        panel.select_value(Track::Primary, 2, "2").unwrap();
        assert_eq!(panel.serialized_locus(Track::Primary), "2");

        panel
            .apply_structure(Track::Primary, Ticket(2), &ws(3, 1, "poem", "1", "20"))
            .unwrap();
        panel.select_value(Track::Primary, 1, "5").unwrap();
        assert_eq!(panel.serialized_locus(Track::Primary), "2|5");

        panel
            .apply_structure(Track::Primary, Ticket(3), &ws(3, 0, "line", "1", "30"))
            .unwrap();
        panel.select_value(Track::Primary, 0, "17").unwrap();
        assert_eq!(panel.serialized_locus(Track::Primary), "2|5|17");
        assert_eq!(panel.depth(Track::Primary), 3);
    }

    #[test]
    fn test_select_rejects_value_outside_range() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        let err = panel.select_value(Track::Primary, 2, "99").unwrap_err();
        assert!(matches!(
            err,
            AppError::Picker(PickerError::ValueNotInRange { level: 2, .. })
        ));
        // 没就绪的层级直接拒绝
        let err = panel.select_value(Track::Primary, 0, "1").unwrap_err();
        assert!(matches!(
            err,
            AppError::Picker(PickerError::FieldNotReady { level: 0 })
        ));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        // 先后为 "2" 和 "2|5" 各发一个请求，"2" 的响应最后才到：
        // 界面必须保持 "2|5" 的结果，不被旧响应覆盖
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        panel.select_value(Track::Primary, 2, "2").unwrap();

        let slow_for_book2 = ws(3, 1, "poem", "1", "20");
        let fast_for_poem5 = ws(3, 0, "line", "1", "30");

        // 新请求（票号 3）的响应先到并落盘
        assert!(panel
            .apply_structure(Track::Primary, Ticket(3), &fast_for_poem5)
            .unwrap());
        // 旧请求（票号 2）的响应迟到，必须被丢弃
        assert!(!panel
            .apply_structure(Track::Primary, Ticket(2), &slow_for_book2)
            .unwrap());

        let field = panel.field(Track::Primary, 0);
        assert_eq!(field.state, LevelState::Pending);
        assert_eq!(field.label, "line");
    }

    #[test]
    fn test_reset_hides_and_clears_everything() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        panel.select_value(Track::Primary, 2, "2").unwrap();
        panel.open_endpoint().unwrap();

        panel.reset();

        for level in 0..LEVEL_COUNT {
            for track in [Track::Primary, Track::Endpoint] {
                let field = panel.field(track, level);
                assert_eq!(field.state, LevelState::Hidden);
                assert_eq!(field.value, "");
                assert!(!panel.is_shown(track, level));
            }
        }
        assert_eq!(panel.serialized_locus(Track::Primary), "");
        assert_eq!(panel.serialized_locus(Track::Endpoint), "");
        assert!(panel.total_levels().is_none());
        assert!(!panel.endpoint_open());
    }

    #[test]
    fn test_barrier_ticket_invalidates_inflight_responses() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        panel.reset();
        // 复位时领一张屏障票抬水位线
        panel.invalidate_up_to(Ticket(5));
        // 复位前发出的请求（票号 <= 5）迟到也不能落盘
        assert!(!panel
            .apply_structure(Track::Primary, Ticket(4), &ws(3, 1, "poem", "1", "20"))
            .unwrap());
        assert_eq!(panel.field(Track::Primary, 1).state, LevelState::Hidden);
        // 复位后的新请求正常应用
        assert!(panel
            .apply_structure(Track::Primary, Ticket(6), &ws(3, 2, "book", "1", "12"))
            .unwrap());
    }

    #[test]
    fn test_endpoint_mirrors_and_is_seeded() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        panel.select_value(Track::Primary, 2, "2").unwrap();
        // 起点轨道披露下一层时，终点轨道同层被配置、上一层被播种
        panel
            .apply_structure(Track::Primary, Ticket(2), &ws(3, 1, "poem", "1", "20"))
            .unwrap();

        assert_eq!(panel.field(Track::Endpoint, 2).value, "2");
        assert_eq!(panel.field(Track::Endpoint, 2).state, LevelState::Resolved);
        assert_eq!(panel.field(Track::Endpoint, 1).state, LevelState::Pending);
        // 终点输入没打开之前不显示
        assert!(!panel.is_shown(Track::Endpoint, 1));
        panel.open_endpoint().unwrap();
        assert!(panel.is_shown(Track::Endpoint, 1));
    }

    #[test]
    fn test_endpoint_track_is_independent_of_primary() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        panel.select_value(Track::Primary, 2, "2").unwrap();
        panel
            .apply_structure(Track::Primary, Ticket(2), &ws(3, 1, "poem", "1", "20"))
            .unwrap();
        panel.select_value(Track::Primary, 1, "5").unwrap();
        panel
            .apply_structure(Track::Primary, Ticket(3), &ws(3, 0, "line", "1", "30"))
            .unwrap();
        panel.open_endpoint().unwrap();

        // 终点在"诗"层选一个更晚的值，起点不受影响
        panel.select_value(Track::Endpoint, 1, "9").unwrap();
        assert_eq!(panel.serialized_locus(Track::Primary), "2|5");
        assert_eq!(panel.serialized_locus(Track::Endpoint), "2|9");

        // 终点轨道自己下钻，同样不碰起点
        panel
            .apply_structure(Track::Endpoint, Ticket(4), &ws(3, 0, "line", "1", "44"))
            .unwrap();
        panel.select_value(Track::Endpoint, 0, "44").unwrap();
        assert_eq!(panel.serialized_locus(Track::Endpoint), "2|9|44");
        assert_eq!(panel.serialized_locus(Track::Primary), "2|5");
    }

    #[test]
    fn test_total_levels_mismatch_fails_closed() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        let before = panel.field(Track::Primary, 1).state;
        // 同一作品的层级总数突然变了，按响应损坏处理，面板不动
        let err = panel
            .apply_structure(Track::Primary, Ticket(2), &ws(4, 1, "poem", "1", "20"))
            .unwrap_err();
        assert!(matches!(err, AppError::Structure(_)));
        assert_eq!(panel.field(Track::Primary, 1).state, before);
    }

    #[test]
    fn test_close_endpoint_clears_endpoint_track_only() {
        let mut panel = PickerPanel::new();
        panel
            .apply_structure(Track::Primary, Ticket(1), &ws(3, 2, "book", "1", "12"))
            .unwrap();
        panel.select_value(Track::Primary, 2, "2").unwrap();
        panel
            .apply_structure(Track::Primary, Ticket(2), &ws(3, 1, "poem", "1", "20"))
            .unwrap();
        panel.open_endpoint().unwrap();
        panel.select_value(Track::Endpoint, 1, "9").unwrap();

        panel.close_endpoint();

        assert!(!panel.endpoint_open());
        assert_eq!(panel.serialized_locus(Track::Endpoint), "");
        assert_eq!(panel.field(Track::Endpoint, 1).state, LevelState::Hidden);
        // 起点原样保留
        assert_eq!(panel.serialized_locus(Track::Primary), "2");
    }
}
