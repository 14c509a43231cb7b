//! 编排层：交互式选择会话
//!
//! 管理各项能力服务与解析器，把终端命令翻译成流程层的调用，
//! 并在每一步之后把面板状态渲染出来

use anyhow::{Context, Result};
use futures::join;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{AuthorId, WorkId};
use crate::picker::{LevelState, LocusResolver, PickerCtx, Track};
use crate::services::{HintService, SelectionService};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    hints: HintService,
    selections: SelectionService,
    resolver: LocusResolver,
    author_hints: Vec<String>,
    work_hints: Vec<String>,
    current_author: Option<(AuthorId, String)>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config);

        Ok(Self {
            hints: HintService::new(&config)?,
            selections: SelectionService::new(&config)?,
            resolver: LocusResolver::new(&config)?,
            config,
            author_hints: Vec::new(),
            work_hints: Vec::new(),
            current_author: None,
        })
    }

    /// 运行交互循环
    pub async fn run(mut self) -> Result<()> {
        print_help();

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }
            if let Err(e) = self.handle_command(&line).await {
                error!("命令执行失败: {}", e);
            }
        }

        info!("会话结束，日志已保存至: {}", self.config.output_log_file);
        Ok(())
    }

    /// 分发一条命令
    async fn handle_command(&mut self, line: &str) -> Result<()> {
        let (command, rest) = split_command(line);
        match command {
            "help" => print_help(),
            "author" => self.search_author(rest).await?,
            "pick" => self.pick_author(rest).await?,
            "work" => self.pick_work(rest).await?,
            "level" => self.pick_level(Track::Primary, rest).await?,
            "end" => self.pick_level(Track::Endpoint, rest).await?,
            "refresh" => self.refresh_level(rest).await?,
            "range" => self.open_range().await?,
            "norange" => {
                self.resolver.close_endpoint();
                self.render();
            }
            "commit" => self.commit(false).await?,
            "exclude" => self.commit(true).await?,
            "show" => self.render(),
            "reset" => {
                self.resolver.reset();
                self.current_author = None;
                self.work_hints.clear();
                info!("已复位");
            }
            other => warn!("未知命令: {}（输入 help 查看用法）", other),
        }
        Ok(())
    }

    /// 搜索作者
    async fn search_author(&mut self, term: &str) -> Result<()> {
        if term.is_empty() {
            warn!("用法: author <检索词>");
            return Ok(());
        }
        self.author_hints = self.hints.search_authors(term).await?;
        if self.author_hints.is_empty() {
            warn!("没有匹配的作者");
            return Ok(());
        }
        for (i, hint) in self.author_hints.iter().enumerate() {
            info!("  {}. {}", i + 1, hint);
        }
        info!("用 pick <编号> 选定作者");
        Ok(())
    }

    /// 选定作者并加载其作品列表
    async fn pick_author(&mut self, arg: &str) -> Result<()> {
        let hint = nth(&self.author_hints, arg)?;
        let author = AuthorId::from_hint_value(&hint).context("候选值里找不到作者编号")?;

        // 作品列表和作者详情并发取回
        let (works, info_text) = join!(
            self.hints.works_of(&author),
            self.hints.author_info(&author)
        );
        self.work_hints = works?;
        if let Ok(text) = info_text {
            if !text.is_empty() {
                info!("{}", logging::truncate_text(&text, 200));
            }
        }

        // 换作者，全部层级输入框复位
        self.resolver.reset();
        self.current_author = Some((author, hint.clone()));

        info!("✓ 已选定作者: {}", hint);
        if self.work_hints.is_empty() {
            warn!("该作者名下没有可选的作品");
        }
        for (i, work) in self.work_hints.iter().enumerate() {
            info!("  {}. {}", i + 1, work);
        }
        info!("用 work <编号> 选定作品");
        Ok(())
    }

    /// 选定作品并开始披露引用层级
    async fn pick_work(&mut self, arg: &str) -> Result<()> {
        let (author, author_name) = self
            .current_author
            .clone()
            .context("请先用 author / pick 选定作者")?;
        let hint = nth(&self.work_hints, arg)?;
        let work = WorkId::from_hint_value(&hint).context("候选值里找不到作品编号")?;

        let ctx = PickerCtx::new(author, work, author_name);
        let applied = self.resolver.start(ctx).await?;
        if !applied {
            info!("（最粗层级的响应已过期，被丢弃）");
        }
        self.render();
        Ok(())
    }

    /// 在某轨道选定某层级的值
    async fn pick_level(&mut self, track: Track, rest: &str) -> Result<()> {
        let (level_text, value) = split_command(rest);
        if value.is_empty() {
            warn!("用法: {} <层级> <值>", match track {
                Track::Primary => "level",
                Track::Endpoint => "end",
            });
            return Ok(());
        }
        let level: usize = level_text.parse().context("层级必须是数字")?;
        let applied = self.resolver.select_value(track, level, value).await?;
        if !applied {
            info!("（下一层级的响应已过期，被丢弃）");
        }
        self.render();
        Ok(())
    }

    /// 重新披露某层级（相当于输入框重新获得焦点）
    ///
    /// 上层的选择改过之后，用它刷新该层级的候选列表
    async fn refresh_level(&mut self, rest: &str) -> Result<()> {
        let level: usize = rest.trim().parse().context("层级必须是数字")?;
        let applied = self.resolver.focus_level(Track::Primary, level).await?;
        if !applied {
            info!("（层级 0 无需刷新，或响应已过期）");
        }
        self.render();
        Ok(())
    }

    /// 打开范围终点输入
    async fn open_range(&mut self) -> Result<()> {
        let applied = self.resolver.open_endpoint().await?;
        if !applied {
            info!("（终点层级的响应已过期，被丢弃）");
        }
        self.render();
        Ok(())
    }

    /// 注册当前选择（或排除）
    async fn commit(&mut self, exclude: bool) -> Result<()> {
        let summary = match self.resolver.ctx().cloned() {
            Some(ctx) => {
                let summary = self
                    .selections
                    .register(&ctx, self.resolver.panel(), exclude)
                    .await?;
                logging::append_session_line(
                    &self.config.output_log_file,
                    &format!(
                        "{} {} locus={} endpoint={}",
                        if exclude { "排除" } else { "选择" },
                        ctx.universal_id(),
                        self.resolver.panel().serialized_locus(Track::Primary),
                        self.resolver.panel().serialized_locus(Track::Endpoint),
                    ),
                )?;
                summary
            }
            None => {
                // 还没选作品的话，选了作者也可以整作者注册
                let (author, _) = self
                    .current_author
                    .clone()
                    .context("尚未选择任何内容，无法注册")?;
                let summary = self.selections.register_author(&author, exclude).await?;
                logging::append_session_line(
                    &self.config.output_log_file,
                    &format!(
                        "{} {}",
                        if exclude { "排除" } else { "选择" },
                        author
                    ),
                )?;
                summary
            }
        };
        if self.config.verbose_logging && !summary.selections.is_empty() {
            info!("当前检索范围: {}", logging::truncate_text(&summary.selections, 300));
        }
        Ok(())
    }

    /// 渲染当前面板
    fn render(&self) {
        let panel = self.resolver.panel();
        let Some(total) = panel.total_levels() else {
            info!("（尚未加载作品结构）");
            return;
        };

        info!("{}", "─".repeat(60));
        for level in (0..total).rev() {
            for track in [Track::Primary, Track::Endpoint] {
                if !panel.is_shown(track, level) {
                    continue;
                }
                let field = panel.field(track, level);
                let status = match field.state {
                    LevelState::Hidden => continue,
                    LevelState::Pending => format!("{}  候选 {} 项", field.placeholder, field.options.len()),
                    LevelState::Resolved => format!("已选: {}", field.value),
                };
                info!("  [{}] 层级 {} ({})  {}", track, level, field.label, status);
            }
        }
        info!(
            "  locus: {}  endpoint: {}",
            display_or_empty(&panel.serialized_locus(Track::Primary)),
            display_or_empty(&panel.serialized_locus(Track::Endpoint)),
        );
        info!("{}", "─".repeat(60));
    }
}

// ========== 辅助函数 ==========

/// 把一行命令拆成 命令词 + 其余部分
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    }
}

/// 按 1 开始的编号取候选值
fn nth(hints: &[String], arg: &str) -> Result<String> {
    if hints.is_empty() {
        anyhow::bail!("候选列表为空，请先检索");
    }
    let index: usize = arg.trim().parse().context("编号必须是数字")?;
    let hint = index
        .checked_sub(1)
        .and_then(|i| hints.get(i))
        .with_context(|| format!("编号超出范围 (1..{})", hints.len()))?;
    Ok(hint.clone())
}

fn display_or_empty(value: &str) -> &str {
    if value.is_empty() {
        "(空)"
    } else {
        value
    }
}

fn print_help() {
    info!("命令:");
    info!("  author <检索词>     搜索作者");
    info!("  pick <编号>         选定作者（加载作品列表）");
    info!("  work <编号>         选定作品（开始逐层披露引用层级）");
    info!("  level <层级> <值>   在起点轨道选定某层级的值");
    info!("  refresh <层级>      重新披露某层级的候选列表");
    info!("  range               打开范围终点输入");
    info!("  end <层级> <值>     在终点轨道选定某层级的值");
    info!("  norange             关闭范围终点输入");
    info!("  commit / exclude    注册当前选择 / 排除");
    info!("  show / reset / quit 查看面板 / 复位 / 退出");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("author verg"), ("author", "verg"));
        assert_eq!(split_command("level 2 15"), ("level", "2 15"));
        assert_eq!(split_command("show"), ("show", ""));
    }

    #[test]
    fn test_nth_is_one_based() {
        let hints = vec!["a".to_string(), "b".to_string()];
        assert_eq!(nth(&hints, "1").unwrap(), "a");
        assert_eq!(nth(&hints, "2").unwrap(), "b");
        assert!(nth(&hints, "0").is_err());
        assert!(nth(&hints, "3").is_err());
        assert!(nth(&hints, "x").is_err());
    }
}
