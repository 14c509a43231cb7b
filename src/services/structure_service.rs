//! 作品结构查询服务 - 业务能力层
//!
//! 只负责"把结构问回来"这一件事：重试和请求票号都在这里，
//! 不认识输入框，也不关心流程顺序

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::clients::CorpusClient;
use crate::config::Config;
use crate::error::{AppError, AppResult, StructureError};
use crate::models::{AuthorId, WorkId, WorkStructure};

/// 请求票号
///
/// 发起请求前领取，全局单调递增。界面侧只接受高于水位线的响应，
/// 以"最后发出的请求"而不是"最后到达的响应"为准
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(pub u64);

/// 作品结构查询服务
pub struct StructureService {
    client: CorpusClient,
    max_retries: usize,
    retry_delay: Duration,
    next_ticket: AtomicU64,
}

impl StructureService {
    /// 创建新的结构查询服务
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            client: CorpusClient::new(config)?,
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            next_ticket: AtomicU64::new(1),
        })
    }

    /// 领取一个新的票号
    pub fn issue_ticket(&self) -> Ticket {
        Ticket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// 查询下一层级结构（带重试）
    ///
    /// # 参数
    /// - `partial`: 累计的 partial locus，或 NO_LOCUS 标记
    ///
    /// # 返回
    /// 返回 (票号, 结构)；票号在发起第一次请求之前领取，
    /// 响应损坏不重试（再要一次大概率还是坏的），网络失败才重试
    pub async fn fetch(
        &self,
        author: &AuthorId,
        work: &WorkId,
        partial: &str,
    ) -> AppResult<(Ticket, WorkStructure)> {
        let ticket = self.issue_ticket();

        for retry_count in 0..self.max_retries {
            match self.client.work_structure(author, work, partial).await {
                Ok(ws) => return Ok((ticket, ws)),
                Err(AppError::Structure(e)) => {
                    return Err(AppError::Structure(e));
                }
                Err(e) => {
                    warn!(
                        "结构查询失败 (尝试 {}/{}): {}",
                        retry_count + 1,
                        self.max_retries,
                        e
                    );
                    if retry_count + 1 < self.max_retries {
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        warn!("结构查询失败，已重试 {} 次", self.max_retries);
        Err(AppError::Structure(StructureError::RetriesExhausted {
            attempts: self.max_retries,
        }))
    }
}
