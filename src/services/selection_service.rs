//! 选择注册服务 - 业务能力层
//!
//! 把面板上凑齐的 作者/作品/位置/终点 组合注册进服务器端的检索范围列表

use tracing::info;

use crate::clients::{CorpusClient, SelectionRequest, SelectionSummary};
use crate::config::Config;
use crate::error::{AppError, AppResult, SelectionError};
use crate::models::AuthorId;
use crate::picker::panel::{PickerPanel, Track};
use crate::picker::picker_ctx::PickerCtx;

/// 选择注册服务
pub struct SelectionService {
    client: CorpusClient,
}

impl SelectionService {
    /// 创建新的注册服务
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            client: CorpusClient::new(config)?,
        })
    }

    /// 注册当前面板状态
    ///
    /// 终点与起点相同等于没有范围，这种情况退化成单点选择，不发 endpoint 参数
    pub async fn register(
        &self,
        ctx: &PickerCtx,
        panel: &PickerPanel,
        exclude: bool,
    ) -> AppResult<SelectionSummary> {
        let locus = panel.serialized_locus(Track::Primary);
        let endpoint = panel.serialized_locus(Track::Endpoint);

        let mut request = SelectionRequest {
            auth: ctx.author.as_str().to_string(),
            work: Some(ctx.work.as_str().to_string()),
            exclude,
            ..Default::default()
        };
        if !locus.is_empty() {
            if panel.endpoint_open() && !endpoint.is_empty() && endpoint != locus {
                request.endpoint = Some(endpoint);
            }
            request.locus = Some(locus);
        } else if panel.endpoint_open() && !endpoint.is_empty() {
            return Err(AppError::Selection(SelectionError::EndpointWithoutLocus));
        }

        let summary = self.client.make_selection(&request).await?;
        info!(
            "✓ {} 已注册{}，当前共 {} 条",
            ctx,
            if exclude { "排除" } else { "选择" },
            summary.numberofselections
        );
        Ok(summary)
    }

    /// 只注册作者（还没选作品时的整作者选择）
    pub async fn register_author(
        &self,
        author: &AuthorId,
        exclude: bool,
    ) -> AppResult<SelectionSummary> {
        let request = SelectionRequest {
            auth: author.as_str().to_string(),
            exclude,
            ..Default::default()
        };
        let summary = self.client.make_selection(&request).await?;
        info!(
            "✓ 作者 {} 已注册{}，当前共 {} 条",
            author,
            if exclude { "排除" } else { "选择" },
            summary.numberofselections
        );
        Ok(summary)
    }
}
