/// 语料库服务器 API 客户端
///
/// 封装所有与语料库服务器相关的调用逻辑
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::locus::NO_LOCUS;
use crate::models::{AuthorId, WorkId, WorkStructure};

/// 自动补全候选条目，形如 `{"value": "Vergilius Maro, P. (Vergil) [lt0690]"}`
#[derive(Debug, Clone, Deserialize)]
pub struct HintValue {
    pub value: String,
}

/// 选择注册结果摘要
///
/// 服务器返回的是渲染用的片段，这里原样保存不做解析
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionSummary {
    #[serde(default)]
    pub numberofselections: i64,
    #[serde(default)]
    pub selections: String,
    #[serde(default)]
    pub exclusions: String,
    #[serde(default)]
    pub timeexclusions: String,
}

/// 待注册的选择
#[derive(Debug, Clone, Default)]
pub struct SelectionRequest {
    pub auth: String,
    pub work: Option<String>,
    pub locus: Option<String>,
    pub endpoint: Option<String>,
    pub exclude: bool,
}

impl SelectionRequest {
    /// 组装查询参数
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("auth", self.auth.clone())];
        if let Some(work) = &self.work {
            query.push(("work", work.clone()));
        }
        if let Some(locus) = &self.locus {
            query.push(("locus", locus.clone()));
        }
        if let Some(endpoint) = &self.endpoint {
            query.push(("endpoint", endpoint.clone()));
        }
        if self.exclude {
            query.push(("exclude", "t".to_string()));
        }
        query
    }
}

/// 语料库 API 客户端
pub struct CorpusClient {
    http: reqwest::Client,
    base_url: String,
}

impl CorpusClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("<client builder>", e))?;
        Ok(Self {
            http,
            base_url: config.server_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 查询作品结构的下一层级
    ///
    /// partial 为空或为 NO_LOCUS 标记时查询最粗层级，路径段直接省略
    ///
    /// # 返回
    /// 返回经过完整性校验的结构响应；缺字段或字段不可能成立都按错误处理，
    /// 不把损坏的响应交给界面层渲染
    pub async fn work_structure(
        &self,
        author: &AuthorId,
        work: &WorkId,
        partial: &str,
    ) -> AppResult<WorkStructure> {
        let url = if partial.is_empty() || partial == NO_LOCUS {
            format!(
                "{}/get/json/workstructure/{}/{}",
                self.base_url, author, work
            )
        } else {
            format!(
                "{}/get/json/workstructure/{}/{}/{}",
                self.base_url, author, work, partial
            )
        };
        debug!("查询作品结构: {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;
        if !response.status().is_success() {
            return Err(AppError::api_bad_status(&url, response.status().as_u16()));
        }

        let ws: WorkStructure = response
            .json()
            .await
            .map_err(|e| AppError::structure_schema_mismatch(format!("响应不符合预期结构: {}", e)))?;
        ws.validate()?;
        Ok(ws)
    }

    /// 作者自动补全
    pub async fn author_hint(&self, term: &str) -> AppResult<Vec<HintValue>> {
        let url = format!("{}/hints/author/_", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("term", term)])
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;
        if !response.status().is_success() {
            return Err(AppError::api_bad_status(&url, response.status().as_u16()));
        }
        let hints: Vec<HintValue> = response.json().await?;
        Ok(hints)
    }

    /// 某作者名下的作品列表
    pub async fn works_of(&self, author: &AuthorId) -> AppResult<Vec<HintValue>> {
        let url = format!("{}/get/json/worksof/{}", self.base_url, author);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;
        if !response.status().is_success() {
            return Err(AppError::api_bad_status(&url, response.status().as_u16()));
        }
        let hints: Vec<HintValue> = response.json().await?;
        Ok(hints)
    }

    /// 作者详情（服务器返回渲染好的描述片段）
    pub async fn author_info(&self, author: &AuthorId) -> AppResult<String> {
        let url = format!("{}/get/json/authorinfo/{}", self.base_url, author);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;
        if !response.status().is_success() {
            return Err(AppError::api_bad_status(&url, response.status().as_u16()));
        }
        let value: Value = response.json().await?;
        Ok(render_info(&value))
    }

    /// 注册一条选择（或排除）
    pub async fn make_selection(&self, request: &SelectionRequest) -> AppResult<SelectionSummary> {
        let url = format!("{}/selection/make/_", self.base_url);
        debug!("注册选择: {:?}", request);
        let response = self
            .http
            .get(&url)
            .query(&request.to_query())
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&url, e))?;
        if !response.status().is_success() {
            return Err(AppError::api_bad_status(&url, response.status().as_u16()));
        }
        let summary: SelectionSummary = response.json().await?;
        Ok(summary)
    }
}

/// 把 authorinfo 的返回值拍平成纯文本
fn render_info(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_info)
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
