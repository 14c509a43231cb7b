//! 自动补全服务 - 业务能力层
//!
//! 提供作者检索和作品列表能力，顺手过滤掉服务器塞进候选列表的报错提示行

use crate::clients::CorpusClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{AuthorId, WorkId};

/// 自动补全服务
pub struct HintService {
    client: CorpusClient,
}

impl HintService {
    /// 创建新的补全服务
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            client: CorpusClient::new(config)?,
        })
    }

    /// 搜索作者
    ///
    /// # 返回
    /// 返回候选值列表；解析不出作者编号的行（服务器的报错提示）被丢掉
    pub async fn search_authors(&self, term: &str) -> AppResult<Vec<String>> {
        let hints = self.client.author_hint(term).await?;
        Ok(hints
            .into_iter()
            .map(|hint| hint.value)
            .filter(|value| AuthorId::from_hint_value(value).is_some())
            .collect())
    }

    /// 某作者的作品列表
    ///
    /// 服务器在作者没加载好时会返回 "try picking the author again" 这样的提示行，
    /// 同样按解析不出编号过滤
    pub async fn works_of(&self, author: &AuthorId) -> AppResult<Vec<String>> {
        let hints = self.client.works_of(author).await?;
        Ok(hints
            .into_iter()
            .map(|hint| hint.value)
            .filter(|value| WorkId::from_hint_value(value).is_some())
            .collect())
    }

    /// 作者详情
    pub async fn author_info(&self, author: &AuthorId) -> AppResult<String> {
        self.client.author_info(author).await
    }
}
