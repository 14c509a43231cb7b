use serde::Deserialize;
use tracing::warn;

use crate::error::{AppResult, ConfigError};

/// 默认配置文件名，放在工作目录下即可生效
pub const CONFIG_FILE: &str = "locus_picker.toml";

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 语料库服务器地址
    pub server_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 结构查询最大重试次数
    pub max_retries: usize,
    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 会话日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 15,
            max_retries: 3,
            retry_delay_ms: 500,
            verbose_logging: false,
            output_log_file: "picker_session.txt".to_string(),
        }
    }
}

/// 配置文件里的字段全部可缺省，缺省处回落到默认值
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    max_retries: Option<usize>,
    retry_delay_ms: Option<u64>,
    verbose_logging: Option<bool>,
    output_log_file: Option<String>,
}

impl Config {
    /// 加载配置：默认值 <- 配置文件 <- 环境变量
    pub fn from_env() -> Self {
        let default = match Self::from_file(CONFIG_FILE) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("{}，改用默认配置", e);
                Self::default()
            }
        };
        Self {
            server_base_url: std::env::var("PICKER_SERVER_URL").unwrap_or(default.server_base_url),
            request_timeout_secs: env_parse("PICKER_TIMEOUT_SECS", default.request_timeout_secs),
            max_retries: env_parse("PICKER_MAX_RETRIES", default.max_retries),
            retry_delay_ms: env_parse("PICKER_RETRY_DELAY_MS", default.retry_delay_ms),
            verbose_logging: env_parse("VERBOSE_LOGGING", default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 从 TOML 配置文件读取；文件不存在不算错误
    pub fn from_file(path: &str) -> AppResult<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Ok(None),
        };
        let file: FileConfig = toml::from_str(&content)
            .map_err(|e| crate::error::AppError::config_file_parse_failed(path, e))?;
        let mut config = Self::default();
        config.apply_file(file);
        Ok(Some(config))
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.server_base_url {
            self.server_base_url = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.max_retries {
            self.max_retries = v;
        }
        if let Some(v) = file.retry_delay_ms {
            self.retry_delay_ms = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.output_log_file {
            self.output_log_file = v;
        }
    }
}

/// 读取并解析一个环境变量，解析失败时记录警告并保留原值
fn env_parse<T: std::str::FromStr>(var_name: &str, current: T) -> T {
    match std::env::var(var_name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "{}",
                    ConfigError::EnvVarParseFailed {
                        var_name: var_name.to_string(),
                        value: raw,
                        expected_type: std::any::type_name::<T>().to_string(),
                    }
                );
                current
            }
        },
        Err(_) => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_merges_over_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            server_base_url = "http://corpus.local:5000"
            max_retries = 5
            "#,
        )
        .unwrap();
        let mut config = Config::default();
        config.apply_file(file);
        assert_eq!(config.server_base_url, "http://corpus.local:5000");
        assert_eq!(config.max_retries, 5);
        // 没写的字段保持默认
        assert_eq!(config.retry_delay_ms, 500);
    }
}
