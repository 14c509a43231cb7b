use std::fmt;

use crate::models::locus::LocusError;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 服务器 API 调用错误
    Api(ApiError),
    /// 作品结构响应错误
    Structure(StructureError),
    /// 引用位置取值错误
    Locus(LocusError),
    /// 选择面板业务错误
    Picker(PickerError),
    /// 选择注册错误
    Selection(SelectionError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "API错误: {}", e),
            AppError::Structure(e) => write!(f, "结构错误: {}", e),
            AppError::Locus(e) => write!(f, "位置错误: {}", e),
            AppError::Picker(e) => write!(f, "选择错误: {}", e),
            AppError::Selection(e) => write!(f, "注册错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::Structure(e) => Some(e),
            AppError::Locus(e) => Some(e),
            AppError::Picker(e) => Some(e),
            AppError::Selection(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// API 调用错误
#[derive(Debug)]
pub enum ApiError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务器返回非成功状态码
    BadStatus {
        endpoint: String,
        status: u16,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务器返回空结果
    EmptyResponse {
        endpoint: String,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "请求失败 ({}): {}", endpoint, source)
            }
            ApiError::BadStatus { endpoint, status } => {
                write!(f, "服务器返回状态码 {} ({})", status, endpoint)
            }
            ApiError::JsonParseFailed { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
            ApiError::EmptyResponse { endpoint } => {
                write!(f, "服务器返回空结果: {}", endpoint)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 作品结构响应错误
#[derive(Debug)]
pub enum StructureError {
    /// 响应缺字段或字段取值不可能成立
    SchemaMismatch {
        detail: String,
    },
    /// 响应描述的层级超出作品层级总数
    LevelOutOfRange {
        level: usize,
        total: usize,
    },
    /// 重试多次仍然拿不到可用响应
    RetriesExhausted {
        attempts: usize,
    },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::SchemaMismatch { detail } => {
                write!(f, "结构响应损坏: {}", detail)
            }
            StructureError::LevelOutOfRange { level, total } => {
                write!(f, "响应层级 {} 超出层级总数 {}", level, total)
            }
            StructureError::RetriesExhausted { attempts } => {
                write!(f, "结构查询失败，已重试 {} 次，可稍后重试", attempts)
            }
        }
    }
}

impl std::error::Error for StructureError {}

/// 选择面板业务错误
#[derive(Debug)]
pub enum PickerError {
    /// 尚未选定作者/作品
    NoWorkChosen,
    /// 尚未加载任何作品结构
    StructureNotLoaded,
    /// 该层级的输入框还没就绪
    FieldNotReady {
        level: usize,
    },
    /// 值不在该层级的候选列表里
    ValueNotInRange {
        level: usize,
        value: String,
    },
    /// 起点一层都没选，谈不上范围终点
    EndpointUnavailable,
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::NoWorkChosen => write!(f, "请先选定作者和作品"),
            PickerError::StructureNotLoaded => write!(f, "尚未加载任何作品结构"),
            PickerError::FieldNotReady { level } => {
                write!(f, "层级 {} 的输入框尚未就绪", level)
            }
            PickerError::ValueNotInRange { level, value } => {
                write!(f, "'{}' 不在层级 {} 的合法取值里", value, level)
            }
            PickerError::EndpointUnavailable => {
                write!(f, "起点尚未选定任何层级，无法打开范围终点")
            }
        }
    }
}

impl std::error::Error for PickerError {}

/// 选择注册错误
#[derive(Debug)]
pub enum SelectionError {
    /// 只有终点没有起点的范围不成立
    EndpointWithoutLocus,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::EndpointWithoutLocus => {
                write!(f, "终点已填写但起点为空，无法注册范围")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    FileParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::FileParseFailed { path, source } => {
                write!(f, "配置文件解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<LocusError> for AppError {
    fn from(err: LocusError) -> Self {
        AppError::Locus(err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<未知端点>".to_string());
        if err.is_decode() {
            AppError::Api(ApiError::JsonParseFailed {
                source: Box::new(err),
            })
        } else {
            AppError::Api(ApiError::RequestFailed {
                endpoint,
                source: Box::new(err),
            })
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建状态码错误
    pub fn api_bad_status(endpoint: impl Into<String>, status: u16) -> Self {
        AppError::Api(ApiError::BadStatus {
            endpoint: endpoint.into(),
            status,
        })
    }

    /// 创建结构响应损坏错误
    pub fn structure_schema_mismatch(detail: impl Into<String>) -> Self {
        AppError::Structure(StructureError::SchemaMismatch {
            detail: detail.into(),
        })
    }

    /// 创建配置文件解析错误
    pub fn config_file_parse_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Config(ConfigError::FileParseFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
