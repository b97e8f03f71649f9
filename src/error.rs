use thiserror::Error;

/// 接口调用错误
///
/// 所有 `DramaApi` 调用统一返回 [`FetchResult`]，是否吞掉错误由上层决定。
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络请求失败（连接、超时、读取响应体）
    #[error("请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回非 2xx 状态码
    #[error("HTTP 状态异常 ({endpoint}): {status}")]
    Status { endpoint: String, status: u16 },
    /// JSON / XML 解析失败
    #[error("响应解析失败 ({endpoint}): {reason}")]
    Parse { endpoint: String, reason: String },
    /// 评论分页超过上限
    #[error("评论分页超过上限 (声音 {sound_id}, 最多 {max_pages} 页)")]
    PageLimitExceeded { sound_id: u64, max_pages: u32 },
}

impl FetchError {
    pub fn parse(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        FetchError::Parse {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    /// 是否属于传输层失败（网络或状态码）
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Status { .. })
    }
}

/// 接口调用结果
pub type FetchResult<T> = Result<T, FetchError>;

/// 汇总阶段发现的数据不一致
///
/// 不会中断处理，只随剧集结果一起返回并写入日志。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationIssue {
    /// 声音缺少创建时间，不参与最早创建时间的计算
    #[error("剧集 {drama_id} 的声音 {sound_id} 缺少创建时间")]
    MissingCreateTime { drama_id: String, sound_id: u64 },
    /// 单集处理任务异常退出，已用降级记录代替
    #[error("剧集 {drama_id} 的声音 {sound_id} 处理任务异常退出")]
    TaskAborted { drama_id: String, sound_id: u64 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败: {0}")]
    TomlParseFailed(#[from] toml::de::Error),
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    #[error("配置项 {key} 无效: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("CSV 写入错误: {0}")]
    Csv(#[from] csv::Error),
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
