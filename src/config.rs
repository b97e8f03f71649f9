use crate::error::ConfigError;
use serde::Deserialize;
use std::str::FromStr;

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "DRAMA_STATS_CONFIG";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 猫耳接口根地址
    pub api_base_url: String,
    /// 待统计的剧集ID，为空时从标准输入读取
    ///
    /// 环境变量 `DRAMA_IDS` 为逗号分隔列表；重复的ID只保留第一次出现的，每个剧集只输出一行
    pub drama_ids: Vec<String>,
    /// 单个剧集同时处理的声音数量，0 表示不限制
    pub max_concurrent_episodes: usize,
    /// 评论分页的最大页数，必须大于 0
    pub max_comment_pages: u32,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// 单集统计输出文件
    pub sound_csv_path: String,
    /// 剧集统计输出文件
    pub drama_csv_path: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.missevan.com".to_string(),
            drama_ids: Vec::new(),
            max_concurrent_episodes: 32,
            max_comment_pages: 500,
            request_timeout_secs: 15,
            user_agent: concat!("drama_stats/", env!("CARGO_PKG_VERSION")).to_string(),
            sound_csv_path: "sound_data.csv".to_string(),
            drama_csv_path: "drama_data.csv".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认配置 + 环境变量覆盖
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 解析 TOML 配置，缺省字段使用默认值
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置：`DRAMA_STATS_CONFIG` 指定的 TOML 文件（可选），再叠加环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => path,
            Err(_) => return Self::from_env(),
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::ReadFailed { path, source })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 用 `lookup` 返回的值覆盖对应字段
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("DRAMA_IDS") {
            self.drama_ids = parse_drama_ids(&v);
        }
        if let Some(v) = lookup("MAX_CONCURRENT_EPISODES") {
            self.max_concurrent_episodes = parse_var("MAX_CONCURRENT_EPISODES", &v, "usize")?;
        }
        if let Some(v) = lookup("MAX_COMMENT_PAGES") {
            self.max_comment_pages = parse_var("MAX_COMMENT_PAGES", &v, "u32")?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("SOUND_CSV_PATH") {
            self.sound_csv_path = v;
        }
        if let Some(v) = lookup("DRAMA_CSV_PATH") {
            self.drama_csv_path = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v, "bool")?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_comment_pages == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_comment_pages".to_string(),
                reason: "至少为 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
}

/// 解析逗号分隔的剧集ID，去掉空白和重复项，保持输入顺序
pub fn parse_drama_ids(input: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
