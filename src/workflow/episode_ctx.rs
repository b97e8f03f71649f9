//! 单集处理上下文
//!
//! 封装"我正在处理哪部剧的哪一集"这一信息

use std::fmt::Display;

/// 单集处理上下文（仅用于日志）
#[derive(Debug, Clone)]
pub struct EpisodeCtx {
    /// 剧集ID
    pub drama_id: String,

    /// 声音ID
    pub sound_id: u64,
}

impl EpisodeCtx {
    pub fn new(drama_id: impl Into<String>, sound_id: u64) -> Self {
        Self {
            drama_id: drama_id.into(),
            sound_id,
        }
    }
}

impl Display for EpisodeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[剧集 #{} 声音 #{}]", self.drama_id, self.sound_id)
    }
}
