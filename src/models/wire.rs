//! 猫耳接口的 JSON 响应结构
//!
//! 数值字段可能以数字或字符串形式返回，统一用 [`lenient_u64`] 解析。

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 接受数字或数字字符串，其他情况视为缺失
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ========== /dramaapi/getdrama ==========

#[derive(Debug, Deserialize)]
pub struct DramaResponse {
    pub info: DramaInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct DramaInfo {
    #[serde(default)]
    pub drama: DramaMeta,
    #[serde(default)]
    pub episodes: EpisodeGroups,
}

#[derive(Debug, Default, Deserialize)]
pub struct DramaMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub price: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub catalog_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EpisodeGroups {
    #[serde(default)]
    pub episode: Vec<WireEpisode>,
}

#[derive(Debug, Deserialize)]
pub struct WireEpisode {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub sound_id: Option<u64>,
    #[serde(default)]
    pub soundstr: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub need_pay: Option<u64>,
}

// ========== /sound/getsound ==========

#[derive(Debug, Deserialize)]
pub struct SoundResponse {
    pub info: SoundInfo,
}

#[derive(Debug, Deserialize)]
pub struct SoundInfo {
    pub sound: WireSound,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireSound {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub view_count_formatted: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub comment_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub favorite_count: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub create_time: Option<u64>,
}

// ========== /site/getcomment ==========

#[derive(Debug, Deserialize)]
pub struct CommentResponse {
    pub info: CommentInfo,
}

#[derive(Debug, Deserialize)]
pub struct CommentInfo {
    pub comment: CommentBlock,
}

#[derive(Debug, Deserialize)]
pub struct CommentBlock {
    #[serde(rename = "Datas", default)]
    pub datas: Vec<WireComment>,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct WireComment {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub userid: Option<u64>,
    #[serde(default)]
    pub subcomments: Vec<WireSubComment>,
}

#[derive(Debug, Deserialize)]
pub struct WireSubComment {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub userid: Option<u64>,
}
