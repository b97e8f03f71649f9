//! 猫耳 API 模块
//!
//! 负责接口地址拼接和响应解析，不发起网络请求

use crate::error::{FetchError, FetchResult};
use crate::models::wire::{CommentResponse, DramaResponse, SoundResponse};
use crate::models::{CommentPage, DramaListing, EpisodeDescriptor, EpisodeDetail, UserIdSet};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

/// 评论接口每页条数
pub const COMMENT_PAGE_SIZE: u32 = 100;

/// 弹幕类型为系统弹幕时的标记值
const SYSTEM_DANMAKU_TYPE: &str = "4";

pub fn drama_url(base_url: &str, drama_id: &str) -> String {
    format!("{}/dramaapi/getdrama?drama_id={}", base_url, drama_id)
}

pub fn sound_url(base_url: &str, sound_id: u64) -> String {
    format!("{}/sound/getsound?soundid={}", base_url, sound_id)
}

pub fn danmaku_url(base_url: &str, sound_id: u64) -> String {
    format!("{}/sound/getdm?soundid={}", base_url, sound_id)
}

pub fn comment_url(base_url: &str, sound_id: u64, page: u32) -> String {
    format!(
        "{}/site/getcomment?type=1&e_id={}&order=3&p={}&pagesize={}",
        base_url, sound_id, page, COMMENT_PAGE_SIZE
    )
}

/// 解析剧集信息和单集列表
///
/// `need_pay` 缺失时按免费处理；缺少 `sound_id` 的单集会被跳过。
pub fn parse_drama_listing(endpoint: &str, body: &str) -> FetchResult<DramaListing> {
    let response: DramaResponse =
        serde_json::from_str(body).map_err(|e| FetchError::parse(endpoint, e))?;
    let info = response.info;

    let episodes = info
        .episodes
        .episode
        .into_iter()
        .filter_map(|episode| match episode.sound_id {
            Some(sound_id) => Some(EpisodeDescriptor {
                sound_id,
                title: episode.soundstr,
                paid: episode.need_pay.unwrap_or(0) > 0,
            }),
            None => {
                warn!("⚠️ 跳过缺少 sound_id 的单集: {}", episode.soundstr);
                None
            }
        })
        .collect();

    Ok(DramaListing {
        episodes,
        name: info.drama.name,
        price: info.drama.price,
        view_count: info.drama.view_count,
        catalog_name: info.drama.catalog_name,
    })
}

/// 解析单集详情
///
/// 创建时间为 0 或缺失时返回 `None`。
pub fn parse_sound_detail(endpoint: &str, body: &str) -> FetchResult<EpisodeDetail> {
    let response: SoundResponse =
        serde_json::from_str(body).map_err(|e| FetchError::parse(endpoint, e))?;
    let sound = response.info.sound;

    Ok(EpisodeDetail {
        view_count: sound.view_count,
        view_count_formatted: sound.view_count_formatted,
        comment_count: sound.comment_count,
        favorite_count: sound.favorite_count,
        username: sound.username,
        create_time: sound
            .create_time
            .filter(|t| *t > 0)
            .and_then(|t| i64::try_from(t).ok()),
    })
}

/// 解析弹幕 XML，提取发送者ID
///
/// 每条弹幕形如 `<d p="stime,type,size,color,date,pool,userid,...">`，
/// 类型为系统弹幕的条目不计入。
pub fn parse_danmaku_user_ids(endpoint: &str, xml: &str) -> FetchResult<UserIdSet> {
    let mut reader = Reader::from_str(xml);
    let mut user_ids = UserIdSet::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"d" => {
                let attr = e
                    .try_get_attribute("p")
                    .map_err(|err| FetchError::parse(endpoint, err))?;
                if let Some(attr) = attr {
                    let p = attr
                        .unescape_value()
                        .map_err(|err| FetchError::parse(endpoint, err))?;
                    match danmaku_user_id(&p) {
                        Some(user_id) => {
                            user_ids.insert(user_id);
                        }
                        None => debug!("忽略弹幕: p=\"{}\"", p),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(FetchError::parse(
                    endpoint,
                    format!("XML 第 {} 字节: {}", reader.buffer_position(), e),
                ))
            }
            _ => {}
        }
    }

    Ok(user_ids)
}

/// 解析一页评论，汇总主评论和楼中楼回复的用户ID
pub fn parse_comment_page(endpoint: &str, body: &str) -> FetchResult<CommentPage> {
    let response: CommentResponse =
        serde_json::from_str(body).map_err(|e| FetchError::parse(endpoint, e))?;
    let block = response.info.comment;

    let mut user_ids = UserIdSet::new();
    for comment in &block.datas {
        user_ids.extend(comment.userid);
        user_ids.extend(comment.subcomments.iter().filter_map(|sub| sub.userid));
    }

    Ok(CommentPage {
        user_ids,
        has_more: block.has_more,
    })
}

// ========== 辅助函数 ==========

/// 从弹幕 `p` 属性中取出用户ID，系统弹幕和格式错误的条目返回 `None`
fn danmaku_user_id(p: &str) -> Option<u64> {
    let fields: Vec<&str> = p.split(',').collect();
    if *fields.get(1)? == SYSTEM_DANMAKU_TYPE {
        return None;
    }
    fields.get(6)?.trim().parse().ok()
}
