//! 评论分页遍历

use super::DramaApi;
use crate::error::{FetchError, FetchResult};
use crate::models::UserIdSet;
use tracing::debug;

/// 遍历某个声音的全部评论页，返回所有评论者（含楼中楼）的ID
///
/// 从第 1 页开始，直到接口返回 `hasMore = false`。任意一页失败即中止并返回该错误；
/// 超过 `max_pages` 页仍未结束时返回 [`FetchError::PageLimitExceeded`]。
pub async fn collect_comment_user_ids<A>(
    api: &A,
    sound_id: u64,
    max_pages: u32,
) -> FetchResult<UserIdSet>
where
    A: DramaApi + ?Sized,
{
    let mut user_ids = UserIdSet::new();
    let mut page = 1;

    loop {
        if page > max_pages {
            return Err(FetchError::PageLimitExceeded {
                sound_id,
                max_pages,
            });
        }

        let comment_page = api.fetch_comment_page(sound_id, page).await?;
        user_ids.extend(comment_page.user_ids);

        if !comment_page.has_more {
            debug!(
                "声音 {} 评论共 {} 页, {} 位用户",
                sound_id,
                page,
                user_ids.len()
            );
            return Ok(user_ids);
        }
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentPage, DramaListing, EpisodeDetail};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 按页号返回预设评论页，并记录请求过的页号
    struct PagedComments {
        pages: Vec<FetchResult<CommentPage>>,
        requested: Mutex<Vec<u32>>,
    }

    impl PagedComments {
        fn new(pages: Vec<FetchResult<CommentPage>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    fn page(ids: &[u64], has_more: bool) -> FetchResult<CommentPage> {
        Ok(CommentPage {
            user_ids: ids.iter().copied().collect(),
            has_more,
        })
    }

    #[async_trait]
    impl DramaApi for PagedComments {
        async fn fetch_drama(&self, _drama_id: &str) -> FetchResult<DramaListing> {
            unimplemented!()
        }

        async fn fetch_episode_detail(&self, _sound_id: u64) -> FetchResult<EpisodeDetail> {
            unimplemented!()
        }

        async fn fetch_danmaku_user_ids(&self, _sound_id: u64) -> FetchResult<UserIdSet> {
            unimplemented!()
        }

        async fn fetch_comment_page(&self, _sound_id: u64, page: u32) -> FetchResult<CommentPage> {
            self.requested.lock().unwrap().push(page);
            match self.pages.get(page as usize - 1) {
                Some(Ok(p)) => Ok(p.clone()),
                Some(Err(_)) => Err(FetchError::Status {
                    endpoint: format!("getcomment p={}", page),
                    status: 502,
                }),
                None => panic!("unexpected page {}", page),
            }
        }
    }

    #[tokio::test]
    async fn walks_until_has_more_is_false() {
        let api = PagedComments::new(vec![
            page(&[1, 2], true),
            page(&[2, 3], true),
            page(&[4], true),
            page(&[5], false),
        ]);

        let ids = tokio_test::assert_ok!(collect_comment_user_ids(&api, 9, 100).await);

        assert_eq!(api.requested(), vec![1, 2, 3, 4]);
        assert_eq!(ids, [1, 2, 3, 4, 5].into_iter().collect());
    }

    #[tokio::test]
    async fn single_page_is_one_request() {
        let api = PagedComments::new(vec![page(&[], false)]);
        let ids = collect_comment_user_ids(&api, 9, 100).await.unwrap();
        assert_eq!(api.requested(), vec![1]);
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn page_failure_aborts_walk() {
        let api = PagedComments::new(vec![
            page(&[1], true),
            Err(FetchError::parse("unused", "unused")),
            page(&[3], false),
        ]);

        let err = tokio_test::assert_err!(collect_comment_user_ids(&api, 9, 100).await);

        assert!(err.is_transport());
        assert_eq!(api.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn stops_at_page_limit() {
        let api = PagedComments::new(vec![page(&[1], true), page(&[2], true), page(&[3], true)]);

        let err = collect_comment_user_ids(&api, 9, 2).await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::PageLimitExceeded {
                sound_id: 9,
                max_pages: 2
            }
        ));
        assert_eq!(api.requested(), vec![1, 2]);
    }
}
