//! Follower listing: page-numbered pagination exposed as a lazy stream.

use std::pin::pin;

use futures::stream::{self, Stream, TryStreamExt};

use followscope_core::FollowerPayload;

use crate::client::GitHubClient;
use crate::error::GitHubError;

/// Maximum number of pages requested before giving up.
///
/// At 100 followers per page this covers accounts with up to 100 000
/// followers; beyond that the listing is assumed to be cycling.
pub const MAX_PAGES: usize = 1_000;

impl GitHubClient {
    /// Fetches one page (1-based) of `GET /users/{login}/followers`.
    ///
    /// # Errors
    ///
    /// Any [`GitHubError`] from the request.
    pub async fn fetch_followers_page(
        &self,
        page: usize,
    ) -> Result<Vec<FollowerPayload>, GitHubError> {
        let per_page = self.per_page.to_string();
        let page_str = page.to_string();
        let url = self.endpoint(
            &["users", &self.username, "followers"],
            &[("per_page", &per_page), ("page", &page_str)],
        )?;
        self.get_json(&url, &format!("followers page {page}")).await
    }

    /// Lazily yields follower pages in order, starting from page 1.
    ///
    /// Each call starts a fresh listing. The stream ends after a page shorter
    /// than `per_page`; an empty page ends it without being yielded. Requests
    /// are strictly sequential because whether another page exists depends on
    /// the size of the previous one.
    pub fn follower_pages(
        &self,
    ) -> impl Stream<Item = Result<Vec<FollowerPayload>, GitHubError>> + Send + '_ {
        let per_page = self.per_page as usize;
        stream::try_unfold(Some(1usize), move |next_page| async move {
            let Some(page) = next_page else {
                return Ok(None);
            };
            if page > MAX_PAGES {
                return Err(GitHubError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let batch = self.fetch_followers_page(page).await?;
            tracing::debug!(page, count = batch.len(), "fetched followers page");

            if batch.is_empty() {
                return Ok(None);
            }
            let following = (batch.len() >= per_page).then_some(page + 1);
            Ok(Some((batch, following)))
        })
    }

    /// Drains [`Self::follower_pages`] into one list.
    ///
    /// **All-or-nothing**: if any page fails, the pages already fetched are
    /// discarded and the error is returned. A partial roster would be diffed
    /// as a mass unfollow.
    ///
    /// # Errors
    ///
    /// Propagates any page error, or [`GitHubError::PaginationLimit`] if the
    /// listing exceeds [`MAX_PAGES`].
    pub async fn fetch_all_followers(&self) -> Result<Vec<FollowerPayload>, GitHubError> {
        let mut pages = pin!(self.follower_pages());
        let mut all = Vec::new();
        let mut page_count = 0usize;
        while let Some(batch) = pages.try_next().await? {
            page_count += 1;
            all.extend(batch);
        }
        tracing::info!(
            login = %self.username,
            pages = page_count,
            followers = all.len(),
            "fetched follower list"
        );
        Ok(all)
    }
}
