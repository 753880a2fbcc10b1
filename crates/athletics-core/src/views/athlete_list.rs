use tokio::sync::watch;

use crate::api::{ApiClient, AthleteQuery};
use crate::cache::{FetchCache, FetchState};
use crate::models::{AthletePage, AthleteSortField, SortOrder};

use super::{search_page_key, ViewContext};

/// Paged, searchable, sortable athlete directory.
pub struct AthleteListView {
    api: ApiClient,
    query: AthleteQuery,
    cache: FetchCache<AthletePage>,
}

impl AthleteListView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            api: ctx.api.clone(),
            query: AthleteQuery::new(ctx.per_page),
            cache: FetchCache::with_ttl(ctx.ttl),
        }
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.query.search = term.trim().to_string();
        self
    }

    pub fn with_sort(mut self, field: AthleteSortField, order: SortOrder) -> Self {
        self.query.sort_by = field;
        self.query.sort_order = order;
        self
    }

    pub fn query(&self) -> &AthleteQuery {
        &self.query
    }

    /// The default ordering keeps the short key so it matches plain searches.
    pub fn cache_key(&self) -> String {
        let key = search_page_key("athletes", &self.query.search, self.query.page);
        let default_sort = self.query.sort_by == AthleteSortField::default()
            && self.query.sort_order == SortOrder::default();
        if default_sort {
            key
        } else {
            format!(
                "{}-sort-{}-{}",
                key,
                self.query.sort_by.as_param(),
                self.query.sort_order.as_param()
            )
        }
    }

    pub fn state(&self) -> FetchState<AthletePage> {
        self.cache.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState<AthletePage>> {
        self.cache.subscribe()
    }

    pub fn cache(&self) -> &FetchCache<AthletePage> {
        &self.cache
    }

    pub async fn load(&self) -> FetchState<AthletePage> {
        let api = self.api.clone();
        let query = self.query.clone();
        self.cache
            .resolve(self.cache_key(), move || async move {
                api.fetch_athletes(&query).await
            })
            .await
    }

    pub async fn search(&mut self, term: &str) -> FetchState<AthletePage> {
        self.query.search = term.trim().to_string();
        self.query.page = 1;
        self.load().await
    }

    /// Change ordering; paging restarts at 1.
    pub async fn sort_by(
        &mut self,
        field: AthleteSortField,
        order: SortOrder,
    ) -> FetchState<AthletePage> {
        self.query.sort_by = field;
        self.query.sort_order = order;
        self.query.page = 1;
        self.load().await
    }

    /// Re-sort on `field`, flipping the order when it is already the sort column.
    pub async fn toggle_sort(&mut self, field: AthleteSortField) -> FetchState<AthletePage> {
        let order = if self.query.sort_by == field {
            self.query.sort_order.toggle()
        } else {
            SortOrder::Ascending
        };
        self.sort_by(field, order).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> FetchState<AthletePage> {
        self.query.page = page.max(1);
        self.load().await
    }

    pub async fn next_page(&mut self) -> FetchState<AthletePage> {
        let has_next = self
            .state()
            .data()
            .is_some_and(|page| page.pagination.has_next());
        if has_next {
            self.query.page += 1;
        }
        self.load().await
    }

    pub async fn prev_page(&mut self) -> FetchState<AthletePage> {
        self.query.page = self.query.page.saturating_sub(1).max(1);
        self.load().await
    }

    pub async fn refresh(&self) -> FetchState<AthletePage> {
        let api = self.api.clone();
        let query = self.query.clone();
        self.cache
            .refresh(self.cache_key(), move || async move {
                api.fetch_athletes(&query).await
            })
            .await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate(&self.cache_key());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::FetchPhase;
    use crate::views::test_server::TestServer;

    const PAGE: &str = r#"{
        "athletes": [{"id": 11, "full_name": "Amy Jones", "country_code": "SGP"}],
        "pagination": {"page": 1, "per_page": 50, "total": 1, "pages": 1}
    }"#;

    fn offline_view() -> AthleteListView {
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        AthleteListView::new(&ViewContext::new(api))
    }

    #[test]
    fn test_cache_key_adds_sort_only_when_not_default() {
        let mut view = offline_view();
        view.query.search = "SGP".to_string();
        assert_eq!(view.cache_key(), "athletes-search-SGP-page-1");

        view.query.sort_order = SortOrder::Descending;
        assert_eq!(
            view.cache_key(),
            "athletes-search-SGP-page-1-sort-full_name-DESC"
        );

        view.query.sort_by = AthleteSortField::BirthDate;
        view.query.sort_order = SortOrder::Ascending;
        assert_eq!(
            view.cache_key(),
            "athletes-search-SGP-page-1-sort-birth_date-ASC"
        );
    }

    #[tokio::test]
    async fn test_sort_change_is_a_separate_entry() {
        let server = TestServer::start(|_| (200, PAGE.to_string())).await;
        let api = ApiClient::new(&server.base_url).unwrap().with_token("t");
        let mut view = AthleteListView::new(&ViewContext::new(api));

        view.load().await;
        view.go_to_page(1).await;
        assert_eq!(server.hits("/api/athletes"), 1);

        let sorted = view.toggle_sort(AthleteSortField::FullName).await;
        assert_eq!(sorted.phase(), FetchPhase::Fresh);
        assert_eq!(view.query().sort_order, SortOrder::Descending);
        assert_eq!(server.hits("/api/athletes"), 2);
        assert!(server
            .requests()
            .last()
            .unwrap()
            .contains("sort_order=DESC"));
        assert_eq!(view.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_search_publishes_loading_then_serves_same_page_from_cache() {
        let server = TestServer::start(|_| {
            (
                200,
                r#"{
                    "athletes": [
                        {"id": 1, "full_name": "Amy Jones"},
                        {"id": 2, "full_name": "Ben Jones"},
                        {"id": 3, "full_name": "Cara Jones"}
                    ],
                    "pagination": {"page": 1, "per_page": 50, "total": 3, "pages": 1}
                }"#
                .to_string(),
            )
        })
        .await;
        let api = ApiClient::new(&server.base_url).unwrap().with_token("t");
        let view = AthleteListView::new(&ViewContext::new(api)).with_search("jones");
        assert_eq!(view.cache_key(), "athletes-search-jones-page-1");

        let mut rx = view.subscribe();
        let mut loading = vec![rx.borrow_and_update().loading];
        let (first, _) = tokio::join!(view.load(), async {
            while rx.changed().await.is_ok() {
                let now = rx.borrow_and_update().loading;
                loading.push(now);
                if !now {
                    break;
                }
            }
        });

        assert_eq!(loading, vec![false, true, false]);
        let page = first.data().unwrap();
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.athletes.len(), 3);
        assert!(server.requests()[0].contains("search=jones"));

        let second = view.load().await;
        assert!(Arc::ptr_eq(
            first.data.as_ref().unwrap(),
            second.data.as_ref().unwrap()
        ));
        assert_eq!(server.hits("/api/athletes"), 1);
    }

    #[tokio::test]
    async fn test_server_error_without_entry() {
        let server =
            TestServer::start(|_| (500, r#"{"error": "Failed to fetch athletes"}"#.to_string()))
                .await;
        let api = ApiClient::new(&server.base_url).unwrap().with_token("t");
        let view = AthleteListView::new(&ViewContext::new(api));

        let state = view.load().await;
        assert!(state.data.is_none());
        assert!(state
            .error
            .as_deref()
            .unwrap()
            .contains("Failed to fetch athletes"));
    }
}
