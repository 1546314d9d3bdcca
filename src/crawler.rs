use crate::models::{PageResult, PostingDetail, SearchParams};

/// A paginated vacancy search.
///
/// Both calls swallow their own failures: a failed or malformed call is
/// logged by the implementation and comes back as `None`, so the caller can
/// skip that page or posting and keep going.
pub trait VacancySource {
    fn fetch_search_page(&self, params: &SearchParams) -> Option<PageResult>;

    fn fetch_detail(&self, posting_id: &str) -> Option<PostingDetail>;
}

impl<S: VacancySource + ?Sized> VacancySource for &S {
    fn fetch_search_page(&self, params: &SearchParams) -> Option<PageResult> {
        (**self).fetch_search_page(params)
    }

    fn fetch_detail(&self, posting_id: &str) -> Option<PostingDetail> {
        (**self).fetch_detail(posting_id)
    }
}
