use crate::http::{HTTPError, HTTPResult};
use crate::reddit::client::SortMethod;
use crate::reddit::service::Service;
use reqwest::StatusCode;
use std::fs;

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// A deterministic [`Service`] that replays canned API responses from
/// `tests/data/` instead of contacting Reddit.
pub struct TestService<'a> {
    suffix: &'a str,
}

impl<'a> TestService<'a> {
    pub fn new(suffix: &'a str) -> Self {
        Self { suffix }
    }
}

impl<'a> Service for TestService<'a> {
    async fn get_listing(
        &self,
        subreddit: &str,
        sort: SortMethod,
        _limit: u32,
    ) -> HTTPResult<String> {
        Ok(load_data(&format!(
            "listing_{subreddit}_{sort}_{}",
            self.suffix
        )))
    }

    async fn get_comments(&self, _subreddit: &str, post_id: &str) -> HTTPResult<String> {
        Ok(load_data(&format!("comments_{post_id}_{}", self.suffix)))
    }
}

/// A [`Service`] for a subreddit that does not exist.
pub struct MissingService;

impl Service for MissingService {
    async fn get_listing(
        &self,
        _subreddit: &str,
        _sort: SortMethod,
        _limit: u32,
    ) -> HTTPResult<String> {
        Err(HTTPError::Http(StatusCode::NOT_FOUND))
    }

    async fn get_comments(&self, _subreddit: &str, _post_id: &str) -> HTTPResult<String> {
        Err(HTTPError::Http(StatusCode::NOT_FOUND))
    }
}
