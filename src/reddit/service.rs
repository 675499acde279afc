// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit.
//!
//! Two levels of access exist. Anonymous access reads the public `.json`
//! views on `www.reddit.com`. Authenticated access trades the shared
//! course credentials for an OAuth token and reads `oauth.reddit.com`,
//! which comes with a tenfold rate-limit budget. The scraper works either
//! way; authentication only buys headroom.

use crate::auth::{AuthMode, CredentialConfig, Credentials};
use crate::http::{HTTPError, HTTPResult, HTTPService};
use crate::reddit::client::SortMethod;
use log::{debug, info};
use reqwest::{Client, header};
use serde::Deserialize;

const PUBLIC_BASE: &str = "https://www.reddit.com";
const OAUTH_BASE: &str = "https://oauth.reddit.com";
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// A service for retrieving subreddit data.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Fetches one page of a subreddit's post listing, sorted by `sort`,
    /// and returns the raw JSON response.
    fn get_listing(
        &self,
        subreddit: &str,
        sort: SortMethod,
        limit: u32,
    ) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Fetches the comments of a single post and returns the raw JSON
    /// response.
    fn get_comments(
        &self,
        subreddit: &str,
        post_id: &str,
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// Exchanges the app identity and account credentials for an OAuth
/// bearer token.
///
/// Split out from [`RedditService`] so that authentication can be
/// exercised without contacting Reddit: production code uses
/// [`RedditTokenService`], tests substitute a canned implementation.
pub trait TokenService {
    /// Requests an OAuth token for the given credentials.
    fn fetch_token(
        &self,
        config: &CredentialConfig,
        credentials: &Credentials,
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A token service that performs the OAuth password grant against the
/// real Reddit token endpoint.
pub struct RedditTokenService {
    client: Client,
}

impl HTTPService for RedditTokenService {}

impl Default for RedditTokenService {
    fn default() -> Self {
        Self {
            client: Self::client(),
        }
    }
}

impl TokenService for RedditTokenService {
    async fn fetch_token(
        &self,
        config: &CredentialConfig,
        credentials: &Credentials,
    ) -> HTTPResult<String> {
        let params = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        debug!("requesting OAuth token for {}", credentials.username);
        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&params)
            .send()
            .await
            .map_err(HTTPError::Request)?;

        if !resp.status().is_success() {
            return Err(HTTPError::Http(resp.status()));
        }

        let token: TokenResponse = resp.json().await.map_err(HTTPError::Body)?;
        Ok(token.access_token)
    }
}

/// A service that contacts the Reddit API directly to retrieve information.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
    mode: AuthMode,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl HTTPService for RedditService {}

impl Default for RedditService {
    /// Creates an anonymous, read-only Reddit service.
    fn default() -> Self {
        Self::anonymous()
    }
}

impl RedditService {
    /// Creates an anonymous, read-only Reddit service.
    pub fn anonymous() -> Self {
        Self {
            client: Self::client(),
            mode: AuthMode::ReadOnly,
            token: None,
        }
    }

    /// Creates an authenticated Reddit service by exchanging the app
    /// identity and account credentials for an OAuth token.
    ///
    /// Returns an [`HTTPError`] if the token request fails; callers are
    /// expected to degrade to [`RedditService::anonymous()`] rather than
    /// abort.
    pub async fn authenticated(
        config: &CredentialConfig,
        credentials: &Credentials,
    ) -> HTTPResult<Self> {
        Self::authenticated_via(&RedditTokenService::default(), config, credentials).await
    }

    /// Creates an authenticated Reddit service using the given token
    /// service to perform the OAuth exchange.
    pub async fn authenticated_via<T: TokenService>(
        tokens: &T,
        config: &CredentialConfig,
        credentials: &Credentials,
    ) -> HTTPResult<Self> {
        let token = tokens.fetch_token(config, credentials).await?;
        info!("authenticated as {}", credentials.username);
        Ok(Self {
            client: Self::client(),
            mode: AuthMode::Authenticated,
            token: Some(token),
        })
    }

    /// The level of access this service was built with.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    fn base_uri(&self) -> &'static str {
        match self.mode {
            AuthMode::Authenticated => OAUTH_BASE,
            AuthMode::ReadOnly => PUBLIC_BASE,
        }
    }

    fn listing_uri(&self, subreddit: &str, sort: SortMethod, limit: u32) -> String {
        format!("{}/r/{subreddit}/{sort}.json?limit={limit}", self.base_uri())
    }

    fn comments_uri(&self, subreddit: &str, post_id: &str) -> String {
        format!("{}/r/{subreddit}/comments/{post_id}.json", self.base_uri())
    }

    /// Sends a GET request to a Reddit API endpoint and returns the raw body.
    async fn get(&self, uri: &str) -> HTTPResult<String> {
        debug!("GET {uri}");
        let mut req = self.client.get(uri);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.map_err(HTTPError::Request)?;

        if !resp.status().is_success() {
            Err(HTTPError::Http(resp.status()))
        } else {
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .ok_or(HTTPError::MissingContentType)?
                .to_str()?;
            if !content_type.starts_with("application/json") {
                Err(HTTPError::UnexpectedContentType(content_type.to_string()))
            } else {
                resp.text().await.map_err(HTTPError::Body)
            }
        }
    }
}

impl Service for RedditService {
    async fn get_listing(
        &self,
        subreddit: &str,
        sort: SortMethod,
        limit: u32,
    ) -> HTTPResult<String> {
        let uri = self.listing_uri(subreddit, sort, limit);
        self.get(&uri).await
    }

    async fn get_comments(&self, subreddit: &str, post_id: &str) -> HTTPResult<String> {
        let uri = self.comments_uri(subreddit, post_id);
        self.get(&uri).await
    }
}
