// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading data from the Reddit API.

use crate::http;
use crate::record::Record;
use crate::reddit::service::Service;
use crate::reddit::thing::{self, Comment, Post};
use clap::ValueEnum;
use log::{debug, info};
use std::fmt;
use thiserror::Error;

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] http::HTTPError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] thing::Error),
}

/// The listing sort order offered to students.
///
/// These map directly onto Reddit's listing endpoints; the string form is
/// the path segment in the URL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortMethod {
    /// Most recent posts first.
    #[default]
    New,

    /// Currently trending posts.
    Hot,

    /// Highest-scored posts.
    Top,
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMethod::New => write!(f, "new"),
            SortMethod::Hot => write!(f, "hot"),
            SortMethod::Top => write!(f, "top"),
        }
    }
}

/// Represents a subreddit to be scraped.
#[derive(Debug)]
pub struct Subreddit<S: Service> {
    name: String,
    service: S,
}

impl<S: Service> Subreddit<S> {
    /// Creates a new client for scraping a single subreddit.
    ///
    /// `name` is the subreddit's name, without the `r/` prefix. `service`
    /// is the actual service implementation used to talk to Reddit.
    pub fn new(name: impl Into<String>, service: S) -> Self {
        Self {
            name: name.into(),
            service,
        }
    }

    /// The subreddit's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fetches one page of the subreddit's posts.
    pub async fn posts(&self, limit: u32, sort: SortMethod) -> Result<Vec<Post>, Error> {
        let body = self.service.get_listing(&self.name, sort, limit).await?;
        Ok(thing::parse_posts(&body)?)
    }

    /// Fetches the comments of a single post.
    pub async fn comments(&self, post: &Post) -> Result<Vec<Comment>, Error> {
        let body = self.service.get_comments(&self.name, &post.id).await?;
        Ok(thing::parse_comments(&body)?)
    }

    /// Scrapes posts and their comments into a flat list of records.
    ///
    /// Records appear in scrape order: each post, followed immediately by
    /// its comments. Comments are fetched one post at a time; with a
    /// classroom-sized `limit` there is nothing to gain from fanning the
    /// requests out.
    pub async fn scrape(&self, limit: u32, sort: SortMethod) -> Result<Vec<Record>, Error> {
        info!("scraping r/{} ({sort}, {limit} posts)", self.name);
        let posts = self.posts(limit, sort).await?;
        let mut records = Vec::new();
        for post in &posts {
            records.push(Record::from_post(post));
            let comments = self.comments(post).await?;
            debug!("post {} has {} comments", post.id, comments.len());
            for comment in &comments {
                records.push(Record::from_comment(post, comment));
            }
        }
        info!("scraped {} records from r/{}", records.len(), self.name);
        Ok(records)
    }
}
