// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. This
//! module models the JSON wire format of the things the scraper cares
//! about -- listings, posts, and comments -- and parses API responses
//! into them.

use crate::text;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// A parse error.
#[derive(Debug, Error)]
pub enum Error {
    /// The response was not the JSON shape we expected.
    #[error("could not parse Reddit API response: {0}")]
    Json(#[from] serde_json::Error),

    /// The comments endpoint did not include a comment listing.
    ///
    /// The endpoint returns a two-element array -- the post itself,
    /// followed by its comments -- so a response without a second element
    /// is malformed.
    #[error("comment response did not include a comment listing")]
    MissingCommentListing,
}

/// A Reddit listing: a page of things of one kind.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

/// The payload of a [`Listing`].
#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<Child<T>>,

    /// Pagination cursor. Unused by the scraper (lessons fetch a single
    /// page), but part of the wire format.
    #[serde(default)]
    pub after: Option<String>,
}

/// A single element of a listing, tagged with its kind.
///
/// Kinds of interest here: `t1` is a comment, `t3` is a post, and `more`
/// is a stub standing in for comments that were not returned.
#[derive(Debug, Deserialize)]
pub struct Child<T> {
    pub kind: String,
    pub data: T,
}

/// A Reddit post (an article or self post).
#[derive(Clone, Debug, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    pub created_utc: f64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u32,
    #[serde(default)]
    pub subreddit: String,
}

/// A Reddit comment.
#[derive(Clone, Debug, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    pub created_utc: f64,
    #[serde(default)]
    pub score: i64,
}

impl Post {
    /// The post's title, with HTML entities decoded.
    pub fn title(&self) -> String {
        text::convert_html_entities(&self.title)
    }

    /// The post's body text, with HTML entities decoded. Empty for link
    /// posts.
    pub fn text(&self) -> String {
        text::convert_html_entities(&self.selftext)
    }

    /// The time the post was created.
    pub fn created(&self) -> DateTime<Utc> {
        timestamp(self.created_utc)
    }
}

impl Comment {
    /// The comment's body, with HTML entities decoded.
    pub fn text(&self) -> String {
        text::convert_html_entities(&self.body)
    }

    /// The time the comment was created.
    pub fn created(&self) -> DateTime<Utc> {
        timestamp(self.created_utc)
    }
}

// Reddit reports timestamps as fractional epoch seconds. Sub-second
// precision is noise for our purposes, so it is dropped.
fn timestamp(epoch: f64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch as i64, 0).unwrap_or_default()
}

/// Parses the response of a post listing endpoint
/// (`/r/<subreddit>/<sort>.json`) into posts.
///
/// Children that are not posts are skipped.
pub fn parse_posts(body: &str) -> Result<Vec<Post>, Error> {
    let listing: Listing<serde_json::Value> = serde_json::from_str(body)?;
    children_of_kind(listing, "t3")
}

/// Parses the response of a comments endpoint
/// (`/r/<subreddit>/comments/<id>.json`) into comments.
///
/// The response is a two-element array of listings; the second element
/// holds the comments. `more` stubs are skipped, not followed: the lessons
/// only ever analyze the comments Reddit returns up front.
pub fn parse_comments(body: &str) -> Result<Vec<Comment>, Error> {
    let mut listings: Vec<Listing<serde_json::Value>> = serde_json::from_str(body)?;
    if listings.len() < 2 {
        return Err(Error::MissingCommentListing);
    }
    children_of_kind(listings.remove(1), "t1")
}

fn children_of_kind<T>(listing: Listing<serde_json::Value>, kind: &str) -> Result<Vec<T>, Error>
where
    T: for<'de> Deserialize<'de>,
{
    listing
        .data
        .children
        .into_iter()
        .filter(|child| child.kind == kind)
        .map(|child| serde_json::from_value(child.data).map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const POST_LISTING: &str = indoc! {r#"
        {"kind": "Listing", "data": {"after": null, "children": [
            {"kind": "t3", "data": {"id": "abc123", "title": "Paris &amp; Berlin march", "selftext": "Thousands marched today.", "created_utc": 1718000000.0, "score": 42, "num_comments": 1, "subreddit": "worldnews"}},
            {"kind": "t3", "data": {"id": "def456", "title": "Quiet day", "selftext": "", "created_utc": 1718100000.5, "score": 3, "num_comments": 0, "subreddit": "worldnews"}}
        ]}}"#};

    const COMMENT_RESPONSE: &str = indoc! {r#"
        [
            {"kind": "Listing", "data": {"children": [
                {"kind": "t3", "data": {"id": "abc123", "title": "Paris &amp; Berlin march", "selftext": "Thousands marched today.", "created_utc": 1718000000.0, "score": 42, "num_comments": 1, "subreddit": "worldnews"}}
            ]}},
            {"kind": "Listing", "data": {"children": [
                {"kind": "t1", "data": {"id": "c1", "body": "I was there, it was huge &amp; loud", "created_utc": 1718000500.0, "score": 7}},
                {"kind": "more", "data": {"count": 12, "children": ["c2", "c3"]}}
            ]}}
        ]"#};

    mod posts {
        use super::super::*;
        use super::POST_LISTING;
        use chrono::DateTime;

        #[test]
        fn it_parses_a_post_listing() {
            let posts = parse_posts(POST_LISTING).unwrap();
            assert_eq!(posts.len(), 2);
            assert_eq!(posts[0].id, "abc123");
            assert_eq!(posts[0].score, 42);
            assert_eq!(posts[1].num_comments, 0);
        }

        #[test]
        fn it_decodes_html_entities_in_titles() {
            let posts = parse_posts(POST_LISTING).unwrap();
            assert_eq!(posts[0].title(), "Paris & Berlin march");
        }

        #[test]
        fn it_converts_timestamps() {
            let posts = parse_posts(POST_LISTING).unwrap();
            let expected = DateTime::parse_from_rfc3339("2024-06-10T06:13:20Z").unwrap();
            assert_eq!(posts[0].created(), expected);
        }

        #[test]
        fn it_truncates_fractional_timestamps() {
            let posts = parse_posts(POST_LISTING).unwrap();
            assert_eq!(posts[1].created().timestamp(), 1718100000);
        }

        #[test]
        fn it_rejects_malformed_json() {
            let err = parse_posts("{ nope").unwrap_err();
            assert!(matches!(err, Error::Json(_)));
        }

        #[test]
        fn it_parses_an_empty_listing() {
            let body = r#"{"kind": "Listing", "data": {"children": []}}"#;
            let posts = parse_posts(body).unwrap();
            assert!(posts.is_empty());
        }
    }

    mod comments {
        use super::super::*;
        use super::COMMENT_RESPONSE;

        #[test]
        fn it_parses_comments_from_the_second_listing() {
            let comments = parse_comments(COMMENT_RESPONSE).unwrap();
            assert_eq!(comments.len(), 1);
            assert_eq!(comments[0].id, "c1");
            assert_eq!(comments[0].score, 7);
        }

        #[test]
        fn it_skips_more_stubs() {
            let comments = parse_comments(COMMENT_RESPONSE).unwrap();
            assert!(comments.iter().all(|c| !c.body.is_empty()));
        }

        #[test]
        fn it_decodes_html_entities_in_bodies() {
            let comments = parse_comments(COMMENT_RESPONSE).unwrap();
            assert_eq!(comments[0].text(), "I was there, it was huge & loud");
        }

        #[test]
        fn it_rejects_a_response_without_a_comment_listing() {
            let body = r#"[{"kind": "Listing", "data": {"children": []}}]"#;
            let err = parse_comments(body).unwrap_err();
            assert!(matches!(err, Error::MissingCommentListing));
        }
    }
}
