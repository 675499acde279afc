//! The flat record format every analysis lesson consumes.
//!
//! A scrape run flattens posts and comments into a single stream of
//! [`Record`]s. The only relationship preserved is that a comment record
//! carries the title of the post it was scraped from; nothing else about
//! the thread structure survives, and nothing else is needed downstream.

use crate::reddit::thing::{Comment, Post};
use crate::text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of thing a record was scraped from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Post,
    Comment,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Post => write!(f, "post"),
            RecordKind::Comment => write!(f, "comment"),
        }
    }
}

/// One scraped item.
///
/// Serializes to exactly the CSV columns the lessons document:
/// `type,title,text,date,score`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub title: String,
    pub text: String,
    pub date: DateTime<Utc>,
    pub score: i64,
}

impl Record {
    /// Builds a record from a scraped post.
    pub fn from_post(post: &Post) -> Self {
        Record {
            kind: RecordKind::Post,
            title: post.title(),
            text: post.text(),
            date: post.created(),
            score: post.score,
        }
    }

    /// Builds a record from a scraped comment.
    ///
    /// `post` is the post the comment was found under; its title becomes
    /// the comment record's title.
    pub fn from_comment(post: &Post, comment: &Comment) -> Self {
        Record {
            kind: RecordKind::Comment,
            title: post.title(),
            text: comment.text(),
            date: comment.created(),
            score: comment.score,
        }
    }

    /// One line of text for the plain-text export.
    ///
    /// Internal newlines are flattened so that one record is always one
    /// line. Never empty: a record with no body falls back to its title,
    /// and a record with neither (a deleted comment, say) falls back to a
    /// placeholder.
    pub fn as_line(&self) -> String {
        let line = text::flatten_line(&self.text);
        if !line.is_empty() {
            return line;
        }
        let line = text::flatten_line(&self.title);
        if !line.is_empty() {
            return line;
        }
        String::from("[deleted]")
    }

    /// All of the record's prose, for text analysis.
    pub fn analysis_text(&self) -> String {
        match self.kind {
            RecordKind::Post => format!("{} {}", self.title, self.text),
            // A comment's title belongs to its parent post; including it
            // would double-count the post's words.
            RecordKind::Comment => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reddit::thing::{Comment, Post};

    fn post() -> Post {
        Post {
            id: String::from("abc123"),
            title: String::from("Paris &amp; Berlin march"),
            selftext: String::from("Thousands marched\ntoday."),
            created_utc: 1718000000.0,
            score: 42,
            num_comments: 1,
            subreddit: String::from("worldnews"),
        }
    }

    fn comment() -> Comment {
        Comment {
            id: String::from("c1"),
            body: String::from("I was there"),
            created_utc: 1718000500.0,
            score: 7,
        }
    }

    #[test]
    fn it_builds_a_record_from_a_post() {
        let record = Record::from_post(&post());
        assert_eq!(record.kind, RecordKind::Post);
        assert_eq!(record.title, "Paris & Berlin march");
        assert_eq!(record.score, 42);
    }

    #[test]
    fn it_builds_a_record_from_a_comment() {
        let record = Record::from_comment(&post(), &comment());
        assert_eq!(record.kind, RecordKind::Comment);
        assert_eq!(record.title, "Paris & Berlin march");
        assert_eq!(record.text, "I was there");
        assert_eq!(record.score, 7);
    }

    #[test]
    fn it_flattens_newlines_into_a_single_line() {
        let record = Record::from_post(&post());
        assert_eq!(record.as_line(), "Thousands marched today.");
    }

    #[test]
    fn it_falls_back_to_the_title_for_empty_bodies() {
        let mut record = Record::from_post(&post());
        record.text = String::new();
        assert_eq!(record.as_line(), "Paris & Berlin march");
    }

    #[test]
    fn it_never_produces_an_empty_line() {
        let mut record = Record::from_comment(&post(), &comment());
        record.title = String::new();
        record.text = String::from("  \n ");
        assert_eq!(record.as_line(), "[deleted]");
    }

    #[test]
    fn it_includes_the_title_in_post_analysis_text() {
        let record = Record::from_post(&post());
        assert!(record.analysis_text().starts_with("Paris & Berlin march"));
    }

    #[test]
    fn it_excludes_the_title_from_comment_analysis_text() {
        let record = Record::from_comment(&post(), &comment());
        assert_eq!(record.analysis_text(), "I was there");
    }
}
