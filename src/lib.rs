// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! snooscrape is a command-line toolkit for teaching students to scrape
//! Reddit and analyze what they scraped. It fetches a subreddit's posts
//! and comments, flattens them into simple CSV and plain-text files, and
//! provides two starter analyses over those files: rule-based sentiment
//! scoring and place-name ("toponym") tallying.
//!
//! # Examples
//!
//! Download local data and check that everything is ready for class:
//!
//! ```bash
//! snooscrape setup
//! ```
//!
//! Scrape the 10 newest posts (and their comments) from a subreddit into
//! `worldnews.csv` and `worldnews.txt`:
//!
//! ```bash
//! snooscrape scrape worldnews
//! ```
//!
//! Scrape the top 25 posts instead:
//!
//! ```bash
//! snooscrape scrape worldnews -n 25 --sort top
//! ```
//!
//! Score the scraped records with the VADER sentiment lexicon:
//!
//! ```bash
//! snooscrape sentiment worldnews.csv
//! ```
//!
//! Tally the place names mentioned in the scraped records, most-mentioned
//! first:
//!
//! ```bash
//! snooscrape locations worldnews.csv --count
//! ```
//!
//! Show which credentials are in use and what rate limit they buy:
//!
//! ```bash
//! snooscrape auth
//! ```
//!
//! # Credentials
//!
//! Scraping works anonymously out of the box, at Reddit's anonymous rate
//! limit. Courses that distribute a `scraper_config.json` (a shared app
//! identity plus encrypted account credentials) get the elevated limit;
//! see the [auth module documentation](crate::auth) for what that file
//! contains and, importantly, what its encryption does and does not
//! protect against.
//!
//! # License
//!
//! snooscrape is licensed under the terms of the [Apache License 2.0].
//! Please visit the previous link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod auth;
pub mod cli;
pub mod count;
pub mod export;
pub mod geo;
pub mod http;
pub mod record;
pub mod reddit;
pub mod sentiment;
pub mod setup;
pub mod text;
pub mod view;

#[cfg(test)]
mod test_utils;
