//! End-to-end check of the scrape-then-export flow: a stubbed subreddit
//! with two posts, each carrying one comment, must come out the other end
//! as a four-row CSV and a four-line text file.

use snooscrape::export;
use snooscrape::http::HTTPResult;
use snooscrape::reddit::client::{SortMethod, Subreddit};
use snooscrape::reddit::service::Service;
use std::fs;
use tempfile::tempdir;

struct StubService;

impl Service for StubService {
    async fn get_listing(
        &self,
        _subreddit: &str,
        _sort: SortMethod,
        _limit: u32,
    ) -> HTTPResult<String> {
        Ok(fs::read_to_string("tests/data/listing_worldnews_new_stub.json")
            .expect("could not find test data"))
    }

    async fn get_comments(&self, _subreddit: &str, post_id: &str) -> HTTPResult<String> {
        Ok(
            fs::read_to_string(format!("tests/data/comments_{post_id}_stub.json"))
                .expect("could not find test data"),
        )
    }
}

#[tokio::test]
async fn it_exports_one_csv_row_and_one_text_line_per_scraped_item() {
    let subreddit = Subreddit::new("worldnews", StubService);
    let records = subreddit.scrape(2, SortMethod::New).await.unwrap();
    assert_eq!(records.len(), 4);

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("worldnews.csv");
    let text_path = dir.path().join("worldnews.txt");
    export::write_csv(&records, &csv_path).unwrap();
    export::write_text(&records, &text_path).unwrap();

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers, vec!["type", "title", "text", "date", "score"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    let kinds: Vec<&str> = rows.iter().map(|row| &row[0]).collect();
    assert_eq!(kinds, vec!["post", "comment", "post", "comment"]);

    let text = fs::read_to_string(&text_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|line| !line.trim().is_empty()));
}

#[tokio::test]
async fn it_round_trips_scraped_records_through_csv() {
    let subreddit = Subreddit::new("worldnews", StubService);
    let records = subreddit.scrape(2, SortMethod::New).await.unwrap();

    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("worldnews.csv");
    export::write_csv(&records, &csv_path).unwrap();

    let reread = export::read_csv(&csv_path).unwrap();
    assert_eq!(reread, records);
}
