use super::*;
use serde_json::json;

#[test]
fn test_parse_response() {
    let data = json!({
        "hits": [
            {
                "objectID": "39000001",
                "title": "Show HN: Rust research tool",
                "url": "https://github.com/example/tool",
                "author": "pg",
                "points": 120,
                "num_comments": 45,
                "created_at": "2024-01-15T12:30:00.000Z",
                "story_text": null
            },
            {
                "objectID": "39000002",
                "title": "Ask HN: How do you read papers?",
                "url": null,
                "author": "dang",
                "points": 10,
                "num_comments": 3,
                "created_at": "2023-11-02T08:00:00Z",
                "story_text": "I struggle to\nkeep up with arXiv."
            },
            {"objectID": "39000003", "title": null}
        ]
    });

    let results = parse_response(&data);
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].abstract_text, "120 points, 45 comments on HN");
    assert_eq!(results[0].url, "https://github.com/example/tool");
    assert_eq!(results[0].published_date, "2024-01-15");
    assert_eq!(results[0].authors, vec!["pg"]);
    assert_eq!(results[0].source, "hackernews");

    assert_eq!(results[1].url, "https://news.ycombinator.com/item?id=39000002");
    assert_eq!(results[1].abstract_text, "I struggle to keep up with arXiv.");
    assert_eq!(results[1].published_date, "2023-11-02");
}

#[test]
fn test_story_text_truncated() {
    let long_text = "x".repeat(2000);
    let data = json!({"hits": [{"title": "Long", "story_text": long_text}]});

    let results = parse_response(&data);
    assert_eq!(results[0].abstract_text.chars().count(), 500);
    assert_eq!(results[0].authors, vec!["Unknown"]);
}

#[test]
fn test_invalid_timestamp_gives_empty_date() {
    let data = json!({"hits": [{"title": "T", "created_at": "yesterday"}]});
    assert_eq!(parse_response(&data)[0].published_date, "");
}
