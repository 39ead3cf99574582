use super::*;
use serde_json::json;

#[test]
fn test_parse_response() {
    let data = json!({
        "result": {
            "hits": {
                "@total": "3",
                "hit": [
                    {
                        "info": {
                            "authors": {"author": [
                                {"@pid": "1", "text": "Edsger W. Dijkstra"},
                                {"@pid": "2", "text": "Tony Hoare"}
                            ]},
                            "title": "Structured Programming Revisited.",
                            "venue": "CACM",
                            "pages": "1-10",
                            "year": "2022",
                            "type": "Journal Articles",
                            "access": "closed",
                            "doi": "10.1145/000001",
                            "ee": "https://doi.org/10.1145/000001",
                            "url": "https://dblp.org/rec/journals/cacm/X22"
                        }
                    },
                    {
                        "info": {
                            "authors": {"author": {"@pid": "3", "text": "Barbara Liskov"}},
                            "title": "Single Author Paper.",
                            "venue": ["ICSE", "Workshops"],
                            "year": "2019",
                            "access": "open",
                            "ee": ["https://example.org/paper.pdf"],
                            "url": "https://dblp.org/rec/conf/icse/L19"
                        }
                    },
                    {"info": {"title": "", "year": "2020"}}
                ]
            }
        }
    });

    let results = parse_response(&data);
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].authors, vec!["Edsger W. Dijkstra", "Tony Hoare"]);
    assert_eq!(results[0].published_date, "2022-01-01");
    assert_eq!(results[0].url, "https://doi.org/10.1145/000001");
    assert_eq!(
        results[0].abstract_text,
        "Published in: CACM | Type: Journal Articles | Pages: 1-10 | Access: Closed Access"
    );

    assert_eq!(results[1].authors, vec!["Barbara Liskov"]);
    assert_eq!(results[1].url, "https://example.org/paper.pdf");
    assert_eq!(
        results[1].abstract_text,
        "Published in: ICSE | Access: Open Access"
    );
}

#[test]
fn test_parse_response_no_hits() {
    let data = json!({"result": {"hits": {"@total": "0"}}});
    assert!(parse_response(&data).is_empty());
}

#[test]
fn test_metadata_placeholder() {
    let data = json!({"result": {"hits": {"hit": [{"info": {"title": "Bare"}}]}}});
    let results = parse_response(&data);
    assert_eq!(results[0].abstract_text, "No abstract available");
    assert_eq!(results[0].published_date, "");
}
