use super::*;
use serde_json::json;

#[test]
fn test_parse_response() {
    let data = json!({
        "status": "ok",
        "message": {
            "items": [
                {
                    "DOI": "10.1000/j.jmb.2024.01.001",
                    "title": ["Deep Learning for Protein Folding"],
                    "author": [
                        {"given": "Maria", "family": "Garcia"},
                        {"given": "Anonymous"},
                        {"family": "Chen"}
                    ],
                    "published": {"date-parts": [[2024, 3, 15]]},
                    "abstract": "<jats:p>We present a <jats:italic>novel</jats:italic>\n method.</jats:p>",
                    "URL": "http://dx.doi.org/10.1000/j.jmb.2024.01.001"
                },
                {
                    "DOI": "10.1000/xyz",
                    "title": ["Metadata Only"],
                    "issued": {"date-parts": [[2021]]},
                    "container-title": ["Journal of Testing"],
                    "type": "journal-article",
                    "is-referenced-by-count": 42
                },
                {"DOI": "10.1000/none", "title": []}
            ]
        }
    });

    let results = parse_response(&data);
    assert_eq!(results.len(), 2);

    let first = &results[0];
    assert_eq!(first.title, "Deep Learning for Protein Folding");
    assert_eq!(first.authors, vec!["Maria Garcia", "Chen"]);
    assert_eq!(first.published_date, "2024-03-15");
    assert_eq!(first.abstract_text, "We present a novel method.");
    assert_eq!(first.url, "http://dx.doi.org/10.1000/j.jmb.2024.01.001");

    let second = &results[1];
    assert_eq!(second.published_date, "2021-01-01");
    assert_eq!(
        second.abstract_text,
        "Published in: Journal of Testing | Type: Journal Article | Citations: 42"
    );
    assert_eq!(second.url, "https://doi.org/10.1000/xyz");
}

#[test]
fn test_no_metadata_uses_placeholder() {
    let data = json!({"message": {"items": [{"title": ["Bare"]}]}});
    let results = parse_response(&data);
    assert_eq!(results[0].abstract_text, "No abstract available");
    assert_eq!(results[0].published_date, "");
    assert_eq!(results[0].url, "");
}

#[test]
fn test_build_filter() {
    assert_eq!(
        build_filter(Some("2024-01-01"), Some("2024-12-31")),
        "from-pub-date:2024-01-01,until-pub-date:2024-12-31,has-abstract:true"
    );
    assert_eq!(build_filter(None, None), "has-abstract:true");
}
