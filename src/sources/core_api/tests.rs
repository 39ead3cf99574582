use super::*;
use serde_json::json;

#[test]
fn test_parse_response() {
    let data = json!({
        "totalHits": 3,
        "results": [
            {
                "id": 12345,
                "title": "Open Access Study",
                "authors": [{"name": "Li Wei"}, "Sam Taylor", {"name": ""}],
                "publishedDate": "2023-06-01T00:00:00",
                "abstract": "An open\naccess abstract.",
                "doi": "10.5555/core.1",
                "downloadUrl": "https://core.ac.uk/download/12345.pdf"
            },
            {
                "id": 67890,
                "title": "Thesis Without Abstract",
                "authors": [],
                "yearPublished": 2018,
                "documentType": "thesis",
                "dataProviders": [{"id": 1, "name": "University Repository"}],
                "citationCount": 7,
                "downloadUrl": ""
            },
            {"id": 1, "title": null}
        ]
    });

    let results = parse_response(&data);
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].authors, vec!["Li Wei", "Sam Taylor"]);
    assert_eq!(results[0].published_date, "2023-06-01");
    assert_eq!(results[0].abstract_text, "An open access abstract.");
    assert_eq!(results[0].url, "https://doi.org/10.5555/core.1");
    assert_eq!(results[0].source, "core");

    assert_eq!(results[1].published_date, "2018-01-01");
    assert_eq!(
        results[1].abstract_text,
        "Type: thesis | Repository: University Repository | Citations: 7"
    );
    assert_eq!(results[1].url, "https://core.ac.uk/works/67890");
}

#[test]
fn test_build_query() {
    assert_eq!(build_query("crispr", None, None), "crispr");
    assert_eq!(
        build_query("crispr", Some("2024-01-01"), Some("2024-12-31")),
        "crispr AND yearPublished:2024"
    );
    assert_eq!(
        build_query("crispr", Some("2020-01-01"), None),
        "crispr AND yearPublished>=2020 AND yearPublished<=2100"
    );
    assert_eq!(
        build_query("crispr", None, Some("2022-05-01")),
        "crispr AND yearPublished>=1900 AND yearPublished<=2022"
    );
}
