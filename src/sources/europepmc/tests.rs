use super::*;
use serde_json::json;

#[test]
fn test_parse_response() {
    let data = json!({
        "hitCount": 3,
        "resultList": {
            "result": [
                {
                    "id": "38000001",
                    "source": "MED",
                    "pmid": "38000001",
                    "doi": "10.1038/s41586-024-0001",
                    "title": "CRISPR Screening in Organoids",
                    "authorString": "Smith J, Doe A, Lee K.",
                    "pubYear": "2024",
                    "abstractText": "Organoids <i>enable</i>\nscreening."
                },
                {
                    "id": "PPR123",
                    "source": "PPR",
                    "title": "Preprint Without Abstract",
                    "pubYear": "2023",
                    "journalInfo": {"journal": {"title": "bioRxiv"}},
                    "pubTypeList": {"pubType": ["preprint", "research-article", "other", "extra"]},
                    "isOpenAccess": "Y"
                },
                {"id": "X", "title": ""}
            ]
        }
    });

    let results = parse_response(&data);
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].authors, vec!["Smith J", "Doe A", "Lee K"]);
    assert_eq!(results[0].published_date, "2024-01-01");
    assert_eq!(results[0].abstract_text, "Organoids enable screening.");
    assert_eq!(results[0].url, "https://doi.org/10.1038/s41586-024-0001");

    assert_eq!(
        results[1].abstract_text,
        "Journal: bioRxiv | Type: preprint, research-article, other | Access: Open Access"
    );
    assert_eq!(results[1].url, "https://europepmc.org/article/PPR/PPR123");
}

#[test]
fn test_url_chain() {
    let full_text = json!({"resultList": {"result": [{
        "title": "T",
        "pmid": "1",
        "fullTextUrlList": {"fullTextUrl": [{"url": "https://example.org/full.pdf"}]}
    }]}});
    assert_eq!(parse_response(&full_text)[0].url, "https://example.org/full.pdf");

    let pmid = json!({"resultList": {"result": [{"title": "T", "pmid": "42", "id": "42"}]}});
    assert_eq!(parse_response(&pmid)[0].url, "https://europepmc.org/article/MED/42");
}

#[test]
fn test_closed_access_description() {
    let data = json!({"resultList": {"result": [{"title": "T"}]}});
    assert_eq!(parse_response(&data)[0].abstract_text, "Access: Closed Access");
}

#[test]
fn test_build_query() {
    assert_eq!(build_query("malaria", None, None), "malaria");
    assert_eq!(
        build_query("malaria", Some("2020-01-01"), None),
        "malaria FIRST_PDATE:[2020 TO 3000]"
    );
}
