use super::*;
use serde_json::json;

const RESULTS_PAGE: &str = r##"
<html><body>
<div class="result results_links result--ad">
  <h2 class="result__title"><a class="result__a" href="https://ads.example.com">Sponsored</a></h2>
</div>
<div class="result results_links results_links_deep web-result">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fai%2Dhealth&amp;rut=abc">AI in   Health</a>
  </h2>
  <a class="result__snippet" href="#">Machine learning is transforming <b>healthcare</b>.</a>
</div>
<div class="result results_links web-result">
  <h2 class="result__title"><a class="result__a" href="https://direct.example.org/page">Direct Link</a></h2>
</div>
<div class="result results_links web-result">
  <h2 class="result__title"><a class="result__a" href="https://empty.example.org"></a></h2>
</div>
</body></html>
"##;

#[test]
fn test_parse_html() {
    let results = parse_html(RESULTS_PAGE).unwrap();
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].title, "AI in Health");
    assert_eq!(results[0].url, "https://example.com/ai-health");
    assert_eq!(results[0].abstract_text, "Machine learning is transforming healthcare.");
    assert_eq!(results[0].source, "web");
    assert_eq!(results[0].published_date, "");
    assert!(results[0].authors.is_empty());

    assert_eq!(results[1].url, "https://direct.example.org/page");
    assert_eq!(results[1].abstract_text, "No abstract available");
}

#[test]
fn test_extract_ddg_url() {
    assert_eq!(
        extract_ddg_url("//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.com%2Fb%3Fc%3D1&rut=x"),
        "https://a.com/b?c=1"
    );
    assert_eq!(extract_ddg_url("https://plain.example"), "https://plain.example");
    assert_eq!(extract_ddg_url("//example.net/x"), "https://example.net/x");
}

#[test]
fn test_extract_vqd() {
    let page = r#"<script>DDG.deep.initialize('/d.js?q=ai&vqd=4-1234567890123&kl=wt-wt');</script>"#;
    assert_eq!(extract_vqd(page).as_deref(), Some("4-1234567890123"));

    let quoted = r#"vqd="4-98765""#;
    assert_eq!(extract_vqd(quoted).as_deref(), Some("4-98765"));

    assert_eq!(extract_vqd("<html>nothing</html>"), None);
}

#[test]
fn test_parse_news() {
    let data = json!({
        "results": [
            {
                "date": 1_704_067_200,
                "title": "Hospitals adopt <b>AI</b> triage",
                "excerpt": "A new   study shows...",
                "url": "https://news.example.com/ai-triage",
                "source": "Example News"
            },
            {"date": 1_704_067_200, "title": "", "url": "https://news.example.com/empty"},
            {"title": "No Source", "url": "https://news.example.com/x"}
        ]
    });

    let results = parse_news(&data);
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].title, "Hospitals adopt AI triage");
    assert_eq!(results[0].abstract_text, "A new study shows...");
    assert_eq!(results[0].published_date, "2024-01-01");
    assert_eq!(results[0].authors, vec!["Example News"]);
    assert_eq!(results[0].source, "news");

    assert_eq!(results[1].authors, vec!["Unknown"]);
    assert_eq!(results[1].published_date, "");
}
