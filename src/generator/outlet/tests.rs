use super::*;
use crate::types::{ResearchQuery, ResearchReport, ResearchResult};
use tempfile::TempDir;

fn result(source: &str, title: &str) -> ResearchResult {
    ResearchResult::new(title, source)
        .with_abstract("This is an abstract.")
        .with_url("https://example.com/paper")
        .with_published_date("2024-01-15")
        .with_authors(vec!["Alice".to_string(), "Bob".to_string()])
}

fn report(results: Vec<ResearchResult>, insights: Vec<&str>) -> ResearchReport {
    ResearchReport::new(
        ResearchQuery::from_topic("test topic").unwrap(),
        "Executive summary text.".to_string(),
        insights.into_iter().map(String::from).collect(),
        results,
    )
}

fn default_report() -> ResearchReport {
    report(
        vec![result("arxiv", "Test Paper"), result("web", "Web Article")],
        vec!["Insight one", "Insight two"],
    )
}

fn render(report: &ResearchReport) -> String {
    MarkdownRenderer::new("test-model").render(report)
}

#[test]
fn test_render_contains_topic_summary_and_insights() {
    let md = render(&default_report());

    assert!(md.starts_with("# Research Report: test topic"));
    assert!(md.contains("Executive summary text."));
    assert!(md.contains("1. Insight one"));
    assert!(md.contains("2. Insight two"));
    assert!(md.contains("## Research Results (2 found)"));
}

#[test]
fn test_render_groups_by_source_in_order() {
    let results = vec![result("web", "W1"), result("arxiv", "A1"), result("web", "W2")];
    let md = render(&report(results, vec!["x"]));

    let web = md.find("### Web Articles (2)").unwrap();
    let arxiv = md.find("### arXiv Papers (1)").unwrap();
    assert!(web < arxiv);
}

#[test]
fn test_render_result_metadata() {
    let md = render(&default_report());

    assert!(md.contains("**Authors**: Alice, Bob"));
    assert!(md.contains("**Published**: 2024-01-15"));
    assert!(md.contains("**Source**: arxiv"));
    assert!(md.contains("**URL**: https://example.com/paper"));
    assert!(md.contains("This is an abstract."));
}

#[test]
fn test_render_skips_empty_sections_and_lines() {
    let md = render(&report(Vec::new(), Vec::new()));
    assert!(!md.contains("found)"));
    assert!(!md.contains("Key Insights"));

    let bare = result("arxiv", "Bare")
        .with_published_date("")
        .with_url("");
    let md = render(&report(vec![bare], vec!["x"]));
    assert!(!md.contains("**Published**:"));
    assert!(!md.contains("**URL**:"));
}

#[test]
fn test_render_truncates_many_authors() {
    let many = result("arxiv", "Crowded").with_authors(
        ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    let md = render(&report(vec![many], vec!["x"]));

    assert!(md.contains("**Authors**: A, B, C, D, E et al."));
}

#[test]
fn test_render_search_query_and_dates() {
    let query = ResearchQuery::new(
        "test topic",
        Some("2024-01-01".to_string()),
        None,
        10,
    )
    .unwrap()
    .with_search_query("test topic survey -jobs");
    let report = ResearchReport::new(query, "S".to_string(), Vec::new(), Vec::new());

    let md = render(&report);

    assert!(md.contains("**Search Query**: test topic survey -jobs"));
    assert!(md.contains("**Date Range**: 2024-01-01 to present"));
}

#[test]
fn test_render_footer_names_model() {
    let md = render(&default_report());
    assert!(md.trim_end().ends_with("*Report generated by deep-research using test-model*"));
}

#[test]
fn test_source_labels() {
    assert_eq!(renderer::source_label("hackernews"), "Hacker News Discussions");
    assert_eq!(renderer::source_label("semantic_scholar"), "Semantic Scholar Papers");
    assert_eq!(renderer::source_label("custom_src"), "Custom_Src");
    assert_eq!(renderer::source_label("my-feed"), "My-Feed");
}

#[tokio::test]
async fn test_save_with_custom_filename() {
    let temp_dir = TempDir::new().unwrap();
    let outlet = DiskOutlet::new(temp_dir.path());

    let path = outlet.save("# Test", Some(Path::new("custom.md"))).await.unwrap();

    assert_eq!(path, temp_dir.path().join("custom.md"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Test");
}

#[tokio::test]
async fn test_save_with_generated_filename() {
    let temp_dir = TempDir::new().unwrap();
    let outlet = DiskOutlet::new(temp_dir.path());

    let path = outlet.save("# Auto", None).await.unwrap();

    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("research_report_"));
    assert!(name.ends_with(".md"));
    assert!(path.exists());
}

#[tokio::test]
async fn test_save_creates_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("sub").join("dir");
    let outlet = DiskOutlet::new(&nested);

    let path = outlet.save("# Nested", Some(Path::new("test.md"))).await.unwrap();

    assert!(path.exists());
    assert!(nested.is_dir());
}

#[test]
fn test_render_section_layout() {
    let md = render(&default_report());

    assert!(md.contains("\n---\n\n## Executive Summary\n\nExecutive summary text.\n\n## Key Insights\n\n1. Insight one\n2. Insight two\n\n## Research Results (2 found)\n\n### arXiv Papers (1)\n\n#### 1. Test Paper\n\n- **Authors**: Alice, Bob\n"));
}
