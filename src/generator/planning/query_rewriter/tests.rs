use super::*;
use crate::llm::mock::ScriptedModel;

#[tokio::test]
async fn test_rewrite_success() {
    let model = ScriptedModel::replying(
        r#"{"query": "machine learning healthcare clinical diagnosis -veterinary", "reasoning": "Added clinical terms"}"#,
    );

    let rewrite = QueryRewriter::new(&model)
        .rewrite("machine learning for healthcare")
        .await;

    assert_eq!(
        rewrite.query,
        "machine learning healthcare clinical diagnosis -veterinary"
    );
    assert_eq!(rewrite.reasoning.as_deref(), Some("Added clinical terms"));

    let options = model.last_options().unwrap();
    assert_eq!(options.max_tokens, 300);
    assert_eq!(options.temperature, Some(0.3));
    assert!(model.prompts()[0].contains("Original topic: machine learning for healthcare"));
}

#[tokio::test]
async fn test_rewrite_in_code_fence() {
    let model = ScriptedModel::replying("```json\n{\"query\": \"rust async runtime\"}\n```");

    let rewrite = QueryRewriter::new(&model).rewrite("tokio").await;

    assert_eq!(rewrite.query, "rust async runtime");
    assert_eq!(rewrite.reasoning, None);
}

#[tokio::test]
async fn test_missing_query_field_keeps_topic() {
    let model = ScriptedModel::replying(r#"{"reasoning": "nothing to change"}"#);

    let rewrite = QueryRewriter::new(&model).rewrite("quantum sensing").await;

    assert_eq!(rewrite.query, "quantum sensing");
}

#[tokio::test]
async fn test_unparseable_reply_keeps_topic() {
    let model = ScriptedModel::replying("quantum sensing devices");

    let rewrite = QueryRewriter::new(&model).rewrite("quantum sensing").await;

    assert_eq!(rewrite.query, "quantum sensing");
}

#[tokio::test]
async fn test_call_failure_keeps_topic() {
    let model = ScriptedModel::failing("timeout");

    let rewrite = QueryRewriter::new(&model).rewrite("quantum sensing").await;

    assert_eq!(rewrite.query, "quantum sensing");
    assert_eq!(rewrite.reasoning, None);
}

#[test]
fn test_structured_reasoning_keeps_query() {
    let rewrite = interpret_reply(
        r#"{"query": "ml healthcare -jobs", "reasoning": {"added": ["healthcare"]}}"#,
        "ml",
    );

    assert_eq!(rewrite.query, "ml healthcare -jobs");
    assert_eq!(
        rewrite.reasoning.as_deref(),
        Some(r#"{"added":["healthcare"]}"#)
    );
}

#[test]
fn test_non_string_or_blank_query_keeps_topic() {
    assert_eq!(interpret_reply(r#"{"query": 42}"#, "ml").query, "ml");
    assert_eq!(interpret_reply(r#"{"query": "   "}"#, "ml").query, "ml");
    assert_eq!(interpret_reply(r#"{"query": null, "reasoning": null}"#, "ml").reasoning, None);
}
