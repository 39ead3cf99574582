use chrono::{DateTime, Local};

use super::{ResearchQuery, ResearchResult};

/// 最终的调研报告，只在流程末尾构建一次
#[derive(Debug, Clone)]
pub struct ResearchReport {
    pub query: ResearchQuery,
    pub summary: String,
    pub insights: Vec<String>,
    pub results: Vec<ResearchResult>,
    pub generated_at: DateTime<Local>,
}

impl ResearchReport {
    pub fn new(
        query: ResearchQuery,
        summary: String,
        insights: Vec<String>,
        results: Vec<ResearchResult>,
    ) -> Self {
        Self {
            query,
            summary,
            insights,
            results,
            generated_at: Local::now(),
        }
    }
}
