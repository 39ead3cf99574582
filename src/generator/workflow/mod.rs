use crate::generator::context::GeneratorContext;
use crate::generator::outlet::{DiskOutlet, MarkdownRenderer, Outlet};
use crate::generator::planning::{QueryRewriter, SourceSelector};
use crate::generator::synthesis::{Analyzer, FilterStats, RelevanceFilter};
use crate::sources::SearchRequest;
use crate::types::{ResearchQuery, ResearchReport, ResearchResult};

use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<String, Instant>,
    /// 按结束顺序记录
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations
            .push((phase_name.to_string(), duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 获取所有阶段的执行时间
    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const SOURCE_SELECTION: &'static str = "source_selection";
    pub const QUERY_REWRITE: &'static str = "query_rewrite";
    pub const COLLECTION: &'static str = "collection";
    pub const RELEVANCE_FILTER: &'static str = "relevance_filter";
    pub const ANALYSIS: &'static str = "analysis";
    pub const OUTPUT: &'static str = "output";
}

/// 流程的终止条件，调用方据此区分“没有结果”与其它错误
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("No results found. Try a different topic or date range.")]
    NoResults,
    #[error(
        "No relevant results remained after filtering ({filtered_out} filtered out). Try a broader topic or run with --no-filter."
    )]
    NoRelevantResults { filtered_out: usize },
}

/// 单次运行的附加选项
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// 排除的数据源
    pub excluded_sources: Vec<String>,
    /// 报告输出路径，为空时使用默认文件名
    pub output: Option<PathBuf>,
}

/// 一次调研的产出
#[derive(Debug)]
pub struct ResearchOutcome {
    pub report: ResearchReport,
    pub markdown: String,
    pub path: PathBuf,
    /// 实际检索过的数据源
    pub sources: Vec<String>,
    /// 未启用过滤时为空
    pub filter_stats: Option<FilterStats>,
}

/// 启用的数据源去掉被排除的，保持配置中的顺序
pub fn active_sources(enabled: &[String], excluded: &[String]) -> Vec<String> {
    enabled
        .iter()
        .filter(|tag| !excluded.contains(tag))
        .cloned()
        .collect()
}

/// 启动调研工作流
pub async fn launch(
    context: &GeneratorContext,
    query: ResearchQuery,
    options: &RunOptions,
) -> Result<ResearchOutcome> {
    let config = &context.config;
    let llm = context.llm.as_ref();
    let mut timing = TimingScope::new();

    println!("\n🔬 调研主题: {}", query.topic());
    println!("   每个数据源最多 {} 条结果", query.max_results());
    if let Some(date_from) = query.date_from() {
        println!("   起始日期: {}", date_from);
    }
    if let Some(date_to) = query.date_to() {
        println!("   截止日期: {}", date_to);
    }

    // 只保留已注册的数据源
    let mut candidates = Vec::new();
    for tag in active_sources(&config.enabled_sources, &options.excluded_sources) {
        if context.registry.contains(&tag) {
            candidates.push(tag);
        } else {
            eprintln!("⚠️ 未知的数据源: {}，已跳过", tag);
        }
    }

    let sources = if config.enable_source_selection && !candidates.is_empty() {
        timing.start_phase(TimingKeys::SOURCE_SELECTION);
        println!("\n🧭 正在由模型选择数据源...");
        let selection = SourceSelector::new(llm, config.min_selected_sources)
            .select(query.topic(), &candidates)
            .await;
        tracing::debug!(outcome = ?selection.outcome, reasoning = ?selection.reasoning, "source selection");
        for (source, reason) in &selection.reasoning {
            println!("   - {}: {}", source, reason);
        }
        timing.end_phase(TimingKeys::SOURCE_SELECTION);
        selection.selected
    } else {
        candidates
    };
    println!("📚 使用数据源: {}", sources.join(", "));

    let query = if config.enable_query_rewrite {
        timing.start_phase(TimingKeys::QUERY_REWRITE);
        println!("\n✏️ 正在改写检索语句...");
        let rewrite = QueryRewriter::new(llm).rewrite(query.topic()).await;
        println!("   检索语句: {}", rewrite.query);
        if let Some(reasoning) = &rewrite.reasoning {
            println!("   改写理由: {}", reasoning);
        }
        timing.end_phase(TimingKeys::QUERY_REWRITE);
        query.with_search_query(rewrite.query)
    } else {
        query
    };

    timing.start_phase(TimingKeys::COLLECTION);
    let results = collect_results(context, &query, &sources).await;
    timing.end_phase(TimingKeys::COLLECTION);
    println!("📊 共检索到 {} 条结果", results.len());

    if results.is_empty() {
        return Err(WorkflowError::NoResults.into());
    }

    let (results, filter_stats) = if config.enable_relevance_filter {
        timing.start_phase(TimingKeys::RELEVANCE_FILTER);
        println!("\n🔎 正在判定结果相关性...");
        let (kept, stats) = RelevanceFilter::new(llm, config.filter_batch_size)
            .filter(query.topic(), results)
            .await;
        println!(
            "   保留 {} 条，过滤 {} 条（共 {} 条）",
            stats.relevant, stats.filtered_out, stats.total
        );
        timing.end_phase(TimingKeys::RELEVANCE_FILTER);

        if kept.is_empty() {
            return Err(WorkflowError::NoRelevantResults {
                filtered_out: stats.filtered_out,
            }
            .into());
        }
        (kept, Some(stats))
    } else {
        (results, None)
    };

    timing.start_phase(TimingKeys::ANALYSIS);
    println!("\n🧠 正在使用 {} 分析调研结果...", llm.model_name());
    let analysis = Analyzer::new(llm).analyze(&query, &results).await?;
    println!("   生成了 {} 条洞察", analysis.insights.len());
    timing.end_phase(TimingKeys::ANALYSIS);

    timing.start_phase(TimingKeys::OUTPUT);
    let report = ResearchReport::new(query, analysis.summary, analysis.insights, results);
    let markdown = MarkdownRenderer::new(llm.model_name()).render(&report);
    let path = DiskOutlet::new(&config.output_dir)
        .save(&markdown, options.output.as_deref())
        .await?;
    timing.end_phase(TimingKeys::OUTPUT);

    println!("\n✅ 调研完成!");
    println!("   - 分析结果: {} 条", report.results.len());
    println!("   - 关键洞察: {} 条", report.insights.len());
    println!("   - 报告位置: {}", path.display());

    if config.verbose {
        println!("\n⏱️ {}", timing.generate_timing_report());
    }

    Ok(ResearchOutcome {
        report,
        markdown,
        path,
        sources,
        filter_stats,
    })
}

/// 逐个检索数据源，单个数据源失败不影响其它数据源
async fn collect_results(
    context: &GeneratorContext,
    query: &ResearchQuery,
    sources: &[String],
) -> Vec<ResearchResult> {
    let request = SearchRequest::from_query(query);
    let has_dates = request.date_from.is_some() || request.date_to.is_some();
    let mut results = Vec::new();

    println!("\n📡 正在检索 {} 个数据源...", sources.len());
    for tag in sources {
        let Some(source) = context.registry.get(tag) else {
            tracing::warn!(source = %tag, "source not registered, skipping");
            continue;
        };
        if has_dates && !source.supports_date_filter() {
            tracing::debug!(source = %tag, "source ignores the date range");
        }

        match source.search(&request).await {
            Ok(found) => {
                println!("   ✅ {}: {} 条结果", tag, found.len());
                results.extend(found);
            }
            Err(e) => {
                eprintln!("⚠️ 数据源 {} 检索失败: {}", tag, e);
                tracing::warn!(source = %tag, error = %e, "source search failed");
            }
        }
    }

    results
}
