//! 检索之后的综合阶段：相关性过滤与研究分析

pub mod analyzer;
pub mod relevance_filter;

pub use analyzer::{Analysis, Analyzer};
pub use relevance_filter::{FilterStats, RelevanceFilter, Verdict};
