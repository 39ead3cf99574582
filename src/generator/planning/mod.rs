//! 检索前的规划阶段：选择数据源、改写检索语句

pub mod query_rewriter;
pub mod source_selector;

pub use query_rewriter::{QueryRewriter, Rewrite};
pub use source_selector::{SelectionOutcome, SourceSelection, SourceSelector};
