pub mod query;
pub mod report;
pub mod result;

pub use query::ResearchQuery;
pub use report::ResearchReport;
pub use result::ResearchResult;
