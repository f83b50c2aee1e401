//! Application services (use cases).
//!
//! Each stage of the evaluation pipeline lives in its own module; the
//! [`pipeline`] module wires them into a run and [`scheduler`] repeats runs
//! on an interval.

pub mod extract;
pub mod filter;
pub mod history;
pub mod invoker;
pub mod judgment;
pub mod pipeline;
pub mod ranking;
pub mod rate_limit;
pub mod report;
pub mod research;
pub mod retry;
pub mod scheduler;
pub mod worthiness;

pub use filter::{FilterConfig, MarketFilter};
pub use invoker::{CallGuard, InvokerConfig};
pub use judgment::{JudgmentConfig, JudgmentInvoker, ParsedJudgment};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineSettings, RunOutcome};
pub use ranking::{RankOutcome, RankingConfig, RankingEngine};
pub use rate_limit::RateLimiter;
pub use report::ReportAssembler;
pub use research::ResearchInvoker;
pub use retry::RetryPolicy;
pub use scheduler::{ScheduleSummary, Scheduler};
pub use worthiness::{ScoredMarket, WorthinessConfig, WorthinessScorer};
