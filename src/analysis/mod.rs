pub mod balance;
pub mod compare;
pub mod ranking;
pub mod visualize;

pub use balance::{
    balance_score, build_balance_report, classify_ability, classify_language, count_issues,
    render_analysis, suggested_power, BalanceReport, BalanceStatus, BalanceVerdict, IssueCounts,
    DEFAULT_BALANCE_REPORT_PATH,
};
pub use compare::{compare_reports, render_comparison, AbilityChange, Comparison, LanguageChange};
pub use ranking::{rank_abilities, rank_languages};
pub use visualize::{bar, render_visualization};

/// `0.523` renders as `52.3%`.
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn signed_percent(change: f64) -> String {
    format!("{:+.1}%", change * 100.0)
}
