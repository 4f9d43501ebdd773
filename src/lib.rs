//! Gitリポジトリの作成者統計ツール
//!
//! このクレートは、Gitリポジトリのコミット履歴を分析し、
//! 作成者ごとのコミット数・変更量・活動期間を集計するための機能を提供します。
//!
//! # 主な機能
//!
//! - リポジトリパスの検証
//! - `git log --shortstat`の出力の解析
//! - メールアドレス単位での作成者の集計
//! - テキスト・JSON・CSV形式でのレポート出力
//!
//! # 使用例
//!
//! ```no_run
//! use git_authorship::AuthorshipAnalyzer;
//!
//! let analyzer = AuthorshipAnalyzer::new("path/to/repo").unwrap();
//! let summary = analyzer.analyze().unwrap();
//!
//! git_authorship::report::write_text(&summary, &mut std::io::stdout()).unwrap();
//! ```

pub mod analyzer;
pub mod report;
pub use analyzer::{AnalyzerError, AuthorshipAnalyzer, RepositorySummary};
