//! 作成者統計分析の中核となるモジュール
//!
//! このモジュールは、Gitリポジトリの作成者統計に必要な主要なコンポーネントを提供します。
//! 分析プロセスは以下の流れで行われます：
//!
//! 1. リポジトリパスの検証
//! 2. `git log --shortstat`によるコミットログの取得
//! 3. ログ行の解析と作成者ごとの集計
//! 4. コミット数順に並べた結果の生成
//!
//! # 主要なコンポーネント
//!
//! - `AuthorshipAnalyzer`: 分析プロセス全体を制御する構造体
//! - `Aggregator`: ログ行を1行ずつ受け取って集計する構造体
//! - `RepositorySummary`: 分析結果を保持する構造体

mod error;
pub mod git;
mod metrics;
pub mod stats;

pub use error::AnalyzerError;
pub use git::{GitCli, LogOutput, LogSource, SEPARATOR};
pub use metrics::{commit_percentage, AuthorMetrics, RepositorySummary, Totals};

use indexmap::IndexMap;
use stats::{CommitHeader, HeaderLine, ShortStatParser};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 作成者統計の分析を実行するメインの構造体
///
/// # フィールド
///
/// - `repo`: 検証済みのリポジトリの絶対パス
/// - `source`: コミットログの取得元
pub struct AuthorshipAnalyzer<S = GitCli> {
    repo: PathBuf,
    source: S,
}

impl AuthorshipAnalyzer<GitCli> {
    /// 指定されたパスを検証し、`git`コマンドを使用するアナライザーを作成します
    ///
    /// # エラー
    ///
    /// 以下の場合にエラーを返します：
    /// - パスが存在しない
    /// - パスが有効なGitリポジトリでない
    /// - `git`を起動できない
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let git = GitCli::new();
        let repo = git::validate_repository(path, &git)?;
        info!(repo = %repo.display(), "validated git repository");

        Ok(Self { repo, source: git })
    }
}

impl<S: LogSource> AuthorshipAnalyzer<S> {
    /// 検証を行わずに、任意のログ取得元を使用するアナライザーを作成します
    pub fn with_source(repo: impl Into<PathBuf>, source: S) -> Self {
        Self {
            repo: repo.into(),
            source,
        }
    }

    pub fn repository(&self) -> &Path {
        &self.repo
    }

    /// コミットログを取得して集計し、結果を返します
    ///
    /// # エラー
    ///
    /// ログ取得プロセスを起動できなかった場合にエラーを返します。
    /// 解析できない行はエラーにならず、単に無視されます。
    pub fn analyze(&self) -> Result<RepositorySummary, AnalyzerError> {
        info!("running git log");
        let output = self.source.run_log(&self.repo)?;
        log_exit_status(&output);
        let lines = git::decode_log(&output.stdout);

        info!(lines = lines.len(), "processing commits");
        let mut aggregator = Aggregator::new()?;
        for line in &lines {
            aggregator.feed(line);
        }
        debug!(
            commits = aggregator.totals().commits,
            authors = aggregator.author_count(),
            "aggregation finished"
        );

        Ok(aggregator.finish(self.repo.clone()))
    }
}

/// 終了コードが0以外の場合に記録します。取得できた分の出力はそのまま解析されます
fn log_exit_status(output: &LogOutput) -> bool {
    if output.success() {
        return false;
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if output.is_empty_history() {
        debug!(status = ?output.status, stderr = %stderr.trim(), "repository has no commits");
    } else {
        warn!(
            status = ?output.status,
            stderr = %stderr.trim(),
            "git log exited with a non-zero status"
        );
    }
    true
}

/// 作成者ごとの統計情報を収集する内部構造体
///
/// # フィールド
///
/// - `name`: 最後に観測された表示名
/// - `timestamps`: コミットのタイムスタンプ（ログの出現順）
/// - `files_changed`/`insertions`/`deletions`: 累積の変更量
#[derive(Debug, Default)]
struct AuthorStats {
    name: String,
    timestamps: Vec<i64>,
    files_changed: u64,
    insertions: u64,
    deletions: u64,
}

impl AuthorStats {
    fn commits(&self) -> u64 {
        self.timestamps.len() as u64
    }

    fn into_metrics(self, email: String, rank: usize, total_commits: u64) -> AuthorMetrics {
        let commits = self.commits();

        AuthorMetrics {
            rank,
            name: self.name,
            email,
            commits,
            percentage: commit_percentage(commits, total_commits),
            files_changed: self.files_changed,
            insertions: self.insertions,
            deletions: self.deletions,
            first_commit: self.timestamps.iter().copied().min(),
            last_commit: self.timestamps.iter().copied().max(),
        }
    }
}

/// ログ行を順に受け取り、作成者ごと・全体の統計を集計する構造体
///
/// shortstat行は直前のコミットヘッダーの作成者に加算されます。
/// 作成者はメールアドレスで識別され、最初に出現した順序が保持されます。
pub struct Aggregator {
    parser: ShortStatParser,
    authors: IndexMap<String, AuthorStats>,
    totals: Totals,
    current_author: Option<String>,
}

impl Aggregator {
    pub fn new() -> Result<Self, AnalyzerError> {
        Ok(Self {
            parser: ShortStatParser::new()?,
            authors: IndexMap::new(),
            totals: Totals::default(),
            current_author: None,
        })
    }

    /// 1行を解析し、集計に反映します
    pub fn feed(&mut self, line: &str) {
        match HeaderLine::parse(line) {
            HeaderLine::Header(header) => self.record_commit(header),
            HeaderLine::Malformed => {
                warn!(line, "skipping malformed commit header");
                self.current_author = None;
            }
            HeaderLine::NotAHeader => self.record_changes(line),
        }
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    fn record_commit(&mut self, header: CommitHeader<'_>) {
        let timestamp = header.timestamp;
        self.totals.commits += 1;
        self.totals.oldest = Some(self.totals.oldest.map_or(timestamp, |t| t.min(timestamp)));
        self.totals.newest = Some(self.totals.newest.map_or(timestamp, |t| t.max(timestamp)));

        let author = self.authors.entry(header.email.to_string()).or_default();
        author.name = header.name.to_string();
        author.timestamps.push(timestamp);

        self.current_author = Some(header.email.to_string());
    }

    fn record_changes(&mut self, line: &str) {
        // 最初のヘッダーより前の行は無視する
        let Some(email) = self.current_author.as_deref() else {
            return;
        };

        let stat = self.parser.parse(line);
        if stat.is_empty() {
            return;
        }

        let files_changed = stat.files_changed.unwrap_or(0);
        let insertions = stat.insertions.unwrap_or(0);
        let deletions = stat.deletions.unwrap_or(0);

        self.totals.files_changed += files_changed;
        self.totals.insertions += insertions;
        self.totals.deletions += deletions;

        if let Some(author) = self.authors.get_mut(email) {
            author.files_changed += files_changed;
            author.insertions += insertions;
            author.deletions += deletions;
        }
    }

    /// 集計を終了し、コミット数の降順に並べた結果を返します
    ///
    /// コミット数が同じ作成者は、ログに最初に出現した順に並びます。
    pub fn finish(self, repository: PathBuf) -> RepositorySummary {
        let total_commits = self.totals.commits;

        let mut authors: Vec<(String, AuthorStats)> = self.authors.into_iter().collect();
        authors.sort_by(|a, b| b.1.commits().cmp(&a.1.commits()));

        let authors = authors
            .into_iter()
            .enumerate()
            .map(|(i, (email, stats))| stats.into_metrics(email, i + 1, total_commits))
            .collect();

        RepositorySummary {
            repository,
            totals: self.totals,
            authors,
        }
    }
}
