//! Gitリポジトリとの対話を担当するモジュール
//!
//! このモジュールは、`git`コマンドを外部プロセスとして起動し、
//! リポジトリの検証とコミットログの取得を行うための機能を提供します。

use super::error::AnalyzerError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// コミットヘッダー内の作成者名・メールアドレス・タイムスタンプを区切るトークン
pub const SEPARATOR: &str = ",|,";

/// ログ取得プロセスの生の出力
///
/// # フィールド
///
/// - `stdout`: 標準出力のバイト列
/// - `stderr`: 標準エラー出力のバイト列
/// - `status`: 終了コード（シグナルで終了した場合は`None`）
#[derive(Debug, Clone, Default)]
pub struct LogOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub status: Option<i32>,
}

impl LogOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// コミットが1件もないブランチに対する`git log`の失敗かどうかを判定します
    pub fn is_empty_history(&self) -> bool {
        !self.success()
            && self.stdout.is_empty()
            && String::from_utf8_lossy(&self.stderr).contains("does not have any commits yet")
    }
}

/// コミットログの取得元を抽象化するトレイト
///
/// 実行時は[`GitCli`]を使用し、テストでは固定のログ文字列を返す実装に差し替えます。
/// 実装は、各コミットについて`作成者名,|,メール,|,タイムスタンプ`のヘッダー行と、
/// その直後のshortstat行を出力する必要があります。
pub trait LogSource {
    fn run_log(&self, repo: &Path) -> Result<LogOutput, AnalyzerError>;
}

/// `git`コマンドを呼び出す[`LogSource`]の実装
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// `PATH`上の`git`の代わりに指定された実行ファイルを使用します
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `git status`を実行し、指定されたディレクトリが作業ツリーかどうかを判定します
    ///
    /// # エラー
    ///
    /// `git`プロセスを起動できなかった場合に`ExtractionFailed`を返します
    pub fn probe(&self, repo: &Path) -> Result<bool, AnalyzerError> {
        let status = self
            .command(repo)
            .args(["status", "--porcelain"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(AnalyzerError::ExtractionFailed)?;

        Ok(status.success())
    }

    /// ロケールを`C`に固定した`git`コマンドを組み立てます
    ///
    /// shortstat行は常に英語（`N files changed`）で出力される必要があります。
    fn command(&self, repo: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(repo)
            .env("LC_ALL", "C")
            .env_remove("LANGUAGE")
            .stdin(Stdio::null());
        cmd
    }
}

impl LogSource for GitCli {
    fn run_log(&self, repo: &Path) -> Result<LogOutput, AnalyzerError> {
        let output = self
            .command(repo)
            .arg("log")
            .arg(log_format())
            .args(["--shortstat", "--no-color"])
            .output()
            .map_err(AnalyzerError::ExtractionFailed)?;
        debug!(bytes = output.stdout.len(), "captured git log output");

        Ok(LogOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status.code(),
        })
    }
}

fn log_format() -> String {
    format!("--pretty=format:%an{SEPARATOR}%ae{SEPARATOR}%at")
}

/// 指定されたパスが有効なGitリポジトリであることを検証します
///
/// # 戻り値
///
/// 検証済みの絶対パスを返します
///
/// # エラー
///
/// 以下の場合にエラーを返します：
/// - パスが存在しない（`PathNotFound`）
/// - パスがディレクトリでない、または`git status`が失敗する（`NotARepository`）
/// - `git`を起動できない（`ExtractionFailed`）
pub fn validate_repository(
    path: impl AsRef<Path>,
    git: &GitCli,
) -> Result<PathBuf, AnalyzerError> {
    let path = std::path::absolute(path.as_ref())?;

    if !path.exists() {
        return Err(AnalyzerError::PathNotFound(path));
    }

    if !path.is_dir() || !git.probe(&path)? {
        return Err(AnalyzerError::NotARepository(path));
    }

    Ok(path)
}

/// ログ出力のバイト列を行単位の文字列に変換します
///
/// UTF-8として解釈できないバイトは`\xNN`形式にエスケープします。
/// フォーマット文字列のクォートに由来する`"`は取り除かれます。
pub fn decode_log(bytes: &[u8]) -> Vec<String> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => escape_invalid_utf8(bytes),
    };

    text.replace('"', "").lines().map(str::to_string).collect()
}

fn escape_invalid_utf8(bytes: &[u8]) -> String {
    let mut decoded = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        decoded.push_str(chunk.valid());
        for byte in chunk.invalid() {
            decoded.push_str(&format!("\\x{byte:02x}"));
        }
    }
    decoded
}
