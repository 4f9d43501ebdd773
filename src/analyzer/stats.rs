//! ログ行の解析を担当するモジュール
//!
//! コミットヘッダー行とshortstat行から数値フィールドを取り出します。

use super::error::AnalyzerError;
use super::git::SEPARATOR;
use regex::Regex;

/// コミットヘッダー行の内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub timestamp: i64,
}

/// ヘッダー行の解析結果
#[derive(Debug, PartialEq, Eq)]
pub enum HeaderLine<'a> {
    /// 区切りトークンを含まない行
    NotAHeader,
    /// 区切りトークンを含むが、フィールド数またはタイムスタンプが不正な行
    Malformed,
    Header(CommitHeader<'a>),
}

impl<'a> HeaderLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        if !line.contains(SEPARATOR) {
            return HeaderLine::NotAHeader;
        }

        let fields: Vec<&str> = line.split(SEPARATOR).collect();
        let &[name, email, timestamp] = fields.as_slice() else {
            return HeaderLine::Malformed;
        };

        match timestamp.trim().parse::<i64>() {
            Ok(timestamp) => HeaderLine::Header(CommitHeader {
                name,
                email,
                timestamp,
            }),
            Err(_) => HeaderLine::Malformed,
        }
    }
}

/// shortstat行から取り出した変更量
///
/// 各フィールドは行に含まれていない場合`None`になります。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortStat {
    pub files_changed: Option<u64>,
    pub insertions: Option<u64>,
    pub deletions: Option<u64>,
}

impl ShortStat {
    pub fn is_empty(&self) -> bool {
        self.files_changed.is_none() && self.insertions.is_none() && self.deletions.is_none()
    }
}

/// shortstat行の3つのフィールドを独立に抽出するパーサー
pub struct ShortStatParser {
    files_changed: Regex,
    insertions: Regex,
    deletions: Regex,
}

impl ShortStatParser {
    /// # エラー
    ///
    /// 正規表現のコンパイルに失敗した場合に`InvalidPattern`を返します
    pub fn new() -> Result<Self, AnalyzerError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| AnalyzerError::InvalidPattern(e.to_string()))
        };

        Ok(Self {
            files_changed: compile(r"(\d+)\s+files?\s+changed")?,
            insertions: compile(r"(\d+)\s+insertions?")?,
            deletions: compile(r"(\d+)\s+deletions?")?,
        })
    }

    pub fn parse(&self, line: &str) -> ShortStat {
        ShortStat {
            files_changed: capture_count(&self.files_changed, line),
            insertions: capture_count(&self.insertions, line),
            deletions: capture_count(&self.deletions, line),
        }
    }
}

fn capture_count(regex: &Regex, line: &str) -> Option<u64> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
