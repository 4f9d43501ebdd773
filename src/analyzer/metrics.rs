//! 集計結果の表現を担当するモジュール
//!
//! このモジュールは、作成者ごとの統計とリポジトリ全体の合計を表現するための
//! データ構造と、分析結果のシリアライズに関する機能を提供します。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 作成者ごとの分析メトリクスを保持する構造体
///
/// # フィールド
///
/// - `rank`: コミット数による順位（1始まり）
/// - `name`: 最後に観測された表示名
/// - `email`: 作成者を識別するメールアドレス
/// - `commits`: コミット数
/// - `percentage`: 全コミットに占める割合（%）
/// - `files_changed`/`insertions`/`deletions`: 累積の変更量
/// - `first_commit`/`last_commit`: 最初と最後のコミットのUnixタイムスタンプ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorMetrics {
    pub rank: usize,
    pub name: String,
    pub email: String,
    pub commits: u64,
    #[serde(serialize_with = "round_to_1", deserialize_with = "deserialize_f64")]
    pub percentage: f64,
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub first_commit: Option<i64>,
    pub last_commit: Option<i64>,
}

/// リポジトリ全体の合計値
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub commits: u64,
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub oldest: Option<i64>,
    pub newest: Option<i64>,
}

/// 分析結果全体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub repository: PathBuf,
    pub totals: Totals,
    pub authors: Vec<AuthorMetrics>,
}

/// 全コミットに占める割合を計算します。コミットが0件の場合は0を返します
pub fn commit_percentage(commits: u64, total_commits: u64) -> f64 {
    if total_commits == 0 {
        return 0.0;
    }
    commits as f64 / total_commits as f64 * 100.0
}

/// 浮動小数点数を小数点以下1桁に丸める補助関数
fn round_to_1<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64((*value * 10.0).round() / 10.0)
}

fn deserialize_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f64::deserialize(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_percentage() {
        assert!((commit_percentage(1, 3) - 33.333).abs() < 0.001);
        assert_eq!(commit_percentage(4, 4), 100.0);
        assert_eq!(commit_percentage(0, 0), 0.0);
    }

    #[test]
    fn test_author_metrics_serialization() {
        let metrics = AuthorMetrics {
            rank: 1,
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            commits: 2,
            percentage: 66.6666,
            files_changed: 3,
            insertions: 10,
            deletions: 4,
            first_commit: Some(1_000_000_000),
            last_commit: Some(1_000_000_500),
        };

        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["email"], "alice@x.com");
        assert_eq!(json["commits"], 2);
        assert!((json["percentage"].as_f64().unwrap() - 66.7).abs() < 0.0001);
        assert_eq!(json["first_commit"], 1_000_000_000);
    }
}
