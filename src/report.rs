//! 分析結果の出力を担当するモジュール
//!
//! テキスト形式のレポートに加え、JSONおよびCSV形式での出力を提供します。

use crate::analyzer::RepositorySummary;
use chrono::DateTime;
use std::io::{self, Write};

/// Unixタイムスタンプを`YYYY-MM-DD HH:MM:SS (UTC)`形式に変換します
pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S (UTC)").to_string(),
        None => format!("{} (out of range)", timestamp),
    }
}

/// 人が読むためのレポートを書き出します
///
/// コミットが1件もない場合は合計値のみを出力し、作成者一覧は省略します。
pub fn write_text<W: Write>(summary: &RepositorySummary, out: &mut W) -> io::Result<()> {
    let totals = &summary.totals;

    writeln!(out, "Git repo: {}", summary.repository.display())?;
    writeln!(out, "\n=== Results ===\n")?;
    writeln!(out, "Total commits: {}", totals.commits)?;
    writeln!(out, "Total files changed: {}", totals.files_changed)?;
    writeln!(out, "Total insertions: {}", totals.insertions)?;
    writeln!(out, "Total deletions: {}", totals.deletions)?;

    if totals.commits == 0 {
        writeln!(out, "\nNo commits found.")?;
        return Ok(());
    }

    if let (Some(oldest), Some(newest)) = (totals.oldest, totals.newest) {
        writeln!(
            out,
            "Oldest/latest timestamps: {} / {}",
            format_timestamp(oldest),
            format_timestamp(newest)
        )?;
    }

    let name_width = summary
        .authors
        .iter()
        .map(|a| a.name.chars().count())
        .max()
        .unwrap_or(0)
        + 2;

    writeln!(out, "\nAuthors:")?;
    for author in &summary.authors {
        writeln!(
            out,
            "{:>3}. {:<width$} {} commits ({:.1}%), {} files, +{}/-{} changes",
            author.rank,
            author.name,
            author.commits,
            author.percentage,
            author.files_changed,
            author.insertions,
            author.deletions,
            width = name_width
        )?;
        writeln!(out, "     {}", author.email)?;
        if let (Some(first), Some(last)) = (author.first_commit, author.last_commit) {
            writeln!(
                out,
                "     first/last commit: {} / {}",
                format_timestamp(first),
                format_timestamp(last)
            )?;
        }
    }

    Ok(())
}

pub fn write_json<W: Write>(summary: &RepositorySummary, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}

/// 作成者ごとに1レコードのCSVを書き出します
pub fn write_csv<W: Write>(summary: &RepositorySummary, out: W) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for author in &summary.authors {
        wtr.serialize(author)?;
    }
    wtr.flush()
}
