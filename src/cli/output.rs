//! Plain-text and JSON renderings of query results

use std::io::Write;

use serde::Serialize;

use crate::types::{DailyRecord, TickerSummary};

#[derive(Serialize)]
struct SeriesResponse<'a> {
    ticker: &'a str,
    data: &'a [DailyRecord],
}

#[derive(Serialize)]
struct StocksResponse<'a> {
    stocks: &'a [TickerSummary],
}

pub fn write_tickers(out: &mut impl Write, tickers: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, tickers)?;
        writeln!(out)?;
    } else if tickers.is_empty() {
        writeln!(out, "No tickers found")?;
    } else {
        for ticker in tickers {
            writeln!(out, "{}", ticker)?;
        }
    }
    Ok(())
}

pub fn write_series(
    out: &mut impl Write,
    ticker: &str,
    series: &[DailyRecord],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, &SeriesResponse { ticker, data: series })?;
        writeln!(out)?;
        return Ok(());
    }

    if series.is_empty() {
        writeln!(out, "No data for {}", ticker)?;
        return Ok(());
    }

    write_record_header(out)?;
    for record in series {
        write_record_row(out, record)?;
    }
    Ok(())
}

pub fn write_summary(
    out: &mut impl Write,
    summary: &TickerSummary,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", summary.ticker)?;
    writeln!(out, "  Trading days:        {}", summary.total_days)?;
    writeln!(
        out,
        "  Smart anomalies:     {} ({:.1}%)",
        summary.anomaly_count, summary.anomaly_rate
    )?;
    writeln!(out, "  High-volume:         {}", summary.high_volume_anomalies)?;
    writeln!(out, "  Avg volatility (5d): {:.2}%", summary.avg_volatility)?;
    writeln!(out, "  Max daily move:      {:.2}%", summary.max_return)?;

    if !summary.recent_anomalies.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recent anomalies")?;
        write_record_header(out)?;
        for record in &summary.recent_anomalies {
            write_record_row(out, record)?;
        }
    }
    Ok(())
}

pub fn write_summaries(
    out: &mut impl Write,
    summaries: &[TickerSummary],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, &StocksResponse { stocks: summaries })?;
        writeln!(out)?;
        return Ok(());
    }

    if summaries.is_empty() {
        writeln!(out, "No tickers found")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<8} {:>6} {:>9} {:>7} {:>9} {:>9} {:>8}",
        "TICKER", "DAYS", "ANOMALIES", "RATE%", "AVG VOL%", "MAX MOVE", "HIGH VOL"
    )?;
    for s in summaries {
        writeln!(
            out,
            "{:<8} {:>6} {:>9} {:>7.1} {:>9.2} {:>9.2} {:>8}",
            s.ticker,
            s.total_days,
            s.anomaly_count,
            s.anomaly_rate,
            s.avg_volatility,
            s.max_return,
            s.high_volume_anomalies
        )?;
    }
    Ok(())
}

fn write_record_header(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<10} {:>10} {:>8} {:>12} {:>9} {:>8} {:>7} {:>6}",
        "DATE", "CLOSE", "RETURN%", "VOLUME", "VOL RATIO", "VOLAT5D", "ANOMALY", "SCORE"
    )
}

fn write_record_row(out: &mut impl Write, r: &DailyRecord) -> std::io::Result<()> {
    let score = r
        .anomaly_score
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        out,
        "{:<10} {:>10.2} {:>8.2} {:>12} {:>9.2} {:>8.2} {:>7} {:>6}",
        r.date,
        r.close,
        r.daily_return,
        r.volume,
        r.volume_ratio_20d,
        r.volatility_5d,
        if r.is_smart_anomaly { "*" } else { "" },
        score
    )
}
