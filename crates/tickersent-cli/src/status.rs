//! Read-only status report over the stored headlines.

/// Show the per-symbol summary and the most recent headlines.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub(crate) async fn run_status(
    pool: &sqlx::PgPool,
    symbol_filter: Option<&str>,
) -> anyhow::Result<()> {
    let summary = tickersent_db::sentiment_summary(pool).await?;

    if summary.is_empty() {
        println!("no headlines stored yet; run `tickersent sweep` first");
        return Ok(());
    }

    println!(
        "{:<10}{:>10}{:>10}{:>10}{:>10}{:>10}  LAST STORED",
        "SYMBOL", "TOTAL", "POS", "NEU", "NEG", "AVG"
    );
    for row in &summary {
        let avg = row
            .avg_score
            .map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));
        let last = row
            .last_stored_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
        println!(
            "{:<10}{:>10}{:>10}{:>10}{:>10}{:>10}  {}",
            row.symbol,
            row.headline_count,
            row.positive_count,
            row.neutral_count,
            row.negative_count,
            avg,
            last
        );
    }

    let headlines = match symbol_filter {
        Some(symbol) => tickersent_db::list_headlines_by_symbol(pool, symbol, 20).await?,
        None => {
            let mut rows = tickersent_db::list_headlines(pool).await?;
            rows.truncate(20);
            rows
        }
    };

    if headlines.is_empty() {
        println!(
            "\nno headlines{}; run `tickersent sweep` first",
            symbol_filter
                .map(|s| format!(" for symbol '{s}'"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!("\n{:<10}{:<18}{:<10}TEXT", "SYMBOL", "STORED", "LABEL");
    for row in &headlines {
        let stored = row.stored_at.format("%Y-%m-%d %H:%M").to_string();
        let label = row.sentiment_label.as_deref().unwrap_or("-");
        println!("{:<10}{:<18}{:<10}{}", row.symbol, stored, label, row.raw_text);
    }

    Ok(())
}
