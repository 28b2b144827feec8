//! `--mode status`: render the per-domain status table.

use conveyor::{connect, status};
use sea_orm::DatabaseConnection;
use tabled::Tabled;

#[derive(Debug, Tabled)]
struct StatusRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Sync")]
    last_sync: String,
    #[tabled(rename = "Interval (min)")]
    interval: i32,
    #[tabled(rename = "Last Run")]
    last_count: i64,
    #[tabled(rename = "Total Synced")]
    total_count: i64,
    #[tabled(rename = "Last Error")]
    error: String,
}

pub(crate) async fn handle_status(
    target_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = connect(target_url).await?;
    print_status_table(&target).await
}

pub(crate) async fn print_status_table(
    target: &DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<StatusRow> = status::find_all(target)
        .await?
        .into_iter()
        .map(|model| StatusRow {
            domain: model.domain_name.clone(),
            status: model.status.to_string(),
            last_sync: model
                .last_sync_at
                .map(|at| at.format("%Y-%m-%d %H:%M:%S %z").to_string())
                .unwrap_or_else(|| "never".to_string()),
            interval: model.sync_interval_minutes,
            last_count: model.last_synced_count,
            total_count: model.total_synced_count,
            error: model.error_message.clone().unwrap_or_default(),
        })
        .collect();

    if rows.is_empty() {
        println!("No sync domains registered. Run migrations first.");
        return Ok(());
    }

    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{table}");

    Ok(())
}
