//! Exports and add-ons example
//!
//! This example demonstrates:
//! - Queueing a blog export and polling its status
//! - Fetching the export download link
//! - Listing storage add-ons and starting a purchase
//!
//! Run with: cargo run --example exports_and_addons

use amber_client::{AmberClient, Config, CreateExportRequest, ExportType, Outcome};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("📦 Amber Storage - Exports and Add-ons Example\n");

    let endpoint =
        std::env::var("AMBER_ENDPOINT").unwrap_or_else(|_| "http://localhost:5173".to_string());
    let client = AmberClient::new(Config::new(endpoint))?;

    // ==================== Exports ====================

    println!("📤 Queueing a blog export...");
    let export = match client
        .create_export(&CreateExportRequest::new(ExportType::Blog))
        .await
    {
        Outcome::Data(export) => export,
        Outcome::Error(err) => {
            println!("   ⚠️  {}", err.message());
            return Ok(());
        }
    };
    println!("   ✅ Export {} is {}", export.export_id, export.status);

    // Polling is the caller's business; the client never retries
    for attempt in 1..=5 {
        let status = client.get_export(&export.export_id).await.into_result()?;
        let state = status.get_str("status").unwrap_or("unknown").to_string();
        println!("   Attempt {}: {}", attempt, state);
        if state == "completed" {
            break;
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    }

    match client.get_export_download(&export.export_id).await {
        Outcome::Data(link) => {
            println!("   🔗 {} (expires {})", link.download_url, link.expires_at)
        }
        Outcome::Error(err) => println!("   ⚠️  {}", err.message()),
    }

    // ==================== Add-ons ====================

    println!("\n💾 Available add-ons:");
    let addons = client.get_addons().await.into_result()?;
    for addon in &addons.available {
        println!("   - {}: {} GB for {}", addon.addon_type, addon.gb, addon.price_display);
    }
    for addon in &addons.purchased {
        println!(
            "   ✔ {} ({} GB, active: {})",
            addon.addon_type, addon.gb_amount, addon.active
        );
    }

    if let Some(first) = addons.available.first() {
        println!("\n🛒 Purchasing {}...", first.addon_type);
        match client.purchase_addon(&first.addon_type).await {
            Outcome::Data(checkout) => println!("   ➡️  Continue at {}", checkout.redirect_url),
            Outcome::Error(err) => println!("   ⚠️  {}", err.message()),
        }
    }

    Ok(())
}
