//! Basic usage example for the Amber storage API client
//!
//! This example demonstrates:
//! - Reading quota and usage
//! - Listing files with filters and sorting
//! - Moving a file to the trash and restoring it
//! - Building a download URL
//!
//! Run with: cargo run --example basic_usage
//! (set AMBER_ENDPOINT to point at a running server)

use amber_client::{AmberClient, Config, FilesOptions, Outcome, SortKey, SortOrder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🚀 Amber Storage - Basic Usage Example\n");

    let endpoint =
        std::env::var("AMBER_ENDPOINT").unwrap_or_else(|_| "http://localhost:5173".to_string());
    let client = AmberClient::new(Config::new(endpoint))?;

    // ==================== Storage Info ====================

    println!("📊 Fetching storage info...");
    match client.get_storage_info().await {
        Outcome::Data(info) => {
            println!("   Quota: {}", serde_json::to_string(&info.quota)?);
            for entry in &info.breakdown {
                println!("   - {}", serde_json::to_string(entry)?);
            }
        }
        Outcome::Error(err) => println!("   ⚠️  {}", err.message()),
    }

    // ==================== Files ====================

    println!("\n📋 Listing the 10 newest files...");
    let options = FilesOptions::new()
        .sort(SortKey::CreatedAt)
        .order(SortOrder::Desc)
        .limit(10);

    let first_id = match client.get_files(&options).await {
        Outcome::Data(page) => {
            println!("   {} of {} files", page.files.len(), page.total);
            for file in &page.files {
                println!(
                    "   - {} ({})",
                    file.get_str("filename").unwrap_or("?"),
                    file.id().unwrap_or("?")
                );
            }
            page.files.first().and_then(|f| f.id()).map(str::to_string)
        }
        Outcome::Error(err) => {
            println!("   ⚠️  {}", err.message());
            None
        }
    };

    if let Some(id) = first_id {
        println!("\n🗑️  Moving {} to the trash...", id);
        if let Some(message) = client.delete_file(&id).await.error_message() {
            println!("   ⚠️  {}", message);
        }

        println!("♻️  Restoring {}...", id);
        match client.restore_file(&id).await {
            Outcome::Data(ack) => println!("   ✅ {}", ack.message),
            Outcome::Error(err) => println!("   ⚠️  {}", err.message()),
        }
    }

    // ==================== Download ====================

    println!("\n🔗 Download URL for 'blog/2024/cover image.png':");
    println!("   {}", client.download_url("blog/2024/cover image.png"));

    println!("\n✨ Done!");
    Ok(())
}
