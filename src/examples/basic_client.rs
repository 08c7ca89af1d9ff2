//! Basic Client Example
//!
//! Stores, reads, updates and deletes a record on a running NuDB server.
//!
//! Run with: cargo run -p nudb-rs --example basic_client

use nudb_rs::{Client, PutOptions, RecordOptions, RequestOptions, UpdateMethod, UpdateOptions};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("NuDB Client Example\n");

    let mut client = Client::new();
    client.connect("localhost", 5800, "test");

    let info = client.database_info("test", RequestOptions::default()).await?;
    println!("📊 Database: {}\n", info);

    // Store a JSON record
    let stored = client
        .put_record(json!({"title": "hello", "tags": ["demo"]}), "json", PutOptions::default())
        .await?;
    println!("📝 Stored: {}", stored);

    // Store two text records in one call, split on the record delimiter
    let text = "@GAIS_Rec:\n@title:first\n@GAIS_Rec:\n@title:second\n";
    let stored_text = client
        .put_record(text, "text", PutOptions::default().rec_beg("@GAIS_Rec:"))
        .await?;
    println!("📝 Stored text: {}\n", stored_text);

    let rid = stored["result"]["rid"]
        .as_str()
        .or_else(|| stored["rid"].as_str())
        .unwrap_or("1")
        .to_string();

    let record = client.get_record(&rid, RecordOptions::default()).await?;
    println!("🔍 Record {}: {}", rid, record);

    client
        .update_record(
            &rid,
            json!({"title": "hello again"}),
            "json",
            UpdateOptions::default().update_method(UpdateMethod::ReplaceField),
        )
        .await?;
    println!("✏️  Updated {}", rid);

    let found = client
        .search(json!({"q": "hello", "out": "json"}), RequestOptions::default())
        .await?;
    println!("🔍 Search: {:?}\n", found);

    client.delete_record(&rid, RecordOptions::default()).await?;
    println!("🗑️  Deleted {}", rid);

    Ok(())
}
