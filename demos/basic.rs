//! Basic example demonstrating the Quetz client.
//!
//! Run with:
//! ```
//! QUETZ_SERVER_URL=http://localhost:8000 QUETZ_API_KEY=your-key cargo run --example basic
//! ```

use futures::TryStreamExt;
use quetz_client::{get_role, list_channel_members, list_channels, list_packages, QuetzClient};

#[tokio::main]
async fn main() -> quetz_client::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating Quetz client...");
    let client = QuetzClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // Walk the channels lazily, ten per request
    println!("\n--- Channels ---");
    let mut channels = list_channels(&client, 10)?;
    let mut first = None;
    while let Some(channel) = channels.try_next().await? {
        let visibility = if channel.private { "private" } else { "public" };
        println!("  - {} ({})", channel.name, visibility);
        first.get_or_insert(channel.name);
    }

    if let Some(channel) = first {
        println!("\n--- Members of {} ---", channel);
        let members: Vec<_> = list_channel_members(&client, &channel, 10)?
            .try_collect()
            .await?;
        for member in &members {
            let role = member.role.map(|r| r.to_string()).unwrap_or_default();
            println!("  - {} {}", member.user.username, role);

            let global = get_role(&client, &member.user.username).await?;
            println!("    global role: {:?}", global.role);
        }

        println!("\n--- First 5 packages in {} ---", channel);
        let packages: Vec<_> = list_packages(&client, &channel, 5)?
            .try_collect()
            .await?;
        for package in packages.iter().take(5) {
            let version = package.current_version.as_deref().unwrap_or("unknown");
            println!("  - {}@{}", package.name, version);
        }
    }

    println!("\nDone!");
    Ok(())
}
