use clap::Parser;
use wiki_prices::{ItemId, WikiPricesClient, WikiPricesConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Item ID to check
    #[arg(short, long)]
    item_id: i32,
}

// Print the latest wiki price for a single item
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Args::parse();
    let client = WikiPricesClient::new(WikiPricesConfig {
        user_agent: "wiki-prices-examples".to_string(),
        ..Default::default()
    })?;
    let latest = client.get_latest().await?;
    match latest.get(&ItemId(args.item_id)) {
        Some(price) => {
            println!("Latest prices for item {}:", args.item_id);
            println!("  High: {:?} gp at {:?}", price.high, price.high_time);
            println!("  Low: {:?} gp at {:?}", price.low, price.low_time);
        }
        None => println!("No recent trades for item {}.", args.item_id),
    }
    Ok(())
}
