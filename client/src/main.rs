use clap::Parser;
use client::network::Client;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Player id or name to act as; defaults to whoever's turn it is
    #[arg(short = 'p', long)]
    player: Option<String>,

    /// Game id to watch once connected
    #[arg(short = 'g', long)]
    game: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    println!("Type help for a list of commands");

    let mut client = Client::new(&args.server, args.player, args.game).await?;
    client.run().await?;

    Ok(())
}
