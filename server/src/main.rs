use clap::Parser;
use log::info;
use server::config::ServerConfig;
use server::network::{Server, ServerMessage};
use server::rng::{RandRandomness, Randomness};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = ServerConfig::parse();

    let randomness: Box<dyn Randomness> = match config.seed {
        Some(seed) => {
            info!("Using fixed seed {}", seed);
            Box::new(RandRandomness::seeded(seed))
        }
        None => Box::new(RandRandomness::from_entropy()),
    };

    let mut server = Server::new(&config, randomness).await?;
    info!(
        "Board {:?}, {} default players, {:?} phase rules",
        config.board, config.default_players, config.phase_rules
    );

    if !config.no_default_game {
        let game = server.engine().create_game(None).await;
        info!("Default game ready: {}", game.id);
    }

    let control = server.control();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down gracefully...");
            let _ = control.send(ServerMessage::Shutdown);
        }
    });

    server.run().await
}
