mod app;
mod clipboard;
mod commands;
mod config;
mod logging;
mod transcription;
mod viewer;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
