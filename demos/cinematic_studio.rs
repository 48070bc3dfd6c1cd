//! Animate a product photo with the cinematic studio.
//!
//! Reads the API key from `API_KEY` / `GEMINI_API_KEY` (a `.env` file is
//! honored), streams status updates, and saves the finished video.
//!
//! ```sh
//! cargo run --example cinematic_studio -- coat.png "Gently swaying in a breeze" portrait
//! ```

use std::path::Path;
use std::sync::Arc;

use storefront_studio::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(image_path) = args.next() else {
        eprintln!("usage: cinematic_studio <image> [prompt] [landscape|portrait]");
        return Ok(());
    };
    let prompt = args.next().unwrap_or_default();
    let aspect_ratio = match args.next().as_deref() {
        Some("portrait") => AspectRatio::Portrait,
        _ => AspectRatio::Landscape,
    };

    let config = StudioConfig::from_env();
    let credentials = Arc::new(StaticCredential::new(config.api_key.clone()));
    let client = Arc::new(VeoClient::new(config.clone()));
    let studio = StudioController::new(Arc::clone(&client), credentials, &config);

    let image = SourceImage::from_path(Path::new(&image_path))?;
    let request = GenerationRequest::new(image)
        .prompt(prompt)
        .aspect_ratio(aspect_ratio);

    let mut updates = studio.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            println!("[{:?}] {}", state.phase, state.status_message);
            if !state.is_busy() && state.phase != StudioPhase::Idle {
                break;
            }
        }
    });

    let state = studio.generate(request).await;
    printer.abort();

    match (state.phase, state.artifact) {
        (StudioPhase::Completed, Some(artifact)) => {
            let bytes = client.download(&artifact).await?;
            std::fs::write("studio_output.mp4", &bytes)?;
            println!("Saved {} bytes to studio_output.mp4", bytes.len());
        }
        _ => {
            eprintln!("{}", state.status_message);
            if let Some(detail) = state.error_detail {
                eprintln!("  {}", detail);
            }
        }
    }

    Ok(())
}
