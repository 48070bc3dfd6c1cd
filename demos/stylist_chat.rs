//! Ask the styling assistant a couple of questions.
//!
//! ```sh
//! cargo run --example stylist_chat -- "What shoes go with a camel overcoat?"
//! ```

use storefront_studio::{StudioConfig, StylistClient, StylistSession};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let client = StylistClient::new(StudioConfig::from_env());
    let mut session = StylistSession::new();

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "I have a gala next week. What silhouette should I go for?".to_string());

    session.send(&client, &question).await;
    session
        .send(&client, "And which colors are trending this season?")
        .await;

    for message in session.messages() {
        println!("{:>5?}: {}\n", message.role, message.text);
    }
}
