//! market-content-api - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    market_content_api::run().await;
}
