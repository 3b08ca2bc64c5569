//! Launcher-side demo: start a login attempt and wait for the browser
//! callback.
//!
//! Run with `RUST_LOG=debug cargo run --example browser_login`, open the
//! printed URL, and complete the provider login. The forwarded result (or a
//! timeout) is printed when the flow resolves.

use rl_auth::{LoginFlow, LoginOptions, LoginOutcome};
use rl_config::ConfigManager;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ConfigManager::load().await?.get();
    let flow = LoginFlow::new(config);
    let pending = flow.begin(LoginOptions::default()).await?;

    println!("Open this URL in your browser:\n\n{}\n", pending.auth_url());
    println!(
        "Waiting for the login to come back on port {}...",
        pending.port()
    );

    match pending.finish().await? {
        LoginOutcome::Completed(result) => match result.failure_text() {
            Some(text) => println!("Login failed: {}", text),
            None => println!("Login completed: {:?}", result),
        },
        LoginOutcome::TimedOut => {
            println!("Timed out waiting for the browser.");
            println!("Paste the code shown on the page into the launcher instead.");
        }
    }

    Ok(())
}
