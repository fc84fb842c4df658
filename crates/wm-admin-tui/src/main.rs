//! WM Admin TUI
//!
//! # Usage
//!
//! ```bash
//! # Connect to the admin proxy on localhost:8080
//! wm-admin-tui
//!
//! # Talk to a mock server's own admin API
//! wm-admin-tui --admin-url http://localhost:8081 --api-prefix /__admin
//!
//! # Settings from a file, no auto refresh
//! wm-admin-tui --config wm-admin.yaml --refresh-ms 0
//! ```

use wm_admin_tui::{logging, App, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    logging::init(config.log_file.as_deref())?;
    tracing::info!(
        "Starting against {}{}",
        config.admin_url,
        config.api_prefix
    );

    let mut app = App::new(&config)?;
    app.refresh_all().await;

    wm_admin_tui::run(app).await
}
