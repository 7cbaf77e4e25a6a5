//! Web server CLI command.

use crate::api;

/// Default port for the web server
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind host; the app has no authentication, so it stays local
/// unless the user opts into another interface.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Execute the web server, optionally opening the browser once it is up.
pub async fn execute(host: String, port: u16, no_open: bool) {
    if !no_open {
        let url = format!("http://localhost:{}/lists", port);
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            println!("Opening browser: {}", url);
            let _ = open::that(&url);
        });
    }

    if let Err(e) = api::start_server(&host, port).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
