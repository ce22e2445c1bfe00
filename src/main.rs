//! RAX FTP Client - Entry Point
//!
//! An interactive FTP client speaking the passive-mode subset of RFC 959.

use log::{error, info};

use rax_ftp_client::config::ClientConfig;
use rax_ftp_client::shell::{self, StdinSource};
use rax_ftp_client::storage::DiskStore;
use rax_ftp_client::utils::logging::setup_logging;

#[tokio::main]
async fn main() {
    setup_logging();

    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Launching FTP client...");

    let mut source = StdinSource::new();
    let mut stdout = std::io::stdout();
    if let Err(e) = shell::run(&config, &mut source, DiskStore, &mut stdout).await {
        error!("Session ended: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
