//! Main entry point for the course seat tracker.
//! Polls the registration system for the configured sections and sends a
//! notification when a seat opens, then exits.

use std::sync::Arc;

use clap::Parser;
use notification_services::SmtpNotifier;
use registration_api::RegistrationClient;
use seat_scan::{CONFIG_PATH, PollExecutor, load_config};

/// Check for available seats in university courses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug mode for verbose output and to send a test email
    #[arg(long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting course seat tracker...");

    let config = match load_config(CONFIG_PATH) {
        Ok(config) => {
            log::info!(
                "📄 Loaded {} with {} course(s) to check",
                CONFIG_PATH,
                config.courses_to_check.len()
            );
            config
        }
        Err(e) => {
            log::error!("❌ Could not load or parse {}: {}", CONFIG_PATH, e);
            std::process::exit(1);
        }
    };

    let client = match RegistrationClient::new(config.university_settings.clone()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to create registration client: {}", e);
            std::process::exit(1);
        }
    };

    let notifier = SmtpNotifier::new(config.email_settings.clone());

    if args.debug {
        log::info!("🐛 Debug mode enabled");
    }

    let executor = PollExecutor::from_config(&config, Arc::new(client), Arc::new(notifier), args.debug);

    let reason = executor.run().await;
    log::info!("🛑 Course seat tracker stopped: {}", reason);
}
