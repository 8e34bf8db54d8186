//! Configuration inspection.

use storefront_customer::CustomerConfig;

/// Print the loaded configuration with secrets redacted.
pub fn check(config: &CustomerConfig) {
    #[allow(clippy::print_stdout)]
    {
        println!("Configuration OK");
        println!("{config:#?}");
    }
    tracing::info!(
        orders_page_size = config.orders_page_size,
        sentry = config.sentry_dsn.is_some(),
        "Configuration validated"
    );
}
