mod annotation;
mod app;
mod config;
mod document;
mod dom;
mod error;
mod filter_core;
mod highlights;
mod logging;
mod navigation;
mod predicate;
mod toolbar;

#[cfg(test)]
mod test_support;

use app::*;
use config::FilterConfig;
use leptos::prelude::*;
use tracing::{error, warn};

fn main() {
    console_error_panic_hook::set_once();

    let config = dom::load_config();
    logging::init(
        config
            .as_ref()
            .map(|config| config.log_level.as_str())
            .unwrap_or("info"),
    );
    let config = config.unwrap_or_else(|err| {
        warn!(%err, "falling back to the default filter configuration");
        FilterConfig::default()
    });

    let mount = match dom::mount_point(&config.append_to) {
        Ok(mount) => mount,
        Err(err) => {
            error!(%err, "filter toolbar not mounted");
            return;
        }
    };
    leptos::mount::mount_to(mount, move || view! { <App config=config /> }).forget();
}
