use std::sync::Arc;

use iced::{window, Size};
use tracing_subscriber::EnvFilter;

use addrbox::app::{self, State};
use addrbox::config;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::load();
    let client = app::client_from_config(&config.search);
    let size = Size::new(config.window.width, config.window.height);

    tracing::info!("Starting address search");

    iced::application(
        move || State::new(config.clone(), Arc::clone(&client)),
        State::update,
        State::view,
    )
    .title(State::title)
    .subscription(State::subscription)
    .theme(State::theme)
    .window(window::Settings {
        size,
        // Close requests go through State::update so the widget can tear down first
        exit_on_close_request: false,
        ..window::Settings::default()
    })
    .run()
}
