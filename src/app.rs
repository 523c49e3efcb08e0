use std::sync::Arc;
use std::time::Duration;

use iced::task;
use iced::widget::{column, container};
use iced::window;
use iced::{Element, Fill, Padding, Subscription, Task, Theme};

use crate::config::{Config, SearchConfig};
use crate::controller::Controller;
use crate::error::SearchError;
use crate::render;
use crate::search::{self, FixtureClient, SearchClient, SearchRecord};
use crate::ui::{result_list, search_input, theme};

pub struct State {
    config: Config,
    controller: Controller,
    client: Arc<dyn SearchClient>,
    /// Ticket and abort handle of the armed debounce timer
    debounce: Option<(u64, task::Handle)>,
}

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    /// Debounce timer with this ticket ran out
    DebounceElapsed(u64),
    SearchFinished {
        generation: u64,
        outcome: Result<Vec<SearchRecord>, SearchError>,
    },
    CloseRequested(window::Id),
}

impl State {
    pub fn new(config: Config, client: Arc<dyn SearchClient>) -> (Self, Task<Message>) {
        tracing::info!(
            "Search client: {}, debounce: {:?}, timeout: {:?}",
            client.name(),
            config.search.debounce(),
            config.search.timeout()
        );

        let state = Self {
            config,
            controller: Controller::new(),
            client,
            debounce: None,
        };
        (state, iced::widget::operation::focus(search_input::SEARCH_INPUT_ID))
    }

    pub fn title(&self) -> String {
        String::from("Address Search")
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => {
                let Some(ticket) = self.controller.input(query) else {
                    return Task::none();
                };
                self.cancel_debounce();

                let delay = self.config.search.debounce();
                let (timer, handle) =
                    Task::perform(debounce_timer(delay, ticket), Message::DebounceElapsed)
                        .abortable();
                self.debounce = Some((ticket, handle));
                timer
            }
            Message::DebounceElapsed(ticket) => {
                // A timer can fire just before it is aborted; keep the live one's handle.
                if self.debounce.as_ref().is_some_and(|(armed, _)| *armed == ticket) {
                    self.debounce = None;
                }
                match self.controller.debounce_elapsed(ticket) {
                    Some(request) => Task::perform(
                        search::dispatch(
                            Arc::clone(&self.client),
                            request.generation,
                            request.query,
                            self.config.search.timeout(),
                        ),
                        |(generation, outcome)| Message::SearchFinished {
                            generation,
                            outcome,
                        },
                    ),
                    None => Task::none(),
                }
            }
            Message::SearchFinished {
                generation,
                outcome,
            } => {
                self.controller.search_finished(generation, outcome);
                Task::none()
            }
            Message::CloseRequested(id) => {
                tracing::info!("Window {:?} closing, tearing down", id);
                self.cancel_debounce();
                self.controller.teardown();
                Task::batch([window::close(id), iced::exit()])
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let projected = render::project(&self.controller, self.config.display.avatar_colors);

        let input = search_input::view(self.controller.query());
        let body = result_list::view(projected.body);

        let content = column![input, body]
            .spacing(12)
            .padding(Padding::new(16.0))
            .height(Fill);

        container(content)
            .width(Fill)
            .height(Fill)
            .style(theme::main_container)
            .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        window::close_requests().map(Message::CloseRequested)
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn cancel_debounce(&mut self) {
        if let Some((_, handle)) = self.debounce.take() {
            handle.abort();
        }
    }
}

/// Resolves to `ticket` once `delay` has passed without being aborted
async fn debounce_timer(delay: Duration, ticket: u64) -> u64 {
    tokio::time::sleep(delay).await;
    ticket
}

/// Build the search backend described by the config: records from the
/// configured JSONL file, or the built-in records if none is set or it
/// cannot be read.
pub fn client_from_config(config: &SearchConfig) -> Arc<dyn SearchClient> {
    let delay = config.delay();
    let Some(path) = &config.records else {
        return Arc::new(FixtureClient::builtin(delay));
    };

    match search::load_records(path) {
        Ok(records) => {
            tracing::info!("Loaded {} records from {:?}", records.len(), path);
            Arc::new(FixtureClient::new(records, delay))
        }
        Err(e) => {
            tracing::warn!("Failed to read records from {:?}: {}, using built-in records", path, e);
            Arc::new(FixtureClient::builtin(delay))
        }
    }
}
