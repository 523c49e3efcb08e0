use iced::widget::text_input;
use iced::{Element, Fill};

use crate::app::Message;
use crate::ui::theme;

/// The search input ID for focus management
pub const SEARCH_INPUT_ID: &str = "addrbox-search-input";

/// Build the search input widget. The field always shows `query`; edits
/// come back as [`Message::QueryChanged`].
pub fn view(query: &str) -> Element<'_, Message> {
    text_input("Search...", query)
        .on_input(Message::QueryChanged)
        .id(SEARCH_INPUT_ID)
        .padding(12)
        .size(18)
        .width(Fill)
        .style(theme::search_input)
        .into()
}
