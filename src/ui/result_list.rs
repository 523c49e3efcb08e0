use iced::widget::{column, container, row, scrollable, text, Column, Row};
use iced::{alignment, Element, Fill, Padding};

use crate::app::Message;
use crate::highlight::Segment;
use crate::render::{Body, ResultRow, SEARCHING_PLACEHOLDER};
use crate::ui::theme;

/// Avatar badge edge length in pixels
const AVATAR_SIZE: f32 = 36.0;

/// Build the area below the search input: a status line while searching
/// or after a failure, the result list otherwise.
pub fn view<'a>(body: Body) -> Element<'a, Message> {
    match body {
        Body::Searching => text(SEARCHING_PLACEHOLDER)
            .size(14)
            .style(theme::status)
            .into(),
        Body::Notice(message) => text(message).size(14).style(theme::notice).into(),
        Body::Results(rows) if rows.is_empty() => column![].into(),
        Body::Results(rows) => {
            let rows: Vec<Element<'a, Message>> = rows.into_iter().map(result_row).collect();
            scrollable(Column::from_vec(rows).spacing(4)).height(Fill).into()
        }
    }
}

fn result_row<'a>(result: ResultRow) -> Element<'a, Message> {
    let avatar = container(text(result.avatar).size(14))
        .width(AVATAR_SIZE)
        .height(AVATAR_SIZE)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .style(theme::avatar(result.color));

    let name = row![text("Name: ").size(14).color(theme::TEXT_SECONDARY), highlighted(result.name)];
    let address = row![
        text("Address: ").size(14).color(theme::TEXT_SECONDARY),
        text(result.address).size(14).color(theme::TEXT_PRIMARY),
    ];

    let content = row![avatar, column![name, address].spacing(2)]
        .spacing(12)
        .align_y(iced::Alignment::Center);

    container(content)
        .padding(Padding::from([8, 12]))
        .width(Fill)
        .style(theme::result_row)
        .into()
}

/// Lay highlight segments out side by side, matched runs in the accent color
fn highlighted<'a>(segments: Vec<Segment>) -> Element<'a, Message> {
    let spans: Vec<Element<'a, Message>> = segments
        .into_iter()
        .map(|segment| {
            let color = if segment.matched {
                theme::HIGHLIGHT
            } else {
                theme::TEXT_PRIMARY
            };
            text(segment.text).size(14).color(color).into()
        })
        .collect();
    Row::from_vec(spans).into()
}
