use iced::widget::{container, text, text_input};
use iced::{Border, Color, Shadow, Theme};

use crate::render::Rgb;

/// Window background
pub const BACKGROUND: Color = Color {
    r: 0.12,
    g: 0.12,
    b: 0.15,
    a: 1.0,
};

/// Slightly lighter surface color for the search input and rows
const SURFACE: Color = Color {
    r: 0.18,
    g: 0.18,
    b: 0.22,
    a: 1.0,
};

/// Focus ring
const ACCENT: Color = Color {
    r: 0.35,
    g: 0.55,
    b: 0.85,
    a: 1.0,
};

/// Matched query text
pub const HIGHLIGHT: Color = Color {
    r: 0.98,
    g: 0.78,
    b: 0.25,
    a: 1.0,
};

pub const TEXT_PRIMARY: Color = Color {
    r: 0.9,
    g: 0.9,
    b: 0.92,
    a: 1.0,
};

pub const TEXT_SECONDARY: Color = Color {
    r: 0.55,
    g: 0.55,
    b: 0.6,
    a: 1.0,
};

/// Error notice text
const TEXT_ERROR: Color = Color {
    r: 0.92,
    g: 0.42,
    b: 0.42,
    a: 1.0,
};

pub fn rgb(color: Rgb) -> Color {
    Color::from_rgb8(color.r, color.g, color.b)
}

/// Style for the container wrapping the whole widget
pub fn main_container(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(BACKGROUND.into()),
        border: Border {
            color: Color {
                r: 0.3,
                g: 0.3,
                b: 0.35,
                a: 0.5,
            },
            width: 1.0,
            radius: 12.0.into(),
        },
        shadow: Shadow::default(),
        text_color: Some(TEXT_PRIMARY),
        snap: false,
    }
}

/// Style for the search text input
pub fn search_input(theme: &Theme, status: text_input::Status) -> text_input::Style {
    let _ = theme;
    let focused = matches!(status, text_input::Status::Focused { .. });
    text_input::Style {
        background: SURFACE.into(),
        border: Border {
            color: if focused { ACCENT } else { Color::TRANSPARENT },
            width: if focused { 2.0 } else { 0.0 },
            radius: 8.0.into(),
        },
        icon: TEXT_SECONDARY,
        placeholder: TEXT_SECONDARY,
        value: TEXT_PRIMARY,
        selection: Color {
            r: ACCENT.r,
            g: ACCENT.g,
            b: ACCENT.b,
            a: 0.3,
        },
    }
}

/// Style for a result row
pub fn result_row(theme: &Theme) -> container::Style {
    let _ = theme;
    container::Style {
        background: Some(SURFACE.into()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 6.0.into(),
        },
        text_color: Some(TEXT_PRIMARY),
        ..container::Style::default()
    }
}

/// Style for the colored avatar badge
pub fn avatar(color: Rgb) -> impl Fn(&Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(rgb(color).into()),
        border: Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius: 18.0.into(),
        },
        text_color: Some(Color::WHITE),
        ..container::Style::default()
    }
}

/// Style for "Searching..." and other status lines
pub fn status(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(TEXT_SECONDARY),
    }
}

/// Style for a failed-search notice
pub fn notice(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(TEXT_ERROR),
    }
}
