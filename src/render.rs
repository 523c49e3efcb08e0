//! Pure projection from controller state to what the widget shows.

use rand::Rng;
use serde::Deserialize;

use crate::address;
use crate::controller::{Controller, SearchStatus};
use crate::highlight::{highlight, Segment};
use crate::search::SearchRecord;

/// Text shown in place of the result list while a search is in flight
pub const SEARCHING_PLACEHOLDER: &str = "Searching...";

/// How avatar background colors are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarColors {
    /// Derived from the address: same record, same color
    #[default]
    Stable,
    /// A fresh random color on every render
    Random,
}

/// 24-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn from_u24(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// `#rrggbb`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl AvatarColors {
    pub fn color_for(&self, address: &str) -> Rgb {
        match self {
            Self::Stable => Rgb::from_u24(fnv1a(address.as_bytes()) as u32 & 0x00ff_ffff),
            Self::Random => Rgb::from_u24(rand::thread_rng().gen_range(0..=0x00ff_ffff)),
        }
    }
}

/// One rendered result row
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Identity for list diffing: the record's address
    pub key: String,
    /// First two characters of the name
    pub avatar: String,
    pub color: Rgb,
    /// Name split into highlighted / plain runs
    pub name: Vec<Segment>,
    /// Truncated address
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A search is in flight
    Searching,
    /// The last search failed
    Notice(String),
    /// Result list, possibly empty
    Results(Vec<ResultRow>),
}

/// Everything the widget draws, derived from controller state
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    /// Value of the input field
    pub query: String,
    pub body: Body,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            query: String::new(),
            body: Body::Results(Vec::new()),
        }
    }
}

/// Project the controller's state into a [`ViewModel`].
pub fn project(controller: &Controller, colors: AvatarColors) -> ViewModel {
    let body = if controller.status() == SearchStatus::Searching {
        Body::Searching
    } else if let Some(notice) = controller.notice() {
        Body::Notice(notice.to_string())
    } else {
        Body::Results(render_results(controller.results(), controller.query(), colors))
    };

    ViewModel {
        query: controller.query().to_string(),
        body,
    }
}

/// Render records in the order given, highlighting `query` in each name.
pub fn render_results(records: &[SearchRecord], query: &str, colors: AvatarColors) -> Vec<ResultRow> {
    records
        .iter()
        .map(|record| ResultRow {
            key: record.address.clone(),
            avatar: avatar_label(&record.name),
            color: colors.color_for(&record.address),
            name: highlight(&record.name, query),
            address: address::format(&record.address),
        })
        .collect()
}

/// First two characters of `name` (fewer if it is shorter)
pub fn avatar_label(name: &str) -> String {
    name.chars().take(2).collect()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}
