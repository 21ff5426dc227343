//! Team composition
//!
//! A composition is the renderer-independent description of the exported
//! image: a header, one card per selected entry and any number of style
//! declarations. Card positions and the overall size are measured from the
//! content in logical pixels; renderers multiply by their scale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::palette::{default_palette, palette_by_name, Palette};
use crate::catalog::type_label;
use crate::store::{CardStyle, SelectedItem, ThemeSettings};

pub const HEADER_TITLE: &str = "私の好きなポケモンチーム";
pub const HEADER_TITLE_FALLBACK: &str = "My Favorite Pokémon Team";
pub const FOOTER_TEXT: &str = "好きなポケモン共有アプリで作成";
pub const FOOTER_TEXT_FALLBACK: &str = "Made with teamdex";

/// Outer padding around all content
pub const PADDING: u32 = 32;
pub const HEADER_HEIGHT: u32 = 88;
pub const FOOTER_HEIGHT: u32 = 40;
pub const CARD_WIDTH: u32 = 160;
pub const CARD_HEIGHT: u32 = 176;
pub const GRID_GAP: u32 = 24;
pub const ROW_GAP: u32 = 16;
/// Columns in the grid layout
pub const GRID_COLUMNS: usize = 3;
/// Width of an empty composition
pub const MIN_WIDTH: u32 = 400;
/// Body height shown when there are no cards
pub const EMPTY_BODY_HEIGHT: u32 = 120;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    Horizontal,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Grid => write!(f, "grid"),
            Layout::Horizontal => write!(f, "horizontal"),
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(Layout::Grid),
            "horizontal" => Ok(Layout::Horizontal),
            other => Err(format!("unknown layout '{other}' (expected grid or horizontal)")),
        }
    }
}

/// Transient display switches for an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub layout: Layout,
    pub show_types: bool,
    pub show_ids: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Grid,
            show_types: true,
            show_ids: true,
        }
    }
}

/// Axis-aligned box in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Text plus a Latin alternative for when no loaded font can draw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    pub fallback: String,
}

impl Caption {
    pub fn new(text: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback: fallback.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardNode {
    pub id: u32,
    pub label: String,
    pub name: Caption,
    /// Canonical type names, used for badge colors
    pub types: Vec<String>,
    /// Badge text, one per entry of `types`
    pub type_labels: Vec<Caption>,
    pub image_url: String,
    pub show_types: bool,
    pub show_ids: bool,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Header {
        title: Caption,
        subtitle: Caption,
        rect: Rect,
    },
    Card(CardNode),
    Footer {
        text: Caption,
        rect: Rect,
    },
    /// Style declaration carried along with the content; never drawn
    Style { css: String },
}

impl Node {
    /// Whether the node contributes pixels
    pub fn is_visual(&self) -> bool {
        !matches!(self, Node::Style { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub palette: &'static Palette,
    pub card_style: CardStyle,
    /// Card fill color
    pub background_color: String,
    pub text_color: String,
    pub options: DisplayOptions,
    pub nodes: Vec<Node>,
    width: u32,
    height: u32,
}

impl Composition {
    /// Lay out `selection` under `theme`. Unknown palette names fall back
    /// to the default palette.
    pub fn from_selection(
        selection: &[SelectedItem],
        theme: &ThemeSettings,
        options: DisplayOptions,
    ) -> Self {
        let palette = palette_by_name(&theme.palette).unwrap_or_else(default_palette);
        let (columns, rows) = grid_shape(selection.len(), options.layout);
        let gap = match options.layout {
            Layout::Grid => GRID_GAP,
            Layout::Horizontal => ROW_GAP,
        };

        let body_width = span(columns, CARD_WIDTH, gap);
        let body_height = if selection.is_empty() {
            EMPTY_BODY_HEIGHT
        } else {
            span(rows, CARD_HEIGHT, gap)
        };
        let width = (body_width + 2 * PADDING).max(MIN_WIDTH);
        let height = PADDING + HEADER_HEIGHT + body_height + FOOTER_HEIGHT + PADDING;

        let mut nodes = Vec::with_capacity(selection.len() + 3);
        nodes.push(Node::Style {
            css: "filter: drop-shadow(0 2px 4px rgba(0,0,0,0.1))".to_string(),
        });
        nodes.push(Node::Header {
            title: Caption::new(HEADER_TITLE, HEADER_TITLE_FALLBACK),
            subtitle: Caption::new(
                format!("{}匹のお気に入り", selection.len()),
                format!("{} favorites", selection.len()),
            ),
            rect: Rect {
                x: PADDING,
                y: PADDING,
                width: width - 2 * PADDING,
                height: HEADER_HEIGHT,
            },
        });

        // Center the body horizontally when the header is wider
        let body_x = (width - body_width) / 2;
        let body_y = PADDING + HEADER_HEIGHT;
        for (index, selected) in selection.iter().enumerate() {
            let column = (index % columns.max(1)) as u32;
            let row = (index / columns.max(1)) as u32;
            nodes.push(Node::Card(CardNode {
                id: selected.id(),
                label: selected.formatted_id(),
                name: Caption::new(selected.display_name(), selected.latin_name()),
                types: selected.types().to_vec(),
                type_labels: selected
                    .types()
                    .iter()
                    .map(|kind| Caption::new(type_label(kind), capitalize(kind)))
                    .collect(),
                image_url: selected.image_url().to_string(),
                show_types: options.show_types,
                show_ids: options.show_ids,
                rect: Rect {
                    x: body_x + column * (CARD_WIDTH + gap),
                    y: body_y + row * (CARD_HEIGHT + gap),
                    width: CARD_WIDTH,
                    height: CARD_HEIGHT,
                },
            }));
        }

        nodes.push(Node::Footer {
            text: Caption::new(FOOTER_TEXT, FOOTER_TEXT_FALLBACK),
            rect: Rect {
                x: PADDING,
                y: body_y + body_height,
                width: width - 2 * PADDING,
                height: FOOTER_HEIGHT,
            },
        });

        Self {
            palette,
            card_style: theme.card_style,
            background_color: theme.background_color.clone(),
            text_color: theme.text_color.clone(),
            options,
            nodes,
            width,
            height,
        }
    }

    /// Logical size as `(width, height)`
    pub fn measure(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardNode> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Card(card) => Some(card),
            _ => None,
        })
    }

    pub fn card_count(&self) -> usize {
        self.cards().count()
    }

    pub fn visual_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.is_visual())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `(columns, rows)` for `count` cards
fn grid_shape(count: usize, layout: Layout) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let columns = match layout {
        Layout::Grid => count.min(GRID_COLUMNS),
        Layout::Horizontal => count,
    };
    (columns, count.div_ceil(columns))
}

/// Length of `n` items of `size` separated by `gap`
fn span(n: usize, size: u32, gap: u32) -> u32 {
    let n = n as u32;
    if n == 0 {
        0
    } else {
        n * size + (n - 1) * gap
    }
}
