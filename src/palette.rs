//! Mapping from color ids to display colors
//!
//! The engine only knows ids. Rendering needs an RGBA value per id; colors
//! that do not specify one draw from a fixed 15-entry cycle so output is
//! stable across runs.

use image::Rgba;

use crate::grid::{ColorId, BACKGROUND};

/// Magenta used for ids with no palette entry
pub const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Default background: fully transparent
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// PICO-8 palette without black, used round-robin for colors with no
/// explicit display color.
/// Reference: https://lospec.com/palette-list/pico-8
const CYCLE: [[u8; 3]; 15] = [
    [0xFF, 0xF1, 0xE8],
    [0x29, 0xAD, 0xFF],
    [0xFF, 0x00, 0x4D],
    [0x00, 0xE4, 0x36],
    [0xFF, 0xEC, 0x27],
    [0x7E, 0x25, 0x53],
    [0xFF, 0xA3, 0x00],
    [0x1D, 0x2B, 0x53],
    [0x00, 0x87, 0x51],
    [0xAB, 0x52, 0x36],
    [0x83, 0x76, 0x9C],
    [0xFF, 0x77, 0xA8],
    [0xC2, 0xC3, 0xC7],
    [0x5F, 0x57, 0x4F],
    [0xFF, 0xCC, 0xAA],
];

/// Default display color for `id` when none is given.
pub fn default_color(id: ColorId) -> Rgba<u8> {
    if id == BACKGROUND {
        return TRANSPARENT;
    }
    let [r, g, b] = CYCLE[(usize::from(id) - 1) % CYCLE.len()];
    Rgba([r, g, b, 255])
}

/// RGBA value per color id; index 0 is the background.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPalette {
    colors: Vec<Rgba<u8>>,
}

impl Default for IndexPalette {
    fn default() -> Self {
        Self { colors: vec![TRANSPARENT] }
    }
}

impl IndexPalette {
    /// Palette holding only the transparent background.
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette with default colors for ids `0..=count`.
    pub fn with_defaults(count: usize) -> Self {
        let colors = (0..=count.min(usize::from(ColorId::MAX)))
            .filter_map(|i| ColorId::try_from(i).ok())
            .map(default_color)
            .collect();
        Self { colors }
    }

    /// Set the display color of `id`, growing the palette with defaults.
    pub fn set(&mut self, id: ColorId, color: Rgba<u8>) {
        let index = usize::from(id);
        while self.colors.len() <= index {
            let next = ColorId::try_from(self.colors.len()).unwrap_or(ColorId::MAX);
            self.colors.push(default_color(next));
        }
        self.colors[index] = color;
    }

    /// Display color of `id`; magenta if the palette has no entry.
    pub fn get(&self, id: ColorId) -> Rgba<u8> {
        self.colors.get(usize::from(id)).copied().unwrap_or(MAGENTA)
    }

    pub fn background(&self) -> Rgba<u8> {
        self.get(BACKGROUND)
    }

    pub fn set_background(&mut self, color: Rgba<u8>) {
        self.set(BACKGROUND, color);
    }

    /// Number of entries including the background.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
