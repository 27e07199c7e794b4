//! The 6x6 X-Trans colour filter array.

use crate::image_pipeline::debayer::types::{BLUE, GREEN, RED};

/// Colour of the filter over one photosite.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterColor {
    Red,
    Green,
    Blue,
}

impl FilterColor {
    /// Index of this colour's channel in an RGBA pixel.
    #[inline]
    pub fn channel(self) -> usize {
        match self {
            FilterColor::Red => RED,
            FilterColor::Green => GREEN,
            FilterColor::Blue => BLUE,
        }
    }
}

/// A periodic 6x6 colour filter array.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CfaPattern {
    table: [[FilterColor; 6]; 6],
}

use FilterColor::{Blue as B, Green as G, Red as R};

impl CfaPattern {
    /// The X-Trans layout used by Fujifilm APS-C sensors.
    pub const XTRANS: CfaPattern = CfaPattern {
        table: [
            [G, B, G, G, R, G],
            [R, G, R, B, G, B],
            [G, B, G, G, R, G],
            [G, R, G, G, B, G],
            [B, G, B, R, G, R],
            [G, R, G, G, B, G],
        ],
    };

    pub const fn new(table: [[FilterColor; 6]; 6]) -> Self {
        Self { table }
    }

    #[inline]
    pub fn color(&self, row: usize, col: usize) -> FilterColor {
        self.table[row % 6][col % 6]
    }
}

impl Default for CfaPattern {
    fn default() -> Self {
        Self::XTRANS
    }
}
