//! Combo mini-grid data structures.

use crate::core::constants::COMBO_SQUARE_COUNT;
use serde::{Deserialize, Serialize};

/// Card colour drawn when a combo square starts filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboColor {
    Blue,
    Pink,
    Green,
    Orange,
    White,
}

impl ComboColor {
    pub const ALL: [ComboColor; 5] = [
        ComboColor::Blue,
        ComboColor::Pink,
        ComboColor::Green,
        ComboColor::Orange,
        ComboColor::White,
    ];
}

/// Poker-style classification of a dealt hand, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboHand {
    Nothing,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl ComboHand {
    /// Combo points paid before upgrades.
    pub fn base_points(&self) -> f64 {
        match self {
            ComboHand::Nothing => 0.0,
            ComboHand::OnePair => 1.0,
            ComboHand::TwoPair => 3.0,
            ComboHand::ThreeOfAKind => 5.0,
            ComboHand::FullHouse => 10.0,
            ComboHand::FourOfAKind => 25.0,
            ComboHand::FiveOfAKind => 100.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComboHand::Nothing => "Nothing",
            ComboHand::OnePair => "One Pair",
            ComboHand::TwoPair => "Two Pair",
            ComboHand::ThreeOfAKind => "Three of a Kind",
            ComboHand::FullHouse => "Full House",
            ComboHand::FourOfAKind => "Four of a Kind",
            ComboHand::FiveOfAKind => "Five of a Kind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboSquare {
    pub index: usize,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub fill_progress: f64,
    #[serde(default)]
    pub color: Option<ComboColor>,
}

/// A scored hand shown until `expires_at`. No new hand starts while shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDisplay {
    pub hand: ComboHand,
    pub points: f64,
    pub expires_at: i64,
}

/// The five-card mini-grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboState {
    pub squares: Vec<ComboSquare>,
    pub current_index: usize,
    pub current_fill_progress: f64,
    pub result: Option<ResultDisplay>,
}

impl Default for ComboState {
    fn default() -> Self {
        Self::new()
    }
}

impl ComboState {
    pub fn new() -> Self {
        Self {
            squares: fresh_squares(),
            current_index: 0,
            current_fill_progress: 0.0,
            result: None,
        }
    }

    /// Clears every card for a new hand.
    pub fn deal_fresh_hand(&mut self) {
        self.squares = fresh_squares();
        self.current_index = 0;
        self.current_fill_progress = 0.0;
        self.result = None;
    }

    pub fn filled_colors(&self) -> impl Iterator<Item = ComboColor> + '_ {
        self.squares
            .iter()
            .filter(|s| s.filled)
            .filter_map(|s| s.color)
    }

    pub(crate) fn normalize(&mut self) {
        if self.squares.len() != COMBO_SQUARE_COUNT {
            *self = Self::new();
            return;
        }
        self.current_index = self.current_index.min(COMBO_SQUARE_COUNT);
    }
}

fn fresh_squares() -> Vec<ComboSquare> {
    (0..COMBO_SQUARE_COUNT)
        .map(|index| ComboSquare {
            index,
            filled: false,
            fill_progress: 0.0,
            color: None,
        })
        .collect()
}
