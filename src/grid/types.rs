//! Grid data structures.

use crate::core::constants::{GRID_SIZE, TOTAL_SQUARES};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// One cell of the fill grid. Row 0 is the bottom row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Square {
    #[serde(default)]
    pub index: usize,
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub col: usize,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub fill_progress: f64,
    #[serde(default)]
    pub row_completed: bool,
}

/// Multiplier awarded for a completed row.
///
/// While spinning, `multiplier` is `None` and `resolve_at` holds the
/// timestamp at which the roll becomes due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowBonus {
    pub row: usize,
    #[serde(default)]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub is_spinning: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve_at: Option<i64>,
}

impl RowBonus {
    pub fn resolved(row: usize, multiplier: f64) -> Self {
        Self {
            row,
            multiplier: Some(multiplier),
            is_spinning: false,
            resolve_at: None,
        }
    }

    pub fn spinning(row: usize, resolve_at: i64) -> Self {
        Self {
            row,
            multiplier: None,
            is_spinning: true,
            resolve_at: Some(resolve_at),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.is_spinning || self.multiplier.is_none()
    }
}

/// The live fill grid for the current tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayer {
    #[serde(default)]
    pub squares: Vec<Square>,
    #[serde(default)]
    pub total_squares: u32,
    #[serde(default)]
    pub current_square_index: usize,
    #[serde(default)]
    pub current_square_fill_progress: f64,
    #[serde(default)]
    pub completed_rows: u32,
    #[serde(default)]
    pub row_bonuses: Vec<RowBonus>,
}

impl Default for GridLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl GridLayer {
    /// Empty grid, filled bottom-left to top-right.
    pub fn new() -> Self {
        let squares = (0..TOTAL_SQUARES)
            .map(|index| Square {
                index,
                row: index / GRID_SIZE,
                col: index % GRID_SIZE,
                filled: false,
                fill_progress: 0.0,
                row_completed: false,
            })
            .collect();
        Self {
            squares,
            total_squares: 0,
            current_square_index: 0,
            current_square_fill_progress: 0.0,
            completed_rows: 0,
            row_bonuses: Vec::new(),
        }
    }

    /// Grid for a freshly entered tier: the completed lower grid counts as
    /// its first square.
    pub fn new_prefilled() -> Self {
        let mut layer = Self::new();
        layer.squares[0].filled = true;
        layer.squares[0].fill_progress = 1.0;
        layer.total_squares = 1;
        layer.current_square_index = 1;
        layer
    }

    pub fn capacity(&self) -> usize {
        self.squares.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_square_index >= self.capacity()
    }

    /// Product of every resolved row bonus. Pending rows count as 1.
    pub fn total_multiplier(&self) -> f64 {
        self.row_bonuses
            .iter()
            .filter_map(|bonus| bonus.multiplier)
            .product()
    }

    pub fn pending_bonuses(&self) -> usize {
        self.row_bonuses.iter().filter(|b| b.is_pending()).count()
    }

    /// Squares collected times the finalized multiplier.
    pub fn potential_reward(&self) -> f64 {
        self.total_squares as f64 * self.total_multiplier()
    }

    /// Restores cursor and geometry invariants on data loaded from outside.
    ///
    /// The leading run of filled squares is authoritative: the cursor, the
    /// square count, row completion and row bonuses are all rebuilt from it.
    /// A layer without a usable square list is rebuilt from its cursor.
    pub(crate) fn normalize(&mut self) {
        if self.squares.len() != TOTAL_SQUARES {
            let filled = self
                .current_square_index
                .max(self.total_squares as usize)
                .min(TOTAL_SQUARES);
            self.squares = Self::new().squares;
            for square in self.squares.iter_mut().take(filled) {
                square.filled = true;
            }
        }

        let progress = if self.current_square_fill_progress.is_finite() {
            self.current_square_fill_progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let prefix = self.squares.iter().take_while(|s| s.filled).count();
        let full_rows = prefix / GRID_SIZE;

        for (index, square) in self.squares.iter_mut().enumerate() {
            square.index = index;
            square.row = index / GRID_SIZE;
            square.col = index % GRID_SIZE;
            square.filled = index < prefix;
            square.row_completed = square.row < full_rows;
            square.fill_progress = match index.cmp(&prefix) {
                Ordering::Less => 1.0,
                Ordering::Equal => progress,
                Ordering::Greater => 0.0,
            };
        }

        self.current_square_index = prefix;
        self.total_squares = prefix as u32;
        self.current_square_fill_progress = if prefix < TOTAL_SQUARES { progress } else { 0.0 };
        self.completed_rows = full_rows as u32;

        let mut seen = BTreeSet::new();
        self.row_bonuses
            .retain(|bonus| bonus.row < full_rows && seen.insert(bonus.row));
        for row in 0..full_rows {
            if !seen.contains(&row) {
                // Due immediately; the next tick rolls it.
                self.row_bonuses.push(RowBonus::spinning(row, 0));
            }
        }
    }
}
