//! # Cart
//!
//! The sale being rung up.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Operation              Cart Change            │
//! │  ───────────────          ─────────              ───────────            │
//! │                                                                         │
//! │  Pick item ──────────────► add_line() ─────────► merge or push snapshot │
//! │                                                                         │
//! │  Type quantity ──────────► set_quantity() ─────► qty = n (≤ 0 removes)  │
//! │                                                                         │
//! │  +/- buttons ────────────► adjust_quantity() ──► qty += d (≤ 0 removes) │
//! │                                                                         │
//! │  Remove ─────────────────► remove_line() ──────► lines.remove(i)        │
//! │                                                                         │
//! │  Clear / checkout ───────► clear() ────────────► lines.clear()          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per item id
//! - Every line has quantity > 0

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{CartLine, CartSummary, Item};
use crate::validation::{validate_quantity, validate_quantity_delta};

/// Ordered cart lines. Serializes as a plain JSON array; reading one back
/// goes through `From<Vec<CartLine>>`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of an item, merging into an existing line by id.
    ///
    /// A merged line keeps the rates snapshotted when it was first added.
    pub fn add_line(&mut self, item: &Item, quantity: f64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.id == item.id) {
            line.quantity += quantity;
            return Ok(());
        }

        self.lines.push(CartLine::from_item(item, quantity));
        Ok(())
    }

    /// Removes the line for an item.
    pub fn remove_line(&mut self, id: u64) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.id != id);

        if self.lines.len() == initial_len {
            Err(CoreError::NotInCart(id))
        } else {
            Ok(())
        }
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn set_quantity(&mut self, id: u64, quantity: f64) -> CoreResult<()> {
        validate_quantity_delta(quantity)?;

        if quantity <= 0.0 {
            return self.remove_line(id);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(CoreError::NotInCart(id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Changes a line's quantity by `delta`. A result of zero or less
    /// removes the line.
    pub fn adjust_quantity(&mut self, id: u64, delta: f64) -> CoreResult<()> {
        validate_quantity_delta(delta)?;

        let current = self
            .lines
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.quantity)
            .ok_or(CoreError::NotInCart(id))?;

        self.set_quantity(id, current + delta)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Running totals, unrounded. Only display rounds.
    pub fn summary(&self) -> CartSummary {
        let total_amount: f64 = self.lines.iter().map(CartLine::amount).sum();
        let total_cost: f64 = self.lines.iter().map(CartLine::cost).sum();

        CartSummary {
            line_count: self.lines.len(),
            total_quantity: self.lines.iter().map(|l| l.quantity).sum(),
            total_amount,
            total_cost,
            total_profit: total_amount - total_cost,
        }
    }
}

impl From<Vec<CartLine>> for Cart {
    /// Rebuilds a cart from stored lines, dropping lines that break the
    /// cart's invariants.
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            if !line.quantity.is_finite() || line.quantity <= 0.0 {
                continue;
            }
            match cart.lines.iter_mut().find(|l| l.id == line.id) {
                Some(existing) => existing.quantity += line.quantity,
                None => cart.lines.push(line),
            }
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
