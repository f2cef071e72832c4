//! Token usage and cost accounting

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use crate::provider::ResponseUsage;
use crate::provider::catalog::TokenPrice;

const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;

/// Token counts and derived cost, summed across rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    /// USD
    pub cost: f64,
}

impl Usage {
    /// Usage for one round; a response without usage counts as zero
    pub fn from_response(usage: Option<ResponseUsage>, price: TokenPrice) -> Self {
        let ResponseUsage {
            prompt_tokens,
            completion_tokens,
        } = usage.unwrap_or_default();
        Self {
            prompt_tokens,
            completion_tokens,
            cost: cost_of(price, prompt_tokens, completion_tokens),
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Cost in USD of a token count at the given per-million prices
pub fn cost_of(price: TokenPrice, prompt_tokens: u64, completion_tokens: u64) -> f64 {
    (price.prompt * prompt_tokens as f64) / TOKENS_PER_PRICE_UNIT
        + (price.completion * completion_tokens as f64) / TOKENS_PER_PRICE_UNIT
}

impl Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens + rhs.prompt_tokens,
            completion_tokens: self.completion_tokens + rhs.completion_tokens,
            cost: self.cost + rhs.cost,
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Usage) {
        *self = *self + rhs;
    }
}

impl Sum for Usage {
    fn sum<I: Iterator<Item = Usage>>(iter: I) -> Usage {
        iter.fold(Usage::default(), Add::add)
    }
}
