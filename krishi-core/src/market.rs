//! Buyer suggestions, sale listings, and the profit calculator.

use crate::profile::BestBuyer;
use crate::subsidy::ResidueProduct;
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};
use uuid::Uuid;

/// Residue yield assumed by the buyer page, tonnes per acre.
pub const RESIDUE_T_PER_ACRE: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerOffer {
    pub name: String,
    pub product: String,
    pub price_per_ton: u32,
    pub offers_pickup: bool,
    pub contact: String,
}

/// Synthesizes nearby buyer offers for the farmer's product.
///
/// Offers are derived deterministically from the location string until a
/// live buyer directory is wired in, so repeated searches and tests see the
/// same market.
pub fn suggest_buyers(location: &str, product: ResidueProduct) -> Vec<BuyerOffer> {
    let mut seed = {
        let mut h = DefaultHasher::new();
        location.hash(&mut h);
        h.finish()
    };

    let prefix = location.split(',').next().unwrap_or("Local").trim();
    let prefix = if prefix.is_empty() { "Local" } else { prefix };

    let count = 2 + (next_u64(&mut seed) % 3) as usize; // 2..=4
    (0..count)
        .map(|i| {
            let price_per_ton = 3_000 + (next_u64(&mut seed) % 5_001) as u32; // 3000..=8000
            let offers_pickup = next_u64(&mut seed) % 2 == 0;
            let phone_tail = next_u64(&mut seed) % 900_000_000 + 100_000_000;
            BuyerOffer {
                name: format!("{prefix} Buyer {}", i + 1),
                product: product.label().to_string(),
                price_per_ton,
                offers_pickup,
                contact: format!("+91-9{phone_tail}"),
            }
        })
        .collect()
}

// splitmix64; enough mixing for placeholder market data.
fn next_u64(seed: &mut u64) -> u64 {
    *seed = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *seed;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Highest-priced offer wins.
pub fn best_offer(offers: &[BuyerOffer]) -> Option<&BuyerOffer> {
    offers.iter().max_by_key(|o| o.price_per_ton)
}

/// Projected income from selling the field's residue to the given offer.
pub fn pick_best_buyer(offers: &[BuyerOffer], field_size_acres: f64) -> Option<BestBuyer> {
    let best = best_offer(offers)?;
    let residue_tons = field_size_acres * RESIDUE_T_PER_ACRE;
    Some(BestBuyer {
        name: best.name.clone(),
        price_per_ton: best.price_per_ton as f64,
        estimated_income: residue_tons * best.price_per_ton as f64,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub Uuid);

impl ListingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

/// A residue lot the farmer has put up for sale. Session-scoped, not part of
/// the persisted profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidueListing {
    pub id: ListingId,
    pub name: String,
    pub crop: String,
    pub quantity_tons: f64,
    pub price_per_ton: f64,
    pub location: String,
}

impl ResidueListing {
    pub fn total_value(&self) -> f64 {
        self.quantity_tons * self.price_per_ton
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitEstimate {
    pub revenue: f64,
    pub processing_cost: f64,
    pub profit: f64,
}

pub fn estimate_profit(
    quantity_tons: f64,
    selling_price_per_ton: f64,
    processing_cost_per_ton: f64,
) -> ProfitEstimate {
    let revenue = quantity_tons * selling_price_per_ton;
    let processing_cost = quantity_tons * processing_cost_per_ton;
    ProfitEstimate {
        revenue,
        processing_cost,
        profit: revenue - processing_cost,
    }
}
