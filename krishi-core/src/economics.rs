//! Residue monetization economics.
//!
//! Every figure here is a fixed rupee constant; the "engine" is arithmetic
//! over the farm's residue tonnage. Constants track the rates published in
//! the advisory content and are revised with it, not computed.

/// Residue yield assumed by the economic pages, tonnes per acre.
///
/// Other modules use different factors on purpose; the advisory pages were
/// never unified on a single number.
pub const RESIDUE_T_PER_ACRE: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Residue is sold or converted into a product with market value.
    Income,
    /// Residue offsets an input cost (e.g. fertilizer) instead of earning.
    Savings,
}

/// Cost/value profile of one residue management strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyProfile {
    pub name: &'static str,
    /// One-time setup cost, rupees.
    pub setup_cost: f64,
    pub labor_per_ton: f64,
    pub transport_per_ton: f64,
    pub value_per_ton: f64,
    pub kind: ValueKind,
    pub reason: &'static str,
}

pub const STRATEGIES: [StrategyProfile; 4] = [
    StrategyProfile {
        name: "Biochar Production",
        setup_cost: 45_000.0,
        labor_per_ton: 800.0,
        transport_per_ton: 1_200.0,
        value_per_ton: 12_000.0,
        kind: ValueKind::Income,
        reason: "Highest market value per ton through carbon-rich soil enhancement.",
    },
    StrategyProfile {
        name: "Pellet Manufacturing",
        setup_cost: 180_000.0,
        labor_per_ton: 600.0,
        transport_per_ton: 1_000.0,
        value_per_ton: 6_500.0,
        kind: ValueKind::Income,
        reason: "Stable demand for industrial fuel and high volume reduction.",
    },
    StrategyProfile {
        name: "Compost Making",
        setup_cost: 8_000.0,
        labor_per_ton: 1_000.0,
        transport_per_ton: 400.0,
        value_per_ton: 3_400.0,
        kind: ValueKind::Income,
        reason: "Low initial investment and excellent project for local organic farming.",
    },
    StrategyProfile {
        name: "Direct Incorporation",
        setup_cost: 35_000.0,
        labor_per_ton: 1_200.0,
        transport_per_ton: 0.0, // done on field
        value_per_ton: 3_200.0,
        kind: ValueKind::Savings,
        reason: "Restores soil health directly and eliminates transportation logistics.",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyEconomics {
    pub name: &'static str,
    pub labor_cost: f64,
    pub transport_cost: f64,
    pub setup_cost: f64,
    pub annual_net: f64,
    pub roi_pct: f64,
    /// Seasons until the setup cost is recovered; `None` when the strategy
    /// never pays back at this scale.
    pub payback_seasons: Option<f64>,
    pub reason: &'static str,
}

/// Evaluates every strategy for the given field size.
pub fn evaluate_strategies(field_size_acres: f64) -> Vec<StrategyEconomics> {
    let residue_tons = field_size_acres * RESIDUE_T_PER_ACRE;

    STRATEGIES
        .iter()
        .map(|s| {
            let total_value = s.value_per_ton * residue_tons;
            let labor_cost = s.labor_per_ton * residue_tons;
            let transport_cost = s.transport_per_ton * residue_tons;
            let annual_net = total_value - labor_cost - transport_cost;

            let roi_pct = if s.setup_cost > 0.0 {
                annual_net / s.setup_cost * 100.0
            } else {
                0.0
            };

            let payback_seasons = (annual_net > 0.0).then(|| s.setup_cost / annual_net);

            StrategyEconomics {
                name: s.name,
                labor_cost,
                transport_cost,
                setup_cost: s.setup_cost,
                annual_net,
                roi_pct,
                payback_seasons,
                reason: s.reason,
            }
        })
        .collect()
}

/// The strategy with the highest annual net, if any were evaluated.
pub fn best_strategy(evaluated: &[StrategyEconomics]) -> Option<&StrategyEconomics> {
    evaluated
        .iter()
        .max_by(|a, b| a.annual_net.total_cmp(&b.annual_net))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BurnVsSell {
    pub residue_tons: f64,
    pub burning_fine: f64,
    pub nutrient_loss: f64,
    pub total_burning_loss: f64,
    pub gross_revenue: f64,
    pub labor_cost: f64,
    pub transport_cost: f64,
    pub total_selling_profit: f64,
}

impl BurnVsSell {
    /// Rupees gained this season by selling instead of burning.
    pub fn selling_advantage(&self) -> f64 {
        self.total_selling_profit + self.total_burning_loss
    }
}

const BURNING_FINE_PER_ACRE: f64 = 2_500.0;
const NUTRIENT_LOSS_PER_TON: f64 = 1_500.0;
const MARKET_PRICE_PER_TON: f64 = 4_500.0;
const SELLING_LABOR_PER_TON: f64 = 1_200.0;
const TRANSPORT_PER_KM_TON: f64 = 20.0;

/// Compares the full cost of burning against the profit of selling.
///
/// Transport distance is a stand-in derived from the location string until a
/// real distance lookup is wired in.
pub fn burn_vs_sell(field_size_acres: f64, location: &str) -> BurnVsSell {
    let residue_tons = field_size_acres * RESIDUE_T_PER_ACRE;

    let burning_fine = BURNING_FINE_PER_ACRE * field_size_acres;
    let nutrient_loss = NUTRIENT_LOSS_PER_TON * residue_tons;

    let gross_revenue = MARKET_PRICE_PER_TON * residue_tons;
    let labor_cost = SELLING_LABOR_PER_TON * residue_tons;
    let transport_km = (location.chars().count() % 50) as f64;
    let transport_cost = transport_km * TRANSPORT_PER_KM_TON * residue_tons;

    BurnVsSell {
        residue_tons,
        burning_fine,
        nutrient_loss,
        total_burning_loss: burning_fine + nutrient_loss,
        gross_revenue,
        labor_cost,
        transport_cost,
        total_selling_profit: gross_revenue - labor_cost - transport_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biochar_wins_on_annual_net() {
        let evaluated = evaluate_strategies(2.0);
        let best = best_strategy(&evaluated).unwrap();
        assert_eq!(best.name, "Biochar Production");
        // 5 tons * (12000 - 800 - 1200) = 50000
        assert_eq!(best.annual_net, 50_000.0);
    }

    #[test]
    fn payback_is_none_when_never_profitable() {
        let evaluated = evaluate_strategies(0.0);
        for e in &evaluated {
            assert_eq!(e.annual_net, 0.0);
            assert_eq!(e.payback_seasons, None);
        }
    }

    #[test]
    fn roi_scales_with_field_size() {
        let small = evaluate_strategies(1.0);
        let large = evaluate_strategies(10.0);
        assert!(large[0].roi_pct > small[0].roi_pct);
    }

    #[test]
    fn selling_beats_burning_for_typical_farm() {
        let cmp = burn_vs_sell(2.0, "Karnal, Haryana");
        assert!(cmp.total_selling_profit > 0.0);
        assert!(cmp.total_burning_loss > 0.0);
        assert!(cmp.selling_advantage() > cmp.total_selling_profit);
    }

    #[test]
    fn burning_loss_combines_fine_and_nutrients() {
        let cmp = burn_vs_sell(2.0, "x");
        // fine 2500*2 + nutrient 1500*5
        assert_eq!(cmp.total_burning_loss, 5_000.0 + 7_500.0);
    }
}
