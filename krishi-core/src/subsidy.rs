//! State subsidy matching and the resulting net-benefit calculation.

use crate::profile::{AnalysisResults, Equipment};

/// Residue yield assumed by the subsidy page, tonnes per acre.
pub const RESIDUE_T_PER_ACRE: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateScheme {
    /// Lowercase state name matched as a substring of the location.
    pub state: &'static str,
    pub name: &'static str,
    pub per_ton: f64,
}

pub const STATE_SCHEMES: [StateScheme; 7] = [
    StateScheme { state: "punjab", name: "CRM Subsidy", per_ton: 2_500.0 },
    StateScheme { state: "haryana", name: "HARYANA-Stubble-Cash", per_ton: 2_000.0 },
    StateScheme { state: "uttar pradesh", name: "UP Krishi Anudan", per_ton: 1_800.0 },
    StateScheme { state: "maharashtra", name: "Maha-Agri Biochar Scheme", per_ton: 2_200.0 },
    StateScheme { state: "madhya pradesh", name: "MP Biomass Incentive", per_ton: 1_900.0 },
    StateScheme { state: "rajasthan", name: "Raj-Organic Support", per_ton: 1_700.0 },
    StateScheme { state: "delhi", name: "Delhi Green Policy", per_ton: 1_500.0 },
];

/// What the farmer can actually sell, decided by available equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueProduct {
    BiomassPellets,
    Compost,
    RawCropResidue,
}

impl ResidueProduct {
    pub fn from_equipment(equipment: &[Equipment]) -> Self {
        if equipment.contains(&Equipment::Baler) {
            ResidueProduct::BiomassPellets
        } else if equipment.contains(&Equipment::Rotavator) {
            ResidueProduct::Compost
        } else {
            ResidueProduct::RawCropResidue
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResidueProduct::BiomassPellets => "Biomass Pellets",
            ResidueProduct::Compost => "Compost",
            ResidueProduct::RawCropResidue => "Raw Crop Residue",
        }
    }

    pub fn market_price_per_ton(self) -> f64 {
        match self {
            ResidueProduct::BiomassPellets => 5_800.0,
            ResidueProduct::Compost => 3_000.0,
            ResidueProduct::RawCropResidue => 1_500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsidyAssessment {
    pub scheme: Option<&'static StateScheme>,
    pub subsidy_per_ton: f64,
    pub residue_tons: f64,
    pub total_subsidy: f64,
    pub product: ResidueProduct,
    pub market_income: f64,
    pub total_net_gain: f64,
    /// A scheme matched but the burned field suppressed it for this
    /// calculation. Eligibility is re-evaluated each run; burning is not a
    /// persistent disqualification.
    pub blocked_by_burning: bool,
}

/// Matches the location against the state table and computes the combined
/// subsidy + market benefit.
pub fn assess(
    location: &str,
    field_size_acres: f64,
    burned: bool,
    equipment: &[Equipment],
) -> SubsidyAssessment {
    let location = location.to_lowercase();
    let residue_tons = field_size_acres * RESIDUE_T_PER_ACRE;

    let scheme = STATE_SCHEMES.iter().find(|s| location.contains(s.state));

    let blocked_by_burning = burned && scheme.is_some();
    let subsidy_per_ton = match scheme {
        Some(s) if !burned => s.per_ton,
        _ => 0.0,
    };
    let total_subsidy = subsidy_per_ton * residue_tons;

    let product = ResidueProduct::from_equipment(equipment);
    let market_income = product.market_price_per_ton() * residue_tons;

    SubsidyAssessment {
        scheme,
        subsidy_per_ton,
        residue_tons,
        total_subsidy,
        product,
        market_income,
        total_net_gain: market_income + total_subsidy,
        blocked_by_burning,
    }
}

impl SubsidyAssessment {
    /// Persists this assessment into the profile's accumulated results.
    pub fn apply_to(&self, results: &mut AnalysisResults) {
        results.detected_scheme = self.scheme.map(|s| s.name.to_string());
        results.subsidy_per_ton = Some(self.subsidy_per_ton);
        results.total_subsidy = Some(self.total_subsidy);
        results.market_income = Some(self.market_income);
        results.total_net_gain = Some(self.total_net_gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_state_anywhere_in_location() {
        let a = assess("Village Rajpura, Punjab, India", 2.0, false, &[]);
        assert_eq!(a.scheme.unwrap().name, "CRM Subsidy");
        assert_eq!(a.subsidy_per_ton, 2_500.0);
        assert_eq!(a.total_subsidy, 2_500.0 * 3.0);
    }

    #[test]
    fn unmatched_location_gets_no_subsidy() {
        let a = assess("Thanjavur, Tamil Nadu", 2.0, false, &[]);
        assert_eq!(a.scheme, None);
        assert_eq!(a.total_subsidy, 0.0);
        assert!(!a.blocked_by_burning);
    }

    #[test]
    fn burning_suppresses_subsidy_for_this_run_only() {
        let burned = assess("Karnal, Haryana", 2.0, true, &[]);
        assert!(burned.blocked_by_burning);
        assert_eq!(burned.subsidy_per_ton, 0.0);
        assert_eq!(burned.total_subsidy, 0.0);

        // Same inputs without the burn flag are eligible again.
        let recovered = assess("Karnal, Haryana", 2.0, false, &[]);
        assert_eq!(recovered.subsidy_per_ton, 2_000.0);
    }

    #[test]
    fn product_follows_equipment_priority() {
        assert_eq!(
            ResidueProduct::from_equipment(&[Equipment::Rotavator, Equipment::Baler]),
            ResidueProduct::BiomassPellets
        );
        assert_eq!(
            ResidueProduct::from_equipment(&[Equipment::Rotavator]),
            ResidueProduct::Compost
        );
        assert_eq!(
            ResidueProduct::from_equipment(&[Equipment::Tractor]),
            ResidueProduct::RawCropResidue
        );
    }

    #[test]
    fn net_gain_combines_market_and_subsidy() {
        let a = assess("Ludhiana, Punjab", 2.0, false, &[Equipment::Baler]);
        // 3 tons of pellets at 5800 + 3 tons at 2500
        assert_eq!(a.market_income, 17_400.0);
        assert_eq!(a.total_net_gain, 17_400.0 + 7_500.0);
    }

    #[test]
    fn applies_results_to_profile() {
        let a = assess("Delhi NCR", 1.0, false, &[]);
        let mut results = AnalysisResults::default();
        a.apply_to(&mut results);
        assert_eq!(results.detected_scheme.as_deref(), Some("Delhi Green Policy"));
        assert_eq!(results.total_net_gain, Some(a.total_net_gain));
    }
}
