//! Threshold-based soil diagnosis and the home-page residue snapshot.

use crate::profile::{AnalysisResults, FarmerProfile, SoilPlan, SoilTexture};

/// A soil test reading with the defaults the input form pre-fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilReport {
    pub ph: f64,
    pub ec: f64,
    pub organic_carbon_pct: f64,
    pub moisture_pct: f64,
    pub texture: SoilTexture,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub burned: bool,
}

impl SoilReport {
    /// Builds a report from whatever soil values the profile has, filling
    /// gaps with the form defaults.
    pub fn from_profile(profile: &FarmerProfile) -> Self {
        Self {
            ph: profile.ph.unwrap_or(6.5),
            ec: profile.ec.unwrap_or(0.5),
            organic_carbon_pct: profile.oc.unwrap_or(0.5),
            moisture_pct: profile.moisture.unwrap_or(20.0),
            texture: profile.texture.unwrap_or(SoilTexture::Loamy),
            nitrogen: profile.nitrogen.unwrap_or(280.0),
            phosphorus: profile.phosphorus.unwrap_or(20.0),
            potassium: profile.potassium.unwrap_or(180.0),
            burned: profile.is_burned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SoilDiagnosis {
    pub issues: Vec<String>,
    pub treatments: Vec<String>,
}

impl SoilDiagnosis {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }

    /// Persists this diagnosis and the optional AI plan into the profile's
    /// accumulated results. A missing plan leaves previously stored advice
    /// in place.
    pub fn apply_to(&self, plan: Option<SoilPlan>, results: &mut AnalysisResults) {
        results.soil_issues = self.issues.clone();
        results.soil_treatments = self.treatments.clone();
        if plan.is_some() {
            results.ai_soil_advice = plan;
        }
    }
}

const PH_ACIDIC_BELOW: f64 = 6.0;
const PH_ALKALINE_ABOVE: f64 = 8.0;
const NITROGEN_DEFICIENT_BELOW: f64 = 280.0;
const PHOSPHORUS_DEFICIENT_BELOW: f64 = 20.0;
const POTASSIUM_DEFICIENT_BELOW: f64 = 180.0;

/// Flags out-of-range readings and pairs each with a treatment.
///
/// A burned field gets a carbon restoration treatment even when every
/// reading is in range.
pub fn diagnose(report: &SoilReport) -> SoilDiagnosis {
    let mut issues = Vec::new();
    let mut treatments = Vec::new();

    if report.ph < PH_ACIDIC_BELOW {
        issues.push("Acidic soil".to_string());
        treatments.push("Apply Agricultural Lime".to_string());
    } else if report.ph > PH_ALKALINE_ABOVE {
        issues.push("Alkaline soil".to_string());
        treatments.push("Apply Gypsum + Organic Matter".to_string());
    }

    if report.nitrogen < NITROGEN_DEFICIENT_BELOW {
        issues.push("Nitrogen deficiency".to_string());
        treatments.push("Urea or Ammonium Sulphate".to_string());
    }

    if report.phosphorus < PHOSPHORUS_DEFICIENT_BELOW {
        issues.push("Phosphorus deficiency".to_string());
        treatments.push("DAP or SSP".to_string());
    }

    if report.potassium < POTASSIUM_DEFICIENT_BELOW {
        issues.push("Potassium deficiency".to_string());
        treatments.push("MOP (Potash)".to_string());
    }

    if report.burned {
        treatments.push("Biochar + Compost to restore carbon".to_string());
    }

    treatments.dedup();

    SoilDiagnosis { issues, treatments }
}

pub const ADVICE_SYSTEM_PROMPT: &str = "You are a soil scientist powered by Sarvam AI.";

/// Builds the prompt asking the chat model for an optimized fertilizer plan
/// matching the [`SoilPlan`] JSON shape.
pub fn advice_prompt(report: &SoilReport) -> String {
    format!(
        "Soil Report:\n\
         pH={}, EC={}, OC={}, Texture={}\n\
         N={}, P={}, K={}\n\
         Field burned={}\n\
         \n\
         Recommend BEST fertilizers/chemicals available in India.\n\
         Return ONLY JSON:\n\
         {{\n\
          \"top_chemicals\": [\"name1\",\"name2\"],\n\
          \"organic_options\": [\"opt1\",\"opt2\"],\n\
          \"warning\": \"any risks\",\n\
          \"expected_result\": \"impact\"\n\
         }}",
        report.ph,
        report.ec,
        report.organic_carbon_pct,
        report.texture.label(),
        report.nitrogen,
        report.phosphorus,
        report.potassium,
        if report.burned { "Yes" } else { "No" },
    )
}

/// Pulls a [`SoilPlan`] out of a free-text chat reply.
///
/// The model is asked for bare JSON but routinely wraps it in prose, so the
/// reply is sliced from the first `{` to the last `}` before decoding.
/// Anything unparseable yields `None`; the advice is optional wherever it
/// is consumed.
pub fn parse_soil_plan(reply: &str) -> Option<SoilPlan> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}

/// Quick residue/carbon metrics shown after the home-page analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidueSnapshot {
    pub residue_tons: f64,
    pub co2_saved_tons: f64,
    pub carbon_value_rupees: f64,
}

const RESIDUE_T_PER_ACRE: f64 = 2.5;
const CO2_PER_RESIDUE_TON: f64 = 1.46;
const RUPEES_PER_CO2_TON: f64 = 5.0;

pub fn residue_snapshot(field_size_acres: f64) -> ResidueSnapshot {
    let residue_tons = field_size_acres * RESIDUE_T_PER_ACRE;
    let co2_saved_tons = residue_tons * CO2_PER_RESIDUE_TON;
    ResidueSnapshot {
        residue_tons,
        co2_saved_tons,
        carbon_value_rupees: co2_saved_tons * RUPEES_PER_CO2_TON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> SoilReport {
        SoilReport {
            ph: 6.5,
            ec: 0.5,
            organic_carbon_pct: 0.5,
            moisture_pct: 20.0,
            texture: SoilTexture::Loamy,
            nitrogen: 300.0,
            phosphorus: 25.0,
            potassium: 200.0,
            burned: false,
        }
    }

    #[test]
    fn healthy_soil_has_no_issues() {
        let d = diagnose(&baseline());
        assert!(d.is_healthy());
        assert!(d.treatments.is_empty());
    }

    #[test]
    fn acidic_soil_gets_lime() {
        let d = diagnose(&SoilReport { ph: 5.2, ..baseline() });
        assert_eq!(d.issues, vec!["Acidic soil"]);
        assert_eq!(d.treatments, vec!["Apply Agricultural Lime"]);
    }

    #[test]
    fn multiple_deficiencies_stack() {
        let d = diagnose(&SoilReport {
            ph: 8.5,
            nitrogen: 100.0,
            potassium: 50.0,
            ..baseline()
        });
        assert_eq!(
            d.issues,
            vec!["Alkaline soil", "Nitrogen deficiency", "Potassium deficiency"]
        );
        assert_eq!(d.treatments.len(), 3);
    }

    #[test]
    fn burned_field_gets_carbon_restoration_even_when_healthy() {
        let d = diagnose(&SoilReport { burned: true, ..baseline() });
        assert!(d.issues.is_empty());
        assert_eq!(d.treatments, vec!["Biochar + Compost to restore carbon"]);
    }

    #[test]
    fn advice_prompt_embeds_the_report() {
        let p = advice_prompt(&SoilReport { ph: 5.2, burned: true, ..baseline() });
        assert!(p.contains("pH=5.2"));
        assert!(p.contains("Texture=Loamy"));
        assert!(p.contains("N=300, P=25, K=200"));
        assert!(p.contains("Field burned=Yes"));
        assert!(p.contains("Return ONLY JSON"));
    }

    #[test]
    fn plan_is_sliced_out_of_surrounding_prose() {
        let reply = "Here is my recommendation:\n\
            {\"top_chemicals\": [\"Urea\", \"SSP\"],\n\
             \"organic_options\": [\"Vermicompost\"],\n\
             \"warning\": \"Do not over-apply urea\",\n\
             \"expected_result\": \"Yield recovery in one season\"}\n\
            Good luck!";
        let plan = parse_soil_plan(reply).unwrap();
        assert_eq!(plan.top_chemicals, vec!["Urea", "SSP"]);
        assert_eq!(plan.warning, "Do not over-apply urea");
    }

    #[test]
    fn plan_with_missing_fields_defaults_them() {
        let plan = parse_soil_plan(r#"{"top_chemicals": ["DAP"]}"#).unwrap();
        assert_eq!(plan.top_chemicals, vec!["DAP"]);
        assert!(plan.organic_options.is_empty());
        assert!(plan.expected_result.is_empty());
    }

    #[test]
    fn unusable_replies_yield_no_plan() {
        assert_eq!(parse_soil_plan("AI unavailable."), None);
        assert_eq!(parse_soil_plan("} backwards {"), None);
        assert_eq!(parse_soil_plan("{not json}"), None);
    }

    #[test]
    fn apply_persists_diagnosis_and_keeps_old_advice_without_a_plan() {
        let d = diagnose(&SoilReport { ph: 5.2, ..baseline() });
        let mut results = AnalysisResults::default();

        let plan = SoilPlan { top_chemicals: vec!["Lime".into()], ..Default::default() };
        d.apply_to(Some(plan.clone()), &mut results);
        assert_eq!(results.soil_issues, vec!["Acidic soil"]);
        assert_eq!(results.ai_soil_advice, Some(plan.clone()));

        d.apply_to(None, &mut results);
        assert_eq!(results.ai_soil_advice, Some(plan));
    }

    #[test]
    fn snapshot_applies_fixed_factors() {
        let s = residue_snapshot(2.0);
        assert_eq!(s.residue_tons, 5.0);
        assert!((s.co2_saved_tons - 7.3).abs() < 1e-9);
        assert!((s.carbon_value_rupees - 36.5).abs() < 1e-9);
    }
}
