use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether the field's crop residue has already been burned.
///
/// Serialized as "Yes"/"No" to stay compatible with existing profile files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldBurned {
    Yes,
    No,
}

impl FieldBurned {
    pub fn is_burned(self) -> bool {
        matches!(self, FieldBurned::Yes)
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Some(FieldBurned::Yes),
            "no" | "n" | "false" => Some(FieldBurned::No),
            _ => None,
        }
    }
}

/// Fixed equipment vocabulary exposed by the profile forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equipment {
    Tractor,
    #[serde(rename = "Happy Seeder")]
    HappySeeder,
    Baler,
    Rotavator,
    #[serde(rename = "Straw Reaper")]
    StrawReaper,
}

impl Equipment {
    pub const ALL: [Equipment; 5] = [
        Equipment::Tractor,
        Equipment::HappySeeder,
        Equipment::Baler,
        Equipment::Rotavator,
        Equipment::StrawReaper,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Equipment::Tractor => "Tractor",
            Equipment::HappySeeder => "Happy Seeder",
            Equipment::Baler => "Baler",
            Equipment::Rotavator => "Rotavator",
            Equipment::StrawReaper => "Straw Reaper",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.label().to_ascii_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilTexture {
    Sandy,
    Loamy,
    Clay,
}

impl SoilTexture {
    pub fn label(self) -> &'static str {
        match self {
            SoilTexture::Sandy => "Sandy",
            SoilTexture::Loamy => "Loamy",
            SoilTexture::Clay => "Clay",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sandy" => Some(SoilTexture::Sandy),
            "loamy" => Some(SoilTexture::Loamy),
            "clay" => Some(SoilTexture::Clay),
            _ => None,
        }
    }
}

/// AI-generated soil improvement plan, as returned by the chat model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SoilPlan {
    #[serde(default)]
    pub top_chemicals: Vec<String>,
    #[serde(default)]
    pub organic_options: Vec<String>,
    #[serde(default)]
    pub warning: String,
    #[serde(default)]
    pub expected_result: String,
}

/// Best buyer pick persisted after a market search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestBuyer {
    pub name: String,
    pub price_per_ton: f64,
    pub estimated_income: f64,
}

/// Outputs accumulated from the independent analysis pages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResults {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soil_issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soil_treatments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_soil_advice: Option<SoilPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsidy_per_ton: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_subsidy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_net_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_buyer: Option<BestBuyer>,
}

/// The single persisted document describing one farmer's field and
/// accumulated analysis outputs.
///
/// Every attribute is optional: profiles are built up incrementally across
/// pages and conversational turns, and older files may predate newer fields.
/// Unknown keys round-trip through `extra` instead of being dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FarmerProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burned: Option<FieldBurned>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<Equipment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<SoilTexture>,
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub nitrogen: Option<f64>,
    #[serde(rename = "P", default, skip_serializing_if = "Option::is_none")]
    pub phosphorus: Option<f64>,
    #[serde(rename = "K", default, skip_serializing_if = "Option::is_none")]
    pub potassium: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_results: Option<AnalysisResults>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl FarmerProfile {
    pub fn is_burned(&self) -> bool {
        self.burned.map(FieldBurned::is_burned).unwrap_or(false)
    }

    pub fn field_size_acres(&self) -> f64 {
        self.field_size.unwrap_or(1.0)
    }

    pub fn analysis_results_mut(&mut self) -> &mut AnalysisResults {
        self.analysis_results.get_or_insert_with(AnalysisResults::default)
    }

    /// Applies a conversational update extracted from a chat response.
    ///
    /// The model is not contractually bound to our schema, so values are
    /// coerced tolerantly: numbers may arrive as strings, equipment as a
    /// single name or a list, burned in any casing. Recognized keys with
    /// unusable values are skipped; unrecognized keys are preserved in
    /// `extra` rather than dropped.
    pub fn merge_update(&mut self, update: &Value) {
        let Some(fields) = update.as_object() else {
            return;
        };

        for (key, value) in fields {
            match key.as_str() {
                "location" => {
                    if let Some(s) = non_empty_str(value) {
                        self.location = Some(s);
                    }
                }
                "crop" => {
                    if let Some(s) = non_empty_str(value) {
                        self.crop = Some(s);
                    }
                }
                "field_size" => {
                    if let Some(n) = lenient_f64(value) {
                        self.field_size = Some(n);
                    }
                }
                "burned" => {
                    if let Some(b) = value.as_str().and_then(FieldBurned::parse) {
                        self.burned = Some(b);
                    }
                }
                "equipment" => {
                    let parsed = parse_equipment(value);
                    if !parsed.is_empty() {
                        self.equipment = parsed;
                    }
                }
                "ph" => self.ph = lenient_f64(value).or(self.ph),
                "ec" => self.ec = lenient_f64(value).or(self.ec),
                "oc" => self.oc = lenient_f64(value).or(self.oc),
                "moisture" => self.moisture = lenient_f64(value).or(self.moisture),
                "texture" => {
                    if let Some(t) = value.as_str().and_then(SoilTexture::parse) {
                        self.texture = Some(t);
                    }
                }
                "N" => self.nitrogen = lenient_f64(value).or(self.nitrogen),
                "P" => self.phosphorus = lenient_f64(value).or(self.phosphorus),
                "K" => self.potassium = lenient_f64(value).or(self.potassium),
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_equipment(value: &Value) -> Vec<Equipment> {
    let names: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => vec![s.as_str()],
        _ => vec![],
    };

    let mut out = Vec::new();
    for name in names {
        if let Some(e) = Equipment::from_label(name) {
            if !out.contains(&e) {
                out.push(e);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trips_legacy_file_layout() {
        let raw = r#"{
            "location": "Karnal, Haryana",
            "crop": "Rice",
            "field_size": 3.5,
            "burned": "No",
            "equipment": ["Baler", "Happy Seeder"],
            "ph": 6.5,
            "N": 280.0,
            "some_future_key": {"nested": true}
        }"#;

        let profile: FarmerProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.crop.as_deref(), Some("Rice"));
        assert_eq!(profile.burned, Some(FieldBurned::No));
        assert_eq!(
            profile.equipment,
            vec![Equipment::Baler, Equipment::HappySeeder]
        );
        assert!(profile.extra.contains_key("some_future_key"));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["burned"], "No");
        assert_eq!(back["equipment"][1], "Happy Seeder");
        assert_eq!(back["N"], 280.0);
        assert_eq!(back["some_future_key"]["nested"], true);
    }

    #[test]
    fn merge_applies_known_fields() {
        let mut profile = FarmerProfile::default();
        profile.merge_update(&json!({
            "location": "Ludhiana, Punjab",
            "crop": "Wheat",
            "field_size": 4.0,
            "burned": "No",
            "equipment": ["Tractor", "Baler"]
        }));

        assert_eq!(profile.location.as_deref(), Some("Ludhiana, Punjab"));
        assert_eq!(profile.crop.as_deref(), Some("Wheat"));
        assert_eq!(profile.field_size, Some(4.0));
        assert_eq!(profile.burned, Some(FieldBurned::No));
        assert_eq!(profile.equipment, vec![Equipment::Tractor, Equipment::Baler]);
    }

    #[test]
    fn merge_coerces_loose_types() {
        let mut profile = FarmerProfile::default();
        profile.merge_update(&json!({
            "field_size": "2.5",
            "burned": "YES",
            "equipment": "rotavator"
        }));

        assert_eq!(profile.field_size, Some(2.5));
        assert_eq!(profile.burned, Some(FieldBurned::Yes));
        assert_eq!(profile.equipment, vec![Equipment::Rotavator]);
    }

    #[test]
    fn merge_keeps_unknown_keys_in_extra() {
        let mut profile = FarmerProfile::default();
        profile.merge_update(&json!({"irrigation": "drip"}));
        assert_eq!(profile.extra["irrigation"], "drip");
    }

    #[test]
    fn merge_skips_unusable_values_without_clearing_existing() {
        let mut profile = FarmerProfile {
            field_size: Some(3.0),
            ..FarmerProfile::default()
        };
        profile.merge_update(&json!({"field_size": "about four", "burned": "maybe"}));
        assert_eq!(profile.field_size, Some(3.0));
        assert_eq!(profile.burned, None);
    }

    #[test]
    fn merge_ignores_non_object_updates() {
        let mut profile = FarmerProfile::default();
        profile.merge_update(&json!("just a string"));
        assert_eq!(profile, FarmerProfile::default());
    }
}
