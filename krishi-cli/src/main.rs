use std::path::PathBuf;
use std::sync::Arc;

use krishi_core::language::{SOURCE_LANGUAGE, code_for_name};
use krishi_core::profile::{Equipment, FarmerProfile, FieldBurned};
use krishi_core::{economics, market, soil, subsidy};
use krishi_engine::conversation::ConversationEngine;
use krishi_engine::traits::{
    AudioClip, ChatProvider, ChatTurn, SpeechSynthesizer, SpokenAudio, Transcriber,
    TranslationProvider,
};
use krishi_providers::sarvam::SarvamConfig;
use krishi_runtime::profile_store::ProfileStore;
use krishi_runtime::sarvam::{SarvamChatProvider, SarvamSttProvider, SarvamTtsProvider};
use krishi_runtime::secrets::{SecretKey, get_secret};
use krishi_runtime::translation_cache::TranslationCache;

/// Offline chat stand-in so the demo runs end to end without an API key.
struct MockChat;

#[async_trait::async_trait]
impl ChatProvider for MockChat {
    async fn complete(&self, system_prompt: &str, _history: &[ChatTurn]) -> anyhow::Result<String> {
        if system_prompt.contains("soil scientist") {
            return Ok("Here you go: {\"top_chemicals\": [\"Urea\", \"MOP\"], \
                \"organic_options\": [\"Vermicompost\"], \
                \"warning\": \"Re-test after one season\", \
                \"expected_result\": \"Balanced N-P-K within a season\"}"
                .to_string());
        }
        Ok("Thanks! I noted your farm details. How many acres do you cultivate? \
            <data>{\"location\": \"Karnal, Haryana\", \"crop\": \"Rice\"}</data>"
            .to_string())
    }
}

struct MockTranscriber;

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio: &AudioClip,
        _language: &str,
    ) -> anyhow::Result<Option<String>> {
        Ok(Some(
            "My farm is in Karnal in Haryana and I grow rice".to_string(),
        ))
    }
}

struct MockSynthesizer;

#[async_trait::async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, _language: &str) -> anyhow::Result<SpokenAudio> {
        Ok(SpokenAudio { mime_type: "audio/mpeg".into(), bytes: text.as_bytes().to_vec() })
    }
}

/// Echo translator backing the cache when no key is configured.
struct MockTranslation;

#[async_trait::async_trait]
impl TranslationProvider for MockTranslation {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> anyhow::Result<String> {
        Ok(format!("[{target_language}] {text}"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Demo behavior: run the advisory calculations over the stored profile,
    // then one voice-style conversation turn. Without SARVAM_API_KEY the
    // provider calls are mocked and nothing touches the network.
    let data_dir = std::env::var("KRISHI_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("krishi-data"));
    let language = std::env::var("KRISHI_LANGUAGE")
        .ok()
        .and_then(|name| code_for_name(&name).map(str::to_string))
        .unwrap_or_else(|| SOURCE_LANGUAGE.to_string());

    let store = ProfileStore::at_path(data_dir.join("farmer_data.json"));
    let mut profile = store.load();
    if profile.location.is_none() {
        profile = demo_profile();
        store.save(&profile)?;
        println!("seeded demo profile at {}", store.path().display());
    }

    let sarvam_key = match get_secret(SecretKey::SarvamApiKey) {
        Ok(key) => key.unwrap_or_default(),
        Err(e) => {
            log::warn!("keyring unavailable, falling back to mock providers: {e:#}");
            String::new()
        }
    };

    let chat: Arc<dyn ChatProvider> = if sarvam_key.is_empty() {
        println!("SARVAM_API_KEY not set, using mock providers");
        Arc::new(MockChat)
    } else {
        Arc::new(SarvamChatProvider::new(SarvamConfig::new(sarvam_key.clone())))
    };

    print_advisories(&store, &mut profile, chat.as_ref()).await?;

    let translation: Arc<dyn TranslationProvider> = if sarvam_key.is_empty() {
        Arc::new(MockTranslation)
    } else {
        Arc::new(krishi_runtime::sarvam::SarvamTranslationProvider::new(
            SarvamConfig::new(sarvam_key.clone()),
        ))
    };
    let translator = Arc::new(TranslationCache::open(
        data_dir.join("translation_cache.json"),
        translation,
    ));

    let mut engine = if sarvam_key.is_empty() {
        ConversationEngine::new(
            language,
            chat,
            translator,
            Arc::new(MockTranscriber),
            Arc::new(MockSynthesizer),
            Arc::new(store.clone()),
        )
    } else {
        let cfg = SarvamConfig::new(sarvam_key);
        ConversationEngine::new(
            language,
            chat,
            translator,
            Arc::new(SarvamSttProvider::new(cfg.clone())),
            Arc::new(SarvamTtsProvider::new(cfg)),
            Arc::new(store.clone()),
        )
    };

    let greeting = engine.greet().await;
    println!("\nassistant: {}", greeting.reply_text.unwrap_or_default());

    let clip = AudioClip { mime_type: "audio/wav".into(), bytes: vec![0u8; 1024] };
    let outcome = engine.run_turn(clip).await;
    println!("heard:     {}", outcome.transcript.unwrap_or_default());
    println!("assistant: {}", outcome.reply_text.unwrap_or_default());
    if let Some(update) = &outcome.applied_update {
        println!("profile update applied: {update}");
    }
    println!(
        "stage={:?} turns={} timings: stt={:?}ms chat={:?}ms tts={:?}ms",
        outcome.stage,
        engine.turn_count(),
        outcome.timings.transcription_ms,
        outcome.timings.chat_ms,
        outcome.timings.synthesis_ms,
    );

    Ok(())
}

fn demo_profile() -> FarmerProfile {
    let mut profile = FarmerProfile::default();
    profile.location = Some("Karnal, Haryana".into());
    profile.crop = Some("Rice".into());
    profile.field_size = Some(5.0);
    profile.burned = Some(FieldBurned::No);
    profile.equipment = vec![Equipment::HappySeeder, Equipment::Baler];
    profile
}

async fn print_advisories(
    store: &ProfileStore,
    profile: &mut FarmerProfile,
    chat: &dyn ChatProvider,
) -> anyhow::Result<()> {
    let acres = profile.field_size_acres();
    let location = profile.location.clone().unwrap_or_default();

    let report = soil::SoilReport::from_profile(profile);
    let diagnosis = soil::diagnose(&report);
    if diagnosis.is_healthy() {
        println!("soil: healthy");
    } else {
        println!("soil issues: {}", diagnosis.issues.join(", "));
        println!("treatments:  {}", diagnosis.treatments.join(", "));
    }

    let plan = match chat
        .complete(soil::ADVICE_SYSTEM_PROMPT, &[ChatTurn::user(soil::advice_prompt(&report))])
        .await
    {
        Ok(reply) => soil::parse_soil_plan(&reply),
        Err(e) => {
            log::warn!("AI soil plan unavailable: {e:#}");
            None
        }
    };
    if let Some(plan) = &plan {
        println!("AI chemicals: {}", plan.top_chemicals.join(", "));
        println!("AI organics:  {}", plan.organic_options.join(", "));
        if !plan.warning.is_empty() {
            println!("AI warning:   {}", plan.warning);
        }
    } else {
        println!("AI soil plan unavailable");
    }
    diagnosis.apply_to(plan, profile.analysis_results_mut());
    let snapshot = soil::residue_snapshot(acres);
    println!(
        "residue: {:.1} t, CO2 saved if not burned: {:.2} t (worth Rs {:.0})",
        snapshot.residue_tons, snapshot.co2_saved_tons, snapshot.carbon_value_rupees
    );

    let evaluated = economics::evaluate_strategies(acres);
    if let Some(best) = economics::best_strategy(&evaluated) {
        println!(
            "best residue strategy: {} (annual net Rs {:.0}, ROI {:.0}%)",
            best.name, best.annual_net, best.roi_pct
        );
    }

    let comparison = economics::burn_vs_sell(acres, &location);
    println!(
        "selling beats burning by Rs {:.0} this season",
        comparison.selling_advantage()
    );

    let assessment = subsidy::assess(&location, acres, profile.is_burned(), &profile.equipment);
    match assessment.scheme {
        Some(scheme) if !assessment.blocked_by_burning => println!(
            "subsidy: {} at Rs {:.0}/t, total Rs {:.0}",
            scheme.name, assessment.subsidy_per_ton, assessment.total_subsidy
        ),
        Some(scheme) => println!(
            "subsidy: {} matched but withheld because the field was burned",
            scheme.name
        ),
        None => println!("subsidy: no scheme for this location"),
    }

    let offers = market::suggest_buyers(&location, assessment.product);
    if let Some(best) = market::pick_best_buyer(&offers, acres) {
        println!(
            "best buyer: {} at Rs {:.0}/t (est. income Rs {:.0})",
            best.name, best.price_per_ton, best.estimated_income
        );
        let results = profile.analysis_results_mut();
        assessment.apply_to(results);
        results.best_buyer = Some(best);
    }

    store.save(profile)?;
    Ok(())
}
