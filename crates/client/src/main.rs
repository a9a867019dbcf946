//! saveforge - backend smoke client.
//!
//! Checks that the editor backend is reachable and, given a save path, loads
//! it and prints the character basics.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saveforge_client::editors::abilities::AbilityScoresView;
use saveforge_client::state::LoadOptions;
use saveforge_client::{App, ClientConfig};
use saveforge_domain::{calculate_modifier, format_modifier, Ability, SubsystemName};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "saveforge_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().context("reading configuration")?;
    tracing::info!(backend = ?config.backend, prefix = %config.api_prefix, "Starting saveforge");

    let app = App::from_config(&config).context("resolving backend")?;

    let health = app
        .api
        .session()
        .health()
        .await
        .context("backend health check")?;
    tracing::info!(status = %health.status, version = ?health.version, "Backend reachable");

    let Some(save_path) = std::env::args().nth(1) else {
        return Ok(());
    };

    let character = app
        .character
        .open_save(&save_path)
        .await
        .with_context(|| format!("loading {}", save_path))?;
    println!(
        "{} - {} (level {}), {} gp",
        character.name,
        character.class_line(),
        character.total_level(),
        character.gold
    );

    let state = app
        .cache
        .load(SubsystemName::AbilityScores, LoadOptions::default())
        .await;
    if let Some(error) = state.error {
        anyhow::bail!("loading ability scores: {}", error);
    }
    if let Some(Ok(scores)) = state.typed::<AbilityScoresView>() {
        for ability in Ability::ALL {
            if let Some(score) = scores.effective.get(&ability).or(scores.base.get(&ability)) {
                println!(
                    "{} {:>2} ({})",
                    ability.short_name(),
                    score,
                    format_modifier(calculate_modifier(*score))
                );
            }
        }
    }

    Ok(())
}

/// Prefer local overrides, then `.env`, from the working directory.
fn load_dotenv() {
    for filename in [".env.local", ".env"] {
        let _ = dotenvy::from_filename(filename);
    }
}
