//! Cache and editor behavior against a scripted backend.

use std::sync::Arc;

use serde_json::json;

use saveforge_client::api::Api;
use saveforge_client::editors::{AbilityScoreEditor, EditOutcome, InventoryManager};
use saveforge_client::infrastructure::clock::SystemClock;
use saveforge_client::infrastructure::ports::{BackendResponse, HttpMethod};
use saveforge_client::notifications::{ToastKind, Toasts};
use saveforge_client::state::{LoadOptions, SubsystemCache};
use saveforge_client::testing::ScriptedTransport;
use saveforge_domain::{Ability, CharacterId, ProgressTier, SubsystemName};
use saveforge_shared::paths;

fn pc() -> CharacterId {
    CharacterId::new("42")
}

fn setup() -> (Arc<ScriptedTransport>, Api, SubsystemCache) {
    let transport = Arc::new(ScriptedTransport::new());
    let api = Api::new(transport.clone());
    let cache = SubsystemCache::new(Arc::new(api.clone()), Arc::new(SystemClock::new()));
    cache.bind_character(pc());
    (transport, api, cache)
}

fn abilities(str_score: i32) -> serde_json::Value {
    json!({"base": {"Str": str_score}, "effective": {"Str": str_score}})
}

#[tokio::test]
async fn subsystem_is_fetched_once_while_loading_and_after() {
    let (transport, _api, cache) = setup();
    let path = paths::subsystem(&pc(), SubsystemName::AbilityScores);
    let gate = transport.gate(HttpMethod::Get, &path);

    let first = {
        let cache = cache.clone();
        tokio::spawn(async move {
            cache
                .load(SubsystemName::AbilityScores, LoadOptions::default())
                .await
        })
    };
    while !cache.state(SubsystemName::AbilityScores).is_loading {
        tokio::task::yield_now().await;
    }

    let concurrent = cache
        .load(SubsystemName::AbilityScores, LoadOptions::default())
        .await;
    assert!(concurrent.is_loading);

    gate.respond(BackendResponse::ok(abilities(14)));
    let loaded = first.await.expect("join");
    assert_eq!(loaded.data, Some(abilities(14)));
    assert!(loaded.last_fetched_at.is_some());

    cache
        .load(SubsystemName::AbilityScores, LoadOptions::default())
        .await;
    assert_eq!(transport.calls(HttpMethod::Get, &path), 1);
}

#[tokio::test]
async fn invalidation_reloads_only_named_subsystems() {
    let (transport, _api, cache) = setup();
    let combat = paths::subsystem(&pc(), SubsystemName::Combat);
    let skills = paths::subsystem(&pc(), SubsystemName::Skills);
    transport.respond(HttpMethod::Get, &combat, BackendResponse::ok(json!({"armor_class": 17})));
    transport.respond(HttpMethod::Get, &skills, BackendResponse::ok(json!({"skills": []})));

    cache.load(SubsystemName::Combat, LoadOptions::default()).await;
    cache.load(SubsystemName::Skills, LoadOptions::default()).await;

    let refresh = cache.invalidate_subsystems(&[SubsystemName::Combat]);
    assert_eq!(refresh.len(), 1);
    refresh.wait().await;

    assert_eq!(transport.calls(HttpMethod::Get, &combat), 2);
    assert_eq!(transport.calls(HttpMethod::Get, &skills), 1);
}

#[tokio::test]
async fn failed_load_keeps_previous_data() {
    let (transport, _api, cache) = setup();
    let path = paths::subsystem(&pc(), SubsystemName::Feats);
    transport.respond(HttpMethod::Get, &path, BackendResponse::ok(json!({"feats": [1]})));
    transport.respond(
        HttpMethod::Get,
        &path,
        BackendResponse::new(500, json!({"detail": "parser crashed"})),
    );

    cache.load(SubsystemName::Feats, LoadOptions::default()).await;
    let state = cache.load(SubsystemName::Feats, LoadOptions::forced()).await;

    assert_eq!(state.data, Some(json!({"feats": [1]})));
    assert_eq!(state.error.as_deref(), Some("parser crashed"));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn ability_edit_shows_immediately_and_does_not_snap_back() {
    let (transport, api, cache) = setup();
    let abilities_path = paths::subsystem(&pc(), SubsystemName::AbilityScores);
    cache.update_data(SubsystemName::AbilityScores, abilities(14));

    let editor = AbilityScoreEditor::new(api, cache.clone());
    assert_eq!(editor.modifier(Ability::Str), Some(2));

    let update = transport.gate(HttpMethod::Post, &paths::attributes_update(&pc()));
    let edit = {
        let editor = editor.clone();
        tokio::spawn(async move { editor.set_base_score(Ability::Str, 16).await })
    };
    while !editor.is_pending(Ability::Str) {
        tokio::task::yield_now().await;
    }
    assert_eq!(editor.base_score(Ability::Str), Some(16));
    assert_eq!(editor.modifier(Ability::Str), Some(3));

    // A reload issued before the backend confirms still carries the old score.
    let stale_reload = transport.gate(HttpMethod::Get, &abilities_path);
    let reload = {
        let cache = cache.clone();
        tokio::spawn(async move {
            cache
                .load(SubsystemName::AbilityScores, LoadOptions::forced())
                .await
        })
    };
    while !cache.state(SubsystemName::AbilityScores).is_loading {
        tokio::task::yield_now().await;
    }

    update.respond(BackendResponse::ok(json!({"success": true})));
    let outcome = edit.await.expect("join").expect("edit");
    assert_eq!(outcome, EditOutcome::Applied { value: 16 });

    stale_reload.respond(BackendResponse::ok(abilities(14)));
    reload.await.expect("join");
    assert_eq!(editor.base_score(Ability::Str), Some(16));
    assert_eq!(editor.modifier(Ability::Str), Some(3));

    transport.respond(HttpMethod::Get, &abilities_path, BackendResponse::ok(abilities(16)));
    cache
        .load(SubsystemName::AbilityScores, LoadOptions::forced())
        .await;
    assert_eq!(editor.base_score(Ability::Str), Some(16));
    assert!(!editor.is_pending(Ability::Str));
}

#[tokio::test]
async fn failed_ability_edit_reverts_and_raises_toast() {
    let (transport, api, cache) = setup();
    cache.update_data(SubsystemName::AbilityScores, abilities(14));
    transport.respond(
        HttpMethod::Post,
        &paths::attributes_update(&pc()),
        BackendResponse::new(500, json!({"detail": "Save file is read-only"})),
    );
    let toasts = Toasts::new();
    let editor = AbilityScoreEditor::new(api, cache).with_notifications(toasts.clone());

    let err = editor
        .set_base_score(Ability::Str, 16)
        .await
        .expect_err("rejected");

    assert_eq!(err.user_message(), "Save file is read-only");
    assert_eq!(editor.base_score(Ability::Str), Some(14));
    assert_eq!(editor.modifier(Ability::Str), Some(2));
    let visible = toasts.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].kind, ToastKind::Error);
    assert!(visible[0].message.contains("Save file is read-only"));
}

#[tokio::test]
async fn encumbrance_reads_from_inventory() {
    let (_transport, api, cache) = setup();
    cache.update_data(
        SubsystemName::Inventory,
        json!({"items": [], "encumbrance": {"total_weight": 90.0, "heavy_load": 150.0}}),
    );
    let inventory = InventoryManager::new(api, cache);

    let encumbrance = inventory.encumbrance().expect("encumbrance");
    assert_eq!(encumbrance.weight_percentage(), 60);
    assert_eq!(encumbrance.progress_tier(), ProgressTier::Warning);
}

#[tokio::test]
async fn rebinding_discards_previous_character_data() {
    let (transport, _api, cache) = setup();
    let old_path = paths::subsystem(&pc(), SubsystemName::Combat);
    let gate = transport.gate(HttpMethod::Get, &old_path);

    let load = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.load(SubsystemName::Combat, LoadOptions::default()).await })
    };
    while !cache.state(SubsystemName::Combat).is_loading {
        tokio::task::yield_now().await;
    }

    cache.bind_character(CharacterId::new("43"));
    gate.respond(BackendResponse::ok(json!({"armor_class": 30})));
    load.await.expect("join");

    assert_eq!(cache.data(SubsystemName::Combat), None);
    assert_eq!(cache.character(), Some(CharacterId::new("43")));
}
