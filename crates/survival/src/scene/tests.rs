use engine::{InputAction, InputSnapshot, Poolable, Scene, SceneCommand, Vec2};

use super::*;
use crate::actors::{Faction, HostileRef, Infected};
use crate::combat::{AbilityPayload, SHOCK_SLOW_RADIUS, VOMIT_HORDE_SIZE};
use crate::content::AbilityKind;
use crate::events::CombatEvent;
use crate::hud::ShootMode;

const TICK_MS: f32 = 1000.0 / 60.0;

fn loaded_scene() -> GameScene {
    let content = ContentBundle::builtin().expect("builtin content");
    let mut scene = GameScene::new(SceneConfig::default(), content);
    scene.load();
    scene
}

/// A loaded scene with every hostile removed and the wave timer stopped.
fn quiet_scene() -> GameScene {
    let mut scene = loaded_scene();
    scene.spawner.stop();
    for (_, infected) in scene.spawner.hostiles_mut().iter_active_mut() {
        infected.deactivate();
    }
    scene.specials.clear();
    scene
}

fn press(action: InputAction) -> InputSnapshot {
    InputSnapshot::empty().with_action_pressed(action, true)
}

fn tick(scene: &mut GameScene, input: InputSnapshot) -> SceneCommand {
    scene.update(TICK_MS, &input)
}

fn idle(scene: &mut GameScene, ticks: u32) {
    for _ in 0..ticks {
        tick(scene, InputSnapshot::empty());
    }
}

fn place_common(scene: &mut GameScene, offset: Vec2) -> usize {
    let position = scene.player.position + offset;
    let config = scene.config.infected;
    let (slot, infected) = scene
        .spawner
        .hostiles_mut()
        .acquire_with(|| Infected::new(config))
        .expect("free common slot");
    infected.spawn(position);
    slot
}

fn common(scene: &GameScene, slot: usize) -> &Infected {
    scene.spawner.hostiles().get(slot).expect("common slot")
}

#[test]
fn tick_runs_systems_in_fixed_order() {
    let mut scene = loaded_scene();
    tick(&mut scene, InputSnapshot::empty());
    assert_eq!(scene.last_tick_order(), SCENE_SYSTEM_ORDER.as_slice());
}

#[test]
fn load_enters_first_stage_at_its_node() {
    let scene = loaded_scene();
    assert_eq!(scene.hud().stage_id(), Some("stage-safehouse"));
    assert_eq!(scene.player().position, Vec2::new(-600.0, 0.0));
    assert!(scene.spawner().active_count() >= 1);
    assert!(scene
        .hud()
        .pending_flashes()
        .iter()
        .any(|flash| flash.label == "Opening Safehouse"));
}

#[test]
fn pause_freezes_scene_time() {
    let mut scene = loaded_scene();
    tick(&mut scene, press(InputAction::TogglePause));
    assert!(scene.is_paused());
    assert!(scene.hud().paused);
    assert_eq!(scene.now_ms(), 0.0);

    idle(&mut scene, 10);
    assert_eq!(scene.now_ms(), 0.0);

    tick(&mut scene, press(InputAction::TogglePause));
    assert!(!scene.is_paused());
    assert!((scene.now_ms() - f64::from(TICK_MS)).abs() < 1e-9);
}

#[test]
fn quit_is_forwarded() {
    let mut scene = loaded_scene();
    assert_eq!(tick(&mut scene, press(InputAction::Quit)), SceneCommand::Quit);
}

#[test]
fn idle_player_holds_fire() {
    let mut scene = quiet_scene();
    idle(&mut scene, 60);
    assert_eq!(scene.projectiles().active_count(), 0);
    assert_eq!(scene.hud().weapon.ammo_in_magazine, 30);
}

#[test]
fn fire_press_launches_one_round() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::Fire));
    assert_eq!(scene.projectiles().active_count(), 1);
    assert_eq!(scene.hud().weapon.ammo_in_magazine, 29);

    tick(&mut scene, press(InputAction::Fire));
    assert_eq!(scene.hud().weapon.ammo_in_magazine, 29);
    assert_eq!(
        scene.hud().latest_message(),
        Some("Weapon not ready or reloading")
    );
}

#[test]
fn aim_stick_auto_fires_until_released() {
    let mut scene = quiet_scene();
    let aiming = InputSnapshot::empty().with_aim_vector(Vec2::new(0.0, 1.0));
    for _ in 0..60 {
        tick(&mut scene, aiming);
    }
    let after_hold = scene.hud().weapon.ammo_in_magazine;
    assert!(after_hold < 30);

    idle(&mut scene, 20);
    let settled = scene.hud().weapon.ammo_in_magazine;
    idle(&mut scene, 60);
    assert_eq!(scene.hud().weapon.ammo_in_magazine, settled);
    assert!(scene.player().aim_vector().y > 0.0);
}

#[test]
fn reload_press_starts_reload_when_magazine_not_full() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::Reload));
    assert!(!scene.hud().reload.is_reloading);

    tick(&mut scene, press(InputAction::Fire));
    tick(&mut scene, press(InputAction::Reload));
    assert!(scene.hud().reload.is_reloading);
    assert_eq!(scene.hud().latest_message(), Some("Reloading"));
    assert!(!scene.hud().shoot_enabled);
}

#[test]
fn switch_weapon_cycles_slots() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::SwitchWeapon));
    assert_eq!(scene.hud().weapon.id, "pistol");
    tick(&mut scene, press(InputAction::SwitchWeapon));
    assert_eq!(scene.hud().weapon.id, "ar");
}

#[test]
fn armed_heal_restores_health_and_resets_mode() {
    let mut scene = quiet_scene();
    scene.damage_player(50.0);

    tick(&mut scene, press(InputAction::UseHealItem));
    assert_eq!(scene.hud().shoot_mode, ShootMode::HealSelf);
    assert!(scene.hud().shoot_enabled);

    tick(&mut scene, press(InputAction::Fire));
    assert_eq!(scene.player().health(), 85.0);
    assert_eq!(scene.inventory().heal_items, 0);
    assert_eq!(scene.hud().shoot_mode, ShootMode::Fire);
    assert!(scene
        .hud()
        .messages()
        .any(|message| message == "Healed +35"));
}

#[test]
fn heal_mode_falls_back_to_fire_at_full_health() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::UseHealItem));
    assert_eq!(scene.hud().shoot_mode, ShootMode::Fire);
}

#[test]
fn heal_without_items_is_rejected() {
    let mut scene = quiet_scene();
    scene.inventory.heal_items = 0;
    scene.damage_player(20.0);
    tick(&mut scene, press(InputAction::UseHealItem));
    assert_eq!(scene.hud().shoot_mode, ShootMode::Fire);
    assert_eq!(
        scene.hud().latest_message(),
        Some("No medical item available")
    );
}

#[test]
fn throw_action_launches_molotov_that_burns_hostiles() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::UseThrowable));
    assert_eq!(scene.throwables().in_flight(), 1);
    assert_eq!(scene.inventory().molotovs, 0);
    assert_eq!(scene.inventory().shocks, 1);
    assert_eq!(scene.hud().shoot_mode, ShootMode::Fire);
    assert_eq!(scene.hud().latest_message(), Some("Molotov thrown"));

    idle(&mut scene, 40);
    assert_eq!(scene.throwables().zones().len(), 1);
    let center = scene.throwables().zones()[0].zone.position();

    let offset = center - scene.player.position;
    let slot = place_common(&mut scene, offset);
    idle(&mut scene, 10);
    assert!(common(&scene, slot).health() < 60.0);

    tick(&mut scene, press(InputAction::UseThrowable));
    assert_eq!(scene.hud().latest_message(), Some("Throwables depleted"));
    assert_eq!(scene.throwables().in_flight(), 0);
}

#[test]
fn shock_grenade_stuns_and_slows_hostiles_at_blast() {
    let mut scene = quiet_scene();
    let slot = place_common(&mut scene, Vec2::new(380.0, 0.0));

    tick(&mut scene, press(InputAction::UseShockThrowable));
    assert_eq!(scene.throwables().in_flight(), 1);
    assert_eq!(scene.inventory().shocks, 0);
    assert_eq!(scene.inventory().molotovs, 1);
    assert_eq!(scene.hud().latest_message(), Some("Shock grenade thrown"));

    let mut waited = 0;
    while scene.throwables().zones().is_empty() {
        tick(&mut scene, InputSnapshot::empty());
        waited += 1;
        assert!(waited < 60, "shock grenade never detonated");
    }
    let now = scene.now_ms();
    let hit = common(&scene, slot);
    assert_eq!(hit.velocity, Vec2::ZERO);
    assert!(hit.is_slowed(now));
    assert!(hit.health() < 60.0);
    assert_eq!(scene.events().lifetime_counts().area_slow, 1);

    tick(&mut scene, press(InputAction::UseShockThrowable));
    assert_eq!(scene.hud().latest_message(), Some("Throwables depleted"));
}

#[test]
fn throw_mode_launches_equipped_kind_on_fire() {
    let mut scene = quiet_scene();
    scene.arm_shoot_mode(ShootMode::Throw);
    assert_eq!(scene.hud().shoot_mode, ShootMode::Throw);
    assert_eq!(scene.hud().latest_message(), Some("Throw mode armed"));

    tick(&mut scene, press(InputAction::Fire));
    assert_eq!(scene.throwables().in_flight(), 1);
    assert_eq!(scene.projectiles().active_count(), 0);
    assert_eq!(scene.inventory().molotovs, 0);
    assert_eq!(scene.inventory().shocks, 1);
    assert_eq!(scene.hud().shoot_mode, ShootMode::Fire);

    scene.arm_shoot_mode(ShootMode::Throw);
    assert_eq!(scene.hud().shoot_mode, ShootMode::Fire);
    assert_eq!(scene.hud().latest_message(), Some("Throwables depleted"));
}

#[test]
fn infected_faction_cannot_throw() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::ToggleFaction));
    tick(&mut scene, press(InputAction::UseThrowable));
    tick(&mut scene, press(InputAction::UseShockThrowable));
    assert_eq!(scene.throwables().in_flight(), 0);
    assert_eq!(scene.inventory().molotovs, 1);
    assert_eq!(scene.inventory().shocks, 1);
}

#[test]
fn shove_knocks_back_and_then_cools_down() {
    let mut scene = quiet_scene();
    let slot = place_common(&mut scene, Vec2::new(50.0, 0.0));

    tick(&mut scene, press(InputAction::Shove));
    let impulse = common(&scene, slot).impulse().expect("impulse");
    assert!((impulse.velocity.x - 420.0).abs() < 1e-3);
    assert_eq!(scene.hud().shove.remaining_ms, 900.0);
    assert_eq!(
        scene.hud().latest_message(),
        Some("Shove knocked back nearby targets")
    );

    tick(&mut scene, press(InputAction::Shove));
    assert_eq!(scene.hud().latest_message(), Some("Shove on cooldown"));
}

#[test]
fn shove_ignores_hostiles_outside_radius() {
    let mut scene = quiet_scene();
    let slot = place_common(&mut scene, Vec2::new(300.0, 0.0));
    tick(&mut scene, press(InputAction::Shove));
    assert!(common(&scene, slot).impulse().is_none());
}

#[test]
fn faction_toggle_flashes_and_gates_survivor_actions() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::ToggleFaction));
    assert_eq!(scene.player().faction(), Faction::Infected);
    assert!(scene
        .hud()
        .pending_flashes()
        .iter()
        .any(|flash| flash.label == "Infected mode" && flash.color == INFECTED_MODE_FLASH_COLOR));

    tick(&mut scene, press(InputAction::Fire));
    assert_eq!(scene.projectiles().active_count(), 0);
    assert!(!scene.hud().shoot_enabled);
}

#[test]
fn hunter_pounce_respects_cooldown() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::ToggleFaction));

    let pounce = press(InputAction::SpecialAbility).with_aim_vector(Vec2::new(0.0, 1.0));
    tick(&mut scene, pounce);
    assert!(scene.player().is_hunter_pouncing());
    assert!(scene.player().velocity.y > 700.0);

    tick(&mut scene, pounce);
    assert_eq!(scene.hud().latest_message(), Some("Cooling down 6s"));

    tick(&mut scene, press(InputAction::ToggleFaction));
    assert!(!scene.player().is_hunter_pouncing());
}

#[test]
fn pounce_contact_damages_first_hostile_and_ends_pounce() {
    let mut scene = quiet_scene();
    tick(&mut scene, press(InputAction::ToggleFaction));
    let slot = place_common(&mut scene, Vec2::new(30.0, 0.0));

    tick(&mut scene, press(InputAction::SpecialAbility));

    assert_eq!(common(&scene, slot).health(), 35.0);
    assert!(!scene.player().is_hunter_pouncing());
}

#[test]
fn projectile_hits_nearest_hostile_in_path() {
    let mut scene = quiet_scene();
    let slot = place_common(&mut scene, Vec2::new(100.0, 0.0));

    tick(&mut scene, press(InputAction::Fire));
    idle(&mut scene, 10);

    assert_eq!(common(&scene, slot).health(), 44.0);
    assert_eq!(scene.projectiles().active_count(), 0);
    assert!(scene.events().lifetime_counts().projectile_hit >= 1);
}

#[test]
fn lethal_damage_counts_a_kill_once() {
    let mut scene = quiet_scene();
    let slot = place_common(&mut scene, Vec2::new(500.0, 0.0));

    assert!(scene.damage_hostile(HostileRef::Common(slot), 100.0));
    assert!(!scene.damage_hostile(HostileRef::Common(slot), 100.0));
    tick(&mut scene, InputSnapshot::empty());

    assert_eq!(scene.kills(), 1);
    assert_eq!(scene.hud().kills, 1);
    assert!(!common(&scene, slot).is_active());
}

#[test]
fn common_melee_damages_player() {
    let mut scene = quiet_scene();
    idle(&mut scene, 60);
    place_common(&mut scene, Vec2::new(20.0, 0.0));

    tick(&mut scene, InputSnapshot::empty());

    assert_eq!(scene.player().health(), 90.0);
    assert_eq!(scene.events().last_tick_counts().player_damaged, 1);
}

#[test]
fn spitter_acid_pool_hurts_player_over_time() {
    let mut scene = quiet_scene();
    let near = scene.player.position + Vec2::new(100.0, 0.0);
    let now = scene.now_ms();
    scene
        .specials
        .spawn_now(SpecialKind::Spitter, Some(near), near, now, &mut scene.rng)
        .expect("spitter slot");

    idle(&mut scene, 80);
    assert_eq!(scene.hazard_zones().len(), 1);

    idle(&mut scene, 60);
    assert!(scene.player().health() < 100.0);
}

fn ability(kind: AbilityKind) -> AbilityParams {
    AbilityParams {
        kind,
        cooldown_ms: 6000.0,
        range: 600.0,
        duration_ms: None,
        damage: None,
        knockback: None,
        area_radius: None,
        projectile_speed: None,
        special_speed: None,
    }
}

fn trigger(
    scene: &mut GameScene,
    special: SpecialKind,
    slot: usize,
    ability: AbilityParams,
    attacker_position: Vec2,
    target_position: Vec2,
) {
    scene.events.emit(CombatEvent::SpecialAbility(AbilityPayload {
        special,
        slot,
        ability,
        attacker_position,
        target_position,
    }));
}

#[test]
fn jockey_ride_pays_damage_in_half_second_ticks() {
    let mut scene = quiet_scene();
    let player = scene.player.position;
    let ride = AbilityParams {
        duration_ms: Some(3000.0),
        damage: Some(12.0),
        ..ability(AbilityKind::Ride)
    };
    trigger(&mut scene, SpecialKind::Jockey, 0, ride, player, player);

    tick(&mut scene, InputSnapshot::empty());
    assert_eq!(scene.player().health(), 100.0);
    assert!(scene
        .hud()
        .pending_flashes()
        .iter()
        .any(|flash| flash.label == "Jockey control"));

    idle(&mut scene, 69);
    assert_eq!(scene.player().health(), 96.0);

    idle(&mut scene, 130);
    assert_eq!(scene.player().health(), 88.0);
    assert!(scene.ride_tickers.is_empty());
}

#[test]
fn smoker_tongue_drags_player_onto_attacker() {
    let mut scene = quiet_scene();
    let start = scene.player.position;
    let smoker = start + Vec2::new(300.0, 0.0);
    let tongue = AbilityParams {
        duration_ms: Some(1500.0),
        ..ability(AbilityKind::Tongue)
    };
    trigger(&mut scene, SpecialKind::Smoker, 0, tongue, smoker, start);

    tick(&mut scene, InputSnapshot::empty());
    assert_eq!(scene.player().health(), 90.0);
    assert!(scene.player().is_dragged());

    idle(&mut scene, 45);
    let midway = scene.player().position;
    assert!(midway.x > start.x && midway.x < smoker.x);

    idle(&mut scene, 50);
    assert!(!scene.player().is_dragged());
    assert!(scene.player().position.distance(smoker) < 1e-3);
}

#[test]
fn boomer_vomit_summons_horde_and_covers_player() {
    let mut scene = quiet_scene();
    assert_eq!(scene.spawner().active_count(), 0);
    let player = scene.player.position;
    let near = player + Vec2::new(150.0, 0.0);
    trigger(&mut scene, SpecialKind::Boomer, 0, ability(AbilityKind::Vomit), near, player);

    tick(&mut scene, InputSnapshot::empty());
    assert_eq!(scene.spawner().active_count(), VOMIT_HORDE_SIZE as usize);
    assert!(scene.hud().bile_covered);
    assert!(scene
        .hud()
        .pending_flashes()
        .iter()
        .any(|flash| flash.label == "Covered in bile!"));
}

#[test]
fn tank_rock_splash_only_hits_inside_radius() {
    let rock = AbilityParams {
        damage: Some(60.0),
        area_radius: Some(140.0),
        ..ability(AbilityKind::Rock)
    };

    let mut scene = quiet_scene();
    let player = scene.player.position;
    let tank = player + Vec2::new(500.0, 0.0);
    trigger(&mut scene, SpecialKind::Tank, 0, rock, tank, player + Vec2::new(100.0, 0.0));
    tick(&mut scene, InputSnapshot::empty());
    assert_eq!(scene.hazard_zones().len(), 1);
    assert!(scene.player().health() <= 40.0);

    let mut scene = quiet_scene();
    let player = scene.player.position;
    trigger(&mut scene, SpecialKind::Tank, 0, rock, tank, player + Vec2::new(400.0, 0.0));
    tick(&mut scene, InputSnapshot::empty());
    assert_eq!(scene.hazard_zones().len(), 1);
    assert_eq!(scene.player().health(), 100.0);
}

#[test]
fn charger_stops_when_charge_expires() {
    let mut scene = quiet_scene();
    let player = scene.player.position;
    let start = player + Vec2::new(0.0, 400.0);
    let now = scene.now_ms();
    let slot = scene
        .specials
        .spawn_now(SpecialKind::Charger, Some(start), player, now, &mut scene.rng)
        .expect("charger slot");
    let charge = AbilityParams {
        duration_ms: Some(500.0),
        special_speed: Some(520.0),
        ..ability(AbilityKind::Charge)
    };
    trigger(
        &mut scene,
        SpecialKind::Charger,
        slot,
        charge,
        start,
        start + Vec2::new(1.0, 0.0),
    );

    tick(&mut scene, InputSnapshot::empty());
    tick(&mut scene, InputSnapshot::empty());
    let charger = &scene.special_director().specials().get(slot).expect("charger").body;
    assert!((charger.velocity.x - 520.0).abs() < 1e-3);
    assert_eq!(scene.player().health(), 77.5);

    idle(&mut scene, 38);
    let charger = &scene.special_director().specials().get(slot).expect("charger").body;
    assert_eq!(charger.velocity, Vec2::ZERO);
    assert!(charger.impulse().is_none());
    assert!(charger.position.x - start.x > 250.0);
}

#[test]
fn area_slow_cuts_hostile_speed_for_a_moment() {
    let mut scene = quiet_scene();
    let inside = place_common(&mut scene, Vec2::new(300.0, 0.0));
    let outside = place_common(&mut scene, Vec2::new(-700.0, 0.0));
    let center = scene.player.position + Vec2::new(300.0, 100.0);
    scene.events.emit(CombatEvent::AreaSlow {
        center,
        radius: SHOCK_SLOW_RADIUS,
    });

    tick(&mut scene, InputSnapshot::empty());
    let now = scene.now_ms();
    assert!(common(&scene, inside).is_slowed(now));
    assert!(!common(&scene, outside).is_slowed(now));

    tick(&mut scene, InputSnapshot::empty());
    assert!((common(&scene, inside).velocity.length() - 32.0).abs() < 1e-3);
    assert!((common(&scene, outside).velocity.length() - 160.0).abs() < 1e-3);

    idle(&mut scene, 24);
    assert!((common(&scene, inside).velocity.length() - 160.0).abs() < 1e-3);
}

#[test]
fn unload_stops_waves_and_clears_specials() {
    let mut scene = loaded_scene();
    let now = scene.now_ms();
    let target = scene.player.position;
    scene
        .specials
        .spawn_now(SpecialKind::Tank, None, target, now, &mut scene.rng);

    scene.unload();

    assert!(!scene.spawner().is_running());
    assert_eq!(scene.special_director().active_count(), 0);
}

#[test]
fn debug_title_names_the_stage() {
    let scene = loaded_scene();
    let title = scene.debug_title().expect("title");
    assert!(title.starts_with("Opening Safehouse"));
}
