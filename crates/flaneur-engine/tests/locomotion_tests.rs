use core::f32::consts::{FRAC_PI_2, PI};

use flaneur_engine::{Engine, EngineConfig, InputState, VerticalState};
use flaneur_world::{GROUND_HEIGHT, WorldCell, WorldIndex, WorldSnapshot};

fn cell(gx: i32, gy: i32) -> WorldCell {
    WorldCell {
        gx,
        gy,
        road: false,
        built: false,
        floors: 0,
    }
}

fn snapshot(half_extent: f32, cells: Vec<WorldCell>) -> WorldSnapshot {
    WorldSnapshot {
        half_extent,
        spawn: [0.0, 0.0],
        cells,
    }
}

fn empty_index(half_extent: f32) -> WorldIndex {
    WorldIndex::build(&snapshot(half_extent, Vec::new()))
}

/// Simulate `seconds` of wall-clock time in fixed `dt` ticks.
fn run(engine: &mut Engine, input: &mut InputState, index: &WorldIndex, dt: f32, seconds: f32) {
    let ticks = (seconds / dt).round() as usize;
    for _ in 0..ticks {
        engine.step(input, index, dt);
    }
}

fn rest_height(cfg: &EngineConfig, offset: f32) -> f32 {
    GROUND_HEIGHT + cfg.eye_height + offset
}

#[test]
fn one_second_of_walking_is_tick_rate_independent() {
    let index = empty_index(24.0);
    let mut displacements = Vec::new();
    for dt in [1.0 / 30.0, 1.0 / 240.0] {
        let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
        let mut input = InputState::new();
        input.move_forward = true;
        run(&mut engine, &mut input, &index, dt, 1.0);
        displacements.push(engine.pose().position.z.abs());
    }
    assert!(
        (displacements[0] - displacements[1]).abs() < 0.05,
        "dt=1/30 moved {:.4}, dt=1/240 moved {:.4}",
        displacements[0],
        displacements[1]
    );
    // Off-road at the default speed: 1.5 units/s minus the chase lag
    assert!(displacements[0] > 1.2 && displacements[0] < 1.5);
}

#[test]
fn road_cells_double_the_covered_distance() {
    // A road strip down gx=0; the off-road run walks a parallel track
    let mut cells: Vec<WorldCell> = Vec::new();
    for gy in -15..=0 {
        cells.push(WorldCell {
            road: true,
            ..cell(0, gy)
        });
    }
    let index = WorldIndex::build(&snapshot(24.0, cells));
    let dt = 1.0 / 60.0;

    let mut on_road = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_forward = true;
    run(&mut on_road, &mut input, &index, dt, 2.0);
    assert!(on_road.motion().is_on_road);
    let road_distance = on_road.pose().position.z.abs();

    let mut off_road = Engine::new(EngineConfig::default(), &index, (10.0, 0.0));
    run(&mut off_road, &mut input, &index, dt, 2.0);
    assert!(!off_road.motion().is_on_road);
    let off_distance = (off_road.pose().position.z).abs();

    assert!(
        (road_distance / off_distance - 2.0).abs() < 1e-3,
        "road {:.4} vs off-road {:.4}",
        road_distance,
        off_distance
    );
}

#[test]
fn walking_into_a_building_stops_short_for_any_tick_rate() {
    // Single one-floor building on (5, 5): box [4.65, 0, 4.65]..[5.35, 1.2, 5.35]
    let index = WorldIndex::build(&snapshot(
        24.0,
        vec![WorldCell {
            built: true,
            floors: 1,
            ..cell(5, 5)
        }],
    ));
    for dt in [1.0 / 30.0, 1.0 / 60.0, 1.0 / 144.0] {
        let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
        // Face the diagonal toward +x/+z
        engine.set_orientation(-3.0 * PI / 4.0, 0.0);
        let mut input = InputState::new();
        input.move_forward = true;
        let ticks = (12.0 / dt) as usize;
        for _ in 0..ticks {
            engine.step(&mut input, &index, dt);
            let p = engine.pose().position;
            assert!(p.x < 4.65, "penetrated to x={:.4} at dt={:.5}", p.x, dt);
            assert!(p.z < 4.65, "penetrated to z={:.4} at dt={:.5}", p.z, dt);
        }
        // It walked up to the wall rather than stopping early
        let p = engine.pose().position;
        assert!(p.x > 4.0, "stopped early at x={:.4} for dt={:.5}", p.x, dt);
    }
}

#[test]
fn rejected_moves_leave_the_position_fixed() {
    let index = WorldIndex::build(&snapshot(
        24.0,
        vec![WorldCell {
            built: true,
            floors: 2,
            ..cell(0, -3)
        }],
    ));
    let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_forward = true; // straight at the building on -z
    let dt = 1.0 / 60.0;
    run(&mut engine, &mut input, &index, dt, 10.0);
    let settled = engine.pose().position;
    // Keep pushing into the wall: no jitter, no creep
    for _ in 0..120 {
        engine.step(&mut input, &index, dt);
        let p = engine.pose().position;
        assert!((p.x - settled.x).abs() < 1e-5);
        assert!((p.z - settled.z).abs() < 1e-5);
    }
    // Wall face is at z = -2.65, player radius 0.2
    assert!(settled.z > -2.65 + 0.2 - 1e-3);
}

#[test]
fn disabling_collision_walks_through_buildings() {
    let index = WorldIndex::build(&snapshot(
        24.0,
        vec![WorldCell {
            built: true,
            floors: 2,
            ..cell(0, -3)
        }],
    ));
    let cfg = EngineConfig {
        collision_enabled: false,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_forward = true;
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 4.0);
    assert!(engine.pose().position.z < -4.0);
}

#[test]
fn position_stays_inside_world_bounds() {
    let index = empty_index(4.0);
    let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    engine.set_orientation(-3.0 * PI / 4.0, 0.0); // diagonal, toward +x/+z
    let mut input = InputState::new();
    input.move_forward = true;
    let dt = 1.0 / 60.0;
    for _ in 0..(20.0 / dt) as usize {
        engine.step(&mut input, &index, dt);
        let p = engine.pose().position;
        assert!(p.x.abs() <= 4.0 + 1e-4);
        assert!(p.z.abs() <= 4.0 + 1e-4);
    }
    // It actually reached the corner
    let p = engine.pose().position;
    assert!(p.x > 3.9 && p.z > 3.9);
}

#[test]
fn teleport_preserves_the_height_trim() {
    let cfg = EngineConfig::default();
    let index = empty_index(24.0);
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_up = true;
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 1.0);
    input.move_up = false;
    let trim = engine.height_offset();
    assert!((trim - 1.5).abs() < 1e-2);

    engine.teleport(3.0, -2.0, &index);
    let p = engine.pose().position;
    assert!((p.x - 3.0).abs() < 1e-6);
    assert!((p.z + 2.0).abs() < 1e-6);
    assert!((p.y - rest_height(&cfg, trim)).abs() < 1e-5);
    assert!(engine.vertical().is_grounded());
}

#[test]
fn teleport_clamps_to_world_bounds_and_does_not_slide() {
    let index = empty_index(24.0);
    let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_forward = true;
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 1.0);
    input.move_forward = false;

    engine.teleport(1000.0, -1000.0, &index);
    let p = engine.pose().position;
    assert!((p.x - 24.0).abs() < 1e-6);
    assert!((p.z + 24.0).abs() < 1e-6);

    // Next idle tick must not drift back toward the old location
    engine.step(&mut input, &index, 1.0 / 60.0);
    let q = engine.pose().position;
    assert!((q.x - p.x).abs() < 1e-6);
    assert!((q.z - p.z).abs() < 1e-6);
}

#[test]
fn teleport_mid_air_lands_immediately() {
    let index = empty_index(24.0);
    let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.request_jump();
    engine.step(&mut input, &index, 1.0 / 60.0);
    assert!(!engine.vertical().is_grounded());

    engine.teleport(5.0, 5.0, &index);
    assert!(engine.vertical().is_grounded());
    // Jump eligibility came back with the landing
    input.request_jump();
    engine.step(&mut input, &index, 1.0 / 60.0);
    assert!(!engine.vertical().is_grounded());
}

#[test]
fn jump_round_trip_returns_to_grounded() {
    let cfg = EngineConfig::default();
    let index = empty_index(24.0);
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    let dt = 1.0 / 60.0;

    assert!(engine.vertical().is_grounded());
    input.request_jump();
    engine.step(&mut input, &index, dt);
    match engine.vertical() {
        VerticalState::Airborne { velocity } => assert!(velocity > 0.0),
        VerticalState::Grounded => panic!("jump request ignored"),
    }
    assert!(engine.pose().position.y > rest_height(&cfg, 0.0));

    run(&mut engine, &mut input, &index, dt, 2.0);
    assert!(engine.vertical().is_grounded());
    assert!((engine.pose().position.y - rest_height(&cfg, 0.0)).abs() < 1e-5);

    // Landing re-enabled the jump
    input.request_jump();
    engine.step(&mut input, &index, dt);
    assert!(!engine.vertical().is_grounded());
}

#[test]
fn jump_is_inert_without_gravity() {
    let cfg = EngineConfig {
        gravity_enabled: false,
        ..EngineConfig::default()
    };
    let index = empty_index(24.0);
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.request_jump();
    for _ in 0..30 {
        engine.step(&mut input, &index, 1.0 / 60.0);
        assert!(engine.vertical().is_grounded());
        assert!((engine.pose().position.y - rest_height(&cfg, 0.0)).abs() < 1e-6);
    }
}

#[test]
fn height_trim_clamps_to_its_bounds() {
    let cfg = EngineConfig::default();
    let index = empty_index(24.0);
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_up = true;
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 10.0);
    assert!((engine.height_offset() - flaneur_engine::MAX_HEIGHT_OFFSET).abs() < 1e-4);
    assert!(
        (engine.pose().position.y - rest_height(&cfg, flaneur_engine::MAX_HEIGHT_OFFSET)).abs()
            < 1e-4
    );

    input.move_up = false;
    input.move_down = true;
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 20.0);
    assert!((engine.height_offset() - flaneur_engine::MIN_HEIGHT_OFFSET).abs() < 1e-4);
}

#[test]
fn rotation_only_input_is_not_movement() {
    let cfg = EngineConfig::default();
    let index = empty_index(24.0);
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.rotate_left = true;
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 1.0);
    assert!(!engine.motion().is_moving);
    let p = engine.pose().position;
    assert!(p.x.abs() < 1e-5 && p.z.abs() < 1e-5);
    // No footstep bob either
    assert!((p.y - rest_height(&cfg, 0.0)).abs() < 1e-6);
    // But the heading did turn
    assert!(engine.pose().yaw > 0.5);
}

#[test]
fn opposing_keys_cancel() {
    let index = empty_index(24.0);
    let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_forward = true;
    input.move_backward = true;
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 1.0);
    let p = engine.pose().position;
    assert!(p.x.abs() < 1e-5 && p.z.abs() < 1e-5);
    // Held movement keys still read as moving even when they cancel
    assert!(engine.motion().is_moving);
}

#[test]
fn camera_bob_oscillates_and_resets() {
    let cfg = EngineConfig::default();
    let index = empty_index(24.0);
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_forward = true;
    let dt = 1.0 / 60.0;
    engine.step(&mut input, &index, dt);
    let bobbed = engine.pose().position.y;
    assert!(bobbed > rest_height(&cfg, 0.0) + 1e-5);

    // The instant movement stops the bob offset is gone
    input.move_forward = false;
    engine.step(&mut input, &index, dt);
    assert!((engine.pose().position.y - rest_height(&cfg, 0.0)).abs() < 1e-6);
}

#[test]
fn camera_bob_can_be_disabled() {
    let cfg = EngineConfig {
        camera_bob_enabled: false,
        ..EngineConfig::default()
    };
    let index = empty_index(24.0);
    let mut engine = Engine::new(cfg, &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.move_forward = true;
    for _ in 0..60 {
        engine.step(&mut input, &index, 1.0 / 60.0);
        assert!((engine.pose().position.y - rest_height(&cfg, 0.0)).abs() < 1e-6);
    }
}

#[test]
fn yaw_blends_across_the_pi_seam_by_the_short_path() {
    let index = empty_index(24.0);
    let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    engine.set_orientation(3.0, 0.0);
    let mut input = InputState::new();
    input.mouse_button_down(flaneur_engine::MouseButton::Middle);
    // Push the yaw target to -3.0 rad: short way is up through +PI
    input.mouse_moved(6.0 / flaneur_engine::MOUSE_SENSITIVITY, 0.0);

    let dt = 1.0 / 60.0;
    engine.step(&mut input, &index, dt);
    let after_one = engine.pose().yaw;
    // Short path: heading moved toward +PI (or already wrapped past it),
    // never back down through zero
    assert!(after_one > 3.0 || after_one < -3.0);

    run(&mut engine, &mut input, &index, dt, 2.0);
    let settled = engine.pose().yaw;
    assert!((settled - (-3.0)).abs() < 0.01, "settled at {settled}");
    assert!(settled > -PI && settled <= PI);
}

#[test]
fn pitch_target_clamps_at_straight_up() {
    let index = empty_index(24.0);
    let mut engine = Engine::new(EngineConfig::default(), &index, (0.0, 0.0));
    let mut input = InputState::new();
    input.mouse_button_down(flaneur_engine::MouseButton::Middle);
    // A huge upward fling
    input.mouse_moved(0.0, -100_000.0);
    run(&mut engine, &mut input, &index, 1.0 / 60.0, 2.0);
    let pitch = engine.pose().pitch;
    assert!(pitch <= FRAC_PI_2 + 1e-4);
    assert!((pitch - FRAC_PI_2).abs() < 0.01);
}
