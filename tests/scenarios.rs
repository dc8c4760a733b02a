#![cfg(not(target_arch = "wasm32"))]

use glam::Vec3;
use portfolio_viz::config::{InfinityConfig, LimitlessConfig};
use portfolio_viz::limitless::{LimitlessField, Technique};
use portfolio_viz::particles::spawn::{brightness_at, speed_at};
use portfolio_viz::particles::{active_count, ease_toward, ParticleBuffer, Slot, TargetField};
use portfolio_viz::quantum::Qubit;

#[test]
fn two_seconds_of_infinity_activates_two_hundred() {
    let config = InfinityConfig::default();
    assert_eq!(config.spawn_rate(), 100.0);
    assert_eq!(active_count(2.0, config.spawn_rate(), config.total_particles, 15_000), 200);

    let mut field = LimitlessField::new(LimitlessConfig::default(), 42);
    field.set_active(true);
    field.tick(100.0, 16.0 / 9.0);
    field.tick(102.0, 16.0 / 9.0);
    assert_eq!(field.active_count(), 200);
    assert!((200..15_000).all(|i| field.buffer().is_slot_zero(i)));
}

#[test]
fn inside_stop_threshold_speed_is_zero() {
    let config = InfinityConfig::default();
    assert_eq!(speed_at(19.0, &config), 0.0);
    assert_eq!(speed_at(25.0, &config), config.approach_speed);
    let between = speed_at(19.5, &config);
    assert!(between > 0.0 && between < 0.1);
    assert!(brightness_at(19.0, &config) > brightness_at(25.0, &config));
}

#[test]
fn ease_from_zero_toward_ten() {
    let mut buffer = ParticleBuffer::new(1);
    let mut targets = TargetField::new(1);
    targets.set(0, Slot::new(Vec3::new(10.0, 0.0, 0.0), Vec3::ONE, 1.0));

    ease_toward(&mut buffer, &targets, 0.1);
    assert!((buffer.position(0).x - 1.0).abs() < 1e-6);
    ease_toward(&mut buffer, &targets, 0.1);
    assert!((buffer.position(0).x - 1.9).abs() < 1e-6);
}

#[test]
fn switching_back_to_infinity_starts_from_nothing() {
    let config = LimitlessConfig {
        count: 1_000,
        ..LimitlessConfig::default()
    };
    let mut field = LimitlessField::new(config, 9);
    field.set_active(true);
    field.tick(0.0, 1.0);
    field.tick(3.0, 1.0);
    assert_eq!(field.active_count(), 300);

    field.select(Technique::Purple);
    for _ in 0..10 {
        field.tick(3.5, 1.0);
    }
    field.select(Technique::Infinity);
    assert!(!field.clock().is_running());
    assert_eq!(field.active_count(), 0);
    assert!((0..1_000).all(|i| field.buffer().is_slot_zero(i)));

    field.tick(10.0, 1.0);
    assert_eq!(field.active_count(), 0);
    field.tick(11.0, 1.0);
    assert_eq!(field.active_count(), 100);
}

#[test]
fn technique_cycle_wraps() {
    let mut field = LimitlessField::new(LimitlessConfig::default(), 1);
    field.step(-1);
    assert_eq!(field.technique(), Technique::Void);
    assert_eq!(field.display_name(), Technique::Void.display_name());
    field.step(1);
    assert_eq!(field.technique(), Technique::Infinity);
}

#[test]
fn gate_sequence_updates_label() {
    let mut q = Qubit::default();
    q.hadamard();
    q.phase();
    q.hadamard();
    assert_eq!(q.label(), "|ψ⟩ = 0.00|0⟩ + 1.00|1⟩");
    q.pauli_x();
    assert_eq!(q.label(), "|ψ⟩ = 1.00|0⟩ + 0.00|1⟩");
}
