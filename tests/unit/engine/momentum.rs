use super::*;

fn momentum() -> Momentum {
    Momentum::new(&MomentumConfig::default())
}

fn settle_time(step_ms: f64) -> f64 {
    let m = momentum();
    let dt = step_ms / 1000.0;
    let (mut speed, target) = (40.0, -12.0);
    let mut t = 0.0;
    while speed != target {
        speed = m.approach(speed, target, m.factor(dt));
        t += dt;
        assert!(t < 120.0, "did not converge");
    }
    t
}

#[test]
fn convergence_does_not_depend_on_step_size() {
    let fast = settle_time(16.0);
    let slow = settle_time(33.0);
    assert!((fast - slow).abs() < 0.1, "fast={fast} slow={slow}");
}

#[test]
fn approach_never_overshoots() {
    let m = momentum();
    let mut v = 10.0;
    for _ in 0..200 {
        let next = m.approach(v, 0.0, m.factor(0.5));
        assert!(next <= v && next >= 0.0);
        v = next;
    }
    assert_eq!(v, 0.0);
}

#[test]
fn zero_elapsed_time_changes_nothing() {
    let m = momentum();
    assert_eq!(m.approach(5.0, 1.0, m.factor(0.0)), 5.0);
}
