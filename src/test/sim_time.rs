use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_micros(1), SimTime(1_000));
    assert_eq!(SimTime::from_millis(1), SimTime(1_000_000));
    assert_eq!(SimTime::from_secs(1), SimTime(1_000_000_000));
    assert_eq!(SimTime::from_millis(2_500).as_millis(), 2_500);
}

#[test]
fn sim_time_unit_conversions_saturate_on_overflow() {
    assert_eq!(SimTime::from_micros(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_millis(u64::MAX), SimTime(u64::MAX));
    assert_eq!(SimTime::from_secs(u64::MAX), SimTime(u64::MAX));
}

#[test]
fn sim_time_after_adds_delay_and_saturates() {
    assert_eq!(SimTime(10).after(SimTime(5)), SimTime(15));
    assert_eq!(SimTime(10).after(SimTime::ZERO), SimTime(10));
    assert_eq!(SimTime::MAX.after(SimTime(1)), SimTime::MAX);
}

#[test]
fn sim_time_serializes_as_plain_integer() {
    assert_eq!(serde_json::to_string(&SimTime(42)).expect("serialize"), "42");
    let t: SimTime = serde_json::from_str("7").expect("deserialize");
    assert_eq!(t, SimTime(7));
    assert_eq!(SimTime(3).to_string(), "3ns");
}
