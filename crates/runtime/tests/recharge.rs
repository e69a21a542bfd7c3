use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sheet_core::{
    AttributeError, AttributeRecord, CharacterSheet, OwnerId, ResourceRecord, Scheduler,
    TimerHandle,
};
use sheet_runtime::{InMemoryAttributeStore, RechargeScheduler, SharedSheet, TokioScheduler};

fn sheet_with_mana(will_recharge: bool) -> SharedSheet {
    let mut sheet = CharacterSheet::new(OwnerId(9), Arc::new(InMemoryAttributeStore::new()));
    sheet
        .add_attribute(AttributeRecord::base("Wisdom", 0.0, 100.0, 10.0))
        .unwrap();
    sheet
        .add_resource(ResourceRecord {
            name: "mana".into(),
            min: AttributeRecord::base("mana_min", 0.0, 0.0, 0.0),
            max: AttributeRecord::derived("mana_max", 0.0, 500.0, "Wisdom * 5"),
            current_value: 0.0,
            recharge_rate: 10.0,
            recharge_interval: 1.0,
            will_recharge,
        })
        .unwrap();
    SharedSheet::new(sheet)
}

fn mana(sheet: &SharedSheet) -> f64 {
    sheet
        .with(|s| Ok(s.resource("mana")?.current_value()))
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn ticks_recharge_until_max() {
    let sheet = sheet_with_mana(false);
    let mut recharge = RechargeScheduler::new(TokioScheduler::new().unwrap(), sheet.clone());

    recharge.enable("mana").unwrap();
    assert!(recharge.is_scheduled("mana"));

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    assert_eq!(mana(&sheet), 30.0);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(mana(&sheet), 50.0);
}

#[tokio::test(start_paused = true)]
async fn disable_cancels_timer() {
    let sheet = sheet_with_mana(false);
    let mut recharge = RechargeScheduler::new(TokioScheduler::new().unwrap(), sheet.clone());

    recharge.enable("mana").unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    recharge.disable("mana").unwrap();
    assert!(!recharge.is_scheduled("mana"));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(mana(&sheet), 10.0);
    assert!(
        !sheet
            .with(|s| Ok(s.resource("mana")?.recharge_enabled()))
            .unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn flag_cleared_elsewhere_stops_mutation() {
    let sheet = sheet_with_mana(false);
    let mut recharge = RechargeScheduler::new(TokioScheduler::new().unwrap(), sheet.clone());
    recharge.enable("mana").unwrap();

    // Flag flipped directly on the sheet; the timer keeps ticking but the
    // callback re-checks it under the lock.
    sheet.with(|s| s.toggle_recharge("mana", false)).unwrap();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(mana(&sheet), 0.0);
    assert!(recharge.is_scheduled("mana"));
}

#[tokio::test(start_paused = true)]
async fn resume_all_picks_up_persisted_flags() {
    let sheet = sheet_with_mana(true);
    let mut recharge = RechargeScheduler::new(TokioScheduler::new().unwrap(), sheet.clone());

    assert_eq!(recharge.resume_all().unwrap(), 1);
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(mana(&sheet), 20.0);

    recharge.remove("mana").unwrap();
    assert_eq!(recharge.active_count(), 0);
    assert!(sheet.with(|s| s.resources().is_empty()).unwrap());
}

#[tokio::test(start_paused = true)]
async fn dropping_scheduler_stops_timers() {
    let sheet = sheet_with_mana(false);
    {
        let mut recharge = RechargeScheduler::new(TokioScheduler::new().unwrap(), sheet.clone());
        recharge.enable("mana").unwrap();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
    }
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(mana(&sheet), 10.0);
}

#[tokio::test(start_paused = true)]
async fn zero_period_timer_still_fires() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let handle = TokioScheduler::new().unwrap().schedule(
        Duration::ZERO,
        false,
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!handle.is_active());
}

#[tokio::test(start_paused = true)]
async fn unusable_intervals_never_reach_the_scheduler() {
    let sheet = sheet_with_mana(false);
    for seconds in [1e20, 1e-12] {
        let result = sheet.with(|s| {
            s.add_resource(ResourceRecord {
                name: "focus".into(),
                min: AttributeRecord::base("focus_min", 0.0, 0.0, 0.0),
                max: AttributeRecord::base("focus_max", 0.0, 10.0, 10.0),
                current_value: 0.0,
                recharge_rate: 1.0,
                recharge_interval: seconds,
                will_recharge: true,
            })
            .map(|_| ())
        });
        assert!(matches!(
            result,
            Err(sheet_runtime::RuntimeError::Attribute(AttributeError::InvalidRecord { .. }))
        ));
    }

    let mut recharge = RechargeScheduler::new(TokioScheduler::new().unwrap(), sheet.clone());
    assert_eq!(recharge.resume_all().unwrap(), 0);
    recharge.enable("mana").unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(mana(&sheet), 10.0);
}

#[test]
fn scheduler_requires_runtime() {
    assert!(TokioScheduler::new().is_err());
}
