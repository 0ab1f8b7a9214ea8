//! Undo/redo propagation and scene reset semantics across two clients.

use scenelink_client::transport::channel::ChannelHub;
use scenelink_shared::{ParamAddress, ParamValue};
use scenelink_test::helpers::{
    connected_client, read_param, seed_test_object, tick_n, wait_until, WAIT,
};

#[test]
fn committing_an_edit_records_history_on_both_sides() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    let b = connected_client(&hub, 2, 30);
    seed_test_object(&a);
    seed_test_object(&b);

    let address = ParamAddress::new(1, 5, 2);
    a.set_parameter(address, ParamValue::Float(3.0)).unwrap();
    a.commit_parameter(address).unwrap();
    a.tick();

    assert_eq!(a.history_len(), 1);
    // B's ledger records the step the moment the UNDOREDOADD arrives
    assert!(wait_until(|| b.history_len() == 1, WAIT));
}

#[test]
fn undo_broadcasts_the_restored_value() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    let mut b = connected_client(&hub, 2, 30);
    seed_test_object(&a);
    seed_test_object(&b);

    let address = ParamAddress::new(1, 5, 2);
    a.set_parameter(address, ParamValue::Float(3.0)).unwrap();
    a.commit_parameter(address).unwrap();
    a.tick();

    assert_eq!(a.undo(), Some(address));
    assert_eq!(read_param(&a, address), Some(ParamValue::Float(0.0)));
    a.tick();

    // the restored default reaches B as an ordinary buffered update,
    // behind the committed edit it reverts
    assert!(wait_until(|| b.pending_event_count() == 2, WAIT));
    tick_n(&mut b, 20);
    assert_eq!(read_param(&b, address), Some(ParamValue::Float(0.0)));

    // and redo walks forward again locally
    assert_eq!(a.redo(), Some(address));
    assert_eq!(read_param(&a, address), Some(ParamValue::Float(3.0)));
}

#[test]
fn reset_object_propagates_defaults_and_purges_peer_history() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    let mut b = connected_client(&hub, 2, 30);
    seed_test_object(&a);
    seed_test_object(&b);

    let address = ParamAddress::new(1, 5, 2);

    // B makes a committed local edit of its own
    b.set_parameter(address, ParamValue::Float(7.0)).unwrap();
    b.commit_parameter(address).unwrap();
    b.tick();
    assert!(wait_until(|| a.pending_event_count() > 0, WAIT));
    tick_n(&mut a, 20);
    assert_eq!(read_param(&a, address), Some(ParamValue::Float(7.0)));

    a.reset_object(1, 5).unwrap();
    a.tick();

    // reset applies on B immediately: defaults back, history gone
    assert!(wait_until(
        || read_param(&b, address) == Some(ParamValue::Float(0.0)),
        WAIT
    ));
    assert!(wait_until(|| b.history_len() == 0, WAIT));
}

#[test]
fn reset_scene_is_idempotent() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    seed_test_object(&a);

    let address = ParamAddress::new(1, 5, 2);
    a.set_parameter(address, ParamValue::Float(5.0)).unwrap();
    a.commit_parameter(address).unwrap();

    for _ in 0..2 {
        a.reset_scene();
        assert_eq!(read_param(&a, address), Some(ParamValue::Float(0.0)));
        assert_eq!(a.history_len(), 0);
    }
}

#[test]
fn resend_request_replays_the_state_a_peer_is_editing() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    let mut b = connected_client(&hub, 2, 30);
    seed_test_object(&a);
    seed_test_object(&b);

    let address = ParamAddress::new(1, 5, 2);
    assert!(a.try_lock_object(1, 5).unwrap());
    a.set_parameter(address, ParamValue::Float(6.0)).unwrap();
    a.tick();

    // let the original update land, then lose it locally, the way a
    // desynced client would
    assert!(wait_until(|| b.pending_event_count() > 0, WAIT));
    tick_n(&mut b, 10);
    assert_eq!(read_param(&b, address), Some(ParamValue::Float(6.0)));
    {
        let registry = b.registry();
        let mut registry = registry.lock().unwrap();
        registry
            .resolve_mut(address)
            .unwrap()
            .set(ParamValue::Float(0.0))
            .unwrap();
    }
    b.request_resend();
    // A services the request on its next tick by re-queueing everything it
    // holds locks on
    assert!(wait_until(
        || {
            a.tick();
            b.pending_event_count() > 0
        },
        WAIT
    ));
    // the replayed frame can land at any bucket of A's free-running clock,
    // so walk B through a full cycle
    let mut applied = false;
    for _ in 0..=usize::from(b.timesteps()) {
        b.tick();
        if read_param(&b, address) == Some(ParamValue::Float(6.0)) {
            applied = true;
            break;
        }
    }
    assert!(applied);
}
