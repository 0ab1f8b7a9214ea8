//! Lock propagation: locks apply on arrival, unlocks are held back a
//! quarter-second of buckets so the updates they guarded drain first.

use scenelink_client::transport::channel::ChannelHub;
use scenelink_shared::{ParamAddress, ParamValue};
use scenelink_test::helpers::{
    connected_client, object_locked, read_param, seed_test_object, tick_n, wait_until, WAIT,
};

#[test]
fn unlock_is_not_visible_before_its_delayed_bucket_drains() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    let mut b = connected_client(&hub, 2, 30);
    seed_test_object(&a);
    seed_test_object(&b);

    assert!(a.try_lock_object(1, 5).unwrap());
    a.tick();
    assert!(wait_until(|| object_locked(&b, 1, 5), WAIT));

    // one tick later A releases; at 30 fps the unlock is buffered at
    // B's current bucket + 30/4 = 7
    a.unlock_object(1, 5).unwrap();
    a.tick();
    assert!(wait_until(|| b.pending_count_at(7) == 1, WAIT));
    assert!(object_locked(&b, 1, 5));

    // B's drain cursor reaches bucket 7 when its clock reaches 10; until
    // then the object stays locked
    tick_n(&mut b, 9);
    assert!(object_locked(&b, 1, 5));

    b.tick();
    assert!(!object_locked(&b, 1, 5));
}

#[test]
fn lock_contention_is_a_domain_condition_not_an_error() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    let mut b = connected_client(&hub, 2, 30);
    seed_test_object(&a);
    seed_test_object(&b);

    assert!(a.try_lock_object(1, 5).unwrap());
    a.tick();
    assert!(wait_until(|| object_locked(&b, 1, 5), WAIT));

    // B sees the flag and politely declines to edit
    assert_eq!(b.try_lock_object(1, 5), Ok(false));

    // relocking an object this client already holds stays fine
    assert_eq!(a.try_lock_object(1, 5), Ok(true));
}

#[test]
fn updates_sent_before_an_unlock_apply_before_the_unlock_clears() {
    let hub = ChannelHub::new();
    let mut a = connected_client(&hub, 1, 30);
    let mut b = connected_client(&hub, 2, 30);
    seed_test_object(&a);
    seed_test_object(&b);

    let address = ParamAddress::new(1, 5, 2);

    assert!(a.try_lock_object(1, 5).unwrap());
    a.set_parameter(address, ParamValue::Float(9.0)).unwrap();
    a.tick();
    a.unlock_object(1, 5).unwrap();
    a.tick();

    // the update sits at bucket 1, the unlock at 0 + 7; walking B forward
    // applies the guarded update strictly before the unlock clears
    assert!(wait_until(|| b.pending_event_count() == 2, WAIT));

    let mut saw_value_before_unlock = false;
    for _ in 0..16 {
        b.tick();
        let value_applied = read_param(&b, address) == Some(ParamValue::Float(9.0));
        let unlocked = !object_locked(&b, 1, 5);
        if value_applied && !unlocked {
            saw_value_before_unlock = true;
        }
        if unlocked {
            break;
        }
    }
    assert!(saw_value_before_unlock);
    assert!(!object_locked(&b, 1, 5));
    assert_eq!(read_param(&b, address), Some(ParamValue::Float(9.0)));
}
