//! Property tests for the waiter table

use proptest::prelude::*;
use vx_client::correlation::{reply_key, Correlator, WaiterKey, WaiterOutcome};
use vx_client::{ErrorChannel, Properties, Value};

fn line_key(line: usize) -> WaiterKey {
    let id = line.to_string();
    WaiterKey::Reply(reply_key("studio", Some("line"), Some(&id), ["caller_id"].into_iter()))
}

fn caller(line: usize) -> Properties {
    let mut props = Properties::new();
    props.insert("caller_id", Value::Int(line as i64));
    props
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Replies delivered in any order reach the caller that asked for them
    #[test]
    fn prop_any_reply_order_resolves_every_caller(order in Just((1usize..=12).collect::<Vec<_>>()).prop_shuffle()) {
        let mut correlator = Correlator::new();
        let receivers: Vec<_> = (1usize..=12)
            .map(|line| (line, correlator.register(line_key(line), Some(ErrorChannel::Line)).1))
            .collect();

        for line in &order {
            prop_assert!(correlator.resolve(&line_key(*line), caller(*line)));
        }

        for (line, rx) in receivers {
            let outcome = tokio_test::block_on(rx).unwrap();
            prop_assert_eq!(outcome, WaiterOutcome::Reply(caller(line)));
        }
        prop_assert_eq!(correlator.pending_count(), 0);
        prop_assert_eq!(correlator.queued_count(), 0);
    }

    /// Every waiter is resolved exactly once, whatever mix of replies and errors arrives
    #[test]
    fn prop_each_waiter_resolves_exactly_once(
        errors_first in proptest::collection::vec(any::<bool>(), 1..10),
    ) {
        let mut correlator = Correlator::new();
        let count = errors_first.len();
        let mut receivers: Vec<_> = (0..count)
            .map(|line| correlator.register(line_key(line), Some(ErrorChannel::Line)).1)
            .collect();

        for (line, error_first) in errors_first.iter().enumerate() {
            if *error_first {
                correlator.fail(ErrorChannel::Line, "Nonexisting line");
            } else {
                correlator.resolve(&line_key(line), caller(line));
            }
        }
        // stragglers of both kinds find nothing left to resolve twice
        for line in 0..count {
            correlator.resolve(&line_key(line), caller(line));
            correlator.fail(ErrorChannel::Line, "Nonexisting line");
        }

        for rx in receivers.iter_mut() {
            prop_assert!(rx.try_recv().is_ok());
            prop_assert!(rx.try_recv().is_err());
        }
        prop_assert_eq!(correlator.pending_count(), 0);
        prop_assert_eq!(correlator.queued_count(), 0);
    }
}
