//! Tests for synchronous pipe chaining, tap, catch and reuse

mod sync_pipe_tests {
    use parking_lot::Mutex;
    use pipe_sugars::{boxed, BoxError, Flow, Pipe, PipeState};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    #[error("simulated error")]
    struct Simulated;

    fn ready<T, E>(result: Result<Flow<T, E>, E>) -> Option<T> {
        result.ok().and_then(Flow::into_ready)
    }

    #[test]
    fn test_pipe_initial_value() {
        let mut pipe = Pipe::new(5);
        assert_eq!(ready(pipe.exec()), Some(5));
    }

    #[test]
    fn test_pipe_to_changes_value() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2);
        assert_eq!(ready(pipe.exec()), Some(10));
    }

    #[test]
    fn test_pipe_to_chains() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2).to(|x| x + 3);
        assert_eq!(ready(pipe.exec()), Some(13));
    }

    #[test]
    fn test_pipe_to_with_extra_args() {
        let mut pipe = Pipe::new(String::from("a"));
        pipe.to_with(|s, suffix| format!("{s}{suffix}"), "b")
            .to_with(|s, (times, sep)| vec![s.as_str(); *times].join(*sep), (3, "-"));
        assert_eq!(ready(pipe.exec()), Some("ab-ab-ab".to_string()));
    }

    #[test]
    fn test_pipe_tap_keeps_value() {
        let mut pipe = Pipe::new(5);
        pipe.tap(|x| {
            let _ = x * 2;
        });
        assert_eq!(ready(pipe.exec()), Some(5));

        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2).tap(|x| {
            let _ = x + 3;
        });
        assert_eq!(ready(pipe.exec()), Some(10));
    }

    #[test]
    fn test_pipe_tap_sees_running_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (seen.clone(), seen.clone());
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2)
            .tap(move |x| a.lock().push(*x))
            .to(|x| x - 1)
            .tap_with(move |x, label| b.lock().push(*x + label), 100);
        assert_eq!(ready(pipe.exec()), Some(9));
        assert_eq!(*seen.lock(), vec![10, 109]);
    }

    #[test]
    fn test_pipe_exec_mixed_chain() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2).tap(|_| {}).to(|x| x - 1);
        assert_eq!(ready(pipe.exec()), Some(9));
    }

    #[test]
    fn test_pipe_is_lazy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipe = Pipe::new(1);
        for _ in 0..10 {
            let calls = calls.clone();
            pipe.to(move |x| {
                calls.fetch_add(1, Ordering::SeqCst);
                x + 1
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipe.queued(), 10);
        assert_eq!(ready(pipe.exec()), Some(11));
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_pipe_runs_steps_in_fifo_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut pipe = Pipe::new(0);
        for name in ["A", "B", "C"] {
            let order = order.clone();
            pipe.tap(move |_| order.lock().push(name));
        }
        assert!(pipe.exec().is_ok());
        assert_eq!(*order.lock(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_pipe_exec_twice_does_not_rerun_steps() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut pipe = Pipe::new(5);
        pipe.to(move |x| {
            counter.fetch_add(1, Ordering::SeqCst);
            x * 2
        });
        assert_eq!(ready(pipe.exec()), Some(10));
        assert_eq!(ready(pipe.exec()), Some(10));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pipe_is_reusable() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2).to(|x| x + 3);
        assert_eq!(ready(pipe.exec()), Some(13));
        assert_eq!(ready(pipe.exec()), Some(13));
        assert_eq!(ready(pipe.exec()), Some(13));
        pipe.to(|x| x - 1);
        assert_eq!(pipe.state(), PipeState::Building);
        assert_eq!(ready(pipe.exec()), Some(12));
        assert_eq!(ready(pipe.exec()), Some(12));
        assert_eq!(pipe.state(), PipeState::Idle);
    }

    #[test]
    fn test_pipe_catch_recovers_failed_step() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2)
            .try_to(|_| Err(boxed(Simulated)))
            .catch(|_| 1);
        assert_eq!(ready(pipe.exec()), Some(1));
    }

    #[test]
    fn test_pipe_catch_only_covers_its_step() {
        let bad = Arc::new(AtomicUsize::new(0));
        let flag = bad.clone();
        let mut pipe = Pipe::<i32, String>::from_value(5);
        pipe.to(|x| x * 2)
            .catch(|_| 0)
            .try_to(move |x| {
                if *x == 10 {
                    return Err("simulated error".to_string());
                }
                flag.fetch_add(1, Ordering::SeqCst);
                Ok(x - 1)
            })
            .catch(|_| 1);
        assert_eq!(ready(pipe.exec()), Some(1));
        assert_eq!(bad.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pipe_catch_receives_original_error() {
        let received = Arc::new(Mutex::new(None));
        let slot = received.clone();
        let mut pipe = Pipe::<i32, String>::from_value(1);
        pipe.try_to(|x| Err(format!("failed at {x}")))
            .catch(move |err| {
                *slot.lock() = Some(err);
                0
            });
        assert_eq!(ready(pipe.exec()), Some(0));
        assert_eq!(received.lock().as_deref(), Some("failed at 1"));
    }

    #[test]
    fn test_pipe_recovery_continues_chain() {
        let mut pipe = Pipe::<i32, String>::from_value(5);
        pipe.try_to(|_| Err("nope".into()))
            .catch(|_| 70)
            .to(|x| x - 1);
        assert_eq!(ready(pipe.exec()), Some(69));
    }

    #[test]
    fn test_pipe_unrecovered_failure_halts_drain() {
        let later = Arc::new(AtomicUsize::new(0));
        let counter = later.clone();
        let mut pipe = Pipe::<i32, String>::from_value(5);
        pipe.to(|x| x * 2)
            .try_to(|_| Err("stop".to_string()))
            .to(move |x| {
                counter.fetch_add(1, Ordering::SeqCst);
                x + 1
            });

        assert_eq!(pipe.exec().err(), Some("stop".to_string()));
        assert_eq!(later.load(Ordering::SeqCst), 0);
        // prior steps stay applied, the rest stays queued
        assert_eq!(pipe.current().ready(), Some(&10));
        assert_eq!(pipe.queued(), 1);

        assert_eq!(ready(pipe.exec()), Some(11));
        assert_eq!(later.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pipe_try_tap_failure() {
        let mut pipe = Pipe::<i32, String>::from_value(5);
        pipe.try_tap(|_| Err("tap failed".to_string()));
        assert_eq!(pipe.exec().err(), Some("tap failed".to_string()));
        assert_eq!(pipe.current().ready(), Some(&5));

        let recovered = Arc::new(AtomicUsize::new(0));
        let counter = recovered.clone();
        let mut pipe = Pipe::<i32, String>::from_value(5);
        pipe.try_tap(|_| Err("tap failed".to_string()))
            .catch(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                1000
            })
            .to(|x| x + 1);
        // recovery runs, but its value is discarded for a tap
        assert_eq!(ready(pipe.exec()), Some(6));
        assert_eq!(recovered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pipe_catch_on_empty_queue_is_noop() {
        let mut pipe = Pipe::new(5);
        pipe.catch(|_| 1);
        assert_eq!(pipe.queued(), 0);
        assert_eq!(ready(pipe.exec()), Some(5));

        // after exec the queue is drained, so catch has nothing to attach to
        let mut pipe = Pipe::<i32, String>::from_value(5);
        pipe.to(|x| x * 2);
        assert_eq!(ready(pipe.exec()), Some(10));
        pipe.catch(|_| 0).try_to(|_| Err("late".to_string()));
        assert_eq!(pipe.exec().err(), Some("late".to_string()));
    }

    #[test]
    fn test_pipe_default_error_type() {
        let mut pipe = Pipe::new("value");
        pipe.try_to(|_| Err(boxed(Simulated)));
        let err: BoxError = match pipe.exec() {
            Ok(_) => panic!("step should fail"),
            Err(err) => err,
        };
        assert_eq!(err.to_string(), "simulated error");
    }

    #[test]
    fn test_pipe_changes_value_in_place_across_types() {
        let mut pipe = Pipe::new(vec![3, 1, 2]);
        pipe.to(|v| {
            let mut sorted = v.clone();
            sorted.sort();
            sorted
        })
        .to(|v| v.iter().map(|x| x * 10).collect());
        assert_eq!(ready(pipe.exec()), Some(vec![10, 20, 30]));
    }
}

mod coerce_tests {
    use pipe_sugars::{CoerceError, Pipe};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coerce_string() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2);
        assert_eq!(pipe.exec_string().ok(), Some("10".to_string()));
    }

    #[test]
    fn test_coerce_display_runs_queued_steps() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2);
        assert_eq!(format!("{pipe:?}"), "Pipe { value: Ready(5), queued: 1 }");
        assert_eq!(pipe.exec_display().ok(), Some("Pipe(10)".to_string()));
        assert_eq!(pipe.queued(), 0);
    }

    #[test]
    fn test_coerce_number() {
        let mut pipe = Pipe::new(5);
        pipe.to(|x| x * 2);
        assert_eq!(pipe.exec_number::<u64>().ok(), Some(10));

        let mut pipe = Pipe::new(String::from("not a number"));
        match pipe.exec_number::<f64>() {
            Err(CoerceError::NotNumeric { input }) => assert_eq!(input, "not a number"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_coerce_iter() {
        let mut pipe = Pipe::new(vec![1]);
        pipe.to(|v| v.clone());
        let items: Vec<i32> = match pipe.exec_iter() {
            Ok(iter) => iter.chain([2]).collect(),
            Err(err) => panic!("unexpected: {err}"),
        };
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn test_coerce_step_failure_keeps_error() {
        let mut pipe = Pipe::<i32, String>::from_value(1);
        pipe.try_to(|_| Err("bad".to_string()));
        let err = pipe.exec_string().err();
        assert_eq!(err.and_then(CoerceError::into_step), Some("bad".to_string()));
    }

    #[test]
    fn test_coerce_pending_is_an_error() {
        let mut pipe = Pipe::<i32, String>::from_value(1);
        pipe.to_async(|x| async move { x.await });
        assert!(matches!(pipe.exec_ready(), Err(CoerceError::Pending)));
    }
}
