//! Test utilities for router tests
//!
//! Provides a recording fixture that builds handlers which append a label to
//! a shared log, plus logging setup.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use waypoint_router::*;

/// Route logs to the test harness when `RUST_LOG` is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared, ordered log of handler invocations.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler that records `label` and continues the chain.
    pub fn pass(&self, label: &str) -> Handler {
        let log = self.log.clone();
        let label = label.to_string();
        handler(move |_req, _chain, next| {
            log.borrow_mut().push(label.clone());
            next.call()
        })
    }

    /// Handler that records `label` and halts the chain.
    pub fn stop(&self, label: &str) -> Handler {
        let log = self.log.clone();
        let label = label.to_string();
        handler(move |_req, _chain, _next| {
            log.borrow_mut().push(label.clone());
            Ok(())
        })
    }

    /// Handler that records `label` followed by the value of `param`.
    pub fn param(&self, label: &str, param: &str) -> Handler {
        let log = self.log.clone();
        let label = label.to_string();
        let param = param.to_string();
        handler(move |req, _chain, next| {
            let value = req.param(&param).unwrap_or("<none>");
            log.borrow_mut().push(format!("{} {}", label, value));
            next.call()
        })
    }

    /// Record an arbitrary entry (for listeners and custom handlers).
    pub fn push(&self, entry: impl Into<String>) {
        self.log.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

/// Assert that the recorder holds exactly `expected`, in order.
pub fn assert_log(recorder: &Recorder, expected: &[&str]) {
    assert_eq!(
        recorder.entries(),
        expected.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        "Unexpected handler sequence"
    );
}
