use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use tauri::{AppHandle, Manager};

use crate::deep_link;

/// Serializes deep-link processing: startup arguments, second-instance
/// hand-offs, and open-url events all funnel through here and are handled one
/// at a time, in arrival order.
#[derive(Debug, Default)]
pub(crate) struct DeepLinkQueue {
    pending: Mutex<VecDeque<String>>,
    draining: AtomicBool,
}

struct DrainGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> DrainGuard<'a> {
    fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl DeepLinkQueue {
    fn push(&self, input: String) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push_back(input),
            Err(_) => crate::append_shell_log("deep link queue lock poisoned; input dropped"),
        }
    }

    fn pop(&self) -> Option<String> {
        self.pending.lock().ok().and_then(|mut pending| pending.pop_front())
    }

    fn is_empty(&self) -> bool {
        self.pending
            .lock()
            .map(|pending| pending.is_empty())
            .unwrap_or(true)
    }

    /// Drains the queue through `sink`. At most one drainer runs at a time;
    /// a concurrent submitter whose guard attempt loses leaves its input for
    /// the active drainer, and the loop re-checks after releasing the guard
    /// so no input is stranded.
    pub(crate) fn drain_with<F>(&self, mut sink: F)
    where
        F: FnMut(String),
    {
        loop {
            {
                let Some(_guard) = DrainGuard::try_set(&self.draining) else {
                    return;
                };
                while let Some(input) = self.pop() {
                    sink(input);
                }
            }
            if self.is_empty() {
                return;
            }
        }
    }
}

pub(crate) fn submit(app_handle: &AppHandle, input: String) {
    let queue = app_handle.state::<DeepLinkQueue>();
    queue.push(input);
    queue.drain_with(|input| deep_link::process(app_handle, &input));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_arrival_order() {
        let queue = DeepLinkQueue::default();
        queue.push("first".to_string());
        queue.push("second".to_string());
        queue.push("third".to_string());

        let mut seen = Vec::new();
        queue.drain_with(|input| seen.push(input));
        assert_eq!(seen, vec!["first", "second", "third"]);
    }

    #[test]
    fn drain_is_exclusive_while_a_drainer_is_active() {
        let queue = DeepLinkQueue::default();
        queue.push("outer".to_string());

        let mut outer = Vec::new();
        queue.drain_with(|input| {
            if input == "outer" {
                // A re-entrant drain attempt must not run concurrently; the
                // item it submits is picked up by the active drainer instead.
                queue.push("outer-followup".to_string());
                let mut inner: Vec<String> = Vec::new();
                queue.drain_with(|nested| inner.push(nested));
                assert!(inner.is_empty());
            }
            outer.push(input);
        });

        assert_eq!(outer, vec!["outer", "outer-followup"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_on_an_empty_queue_is_a_no_op() {
        let queue = DeepLinkQueue::default();
        let mut seen: Vec<String> = Vec::new();
        queue.drain_with(|input| seen.push(input));
        assert!(seen.is_empty());
    }
}
