//! Tokio-backed tick scheduler

use std::{collections::HashMap, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::{debug, warn};

use super::events::{Event, TickHandle};
use crate::state::Scheduler;

/// Schedules ticks as sleeping tasks that post [`Event::Tick`] back to the event loop
#[derive(Debug)]
pub struct TokioScheduler {
    events_tx: mpsc::UnboundedSender<Event>,
    next_id: u64,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(events_tx: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            events_tx,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Number of ticks scheduled and not yet fired or cancelled
    pub fn pending_count(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    type Handle = TickHandle;

    fn schedule_after(&mut self, after: Duration) -> TickHandle {
        // Drop bookkeeping for ticks that already fired
        self.tasks.retain(|_, task| !task.is_finished());

        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        let events_tx = self.events_tx.clone();

        let task = tokio::spawn(async move {
            sleep(after).await;
            if events_tx.send(Event::Tick(handle)).is_err() {
                warn!("Event loop closed, dropping tick {:?}", handle);
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            debug!("Cancelling tick {:?}", handle);
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
