use crossbeam_channel::{Receiver, Sender, unbounded};
use jobtree_core::{ApiError, GroupId, Job, RowId, Stat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PanelTab {
    #[default]
    Jobs,
    Graph,
    Stats,
}

/// Completion of a call against the remote job API, delivered back to the
/// UI thread. Every variant carries what the panel needs to apply it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    JobsLoaded {
        group: GroupId,
        result: Result<Vec<Job>, ApiError>,
    },
    StatsLoaded {
        result: Result<Stat, ApiError>,
    },
    JobCreated {
        result: Result<Job, ApiError>,
    },
    JobUpdated {
        row: Option<RowId>,
        result: Result<Job, ApiError>,
    },
    JobDeleted {
        row: RowId,
        job: Job,
        result: Result<(), ApiError>,
    },
    JobWebhookUpdated {
        job: Job,
        result: Result<(), ApiError>,
    },
    JobWebhookDeleted {
        job: Job,
        result: Result<(), ApiError>,
    },
    GroupWebhooksUpdated {
        group: GroupId,
        result: Result<(), ApiError>,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::JobsLoaded { result, .. } => result.is_ok(),
            Outcome::StatsLoaded { result } => result.is_ok(),
            Outcome::JobCreated { result } | Outcome::JobUpdated { result, .. } => result.is_ok(),
            Outcome::JobDeleted { result, .. }
            | Outcome::JobWebhookUpdated { result, .. }
            | Outcome::JobWebhookDeleted { result, .. }
            | Outcome::GroupWebhooksUpdated { result, .. } => result.is_ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A remote call finished, successfully or not.
    RequestCompleted(Outcome),
    /// The job list changed; dependent views should rebuild.
    GraphRefresh { trigger: u64 },
    TabSelected { tab: PanelTab },
    StatusUpdate { message: String },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Event dropped, no receiver left");
        }
    }

    /// Dispatch all pending events to a listener.
    /// This is useful for processing events in the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
