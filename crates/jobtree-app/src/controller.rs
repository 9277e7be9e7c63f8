use crate::request::Request;
use crate::service::JobService;
use jobtree_events::{Event, EventBus};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Runs panel requests off the UI thread and posts their outcomes to the bus.
#[derive(Clone)]
pub struct AppController {
    service: Arc<dyn JobService>,
    bus: EventBus,
}

impl AppController {
    pub fn new(service: Arc<dyn JobService>, bus: EventBus) -> Self {
        Self { service, bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn service(&self) -> &Arc<dyn JobService> {
        &self.service
    }

    /// Starts `request` on its own thread. No timeout, no retry.
    pub fn submit(&self, request: Request) -> JoinHandle<()> {
        let service = Arc::clone(&self.service);
        let bus = self.bus.clone();
        let label = request.describe();
        tracing::debug!("Dispatching request: {label}");
        self.bus.publish(Event::StatusUpdate {
            message: format!("Running: {label}"),
        });

        std::thread::spawn(move || {
            let outcome = request.execute(service.as_ref());
            if !outcome.is_success() {
                tracing::debug!("Request failed: {label}");
            }
            bus.publish(Event::RequestCompleted(outcome));
        })
    }

    /// Starts every request independently; one failing does not stop the rest.
    pub fn submit_all(&self, requests: impl IntoIterator<Item = Request>) -> Vec<JoinHandle<()>> {
        requests.into_iter().map(|r| self.submit(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryJobService;
    use jobtree_core::{GroupId, Snapshot};
    use jobtree_events::Outcome;

    #[test]
    fn test_submit_posts_status_then_outcome() {
        let snapshot =
            Snapshot::from_json(r#"[{"id": 1, "name": "g", "jobs": [{"name": "root"}]}]"#).unwrap();
        let bus = EventBus::new();
        let service = Arc::new(MemoryJobService::from_snapshot(snapshot));
        let controller = AppController::new(service, bus.clone());

        controller
            .submit(Request::LoadJobs { group: GroupId(1) })
            .join()
            .unwrap();

        let events: Vec<Event> = bus.receiver().try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::StatusUpdate { .. }));
        match &events[1] {
            Event::RequestCompleted(Outcome::JobsLoaded { result: Ok(jobs), .. }) => {
                assert_eq!(jobs.len(), 1);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_failing_request_does_not_block_others() {
        let bus = EventBus::new();
        let controller = AppController::new(Arc::new(MemoryJobService::new()), bus.clone());

        let handles = controller.submit_all([
            Request::LoadJobs { group: GroupId(4) },
            Request::LoadStats,
        ]);
        for handle in handles {
            handle.join().unwrap();
        }

        let outcomes: Vec<Outcome> = bus
            .receiver()
            .try_iter()
            .filter_map(|e| match e {
                Event::RequestCompleted(outcome) => Some(outcome),
                _ => None,
            })
            .collect();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 1);
    }
}
