use todo_graph::Task;
use tokio::sync::broadcast;

/// Per-topic buffer size. A subscriber that falls further behind than
/// this drops its own backlog without blocking the publisher or any
/// other subscriber.
const TOPIC_CAPACITY: usize = 64;

/// In-process publish/subscribe channel for task change notifications.
///
/// Two topics exist, one for created tasks and one for updated tasks.
/// Publication is fire-and-forget: a mutation's success never depends on
/// whether anyone is listening. Each receiver observes every event
/// published to its topic from the moment of subscription onward; there
/// is no backlog replay.
#[derive(Debug, Clone)]
pub struct EventBus {
    created: broadcast::Sender<Task>,
    updated: broadcast::Sender<Task>,
}

impl EventBus {
    pub fn new() -> Self {
        let (created, _) = broadcast::channel(TOPIC_CAPACITY);
        let (updated, _) = broadcast::channel(TOPIC_CAPACITY);
        Self { created, updated }
    }

    /// Publishes a task to the `TaskCreated` topic.
    pub fn publish_created(&self, task: Task) {
        // send only fails when there are no receivers, which is fine here
        let _ = self.created.send(task);
    }

    /// Publishes a task to the `TaskUpdated` topic.
    pub fn publish_updated(&self, task: Task) {
        let _ = self.updated.send(task);
    }

    /// Returns a fresh receiver on the `TaskCreated` topic.
    pub fn subscribe_created(&self) -> broadcast::Receiver<Task> {
        self.created.subscribe()
    }

    /// Returns a fresh receiver on the `TaskUpdated` topic.
    pub fn subscribe_updated(&self) -> broadcast::Receiver<Task> {
        self.updated.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use todo_graph::TaskStatus;

    fn sample_task(id: i32) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: None,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn can_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish_created(sample_task(1));
        bus.publish_updated(sample_task(1));
    }

    #[tokio::test]
    async fn subscriber_receives_events_published_after_subscribing() {
        let bus = EventBus::new();
        bus.publish_created(sample_task(1));

        let mut receiver = bus.subscribe_created();
        bus.publish_created(sample_task(2));

        let received = receiver.recv().await.expect("event should arrive");
        assert_eq!(received.id, 2);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn topics_are_independent() {
        let bus = EventBus::new();
        let mut created = bus.subscribe_created();
        let mut updated = bus.subscribe_updated();

        bus.publish_updated(sample_task(7));

        let received = updated.recv().await.expect("event should arrive");
        assert_eq!(received.id, 7);
        assert!(created.try_recv().is_err());
    }

    #[tokio::test]
    async fn subscribers_are_independent() {
        let bus = EventBus::new();
        let mut first = bus.subscribe_created();
        let mut second = bus.subscribe_created();

        bus.publish_created(sample_task(3));

        assert_eq!(first.recv().await.expect("event should arrive").id, 3);
        assert_eq!(second.recv().await.expect("event should arrive").id, 3);
    }
}
