use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use bitflags::bitflags;
use core::cell::RefCell;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Notification emitted by [`PuzzleEngine`] for the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A map was (re)laid out. `first_start` is false for restarts, which keep the current pan offset.
    SceneInitialized { map: LevelMap, first_start: bool },
    TokenMoved { cell_id: CellId },
    StepCountChanged { count: u32 },
    CellStatesChanged { cells: Vec<CellView> },
    LevelComplete { score: u32, star_count: u8 },
    AllLevelsComplete,
    LevelLoadFailed { reason: String },
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Topics: u8 {
        const SCENE_INITIALIZED = 1 << 0;
        const TOKEN_MOVED = 1 << 1;
        const STEP_COUNT_CHANGED = 1 << 2;
        const CELL_STATES_CHANGED = 1 << 3;
        const LEVEL_COMPLETE = 1 << 4;
        const ALL_LEVELS_COMPLETE = 1 << 5;
        const LEVEL_LOAD_FAILED = 1 << 6;
    }
}

impl GameEvent {
    pub const fn topic(&self) -> Topics {
        match self {
            Self::SceneInitialized { .. } => Topics::SCENE_INITIALIZED,
            Self::TokenMoved { .. } => Topics::TOKEN_MOVED,
            Self::StepCountChanged { .. } => Topics::STEP_COUNT_CHANGED,
            Self::CellStatesChanged { .. } => Topics::CELL_STATES_CHANGED,
            Self::LevelComplete { .. } => Topics::LEVEL_COMPLETE,
            Self::AllLevelsComplete => Topics::ALL_LEVELS_COMPLETE,
            Self::LevelLoadFailed { .. } => Topics::LEVEL_LOAD_FAILED,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

struct Subscriber {
    id: SubscriptionId,
    topics: Topics,
    /// Returns false once the subscription has no receiver left.
    handler: Box<dyn FnMut(&GameEvent) -> bool>,
}

/// Synchronous fan-out of [`GameEvent`]s to subscribers, in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u32,
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        topics: Topics,
        mut handler: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.push_subscriber(
            topics,
            Box::new(move |event: &GameEvent| {
                handler(event);
                true
            }),
        )
    }

    /// Subscribes a queue the renderer drains at its own pace, e.g. once per frame.
    ///
    /// The bus only holds a weak reference: once every clone of the returned queue is dropped,
    /// the subscription is removed on the next [`emit`](Self::emit).
    pub fn subscribe_queue(&mut self, topics: Topics) -> EventQueue {
        let queue = EventQueue::default();
        let sink = Rc::downgrade(&queue.0);
        self.push_subscriber(
            topics,
            Box::new(move |event: &GameEvent| EventQueue::push_weak(&sink, event)),
        );
        queue
    }

    fn push_subscriber(
        &mut self,
        topics: Topics,
        handler: Box<dyn FnMut(&GameEvent) -> bool>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            topics,
            handler,
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|sub| sub.id != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Delivers `event` to every subscriber of its topic, dropping queue subscriptions whose
    /// queue is gone.
    pub fn emit(&mut self, event: GameEvent) {
        let topic = event.topic();
        let before = self.subscribers.len();
        self.subscribers
            .retain_mut(|sub| !sub.topics.intersects(topic) || (sub.handler)(&event));
        if self.subscribers.len() != before {
            log::debug!(
                "Dropped {} subscription(s) with no receiver",
                before - self.subscribers.len()
            );
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("next_id", &self.next_id)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Shared FIFO of events, filled by an [`EventBus`] subscription.
#[derive(Clone, Debug, Default)]
pub struct EventQueue(Rc<RefCell<VecDeque<GameEvent>>>);

impl EventQueue {
    fn push(&self, event: GameEvent) {
        self.0.borrow_mut().push_back(event);
    }

    fn push_weak(sink: &Weak<RefCell<VecDeque<GameEvent>>>, event: &GameEvent) -> bool {
        match sink.upgrade() {
            Some(queue) => {
                EventQueue(queue).push(event.clone());
                true
            }
            None => false,
        }
    }

    pub fn pop(&self) -> Option<GameEvent> {
        self.0.borrow_mut().pop_front()
    }

    pub fn drain(&self) -> Vec<GameEvent> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn delivers_only_subscribed_topics() {
        let mut bus = EventBus::new();
        let steps = bus.subscribe_queue(Topics::STEP_COUNT_CHANGED);
        let everything = bus.subscribe_queue(Topics::all());

        bus.emit(GameEvent::StepCountChanged { count: 1 });
        bus.emit(GameEvent::AllLevelsComplete);

        assert_eq!(steps.drain(), [GameEvent::StepCountChanged { count: 1 }]);
        assert_eq!(everything.len(), 2);
        assert_eq!(
            everything.pop(),
            Some(GameEvent::StepCountChanged { count: 1 })
        );
        assert_eq!(everything.pop(), Some(GameEvent::AllLevelsComplete));
        assert!(everything.is_empty());
    }

    #[test]
    fn handlers_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second"] {
            let log = log.clone();
            bus.subscribe(Topics::all(), move |event| {
                log.borrow_mut().push((name, event.topic()));
            });
        }
        bus.emit(GameEvent::TokenMoved {
            cell_id: "a".into(),
        });

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", Topics::TOKEN_MOVED),
                ("second", Topics::TOKEN_MOVED)
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let queue = EventQueue::default();
        let sink = queue.clone();
        let id = bus.subscribe(Topics::all(), move |event| sink.push(event.clone()));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(GameEvent::AllLevelsComplete);

        assert!(queue.is_empty());
        assert!(bus.is_empty());
    }

    #[test]
    fn dropped_queue_is_pruned_on_next_delivery() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe_queue(Topics::all());
        let dropped = bus.subscribe_queue(Topics::all());
        let clone = dropped.clone();
        drop(dropped);

        bus.emit(GameEvent::AllLevelsComplete);
        assert_eq!(bus.len(), 2, "a live clone keeps the subscription");
        assert_eq!(clone.drain(), [GameEvent::AllLevelsComplete]);

        drop(clone);
        bus.emit(GameEvent::StepCountChanged { count: 2 });

        assert_eq!(bus.len(), 1);
        assert_eq!(
            kept.drain(),
            [
                GameEvent::AllLevelsComplete,
                GameEvent::StepCountChanged { count: 2 }
            ]
        );
    }

    #[test]
    fn dropped_queue_outside_its_topics_lingers_until_matched() {
        let mut bus = EventBus::new();
        drop(bus.subscribe_queue(Topics::LEVEL_COMPLETE));

        bus.emit(GameEvent::AllLevelsComplete);
        assert_eq!(bus.len(), 1);

        bus.emit(GameEvent::LevelComplete {
            score: 100,
            star_count: 3,
        });
        assert!(bus.is_empty());
    }
}
