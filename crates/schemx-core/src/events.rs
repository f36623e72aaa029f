//! Change notification
//!
//! The undo stack reports every committed, undone and redone unit as a
//! `DocumentEvent`. Events go to subscribed observers synchronously and are
//! also queued until the owner drains them.

use std::collections::VecDeque;
use std::fmt;

use schemx_core_types::EntityId;

use crate::model::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    Added,
    Removed,
    Modified,
}

/// One entity touched by an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub action: ChangeAction,
    pub kind: EntityKind,
    pub id: EntityId,
    /// Owning page for symbols, net points and net lines
    pub schematic_id: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentAction {
    Committed,
    Undone,
    Redone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEvent {
    pub action: DocumentAction,
    /// Title of the undo unit
    pub title: String,
    pub changes: Vec<ChangeEvent>,
}

impl DocumentEvent {
    /// True if any change concerns `id`
    pub fn touches(&self, id: EntityId) -> bool {
        self.changes.iter().any(|c| c.id == id)
    }
}

/// Receiver of document events
pub trait DocumentObserver {
    fn on_document_event(&mut self, event: &DocumentEvent);
}

#[derive(Default)]
pub(crate) struct EventHub {
    observers: Vec<Box<dyn DocumentObserver>>,
    queue: VecDeque<DocumentEvent>,
}

impl EventHub {
    pub(crate) fn subscribe(&mut self, observer: Box<dyn DocumentObserver>) {
        self.observers.push(observer);
    }

    pub(crate) fn emit(&mut self, event: DocumentEvent) {
        for observer in &mut self.observers {
            observer.on_document_event(&event);
        }
        self.queue.push_back(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<DocumentEvent> {
        self.queue.drain(..).collect()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("observers", &self.observers.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<DocumentAction>>>);

    impl DocumentObserver for Recorder {
        fn on_document_event(&mut self, event: &DocumentEvent) {
            self.0.borrow_mut().push(event.action);
        }
    }

    #[test]
    fn test_emit_notifies_and_queues() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::default();
        hub.subscribe(Box::new(Recorder(seen.clone())));

        let id = EntityId::new();
        hub.emit(DocumentEvent {
            action: DocumentAction::Committed,
            title: "Add net class".to_string(),
            changes: vec![ChangeEvent {
                action: ChangeAction::Added,
                kind: EntityKind::NetClass,
                id,
                schematic_id: None,
            }],
        });

        assert_eq!(*seen.borrow(), vec![DocumentAction::Committed]);
        let drained = hub.drain();
        assert_eq!(drained.len(), 1);
        assert!(drained[0].touches(id));
        assert!(hub.drain().is_empty());
    }
}
