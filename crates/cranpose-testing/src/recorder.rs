//! Callback recording for pointer source tests.

use crate::platform::FakeEvent;
use cranpose_foundation::InputModality;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerCall {
    Down,
    Move,
    Up,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub call: PointerCall,
    pub seq: u32,
    pub modality: InputModality,
}

/// Records every pointer callback a source makes.
///
/// Clones share the same log, so the recorder can be moved into callbacks
/// and still inspected by the test afterwards.
#[derive(Clone)]
pub struct CallbackRecorder {
    calls: Rc<RefCell<Vec<RecordedCall>>>,
    accept_down: Rc<Cell<bool>>,
}

impl Default for CallbackRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl CallbackRecorder {
    /// A recorder whose pointer-down callback accepts every interaction.
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            accept_down: Rc::new(Cell::new(true)),
        }
    }

    /// Choose what the pointer-down callback returns from now on.
    pub fn set_accept_down(&self, accept: bool) {
        self.accept_down.set(accept);
    }

    pub fn down_callback(&self) -> impl Fn(&FakeEvent, InputModality) -> bool + 'static {
        let recorder = self.clone();
        move |event: &FakeEvent, modality: InputModality| {
            recorder.record(PointerCall::Down, event, modality);
            recorder.accept_down.get()
        }
    }

    pub fn move_callback(&self) -> impl Fn(&FakeEvent, InputModality) + 'static {
        let recorder = self.clone();
        move |event: &FakeEvent, modality: InputModality| {
            recorder.record(PointerCall::Move, event, modality)
        }
    }

    pub fn up_callback(&self) -> impl Fn(&FakeEvent, InputModality) + 'static {
        let recorder = self.clone();
        move |event: &FakeEvent, modality: InputModality| {
            recorder.record(PointerCall::Up, event, modality)
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Number of recorded calls of the given kind.
    pub fn count(&self, call: PointerCall) -> usize {
        self.calls.borrow().iter().filter(|c| c.call == call).count()
    }

    pub fn last(&self) -> Option<RecordedCall> {
        self.calls.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: PointerCall, event: &FakeEvent, modality: InputModality) {
        self.calls.borrow_mut().push(RecordedCall {
            call,
            seq: event.seq,
            modality,
        });
    }
}
