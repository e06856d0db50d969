//! Guarded state machine over [`MovementState`]
//!
//! Transitions are plain function pointers over a read-only signal snapshot, so guards
//! cannot mutate anything. Side effects live in [`StateHooks`], which the owner implements
//! and passes in on every tick.

use super::state::MovementState;

/// Guard predicate over a signal snapshot
pub type Guard<S> = fn(&S) -> bool;

/// Physics-rate callbacks for the active state
pub trait StateHooks {
    /// Called after the machine switches into `state`
    fn on_enter(&mut self, state: MovementState);

    /// Called before the machine leaves `state`
    fn on_exit(&mut self, state: MovementState);

    /// Per-physics-tick work for the active state
    fn on_fixed_tick(&mut self, _state: MovementState) {}
}

/// Frame-rate callbacks for the active state
pub trait FrameHooks {
    fn on_tick(&mut self, state: MovementState, dt: f32);
}

/// A state change performed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: MovementState,
    pub to: MovementState,
}

struct Transition<S> {
    from: Option<MovementState>,
    to: MovementState,
    guard: Guard<S>,
}

/// Ordered transition table with exactly one active state
pub struct StateMachine<S> {
    current: MovementState,
    transitions: Vec<Transition<S>>,
}

impl<S> StateMachine<S> {
    /// Create a machine in its initial state with no transitions
    pub fn new(initial: MovementState) -> Self {
        Self {
            current: initial,
            transitions: Vec::new(),
        }
    }

    /// Add a transition checked only while `from` is active
    pub fn add_transition(&mut self, from: MovementState, to: MovementState, guard: Guard<S>) {
        self.transitions.push(Transition {
            from: Some(from),
            to,
            guard,
        });
    }

    /// Add a transition checked from every state other than `to`
    pub fn add_any_transition(&mut self, to: MovementState, guard: Guard<S>) {
        self.transitions.push(Transition {
            from: None,
            to,
            guard,
        });
    }

    /// Jump straight to a state without running hooks
    pub fn set_initial_state(&mut self, state: MovementState) {
        self.current = state;
    }

    pub fn current_state(&self) -> MovementState {
        self.current
    }

    /// Number of declared transitions
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// First satisfied transition out of the current state
    ///
    /// From-state transitions are scanned in declaration order before any-state ones.
    pub fn next_state(&self, signals: &S) -> Option<MovementState> {
        let current = self.current;
        self.transitions
            .iter()
            .filter(|t| t.from == Some(current))
            .chain(
                self.transitions
                    .iter()
                    .filter(|t| t.from.is_none() && t.to != current),
            )
            .find(|t| (t.guard)(signals))
            .map(|t| t.to)
    }

    /// Per-frame dispatch
    pub fn tick<H: FrameHooks>(&mut self, hooks: &mut H, dt: f32) {
        hooks.on_tick(self.current, dt);
    }

    /// Per-physics-tick dispatch
    ///
    /// At most one transition runs, then the fixed hook of whichever state is active.
    pub fn fixed_tick<H: StateHooks>(&mut self, signals: &S, hooks: &mut H) -> Option<StateChange> {
        let change = self.next_state(signals).map(|to| self.change_state(to, hooks));
        hooks.on_fixed_tick(self.current);
        change
    }

    fn change_state<H: StateHooks>(&mut self, to: MovementState, hooks: &mut H) -> StateChange {
        let from = self.current;
        hooks.on_exit(from);
        self.current = to;
        hooks.on_enter(to);
        StateChange { from, to }
    }
}
