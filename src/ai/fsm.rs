//! Finite State Machine for AI Behavior
//!
//! Generic state machine with enter/update/exit lifecycle hooks. Each state
//! owns its transition rules and returns a [`Transition`] from `update()`;
//! the machine performs the exit/enter sequence. All data shared between
//! states (timers, sensor readings, outputs) lives in the context type.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Debug)]
//! struct Idle;
//!
//! impl State<Sensors> for Idle {
//!     fn name(&self) -> &'static str { "Idle" }
//!
//!     fn update(&mut self, ctx: &mut Sensors) -> Transition<Sensors> {
//!         if ctx.target_close { Transition::to(Chase) } else { Transition::None }
//!     }
//! }
//!
//! let mut fsm = StateMachine::new(Idle);
//! fsm.update(&mut sensors);
//! ```

use std::fmt;

// ============================================================================
// State Trait
// ============================================================================

/// A state in the finite state machine.
///
/// The lifecycle is:
///
/// 1. `enter()` - Called once when entering this state
/// 2. `update()` - Called each time the machine is updated in this state
/// 3. `exit()` - Called once when leaving this state
pub trait State<Ctx>: fmt::Debug {
    /// State name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Called when entering this state.
    fn enter(&mut self, _ctx: &mut Ctx) {}

    /// Evaluate the state; returns whether to stay or change states.
    fn update(&mut self, ctx: &mut Ctx) -> Transition<Ctx>;

    /// Called when exiting this state.
    fn exit(&mut self, _ctx: &mut Ctx) {}
}

// ============================================================================
// Transition
// ============================================================================

/// A state transition decision returned from `State::update()`.
pub enum Transition<Ctx> {
    /// Stay in the current state.
    None,
    /// Transition to a new state. Re-entering the same kind of state is
    /// allowed and runs the full exit/enter sequence.
    To(Box<dyn State<Ctx>>),
}

impl<Ctx> Transition<Ctx> {
    /// Create a transition to a new state.
    pub fn to<S: State<Ctx> + 'static>(state: S) -> Self {
        Transition::To(Box::new(state))
    }
}

impl<Ctx> fmt::Debug for Transition<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "Transition::None"),
            Transition::To(state) => write!(f, "Transition::To({})", state.name()),
        }
    }
}

// ============================================================================
// State Machine
// ============================================================================

/// Owns the current state and drives its lifecycle.
pub struct StateMachine<Ctx> {
    /// Current active state
    current: Box<dyn State<Ctx>>,
    /// Whether enter() has been called on current state
    entered: bool,
}

impl<Ctx> StateMachine<Ctx> {
    /// Create a new state machine with an initial state.
    ///
    /// The initial state's `enter()` runs on the first `update()`, or
    /// immediately via [`StateMachine::start`].
    pub fn new<S: State<Ctx> + 'static>(initial: S) -> Self {
        Self {
            current: Box::new(initial),
            entered: false,
        }
    }

    /// Enter the initial state without evaluating it.
    pub fn start(&mut self, ctx: &mut Ctx) {
        if !self.entered {
            self.current.enter(ctx);
            self.entered = true;
        }
    }

    /// Update the state machine. Returns `true` if a transition happened.
    pub fn update(&mut self, ctx: &mut Ctx) -> bool {
        self.start(ctx);

        match self.current.update(ctx) {
            Transition::None => false,
            Transition::To(mut next) => {
                log::trace!("fsm: {} -> {}", self.current.name(), next.name());
                self.current.exit(ctx);
                next.enter(ctx);
                self.current = next;
                true
            }
        }
    }

    /// Get the name of the current state.
    #[must_use]
    pub fn current_state_name(&self) -> &'static str {
        self.current.name()
    }
}

impl<Ctx> fmt::Debug for StateMachine<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current.name())
            .field("entered", &self.entered)
            .finish()
    }
}
