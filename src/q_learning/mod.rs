//! Tabular Q-learning for the intruder
//!
//! The intruder observes its 3x3 neighborhood, looks up a [`QTable`] keyed by
//! the encoded observation and picks a horizontal shift through a [`Policy`].
//! Observed transitions are staged and replayed in batches.
//!
//! ## Update rule
//!
//! | Term | Meaning |
//! |------|---------|
//! | `α` | learning rate, `0 < α ≤ 1` |
//! | `γ` | discount factor, `0 ≤ γ < 1` |
//! | `max_a' Q(s',a')` | best recorded value in the next state, `0` if none |
//!
//! `Q(s,a) ← Q(s,a) + α·(r + γ·max_a' Q(s',a') − Q(s,a))`
//!
//! ## Usage Example
//!
//! ```
//! use intruder::{
//!     encoding::StateKey,
//!     q_learning::{Policy, QTable},
//!     types::Action,
//! };
//!
//! let mut table = QTable::new(0.5, 0.9);
//! let mut policy = Policy::new().with_seed(7);
//! let state = StateKey::parse("...CI....").unwrap();
//!
//! let decision = policy.select_action(&table, &state, 0.2);
//! table.record_transition(state, state, -1.0, decision.action);
//! table.learn(10);
//!
//! assert!(table.knows_action(&state, decision.action));
//! assert!(Action::ALL.contains(&decision.action));
//! ```

pub mod policy;
pub mod q_table;
pub mod replay;

// Public re-exports
pub use policy::{ActionSource, Decision, Policy};
pub use q_table::QTable;
pub use replay::{Transition, TransitionBuffer};
