//! Deterministic contract execution.
//!
//! A fixed set of state-transition functions is registered into an
//! explicit, constructed [`FunctionRegistry`] and handed to an
//! [`Executor`] at initialization — no process-wide mutable tables. Each
//! application is a pure function of `(state, function_name, args)`:
//! identical inputs yield identical new state on every participant, which
//! is what makes independent verification possible.

pub mod error;
pub mod executor;
pub mod registry;
pub mod state;

pub use error::ExecError;
pub use executor::Executor;
pub use registry::{ContractFn, FunctionRegistry};
pub use state::{ContractState, Value};
