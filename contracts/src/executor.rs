//! The deterministic executor.

use crate::error::ExecError;
use crate::registry::FunctionRegistry;
use crate::state::{ContractState, Value};

/// Applies registered state-transition functions against a contract state.
///
/// `apply` is a pure function of `(state, function_name, args)`: it either
/// returns a complete new state or an error, and the input state is never
/// touched — there is no partial application.
pub struct Executor {
    registry: FunctionRegistry,
}

impl Executor {
    /// Create an executor over an explicitly constructed registry.
    pub fn new(registry: FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Create an executor with the built-in token functions.
    pub fn with_builtins() -> Self {
        Self::new(FunctionRegistry::with_builtins())
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Apply `function_name(args)` to `state`, returning the new state.
    ///
    /// Fails with [`ExecError::UnknownFunction`] when no such function is
    /// registered and [`ExecError::InvalidArgs`] on an arity or type
    /// mismatch — in both cases before any state is produced.
    pub fn apply(
        &self,
        state: &ContractState,
        function_name: &str,
        args: &[Value],
    ) -> Result<ContractState, ExecError> {
        let (arity, func) = self
            .registry
            .lookup(function_name)
            .ok_or_else(|| ExecError::UnknownFunction(function_name.to_string()))?;

        if args.len() != arity {
            return Err(ExecError::InvalidArgs(format!(
                "{function_name} takes {arity} argument(s), got {}",
                args.len()
            )));
        }

        func(state, args)
    }
}
