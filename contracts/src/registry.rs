//! The explicit function registry.
//!
//! The registry is constructed up front and passed to the executor at
//! initialization; its lifecycle is scoped to that executor instance.

use std::collections::BTreeMap;

use crate::error::ExecError;
use crate::state::{ContractState, Value};

/// A registered state-transition function.
///
/// Must be pure: the new state may depend only on the given state and args.
pub type ContractFn = fn(&ContractState, &[Value]) -> Result<ContractState, ExecError>;

struct RegisteredFunction {
    arity: usize,
    func: ContractFn,
}

/// An explicit, constructed mapping from function name to handler.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, RegisteredFunction>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the built-in token functions:
    /// `transfer(from, to, amount)`, `mint(to, amount)`, `set(key, value)`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("transfer", 3, builtin_transfer);
        registry.register("mint", 2, builtin_mint);
        registry.register("set", 2, builtin_set);
        registry
    }

    /// Register a function under `name` with a fixed argument count.
    pub fn register(&mut self, name: impl Into<String>, arity: usize, func: ContractFn) {
        self.functions
            .insert(name.into(), RegisteredFunction { arity, func });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered function names in deterministic order.
    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<(usize, ContractFn)> {
        self.functions.get(name).map(|r| (r.arity, r.func))
    }
}

// ── Built-in functions ─────────────────────────────────────────────────

fn as_text<'a>(args: &'a [Value], idx: usize) -> Result<&'a str, ExecError> {
    match &args[idx] {
        Value::Text(s) if !s.is_empty() => Ok(s),
        Value::Text(_) => Err(ExecError::InvalidArgs(format!(
            "argument {idx} must be a non-empty account key"
        ))),
        Value::Uint(_) => Err(ExecError::InvalidArgs(format!(
            "argument {idx} must be text"
        ))),
    }
}

fn as_uint(args: &[Value], idx: usize) -> Result<u128, ExecError> {
    match &args[idx] {
        Value::Uint(n) => Ok(*n),
        Value::Text(_) => Err(ExecError::InvalidArgs(format!(
            "argument {idx} must be an unsigned integer"
        ))),
    }
}

/// `transfer(from, to, amount)` — move tokens between two balance keys.
fn builtin_transfer(state: &ContractState, args: &[Value]) -> Result<ContractState, ExecError> {
    let from = as_text(args, 0)?;
    let to = as_text(args, 1)?;
    let amount = as_uint(args, 2)?;

    let from_balance = state
        .get_uint(from)
        .ok_or_else(|| ExecError::InvalidArgs(format!("{from:?} does not hold a balance")))?;
    let to_balance = state
        .get_uint(to)
        .ok_or_else(|| ExecError::InvalidArgs(format!("{to:?} does not hold a balance")))?;
    let remaining = from_balance
        .checked_sub(amount)
        .ok_or_else(|| ExecError::InvalidArgs(format!("insufficient balance in {from:?}")))?;
    let credited = to_balance
        .checked_add(amount)
        .ok_or_else(|| ExecError::InvalidArgs(format!("balance overflow in {to:?}")))?;

    let mut next = state.clone();
    next.insert(from, Value::Uint(remaining));
    next.insert(to, Value::Uint(credited));
    Ok(next)
}

/// `mint(to, amount)` — create tokens under a balance key.
fn builtin_mint(state: &ContractState, args: &[Value]) -> Result<ContractState, ExecError> {
    let to = as_text(args, 0)?;
    let amount = as_uint(args, 1)?;

    let balance = state
        .get_uint(to)
        .ok_or_else(|| ExecError::InvalidArgs(format!("{to:?} does not hold a balance")))?;
    let credited = balance
        .checked_add(amount)
        .ok_or_else(|| ExecError::InvalidArgs(format!("balance overflow in {to:?}")))?;

    let mut next = state.clone();
    next.insert(to, Value::Uint(credited));
    Ok(next)
}

/// `set(key, value)` — store an arbitrary value under a key.
fn builtin_set(state: &ContractState, args: &[Value]) -> Result<ContractState, ExecError> {
    let key = as_text(args, 0)?;
    let value = args[1].clone();

    let mut next = state.clone();
    next.insert(key, value);
    Ok(next)
}
