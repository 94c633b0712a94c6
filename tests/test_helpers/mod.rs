//! Shared execution host for integration tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use kernel_results::rendering::domain::{FieldValue, Value};
use kernel_results::rendering::ports::{ExecutionHost, HostError, HostResult};

/// Host answering snippets from a fixed table and recording declarations.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    answers: BTreeMap<String, Value>,
    executed: Mutex<Vec<String>>,
    variables: Mutex<BTreeMap<String, Value>>,
}

impl ScriptedHost {
    /// Answers `code` with `value`.
    pub fn answering(mut self, code: &str, value: Value) -> Self {
        self.answers.insert(code.to_owned(), value);
        self
    }

    /// Returns the executed snippets in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns a declared variable.
    pub fn variable(&self, name: &str) -> Option<Value> {
        self.variables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

impl ExecutionHost for ScriptedHost {
    fn execute(&self, code: &str) -> HostResult<FieldValue> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(code.to_owned());
        self.answers
            .get(code)
            .cloned()
            .map(FieldValue::unnamed)
            .ok_or_else(|| HostError::new(format!("unresolved snippet `{code}`")))
    }

    fn declare(&self, name: &str, value: Value) -> HostResult<()> {
        self.variables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), value);
        Ok(())
    }
}
