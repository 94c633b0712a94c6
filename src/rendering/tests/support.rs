//! Shared fixtures for rendering tests.

use std::sync::{Arc, Mutex};

use crate::rendering::domain::{FieldValue, TypeDescriptor, Value};
use crate::rendering::ports::{ExecutionHost, HostError, HostResult};

/// Host that echoes executed code back as a string value.
#[derive(Debug, Default)]
pub struct EchoHost {
    executed: Mutex<Vec<String>>,
    declared: Mutex<Vec<(String, Value)>>,
    failing_fragment: Option<String>,
}

impl EchoHost {
    /// Host that fails any snippet containing `fragment`.
    pub fn failing_on(fragment: &str) -> Self {
        Self {
            failing_fragment: Some(fragment.to_owned()),
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("executed lock").clone()
    }

    pub fn declared(&self) -> Vec<(String, Value)> {
        self.declared.lock().expect("declared lock").clone()
    }
}

impl ExecutionHost for EchoHost {
    fn execute(&self, code: &str) -> HostResult<FieldValue> {
        self.executed
            .lock()
            .expect("executed lock")
            .push(code.to_owned());
        if let Some(fragment) = &self.failing_fragment
            && code.contains(fragment.as_str())
        {
            return Err(HostError::new(format!("cannot compile `{code}`")));
        }
        Ok(FieldValue::unnamed(Value::str(format!("<{code}>"))))
    }

    fn declare(&self, name: &str, value: Value) -> HostResult<()> {
        self.declared
            .lock()
            .expect("declared lock")
            .push((name.to_owned(), value));
        Ok(())
    }
}

/// `collections.Iterable` <- `collections.List` <- `collections.ArrayList`.
pub struct Collections {
    pub iterable: Arc<TypeDescriptor>,
    pub list: Arc<TypeDescriptor>,
    pub array_list: Arc<TypeDescriptor>,
    pub hash_map: Arc<TypeDescriptor>,
}

pub fn collections() -> Collections {
    let iterable = TypeDescriptor::new("collections.Iterable").into_shared();
    let list = TypeDescriptor::new("collections.List")
        .with_supertype(Arc::clone(&iterable))
        .with_type_parameters(1)
        .into_shared();
    let array_list = TypeDescriptor::new("collections.ArrayList")
        .with_supertype(Arc::clone(&list))
        .with_type_parameters(1)
        .into_shared();
    let hash_map = TypeDescriptor::new("collections.HashMap")
        .with_type_parameters(2)
        .into_shared();
    Collections {
        iterable,
        list,
        array_list,
        hash_map,
    }
}
