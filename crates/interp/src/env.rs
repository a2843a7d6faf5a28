//! Variable storage as a stack of call frames.
//!
//! Frame 0 holds the program's globals. Each function call pushes a frame
//! holding its parameters and pops it on return, so nothing bound inside a
//! call survives it. Lookups walk from the innermost frame outwards; writes
//! always land in the innermost frame.

use crate::value::Value;
use std::collections::HashMap;

#[derive(Debug)]
pub struct Environment {
    frames: Vec<HashMap<String, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Number of active call frames above the global one.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn push_frame(&mut self, bindings: HashMap<String, Value>) {
        self.frames.push(bindings);
    }

    /// Drops the innermost call frame. The global frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value);
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_globals() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));
        env.set("x", Value::Int(2));
        assert_eq!(env.get("x"), Some(&Value::Int(2)));
        assert_eq!(env.get("y"), None);
        assert_eq!(env.depth(), 0);
    }

    #[test]
    fn test_frame_sees_outer_bindings() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));
        env.push_frame(HashMap::from([("a".to_string(), Value::Int(5))]));
        assert_eq!(env.get("x"), Some(&Value::Int(1)));
        assert_eq!(env.get("a"), Some(&Value::Int(5)));
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_writes_in_frame_are_discarded_on_pop() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));
        env.push_frame(HashMap::new());
        env.set("x", Value::Int(99));
        env.set("tmp", Value::Int(3));
        assert_eq!(env.get("x"), Some(&Value::Int(99)));
        env.pop_frame();
        assert_eq!(env.get("x"), Some(&Value::Int(1)));
        assert_eq!(env.get("tmp"), None);
    }

    #[test]
    fn test_global_frame_survives_extra_pop() {
        let mut env = Environment::new();
        env.set("x", Value::Int(1));
        env.pop_frame();
        assert_eq!(env.get("x"), Some(&Value::Int(1)));
    }
}
