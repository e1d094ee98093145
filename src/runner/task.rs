//! Units of work and the stacks that hold them

use crate::config::CategoryEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A page to visit: its address, classification tags and pass-through options
///
/// Tasks are not mutated once created. They are consumed by whichever walker
/// or worker pops them, and dropped after processing whether it succeeded or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub tags: Vec<String>,

    pub uri: String,

    #[serde(default)]
    pub options: Map<String, Value>,
}

impl Task {
    pub fn new(tags: Vec<String>, uri: impl Into<String>) -> Self {
        Self {
            tags,
            uri: uri.into(),
            options: Map::new(),
        }
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }
}

impl From<&CategoryEntry> for Task {
    fn from(entry: &CategoryEntry) -> Self {
        Task::new(entry.tags.clone(), entry.uri.clone()).with_options(entry.options.clone())
    }
}

/// Last-in, first-out task container shared between concurrent consumers
///
/// Push and pop are atomic with respect to each other; a popped task is owned
/// exclusively by the caller.
#[derive(Debug, Default)]
pub struct TaskStack {
    tasks: Mutex<Vec<Task>>,
}

impl TaskStack {
    pub fn new() -> Self {
        Self::default()
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, task: Task) {
        self.tasks().push(task);
    }

    /// Pushes every task in order, so the last one is popped first
    pub fn extend(&self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks().extend(tasks);
    }

    /// Removes the most recently pushed task
    pub fn pop(&self) -> Option<Task> {
        self.tasks().pop()
    }

    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(uri: &str) -> Task {
        Task::new(Vec::new(), uri)
    }

    #[test]
    fn test_pop_order_is_lifo() {
        let stack = TaskStack::new();
        stack.push(task("A"));
        stack.push(task("B"));
        stack.push(task("C"));

        let order: Vec<String> = std::iter::from_fn(|| stack.pop()).map(|t| t.uri).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_extend_keeps_lifo() {
        let stack = TaskStack::new();
        stack.extend(vec![task("1"), task("2")]);
        stack.push(task("3"));

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop().unwrap().uri, "3");
        assert_eq!(stack.pop().unwrap().uri, "2");

        assert_eq!(stack.pop().unwrap().uri, "1");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_task_from_category_entry() {
        let mut options = Map::new();
        options.insert("lang".to_string(), json!("en"));
        let entry = CategoryEntry {
            tags: vec!["news".to_string()],
            uri: "http://a".to_string(),
            options,
        };

        let task = Task::from(&entry);
        assert_eq!(task.uri, "http://a");
        assert_eq!(task.tags, vec!["news".to_string()]);
        assert_eq!(task.options["lang"], "en");
    }

    #[test]
    fn test_concurrent_pops_take_each_task_once() {
        let stack = std::sync::Arc::new(TaskStack::new());
        stack.extend((0..1000).map(|i| task(&i.to_string())));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stack = stack.clone();
                std::thread::spawn(move || std::iter::from_fn(|| stack.pop()).count())
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 1000);
    }
}
