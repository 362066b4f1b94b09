//! Shared test helpers for index and slice tests.

#![allow(dead_code)]

use slicekit_index::{Delta, DeltaKind, EntityKey, Keyed, Stream};

/// A minimal entity with an intrinsic key field.
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub gid: Option<EntityKey>,
    pub title: String,
    pub complete: bool,
    pub priority: u8,
}

impl Todo {
    /// An entity that has never been admitted (no key yet).
    pub fn new(title: &str, complete: bool) -> Self {
        Self {
            gid: None,
            title: title.to_string(),
            complete,
            priority: 0,
        }
    }

    /// An entity that already carries `key`.
    pub fn keyed(k: &str, title: &str, complete: bool) -> Self {
        Self {
            gid: Some(key(k)),
            ..Self::new(title, complete)
        }
    }

    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

impl Keyed for Todo {
    fn key(&self, _field: &str) -> Option<EntityKey> {
        self.gid.clone()
    }

    fn set_key(&mut self, _field: &str, key: EntityKey) {
        self.gid = Some(key);
    }
}

pub fn key(s: &str) -> EntityKey {
    EntityKey::parse(s).unwrap()
}

pub fn is_complete(todo: &Todo) -> bool {
    todo.complete
}

/// Sorted titles, for order-independent comparisons.
pub fn titles(todos: &[Todo]) -> Vec<String> {
    let mut out: Vec<String> = todos.iter().map(|t| t.title.clone()).collect();
    out.sort();
    out
}

/// Entities sorted by key, for order-independent comparisons.
pub fn by_key(mut todos: Vec<Todo>) -> Vec<Todo> {
    todos.sort_by(|a, b| a.gid.cmp(&b.gid));
    todos
}

/// Every queued delta as `(kind, sorted titles)`.
pub fn drain_deltas(stream: &mut Stream<Delta<Todo>>) -> Vec<(DeltaKind, Vec<String>)> {
    stream
        .drain()
        .iter()
        .map(|delta| (delta.kind, titles(&delta.entries)))
        .collect()
}

/// Sizes of every queued snapshot.
pub fn drain_sizes(stream: &mut Stream<Vec<Todo>>) -> Vec<usize> {
    stream.drain().iter().map(|snapshot| snapshot.len()).collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
