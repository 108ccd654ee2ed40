use serde_json::{Map, Value};

/// Keys retained by [`prune`], in the order they are written to the output.
pub const DEFAULT_KEYS: &[&str] = &["id", "name", "type", "componentProperties", "children"];

/// Ordered list of object keys that survive pruning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<String>,
}

impl KeySet {
    /// Build a key set, dropping duplicates while keeping first-seen order.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !unique.contains(&key) {
                unique.push(key);
            }
        }
        Self { keys: unique }
    }

    /// The default set extended with `extra` keys.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            DEFAULT_KEYS
                .iter()
                .map(|k| k.to_string())
                .chain(extra.into_iter().map(Into::into)),
        )
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

impl Default for KeySet {
    fn default() -> Self {
        Self::new(DEFAULT_KEYS.iter().copied())
    }
}

/// Prune a node tree down to the default key set.
///
/// See [`prune_with`].
pub fn prune(value: Value) -> Value {
    prune_with(value, &KeySet::default())
}

/// Prune a JSON tree so that every object keeps only the keys in `keys`.
///
/// Arrays keep their length and order, with each element pruned. Objects are
/// rebuilt in key-set order from the permitted keys they contain, each value
/// pruned in turn. Scalars pass through unchanged. The filter applies at every
/// level, including the contents of `componentProperties`.
///
/// Traversal uses a heap-allocated stack, so tree depth is not bounded by the
/// thread's call stack.
pub fn prune_with(value: Value, keys: &KeySet) -> Value {
    let mut stack: Vec<Frame> = Vec::new();
    let mut next = Some(value);

    loop {
        // Descend: containers open a frame, scalars are already final.
        let mut finished = match next.take() {
            Some(Value::Array(items)) => {
                stack.push(Frame::sequence(items));
                None
            }
            Some(Value::Object(map)) => {
                stack.push(Frame::mapping(map, keys));
                None
            }
            other => other,
        };

        // Ascend: hand finished values to their parents until one of them
        // still has a child waiting to be visited.
        loop {
            let Some(frame) = stack.last_mut() else {
                return finished.unwrap_or(Value::Null);
            };
            if let Some(done) = finished.take() {
                frame.accept(done);
            }
            match frame.next_child() {
                Some(child) => {
                    next = Some(child);
                    break;
                }
                None => finished = stack.pop().map(Frame::finish),
            }
        }
    }
}

/// A partially rebuilt container on the traversal stack.
enum Frame {
    Sequence {
        pending: std::vec::IntoIter<Value>,
        out: Vec<Value>,
    },
    Mapping {
        pending: std::vec::IntoIter<(String, Value)>,
        current: Option<String>,
        out: Map<String, Value>,
    },
}

impl Frame {
    fn sequence(items: Vec<Value>) -> Self {
        Frame::Sequence {
            out: Vec::with_capacity(items.len()),
            pending: items.into_iter(),
        }
    }

    fn mapping(mut map: Map<String, Value>, keys: &KeySet) -> Self {
        let retained: Vec<(String, Value)> = keys
            .keys()
            .iter()
            .filter_map(|key| map.remove(key).map(|value| (key.clone(), value)))
            .collect();

        Frame::Mapping {
            out: Map::with_capacity(retained.len()),
            pending: retained.into_iter(),
            current: None,
        }
    }

    fn next_child(&mut self) -> Option<Value> {
        match self {
            Frame::Sequence { pending, .. } => pending.next(),
            Frame::Mapping {
                pending, current, ..
            } => pending.next().map(|(key, value)| {
                *current = Some(key);
                value
            }),
        }
    }

    fn accept(&mut self, value: Value) {
        match self {
            Frame::Sequence { out, .. } => out.push(value),
            Frame::Mapping { current, out, .. } => {
                if let Some(key) = current.take() {
                    out.insert(key, value);
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Frame::Sequence { out, .. } => Value::Array(out),
            Frame::Mapping { out, .. } => Value::Object(out),
        }
    }
}
