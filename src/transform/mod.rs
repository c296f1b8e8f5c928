//! The transformer registry: a process-wide name → function map behind a
//! readers-writers lock. Lookups clone the `Arc` and drop the guard, so a
//! long-running transformer never blocks registration.

mod builtin;
mod text;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

/// A transformer: raw JSON bytes in, owned JSON bytes out. The second
/// argument is the `:arg` payload, empty when absent. Transformers must be
/// pure and thread-safe.
pub type TransformerFn = dyn Fn(&str, &str) -> String + Send + Sync;

static REGISTRY: LazyLock<RwLock<HashMap<String, Arc<TransformerFn>>>> = LazyLock::new(|| {
    let mut map: HashMap<String, Arc<TransformerFn>> = HashMap::new();
    builtin::install(&mut map);
    text::install(&mut map);
    RwLock::new(map)
});

/// Register `f` under `name`, overwriting any existing registration.
pub fn add_transformer<F>(name: &str, f: F)
where
    F: Fn(&str, &str) -> String + Send + Sync + 'static,
{
    let mut map = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    map.insert(name.to_string(), Arc::new(f));
}

/// Whether `name` resolves to a transformer (built-in or user-registered).
pub fn is_transformer_registered(name: &str) -> bool {
    REGISTRY
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .contains_key(name)
}

/// Look up and run a transformer. `None` means the name is unknown — the
/// caller turns that into a path error.
pub(crate) fn execute(name: &str, json: &str, arg: &str) -> Option<String> {
    let f = {
        let map = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
        map.get(name)?.clone()
    };
    Some(f(json, arg))
}

/// Decode a transformer argument that names a sub-path: it may be written
/// bare (`@pluck:name`) or as a JSON string (`@pluck:"a.b"`).
pub(crate) fn arg_path(arg: &str) -> std::borrow::Cow<'_, str> {
    crate::scanner::strings::unquote(arg.trim())
}
