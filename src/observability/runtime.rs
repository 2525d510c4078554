//! Process counters rendered by `/debug/vars`.

use serde_json::{Map, Value};
use tokio::runtime::Handle;

use crate::observability::stats::StatsSource;
use crate::store::SnapshotStore;

/// Collect runtime counters as a flat key/value document.
pub fn runtime_vars(store: &SnapshotStore, stats: &dyn StatsSource) -> Map<String, Value> {
    let mut vars = Map::new();

    let cmdline: Vec<Value> = std::env::args().map(Value::from).collect();
    vars.insert("cmdline".into(), Value::Array(cmdline));
    vars.insert("pid".into(), Value::from(std::process::id()));
    vars.insert("uptime_sec".into(), Value::from(stats.uptime().as_secs_f64()));

    if let Ok(handle) = Handle::try_current() {
        let runtime = handle.metrics();
        vars.insert("tasks_alive".into(), Value::from(runtime.num_alive_tasks()));
        vars.insert("runtime_workers".into(), Value::from(runtime.num_workers()));
    }

    let installed = store.load();
    vars.insert("snapshot_generation".into(), Value::from(installed.generation));
    vars.insert("providers".into(), Value::from(installed.snapshot.len()));

    vars
}
