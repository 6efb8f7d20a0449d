//! Quick timing comparison: path writes against thaw, edit and rewrap.

use std::time::Instant;

use rime::{Container, Value, path};
use serde_json::json;

fn todo_list(n: usize) -> Container {
    let todos: Vec<_> = (0..n)
        .map(|i| json!({"title": format!("Item {}", i), "completed": false}))
        .collect();
    match Container::wrap(json!({"todos": todos, "filter": "all"})) {
        Ok(container) => container,
        Err(error) => panic!("todo list did not wrap: {}", error),
    }
}

fn toggle_all_with_paths(root: &Container, n: usize) -> Container {
    let mut current = root.clone();
    for i in 0..n {
        current = match current.set_in(&path!["todos", i, "completed"], true) {
            Ok(next) => next,
            Err(error) => panic!("toggle {} failed: {}", i, error),
        };
    }
    current
}

fn toggle_all_with_rewrap(root: &Container, n: usize) -> Container {
    let mut plain = root.thaw();
    for i in 0..n {
        plain["todos"][i]["completed"] = json!(true);
    }
    match Container::wrap(plain) {
        Ok(container) => container,
        Err(error) => panic!("rewrap failed: {}", error),
    }
}

fn main() {
    env_logger::init();

    println!("=== Quick Performance Comparison (toggle all) ===\n");

    for n in [10, 100, 1000] {
        println!("--- {} items ---", n);
        let root = todo_list(n);

        let start = Instant::now();
        let by_path = toggle_all_with_paths(&root, n);
        let path_time = start.elapsed();

        let start = Instant::now();
        let by_rewrap = toggle_all_with_rewrap(&root, n);
        let rewrap_time = start.elapsed();

        assert!(by_path.equals(&by_rewrap));

        println!("set_in: {:?}", path_time);
        println!("rewrap: {:?}", rewrap_time);
        println!("Ratio (set_in/rewrap): {:.2}x\n", path_time.as_secs_f64() / rewrap_time.as_secs_f64());
    }

    println!("=== Single Write Cost (1000 items) ===\n");
    {
        let root = todo_list(1000);

        let start = Instant::now();
        let hash = root.hash_code();
        println!("First hash: {:?} ({})", start.elapsed(), hash);

        let start = Instant::now();
        let _ = root.hash_code();
        println!("Cached hash: {:?}", start.elapsed());

        let start = Instant::now();
        let updated = root.set_in(&path!["todos", 500usize, "title"], "renamed");
        println!("One set_in: {:?}", start.elapsed());

        if let Ok(updated) = updated {
            let start = Instant::now();
            let hash = updated.hash_code();
            println!("Rehash after write: {:?} ({})", start.elapsed(), hash);
            assert_eq!(updated.get_in(&path!["todos", 500usize, "title"]), Some(Value::text("renamed")));
        }
    }

    rime::metrics::log_counters();
}
