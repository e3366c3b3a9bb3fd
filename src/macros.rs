//! Shared Macros

/// Keep the first occurrence of every non-empty string, in order.
#[macro_export]
macro_rules! dedupe {
    ($list:expr) => {{
        let mut seen = std::collections::HashSet::new();
        let mut result: Vec<String> = Vec::new();
        for item in $list {
            let item: String = item;
            if !item.is_empty() && seen.insert(item.clone()) {
                result.push(item);
            }
        }
        result
    }};
}
