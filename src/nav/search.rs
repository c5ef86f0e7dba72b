use crate::fs::entry::Entry;

/// Case-insensitive substring test. `query_lower` must already be lowercase.
fn contains_lower(name: &str, query_lower: &str) -> bool {
  name.to_lowercase().contains(query_lower)
}

/// Entries whose name contains `query`, in their original order. An empty
/// query keeps everything.
pub fn filter<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
  if query.is_empty() {
    return entries.iter().collect();
  }
  let query = query.to_lowercase();
  entries.iter().filter(|e| contains_lower(&e.name, &query)).collect()
}

/// First match scanning directories, then files. Nothing matches an empty
/// query.
pub fn best_match<'a>(
  directories: &'a [Entry],
  files: &'a [Entry],
  query: &str,
) -> Option<&'a Entry> {
  if query.is_empty() {
    return None;
  }
  let query = query.to_lowercase();
  directories
    .iter()
    .chain(files)
    .find(|e| contains_lower(&e.name, &query))
}
