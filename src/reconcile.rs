use std::collections::HashSet;

/// Asymmetric difference between the map dataset's country names and the
/// curated list. The two vocabularies are maintained independently and are
/// not expected to agree on punctuation or disputed-territory naming; the
/// mismatch is surfaced as a diagnostic, never normalized away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Names present in the geometry dataset but absent from the list
    pub only_in_map: Vec<String>,
    /// Names present in the list but absent from the geometry dataset
    pub only_in_list: Vec<String>,
}

impl Reconciliation {
    pub fn is_clean(&self) -> bool {
        self.only_in_map.is_empty() && self.only_in_list.is_empty()
    }

    /// Log the discrepancies. Diagnostic only; nothing in the UI changes.
    pub fn report(&self) {
        if self.is_clean() {
            tracing::info!("map and list vocabularies agree");
            return;
        }
        if !self.only_in_map.is_empty() {
            tracing::warn!(
                count = self.only_in_map.len(),
                names = ?self.only_in_map,
                "countries only in the map dataset"
            );
        }
        if !self.only_in_list.is_empty() {
            tracing::warn!(
                count = self.only_in_list.len(),
                names = ?self.only_in_list,
                "countries only in the static list"
            );
        }
    }
}

/// Compare the two vocabularies, preserving each input's original order.
/// Empty inputs yield empty outputs; there are no error conditions.
pub fn compare_country_lists(map_names: &[String], list_names: &[&str]) -> Reconciliation {
    let map_set: HashSet<&str> = map_names.iter().map(String::as_str).collect();
    let list_set: HashSet<&str> = list_names.iter().copied().collect();

    let only_in_map = map_names
        .iter()
        .filter(|name| !list_set.contains(name.as_str()))
        .cloned()
        .collect();
    let only_in_list = list_names
        .iter()
        .filter(|name| !map_set.contains(**name))
        .map(|name| name.to_string())
        .collect();

    Reconciliation { only_in_map, only_in_list }
}
