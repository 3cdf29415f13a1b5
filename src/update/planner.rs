//! Selection of pending updates

use crate::update::types::UpdateEntry;

/// Returns the entries strictly after the first entry whose version equals
/// `current`, in manifest order.
///
/// Versions are opaque and compared by exact string equality. When `current`
/// does not appear in the manifest nothing is selected, so a manifest that
/// drops the installed version never triggers an update.
pub fn plan(current: &str, entries: &[UpdateEntry]) -> Vec<UpdateEntry> {
    entries
        .iter()
        .skip_while(|entry| entry.version != current)
        .skip(1)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn manifest(versions: &[&str]) -> Vec<UpdateEntry> {
        versions
            .iter()
            .map(|v| UpdateEntry::new(*v, format!("https://example.com/{v}.zip")))
            .collect()
    }

    fn versions(entries: &[UpdateEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.version.as_str()).collect()
    }

    #[rstest]
    #[case("1.0.0", &["1.0.0", "1.1.0", "1.2.0"], &["1.1.0", "1.2.0"])]
    #[case("1.1.0", &["1.0.0", "1.1.0", "1.2.0"], &["1.2.0"])]
    #[case("1.2.0", &["1.0.0", "1.1.0", "1.2.0"], &[])] // already latest
    #[case("2.0.0", &["1.0.0", "1.1.0", "1.2.0"], &[])] // not in manifest
    #[case("1.0.0", &[], &[])] // empty manifest
    #[case("1.0", &["1.0.0", "1.1.0"], &[])] // no semantic matching
    #[case("1.0.0", &["1.0.0", "1.1.0", "1.0.0", "1.2.0"], &["1.1.0", "1.0.0", "1.2.0"])] // first match wins
    #[case("b", &["c", "b", "a"], &["a"])] // manifest order, not sort order
    fn plan_selects_suffix_after_first_match(
        #[case] current: &str,
        #[case] available: &[&str],
        #[case] expected: &[&str],
    ) {
        let result = plan(current, &manifest(available));

        assert_eq!(versions(&result), expected);
    }

    #[test]
    fn plan_keeps_entries_intact() {
        let entries = manifest(&["1.0.0", "1.1.0"]);

        let result = plan("1.0.0", &entries);

        assert_eq!(result, vec![entries[1].clone()]);
    }
}
