// Copyright © 2025 smabridge authors
// Licensed under the smabridge License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

/// Splits a comma-separated parameter. Elements are trimmed, empty elements are
/// dropped, order and duplicates are kept.
pub fn split(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_and_drops_empties() {
        assert_eq!(
            split(" a@x.com, b@x.com ,, ,c@y.com,"),
            vec!["a@x.com", "b@x.com", "c@y.com"]
        );
        assert!(split("").is_empty());
        assert!(split(" , ,").is_empty());
    }

    #[test]
    fn split_keeps_duplicates_and_order() {
        assert_eq!(split("Virus,Policy,Virus"), vec!["Virus", "Policy", "Virus"]);
    }

    #[test]
    fn join_inverts_split() {
        let lists: [&[&str]; 4] = [
            &["Policy"],
            &["Policy", "Virus"],
            &["a@x.com", "a@x.com", "File Analysis"],
            &[],
        ];
        for list in lists {
            let expected: Vec<String> = list.iter().map(|s| s.to_string()).collect();
            assert_eq!(split(&join(list)), expected);
        }
    }
}
