// SPDX-License-Identifier: MIT OR Apache-2.0
//! Display labels for sockets and boundary ports.

use bndl_graph::{Socket, SocketDirection};
use std::collections::{HashMap, HashSet};

/// Label every name of one ordered list.
///
/// Blank names become the direction's placeholder; the k-th repeat of a
/// name (k > 1) is suffixed `[k]`. An ordinal that would collide with a
/// label already in the list is bumped until the label is unused.
pub fn disambiguate<'a>(
    names: impl IntoIterator<Item = &'a str>,
    direction: SocketDirection,
) -> Vec<String> {
    let mut next: HashMap<String, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let base = match name.trim() {
                "" => direction.placeholder(),
                trimmed => trimmed,
            };
            let mut k = next.get(base).copied().unwrap_or(1);
            let mut label = if k == 1 { base.to_string() } else { format!("{base}[{k}]") };
            while used.contains(&label) {
                k += 1;
                label = format!("{base}[{k}]");
            }
            next.insert(base.to_string(), k + 1);
            used.insert(label.clone());
            label
        })
        .collect()
}

/// Labels for one node-side socket list
pub fn socket_labels(sockets: &[Socket], direction: SocketDirection) -> Vec<String> {
    disambiguate(sockets.iter().map(|s| s.name.as_str()), direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ordinals() {
        let labels = disambiguate(["A", "A", "B"], SocketDirection::Input);
        assert_eq!(labels, vec!["A", "A[2]", "B"]);
    }

    #[test]
    fn test_ordinals_skip_labels_already_taken() {
        let labels = disambiguate(["A[2]", "A", "A"], SocketDirection::Input);
        assert_eq!(labels, vec!["A[2]", "A", "A[3]"]);

        let labels = disambiguate(["A", "A", "A[2]"], SocketDirection::Input);
        assert_eq!(labels, vec!["A", "A[2]", "A[2][2]"]);
    }

    #[test]
    fn test_blank_placeholders() {
        let labels = disambiguate(["", "  ", "Geometry"], SocketDirection::Output);
        assert_eq!(labels, vec!["output", "output[2]", "Geometry"]);

        let labels = disambiguate([""], SocketDirection::Input);
        assert_eq!(labels, vec!["input"]);
    }

    #[test]
    fn test_lists_are_independent() {
        let first = disambiguate(["Value", "Value"], SocketDirection::Input);
        let second = disambiguate(["Value"], SocketDirection::Input);
        assert_eq!(first, vec!["Value", "Value[2]"]);
        assert_eq!(second, vec!["Value"]);
    }

    #[test]
    fn test_socket_labels() {
        let sockets = vec![Socket::input("Value", "VALUE"), Socket::input("Value", "VALUE")];
        assert_eq!(socket_labels(&sockets, SocketDirection::Input), vec!["Value", "Value[2]"]);
    }
}
