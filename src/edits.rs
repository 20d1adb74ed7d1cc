//! Edit-Distance Candidate Generation
//!
//! Single-character edit variants used for spelling-correction lookups.
//! Pure string transforms; validity against a real vocabulary is decided by
//! a store lookup afterwards, never here.

use hashbrown::HashSet;

const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// All variants with exactly one character removed: `|word|` entries.
pub fn deletes(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    (0..chars.len())
        .map(|i| {
            let mut out = String::with_capacity(word.len());
            out.extend(&chars[..i]);
            out.extend(&chars[i + 1..]);
            out
        })
        .collect()
}

/// All variants with one adjacent character pair transposed: `|word| - 1`
/// entries.
pub fn transposes(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() < 2 {
        return Vec::new();
    }
    (0..chars.len() - 1)
        .map(|i| {
            let mut swapped = chars.clone();
            swapped.swap(i, i + 1);
            swapped.into_iter().collect()
        })
        .collect()
}

/// All variants with one position substituted by a lowercase letter,
/// deduplicated, sorted, and excluding the original word.
pub fn replaces(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut set = HashSet::new();
    for i in 0..chars.len() {
        for c in LETTERS.chars() {
            let mut replaced = chars.clone();
            replaced[i] = c;
            set.insert(replaced.into_iter().collect::<String>());
        }
    }
    set.remove(word);
    let mut out: Vec<String> = set.into_iter().collect();
    out.sort();
    out
}

/// All variants with one lowercase letter inserted at any offset:
/// `26 * (|word| + 1)` entries (duplicates possible, not removed).
pub fn inserts(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::with_capacity(26 * (chars.len() + 1));
    for i in 0..=chars.len() {
        for c in LETTERS.chars() {
            let mut inserted = String::with_capacity(word.len() + 1);
            inserted.extend(&chars[..i]);
            inserted.push(c);
            inserted.extend(&chars[i..]);
            out.push(inserted);
        }
    }
    out
}

/// Deduplicated union of all single-edit variants.
pub fn edits_within_one(word: &str) -> HashSet<String> {
    let mut set = HashSet::new();
    set.extend(replaces(word));
    set.extend(inserts(word));
    set.extend(deletes(word));
    set.extend(transposes(word));
    set
}

/// Deduplicated union of single-edit variants of every single-edit variant.
///
/// Combinatorially large; callers opt in explicitly.
pub fn edits_within_two(word: &str) -> HashSet<String> {
    let mut set = HashSet::new();
    for edit in edits_within_one(word) {
        set.extend(edits_within_one(&edit));
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deletes_count() {
        let variants = deletes("cans");
        assert_eq!(variants.len(), 4);
        assert!(variants.contains(&"ans".to_string()));
        assert!(variants.contains(&"can".to_string()));
    }

    #[test]
    fn test_deletes_single_char() {
        assert_eq!(deletes("a"), vec![String::new()]);
    }

    #[test]
    fn test_transposes() {
        let variants = transposes("cans");
        assert_eq!(variants.len(), 3);
        assert!(variants.contains(&"acns".to_string()));
        assert!(variants.contains(&"cnas".to_string()));
        assert!(variants.contains(&"casn".to_string()));
        assert!(transposes("a").is_empty());
    }

    #[test]
    fn test_replaces_excludes_original() {
        let variants = replaces("cans");
        assert!(!variants.contains(&"cans".to_string()));
        // 4 positions x 25 effective letters, all distinct for "cans"
        assert_eq!(variants.len(), 100);
        assert!(variants.contains(&"bans".to_string()));
    }

    #[test]
    fn test_replaces_sorted() {
        let variants = replaces("at");
        let mut sorted = variants.clone();
        sorted.sort();
        assert_eq!(variants, sorted);
    }

    #[test]
    fn test_inserts_count() {
        // 26 letters x (4 + 1) offsets, duplicates kept
        assert_eq!(inserts("cans").len(), 130);
        assert_eq!(inserts("").len(), 26);
    }

    #[test]
    fn test_edits_within_one_union() {
        let set = edits_within_one("at");
        assert!(set.contains("a")); // delete
        assert!(set.contains("ta")); // transpose
        assert!(set.contains("it")); // replace
        assert!(set.contains("ant")); // insert
        assert!(!set.is_empty());
    }

    #[test]
    fn test_edits_within_two_reaches_deeper() {
        let set = edits_within_two("a");
        assert!(set.contains("abc"));
        assert!(set.contains("")); // delete then delete-of-sibling paths
    }
}
