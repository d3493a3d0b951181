//! Sentinel "unknown/unclassified" taxon spellings

const EXACT: [&str; 6] = ["other", "unclassified", "unknown", "unassigned", "na", ""];
const PREFIXES: [&str; 3] = ["unclassified", "unknown", "uncultured"];

/// True for names that stand for "no classification".
///
/// Compared case-insensitively on the raw name with surrounding whitespace
/// removed; no prefix stripping or underscore handling happens first.
pub fn is_unclassified(raw: &str) -> bool {
    let name = raw.trim().to_lowercase();
    EXACT.contains(&name.as_str()) || PREFIXES.iter().any(|p| name.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_sentinels() {
        for name in ["Other", "unclassified", "Unknown", "UNASSIGNED", "NA", "", "  "] {
            assert!(is_unclassified(name), "{:?} should be unclassified", name);
        }
    }

    #[test]
    fn test_prefix_sentinels() {
        for name in ["uncultured_bacterium", "Unclassified_Lachnospiraceae", "unknown genus"] {
            assert!(is_unclassified(name), "{:?} should be unclassified", name);
        }
    }

    #[test]
    fn test_real_names_pass_through() {
        for name in ["Bacteroides", "Nautilia", "g__unclassified", "Otherella", "Nanoarchaeum"] {
            assert!(!is_unclassified(name), "{:?} should not be unclassified", name);
        }
    }
}
