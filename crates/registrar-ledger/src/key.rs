//! Composite secondary-key construction.
//!
//! Secondary index keys have the lexical shape
//! `<index><SEP><dimension…><SEP><primary>`, joined with a reserved
//! separator that is never legal inside a dimension value. Because the
//! separator sorts below every printable character, a prefix ending in it
//! bounds a scan to exactly one index and dimension combination.

/// Reserved component separator. U+0000 cannot appear in any dimension
/// value, so `composite_prefix` ranges never bleed into sibling dimensions.
pub const KEY_SEPARATOR: char = '\u{0}';

/// Sentinel value stored under index entries. The entry's existence is the
/// information; readers always re-fetch the primary entity.
pub const INDEX_MARKER: &[u8] = &[0x00];

/// Errors raised while building composite keys.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("key component may not contain the reserved separator: {0:?}")]
    ReservedSeparator(String),

    #[error("key component may not be empty")]
    EmptyComponent,
}

fn check_component(part: &str) -> Result<(), KeyError> {
    if part.is_empty() {
        return Err(KeyError::EmptyComponent);
    }
    if part.contains(KEY_SEPARATOR) {
        return Err(KeyError::ReservedSeparator(part.to_string()));
    }
    Ok(())
}

/// Build a full composite key from an index name and its components
/// (dimension values followed by the primary key).
pub fn composite_key(index: &str, parts: &[&str]) -> Result<String, KeyError> {
    check_component(index)?;
    let mut key = String::from(index);
    for part in parts {
        check_component(part)?;
        key.push(KEY_SEPARATOR);
        key.push_str(part);
    }
    Ok(key)
}

/// Build a scan prefix covering every key under `index` with the given
/// leading dimension values. The trailing separator keeps the range from
/// matching longer sibling dimension values.
pub fn composite_prefix(index: &str, dims: &[&str]) -> Result<String, KeyError> {
    let mut prefix = composite_key(index, dims)?;
    prefix.push(KEY_SEPARATOR);
    Ok(prefix)
}

/// Split a composite key back into its components. The first component is
/// the index name, the last is the primary key.
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(KEY_SEPARATOR).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_round_trips() {
        let key = composite_key("student.dept", &["CSE", "CS21B001"]).expect("key should build");
        assert_eq!(split_key(&key), vec!["student.dept", "CSE", "CS21B001"]);
    }

    #[test]
    fn prefix_bounds_exclude_sibling_dimensions() {
        let prefix = composite_prefix("student.dept", &["CS"]).expect("prefix should build");
        let cse = composite_key("student.dept", &["CSE", "CS21B001"]).expect("key should build");
        let cs = composite_key("student.dept", &["CS", "CS21B002"]).expect("key should build");
        assert!(!cse.starts_with(&prefix));
        assert!(cs.starts_with(&prefix));
    }

    #[test]
    fn components_reject_separator_and_empty() {
        let err = composite_key("student.dept", &["CSE\u{0}X", "r1"])
            .expect_err("separator inside a component must be rejected");
        assert!(matches!(err, KeyError::ReservedSeparator(_)));

        let err = composite_key("student.dept", &["", "r1"])
            .expect_err("empty component must be rejected");
        assert!(matches!(err, KeyError::EmptyComponent));
    }
}
