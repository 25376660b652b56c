//! MW-010: BLAKE3 content addressing for module build steps.

use serde::Serialize;

/// Hash a string. Returns `"blake3:{hex}"`.
pub fn hash_string(s: &str) -> String {
    format!("blake3:{}", blake3::hash(s.as_bytes()).to_hex())
}

/// Compute a composite hash from multiple components.
///
/// Components are NUL-separated, so `["ab", "c"]` and `["a", "bc"]` differ.
pub fn composite_hash(components: &[&str]) -> String {
    let mut hasher = blake3::Hasher::new();
    for c in components {
        hasher.update(c.as_bytes());
        hasher.update(b"\0");
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

/// One content-addressed build step a module depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDefinition {
    /// What produced the step (`local`, `git`, `dir`, `runtime`)
    pub op: String,
    pub digest: String,
}

impl BuildDefinition {
    pub fn new(op: &str, components: &[&str]) -> Self {
        let mut all = Vec::with_capacity(components.len() + 1);
        all.push(op);
        all.extend_from_slice(components);
        Self {
            op: op.to_string(),
            digest: composite_hash(&all),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mw010_hash_string() {
        let h1 = hash_string("hello");
        let h2 = hash_string("hello");
        let h3 = hash_string("world");
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert!(h1.starts_with("blake3:"));
        assert_eq!(h1.len(), 7 + 64);
    }

    #[test]
    fn test_mw010_composite_hash_order_and_boundaries() {
        let h = composite_hash(&["a", "b"]);
        assert_ne!(h, composite_hash(&["b", "a"]));
        assert_ne!(composite_hash(&["ab", "c"]), composite_hash(&["a", "bc"]));
    }

    #[test]
    fn test_mw010_build_definition_scoped_by_op() {
        let local = BuildDefinition::new("local", &["/work", "greet"]);
        let dir = BuildDefinition::new("dir", &["/work", "greet"]);
        assert_eq!(local.op, "local");
        assert_ne!(local.digest, dir.digest);
        assert_eq!(local, BuildDefinition::new("local", &["/work", "greet"]));
    }
}
