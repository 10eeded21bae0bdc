//! Content digests over canonical text, for schema change detection.
//!
//! - algorithm: SHA-256
//! - input: the UTF-8 bytes of the canonical rendering
//! - output: `"sha256:<64 lowercase hex digits>"`
//!
//! Two files with the same canonical text share a digest, whatever order their
//! declarations were loaded in.

use std::fmt::Write as _;

use protonorm_descriptor::SchemaFile;
use sha2::{Digest as _, Sha256};

use crate::driver::canonicalize;
use crate::error::CanonicalizeError;

pub const DIGEST_PREFIX: &str = "sha256:";

pub fn digest_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(DIGEST_PREFIX.len() + 64);
    out.push_str(DIGEST_PREFIX);
    for b in digest.iter() {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub fn canonical_digest(file: &SchemaFile) -> Result<String, CanonicalizeError> {
    Ok(digest_text(&canonicalize(file)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protonorm_descriptor::MessageDescriptor;

    #[test]
    fn digest_has_expected_prefix_and_width() {
        let d = digest_text("message M {\n}\n");
        assert!(d.starts_with(DIGEST_PREFIX));
        assert_eq!(d.len(), DIGEST_PREFIX.len() + 64);
    }

    #[test]
    fn empty_text_digest_is_the_sha256_of_nothing() {
        assert_eq!(
            digest_text(""),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_tracks_canonical_text() {
        let mut a = SchemaFile::default();
        a.add_message(MessageDescriptor::new("A"));
        let mut b = a.clone();
        assert_eq!(canonical_digest(&a).expect("a"), canonical_digest(&b).expect("b"));

        b.add_message(MessageDescriptor::new("B"));
        assert_ne!(canonical_digest(&a).expect("a"), canonical_digest(&b).expect("b"));
    }
}
