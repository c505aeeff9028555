//! Logical ID derivation
//!
//! CloudFormation logical IDs must be alphanumeric. Free-form resource
//! names (bucket names in particular) are normalized by splitting on
//! `.`/`-`/`_` and concatenating the capitalized segments.

/// Derive a logical ID from a free-form resource name.
///
/// Deterministic and idempotent: an already-derived ID passes through
/// unchanged. Empty input yields an empty ID.
///
/// ```
/// use skyform_synth::logical_id;
///
/// assert_eq!(logical_id("my-bucket.name"), "MyBucketName");
/// ```
pub fn logical_id(name: &str) -> String {
    name.replace(['.', '-'], "_")
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
