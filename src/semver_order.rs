//! Ordering of release tags the way Go module tooling orders them.
//!
//! Tags carry a mandatory `v` prefix, `v1` and `v1.2` are shorthands for
//! `v1.0.0` and `v1.2.0`, build metadata is ignored, and anything that does
//! not parse sorts below every valid version.

use semver::{BuildMetadata, Version};
use std::cmp::Ordering;

pub fn parse_tag(tag: &str) -> Option<Version> {
    let rest = tag.strip_prefix('v')?;

    let core_end = rest.find(['-', '+']).unwrap_or(rest.len());
    let (core, suffix) = rest.split_at(core_end);
    let parts = core.split('.').count();

    let canonical = match parts {
        // Shorthand is only accepted without prerelease or build suffix
        1 if suffix.is_empty() => format!("{}.0.0", core),
        2 if suffix.is_empty() => format!("{}.0", core),
        3 => rest.to_string(),
        _ => return None,
    };

    let mut version = Version::parse(&canonical).ok()?;
    version.build = BuildMetadata::EMPTY;
    Some(version)
}

pub fn is_valid(tag: &str) -> bool {
    parse_tag(tag).is_some()
}

pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_tag(a), parse_tag(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Versions equal to the minimum are kept.
pub fn is_below_minimum(version: &str, min_version: &str) -> bool {
    compare_versions(version, min_version) == Ordering::Less
}
