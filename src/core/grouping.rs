use crate::domain::model::{PrunePlan, VersionGroup};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

pub const DEFAULT_RETAIN_COUNT: usize = 50;

static GROUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<release>\d+\.\d+\.\d+)-(?P<preview>\w+)")
        .expect("version group pattern is valid")
});

/// `4.0.0-preview1-00051` belongs to `4.0.0-preview1`. Plain releases have no group.
pub fn group_label(version: &str) -> Option<String> {
    GROUP_PATTERN
        .captures(version)
        .map(|caps| format!("{}-{}", &caps["release"], &caps["preview"]))
}

/// Groups ordered by label, members newest first.
pub fn group_versions(versions: &[String]) -> Vec<VersionGroup> {
    let mut groups: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();

    for version in versions {
        match group_label(version) {
            Some(label) => {
                groups.entry(label).or_default().insert(version.as_str());
            }
            None => tracing::debug!("Version {} has no release/preview label, keeping it", version),
        }
    }

    groups
        .into_iter()
        .map(|(label, members)| VersionGroup {
            label,
            versions: members.into_iter().rev().map(str::to_string).collect(),
        })
        .collect()
}

pub fn plan_deletions(package_id: &str, versions: &[String], retain: usize) -> PrunePlan {
    let groups = group_versions(versions);

    let to_delete = groups
        .iter()
        .flat_map(|group| group.versions.iter().skip(retain).cloned())
        .collect();

    PrunePlan {
        package_id: package_id.to_string(),
        retain,
        groups,
        to_delete,
    }
}
