//! Row selection applied after reconciliation.

use crate::report::merge::{FieldValue, MergedRecord};

/// Keeps only the record whose name matches exactly, if any.
pub fn by_name(records: Vec<MergedRecord>, name: &str) -> Vec<MergedRecord> {
    records
        .into_iter()
        .filter(|record| record.name == name)
        .collect()
}

/// Whether the published version and the repository tag disagree.
///
/// A missing tag or an unpublished package never equals a present
/// counterpart, so such rows always count as mismatched.
pub fn is_mismatch(record: &MergedRecord) -> bool {
    match (&record.latest_package_version, &record.latest_repo_tag) {
        (Some(version), FieldValue::Present(tag)) => version != tag,
        _ => true,
    }
}

/// Keeps only mismatched records.
pub fn mismatches(records: Vec<MergedRecord>) -> Vec<MergedRecord> {
    records.into_iter().filter(is_mismatch).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::merge::MissingReason;
    use rstest::rstest;

    fn record(name: &str, version: Option<&str>, tag: FieldValue) -> MergedRecord {
        MergedRecord {
            name: name.to_string(),
            latest_package_version: version.map(str::to_string),
            source_url: FieldValue::Present(format!("git@forge:acme/{name}.git")),
            latest_repo_tag: tag,
        }
    }

    #[rstest]
    #[case(Some("1.0.0"), FieldValue::Present("1.0.0".to_string()), false)]
    #[case(Some("1.0.0"), FieldValue::Present("1.1.0".to_string()), true)]
    #[case(Some("1.0.0"), FieldValue::Missing(MissingReason::NoTags), true)]
    #[case(None, FieldValue::Present("1.0.0".to_string()), true)]
    #[case(None, FieldValue::Missing(MissingReason::RepositoryNotFound), true)]
    fn is_mismatch_compares_version_against_tag(
        #[case] version: Option<&str>,
        #[case] tag: FieldValue,
        #[case] expected: bool,
    ) {
        assert_eq!(is_mismatch(&record("widget", version, tag)), expected);
    }

    #[test]
    fn mismatches_drops_rows_whose_version_equals_the_tag() {
        let records = vec![
            record(
                "in-sync",
                Some("1.0.0"),
                FieldValue::Present("1.0.0".to_string()),
            ),
            record(
                "drifted",
                Some("1.0.0"),
                FieldValue::Present("2.0.0".to_string()),
            ),
            record(
                "untagged",
                Some("1.0.0"),
                FieldValue::Missing(MissingReason::NoTags),
            ),
        ];

        let kept = mismatches(records);

        let names: Vec<_> = kept.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["drifted", "untagged"]);
    }

    #[test]
    fn by_name_keeps_at_most_one_exact_match() {
        let records = vec![
            record(
                "widget",
                Some("1.0.0"),
                FieldValue::Present("1.0.0".to_string()),
            ),
            record(
                "widget-extra",
                Some("2.0.0"),
                FieldValue::Present("2.0.0".to_string()),
            ),
        ];

        let kept = by_name(records.clone(), "widget");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "widget");

        let kept = by_name(records, "nope");
        assert!(kept.is_empty());
    }
}
