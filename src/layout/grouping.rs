use crate::model::Descriptor;
use std::collections::BTreeMap;

/// Partitions descriptors by `Type` and sorts each group by reference,
/// descending. Descriptors without a reference sort as -1 so they stay in
/// their group (at the bottom) instead of being dropped.
///
/// The `BTreeMap` key order is load-bearing: lexicographic type order decides
/// panel placement left-to-right, top-to-bottom, and therefore which side
/// cross-panel arrows attach to.
pub fn group_by_type(descriptors: &[Descriptor]) -> BTreeMap<String, Vec<Descriptor>> {
    let mut groups: BTreeMap<String, Vec<Descriptor>> = BTreeMap::new();
    for descriptor in descriptors {
        groups
            .entry(descriptor.type_name.clone())
            .or_default()
            .push(descriptor.clone());
    }
    for members in groups.values_mut() {
        members.sort_by_key(|d| std::cmp::Reverse(d.reference.unwrap_or(-1)));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(type_name: &str, reference: Option<i64>) -> Descriptor {
        let mut record = json!({"Type": type_name});
        if let Some(r) = reference {
            record["Reference"] = json!(r);
        }
        Descriptor::from_record(serde_json::from_value(record).unwrap())
    }

    #[test]
    fn groups_sort_members_by_reference_descending() {
        let input = vec![
            descriptor("A", Some(3)),
            descriptor("B", Some(1)),
            descriptor("A", Some(9)),
            descriptor("A", Some(5)),
        ];
        let groups = group_by_type(&input);
        let refs: Vec<_> = groups["A"].iter().map(|d| d.reference).collect();
        assert_eq!(refs, vec![Some(9), Some(5), Some(3)]);
        assert_eq!(groups["B"].len(), 1);
    }

    #[test]
    fn group_keys_iterate_lexicographically() {
        let input = vec![
            descriptor("Sealed", Some(1)),
            descriptor("Code", Some(1)),
            descriptor("Data", Some(1)),
        ];
        let keys: Vec<_> = group_by_type(&input).into_keys().collect();
        assert_eq!(keys, vec!["Code", "Data", "Sealed"]);
    }

    #[test]
    fn referenceless_members_sink_to_the_bottom() {
        let input = vec![
            descriptor("A", None),
            descriptor("A", Some(0)),
            descriptor("A", Some(7)),
        ];
        let groups = group_by_type(&input);
        let refs: Vec<_> = groups["A"].iter().map(|d| d.reference).collect();
        assert_eq!(refs, vec![Some(7), Some(0), None]);
    }
}
