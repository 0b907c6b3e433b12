//! Adapters between columnar feature bags and the sparse text format.

use std::fmt::Display;

/// Join `(tag, feature_id, feature_value)` triples into `id:value` tokens.
///
/// The tag (usually the owning event id) is dropped. Values are printed with
/// six decimal places so the output matches other `%f` producers.
pub fn to_sparse_text<T, I, F>(triples: I) -> String
where
    I: IntoIterator<Item = (T, F, f64)>,
    F: Display,
{
    triples
        .into_iter()
        .map(|(_, feature_id, value)| format!("{feature_id}:{value:.6}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pair each record's identifier with its rank counted from the end.
///
/// `id` extracts the identifier from a record. The last record gets index 0.
pub fn reverse_indexed<I, R, K, F>(records: I, mut id: F) -> Vec<(usize, K)>
where
    I: IntoIterator<Item = R>,
    I::IntoIter: DoubleEndedIterator,
    F: FnMut(R) -> K,
{
    records
        .into_iter()
        .rev()
        .enumerate()
        .map(|(rank, record)| (rank, id(record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_six_decimals() {
        let text = to_sparse_text([("e1", 3u32, 0.5), ("e1", 10, -2.0), ("e1", 7, 1.0 / 3.0)]);
        assert_eq!(text, "3:0.500000 10:-2.000000 7:0.333333");
    }

    #[test]
    fn empty_bag_is_empty_string() {
        let text = to_sparse_text(Vec::<((), usize, f64)>::new());
        assert_eq!(text, "");
    }

    #[test]
    fn string_feature_ids_are_kept_verbatim() {
        let text = to_sparse_text([((), "42", 1.25)]);
        assert_eq!(text, "42:1.250000");
    }

    #[test]
    fn last_record_gets_index_zero() {
        let indexed = reverse_indexed(vec!["a", "b", "c"], |id| id);
        assert_eq!(indexed, vec![(0, "c"), (1, "b"), (2, "a")]);
        assert!(reverse_indexed(Vec::<&str>::new(), |id| id).is_empty());
    }

    #[test]
    fn identifier_is_taken_from_first_field() {
        let bag = vec![("evt-1", 3, 0.5), ("evt-2", 5, 1.0)];
        let indexed = reverse_indexed(bag, |(event, _, _)| event);
        assert_eq!(indexed, vec![(0, "evt-2"), (1, "evt-1")]);
    }
}
