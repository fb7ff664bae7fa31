use std::cmp::Ordering;

use crate::records::MusicResult;

/// Lowest constant of the "14+" band.
pub const DEFAULT_MIN_CONST: f64 = 14.5;

/// Keep results whose chart constant is at least `min_const`, hardest first.
/// Ties on the constant are broken by score, higher first. The input is left as is.
pub fn over_const(records: &[MusicResult], min_const: f64) -> Vec<&MusicResult> {
    let mut selected: Vec<&MusicResult> = records
        .iter()
        .filter(|r| r.constant >= min_const)
        .collect();
    selected.sort_by(|a, b| by_const_then_score(b, a));
    selected
}

fn by_const_then_score(a: &MusicResult, b: &MusicResult) -> Ordering {
    a.constant
        .total_cmp(&b.constant)
        .then_with(|| a.score.cmp(&b.score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(title: &str, constant: f64, score: u32) -> MusicResult {
        serde_json::from_value(serde_json::json!({
            "id": title, "diff": "MAS", "title": title,
            "const": constant, "score": score, "rating": 0.0
        }))
        .unwrap()
    }

    fn pairs(results: &[&MusicResult]) -> Vec<(f64, u32)> {
        results.iter().map(|r| (r.constant, r.score)).collect()
    }

    #[test]
    fn test_const_then_score_descending() {
        let records = vec![
            make_result("a", 15.0, 900_000),
            make_result("b", 14.5, 950_000),
            make_result("c", 15.0, 980_000),
        ];
        let out = over_const(&records, DEFAULT_MIN_CONST);
        assert_eq!(
            pairs(&out),
            vec![(15.0, 980_000), (15.0, 900_000), (14.5, 950_000)]
        );
    }

    #[test]
    fn test_below_threshold_excluded() {
        let records = vec![
            make_result("a", 14.4, 1_010_000),
            make_result("b", 14.5, 1_000_000),
            make_result("c", 13.0, 1_009_000),
        ];
        let out = over_const(&records, DEFAULT_MIN_CONST);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "b");
    }

    #[test]
    fn test_input_untouched() {
        let records = vec![
            make_result("a", 14.5, 1),
            make_result("b", 15.0, 2),
        ];
        let _ = over_const(&records, DEFAULT_MIN_CONST);
        assert_eq!(records[0].title, "a");
        assert_eq!(records[1].title, "b");
    }

    #[test]
    fn test_empty() {
        assert!(over_const(&[], DEFAULT_MIN_CONST).is_empty());
    }
}
