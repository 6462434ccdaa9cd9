//! External query-parameter contract: post-filtering and pagination over a ranked
//! result list, applied after `matcher::best_matches` has produced full scores.

use crate::model::MatchResult;

/// Parameters accepted when this engine's matching is exposed externally (HTTP/CLI
/// layers are out of scope; this struct is the shape those layers would populate).
#[derive(Debug, Clone, Copy)]
pub struct QueryParams {
    pub min_score: u32,
    pub only_direct: bool,
    pub page_num: u32,
    pub page_size: u32,
}

impl QueryParams {
    /// Clamp `min_score` to `0..=100`, `page_num` to `>=1`, `page_size` to `>=1`.
    pub fn clamped(self) -> Self {
        QueryParams {
            min_score: self.min_score.min(100),
            only_direct: self.only_direct,
            page_num: self.page_num.max(1),
            page_size: self.page_size.max(1),
        }
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        QueryParams {
            min_score: 0,
            only_direct: false,
            page_num: 1,
            page_size: 20,
        }
    }
}

/// Apply the post-filter (`score >= min_score` and `is_match || !only_direct`) and
/// paginate the already-ranked `results`.
pub fn filter_and_paginate(results: &[MatchResult], params: QueryParams) -> Vec<MatchResult> {
    let params = params.clamped();
    let filtered: Vec<&MatchResult> = results
        .iter()
        .filter(|r| r.score >= params.min_score && (r.is_match || !params.only_direct))
        .collect();

    let start = (params.page_num as usize - 1) * params.page_size as usize;
    if start >= filtered.len() {
        return Vec::new();
    }
    let end = (start + params.page_size as usize).min(filtered.len());
    filtered[start..end].iter().map(|r| (*r).clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(entity_id: &str, score: u32, is_match: bool) -> MatchResult {
        MatchResult {
            entity_id: entity_id.to_string(),
            name_id: 1,
            name_id_guid: entity_id.to_string(),
            full_name: entity_id.to_string(),
            score,
            is_match,
        }
    }

    #[test]
    fn min_score_filters_out_low_scores() {
        let rows = vec![result("E1", 90, true), result("E2", 10, true)];
        let params = QueryParams {
            min_score: 50,
            ..Default::default()
        };
        let got = filter_and_paginate(&rows, params);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].entity_id, "E1");
    }

    #[test]
    fn only_direct_excludes_alias_rows() {
        let rows = vec![result("E1", 90, true), result("E1", 80, false)];
        let params = QueryParams {
            only_direct: true,
            ..Default::default()
        };
        let got = filter_and_paginate(&rows, params);
        assert_eq!(got.len(), 1);
        assert!(got[0].is_match);
    }

    #[test]
    fn pagination_concatenates_back_to_the_full_list() {
        let rows: Vec<MatchResult> = (0..5).map(|i| result(&format!("E{i}"), 100 - i, true)).collect();
        let params = QueryParams {
            page_size: 2,
            ..Default::default()
        };
        let mut reassembled = Vec::new();
        for page in 1..=3 {
            reassembled.extend(filter_and_paginate(
                &rows,
                QueryParams {
                    page_num: page,
                    ..params
                },
            ));
        }
        assert_eq!(reassembled, rows);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let rows = vec![result("E1", 90, true)];
        let params = QueryParams {
            page_num: 5,
            ..Default::default()
        };
        assert!(filter_and_paginate(&rows, params).is_empty());
    }

    #[test]
    fn clamped_rejects_zero_page_num_and_size() {
        let p = QueryParams {
            min_score: 0,
            only_direct: false,
            page_num: 0,
            page_size: 0,
        }
        .clamped();
        assert_eq!(p.page_num, 1);
        assert_eq!(p.page_size, 1);
    }
}
