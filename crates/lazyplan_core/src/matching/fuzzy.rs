//! Weighted keyword matcher over backlog items.
//!
//! # Responsibility
//! - Rank candidate backlog items against a free-text utterance.
//! - Resolve a user-supplied identifier to one item (id first, then fuzzy).
//!
//! # Invariants
//! - Matching is case-insensitive; stored text is never modified.
//! - Zero-score candidates are never returned.
//! - Equal scores keep the candidates' input (creation) order.

use crate::model::backlog::BacklogItem;
use log::debug;
use uuid::Uuid;

/// Characters that separate query keywords in addition to whitespace.
const KEYWORD_SEPARATORS: &[char] = &[
    ',', '，', '、', '(', ')', '（', '）', '[', ']', '【', '】',
];

/// Per-field score weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWeights {
    pub name: u32,
    pub description: u32,
    /// Applied once per matching tag.
    pub tag: u32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            name: 3,
            description: 2,
            tag: 1,
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMatch<'a> {
    pub item: &'a BacklogItem,
    pub score: u32,
}

/// Outcome of resolving a user-supplied item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemResolution<'a> {
    /// Identifier equals a candidate id.
    ById(&'a BacklogItem),
    /// Best fuzzy match for the identifier text.
    Fuzzy(ScoredMatch<'a>),
    NotFound,
}

impl<'a> ItemResolution<'a> {
    pub fn item(&self) -> Option<&'a BacklogItem> {
        match self {
            Self::ById(item) => Some(item),
            Self::Fuzzy(scored) => Some(scored.item),
            Self::NotFound => None,
        }
    }
}

/// Keyword matcher with configurable weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyMatcher {
    weights: MatchWeights,
}

impl FuzzyMatcher {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> MatchWeights {
        self.weights
    }

    /// Ranks `candidates` against `query`, best first.
    pub fn rank<'a>(&self, query: &str, candidates: &'a [BacklogItem]) -> Vec<ScoredMatch<'a>> {
        let keywords = tokenize_query(query);
        if keywords.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let mut ranked = candidates
            .iter()
            .map(|item| ScoredMatch {
                item,
                score: self.score_item(item, &keywords),
            })
            .filter(|scored| scored.score > 0)
            .collect::<Vec<_>>();
        // `sort_by` is stable, so ties stay in candidate order.
        ranked.sort_by(|left, right| right.score.cmp(&left.score));

        debug!(
            "event=backlog_match module=matching status=ok keywords={} candidates={} hits={}",
            keywords.len(),
            candidates.len(),
            ranked.len()
        );
        ranked
    }

    /// Scores one item against already-normalized keywords.
    pub fn score_item(&self, item: &BacklogItem, keywords: &[String]) -> u32 {
        let name = item.name.to_lowercase();
        let description = item.description.as_deref().map(str::to_lowercase);
        let tags = item
            .tags
            .iter()
            .map(|tag| tag.to_lowercase())
            .collect::<Vec<_>>();

        let mut score = 0u32;
        for keyword in keywords {
            let keyword = keyword.as_str();
            if name.contains(keyword) {
                score = score.saturating_add(self.weights.name);
            }
            if description
                .as_deref()
                .is_some_and(|text| text.contains(keyword))
            {
                score = score.saturating_add(self.weights.description);
            }
            let tag_hits = tags.iter().filter(|tag| tag.contains(keyword)).count();
            let tag_hits = u32::try_from(tag_hits).unwrap_or(u32::MAX);
            score = score.saturating_add(self.weights.tag.saturating_mul(tag_hits));
        }
        score
    }
}

/// Splits a query into lowercase, de-duplicated keywords.
///
/// Separators are whitespace plus ASCII and full-width commas, parentheses
/// and brackets. First-seen order is preserved.
pub fn tokenize_query(query: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for token in query.split(|ch: char| ch.is_whitespace() || KEYWORD_SEPARATORS.contains(&ch)) {
        if token.is_empty() {
            continue;
        }
        let keyword = token.to_lowercase();
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

/// Ranks `candidates` against `query` with default weights.
///
/// Returns an empty list when nothing matches; the caller decides whether to
/// ask again or offer to create a new item.
pub fn match_items<'a>(query: &str, candidates: &'a [BacklogItem]) -> Vec<ScoredMatch<'a>> {
    FuzzyMatcher::default().rank(query, candidates)
}

/// Returns the top-ranked candidate, if any scores above zero.
pub fn best_match<'a>(query: &str, candidates: &'a [BacklogItem]) -> Option<ScoredMatch<'a>> {
    match_items(query, candidates).into_iter().next()
}

/// Resolves an identifier that may be an item id or free text.
pub fn resolve_item<'a>(identifier: &str, candidates: &'a [BacklogItem]) -> ItemResolution<'a> {
    if let Ok(id) = Uuid::parse_str(identifier.trim()) {
        if let Some(item) = candidates.iter().find(|item| item.id == id) {
            return ItemResolution::ById(item);
        }
    }

    match best_match(identifier, candidates) {
        Some(scored) => ItemResolution::Fuzzy(scored),
        None => ItemResolution::NotFound,
    }
}
