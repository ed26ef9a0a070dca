use std::collections::HashMap;

pub const DEFAULT_CALENDAR_ID: &str = "primary";

const NGRAM_SIZE: usize = 3;

pub trait Similarity {
    fn similarity(&self, query: &str, candidate: &str) -> f64;
}

/// Dice coefficient over bags of character n-grams.
///
/// Both sides are padded with `size - 1` spaces so short words still yield
/// grams. Candidates are folded to lower case before they are split, the query
/// is split as typed.
pub struct NgramSimilarity {
    size: usize,
}

impl Default for NgramSimilarity {
    fn default() -> Self {
        Self { size: NGRAM_SIZE }
    }
}

impl NgramSimilarity {
    fn bag(&self, word: &str) -> HashMap<String, usize> {
        let padding = std::iter::repeat(' ').take(self.size.saturating_sub(1));
        let chars: Vec<char> = padding
            .clone()
            .chain(word.chars())
            .chain(padding)
            .collect();
        let mut bag = HashMap::new();

        for window in chars.windows(self.size.max(1)) {
            let gram: String = window.iter().collect();
            if gram.trim().is_empty() {
                continue;
            }
            *bag.entry(gram).or_insert(0) += 1;
        }
        bag
    }
}

impl Similarity for NgramSimilarity {
    fn similarity(&self, query: &str, candidate: &str) -> f64 {
        let query_bag = self.bag(query);
        let candidate_bag = self.bag(&candidate.to_lowercase());

        let total: usize =
            query_bag.values().sum::<usize>() + candidate_bag.values().sum::<usize>();
        if total == 0 {
            return 0.0;
        }

        let shared: usize = query_bag
            .iter()
            .filter_map(|(gram, count)| candidate_bag.get(gram).map(|other| (*count).min(*other)))
            .sum();

        (2 * shared) as f64 / total as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Primary,
    Exact(String),
    Fuzzy(String),
    NoMatch,
}

impl Resolution {
    /// The selected identifier, empty when nothing matched.
    pub fn calendar_id(&self) -> &str {
        match self {
            Resolution::Primary => DEFAULT_CALENDAR_ID,
            Resolution::Exact(id) | Resolution::Fuzzy(id) => id,
            Resolution::NoMatch => "",
        }
    }
}

pub struct CalendarResolver<S: Similarity = NgramSimilarity> {
    similarity: S,
}

impl Default for CalendarResolver {
    fn default() -> Self {
        Self::new(NgramSimilarity::default())
    }
}

impl<S: Similarity> CalendarResolver<S> {
    pub fn new(similarity: S) -> Self {
        Self { similarity }
    }

    pub fn resolve(&self, query: &str, known_ids: &[String]) -> Resolution {
        if query.is_empty() {
            return Resolution::Primary;
        }

        if known_ids.iter().any(|id| id == query) {
            return Resolution::Exact(query.to_string());
        }

        let mut best: Option<(&String, f64)> = None;
        for id in known_ids {
            let score = self.similarity.similarity(query, id);
            tracing::trace!(calendar_id = %id, score, "scored calendar");
            if score > 0.0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((id, score));
            }
        }

        match best {
            Some((id, _)) => Resolution::Fuzzy(id.clone()),
            None => Resolution::NoMatch,
        }
    }
}
