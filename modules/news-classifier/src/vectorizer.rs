use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Tokens are runs of two or more word characters.
fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?u)\b\w\w+\b").expect("valid token regex"))
}

/// Sparse TF-IDF vectorizer over a fixed vocabulary. Output vectors are
/// L2-normalized and keyed by feature index.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    lowercase: bool,
}

impl TfidfVectorizer {
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        ngram_range: (usize, usize),
        sublinear_tf: bool,
        lowercase: bool,
    ) -> Self {
        Self {
            vocabulary,
            idf,
            ngram_range,
            sublinear_tf,
            lowercase,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.idf.len()
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        token_pattern()
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Transform text into `(feature index, weight)` pairs, sorted by index.
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for n in min_n..=max_n {
            if n == 0 || n > tokens.len() {
                continue;
            }
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(&idx) = self.vocabulary.get(&gram) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut features: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (idx, tf * self.idf[idx])
            })
            .collect();

        let norm = features.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in features.iter_mut() {
                *w /= norm;
            }
        }

        features.sort_by_key(|(idx, _)| *idx);
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer(terms: &[&str], ngram_range: (usize, usize)) -> TfidfVectorizer {
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        TfidfVectorizer::new(vocabulary, vec![1.0; terms.len()], ngram_range, false, true)
    }

    #[test]
    fn tokenizer_drops_single_characters_and_punctuation() {
        let v = vectorizer(&[], (1, 1));
        assert_eq!(v.tokenize("A hoax, I think!"), vec!["hoax", "think"]);
    }

    #[test]
    fn transform_is_l2_normalized() {
        let v = vectorizer(&["officials", "confirmed"], (1, 1));
        let x = v.transform("Officials confirmed it");
        assert_eq!(x.len(), 2);
        let norm: f64 = x.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bigrams_are_matched_when_enabled() {
        let v = vectorizer(&["fake news", "fake"], (1, 2));
        let x = v.transform("This is fake news");
        let indices: Vec<usize> = x.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1]);

        let unigram_only = vectorizer(&["fake news", "fake"], (1, 1));
        let x = unigram_only.transform("This is fake news");
        assert_eq!(x.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn unknown_text_yields_empty_vector() {
        let v = vectorizer(&["officials"], (1, 1));
        assert!(v.transform("nothing relevant here").is_empty());
        assert!(v.transform("").is_empty());
    }
}
