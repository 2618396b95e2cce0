use log::trace;

use crate::{
    stats::TermStatistics,
    weight::{TfIdfWeight, Weight},
};

/// A document as sorted term ids with their within-document frequencies.
#[derive(Debug, Clone, Copy)]
pub struct DocumentVector<'a> {
    doc_len: u32,
    indexes: &'a [u32],
    values: &'a [u32],
}

impl<'a> DocumentVector<'a> {
    pub fn new_checked(doc_len: u32, indexes: &'a [u32], values: &'a [u32]) -> Option<Self> {
        if indexes.len() != values.len() || u32::try_from(indexes.len()).is_err() {
            return None;
        }
        if !indexes.windows(2).all(|w| w[0] < w[1]) {
            return None;
        }
        Some(Self {
            doc_len,
            indexes,
            values,
        })
    }

    pub fn doc_len(&self) -> u32 {
        self.doc_len
    }

    pub fn len(&self) -> u32 {
        self.indexes.len() as u32
    }

    pub fn indexes(&self) -> &'a [u32] {
        self.indexes
    }

    pub fn values(&self) -> &'a [u32] {
        self.values
    }
}

/// One weight per query term, kept sorted by term id.
#[derive(Debug, Clone)]
pub struct QueryWeights {
    indexes: Vec<u32>,
    weights: Vec<TfIdfWeight>,
}

impl QueryWeights {
    /// Returns `None` if a term id appears twice; repeated query terms
    /// belong in the term's wqf instead.
    pub fn new_checked(mut terms: Vec<(u32, TfIdfWeight)>) -> Option<Self> {
        terms.sort_unstable_by_key(|(term_id, _)| *term_id);
        if terms.windows(2).any(|w| w[0].0 == w[1].0) {
            return None;
        }
        let (indexes, weights) = terms.into_iter().unzip();
        Some(Self { indexes, weights })
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn init(&mut self, factor: f64, mut stats: impl FnMut(u32) -> TermStatistics) {
        for (&term_id, weight) in self.indexes.iter().zip(self.weights.iter_mut()) {
            weight.init(factor, &stats(term_id));
        }
    }

    pub fn score(&self, doc: DocumentVector<'_>) -> f64 {
        use std::cmp::Ordering;
        let unique_terms = doc.len();
        let (li, lv) = (doc.indexes(), doc.values());
        let (mut lp, ln) = (0, li.len());
        let ri = self.indexes.as_slice();
        let (mut rp, rn) = (0, ri.len());
        let mut score = 0.0;
        while lp < ln && rp < rn {
            match Ord::cmp(&li[lp], &ri[rp]) {
                Ordering::Equal => {
                    let res = self.weights[rp].score(lv[lp], doc.doc_len(), unique_terms);
                    trace!("term {} wdf {} scored {}", ri[rp], lv[lp], res);
                    score += res;
                    lp += 1;
                    rp += 1;
                }
                Ordering::Less => {
                    lp += 1;
                }
                Ordering::Greater => {
                    rp += 1;
                }
            }
        }
        score
    }

    pub fn max_score(&self) -> f64 {
        self.weights.iter().map(Weight::max_score).sum()
    }
}
