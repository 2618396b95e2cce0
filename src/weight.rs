use log::{debug, warn};
use validator::Validate;

use crate::{
    error::WeightError,
    normalization::{IdfNorm, Normalization, WdfNorm, WtNorm},
    options::TuningParams,
    stats::{required_stats, StatFlags, TermStatistics},
};

/// Scoring contract the host matcher drives.
///
/// A weight is created once per query term. The host reads `required_stats`,
/// gathers those statistics, calls `init` once, then calls `score` for every
/// matching document. `max_score` must bound `score` from above for every
/// document in the collection so the matcher can prune.
pub trait Weight {
    fn name(&self) -> &'static str;

    fn short_name(&self) -> &'static str;

    fn required_stats(&self) -> StatFlags;

    /// `factor` is the query-level scale applied on top of the term's wqf.
    /// A zero factor leaves the weight contributing nothing.
    fn init(&mut self, factor: f64, stats: &TermStatistics);

    fn score(&self, wdf: u32, doc_len: u32, unique_terms: u32) -> f64;

    fn max_score(&self) -> f64;

    /// Per-document contribution independent of any matched term.
    fn sum_extra(&self, doc_len: u32, unique_terms: u32) -> f64;

    fn max_extra(&self) -> f64;

    fn serialize(&self) -> Vec<u8>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Prepared {
    idfn: f64,
    wqf_factor: f64,
    average_length: f64,
    wdf_upper_bound: u32,
    doclength_lower_bound: u32,
}

/// SMART-style tf-idf weight.
#[derive(Debug)]
pub struct TfIdfWeight {
    norm: Normalization,
    params: TuningParams,
    stats: StatFlags,
    prepared: Option<Prepared>,
}

impl TfIdfWeight {
    pub fn new(code: &str) -> Result<Self, WeightError> {
        Self::with_params(code, TuningParams::default())
    }

    pub fn with_params(code: &str, params: TuningParams) -> Result<Self, WeightError> {
        Self::from_normalization(code.parse()?, params)
    }

    pub fn from_normalization(
        norm: Normalization,
        params: TuningParams,
    ) -> Result<Self, WeightError> {
        params.validate()?;
        let stats = required_stats(&norm);
        debug!(
            "tfidf weight {} (slope={}, delta={}) needs {:?}",
            norm, params.slope, params.delta, stats
        );
        Ok(Self {
            norm,
            params,
            stats,
            prepared: None,
        })
    }

    /// Empty parameters select the defaults, anything else is a normalization code.
    pub fn create_from_parameters(s: &str) -> Result<Self, WeightError> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        Self::new(s)
    }

    pub fn normalization(&self) -> Normalization {
        self.norm
    }

    pub fn params(&self) -> TuningParams {
        self.params
    }

    pub fn is_initialized(&self) -> bool {
        self.prepared.is_some()
    }

    #[inline]
    fn weigh(&self, prepared: &Prepared, wdf: u32, doc_len: u32, unique_terms: u32) -> f64 {
        let wdfn = wdfn(
            self.norm.wdf,
            &self.params,
            prepared.average_length,
            wdf,
            doc_len,
            unique_terms,
        );
        wtn(self.norm.wt, wdfn * prepared.idfn) * prepared.wqf_factor
    }
}

impl Default for TfIdfWeight {
    fn default() -> Self {
        let norm = Normalization::default();
        Self {
            norm,
            params: TuningParams::default(),
            stats: required_stats(&norm),
            prepared: None,
        }
    }
}

// A clone starts over in the configured state and must be initialized again.
impl Clone for TfIdfWeight {
    fn clone(&self) -> Self {
        Self {
            norm: self.norm,
            params: self.params,
            stats: self.stats,
            prepared: None,
        }
    }
}

impl Weight for TfIdfWeight {
    fn name(&self) -> &'static str {
        "TfIdfWeight"
    }

    fn short_name(&self) -> &'static str {
        "tfidf"
    }

    fn required_stats(&self) -> StatFlags {
        self.stats
    }

    fn init(&mut self, factor: f64, stats: &TermStatistics) {
        if factor == 0.0 {
            return;
        }
        if self.prepared.is_some() {
            warn!("tfidf weight {} initialized twice", self.norm);
        }
        let prepared = Prepared {
            idfn: idfn(self.norm.idf, stats),
            wqf_factor: f64::from(stats.wqf) * factor,
            average_length: stats.average_length,
            wdf_upper_bound: stats.wdf_upper_bound,
            doclength_lower_bound: stats.doclength_lower_bound,
        };
        debug!(
            "tfidf weight {} initialized: idf={}, factor={}",
            self.norm, prepared.idfn, prepared.wqf_factor
        );
        self.prepared = Some(prepared);
    }

    fn score(&self, wdf: u32, doc_len: u32, unique_terms: u32) -> f64 {
        match &self.prepared {
            Some(prepared) => self.weigh(prepared, wdf, doc_len, unique_terms),
            None => 0.0,
        }
    }

    // wdf only ever lowers the score through the length normalizations,
    // so the shortest document with the highest wdf bounds every other one.
    fn max_score(&self) -> f64 {
        match &self.prepared {
            Some(prepared) => {
                let len_min = prepared.doclength_lower_bound;
                self.weigh(prepared, prepared.wdf_upper_bound, len_min, len_min)
            }
            None => 0.0,
        }
    }

    fn sum_extra(&self, _doc_len: u32, _unique_terms: u32) -> f64 {
        0.0
    }

    fn max_extra(&self) -> f64 {
        0.0
    }

    fn serialize(&self) -> Vec<u8> {
        crate::codec::serialize(&self.norm, &self.params)
    }
}

fn wdfn(
    norm: WdfNorm,
    params: &TuningParams,
    average_length: f64,
    wdf: u32,
    doc_len: u32,
    unique_terms: u32,
) -> f64 {
    let wdf = f64::from(wdf);
    match norm {
        WdfNorm::None => wdf,
        _ if wdf == 0.0 => 0.0,
        WdfNorm::Boolean => 1.0,
        WdfNorm::Square => wdf * wdf,
        WdfNorm::Log => 1.0 + wdf.ln(),
        WdfNorm::Pivoted => {
            let normlen = f64::from(doc_len) / average_length;
            let norm_factor = 1.0 / (1.0 - params.slope + params.slope * normlen);
            (1.0 + (1.0 + wdf.ln()).ln()) * norm_factor + params.delta
        }
        WdfNorm::LogAverage => {
            let wdf_avg = if doc_len == 0 || unique_terms == 0 {
                1.0
            } else {
                f64::from(doc_len) / f64::from(unique_terms)
            };
            (1.0 + wdf.ln()) / (1.0 + wdf_avg.ln())
        }
    }
}

fn idfn(norm: IdfNorm, stats: &TermStatistics) -> f64 {
    let termfreq = match norm {
        IdfNorm::None => 1.0,
        _ => f64::from(stats.termfreq),
    };
    let n = match norm {
        IdfNorm::Prob | IdfNorm::Square | IdfNorm::Tfidf | IdfNorm::Pivoted => {
            f64::from(stats.collection_size)
        }
        IdfNorm::None | IdfNorm::Freq => 1.0,
    };
    match norm {
        IdfNorm::None => 1.0,
        // the term indexes every document
        IdfNorm::Prob if n == termfreq => 0.0,
        IdfNorm::Prob => ((n - termfreq) / termfreq).ln(),
        IdfNorm::Freq => 1.0 / termfreq,
        IdfNorm::Square => (n / termfreq).ln().powi(2),
        IdfNorm::Pivoted => ((n + 1.0) / termfreq).ln(),
        IdfNorm::Tfidf => (n / termfreq).ln(),
    }
}

#[inline]
fn wtn(norm: WtNorm, wt: f64) -> f64 {
    match norm {
        WtNorm::None => wt,
    }
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use super::*;
    use crate::error::ConfigError;

    const EPS: f64 = 1e-9;

    fn stats(collection_size: u32, termfreq: u32) -> TermStatistics {
        TermStatistics {
            termfreq,
            collection_size,
            wqf: 1,
            wdf_upper_bound: 10,
            average_length: 50.0,
            doclength_lower_bound: 5,
            doclength_upper_bound: 200,
        }
    }

    fn initialized(code: &str, stats: &TermStatistics) -> TfIdfWeight {
        let mut weight = TfIdfWeight::new(code).unwrap();
        weight.init(1.0, stats);
        weight
    }

    #[test]
    fn test_ntn_scenario() {
        let weight = initialized("ntn", &stats(100, 2));
        let score = weight.score(3, 20, 10);
        assert!((score - 3.0 * 50f64.ln()).abs() < EPS);
        assert!((score - 11.736).abs() < 1e-3);
    }

    #[test]
    fn test_bnn_zero_wdf() {
        let weight = initialized("bnn", &stats(100, 2));
        assert_eq!(weight.score(0, 20, 10), 0.0);
        assert_eq!(weight.score(7, 20, 10), 1.0);
    }

    #[test]
    fn test_zero_wdf_scores_zero() {
        for wdf_code in ['n', 'b', 's', 'l', 'P', 'L'] {
            for idf_code in ['n', 't', 's', 'f', 'p', 'P'] {
                let code = format!("{wdf_code}{idf_code}n");
                let weight = initialized(&code, &stats(100, 2));
                assert_eq!(weight.score(0, 20, 10), 0.0, "{code}");
                assert_eq!(weight.score(0, 0, 0), 0.0, "{code}");
            }
        }
    }

    #[test]
    fn test_wdf_normalizations() {
        let s = stats(100, 2);
        let idf = 50f64.ln();
        let score = |code: &str, wdf, doc_len, unique_terms| {
            initialized(code, &s).score(wdf, doc_len, unique_terms) / idf
        };
        assert!((score("ntn", 4, 20, 10) - 4.0).abs() < EPS);
        assert!((score("stn", 4, 20, 10) - 16.0).abs() < EPS);
        assert!((score("ltn", 1, 20, 10) - 1.0).abs() < EPS);
        assert!((score("ltn", 4, 20, 10) - (1.0 + 4f64.ln())).abs() < EPS);

        let pivoted = (1.0 + (1.0 + 4f64.ln()).ln()) / (1.0 - 0.2 + 0.2 * 100.0 / 50.0) + 1.0;
        assert!((score("Ptn", 4, 100, 10) - pivoted).abs() < EPS);

        let log_average = (1.0 + 4f64.ln()) / (1.0 + 2f64.ln());
        assert!((score("Ltn", 4, 20, 10) - log_average).abs() < EPS);
        // average wdf falls back to 1
        assert!((score("Ltn", 4, 0, 10) - (1.0 + 4f64.ln())).abs() < EPS);
        assert!((score("Ltn", 4, 20, 0) - (1.0 + 4f64.ln())).abs() < EPS);
    }

    #[test]
    fn test_pivoted_tuning_params() {
        let s = stats(100, 2);
        let mut weight =
            TfIdfWeight::with_params("Pnn", TuningParams::new(0.5, 2.0)).unwrap();
        weight.init(1.0, &s);
        let expected = (1.0 + (1.0 + 3f64.ln()).ln()) / (1.0 - 0.5 + 0.5 * 25.0 / 50.0) + 2.0;
        assert!((weight.score(3, 25, 10) - expected).abs() < EPS);
    }

    #[test]
    fn test_idf_normalizations() {
        let s = stats(100, 20);
        let idf = |code: &str| initialized(code, &s).score(1, 20, 10);
        assert_eq!(idf("nnn"), 1.0);
        assert!((idf("ntn") - 5f64.ln()).abs() < EPS);
        assert!((idf("nsn") - 5f64.ln().powi(2)).abs() < EPS);
        assert!((idf("nfn") - 0.05).abs() < EPS);
        assert!((idf("npn") - 4f64.ln()).abs() < EPS);
        assert!((idf("nPn") - (101.0f64 / 20.0).ln()).abs() < EPS);
    }

    #[test]
    fn test_idf_none_ignores_termfreq() {
        let weight = initialized("lnn", &TermStatistics {
            wqf: 1,
            ..Default::default()
        });
        assert_eq!(weight.score(1, 0, 0), 1.0);
    }

    #[test]
    fn test_prob_idf_term_in_every_document() {
        let weight = initialized("npn", &stats(100, 100));
        assert_eq!(weight.score(5, 20, 10), 0.0);
        assert_eq!(weight.max_score(), 0.0);
    }

    #[test]
    fn test_wqf_factor() {
        let mut s = stats(100, 2);
        s.wqf = 2;
        let mut weight = TfIdfWeight::new("bnn").unwrap();
        weight.init(0.25, &s);
        assert!((weight.score(3, 20, 10) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_zero_factor_contributes_nothing() {
        let mut weight = TfIdfWeight::new("ltn").unwrap();
        weight.init(0.0, &stats(100, 2));
        assert!(!weight.is_initialized());
        assert_eq!(weight.score(4, 20, 10), 0.0);
        assert_eq!(weight.max_score(), 0.0);
        assert_eq!(weight.sum_extra(20, 10), 0.0);
        assert_eq!(weight.max_extra(), 0.0);
    }

    #[test]
    fn test_max_score_uses_bounds() {
        let s = stats(100, 2);
        let weight = initialized("Ltn", &s);
        assert!((weight.max_score() - weight.score(10, 5, 5)).abs() < EPS);
        let weight = initialized("Ptn", &s);
        assert!((weight.max_score() - weight.score(10, 5, 5)).abs() < EPS);
    }

    #[test]
    fn test_max_score_is_upper_bound() {
        let mut rng = rand::thread_rng();
        for wdf_code in ['n', 'b', 's', 'l', 'P', 'L'] {
            for idf_code in ['n', 't', 's', 'f', 'p', 'P'] {
                let code = format!("{wdf_code}{idf_code}n");
                for _ in 0..50 {
                    let collection_size = rng.gen_range(10..100_000u32);
                    let doclength_lower_bound = rng.gen_range(1..50u32);
                    let doclength_upper_bound = rng.gen_range(doclength_lower_bound..5000u32);
                    let s = TermStatistics {
                        // keeps the prob idf positive
                        termfreq: rng.gen_range(1..collection_size / 2),
                        collection_size,
                        wqf: rng.gen_range(1..4u32),
                        wdf_upper_bound: rng.gen_range(1..doclength_lower_bound + 100),
                        average_length: rng.gen_range(
                            f64::from(doclength_lower_bound)..=f64::from(doclength_upper_bound),
                        ),
                        doclength_lower_bound,
                        doclength_upper_bound,
                    };
                    let params = TuningParams::new(rng.gen_range(0.01..1.0), rng.gen_range(0.01..3.0));
                    let mut weight = TfIdfWeight::with_params(&code, params).unwrap();
                    weight.init(rng.gen_range(0.1..2.0), &s);
                    let max_score = weight.max_score();
                    for _ in 0..100 {
                        let doc_len = rng.gen_range(doclength_lower_bound..=doclength_upper_bound);
                        let unique_terms = rng.gen_range(1..=doc_len);
                        let wdf = rng.gen_range(0..=s.wdf_upper_bound);
                        let score = weight.score(wdf, doc_len, unique_terms);
                        assert!(
                            score <= max_score + EPS * max_score.abs(),
                            "{code}: score {score} > max {max_score}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_configured_weight_scores_zero() {
        let weight = TfIdfWeight::new("ntn").unwrap();
        assert!(!weight.is_initialized());
        assert_eq!(weight.score(3, 20, 10), 0.0);
        assert_eq!(weight.max_score(), 0.0);
    }

    #[test]
    fn test_clone_drops_state() {
        let weight = initialized("Lpn", &stats(100, 2));
        assert!(weight.is_initialized());
        let mut cloned = weight.clone();
        assert!(!cloned.is_initialized());
        assert_eq!(cloned.normalization(), weight.normalization());
        assert_eq!(cloned.params(), weight.params());
        assert_eq!(cloned.required_stats(), weight.required_stats());
        assert_eq!(cloned.score(3, 20, 10), 0.0);
        cloned.init(1.0, &stats(100, 2));
        assert_eq!(cloned.score(3, 20, 10), weight.score(3, 20, 10));
    }

    #[test]
    fn test_create_from_parameters() {
        let weight = TfIdfWeight::create_from_parameters("").unwrap();
        assert_eq!(weight.normalization(), Normalization::default());
        assert_eq!(weight.params(), TuningParams::default());

        let weight = TfIdfWeight::create_from_parameters("Lpn").unwrap();
        assert_eq!(
            weight.normalization(),
            Normalization::new(WdfNorm::LogAverage, IdfNorm::Prob, WtNorm::None)
        );

        assert!(matches!(
            TfIdfWeight::create_from_parameters("xyz"),
            Err(WeightError::InvalidConfiguration(
                ConfigError::InvalidNormalization(_)
            ))
        ));
    }

    #[test]
    fn test_invalid_params() {
        for code in ["ntn", "Ppn", "bnn"] {
            for params in [
                TuningParams::new(0.0, 1.0),
                TuningParams::new(-0.1, 1.0),
                TuningParams::new(0.2, 0.0),
                TuningParams::new(0.2, -3.0),
            ] {
                assert!(matches!(
                    TfIdfWeight::with_params(code, params),
                    Err(WeightError::InvalidConfiguration(
                        ConfigError::InvalidParameters(_)
                    ))
                ));
            }
        }
        let norm = Normalization::new(WdfNorm::Pivoted, IdfNorm::None, WtNorm::None);
        assert!(TfIdfWeight::from_normalization(norm, TuningParams::new(0.0, 1.0)).is_err());
    }

    #[test]
    fn test_names() {
        let weight = TfIdfWeight::default();
        assert_eq!(weight.name(), "TfIdfWeight");
        assert_eq!(weight.short_name(), "tfidf");
        assert_eq!(weight.required_stats(), required_stats(&Normalization::default()));
    }
}
