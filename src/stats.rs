/// Statistics negotiation between a weight and the host matcher.
/// The weight declares which statistics it reads, the host only has to fill those in.
use crate::normalization::{IdfNorm, Normalization, WdfNorm};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatFlags: u16 {
        const TERMFREQ = 1 << 0;
        const COLLECTION_SIZE = 1 << 1;
        const WDF = 1 << 2;
        const WDF_MAX = 1 << 3;
        const WQF = 1 << 4;
        const AVERAGE_LENGTH = 1 << 5;
        const DOC_LENGTH = 1 << 6;
        const DOC_LENGTH_MIN = 1 << 7;
        const DOC_LENGTH_MAX = 1 << 8;
        const UNIQUE_TERMS = 1 << 9;
    }
}

impl Default for StatFlags {
    fn default() -> Self {
        StatFlags::empty()
    }
}

pub fn required_stats(norm: &Normalization) -> StatFlags {
    let mut flags = StatFlags::WDF | StatFlags::WDF_MAX | StatFlags::WQF;
    if norm.idf != IdfNorm::None {
        flags |= StatFlags::TERMFREQ | StatFlags::COLLECTION_SIZE;
    }
    if norm.wdf == WdfNorm::Pivoted || norm.idf == IdfNorm::Pivoted {
        flags |= StatFlags::AVERAGE_LENGTH | StatFlags::DOC_LENGTH | StatFlags::DOC_LENGTH_MIN;
    }
    if norm.wdf == WdfNorm::LogAverage {
        flags |= StatFlags::DOC_LENGTH
            | StatFlags::DOC_LENGTH_MIN
            | StatFlags::DOC_LENGTH_MAX
            | StatFlags::UNIQUE_TERMS;
    }
    flags
}

/// Per-term snapshot supplied by the host before `init`.
/// Fields that are not in the weight's required set may stay zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TermStatistics {
    /// number of documents indexed by the term
    pub termfreq: u32,
    pub collection_size: u32,
    /// within-query frequency
    pub wqf: u32,
    pub wdf_upper_bound: u32,
    pub average_length: f64,
    pub doclength_lower_bound: u32,
    pub doclength_upper_bound: u32,
}
