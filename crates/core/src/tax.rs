//! Simplified levy computation.
//!
//! Totals carry a flat 20% effective rate: VAT 15%, NHIL 2.5% and GETFund 2.5%, all charged on
//! the same taxable base.

use serde::{Deserialize, Serialize};

/// Flat effective rate embedded in a tax-inclusive total.
pub const EFFECTIVE_RATE: f64 = 0.20;
/// Value added tax.
pub const VAT_RATE: f64 = 0.15;
/// National Health Insurance Levy.
pub const NHIL_RATE: f64 = 0.025;
/// Ghana Education Trust Fund levy.
pub const GETFUND_RATE: f64 = 0.025;

/// Taxes derived from a tax-inclusive total, each rounded to 2 places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub base: f64,
    pub vat: f64,
    pub nhil: f64,
    pub getfund: f64,
    pub total_tax: f64,
}

/// Splits `total` into its taxable base and levies.
///
/// Negative totals (refunds) go through the same formulas and yield negative amounts.
/// `total_tax` is summed from the unrounded levies, so it can differ from the sum of the
/// rounded figures by a cent.
pub fn compute_taxes(total: f64) -> TaxBreakdown {
    let base = total / (1.0 + EFFECTIVE_RATE);
    let vat = base * VAT_RATE;
    let nhil = base * NHIL_RATE;
    let getfund = base * GETFUND_RATE;
    TaxBreakdown {
        base: round2(base),
        vat: round2(vat),
        nhil: round2(nhil),
        getfund: round2(getfund),
        total_tax: round2(vat + nhil + getfund),
    }
}

/// Rounds half away from zero at 2 decimal places.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid rendering "-0.00".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Renders an amount the way the clearance wire format expects.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Levies charged on a base amount under one regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeBreakdown {
    pub nhil: f64,
    pub getfund: f64,
    pub vat: f64,
    pub total: f64,
    /// Tax as a percentage of the base.
    pub effective_rate: f64,
}

/// Side-by-side view of the cascading and flat levy regimes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub base: f64,
    /// Pre-2026: VAT charged on base plus NHIL and GETFund.
    pub cascading: RegimeBreakdown,
    /// Post-2026: every levy charged on the base alone.
    pub flat: RegimeBreakdown,
}

/// Compares both regimes for a tax-exclusive base amount.
pub fn compare_regimes(base: f64) -> RegimeComparison {
    let nhil = base * NHIL_RATE;
    let getfund = base * GETFUND_RATE;

    let cascading_vat = (base + nhil + getfund) * VAT_RATE;
    let flat_vat = base * VAT_RATE;

    RegimeComparison {
        base: round2(base),
        cascading: regime(base, nhil, getfund, cascading_vat),
        flat: regime(base, nhil, getfund, flat_vat),
    }
}

fn regime(base: f64, nhil: f64, getfund: f64, vat: f64) -> RegimeBreakdown {
    let total = base + nhil + getfund + vat;
    let effective_rate = if base == 0.0 {
        0.0
    } else {
        (total - base) / base * 100.0
    };
    RegimeBreakdown {
        nhil: round2(nhil),
        getfund: round2(getfund),
        vat: round2(vat),
        total: round2(total),
        effective_rate: round2(effective_rate),
    }
}
