// ============================================================
// GSC DOMAIN TYPES
// ============================================================
// Typed rows and analysis results for Search Console exports

use serde::{Deserialize, Serialize};

/// The report types a GSC comparison workbook can contain. Exports commonly
/// omit sheets, so every type is optional at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GscReportType {
    Filters,
    Queries,
    Pages,
    Countries,
    Devices,
    SearchAppearance,
}

impl GscReportType {
    pub fn all() -> [GscReportType; 6] {
        [
            GscReportType::Filters,
            GscReportType::Queries,
            GscReportType::Pages,
            GscReportType::Countries,
            GscReportType::Devices,
            GscReportType::SearchAppearance,
        ]
    }

    /// Sheet-name candidates, English and Italian. Matched case-insensitively
    /// after trimming; first workbook sheet that matches wins.
    pub fn sheet_aliases(&self) -> &'static [&'static str] {
        match self {
            GscReportType::Filters => &["filters", "filtri", "filter"],
            GscReportType::Queries => &["queries", "query", "le query più frequenti"],
            GscReportType::Pages => &["pages", "pagine", "pagine più frequenti"],
            GscReportType::Countries => &["countries", "paesi", "country", "paese"],
            GscReportType::Devices => &["devices", "dispositivi", "device", "dispositivo"],
            GscReportType::SearchAppearance => &[
                "search appearance",
                "aspetto nella ricerca",
                "search appearances",
            ],
        }
    }

    /// Item-label header candidates for this report type.
    pub fn item_aliases(&self) -> &'static [&'static str] {
        match self {
            GscReportType::Filters => &[],
            GscReportType::Queries => &[
                "query",
                "queries",
                "top queries",
                "le query più frequenti",
                "query principali",
            ],
            GscReportType::Pages => &[
                "page",
                "pages",
                "top pages",
                "pagina",
                "pagine",
                "pagine più frequenti",
            ],
            GscReportType::Countries => &["country", "countries", "paese", "paesi"],
            GscReportType::Devices => &["device", "devices", "dispositivo", "dispositivi"],
            GscReportType::SearchAppearance => &[
                "search appearance",
                "aspetto nella ricerca",
            ],
        }
    }
}

/// One parsed row of a GSC sheet, current and previous period side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GscSheetRow {
    /// Query, page URL, country, device, or search-appearance label. For the
    /// Filters report this is the filter name.
    pub item: String,

    /// Filter value; only populated for the Filters report.
    pub filter_value: Option<String>,

    pub clicks_current: u64,
    pub clicks_previous: u64,
    pub impressions_current: u64,
    pub impressions_previous: u64,

    /// Fractions in [0, 1].
    pub ctr_current: f64,
    pub ctr_previous: f64,

    /// `None` when absent: 0 is a valid-looking but wrong sentinel for an
    /// average position.
    pub position_current: Option<f64>,
    pub position_previous: Option<f64>,
}

impl GscSheetRow {
    pub fn new(item: &str) -> Self {
        Self {
            item: item.to_string(),
            filter_value: None,
            clicks_current: 0,
            clicks_previous: 0,
            impressions_current: 0,
            impressions_previous: 0,
            ctr_current: 0.0,
            ctr_previous: 0.0,
            position_current: None,
            position_previous: None,
        }
    }
}

/// A sheet row plus its period-over-period computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GscAnalyzedItem {
    pub row: GscSheetRow,

    pub diff_clicks: i64,
    /// `f64::INFINITY` when previous=0 and current>0; 0 when both are 0.
    pub pct_change_clicks: f64,
    pub diff_impressions: i64,
    pub pct_change_impressions: f64,
    pub diff_ctr: f64,
    /// previous - current: positive means the position number dropped, which
    /// is an improvement. The inverted sign is intentional and load-bearing
    /// for downstream sentiment/coloring.
    pub diff_position: Option<f64>,
}

/// Aggregate totals for one report type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GscSummary {
    pub total_clicks_current: u64,
    pub total_impressions_current: u64,

    /// Whether any row carried nonzero previous-period data. Deltas are only
    /// meaningful (and only populated) when this is true.
    pub has_previous_data: bool,
    pub delta_clicks: Option<i64>,
    pub delta_impressions: Option<i64>,
}

/// One bar of the top-items chart projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSlice {
    /// Item label truncated to 30 chars with an ellipsis.
    pub label: String,
    pub value: u64,
    /// Palette color cycled by rank.
    pub color: String,
}

/// One slice of the devices pie projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

/// Full analysis of one report type: table rows, summary, and chart-ready
/// projections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GscSectionAnalysis {
    pub report_type: GscReportType,
    pub items: Vec<GscAnalyzedItem>,
    pub summary: GscSummary,
    pub chart: Vec<ChartSlice>,
    /// Present only for the Devices report.
    pub device_pie: Option<Vec<PieSlice>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_report_type_has_sheet_aliases() {
        for report in GscReportType::all() {
            assert!(!report.sheet_aliases().is_empty());
        }
    }

    #[test]
    fn filters_report_has_no_item_aliases() {
        // The Filters report identifies rows by the name/value pair instead.
        assert!(GscReportType::Filters.item_aliases().is_empty());
    }
}
