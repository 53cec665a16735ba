// Centralized header alias configuration for keyword CSV and GSC ingestion.
//
// Goal: keep header matching flexible without scattering alias lists.

use super::gsc::GscReportType;

// NOTE:
// - Aliases are matched against a normalized header (newlines collapsed to
//   spaces, trimmed, lowercased).
// - Matching strategy, in this order:
//   1) case-insensitive exact match on the canonical column name
//   2) each alias in declared order, first match wins
// - No substring or fuzzy matching: ambiguous real-world exports must fail
//   loudly instead of being silently reinterpreted.

/// One canonical column in a CSV schema.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub required: bool,
    pub aliases: &'static [&'static str],
}

pub const KEYWORD_ALIASES: &[&str] = &["parola chiave", "query", "kw", "keywords"];

pub const POSITION_ALIASES: &[&str] = &["position", "posizione", "rank", "ranking"];

pub const URL_ALIASES: &[&str] = &["page", "pagina", "landing page", "link"];

pub const VOLUME_ALIASES: &[&str] = &[
    "search volume",
    "volume di ricerca",
    "vol",
    "monthly volume",
];

pub const DIFFICULTY_ALIASES: &[&str] = &[
    "kd",
    "keyword difficulty",
    "difficoltà",
    "difficolta",
    "seo difficulty",
];

pub const OPPORTUNITY_ALIASES: &[&str] = &["opportunità", "opportunita", "potential"];

pub const INTENT_ALIASES: &[&str] = &["search intent", "intento", "intento di ricerca"];

pub const TRAFFIC_VARIATION_ALIASES: &[&str] =
    &["traffic variation", "variazione traffico", "traffic change"];

pub const ESTIMATED_TRAFFIC_ALIASES: &[&str] =
    &["estimated traffic", "traffico stimato", "est. traffic"];

pub const AVG_CPC_ALIASES: &[&str] = &["avg cpc", "avg. cpc", "cpc", "cpc medio"];

/// Schema for ranking-comparison exports: the reconciliation tools need a
/// position and a landing URL for every keyword.
pub const RANKING_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { name: "Keyword", required: true, aliases: KEYWORD_ALIASES },
    ColumnSpec { name: "Pos", required: true, aliases: POSITION_ALIASES },
    ColumnSpec { name: "URL", required: true, aliases: URL_ALIASES },
    ColumnSpec { name: "Volume", required: false, aliases: VOLUME_ALIASES },
    ColumnSpec { name: "Difficulty", required: false, aliases: DIFFICULTY_ALIASES },
    ColumnSpec { name: "Opportunity", required: false, aliases: OPPORTUNITY_ALIASES },
    ColumnSpec { name: "Intent", required: false, aliases: INTENT_ALIASES },
    ColumnSpec { name: "Traffic Variation", required: false, aliases: TRAFFIC_VARIATION_ALIASES },
    ColumnSpec { name: "Estimated Traffic", required: false, aliases: ESTIMATED_TRAFFIC_ALIASES },
    ColumnSpec { name: "Avg CPC", required: false, aliases: AVG_CPC_ALIASES },
];

/// Schema for keyword-analysis exports: only the keyword itself is mandatory.
pub const ANALYSIS_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { name: "Keyword", required: true, aliases: KEYWORD_ALIASES },
    ColumnSpec { name: "Pos", required: false, aliases: POSITION_ALIASES },
    ColumnSpec { name: "URL", required: false, aliases: URL_ALIASES },
    ColumnSpec { name: "Volume", required: false, aliases: VOLUME_ALIASES },
    ColumnSpec { name: "Difficulty", required: false, aliases: DIFFICULTY_ALIASES },
    ColumnSpec { name: "Opportunity", required: false, aliases: OPPORTUNITY_ALIASES },
    ColumnSpec { name: "Intent", required: false, aliases: INTENT_ALIASES },
    ColumnSpec { name: "Traffic Variation", required: false, aliases: TRAFFIC_VARIATION_ALIASES },
    ColumnSpec { name: "Estimated Traffic", required: false, aliases: ESTIMATED_TRAFFIC_ALIASES },
    ColumnSpec { name: "Avg CPC", required: false, aliases: AVG_CPC_ALIASES },
];

// ------------------------------------------------------------
// GSC workbook headers
// ------------------------------------------------------------

/// Canonical fields of a GSC comparison sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GscField {
    Item,
    FilterName,
    FilterValue,
    ClicksCurrent,
    ClicksPrevious,
    ImpressionsCurrent,
    ImpressionsPrevious,
    CtrCurrent,
    CtrPrevious,
    PositionCurrent,
    PositionPrevious,
}

/// Keywords used to locate the header row inside a sheet. A row counts as the
/// header row when any cell contains one of these (lowercased, substring).
pub const HEADER_ROW_HINTS: &[&str] = &["clic", "impression", "query", "page", "date", "filter"];

pub const FILTER_NAME_ALIASES: &[&str] = &["filter", "filtro", "filter name", "nome filtro"];

pub const FILTER_VALUE_ALIASES: &[&str] = &["value", "valore", "filter value", "valore filtro"];

// Bare metric names ("Clicks", "Clic") appear in single-period exports and map
// to the current period; comparison exports qualify both periods explicitly.

pub const CLICKS_CURRENT_ALIASES: &[&str] = &[
    "clicks",
    "clic",
    "last 28 days clicks",
    "clicks last 28 days",
    "clic ultimi 28 giorni",
    "ultimi 28 giorni: clic",
    "last 3 months clicks",
    "clicks last 3 months",
    "clic ultimi 3 mesi",
    "ultimi 3 mesi: clic",
];

pub const CLICKS_PREVIOUS_ALIASES: &[&str] = &[
    "previous 28 days clicks",
    "clicks previous 28 days",
    "clic 28 giorni precedenti",
    "28 giorni precedenti: clic",
    "previous 3 months clicks",
    "clicks previous 3 months",
    "clic 3 mesi precedenti",
    "3 mesi precedenti: clic",
];

pub const IMPRESSIONS_CURRENT_ALIASES: &[&str] = &[
    "impressions",
    "impressioni",
    "last 28 days impressions",
    "impressions last 28 days",
    "impressioni ultimi 28 giorni",
    "ultimi 28 giorni: impressioni",
    "last 3 months impressions",
    "impressions last 3 months",
    "impressioni ultimi 3 mesi",
    "ultimi 3 mesi: impressioni",
];

pub const IMPRESSIONS_PREVIOUS_ALIASES: &[&str] = &[
    "previous 28 days impressions",
    "impressions previous 28 days",
    "impressioni 28 giorni precedenti",
    "28 giorni precedenti: impressioni",
    "previous 3 months impressions",
    "impressions previous 3 months",
    "impressioni 3 mesi precedenti",
    "3 mesi precedenti: impressioni",
];

pub const CTR_CURRENT_ALIASES: &[&str] = &[
    "ctr",
    "last 28 days ctr",
    "ctr last 28 days",
    "ctr ultimi 28 giorni",
    "ultimi 28 giorni: ctr",
    "last 3 months ctr",
    "ctr last 3 months",
    "ctr ultimi 3 mesi",
    "ultimi 3 mesi: ctr",
];

pub const CTR_PREVIOUS_ALIASES: &[&str] = &[
    "previous 28 days ctr",
    "ctr previous 28 days",
    "ctr 28 giorni precedenti",
    "28 giorni precedenti: ctr",
    "previous 3 months ctr",
    "ctr previous 3 months",
    "ctr 3 mesi precedenti",
    "3 mesi precedenti: ctr",
];

pub const POSITION_CURRENT_ALIASES: &[&str] = &[
    "position",
    "posizione",
    "average position",
    "posizione media",
    "last 28 days position",
    "position last 28 days",
    "posizione ultimi 28 giorni",
    "ultimi 28 giorni: posizione",
    "last 3 months position",
    "position last 3 months",
    "posizione ultimi 3 mesi",
    "ultimi 3 mesi: posizione",
];

pub const POSITION_PREVIOUS_ALIASES: &[&str] = &[
    "previous 28 days position",
    "position previous 28 days",
    "posizione 28 giorni precedenti",
    "28 giorni precedenti: posizione",
    "previous 3 months position",
    "position previous 3 months",
    "posizione 3 mesi precedenti",
    "3 mesi precedenti: posizione",
];

/// Collapse internal newlines to spaces and trim. Multi-line headers come out
/// of spreadsheet exports surprisingly often.
pub fn normalize_header(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized lowercase form used for alias lookups.
pub fn match_key(raw: &str) -> String {
    normalize_header(raw).to_lowercase()
}

/// Map a GSC sheet header to its canonical field. The item-label column is
/// report-specific; the metric columns are shared across report types.
pub fn map_gsc_header(report: GscReportType, header: &str) -> Option<GscField> {
    let key = match_key(header);
    let key = key.as_str();

    if report == GscReportType::Filters {
        if FILTER_NAME_ALIASES.contains(&key) {
            return Some(GscField::FilterName);
        }
        if FILTER_VALUE_ALIASES.contains(&key) {
            return Some(GscField::FilterValue);
        }
    } else if report.item_aliases().contains(&key) {
        return Some(GscField::Item);
    }

    if CLICKS_CURRENT_ALIASES.contains(&key) {
        return Some(GscField::ClicksCurrent);
    }
    if CLICKS_PREVIOUS_ALIASES.contains(&key) {
        return Some(GscField::ClicksPrevious);
    }
    if IMPRESSIONS_CURRENT_ALIASES.contains(&key) {
        return Some(GscField::ImpressionsCurrent);
    }
    if IMPRESSIONS_PREVIOUS_ALIASES.contains(&key) {
        return Some(GscField::ImpressionsPrevious);
    }
    if CTR_CURRENT_ALIASES.contains(&key) {
        return Some(GscField::CtrCurrent);
    }
    if CTR_PREVIOUS_ALIASES.contains(&key) {
        return Some(GscField::CtrPrevious);
    }
    if POSITION_CURRENT_ALIASES.contains(&key) {
        return Some(GscField::PositionCurrent);
    }
    if POSITION_PREVIOUS_ALIASES.contains(&key) {
        return Some(GscField::PositionPrevious);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_multiline_headers() {
        assert_eq!(normalize_header("Last 28 days\nClicks"), "Last 28 days Clicks");
        assert_eq!(normalize_header("  Keyword \r\n "), "Keyword");
    }

    #[test]
    fn maps_english_and_italian_metric_headers() {
        assert_eq!(
            map_gsc_header(GscReportType::Queries, "Clicks"),
            Some(GscField::ClicksCurrent)
        );
        assert_eq!(
            map_gsc_header(GscReportType::Queries, "Clic 28 giorni precedenti"),
            Some(GscField::ClicksPrevious)
        );
        assert_eq!(
            map_gsc_header(GscReportType::Pages, "CTR ultimi 3 mesi"),
            Some(GscField::CtrCurrent)
        );
    }

    #[test]
    fn item_column_is_report_specific() {
        assert_eq!(
            map_gsc_header(GscReportType::Queries, "Le query più frequenti"),
            Some(GscField::Item)
        );
        assert_eq!(map_gsc_header(GscReportType::Pages, "Query"), None);
        assert_eq!(
            map_gsc_header(GscReportType::Filters, "Filtro"),
            Some(GscField::FilterName)
        );
    }

    #[test]
    fn unknown_headers_do_not_match_by_substring() {
        // "clicks per visit" contains "clicks" but is not an alias.
        assert_eq!(map_gsc_header(GscReportType::Queries, "Clicks per visit"), None);
    }
}
