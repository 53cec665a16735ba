// ============================================================
// GSC ANALYSIS USE CASE
// ============================================================
// Period-over-period diffs, aggregate summaries, chart projections

use tracing::info;

use crate::domain::error::Result;
use crate::domain::gsc::{
    ChartSlice, GscAnalyzedItem, GscReportType, GscSectionAnalysis, GscSheetRow, GscSummary,
    PieSlice,
};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::xlsx::GscWorkbook;
use crate::shared::cancellation::CancellationToken;

/// Bar colors cycled by rank in the chart projection.
const CHART_PALETTE: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#14b8a6", "#f97316", "#6366f1",
];

const LABEL_MAX_CHARS: usize = 30;

pub struct GscAnalysisUseCase {
    config: EngineConfig,
}

impl GscAnalysisUseCase {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Parse and analyze a whole export, one report type at a time with a
    /// yield in between. Report types whose sheet is missing or empty are
    /// skipped; that is normal for GSC exports.
    pub async fn analyze_workbook(
        &self,
        raw: Vec<u8>,
        token: &CancellationToken,
    ) -> Result<Vec<GscSectionAnalysis>> {
        let mut workbook = GscWorkbook::open(raw)?;
        let mut sections = Vec::new();

        for report in GscReportType::all() {
            if token.is_cancelled() {
                break;
            }
            let rows = workbook.parse_report(report)?;
            if !rows.is_empty() {
                sections.push(self.analyze_rows(report, rows));
            }
            tokio::task::yield_now().await;
        }

        info!(sections = sections.len(), "workbook analysis complete");
        Ok(sections)
    }

    /// Analyze already-parsed rows of one report type.
    pub fn analyze_rows(&self, report: GscReportType, rows: Vec<GscSheetRow>) -> GscSectionAnalysis {
        let items: Vec<GscAnalyzedItem> = rows.into_iter().map(analyze_row).collect();
        let summary = summarize(&items);
        let chart = chart_projection(&items, self.config.chart_top_n);
        let device_pie =
            (report == GscReportType::Devices).then(|| pie_projection(&items));

        GscSectionAnalysis {
            report_type: report,
            items,
            summary,
            chart,
            device_pie,
        }
    }
}

/// previous=0 with current>0 is infinite growth; 0/0 is no change.
fn pct_change(current: u64, previous: u64) -> f64 {
    if previous != 0 {
        (current as f64 - previous as f64) / previous as f64
    } else if current > 0 {
        f64::INFINITY
    } else {
        0.0
    }
}

fn analyze_row(row: GscSheetRow) -> GscAnalyzedItem {
    let diff_clicks = row.clicks_current as i64 - row.clicks_previous as i64;
    let diff_impressions = row.impressions_current as i64 - row.impressions_previous as i64;
    let pct_change_clicks = pct_change(row.clicks_current, row.clicks_previous);
    let pct_change_impressions = pct_change(row.impressions_current, row.impressions_previous);
    let diff_ctr = row.ctr_current - row.ctr_previous;
    // previous - current: moving from position 8 to 3 is +5, an improvement.
    let diff_position = match (row.position_previous, row.position_current) {
        (Some(previous), Some(current)) => Some(previous - current),
        _ => None,
    };

    GscAnalyzedItem {
        row,
        diff_clicks,
        pct_change_clicks,
        diff_impressions,
        pct_change_impressions,
        diff_ctr,
        diff_position,
    }
}

fn summarize(items: &[GscAnalyzedItem]) -> GscSummary {
    let total_clicks_current: u64 = items.iter().map(|i| i.row.clicks_current).sum();
    let total_impressions_current: u64 = items.iter().map(|i| i.row.impressions_current).sum();
    let total_clicks_previous: u64 = items.iter().map(|i| i.row.clicks_previous).sum();
    let total_impressions_previous: u64 = items.iter().map(|i| i.row.impressions_previous).sum();

    let has_previous_data = items
        .iter()
        .any(|i| i.row.clicks_previous > 0 || i.row.impressions_previous > 0);

    GscSummary {
        total_clicks_current,
        total_impressions_current,
        has_previous_data,
        delta_clicks: has_previous_data
            .then(|| total_clicks_current as i64 - total_clicks_previous as i64),
        delta_impressions: has_previous_data
            .then(|| total_impressions_current as i64 - total_impressions_previous as i64),
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= LABEL_MAX_CHARS {
        label.to_string()
    } else {
        let mut out: String = label.chars().take(LABEL_MAX_CHARS).collect();
        out.push('…');
        out
    }
}

/// Top rows by current clicks; empty labels and zero-click rows are noise.
fn chart_projection(items: &[GscAnalyzedItem], top_n: usize) -> Vec<ChartSlice> {
    let mut eligible: Vec<&GscAnalyzedItem> = items
        .iter()
        .filter(|i| !i.row.item.trim().is_empty() && i.row.clicks_current > 0)
        .collect();
    eligible.sort_by(|a, b| b.row.clicks_current.cmp(&a.row.clicks_current));

    eligible
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(rank, item)| ChartSlice {
            label: truncate_label(&item.row.item),
            value: item.row.clicks_current,
            color: CHART_PALETTE[rank % CHART_PALETTE.len()].to_string(),
        })
        .collect()
}

/// Current clicks aggregated per device label, descending, zeros omitted.
fn pie_projection(items: &[GscAnalyzedItem]) -> Vec<PieSlice> {
    let mut slices: Vec<PieSlice> = Vec::new();
    for item in items {
        match slices.iter_mut().find(|s| s.label == item.row.item) {
            Some(slice) => slice.value += item.row.clicks_current,
            None => slices.push(PieSlice {
                label: item.row.item.clone(),
                value: item.row.clicks_current,
            }),
        }
    }
    slices.retain(|s| s.value > 0);
    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(item: &str, clicks: (u64, u64), impressions: (u64, u64)) -> GscSheetRow {
        let mut r = GscSheetRow::new(item);
        r.clicks_current = clicks.0;
        r.clicks_previous = clicks.1;
        r.impressions_current = impressions.0;
        r.impressions_previous = impressions.1;
        r
    }

    #[test]
    fn pct_change_edge_cases() {
        assert_eq!(pct_change(0, 0), 0.0);
        assert_eq!(pct_change(5, 0), f64::INFINITY);
        assert_eq!(pct_change(5, 10), -0.5);
        assert_eq!(pct_change(15, 10), 0.5);
    }

    #[test]
    fn position_diff_sign_is_inverted() {
        let mut r = GscSheetRow::new("shoes");
        r.position_previous = Some(8.0);
        r.position_current = Some(3.0);
        let analyzed = analyze_row(r);
        // Improvement (lower position number) must come out positive.
        assert_eq!(analyzed.diff_position, Some(5.0));
    }

    #[test]
    fn position_diff_requires_both_periods() {
        let mut r = GscSheetRow::new("shoes");
        r.position_current = Some(3.0);
        assert_eq!(analyze_row(r).diff_position, None);
    }

    #[test]
    fn ctr_diff_stays_a_fraction() {
        let mut r = GscSheetRow::new("shoes");
        r.ctr_current = 0.05;
        r.ctr_previous = 0.02;
        let analyzed = analyze_row(r);
        assert!((analyzed.diff_ctr - 0.03).abs() < 1e-12);
    }

    #[test]
    fn summary_deltas_need_previous_data() {
        let use_case = GscAnalysisUseCase::default_config();

        let without_previous = use_case.analyze_rows(
            GscReportType::Queries,
            vec![row("a", (10, 0), (100, 0)), row("b", (5, 0), (50, 0))],
        );
        assert_eq!(without_previous.summary.total_clicks_current, 15);
        assert!(!without_previous.summary.has_previous_data);
        assert_eq!(without_previous.summary.delta_clicks, None);

        let with_previous = use_case.analyze_rows(
            GscReportType::Queries,
            vec![row("a", (10, 4), (100, 80)), row("b", (5, 8), (50, 60))],
        );
        assert!(with_previous.summary.has_previous_data);
        assert_eq!(with_previous.summary.delta_clicks, Some(3));
        assert_eq!(with_previous.summary.delta_impressions, Some(10));
    }

    #[test]
    fn chart_takes_top_five_and_truncates_labels() {
        let long_label = "a-very-long-page-url-that-keeps-going-and-going";
        let mut rows: Vec<GscSheetRow> = (0..8)
            .map(|i| row(&format!("item{}", i), (i + 1, 0), (0, 0)))
            .collect();
        rows.push(row(long_label, (100, 0), (0, 0)));
        rows.push(row("", (999, 0), (0, 0))); // empty label excluded
        rows.push(row("zero", (0, 0), (0, 0))); // zero clicks excluded

        let use_case = GscAnalysisUseCase::default_config();
        let section = use_case.analyze_rows(GscReportType::Pages, rows);

        assert_eq!(section.chart.len(), 5);
        assert_eq!(section.chart[0].value, 100);
        assert!(section.chart[0].label.chars().count() <= LABEL_MAX_CHARS + 1);
        assert!(section.chart[0].label.ends_with('…'));
        // Colors cycle through the palette by rank.
        assert_eq!(section.chart[0].color, CHART_PALETTE[0]);
        assert_eq!(section.chart[1].color, CHART_PALETTE[1]);
    }

    #[test]
    fn device_pie_aggregates_and_sorts() {
        let rows = vec![
            row("Mobile", (30, 0), (0, 0)),
            row("Desktop", (120, 0), (0, 0)),
            row("Mobile", (20, 0), (0, 0)),
            row("Tablet", (0, 0), (0, 0)),
        ];
        let use_case = GscAnalysisUseCase::default_config();
        let section = use_case.analyze_rows(GscReportType::Devices, rows);

        let pie = section.device_pie.unwrap();
        assert_eq!(pie.len(), 2); // Tablet dropped at zero
        assert_eq!(pie[0].label, "Desktop");
        assert_eq!(pie[0].value, 120);
        assert_eq!(pie[1].label, "Mobile");
        assert_eq!(pie[1].value, 50);
    }

    #[test]
    fn non_device_reports_have_no_pie() {
        let use_case = GscAnalysisUseCase::default_config();
        let section =
            use_case.analyze_rows(GscReportType::Queries, vec![row("a", (1, 0), (0, 0))]);
        assert!(section.device_pie.is_none());
    }
}
