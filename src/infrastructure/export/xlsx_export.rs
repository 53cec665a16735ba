// ============================================================
// XLSX REPORT EXPORT
// ============================================================
// Multi-sheet comparison workbook: overview counts, two summary
// sheets, three detail sheets with per-competitor columns

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::domain::error::{AppError, Result};
use crate::domain::keyword::{ComparisonResult, KeywordStatus, SitePresence};
use crate::infrastructure::export::csv_export::NA;

const TOP_N: usize = 10;

fn xlsx_err(e: XlsxError) -> AppError {
    AppError::Internal(format!("XLSX write failed: {}", e))
}

/// Build the full comparison report and return the workbook bytes.
pub fn write_comparison_workbook(
    results: &[ComparisonResult],
    competitor_names: &[String],
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    write_overview(&mut workbook, results, competitor_names, &bold)?;

    let mut common: Vec<&ComparisonResult> = results
        .iter()
        .filter(|r| r.status == KeywordStatus::Common)
        .collect();
    let mut primary_only: Vec<&ComparisonResult> = results
        .iter()
        .filter(|r| r.status == KeywordStatus::PrimaryOnly)
        .collect();
    let mut competitor_only: Vec<&ComparisonResult> = results
        .iter()
        .filter(|r| r.status == KeywordStatus::CompetitorOnly)
        .collect();

    write_top_sheet(&mut workbook, "Top Common", &common, &bold)?;
    write_top_sheet(&mut workbook, "Top Opportunities", &competitor_only, &bold)?;

    // Detail sheets rank by the primary site's position, unranked last.
    common.sort_by_key(|r| position_rank(r));
    primary_only.sort_by_key(|r| position_rank(r));
    competitor_only.sort_by_key(|r| position_rank(r));
    write_detail_sheet(&mut workbook, "Common", &common, competitor_names, &bold)?;
    write_detail_sheet(&mut workbook, "Site Only", &primary_only, competitor_names, &bold)?;
    write_detail_sheet(
        &mut workbook,
        "Competitor Only",
        &competitor_only,
        competitor_names,
        &bold,
    )?;

    workbook.save_to_buffer().map_err(xlsx_err)
}

// Unranked keywords sort after ranked ones.
fn position_rank(result: &ComparisonResult) -> u32 {
    result
        .primary
        .as_ref()
        .and_then(|p| p.position)
        .unwrap_or(u32::MAX)
}

fn write_overview(
    workbook: &mut Workbook,
    results: &[ComparisonResult],
    competitor_names: &[String],
    bold: &Format,
) -> Result<()> {
    let count = |status: KeywordStatus| {
        results.iter().filter(|r| r.status == status).count() as f64
    };

    let sheet = workbook.add_worksheet();
    sheet.set_name("Overview").map_err(xlsx_err)?;
    sheet.write_string_with_format(0, 0, "Metric", bold).map_err(xlsx_err)?;
    sheet.write_string_with_format(0, 1, "Value", bold).map_err(xlsx_err)?;

    let rows: [(&str, f64); 5] = [
        ("Keywords analyzed", results.len() as f64),
        ("Common keywords", count(KeywordStatus::Common)),
        ("Site-only keywords", count(KeywordStatus::PrimaryOnly)),
        ("Competitor-only keywords", count(KeywordStatus::CompetitorOnly)),
        ("Competitors", competitor_names.len() as f64),
    ];
    for (idx, (label, value)) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, *label).map_err(xlsx_err)?;
        sheet.write_number(row, 1, *value).map_err(xlsx_err)?;
    }
    Ok(())
}

/// Human-readable top-10 by search volume.
fn write_top_sheet(
    workbook: &mut Workbook,
    name: &str,
    bucket: &[&ComparisonResult],
    bold: &Format,
) -> Result<()> {
    let mut ranked: Vec<&ComparisonResult> = bucket.to_vec();
    ranked.sort_by(|a, b| b.volume.unwrap_or(0).cmp(&a.volume.unwrap_or(0)));

    let sheet = workbook.add_worksheet();
    sheet.set_name(name).map_err(xlsx_err)?;
    for (col, label) in ["Keyword", "Volume", "Intent", "My Pos", "Best Competitor Pos"]
        .iter()
        .enumerate()
    {
        sheet
            .write_string_with_format(0, col as u16, *label, bold)
            .map_err(xlsx_err)?;
    }

    for (idx, result) in ranked.iter().take(TOP_N).enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, &result.keyword).map_err(xlsx_err)?;
        write_opt_number(sheet, row, 1, result.volume.map(|v| v as f64))?;
        sheet.write_string(row, 2, &result.intent).map_err(xlsx_err)?;
        write_opt_number(
            sheet,
            row,
            3,
            result.primary.as_ref().and_then(|p| p.position).map(f64::from),
        )?;
        let best_competitor = result
            .competitors
            .iter()
            .filter_map(|c| c.presence.as_ref().and_then(|p| p.position))
            .min();
        write_opt_number(sheet, row, 4, best_competitor.map(f64::from))?;
    }
    Ok(())
}

fn write_detail_sheet(
    workbook: &mut Workbook,
    name: &str,
    bucket: &[&ComparisonResult],
    competitor_names: &[String],
    bold: &Format,
) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name).map_err(xlsx_err)?;

    let mut header = vec![
        "Keyword".to_string(),
        "Volume".to_string(),
        "Difficulty".to_string(),
        "Opportunity".to_string(),
        "Intent".to_string(),
        "My Pos".to_string(),
        "My URL".to_string(),
    ];
    for competitor in competitor_names {
        header.push(format!("{} Pos", competitor));
        header.push(format!("{} URL", competitor));
    }
    for (col, label) in header.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, label, bold)
            .map_err(xlsx_err)?;
    }

    for (idx, result) in bucket.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string(row, 0, &result.keyword).map_err(xlsx_err)?;
        write_opt_number(sheet, row, 1, result.volume.map(|v| v as f64))?;
        write_opt_number(sheet, row, 2, result.difficulty.map(f64::from))?;
        write_opt_number(sheet, row, 3, result.opportunity.map(f64::from))?;
        sheet.write_string(row, 4, &result.intent).map_err(xlsx_err)?;
        write_presence(sheet, row, 5, &result.primary)?;
        for (c_idx, entry) in result.competitors.iter().enumerate() {
            write_presence(sheet, row, 5 + 2 * (c_idx as u16 + 1), &entry.presence)?;
        }
    }
    Ok(())
}

fn write_presence(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    presence: &Option<SitePresence>,
) -> Result<()> {
    match presence {
        Some(p) => {
            write_opt_number(sheet, row, col, p.position.map(f64::from))?;
            sheet.write_string(row, col + 1, &p.url).map_err(xlsx_err)?;
        }
        None => {
            sheet.write_string(row, col, NA).map_err(xlsx_err)?;
            sheet.write_string(row, col + 1, NA).map_err(xlsx_err)?;
        }
    }
    Ok(())
}

fn write_opt_number(sheet: &mut Worksheet, row: u32, col: u16, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) => sheet.write_number(row, col, v).map_err(xlsx_err)?,
        None => sheet.write_string(row, col, NA).map_err(xlsx_err)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keyword::CompetitorEntry;

    #[test]
    fn workbook_bytes_are_a_zip_archive() {
        let results = vec![ComparisonResult {
            keyword: "running shoes".into(),
            primary: Some(SitePresence { position: Some(2), url: "https://me".into() }),
            competitors: vec![CompetitorEntry {
                name: "rival.com".into(),
                presence: None,
            }],
            volume: Some(900),
            difficulty: None,
            opportunity: None,
            intent: "commercial".into(),
            status: KeywordStatus::PrimaryOnly,
        }];
        let bytes =
            write_comparison_workbook(&results, &["rival.com".to_string()]).unwrap();
        // XLSX is a zip container.
        assert_eq!(&bytes[..2], b"PK");
    }
}
