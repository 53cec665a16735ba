// ============================================================
// CSV EXPORT
// ============================================================
// Comma-delimited, UTF-8 with BOM; quoting with "" escaping

use std::collections::HashMap;

use csv::WriterBuilder;

use crate::domain::error::{AppError, Result};
use crate::domain::keyword::{ComparisonResult, KeywordStatus};

/// Sentinel written for absent numeric/position values.
pub const NA: &str = "N/A";

fn status_label(status: KeywordStatus) -> &'static str {
    match status {
        KeywordStatus::Common => "common",
        KeywordStatus::PrimaryOnly => "primaryOnly",
        KeywordStatus::CompetitorOnly => "competitorOnly",
    }
}

fn opt_to_cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_else(|| NA.to_string())
}

/// Serialize comparison results. One pos+URL column pair per competitor, in
/// dataset order, after the primary site's own pair.
pub fn comparison_to_csv(
    results: &[ComparisonResult],
    competitor_names: &[String],
) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    let mut header = vec![
        "Keyword".to_string(),
        "Status".to_string(),
        "Volume".to_string(),
        "Difficulty".to_string(),
        "Opportunity".to_string(),
        "Intent".to_string(),
        "My Pos".to_string(),
        "My URL".to_string(),
    ];
    for name in competitor_names {
        header.push(format!("{} Pos", name));
        header.push(format!("{} URL", name));
    }
    writer
        .write_record(&header)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

    for result in results {
        let mut row = vec![
            result.keyword.clone(),
            status_label(result.status).to_string(),
            opt_to_cell(&result.volume),
            opt_to_cell(&result.difficulty),
            opt_to_cell(&result.opportunity),
            result.intent.clone(),
        ];
        match &result.primary {
            Some(presence) => {
                row.push(opt_to_cell(&presence.position));
                row.push(presence.url.clone());
            }
            None => {
                row.push(NA.to_string());
                row.push(NA.to_string());
            }
        }
        for entry in &result.competitors {
            match &entry.presence {
                Some(presence) => {
                    row.push(opt_to_cell(&presence.position));
                    row.push(presence.url.clone());
                }
                None => {
                    row.push(NA.to_string());
                    row.push(NA.to_string());
                }
            }
        }
        writer
            .write_record(&row)
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }

    finish(writer)
}

/// Export score rows under a fixed header list. Header-to-key matching is
/// case- and space-insensitive and tolerates a "7C_" prefix on headers, so
/// the ad-angle report can label columns "7C_Clarity" over data keyed
/// "clarity".
pub fn scores_to_csv(headers: &[&str], rows: &[HashMap<String, String>]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;

    let header_keys: Vec<String> = headers.iter().map(|h| export_key(h)).collect();

    for row in rows {
        let by_key: HashMap<String, &String> =
            row.iter().map(|(k, v)| (export_key(k), v)).collect();
        let record: Vec<String> = header_keys
            .iter()
            .map(|key| by_key.get(key).map(|v| (*v).clone()).unwrap_or_else(|| NA.to_string()))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    }

    finish(writer)
}

fn export_key(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let stripped = lower.strip_prefix("7c_").unwrap_or(&lower);
    stripped.replace([' ', '_'], "")
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write failed: {}", e)))?;
    let body = String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("CSV output was not UTF-8: {}", e)))?;
    Ok(format!("\u{feff}{}", body))
}
