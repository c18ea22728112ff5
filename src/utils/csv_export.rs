//! CSV export with the organization's fixed conventions: `;` delimiter,
//! UTF-8, header row, fixed column order.

use formation_core::AppError;
use serde::Serialize;

/// One row of the student export. Field order is the column order.
#[derive(Debug, Serialize)]
pub struct StudentCsvRow {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub created_at: String,
}

/// Serializes rows into a `;`-delimited CSV document with a header.
pub fn write_csv(rows: &[StudentCsvRow]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::internal(anyhow::anyhow!("CSV serialization failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(anyhow::anyhow!("CSV flush failed: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::internal(anyhow::anyhow!("CSV is not valid UTF-8: {}", e)))
}
