//! CSV price/trade sources and step-series writer.

use crate::domain::error::SimError;
use crate::domain::generators::{TablePriceSource, TableTradeSource};
use crate::domain::step::{Column, StepRecord};
use crate::ports::price_port::PriceSource;
use crate::ports::trade_port::TradeSource;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

const DEFAULT_PRICE_COLUMNS: [&str; 2] = ["close", "price"];

fn data_error(reason: impl Into<String>) -> SimError {
    SimError::Data {
        reason: reason.into(),
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<fs::File>, SimError> {
    csv::Reader::from_path(path)
        .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_number(
    record: &csv::StringRecord,
    col: usize,
    name: &str,
    row: usize,
) -> Result<f64, SimError> {
    let raw = record
        .get(col)
        .ok_or_else(|| data_error(format!("row {row}: missing {name} column")))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| data_error(format!("row {row}: invalid {name} value '{raw}': {e}")))?;
    if !value.is_finite() {
        return Err(data_error(format!("row {row}: {name} must be finite")));
    }
    Ok(value)
}

/// Price path read from a CSV file, one row per time index.
///
/// When the file has a `date` column rows are sorted by date and may be
/// restricted to `[start_date, end_date]`; otherwise file order is kept and
/// a date range is an error.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    table: TablePriceSource,
    dates: Option<Vec<NaiveDate>>,
}

impl CsvPriceSource {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        column: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, SimError> {
        let path = path.as_ref();
        let mut rdr = open_csv(path)?;
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV parse error: {}", e)))?
            .clone();

        let (price_col, price_name) = match column {
            Some(name) => (
                find_column(&headers, name).ok_or_else(|| {
                    data_error(format!("{}: no '{}' column", path.display(), name))
                })?,
                name.to_string(),
            ),
            None => DEFAULT_PRICE_COLUMNS
                .iter()
                .find_map(|name| find_column(&headers, name).map(|i| (i, name.to_string())))
                .ok_or_else(|| {
                    data_error(format!(
                        "{}: no price column (expected one of {})",
                        path.display(),
                        DEFAULT_PRICE_COLUMNS.join(", ")
                    ))
                })?,
        };
        let date_col = find_column(&headers, "date");
        if date_col.is_none() && (start_date.is_some() || end_date.is_some()) {
            return Err(data_error(format!(
                "{}: start_date/end_date require a 'date' column",
                path.display()
            )));
        }

        let mut rows: Vec<(Option<NaiveDate>, f64)> = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;

            let date = match date_col {
                Some(col) => {
                    let raw = record
                        .get(col)
                        .ok_or_else(|| data_error(format!("row {row}: missing date column")))?;
                    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                        data_error(format!("row {row}: invalid date format: {}", e))
                    })?;
                    if start_date.is_some_and(|s| date < s) || end_date.is_some_and(|e| date > e) {
                        continue;
                    }
                    Some(date)
                }
                None => None,
            };

            let price = parse_number(&record, price_col, &price_name, row)?;
            rows.push((date, price));
        }

        if date_col.is_some() {
            rows.sort_by_key(|(d, _)| *d);
        }

        let dates = date_col.map(|_| rows.iter().filter_map(|(d, _)| *d).collect());
        let prices = rows.into_iter().map(|(_, p)| p).collect();
        Ok(CsvPriceSource {
            table: TablePriceSource::new(prices),
            dates,
        })
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|d| d.get(index).copied())
    }
}

impl PriceSource for CsvPriceSource {
    fn price_at(&self, index: usize) -> Result<f64, SimError> {
        self.table.price_at(index)
    }

    fn duration(&self) -> i64 {
        self.table.duration()
    }
}

/// Trade schedule read from an `index,quantity` CSV file.
#[derive(Debug, Clone)]
pub struct CsvTradeSource {
    table: TableTradeSource,
}

impl CsvTradeSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let path = path.as_ref();
        let mut rdr = open_csv(path)?;
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV parse error: {}", e)))?
            .clone();
        let index_col = find_column(&headers, "index")
            .ok_or_else(|| data_error(format!("{}: no 'index' column", path.display())))?;
        let qty_col = find_column(&headers, "quantity")
            .ok_or_else(|| data_error(format!("{}: no 'quantity' column", path.display())))?;

        let mut table = TableTradeSource::new();
        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            let raw = record
                .get(index_col)
                .ok_or_else(|| data_error(format!("row {row}: missing index column")))?;
            let index: usize = raw
                .trim()
                .parse()
                .map_err(|e| data_error(format!("row {row}: invalid index '{raw}': {e}")))?;
            let quantity = parse_number(&record, qty_col, "quantity", row)?;
            table.add(index, quantity);
        }

        Ok(CsvTradeSource { table })
    }
}

impl TradeSource for CsvTradeSource {
    fn trade_at(&self, index: usize) -> Result<f64, SimError> {
        self.table.trade_at(index)
    }
}

/// Write the step series with an `index` column followed by every named
/// column, creating parent directories.
pub fn write_steps<P: AsRef<Path>>(path: P, steps: &[StepRecord]) -> Result<(), SimError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| data_error(format!("failed to create {}: {}", path.display(), e)))?;

    let mut header = vec!["index"];
    header.extend(Column::ALL.iter().map(|c| c.name()));
    wtr.write_record(&header)
        .map_err(|e| data_error(format!("CSV write error: {}", e)))?;

    for step in steps {
        let mut row = vec![step.index.to_string()];
        row.extend(Column::ALL.iter().map(|&c| step.value(c).to_string()));
        wtr.write_record(&row)
            .map_err(|e| data_error(format!("CSV write error: {}", e)))?;
    }
    wtr.flush()?;
    Ok(())
}
