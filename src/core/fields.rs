use crate::config::MonitorConfig;
use crate::domain::model::FieldRecord;
use crate::domain::ports::FieldSource;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::sync::Arc;

/// Loads the field list from `csv_url`, which may be a local path or an
/// HTTP(S) URL. The first row is a header and is skipped; `fields_csv`
/// names the columns positionally.
pub struct CsvFieldSource {
    config: Arc<MonitorConfig>,
    client: reqwest::Client,
}

/// Positions of the five required columns inside the configured layout.
struct ColumnLayout {
    field_id: usize,
    date: usize,
    lat: usize,
    lon: usize,
    dim: usize,
}

impl ColumnLayout {
    fn resolve(columns: &[String]) -> Result<Self> {
        let index_of = |name: &str| -> Result<usize> {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| MonitorError::ConfigError {
                    message: format!("fields_csv does not name a '{}' column", name),
                })
        };

        Ok(Self {
            field_id: index_of("field_id")?,
            date: index_of("date")?,
            lat: index_of("lat")?,
            lon: index_of("lon")?,
            dim: index_of("dim")?,
        })
    }
}

impl CsvFieldSource {
    pub fn new(config: Arc<MonitorConfig>) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn read_source(&self) -> Result<Vec<u8>> {
        let source = &self.config.csv_url;

        if source.starts_with("http://") || source.starts_with("https://") {
            let response = self.client.get(source).send().await.map_err(|e| {
                MonitorError::SourceUnavailable {
                    source_name: source.clone(),
                    cause: e.to_string(),
                }
            })?;

            if !response.status().is_success() {
                return Err(MonitorError::SourceUnavailable {
                    source_name: source.clone(),
                    cause: format!("HTTP status {}", response.status()),
                });
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| MonitorError::SourceUnavailable {
                    source_name: source.clone(),
                    cause: e.to_string(),
                })?;
            Ok(bytes.to_vec())
        } else {
            tokio::fs::read(source)
                .await
                .map_err(|e| MonitorError::SourceUnavailable {
                    source_name: source.clone(),
                    cause: e.to_string(),
                })
        }
    }
}

#[async_trait]
impl FieldSource for CsvFieldSource {
    async fn load(&self) -> Result<Vec<FieldRecord>> {
        let layout = ColumnLayout::resolve(&self.config.fields_csv)?;
        let expected_columns = self.config.fields_csv.len();
        let raw = self.read_source().await?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(raw.as_slice());

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            // 1-based data row number, not counting the header.
            let row_number = index + 1;

            if row.len() != expected_columns {
                return Err(MonitorError::SourceMalformed {
                    row: row_number,
                    reason: format!("expected {} columns, found {}", expected_columns, row.len()),
                });
            }

            records.push(FieldRecord {
                field_id: row[layout.field_id].to_string(),
                date: parse_date(row_number, &row[layout.date])?,
                lat: parse_number(row_number, "lat", &row[layout.lat])?,
                lon: parse_number(row_number, "lon", &row[layout.lon])?,
                dim: parse_number(row_number, "dim", &row[layout.dim])?,
            });
        }

        tracing::debug!("Loaded {} field records from {}", records.len(), self.config.csv_url);
        Ok(records)
    }
}

fn parse_date(row: usize, value: &str) -> Result<String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| MonitorError::SourceMalformed {
        row,
        reason: format!("invalid date '{}': {}", value, e),
    })?;
    Ok(value.to_string())
}

fn parse_number(row: usize, column: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| MonitorError::SourceMalformed {
            row,
            reason: format!("invalid {} value '{}'", column, value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REQUIRED_COLUMNS;
    use httpmock::prelude::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn config_for(csv_url: String) -> Arc<MonitorConfig> {
        Arc::new(MonitorConfig {
            fields_csv: REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            api_key: "demo-key".to_string(),
            nasa_url: "https://example.com".to_string(),
            bucket_name: "field-imagery".to_string(),
            csv_url,
            use_mock_s3: true,
            media_root: Some("/tmp".into()),
            concurrent_requests: 2,
            request_timeout: Duration::from_secs(5),
        })
    }

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn loads_records_in_row_order() {
        let file = csv_file(
            "field_id,date,lat,lon,dim\n\
             F1,2024-01-01,10.5,20.5,0.1\n\
             F2,2024-02-01,-33.9,151.2,0.2\n",
        );
        let source = CsvFieldSource::new(config_for(file.path().display().to_string()));

        let records = source.load().await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field_id, "F1");
        assert_eq!(records[0].date, "2024-01-01");
        assert_eq!(records[0].lat, 10.5);
        assert_eq!(records[1].field_id, "F2");
        assert_eq!(records[1].lon, 151.2);
    }

    #[tokio::test]
    async fn header_only_source_yields_no_records() {
        let file = csv_file("field_id,date,lat,lon,dim\n");
        let source = CsvFieldSource::new(config_for(file.path().display().to_string()));

        let records = source.load().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn short_row_is_malformed() {
        let file = csv_file(
            "field_id,date,lat,lon,dim\n\
             F1,2024-01-01,10.5,20.5\n",
        );
        let source = CsvFieldSource::new(config_for(file.path().display().to_string()));

        let err = source.load().await.unwrap_err();
        match err {
            MonitorError::SourceMalformed { row, .. } => assert_eq!(row, 1),
            other => panic!("expected SourceMalformed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn bad_coordinate_is_malformed() {
        let file = csv_file(
            "field_id,date,lat,lon,dim\n\
             F1,2024-01-01,north,20.5,0.1\n",
        );
        let source = CsvFieldSource::new(config_for(file.path().display().to_string()));

        assert!(matches!(
            source.load().await.unwrap_err(),
            MonitorError::SourceMalformed { .. }
        ));
    }

    #[tokio::test]
    async fn bad_date_is_malformed() {
        let file = csv_file(
            "field_id,date,lat,lon,dim\n\
             F1,01/01/2024,10.5,20.5,0.1\n",
        );
        let source = CsvFieldSource::new(config_for(file.path().display().to_string()));

        assert!(matches!(
            source.load().await.unwrap_err(),
            MonitorError::SourceMalformed { .. }
        ));
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let source = CsvFieldSource::new(config_for("/no/such/fields.csv".to_string()));

        assert!(matches!(
            source.load().await.unwrap_err(),
            MonitorError::SourceUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn loads_field_list_over_http() {
        let server = MockServer::start();
        let csv_mock = server.mock(|when, then| {
            when.method(GET).path("/fields.csv");
            then.status(200)
                .body("field_id,date,lat,lon,dim\nF1,2024-01-01,10,20,0.1\n");
        });

        let source = CsvFieldSource::new(config_for(server.url("/fields.csv")));
        let records = source.load().await.unwrap();

        csv_mock.assert();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field_id, "F1");
    }

    #[tokio::test]
    async fn http_error_status_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/fields.csv");
            then.status(403);
        });

        let source = CsvFieldSource::new(config_for(server.url("/fields.csv")));

        assert!(matches!(
            source.load().await.unwrap_err(),
            MonitorError::SourceUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn honors_reordered_column_names() {
        let file = csv_file(
            "date,field_id,dim,lat,lon\n\
             2024-01-01,F1,0.1,10.5,20.5\n",
        );
        let mut config = (*config_for(file.path().display().to_string())).clone();
        config.fields_csv = ["date", "field_id", "dim", "lat", "lon"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let source = CsvFieldSource::new(Arc::new(config));

        let records = source.load().await.unwrap();
        assert_eq!(records[0].field_id, "F1");
        assert_eq!(records[0].dim, 0.1);
        assert_eq!(records[0].lat, 10.5);
    }
}
