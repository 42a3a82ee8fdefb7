use crate::utils::error::{MonitorError, Result};
use std::path::Path;

/// Mean NDVI over paired near-infrared and red band samples:
/// `(nir - red) / (nir + red)` per pixel. Pixels whose band sum is zero
/// carry no signal and are skipped.
pub fn calculate_ndvi(nir: &[f64], red: &[f64]) -> Result<f64> {
    if nir.is_empty() || red.is_empty() {
        return Err(MonitorError::ProcessingError {
            message: "NDVI bands must not be empty".to_string(),
        });
    }
    if nir.len() != red.len() {
        return Err(MonitorError::ProcessingError {
            message: format!(
                "NDVI band length mismatch: {} NIR vs {} red samples",
                nir.len(),
                red.len()
            ),
        });
    }

    let mut sum = 0.0;
    let mut counted = 0usize;
    for (&n, &r) in nir.iter().zip(red.iter()) {
        let denominator = n + r;
        if denominator == 0.0 {
            continue;
        }
        sum += (n - r) / denominator;
        counted += 1;
    }

    if counted == 0 {
        return Err(MonitorError::ProcessingError {
            message: "NDVI bands contain no usable pixels".to_string(),
        });
    }

    Ok(sum / counted as f64)
}

/// Human-readable reading of an NDVI value.
pub fn interpret_ndvi(value: f64) -> &'static str {
    if value < 0.1 {
        "No vegetation is present. This could be due to recently harvested crop or a fallow period."
    } else if value < 0.2 {
        "Sparse vegetation is present. This might be a field in the early stage of crop growth."
    } else if value < 0.4 {
        "Moderate vegetation is present. The crops are growing."
    } else if value < 0.6 {
        "High vegetation is present. The crops are growing well."
    } else {
        "Very high vegetation is present. There might be other objects (like trees) in the field."
    }
}

/// Writes the two-line NDVI report for one field.
pub fn write_report(output_path: &Path, value: f64) -> Result<()> {
    let interpretation = interpret_ndvi(value);
    tracing::debug!("NDVI value: {}", value);
    tracing::debug!("NDVI interpretation: {}", interpretation);

    let report = format!(
        "NDVI value: {}\nNDVI interpretation: {}\n",
        value, interpretation
    );
    std::fs::write(output_path, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ndvi_of_uniform_bands() {
        // nir = 0.6, red = 0.2 -> (0.4 / 0.8) = 0.5 per pixel.
        let nir = [0.6, 0.6, 0.6];
        let red = [0.2, 0.2, 0.2];
        let value = calculate_ndvi(&nir, &red).unwrap();
        assert!((value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_sum_pixels_are_skipped() {
        let nir = [0.6, 0.0];
        let red = [0.2, 0.0];
        let value = calculate_ndvi(&nir, &red).unwrap();
        assert!((value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_bands_are_rejected() {
        assert!(calculate_ndvi(&[], &[]).is_err());
    }

    #[test]
    fn mismatched_bands_are_rejected() {
        assert!(calculate_ndvi(&[0.5, 0.5], &[0.5]).is_err());
    }

    #[test]
    fn interpretation_buckets() {
        assert!(interpret_ndvi(0.05).starts_with("No vegetation"));
        assert!(interpret_ndvi(0.15).starts_with("Sparse vegetation"));
        assert!(interpret_ndvi(0.3).starts_with("Moderate vegetation"));
        assert!(interpret_ndvi(0.5).starts_with("High vegetation"));
        assert!(interpret_ndvi(0.7).starts_with("Very high vegetation"));
    }

    #[test]
    fn report_contains_value_and_interpretation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ndvi_report.txt");

        write_report(&path, 0.5).unwrap();

        let report = std::fs::read_to_string(&path).unwrap();
        assert!(report.contains("NDVI value: 0.5"));
        assert!(report.contains("High vegetation is present"));
    }
}
