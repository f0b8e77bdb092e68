//! Offline NPY to CSV converter.
//!
//! One-shot data-preparation utility with no runtime role in the server: it
//! reads a NumPy `.npy` array file, flattens it into rows of 12 lead values
//! and writes a header-less comma-separated file.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::ECG_LEADS;
use crate::error::{EcgdError, Result};

const NPY_MAGIC: &[u8] = b"\x93NUMPY";

enum Dtype {
    F32,
    F64,
}

/// Convert `input` (little-endian float NPY, C order) into `output` CSV with
/// `ECG_LEADS` values per row.
pub fn npy_to_csv<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    let bytes = fs::read(input.as_ref())?;
    let values = parse_npy_floats(&bytes)?;

    if values.is_empty() || values.len() % ECG_LEADS != 0 {
        return Err(EcgdError::Validation(format!(
            "cannot reshape {} values into rows of {ECG_LEADS}",
            values.len()
        )));
    }

    let file = fs::File::create(output.as_ref())?;
    let mut w = BufWriter::new(file);
    for row in values.chunks(ECG_LEADS) {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(w, "{line}")?;
    }
    w.flush()?;

    info!(
        "converted {} samples ({} rows) to {}",
        values.len(),
        values.len() / ECG_LEADS,
        output.as_ref().display()
    );
    Ok(())
}

/// Decode the NPY container: magic, version, header dict, raw data.
///
/// Only little-endian `f4`/`f8` C-order arrays are supported, which covers
/// everything `np.save` produces for ECG sample dumps.
fn parse_npy_floats(bytes: &[u8]) -> Result<Vec<f64>> {
    if bytes.len() < NPY_MAGIC.len() + 4 || &bytes[..NPY_MAGIC.len()] != NPY_MAGIC {
        return Err(EcgdError::Validation("not an NPY file".to_string()));
    }

    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => {
            let len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
            (len, 10)
        }
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(EcgdError::Validation("truncated NPY header".to_string()));
            }
            let len = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
            (len, 12)
        }
        v => {
            return Err(EcgdError::Validation(format!(
                "unsupported NPY version {v}"
            )));
        }
    };

    let data_start = header_start + header_len;
    if bytes.len() < data_start {
        return Err(EcgdError::Validation("truncated NPY header".to_string()));
    }
    let header = std::str::from_utf8(&bytes[header_start..data_start])
        .map_err(|_| EcgdError::Validation("NPY header is not valid UTF-8".to_string()))?;

    if header.contains("'fortran_order': True") {
        return Err(EcgdError::Validation(
            "Fortran-order NPY arrays are not supported".to_string(),
        ));
    }

    let dtype = if header.contains("'descr': '<f4'") {
        Dtype::F32
    } else if header.contains("'descr': '<f8'") {
        Dtype::F64
    } else {
        return Err(EcgdError::Validation(format!(
            "unsupported NPY dtype in header: {}",
            header.trim()
        )));
    };

    let data = &bytes[data_start..];
    let item = match dtype {
        Dtype::F32 => 4,
        Dtype::F64 => 8,
    };
    if data.len() % item != 0 {
        return Err(EcgdError::Validation("truncated NPY data".to_string()));
    }

    let values = match dtype {
        Dtype::F32 => data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        Dtype::F64 => data
            .chunks_exact(8)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect(),
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_npy_f32(path: &Path, values: &[f32]) {
        let header = "{'descr': '<f4', 'fortran_order': False, 'shape': (2, 12), }";
        // Pad the header so magic + length fields + dict end on a 64-byte
        // boundary with a trailing newline, as np.save does.
        let mut dict = header.to_string();
        while (10 + dict.len() + 1) % 64 != 0 {
            dict.push(' ');
        }
        dict.push('\n');

        let mut bytes = Vec::new();
        bytes.extend_from_slice(NPY_MAGIC);
        bytes.push(1);
        bytes.push(0);
        bytes.extend_from_slice(&(dict.len() as u16).to_le_bytes());
        bytes.extend_from_slice(dict.as_bytes());
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn converts_npy_to_rows_of_twelve() {
        let dir = std::env::temp_dir().join("ecgd-convert-test");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("sample.npy");
        let output = dir.join("sample.csv");

        let values: Vec<f32> = (0..24).map(|v| v as f32).collect();
        write_npy_f32(&input, &values);

        npy_to_csv(&input, &output).unwrap();

        let csv = fs::read_to_string(&output).unwrap();
        let rows: Vec<&str> = csv.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].split(',').count(), 12);
        assert!(rows[0].starts_with("0,1,2,"));
        assert!(rows[1].starts_with("12,13,14,"));
    }

    #[test]
    fn rejects_non_npy_input() {
        let dir = std::env::temp_dir().join("ecgd-convert-test");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("bogus.npy");
        fs::write(&input, b"definitely not numpy").unwrap();

        let err = npy_to_csv(&input, dir.join("bogus.csv")).unwrap_err();
        assert!(err.to_string().contains("not an NPY file"));
    }

    #[test]
    fn rejects_element_count_not_divisible_by_leads() {
        let dir = std::env::temp_dir().join("ecgd-convert-test");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("odd.npy");
        let values: Vec<f32> = (0..7).map(|v| v as f32).collect();
        write_npy_f32(&input, &values);

        let err = npy_to_csv(&input, dir.join("odd.csv")).unwrap_err();
        assert!(err.to_string().contains("cannot reshape"));
    }
}
