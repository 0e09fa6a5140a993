//! TSPLIB `NODE_COORD_SECTION` to distance-matrix conversion.
//!
//! Only Euclidean 2D coordinates are read. Distances are rounded to six
//! decimals and written with [`crate::instance::write_matrix`].

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{ChristofidesError, Result};
use crate::instance::write_matrix;

/// Decimal places kept in converted distances
pub const DISTANCE_DECIMALS: i32 = 6;

/// Read the `(x, y)` coordinates of a TSPLIB file in file order.
pub fn read_coordinates<P: AsRef<Path>>(path: P) -> Result<Vec<(f64, f64)>> {
    let reader = BufReader::new(File::open(path)?);
    let mut coords = Vec::new();
    let mut in_section = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.starts_with("NODE_COORD_SECTION") {
            in_section = true;
            continue;
        }
        if !in_section || line.is_empty() {
            continue;
        }
        if line.starts_with("EOF") || line.ends_with("_SECTION") {
            break;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        let parse = |field: &str| {
            field.parse::<f64>().map_err(|_| ChristofidesError::Parse {
                line: index + 1,
                message: format!("invalid coordinate '{}'", field),
            })
        };
        coords.push((parse(parts[1])?, parse(parts[2])?));
    }

    Ok(coords)
}

/// Euclidean distance between two points, rounded to [`DISTANCE_DECIMALS`].
fn rounded_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let scale = 10f64.powi(DISTANCE_DECIMALS);
    ((a.0 - b.0).hypot(a.1 - b.1) * scale).round() / scale
}

/// Full symmetric distance matrix with a zero diagonal.
pub fn distance_matrix(coords: &[(f64, f64)]) -> Vec<Vec<f64>> {
    let n = coords.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            if i != j {
                matrix[i][j] = rounded_distance(coords[i], coords[j]);
            }
        }
    }
    matrix
}

/// Convert one TSPLIB file into a matrix file.
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<usize> {
    let coords = read_coordinates(input)?;
    let matrix = distance_matrix(&coords);
    write_matrix(output, &matrix)?;
    Ok(matrix.len())
}

/// `.tsp` files directly inside `dir`, sorted by path.
fn tsp_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|e| e == "tsp").unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Convert every `.tsp` file of `input_dir` and of its immediate subdirectories
/// into `<stem>.txt` under `output_dir`.
///
/// Inputs are visited top-level first, then subdirectory by subdirectory in
/// path order. When two inputs share a stem, the first one is converted and
/// the later ones are skipped with a warning. Returns the `(input, output)`
/// pairs that were written.
pub fn convert_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir)?;

    let mut subdirs = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            subdirs.push(path);
        }
    }
    subdirs.sort();

    let mut sources = tsp_files(input_dir)?;
    for subdir in &subdirs {
        sources.extend(tsp_files(subdir)?);
    }

    let mut converted = Vec::with_capacity(sources.len());
    let mut written: HashMap<PathBuf, PathBuf> = HashMap::new();
    for source in sources {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let target = output_dir.join(format!("{}.txt", stem));
        if let Some(first) = written.get(&target) {
            warn!(
                "Skipping {:?}: {:?} was already written from {:?}",
                source, target, first
            );
            continue;
        }
        let n = convert_file(&source, &target)?;
        info!("Converted {:?} -> {:?} ({} vertices)", source, target, n);
        written.insert(target.clone(), source.clone());
        converted.push((source, target));
    }

    Ok(converted)
}
