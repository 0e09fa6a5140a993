//! Reading and writing distance-matrix instance files.
//!
//! The text format is the one produced by [`crate::tsplib`]: the first line holds
//! the number of vertices `n`, followed by `n` bracketed rows of comma-separated
//! reals, for example
//!
//! ```text
//! 3
//! [0, 1.5, 2]
//! [1.5, 0, 2.5]
//! [2, 2.5, 0]
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChristofidesError, Result};
use crate::graph::WeightedGraph;

/// A named distance matrix loaded from disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixInstance {
    /// Instance name, the file stem when read from a file
    pub name: String,
    /// Row-major distance matrix
    pub matrix: Vec<Vec<f64>>,
}

impl MatrixInstance {
    /// Parse a matrix instance file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(name, reader)
    }

    /// Parse matrix text from any buffered reader.
    pub fn from_reader<R: BufRead>(name: String, reader: R) -> Result<Self> {
        let mut dimension: Option<usize> = None;
        let mut matrix: Vec<Vec<f64>> = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let n = match dimension {
                Some(n) => n,
                None => {
                    let n = line.parse::<usize>().map_err(|_| ChristofidesError::Parse {
                        line: line_no,
                        message: format!("expected the number of vertices, found '{}'", line),
                    })?;
                    dimension = Some(n);
                    continue;
                }
            };

            if matrix.len() == n {
                return Err(ChristofidesError::Parse {
                    line: line_no,
                    message: format!("unexpected row beyond the declared {} rows", n),
                });
            }
            let row = parse_row(line, line_no)?;
            if row.len() != n {
                return Err(ChristofidesError::Parse {
                    line: line_no,
                    message: format!("expected {} values, found {}", n, row.len()),
                });
            }
            matrix.push(row);
        }

        let n = dimension.ok_or_else(|| ChristofidesError::Parse {
            line: 1,
            message: "empty instance file".to_string(),
        })?;
        if matrix.len() != n {
            return Err(ChristofidesError::Parse {
                line: matrix.len() + 2,
                message: format!("expected {} rows, found {}", n, matrix.len()),
            });
        }

        Ok(MatrixInstance { name, matrix })
    }

    pub fn dimension(&self) -> usize {
        self.matrix.len()
    }

    /// Validate the matrix into a complete graph. Zero cells off the diagonal
    /// are zero-cost edges, as produced by coincident TSPLIB points.
    pub fn to_graph(&self) -> Result<WeightedGraph> {
        WeightedGraph::complete(self.matrix.clone())
    }

    /// Validate the matrix into a graph where off-diagonal zeros are absent edges.
    pub fn to_sparse_graph(&self) -> Result<WeightedGraph> {
        WeightedGraph::from_matrix(self.matrix.clone())
    }
}

/// Parse one `[a, b, c]` row.
fn parse_row(line: &str, line_no: usize) -> Result<Vec<f64>> {
    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ChristofidesError::Parse {
            line: line_no,
            message: format!("row must be enclosed in brackets: '{}'", line),
        })?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|field| {
            let field = field.trim();
            field.parse::<f64>().map_err(|_| ChristofidesError::Parse {
                line: line_no,
                message: format!("invalid number '{}'", field),
            })
        })
        .collect()
}

/// Write `matrix` in the instance text format.
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &[Vec<f64>]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", matrix.len())?;
    for row in matrix {
        let cells: Vec<String> = row.iter().map(|x| format!("{}", x)).collect();
        writeln!(writer, "[{}]", cells.join(", "))?;
    }
    writer.flush()?;
    Ok(())
}
