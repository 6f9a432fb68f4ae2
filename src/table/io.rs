//! Delimited text persistence: one row per line, comma (or whitespace)
//! separated values. The weights file holds every weight, usually on a single line.
//!
//! Values are written with the shortest representation that parses back to
//! the same `f64`, so a save/load cycle is exact.

use crate::error::{Result, TableError};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> TableError + '_ {
    move |source| TableError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
}

fn parse_field(path: &Path, line: usize, field: &str) -> Result<f64> {
    let value = field.parse::<f64>().map_err(|e| TableError::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("invalid value {:?}: {}", field, e),
    })?;
    if !value.is_finite() {
        return Err(TableError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("non-finite value {:?}", field),
        });
    }
    Ok(value)
}

/// Reads a row-major matrix, inferring the dimension from the first row.
pub(crate) fn read_matrix(path: &Path) -> Result<(usize, Vec<f64>)> {
    let file = File::open(path).map_err(io_error(path))?;
    let reader = BufReader::new(file);

    let mut dim = 0;
    let mut data = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error(path))?;
        let line_no = i + 1;
        let before = data.len();
        for field in fields(&line) {
            data.push(parse_field(path, line_no, field)?);
        }
        let width = data.len() - before;
        if width == 0 {
            continue;
        }
        if dim == 0 {
            dim = width;
        } else if width != dim {
            return Err(TableError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                message: format!("expected {} values, found {}", dim, width),
            });
        }
    }

    if dim == 0 {
        return Err(TableError::EmptyDataset {
            path: path.to_path_buf(),
        });
    }
    Ok((dim, data))
}

/// Reads every value of a weights file in order.
pub(crate) fn read_weights(path: &Path) -> Result<Vec<f64>> {
    let file = File::open(path).map_err(io_error(path))?;
    let reader = BufReader::new(file);

    let mut weights = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error(path))?;
        for field in fields(&line) {
            weights.push(parse_field(path, i + 1, field)?);
        }
    }
    Ok(weights)
}

fn write_row<W: Write>(writer: &mut W, values: &[f64]) -> std::io::Result<()> {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        write!(writer, "{}", v)?;
    }
    writer.write_all(b"\n")
}

pub(crate) fn write_matrix(path: &Path, dim: usize, data: &[f64]) -> Result<()> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    for row in data.chunks_exact(dim) {
        write_row(&mut writer, row).map_err(io_error(path))?;
    }
    writer.flush().map_err(io_error(path))
}

pub(crate) fn write_weights(path: &Path, weights: &[f64]) -> Result<()> {
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);
    write_row(&mut writer, weights).map_err(io_error(path))?;
    writer.flush().map_err(io_error(path))
}
