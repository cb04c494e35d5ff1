//! Parsing of the delimited coordinate text stored on each shape.
//!
//! Shapes keep their X and Y coordinates as comma-separated text (e.g. `"0,10,10,0"`).
//! Every character other than an ASCII digit or a comma is discarded before the text is
//! split, so `"[1, 2, 3]"` and `"1,2,3"` are the same sequence. A minus sign is discarded
//! along with everything else, which means `"-5"` parses as `5`.

use itertools::Itertools;

use crate::{error::ShapeError, geometry::r2::R2};

/// Keep only ASCII digits and commas.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit() || *c == ',').collect()
}

/// Parse coordinate text into an integer sequence.
///
/// Trailing commas are ignored (`"1,2,"` is `[1, 2]`). Fails on text with no coordinates
/// (`""`, `","`), on a leading or inner empty token (`",1"`, `"1,,3"`), and on a token
/// that overflows `i32`.
pub fn parse_coords(text: &str) -> Result<Vec<i32>, ShapeError> {
    let normalized = normalize(text);
    let trimmed = normalized.trim_end_matches(',');
    if trimmed.is_empty() {
        return Err(ShapeError::CoordinateFormat(format!("no coordinates in {:?}", text)));
    }
    trimmed
        .split(',')
        .map(|token| {
            token.parse::<i32>().map_err(|e| {
                ShapeError::CoordinateFormat(format!("{:?} in {:?}: {}", token, text, e))
            })
        })
        .collect()
}

/// Parse a shape's X and Y text into its vertex sequence; vertex `i` is `(xs[i], ys[i])`.
pub fn parse_vertices(xs: &str, ys: &str) -> Result<Vec<R2<i32>>, ShapeError> {
    let xs = parse_coords(xs)?;
    let ys = parse_coords(ys)?;
    if xs.len() != ys.len() {
        return Err(ShapeError::CoordinateFormat(format!(
            "{} X coordinates but {} Y coordinates",
            xs.len(),
            ys.len(),
        )));
    }
    Ok(xs.into_iter().zip_eq(ys).map(R2::from).collect())
}

/// Inverse of [`parse_coords`] for a single axis.
pub fn format_coords(values: &[i32]) -> String {
    values.iter().join(",")
}
