/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

//! Text commands for the matrix, vector and statistics tools.
//!
//! A command line starts with `:`, names the tool, then its operands.
//! Matrix rows are separated by `;` and two operands by `|`:
//!
//! ```text
//! :det 1,2;3,4
//! :mmul 1,2;3,4 | 5;6
//! :cross 1,0,0 | 0,1,0
//! :stats 2 4 4 4 5 5 7 9
//! ```

use crate::{
    error::MathError,
    format::{format_number, parse_number},
    linalg::{self, Matrix},
    session::AngleUnit,
    stats,
};
use itertools::Itertools;

pub const PREFIX: char = ':';

pub fn is_command(line: &str) -> bool {
    line.trim_start().starts_with(PREFIX)
}

fn parse_values(text: &str) -> Result<Vec<f64>, MathError> {
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| parse_number(s).ok_or_else(|| MathError::InvalidNumber(s.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        Err(MathError::Empty)
    } else {
        Ok(values)
    }
}

fn parse_matrix(text: &str) -> Result<Matrix<f64>, MathError> {
    let rows = text
        .split(';')
        .filter(|r| !r.trim().is_empty())
        .map(parse_values)
        .collect::<Result<Vec<_>, _>>()?;
    Matrix::from_rows(rows)
}

fn pair(args: &str) -> Result<(&str, &str), MathError> {
    args.split_once('|')
        .ok_or_else(|| MathError::DimensionMismatch("expected two operands separated by |".into()))
}

struct Formatter {
    precision: usize,
}

impl Formatter {
    fn number(&self, value: f64) -> String {
        format_number(value, self.precision)
    }

    fn vector(&self, values: &[f64]) -> String {
        format!("[{}]", values.iter().map(|v| self.number(*v)).join(", "))
    }

    fn matrix(&self, m: &Matrix<f64>) -> String {
        (0..m.rows()).map(|r| self.vector(m.row(r))).join("\n")
    }

    fn summary(&self, s: &stats::Summary<f64>) -> String {
        let mode = s.mode.iter().map(|v| self.number(*v)).join(", ");
        [
            ("n", s.count.to_string()),
            ("sum", self.number(s.sum)),
            ("mean", self.number(s.mean)),
            ("median", self.number(s.median)),
            ("mode", mode),
            ("s", self.number(s.std_dev)),
            ("s²", self.number(s.variance)),
            ("min", self.number(s.min)),
            ("max", self.number(s.max)),
            ("range", self.number(s.range)),
        ]
        .iter()
        .map(|(k, v)| format!("{k:>6}: {v}"))
        .join("\n")
    }
}

/// Run a `:` command and return its printable result.
pub fn run(line: &str, angle: AngleUnit, precision: usize) -> Result<String, MathError> {
    let line = line.trim().trim_start_matches(PREFIX);
    let (cmd, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let cmd = cmd.to_ascii_lowercase();
    let fmt = Formatter { precision };
    log::debug!("tool {cmd} {args:?}");

    let out = match cmd.as_str() {
        // matrices
        "det" => fmt.number(parse_matrix(args)?.determinant()?),
        "inv" => fmt.matrix(&parse_matrix(args)?.inverse()?),
        "tr" | "transpose" => fmt.matrix(&parse_matrix(args)?.transpose()),
        "madd" | "msub" | "mmul" => {
            let (a, b) = pair(args)?;
            let (a, b) = (parse_matrix(a)?, parse_matrix(b)?);
            let m = match cmd.as_str() {
                "madd" => a.add(&b)?,
                "msub" => a.sub(&b)?,
                _ => a.mul(&b)?,
            };
            fmt.matrix(&m)
        }

        // vectors
        "vadd" | "vsub" | "dot" | "cross" | "angle" => {
            let (a, b) = pair(args)?;
            let (a, b) = (parse_values(a)?, parse_values(b)?);
            match cmd.as_str() {
                "vadd" => fmt.vector(&linalg::vector_add(&a, &b)?),
                "vsub" => fmt.vector(&linalg::vector_sub(&a, &b)?),
                "dot" => fmt.number(linalg::dot(&a, &b)?),
                "cross" => fmt.vector(&linalg::cross(&a, &b)?),
                _ => fmt.number(linalg::angle(&a, &b)? / angle.to_radians()),
            }
        }
        "norm" => fmt.number(linalg::norm(&parse_values(args)?)),

        // statistics
        "stats" => fmt.summary(&stats::summarize(&parse_values(args)?)?),
        "count" => parse_values(args)?.len().to_string(),
        "sum" => fmt.number(stats::sum(&parse_values(args)?)),
        "mean" => fmt.number(stats::mean(&parse_values(args)?)?),
        "median" => fmt.number(stats::median(&parse_values(args)?)?),
        "sd" => fmt.number(stats::std_dev(&parse_values(args)?)?),
        "var" => fmt.number(stats::variance(&parse_values(args)?)?),
        "min" => fmt.number(stats::min(&parse_values(args)?)?),
        "max" => fmt.number(stats::max(&parse_values(args)?)?),
        _ => return Err(MathError::UnknownCommand(cmd)),
    };
    Ok(out)
}

pub fn help_text() -> &'static str {
    "\
Matrices (rows split by ;)   :det M  :inv M  :tr M  :madd A | B  :msub A | B  :mmul A | B
Vectors                      :vadd a | b  :vsub a | b  :dot a | b  :cross a | b  :angle a | b  :norm v
Statistics                   :stats xs  :count  :sum  :mean  :median  :sd  :var  :min  :max"
}
