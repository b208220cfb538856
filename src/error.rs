/* scicalc-rs (c) 2026 Nathaniel Clark
 *
 * This source code is subject to the terms of the GPL v2. See LICENCE file.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Meval(#[from] meval::Error),
    #[error("result is not a number")]
    NotANumber,
    #[error("result is infinite")]
    Infinite,
}

#[derive(Debug, Error, PartialEq)]
pub enum MathError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("matrix is not square ({rows}x{cols})")]
    NotSquare { rows: usize, cols: usize },
    #[error("matrix is singular")]
    Singular,
    #[error("no data")]
    Empty,
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}
