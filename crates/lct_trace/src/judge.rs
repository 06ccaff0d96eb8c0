//! Batch verification driver for the `dynamic_tree_vertex_add_path_sum`
//! judge format.
//!
//! Input layout: `N Q` on the first line, `N` initial vertex values on
//! the second, `N-1` edge lines `u v` consumed as `link(u, v)`, then `Q`
//! query lines:
//!
//! - `0 u v w x`: replace edge `u-v` with edge `w-x`
//!   (`evert(v); cut(u); link(w, x)`)
//! - `1 p x`: add `x` to the value at `p`
//! - `2 u v`: print the sum over the u-v path
//!
//! The driver drains and discards every event stream; format errors are
//! fatal to the run.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;

use thiserror::Error;

use crate::forest::{CutError, LinkCutForest};

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {expected}")]
    Malformed { line: usize, expected: &'static str },
    #[error("line {line}: invalid integer: {source}")]
    BadInt {
        line: usize,
        source: ParseIntError,
    },
    #[error("line {line}: unknown query kind {kind}")]
    UnknownQuery { line: usize, kind: i64 },
    #[error("line {line}: {source}")]
    Cut { line: usize, source: CutError },
    #[error("input ended early: expected {expected} at line {line}")]
    Truncated { line: usize, expected: &'static str },
}

struct Lines<R> {
    input: R,
    buf: String,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(input: R) -> Self {
        Self {
            input,
            buf: String::new(),
            line: 0,
        }
    }

    fn next_ints(&mut self, expected: &'static str) -> Result<Vec<i64>, JudgeError> {
        match self.try_next_ints()? {
            Some(ints) => Ok(ints),
            None => Err(JudgeError::Truncated {
                line: self.line,
                expected,
            }),
        }
    }

    /// Like `next_ints`, but yields `None` at end of input.
    fn try_next_ints(&mut self) -> Result<Option<Vec<i64>>, JudgeError> {
        self.buf.clear();
        self.line += 1;
        let read = self.input.read_line(&mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.buf
            .split_whitespace()
            .map(|tok| {
                tok.parse::<i64>().map_err(|source| JudgeError::BadInt {
                    line: self.line,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn next_fixed<const K: usize>(
        &mut self,
        expected: &'static str,
    ) -> Result<[i64; K], JudgeError> {
        let ints = self.next_ints(expected)?;
        ints.try_into().map_err(|_| JudgeError::Malformed {
            line: self.line,
            expected,
        })
    }
}

fn vertex(x: i64, line: usize, n: usize) -> Result<usize, JudgeError> {
    if x < 0 || x as usize >= n {
        return Err(JudgeError::Malformed {
            line,
            expected: "vertex id in range",
        });
    }
    Ok(x as usize)
}

/// Run one judge input to completion; returns one sum per type-2 query.
pub fn run<R: BufRead>(input: R) -> Result<Vec<i64>, JudgeError> {
    let mut lines = Lines::new(input);

    let [n, q] = lines.next_fixed::<2>("N Q header")?;
    if n < 0 || q < 0 {
        return Err(JudgeError::Malformed {
            line: lines.line,
            expected: "non-negative N and Q",
        });
    }
    let n = n as usize;

    let values = lines.next_ints("N initial values")?;
    if values.len() != n {
        return Err(JudgeError::Malformed {
            line: lines.line,
            expected: "N initial values",
        });
    }
    let mut forest = LinkCutForest::new(&[]);
    for &value in &values {
        let _ = forest.append_node(value);
    }

    for _ in 1..n {
        let [u, v] = lines.next_fixed::<2>("edge line `u v`")?;
        let u = vertex(u, lines.line, n)?;
        let v = vertex(v, lines.line, n)?;
        let _ = forest.link(u, v);
    }

    let mut results = Vec::new();
    for _ in 0..q {
        let query = lines.next_ints("query line")?;
        let line = lines.line;
        match query.as_slice() {
            [0, u, v, w, x] => {
                let u = vertex(*u, line, n)?;
                let v = vertex(*v, line, n)?;
                let w = vertex(*w, line, n)?;
                let x = vertex(*x, line, n)?;
                let _ = forest.evert(v);
                forest
                    .cut(u)
                    .map_err(|source| JudgeError::Cut { line, source })?;
                let _ = forest.link(w, x);
            }
            [1, p, x] => {
                let p = vertex(*p, line, n)?;
                let _ = forest.vertex_add(p, *x);
            }
            [2, u, v] => {
                let u = vertex(*u, line, n)?;
                let v = vertex(*v, line, n)?;
                let _ = forest.evert(u);
                let _ = forest.expose(v);
                results.push(forest.path_sum(v));
            }
            [0..=2, ..] | [] => {
                return Err(JudgeError::Malformed {
                    line,
                    expected: "query of kind 0, 1 or 2",
                });
            }
            [kind, ..] => {
                return Err(JudgeError::UnknownQuery { line, kind: *kind });
            }
        }
    }
    Ok(results)
}

/// Run the judge input stored at `path`.
pub fn run_file<P: AsRef<Path>>(path: P) -> Result<Vec<i64>, JudgeError> {
    run(BufReader::new(File::open(path)?))
}

/// Run `input` and compare the produced sums against the decimal
/// integers in `expected`, line by line. Every expected answer must be
/// matched by a produced one; an expected line with no produced result
/// left is a mismatch.
pub fn verify_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    expected: Q,
) -> Result<bool, JudgeError> {
    let results = run_file(input)?;
    let mut lines = Lines::new(BufReader::new(File::open(expected)?));
    let mut produced = results.iter();
    while let Some(ints) = lines.try_next_ints()? {
        if ints.is_empty() {
            continue;
        }
        let want: [i64; 1] = ints.try_into().map_err(|_| JudgeError::Malformed {
            line: lines.line,
            expected: "one answer per line",
        })?;
        match produced.next() {
            Some(&got) if got == want[0] => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}
