use {
    super::SolverError,
    std::{
        collections::VecDeque,
        fmt,
        fs::File,
        io::{BufRead, BufReader},
        path::Path,
    },
};

/// CNF locator
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CNFIndicator {
    /// not specified
    #[default]
    Void,
    /// from a file
    File(String),
    /// embedded directly
    LitVec(usize),
}

impl fmt::Display for CNFIndicator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CNFIndicator::Void => write!(f, "No CNF specified"),
            CNFIndicator::File(file) => write!(f, "CNF file({file})"),
            CNFIndicator::LitVec(n) => write!(f, "A vec({n} clauses)"),
        }
    }
}

/// Data storage about a problem.
#[derive(Clone, Debug, Default)]
pub struct CNFDescription {
    pub num_of_variables: usize,
    pub num_of_clauses: usize,
    pub pathname: CNFIndicator,
}

impl fmt::Display for CNFDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let CNFDescription {
            num_of_variables: nv,
            num_of_clauses: nc,
            pathname: path,
        } = &self;
        write!(f, "CNF({nv}, {nc}, {path})")
    }
}

impl<V: AsRef<[i32]>> From<&[V]> for CNFDescription {
    fn from(vec: &[V]) -> Self {
        let num_of_variables = vec
            .iter()
            .map(|clause| {
                clause
                    .as_ref()
                    .iter()
                    .map(|l| l.unsigned_abs())
                    .max()
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0) as usize;
        CNFDescription {
            num_of_variables,
            num_of_clauses: vec.len(),
            pathname: CNFIndicator::LitVec(vec.len()),
        }
    }
}

/// A DIMACS reader: the header is consumed by construction,
/// clauses are pulled one by one with [`CNFReader::next_clause`].
#[derive(Debug)]
pub struct CNFReader<R: BufRead> {
    pub cnf: CNFDescription,
    reader: R,
    line: usize,
    pending: Vec<i32>,
    queue: VecDeque<i32>,
    done: bool,
}

impl TryFrom<&Path> for CNFReader<BufReader<File>> {
    type Error = SolverError;
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let pathname = path
            .file_name()
            .map_or("--".to_string(), |f| f.to_string_lossy().into_owned());
        let fs = File::open(path)?;
        let mut reader = CNFReader::new(BufReader::new(fs))?;
        reader.cnf.pathname = CNFIndicator::File(pathname);
        Ok(reader)
    }
}

impl<R: BufRead> CNFReader<R> {
    /// read lines up to and including the `p cnf` header.
    pub fn new(mut reader: R) -> Result<Self, SolverError> {
        let mut buf = String::new();
        let mut line = 0;
        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                return Err(SolverError::Parse {
                    line,
                    reason: "no `p cnf` header".to_string(),
                });
            }
            line += 1;
            let mut iter = buf.split_whitespace();
            match iter.next() {
                Some("c") | None => continue,
                Some("p") if iter.next() == Some("cnf") => {
                    let mut num = || -> Option<usize> { iter.next()?.parse::<usize>().ok() };
                    match (num(), num()) {
                        (Some(nv), Some(nc)) => {
                            return Ok(CNFReader {
                                cnf: CNFDescription {
                                    num_of_variables: nv,
                                    num_of_clauses: nc,
                                    pathname: CNFIndicator::Void,
                                },
                                reader,
                                line,
                                pending: Vec::new(),
                                queue: VecDeque::new(),
                                done: false,
                            });
                        }
                        _ => {
                            return Err(SolverError::Parse {
                                line,
                                reason: "broken header".to_string(),
                            })
                        }
                    }
                }
                Some(_) => {
                    return Err(SolverError::Parse {
                        line,
                        reason: "clause before header".to_string(),
                    })
                }
            }
        }
    }
    /// return the next clause as DIMACS integers, or `None` at the end.
    /// A clause may span lines; a trailing clause without `0` is accepted.
    pub fn next_clause(&mut self) -> Result<Option<Vec<i32>>, SolverError> {
        let mut buf = String::new();
        loop {
            while let Some(x) = self.queue.pop_front() {
                if x == 0 {
                    return Ok(Some(std::mem::take(&mut self.pending)));
                }
                self.pending.push(x);
            }
            buf.clear();
            if self.done || self.reader.read_line(&mut buf)? == 0 {
                self.done = true;
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(std::mem::take(&mut self.pending)));
            }
            self.line += 1;
            let trimmed = buf.trim_start();
            if trimmed.starts_with('c') {
                continue;
            }
            // SATLIB-style trailer
            if trimmed.starts_with('%') {
                self.done = true;
                continue;
            }
            for token in trimmed.split_whitespace() {
                let x = token.parse::<i32>().map_err(|_| SolverError::Parse {
                    line: self.line,
                    reason: format!("not a literal: {token}"),
                })?;
                if self.cnf.num_of_variables < x.unsigned_abs() as usize {
                    return Err(SolverError::InvalidLiteral(x));
                }
                self.queue.push_back(x);
            }
        }
    }
}
