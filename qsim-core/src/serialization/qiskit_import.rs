//! Qiskit source import
//!
//! Reads Qiskit Python back into a [`CircuitDocument`]: the scripts
//! [`QiskitExporter`](super::QiskitExporter) writes, and hand-written code of
//! the same shape. The source is tokenized, split into logical lines, and
//! each line is matched against the statements that carry circuit content:
//! - `QuantumCircuit(n)` or `QuantumRegister(n)`: the qubit count
//! - `initial_state = [...]` or `qc.initialize([...], ...)`: the initial state
//! - `qc.<gate>(q, ...)`: one gate entry per call, timed 1, 2, 3, ... in
//!   source order
//!
//! Every other line is ignored. Calls to gate methods outside the catalog
//! are skipped and reported through [`QiskitImporter::warnings`].
//!
//! # Example
//! ```
//! use qsim_core::serialization::QiskitImporter;
//!
//! let source = "
//! from qiskit import QuantumCircuit
//! qc = QuantumCircuit(2)
//! qc.h(0)
//! qc.cx(0, 1)  # entangle
//! ";
//!
//! let doc = QiskitImporter::new().parse(source)?;
//! assert_eq!(doc.num_qubits, 2);
//! assert_eq!(doc.gates[1].gate, "CNOT");
//! assert_eq!(doc.gates[1].qubits, vec![0, 1]);
//! # Ok::<(), qsim_core::QuantumError>(())
//! ```

use super::{CircuitDocument, GateEntry, MEASUREMENT_GATE};
use crate::{QuantumError, Result};
use logos::Logos;
use std::path::Path;

/// Variable the gate calls are made on
const CIRCUIT_VARIABLE: &str = "qc";

/// Circuit methods that carry no gate
const IGNORED_METHODS: &[&str] = &[
    "draw",
    "initialize",
    "save_statevector",
    "barrier",
    "transpile",
    "run",
    "result",
    "get_counts",
    "get_statevector",
];

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"\\\r?\n")]
enum Token {
    #[token("\n")]
    Newline,
    #[token(";")]
    Semi,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+", |lex| lex.slice().parse().ok())]
    Int(i64),

    #[regex(
        r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+",
        |lex| lex.slice().parse().ok()
    )]
    Float(f64),

    #[regex(
        r"([0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?|\.[0-9]+([eE][+-]?[0-9]+)?)[jJ]",
        |lex| {
            let s = lex.slice();
            s[..s.len() - 1].parse().ok()
        }
    )]
    Imaginary(f64),

    #[regex(r#""([^"\\\n]|\\.)*"|'([^'\\\n]|\\.)*'"#)]
    Str,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    /// Any other operator or punctuation
    #[regex(r"[*/:%@!<>&|^~?]")]
    Symbol,
}

/// One logical line of source
#[derive(Debug)]
struct Statement {
    /// 1-based line the statement starts on
    line: usize,
    tokens: Vec<Token>,
}

/// Tokenize and split at newlines and `;` outside brackets
fn split_statements(source: &str) -> Vec<Statement> {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    let mut lexer = Token::lexer(source);
    let mut statements = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut line = 1;
    let mut depth = 0usize;

    while let Some(token) = lexer.next() {
        // unlexable input only matters if it lands in a statement we read
        let token = token.unwrap_or(Token::Symbol);
        match token {
            Token::Newline | Token::Semi if depth == 0 => {
                if !current.is_empty() {
                    statements.push(Statement {
                        line,
                        tokens: std::mem::take(&mut current),
                    });
                }
                continue;
            }
            Token::Newline => continue,
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
            _ => {}
        }
        if current.is_empty() {
            line = line_starts.partition_point(|&start| start <= lexer.span().start);
        }
        current.push(token);
    }
    if !current.is_empty() {
        statements.push(Statement {
            line,
            tokens: current,
        });
    }
    statements
}

/// Reads Qiskit source into circuit documents
#[derive(Debug, Clone, Default)]
pub struct QiskitImporter {
    warnings: Vec<String>,
}

impl QiskitImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skipped calls from the last parse, one message per call
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Parse Qiskit source
    ///
    /// The document is not checked against its own qubit count; use
    /// [`import`](Self::import) or [`CircuitDocument::validate`] for that.
    ///
    /// # Errors
    /// `Serialization` when no qubit count can be found, when a state list
    /// holds something other than numeric literals, or when a gate names a
    /// negative qubit.
    pub fn parse(&mut self, source: &str) -> Result<CircuitDocument> {
        self.warnings.clear();
        let statements = split_statements(source);

        let num_qubits = statements
            .iter()
            .find_map(|s| qubit_count(&s.tokens))
            .ok_or_else(|| {
                QuantumError::Serialization(
                    "could not determine the number of qubits from QuantumCircuit initialization"
                        .to_string(),
                )
            })?;

        let mut document = CircuitDocument::new(num_qubits);
        let mut time = 1;

        for statement in &statements {
            let at_line =
                |msg: String| QuantumError::Serialization(format!("line {}: {}", statement.line, msg));

            if document.initial_state.is_none() {
                if let Some(list) = initial_state_list(&statement.tokens) {
                    document.initial_state = Some(parse_state(list).map_err(at_line)?);
                    continue;
                }
            }

            let Some((method, args)) = circuit_call(&statement.tokens) else {
                continue;
            };
            if IGNORED_METHODS.contains(&method) {
                continue;
            }
            let Some(gate) = gate_for_method(method) else {
                self.warnings.push(format!(
                    "line {}: unsupported gate method: {}",
                    statement.line, method
                ));
                continue;
            };

            let mut qubits = qubit_args(args).map_err(at_line)?;
            if qubits.is_empty() {
                self.warnings
                    .push(format!("line {}: no qubits found for gate {}", statement.line, gate));
                continue;
            }
            if gate == MEASUREMENT_GATE {
                // measure(qubit, clbit): the classical bit is implied
                qubits.truncate(1);
            }

            document.gates.push(GateEntry::new(gate, qubits, time));
            time += 1;
        }

        Ok(document)
    }

    /// Parse a Qiskit source file
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<CircuitDocument> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            QuantumError::Serialization(format!("cannot read {}: {}", path.display(), e))
        })?;
        self.parse(&source)
    }

    /// Parse a Qiskit source file and validate the result
    pub fn import(&mut self, path: impl AsRef<Path>) -> Result<CircuitDocument> {
        let document = self.parse_file(path)?;
        document.validate()?;
        Ok(document)
    }
}

fn gate_for_method(method: &str) -> Option<&'static str> {
    let gate = match method {
        "h" => "H",
        "x" => "X",
        "y" => "Y",
        "z" => "Z",
        "id" | "i" => "I",
        "s" => "S",
        "t" => "T",
        "cx" => "CNOT",
        "cz" => "CZ",
        "swap" => "SWAP",
        "ccx" => "CCNOT",
        "measure" => MEASUREMENT_GATE,
        _ => return None,
    };
    Some(gate)
}

/// First integer argument of a `QuantumCircuit(..)` or `QuantumRegister(..)` call
fn qubit_count(tokens: &[Token]) -> Option<usize> {
    tokens.windows(3).find_map(|w| match w {
        [Token::Ident(name), Token::LParen, Token::Int(n)]
            if name == "QuantumCircuit" || name == "QuantumRegister" =>
        {
            usize::try_from(*n).ok()
        }
        _ => None,
    })
}

/// Tokens from the opening bracket of a literal initial state
fn initial_state_list(tokens: &[Token]) -> Option<&[Token]> {
    let list = match tokens {
        [Token::Ident(name), Token::Eq, rest @ ..] if name == "initial_state" => rest,
        [Token::Ident(var), Token::Dot, Token::Ident(method), Token::LParen, rest @ ..]
            if var == CIRCUIT_VARIABLE && method == "initialize" =>
        {
            rest
        }
        _ => return None,
    };
    (list.first() == Some(&Token::LBracket)).then_some(list)
}

/// Method name and argument tokens of a whole-line `qc.<method>(...)` call
fn circuit_call(tokens: &[Token]) -> Option<(&str, &[Token])> {
    match tokens {
        [Token::Ident(var), Token::Dot, Token::Ident(method), Token::LParen, args @ .., Token::RParen]
            if var == CIRCUIT_VARIABLE && is_balanced(args) =>
        {
            Some((method.as_str(), args))
        }
        _ => None,
    }
}

fn is_balanced(tokens: &[Token]) -> bool {
    let mut depth = 0i32;
    for token in tokens {
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn split_arguments(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < tokens.len() {
        parts.push(&tokens[start..]);
    }
    parts
}

/// Qubit indices among the call arguments: `3`, `-1` or `q[3]`
///
/// Keyword and other non-literal arguments are skipped.
fn qubit_args(args: &[Token]) -> std::result::Result<Vec<usize>, String> {
    let mut qubits = Vec::new();
    for arg in split_arguments(args) {
        let index = match arg {
            [Token::Int(q)] => *q,
            [Token::Minus, Token::Int(q)] => -*q,
            [Token::Ident(_), Token::LBracket, Token::Int(q), Token::RBracket] => *q,
            _ => continue,
        };
        let qubit = usize::try_from(index).map_err(|_| format!("negative qubit index {}", index))?;
        qubits.push(qubit);
    }
    Ok(qubits)
}

struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> std::result::Result<(), String> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {:?}, found {:?}", expected, token)),
            None => Err(format!("expected {:?}, found end of line", expected)),
        }
    }
}

/// `[a, b+cj, ...]` as `[re, im]` pairs
fn parse_state(tokens: &[Token]) -> std::result::Result<Vec<[f64; 2]>, String> {
    let mut cursor = Cursor::new(tokens);
    cursor.expect(&Token::LBracket)?;

    let mut state = Vec::new();
    while !cursor.eat(&Token::RBracket) {
        state.push(parse_amplitude(&mut cursor)?);
        if !cursor.eat(&Token::Comma) {
            cursor.expect(&Token::RBracket)?;
            break;
        }
    }
    Ok(state)
}

/// Signed sum of real and imaginary literals, e.g. `-0.5+0.5j` or `(1j)`
fn parse_amplitude(cursor: &mut Cursor<'_>) -> std::result::Result<[f64; 2], String> {
    let (mut re, mut im) = (0.0f64, 0.0f64);
    let mut first = true;
    loop {
        let mut sign = if cursor.eat(&Token::Minus) {
            -1.0
        } else if cursor.eat(&Token::Plus) || first {
            1.0
        } else {
            break;
        };
        // `0.0+-0.0j`
        loop {
            if cursor.eat(&Token::Minus) {
                sign = -sign;
            } else if !cursor.eat(&Token::Plus) {
                break;
            }
        }
        match cursor.next() {
            Some(Token::Int(v)) => re += sign * *v as f64,
            Some(Token::Float(v)) => re += sign * v,
            Some(Token::Imaginary(v)) => im += sign * v,
            Some(Token::LParen) => {
                let [r, i] = parse_amplitude(cursor)?;
                cursor.expect(&Token::RParen)?;
                re += sign * r;
                im += sign * i;
            }
            Some(token) => return Err(format!("unsupported amplitude term {:?}", token)),
            None => return Err("unterminated state list".to_string()),
        }
        first = false;
    }
    Ok([re, im])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        split_statements(source)
            .into_iter()
            .flat_map(|s| s.tokens)
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("7 0.5 1e-3 .25 2.5j 1J"),
            vec![
                Token::Int(7),
                Token::Float(0.5),
                Token::Float(1e-3),
                Token::Float(0.25),
                Token::Imaginary(2.5),
                Token::Imaginary(1.0),
            ]
        );
    }

    #[test]
    fn test_statements_ignore_comments_and_bracketed_newlines() {
        let source = "a = [1,\n  2]  # trailing\n\n# whole line\nqc.h(0); qc.x(1)\n";
        let statements = split_statements(source);
        let lines: Vec<usize> = statements.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 5, 5]);
        assert_eq!(statements[0].tokens.len(), 7);
    }

    #[test]
    fn test_amplitude_forms() {
        let state = parse_state(&lex("[1.0+0.0j, 0.0-0.5j, -0.6, 2j, (0.1-0.2j), -1e-3-1e-3j, 1]"))
            .unwrap();
        assert_eq!(
            state,
            vec![
                [1.0, 0.0],
                [0.0, -0.5],
                [-0.6, 0.0],
                [0.0, 2.0],
                [0.1, -0.2],
                [-1e-3, -1e-3],
                [1.0, 0.0],
            ]
        );
        assert_eq!(parse_state(&lex("[]")).unwrap(), Vec::<[f64; 2]>::new());
        assert!(parse_state(&lex("[1/sqrt(2), 0]")).is_err());
        assert!(parse_state(&lex("[1, 0")).is_err());
    }

    #[test]
    fn test_qubit_arguments() {
        assert_eq!(qubit_args(&lex("0, 2")).unwrap(), vec![0, 2]);
        assert_eq!(qubit_args(&lex("qr[1], cr[1]")).unwrap(), vec![1, 1]);
        assert_eq!(qubit_args(&lex("1, label='a'")).unwrap(), vec![1]);
        assert!(qubit_args(&lex("-1")).unwrap_err().contains("negative"));
    }

    #[test]
    fn test_circuit_call_shape() {
        let tokens = lex("qc.cx(0, 1)");
        let (method, args) = circuit_call(&tokens).unwrap();
        assert_eq!(method, "cx");
        assert_eq!(args.len(), 3);

        assert!(circuit_call(&lex("other.h(0)")).is_none());
        assert!(circuit_call(&lex("qc.h(0).c_if(cr, 1)")).is_none());
    }
}
