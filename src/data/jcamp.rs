use std::fmt::Write as _;

use log::{debug, warn};

use super::model::RawSpectrum;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a payload cannot be decoded as a JCAMP-DX spectrum.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("not a JCAMP-DX document (no ##LABEL= records)")]
    NotJcamp,

    #[error("missing data section (no ##XYDATA=, ##XYPOINTS= or ##PEAK TABLE= values)")]
    MissingData,

    #[error("unsupported data table form '{0}'")]
    UnsupportedTable(String),

    #[error("line {line}: cannot parse '{token}' as a number")]
    InvalidNumber { line: usize, token: String },

    #[error("invalid ##{label}= value '{value}'")]
    InvalidHeader { label: String, value: String },

    #[error("cannot determine the X spacing of the (X++(Y..Y)) table")]
    UnknownSpacing,

    #[error("odd number of values in an (XY..XY) table")]
    UnpairedValue,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode one JCAMP-DX payload into wavenumber/intensity samples.
///
/// Bytes are read as ISO-8859-1, so any byte sequence is accepted at the
/// text level. `XFACTOR` and `YFACTOR` (1.0 when absent) are multiplied into
/// every returned sample.
pub fn decode(bytes: &[u8]) -> Result<RawSpectrum, DecodeError> {
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let mut header = Header::default();
    let mut seen_label = false;
    let mut table: Option<Table> = None;
    let mut in_table = false;

    for (line_no, raw_line) in split_lines(&text) {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(record) = line.strip_prefix("##") {
            seen_label = true;
            in_table = false;
            let (label, value) = match record.split_once('=') {
                Some((l, v)) => (normalize_label(l), v.trim()),
                None => (normalize_label(record), ""),
            };

            match label.as_str() {
                "END" if table.is_some() => break,
                "XFACTOR" => header.xfactor = Some(parse_factor("XFACTOR", value)?),
                "YFACTOR" => header.yfactor = Some(parse_factor("YFACTOR", value)?),
                "FIRSTX" => header.firstx = value.parse().ok(),
                "LASTX" => header.lastx = value.parse().ok(),
                "DELTAX" => header.deltax = value.parse().ok(),
                "NPOINTS" => header.npoints = value.parse::<f64>().ok().map(|n| n as usize),
                "XYDATA" | "XYPOINTS" | "PEAKTABLE" if table.is_none() => {
                    let form: String = value.chars().filter(|c| !c.is_whitespace()).collect();
                    let kind = match form.to_ascii_uppercase().as_str() {
                        "(X++(Y..Y))" if label == "XYDATA" => TableKind::Increments,
                        "(XY..XY)" => TableKind::Pairs,
                        _ => return Err(DecodeError::UnsupportedTable(value.to_string())),
                    };
                    debug!("##{label}={form} table starts on line {line_no}");
                    table = Some(Table {
                        kind,
                        lines: Vec::new(),
                    });
                    in_table = true;
                }
                _ => {}
            }
            continue;
        }

        if in_table {
            if let Some(t) = table.as_mut() {
                t.lines.push((line_no, line.to_string()));
            }
        }
    }

    if !seen_label {
        return Err(DecodeError::NotJcamp);
    }
    let table = table.ok_or(DecodeError::MissingData)?;

    let xfactor = header.xfactor.unwrap_or(1.0);
    let yfactor = header.yfactor.unwrap_or(1.0);

    let (x, y) = match table.kind {
        TableKind::Increments => decode_increments(&table.lines, &header, xfactor, yfactor)?,
        TableKind::Pairs => decode_pairs(&table.lines, xfactor, yfactor)?,
    };

    if x.is_empty() {
        return Err(DecodeError::MissingData);
    }
    if let Some(n) = header.npoints {
        if n != x.len() {
            warn!("##NPOINTS={n} but {} samples were decoded", x.len());
        }
    }

    Ok(RawSpectrum {
        x,
        y,
        xfactor,
        yfactor,
    })
}

// ---------------------------------------------------------------------------
// Header bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Header {
    xfactor: Option<f64>,
    yfactor: Option<f64>,
    firstx: Option<f64>,
    lastx: Option<f64>,
    deltax: Option<f64>,
    npoints: Option<usize>,
}

impl Header {
    /// Abscissa step in real (already scaled) units, when the header pins it.
    fn declared_step(&self) -> Option<f64> {
        match (self.firstx, self.lastx, self.npoints) {
            (Some(first), Some(last), Some(n)) if n > 1 => Some((last - first) / (n - 1) as f64),
            _ => self.deltax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TableKind {
    /// `(X++(Y..Y))`: abscissa then a run of equally spaced ordinates.
    Increments,
    /// `(XY..XY)`: explicit pairs.
    Pairs,
}

#[derive(Debug)]
struct Table {
    kind: TableKind,
    lines: Vec<(usize, String)>,
}

/// Numbered lines, ending in `\n`, `\r\n` or a bare `\r`.
fn split_lines(text: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    for chunk in text.split('\n') {
        let chunk = chunk.strip_suffix('\r').unwrap_or(chunk);
        for piece in chunk.split('\r') {
            lines.push((lines.len() + 1, piece));
        }
    }
    lines
}

/// JCAMP labels ignore case, blanks, dashes, slashes and underscores.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '-' | '/' | '_'))
        .collect::<String>()
        .to_ascii_uppercase()
}

fn strip_comment(line: &str) -> &str {
    match line.find("$$") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_factor(label: &str, value: &str) -> Result<f64, DecodeError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => Ok(v),
        _ => Err(DecodeError::InvalidHeader {
            label: label.to_string(),
            value: value.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// (X++(Y..Y)) tables
// ---------------------------------------------------------------------------

struct DataLine {
    x: f64,
    ys: Vec<f64>,
    ends_in_dif: bool,
}

fn decode_increments(
    lines: &[(usize, String)],
    header: &Header,
    xfactor: f64,
    yfactor: f64,
) -> Result<(Vec<f64>, Vec<f64>), DecodeError> {
    let mut rows = Vec::with_capacity(lines.len());
    for (line_no, line) in lines {
        let decoded = decode_line(line, *line_no)?;
        let mut values = decoded.values.into_iter();
        let Some(x) = values.next() else { continue };
        rows.push(DataLine {
            x,
            ys: values.collect(),
            ends_in_dif: decoded.ends_in_dif,
        });
    }

    // A DIF line closes with a Y-check that repeats the next line's first ordinate.
    let n_rows = rows.len();
    for row in rows.iter_mut().take(n_rows.saturating_sub(1)) {
        if row.ends_in_dif {
            row.ys.pop();
        }
    }

    let step = match header.declared_step() {
        Some(step) => Some(step),
        None => infer_step(&rows, xfactor),
    };

    let total: usize = rows.iter().map(|r| r.ys.len()).sum();
    let mut x = Vec::with_capacity(total);
    let mut y = Vec::with_capacity(total);
    for row in &rows {
        let start = row.x * xfactor;
        for (k, &raw) in row.ys.iter().enumerate() {
            let offset = if k == 0 {
                0.0
            } else {
                step.ok_or(DecodeError::UnknownSpacing)? * k as f64
            };
            x.push(start + offset);
            y.push(raw * yfactor);
        }
    }
    Ok((x, y))
}

/// Step between ordinates guessed from consecutive line abscissas.
fn infer_step(rows: &[DataLine], xfactor: f64) -> Option<f64> {
    rows.windows(2).find_map(|pair| {
        let count = pair[0].ys.len();
        (count > 0).then(|| (pair[1].x - pair[0].x) * xfactor / count as f64)
    })
}

// ---------------------------------------------------------------------------
// (XY..XY) tables
// ---------------------------------------------------------------------------

fn decode_pairs(
    lines: &[(usize, String)],
    xfactor: f64,
    yfactor: f64,
) -> Result<(Vec<f64>, Vec<f64>), DecodeError> {
    let mut values = Vec::new();
    for (line_no, line) in lines {
        for token in line
            .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
            .filter(|t| !t.is_empty())
        {
            values.push(parse_affn(token, *line_no)?);
        }
    }
    if values.len() % 2 != 0 {
        return Err(DecodeError::UnpairedValue);
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| (pair[0] * xfactor, pair[1] * yfactor))
        .unzip())
}

// ---------------------------------------------------------------------------
// Line tokenizer: AFFN, PAC and ASDF (SQZ / DIF / DUP)
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct LineValues {
    values: Vec<f64>,
    ends_in_dif: bool,
}

/// Plain decimals first; a line that does not parse as such is retried as
/// ASDF, where `E`/`e` are SQZ digits rather than exponents.
fn decode_line(line: &str, line_no: usize) -> Result<LineValues, DecodeError> {
    if is_compressed(line) {
        return decode_asdf(line, line_no);
    }
    decode_affn_line(line, line_no).or_else(|affn_err| {
        decode_asdf(line, line_no).map_err(|_| affn_err)
    })
}

/// Pseudo-digits that can never appear in a decimal number.
fn is_compressed(line: &str) -> bool {
    line.chars().any(|c| {
        matches!(c, '@' | '%' | 'A'..='D' | 'F'..='Z' | 'a'..='d' | 'f'..='s')
    })
}

fn parse_affn(token: &str, line_no: usize) -> Result<f64, DecodeError> {
    if token == "?" {
        return Ok(f64::NAN);
    }
    token.parse::<f64>().map_err(|_| DecodeError::InvalidNumber {
        line: line_no,
        token: token.to_string(),
    })
}

/// Free-format decimals, also accepting packed signs (`100+20-3`).
fn decode_affn_line(line: &str, line_no: usize) -> Result<LineValues, DecodeError> {
    let mut values = Vec::new();
    for field in line
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
    {
        let mut start = 0;
        let mut prev: Option<char> = None;
        for (i, c) in field.char_indices() {
            let splits = (c == '+' || c == '-')
                && i > 0
                && !matches!(prev, Some('e') | Some('E'));
            if splits {
                values.push(parse_affn(&field[start..i], line_no)?);
                start = i;
            }
            prev = Some(c);
        }
        values.push(parse_affn(&field[start..], line_no)?);
    }
    Ok(LineValues {
        values,
        ends_in_dif: false,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TokenKind {
    Absolute,
    Difference,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Value(f64),
    Dif(f64),
    Dup(usize),
    Missing,
}

fn decode_asdf(line: &str, line_no: usize) -> Result<LineValues, DecodeError> {
    let tokens = tokenize_asdf(line, line_no)?;
    let invalid = |token: Token| DecodeError::InvalidNumber {
        line: line_no,
        token: format!("{token:?}"),
    };

    let mut values: Vec<f64> = Vec::with_capacity(tokens.len());
    let mut last: Option<Token> = None;
    for token in tokens {
        match token {
            Token::Value(v) => values.push(v),
            Token::Missing => values.push(f64::NAN),
            Token::Dif(d) => {
                let prev = *values.last().ok_or_else(|| invalid(token))?;
                values.push(prev + d);
            }
            Token::Dup(count) => {
                let repeated = last.ok_or_else(|| invalid(token))?;
                for _ in 1..count {
                    match repeated {
                        Token::Dif(d) => {
                            let prev = *values.last().ok_or_else(|| invalid(token))?;
                            values.push(prev + d);
                        }
                        Token::Value(v) => values.push(v),
                        Token::Missing => values.push(f64::NAN),
                        Token::Dup(_) => return Err(invalid(token)),
                    }
                }
                continue;
            }
        }
        last = Some(token);
    }

    Ok(LineValues {
        values,
        ends_in_dif: matches!(last, Some(Token::Dif(_))),
    })
}

fn tokenize_asdf(line: &str, line_no: usize) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::new();
    let mut current: Option<(TokenKind, String)> = None;

    let flush = |current: &mut Option<(TokenKind, String)>,
                 tokens: &mut Vec<Token>|
     -> Result<(), DecodeError> {
        if let Some((kind, buf)) = current.take() {
            let invalid = || DecodeError::InvalidNumber {
                line: line_no,
                token: buf.clone(),
            };
            let token = match kind {
                TokenKind::Absolute => Token::Value(buf.parse().map_err(|_| invalid())?),
                TokenKind::Difference => Token::Dif(buf.parse().map_err(|_| invalid())?),
                TokenKind::Duplicate => Token::Dup(buf.parse().map_err(|_| invalid())?),
            };
            tokens.push(token);
        }
        Ok(())
    };

    for c in line.chars() {
        let start = match c {
            '0'..='9' | '.' => {
                match current.as_mut() {
                    Some((_, buf)) => buf.push(c),
                    None => current = Some((TokenKind::Absolute, c.to_string())),
                }
                continue;
            }
            ' ' | '\t' | ',' | ';' => None,
            '+' => Some((TokenKind::Absolute, String::new())),
            '-' => Some((TokenKind::Absolute, "-".to_string())),
            '@' => Some((TokenKind::Absolute, "0".to_string())),
            'A'..='I' => Some((TokenKind::Absolute, digit(c, 'A', 1))),
            'a'..='i' => Some((TokenKind::Absolute, format!("-{}", digit(c, 'a', 1)))),
            '%' => Some((TokenKind::Difference, "0".to_string())),
            'J'..='R' => Some((TokenKind::Difference, digit(c, 'J', 1))),
            'j'..='r' => Some((TokenKind::Difference, format!("-{}", digit(c, 'j', 1)))),
            'S'..='Z' => Some((TokenKind::Duplicate, digit(c, 'S', 1))),
            's' => Some((TokenKind::Duplicate, "9".to_string())),
            '?' => {
                flush(&mut current, &mut tokens)?;
                tokens.push(Token::Missing);
                continue;
            }
            other => {
                return Err(DecodeError::InvalidNumber {
                    line: line_no,
                    token: other.to_string(),
                })
            }
        };
        flush(&mut current, &mut tokens)?;
        current = start;
    }
    flush(&mut current, &mut tokens)?;
    Ok(tokens)
}

/// Digit carried by an ASDF pseudo-digit, counting from `base` = `offset`.
fn digit(c: char, base: char, offset: u32) -> String {
    (c as u32 - base as u32 + offset).to_string()
}

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Ordinates per `(X++(Y..Y))` line written by [`encode_xydata`].
const VALUES_PER_LINE: usize = 10;

/// Write an equally spaced spectrum as an AFFN `(X++(Y..Y))` document.
///
/// Ordinates are stored as integers of `y / yfactor`; `x` must be uniformly
/// spaced (only its first and last values go into the header).
pub fn encode_xydata(title: &str, x: &[f64], y: &[f64], yfactor: f64) -> String {
    let n = x.len().min(y.len());
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "##TITLE={title}");
    let _ = writeln!(out, "##JCAMP-DX=4.24");
    let _ = writeln!(out, "##DATA TYPE=INFRARED SPECTRUM");
    let _ = writeln!(out, "##XUNITS=1/CM");
    let _ = writeln!(out, "##YUNITS=ABSORBANCE");
    if n > 0 {
        let _ = writeln!(out, "##FIRSTX={}", x[0]);
        let _ = writeln!(out, "##LASTX={}", x[n - 1]);
    }
    let _ = writeln!(out, "##XFACTOR=1");
    let _ = writeln!(out, "##YFACTOR={yfactor}");
    let _ = writeln!(out, "##NPOINTS={n}");
    let _ = writeln!(out, "##XYDATA=(X++(Y..Y))");
    for start in (0..n).step_by(VALUES_PER_LINE) {
        let end = (start + VALUES_PER_LINE).min(n);
        let _ = write!(out, "{}", x[start]);
        for &v in &y[start..end] {
            let _ = write!(out, " {}", (v / yfactor).round() as i64);
        }
        out.push('\n');
    }
    out.push_str("##END=\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const XYPOINTS: &str = "##TITLE=points
##JCAMP-DX=4.24
##XFACTOR=2.0
##YFACTOR=0.5
##XYPOINTS=(XY..XY)
100, 10; 101, 20
102,30 103,?
##END=
";

    #[test]
    fn decodes_xypoints_and_applies_factors() {
        let raw = decode(XYPOINTS.as_bytes()).unwrap();
        assert_eq!(raw.xfactor, 2.0);
        assert_eq!(raw.yfactor, 0.5);
        assert_eq!(raw.x, vec![200.0, 202.0, 204.0, 206.0]);
        assert_eq!(&raw.y[..3], &[5.0, 10.0, 15.0]);
        assert!(raw.y[3].is_nan());
    }

    #[test]
    fn decodes_affn_xydata_with_declared_spacing() {
        let doc = "##TITLE=affn
##FIRSTX=1000
##LASTX=1007
##NPOINTS=8
##YFACTOR=0.001
##XYDATA=(X++(Y..Y))
1000 1000 2000 3000 4000 $$ first line
1004 5000 6000 7000 8000
##END=
";
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.xfactor, 1.0);
        assert_eq!(raw.x, (1000..1008).map(f64::from).collect::<Vec<_>>());
        let expected = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        for (got, want) in raw.y.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn infers_spacing_from_line_abscissas() {
        let doc = "##TITLE=no spacing header
##XYDATA=(X++(Y..Y))
10 1 2
14 3 4
##END=
";
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.x, vec![10.0, 12.0, 14.0, 16.0]);
        assert_eq!(raw.y, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn single_line_without_spacing_is_an_error() {
        let doc = "##TITLE=x\n##XYDATA=(X++(Y..Y))\n10 1 2 3\n##END=\n";
        assert_eq!(decode(doc.as_bytes()), Err(DecodeError::UnknownSpacing));
    }

    #[test]
    fn decodes_sqz_dif_dup_with_y_check() {
        // First line: 1, +1, +0, dup -> 1 2 2 [2], the last 2 being the Y-check.
        let doc = "##TITLE=asdf
##DELTAX=1
##XYDATA=(X++(Y..Y))
1 AJ%T
4 BJj $$ last line
##END=
";
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.y, vec![1.0, 2.0, 2.0, 2.0, 3.0, 2.0]);
        assert_eq!(raw.x, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn pac_values_split_on_signs() {
        let values = decode_affn_line("100+20-3 1.5E-1", 1).unwrap().values;
        assert_eq!(values, vec![100.0, 20.0, -3.0, 0.15]);
    }

    #[test]
    fn labels_are_normalized() {
        assert_eq!(normalize_label("Peak Table"), "PEAKTABLE");
        assert_eq!(normalize_label("x_factor"), "XFACTOR");
        assert_eq!(normalize_label("DATA-TYPE"), "DATATYPE");
    }

    #[test]
    fn accepts_non_utf8_bytes() {
        let mut doc = b"##TITLE=Espectro \xe7\xe3o\n".to_vec();
        doc.extend_from_slice(b"##XYPOINTS=(XY..XY)\n1,2 3,4\n##END=\n");
        let raw = decode(&doc).unwrap();
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn rejects_documents_without_labels() {
        assert_eq!(decode(b"1 2 3\n4 5 6\n"), Err(DecodeError::NotJcamp));
        assert_eq!(decode(b""), Err(DecodeError::NotJcamp));
    }

    #[test]
    fn rejects_missing_data_section() {
        let doc = "##TITLE=header only\n##XFACTOR=1\n##END=\n";
        assert_eq!(decode(doc.as_bytes()), Err(DecodeError::MissingData));
    }

    #[test]
    fn rejects_bad_tokens_and_factors() {
        let doc = "##TITLE=x\n##XYPOINTS=(XY..XY)\n1,2 3,#\n##END=\n";
        assert!(matches!(
            decode(doc.as_bytes()),
            Err(DecodeError::InvalidNumber { line: 3, .. })
        ));

        let doc = "##TITLE=x\n##YFACTOR=abc\n##XYPOINTS=(XY..XY)\n1,2\n##END=\n";
        assert!(matches!(
            decode(doc.as_bytes()),
            Err(DecodeError::InvalidHeader { .. })
        ));

        let doc = "##TITLE=x\n##XYPOINTS=(XY..XY)\n1,2 3\n##END=\n";
        assert_eq!(decode(doc.as_bytes()), Err(DecodeError::UnpairedValue));
    }

    #[test]
    fn rejects_unsupported_table_forms() {
        let doc = "##TITLE=x\n##PEAK TABLE=(XYW..XYW)\n1,2,3\n##END=\n";
        assert!(matches!(
            decode(doc.as_bytes()),
            Err(DecodeError::UnsupportedTable(_))
        ));
    }

    #[test]
    fn sqz_lines_using_only_e_digits() {
        let doc = "##TITLE=x\n##DELTAX=1\n##XYDATA=(X++(Y..Y))\n1 E5 E6\n3 E7 E8\n##END=\n";
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.x, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(raw.y, vec![55.0, 56.0, 57.0, 58.0]);

        let negative = "##TITLE=x\n##DELTAX=1\n##XYDATA=(X++(Y..Y))\n1 e5 e\n##END=\n";
        let raw = decode(negative.as_bytes()).unwrap();
        assert_eq!(raw.y, vec![-55.0, -5.0]);
    }

    #[test]
    fn exponents_stay_decimal() {
        let doc = "##TITLE=x\n##DELTAX=1\n##XYDATA=(X++(Y..Y))\n1 1E2 2.5e-1\n##END=\n";
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.y, vec![100.0, 0.25]);
    }

    #[test]
    fn accepts_bare_cr_line_endings() {
        let doc = "##TITLE=x\r##XYPOINTS=(XY..XY)\r1,2 3,4\r##END=\r";
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.x, vec![1.0, 3.0]);
        assert_eq!(raw.y, vec![2.0, 4.0]);
    }

    #[test]
    fn line_numbers_count_each_line_ending_once() {
        let lines = split_lines("a\r\nb\rc\n\nd");
        assert_eq!(lines, vec![(1, "a"), (2, "b"), (3, "c"), (4, ""), (5, "d")]);

        let doc = "##TITLE=x\r\n##XYPOINTS=(XY..XY)\r1,2\r\n3,zz\r\n##END=\r\n";
        assert_eq!(
            decode(doc.as_bytes()),
            Err(DecodeError::InvalidNumber {
                line: 4,
                token: "zz".to_string()
            })
        );
    }

    #[test]
    fn skips_link_block_without_data() {
        let doc = "##TITLE=link\n##BLOCKS=2\n##END=\n##TITLE=data\n##XYPOINTS=(XY..XY)\n5,6\n##END=\n";
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.x, vec![5.0]);
        assert_eq!(raw.y, vec![6.0]);
    }

    #[test]
    fn encoded_document_decodes_to_same_samples() {
        let x: Vec<f64> = (0..25).map(|i| 600.0 + i as f64 * 2.0).collect();
        let y: Vec<f64> = (0..25).map(|i| i as f64 * 0.01).collect();
        let doc = encode_xydata("synthetic", &x, &y, 0.0001);
        let raw = decode(doc.as_bytes()).unwrap();
        assert_eq!(raw.len(), 25);
        for (got, want) in raw.x.iter().zip(&x) {
            assert!((got - want).abs() < 1e-9);
        }
        for (got, want) in raw.y.iter().zip(&y) {
            assert!((got - want).abs() < 1e-9);
        }
    }
}
