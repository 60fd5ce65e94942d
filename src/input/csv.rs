//! Minimal CSV tokenizer for Harbor database exports
//!
//! Handles quoted fields, doubled quotes inside quotes, embedded newlines
//! inside quotes and CRLF line endings. Blank lines are dropped.

/// A tokenized row together with the 1-based line it started on
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Split CSV content into rows of fields
pub fn tokenize(content: &str, delimiter: char) -> Result<Vec<RawRow>, String> {
    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_row(&mut rows, row_start, std::mem::take(&mut fields));
                line += 1;
                row_start = line;
            }
            c if c == delimiter => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted field starting on line {}", row_start));
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_row(&mut rows, row_start, fields);
    }

    Ok(rows)
}

fn push_row(rows: &mut Vec<RawRow>, line: usize, fields: Vec<String>) {
    // A lone empty field is a blank line
    if fields.len() == 1 && fields[0].is_empty() {
        return;
    }
    rows.push(RawRow { line, fields });
}
