//! A deck: a named collection of tables loaded from a text file.

use crate::error::TableError;
use crate::table::Table;
use indexmap::IndexMap;

/// A collection of tables keyed by name, with the deck's title line.
///
/// Decks are loaded once at scenario time and immutable afterwards.
/// Several deck files may be merged into one `Deck` (the usual pattern:
/// one aero deck plus one propulsion deck feeding the same collection).
#[derive(Clone, Debug, Default)]
pub struct Deck {
    title: String,
    tables: IndexMap<String, Table>,
}

impl Deck {
    /// An empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// The title of the most recently parsed deck text.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of tables held.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the deck holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Insert a table, rejecting duplicates.
    pub fn insert(&mut self, table: Table) -> Result<(), TableError> {
        if self.tables.contains_key(table.name()) {
            return Err(TableError::DuplicateTable {
                name: table.name().to_string(),
            });
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(())
    }

    /// Fetch a table by name.
    pub fn table(&self, name: &str) -> Result<&Table, TableError> {
        self.tables.get(name).ok_or_else(|| TableError::UnknownTable {
            name: name.to_string(),
        })
    }

    /// 1-D lookup on a named table.
    pub fn look_up1(&self, name: &str, x1: f64) -> Result<f64, TableError> {
        self.table(name)?.look_up1(x1)
    }

    /// 2-D lookup on a named table.
    pub fn look_up2(&self, name: &str, x1: f64, x2: f64) -> Result<f64, TableError> {
        self.table(name)?.look_up2(x1, x2)
    }

    /// 3-D lookup on a named table.
    pub fn look_up3(&self, name: &str, x1: f64, x2: f64, x3: f64) -> Result<f64, TableError> {
        self.table(name)?.look_up3(x1, x2, x3)
    }

    /// Parse deck text and merge its tables into this deck.
    ///
    /// Grammar (whitespace-separated, line-oriented only for `TITLE`):
    ///
    /// ```text
    /// TITLE <free text to end of line>
    /// 1DIM <name>
    /// NX1 <n1>
    /// <n1 axis values>
    /// <n1 data values>
    /// 2DIM <name>
    /// NX1 <n1> NX2 <n2>
    /// <axis-1 values> <axis-2 values> <n1*n2 data values, x1-major>
    /// ...
    /// ```
    pub fn parse_text(&mut self, text: &str) -> Result<(), TableError> {
        let mut cursor = Cursor::new(text);

        while let Some((line, tok)) = cursor.peek() {
            if tok == "TITLE" {
                cursor.next();
                self.title = cursor.rest_of_line(line);
                continue;
            }
            let dim = match tok.strip_suffix("DIM").and_then(|d| d.parse::<usize>().ok()) {
                Some(d) => d,
                None => {
                    return Err(TableError::Parse {
                        line,
                        message: format!("expected TITLE or <n>DIM record, found '{tok}'"),
                    })
                }
            };
            cursor.next();
            let (name_line, name) = cursor.next().ok_or(TableError::Parse {
                line,
                message: "missing table name after DIM record".to_string(),
            })?;
            if !(1..=3).contains(&dim) {
                return Err(TableError::InvalidDimension { name, dim });
            }

            // NX1 n [NX2 n [NX3 n]]
            let mut sizes = Vec::with_capacity(dim);
            for k in 0..dim {
                let keyword = format!("NX{}", k + 1);
                let (kw_line, kw) = cursor.next().ok_or(TableError::Parse {
                    line: name_line,
                    message: format!("missing {keyword} record for table '{name}'"),
                })?;
                if kw != keyword {
                    return Err(TableError::Parse {
                        line: kw_line,
                        message: format!("expected {keyword}, found '{kw}'"),
                    });
                }
                sizes.push(cursor.number(&keyword)? as usize);
            }

            let mut axes = Vec::with_capacity(dim);
            for &n in &sizes {
                let mut axis = Vec::with_capacity(n);
                for _ in 0..n {
                    axis.push(cursor.number("axis value")?);
                }
                axes.push(axis);
            }

            let count: usize = sizes.iter().product();
            let mut data = Vec::with_capacity(count);
            for _ in 0..count {
                data.push(cursor.number("data value")?);
            }

            self.insert(Table::new(name, axes, data)?)?;
        }
        Ok(())
    }
}

/// Whitespace tokenizer that remembers the 1-based line of each token.
struct Cursor<'a> {
    tokens: Vec<(usize, &'a str)>,
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut tokens = Vec::new();
        for (i, content) in lines.iter().enumerate() {
            for tok in content.split_whitespace() {
                tokens.push((i + 1, tok));
            }
        }
        Self {
            tokens,
            lines,
            pos: 0,
        }
    }

    fn peek(&self) -> Option<(usize, &'a str)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<(usize, String)> {
        let (line, tok) = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some((line, tok.to_string()))
    }

    fn number(&mut self, what: &str) -> Result<f64, TableError> {
        let (line, tok) = self.next().ok_or(TableError::Parse {
            line: self.lines.len().max(1),
            message: format!("unexpected end of deck, expected {what}"),
        })?;
        tok.parse::<f64>().map_err(|_| TableError::Parse {
            line,
            message: format!("expected {what}, found '{tok}'"),
        })
    }

    /// Consume and return the remainder of `line` as a trimmed string,
    /// skipping past all its tokens.
    fn rest_of_line(&mut self, line: usize) -> String {
        let content = self.lines[line - 1];
        let title = content
            .split_whitespace()
            .skip(1)
            .collect::<Vec<_>>()
            .join(" ");
        while let Some((l, _)) = self.peek() {
            if l != line {
                break;
            }
            self.pos += 1;
        }
        title
    }
}
