//! Token extraction from pattern rows

/// A warning generated during tokenization
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Extracts color names from a pattern row.
///
/// Cells are written as `{name}`; the braces are stripped from the returned
/// names. Whitespace between cells is ignored. Any other character outside
/// braces, an empty `{}`, or an unclosed cell generates a warning and is
/// skipped. Columns in warnings count characters from 1.
///
/// # Examples
///
/// ```
/// use fractgrid::tokenizer::tokenize;
///
/// let (names, warnings) = tokenize("{A}{_} {A}");
/// assert_eq!(names, vec!["A", "_", "A"]);
/// assert!(warnings.is_empty());
///
/// let (names, warnings) = tokenize("x{A}");
/// assert_eq!(names, vec!["A"]);
/// assert_eq!(warnings.len(), 1);
/// ```
pub fn tokenize(row: &str) -> (Vec<String>, Vec<Warning>) {
    let mut names = Vec::new();
    let mut warnings = Vec::new();
    let mut chars = row.chars().enumerate();

    while let Some((pos, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c != '{' {
            warnings.push(Warning::new(format!("Unexpected character '{}' at column {}", c, pos + 1)));
            continue;
        }

        let mut name = String::new();
        let mut closed = false;
        for (_, inner) in chars.by_ref() {
            if inner == '}' {
                closed = true;
                break;
            }
            name.push(inner);
        }

        if !closed {
            warnings.push(Warning::new(format!("Unclosed cell '{{{}' at column {}", name, pos + 1)));
        } else if name.is_empty() {
            warnings.push(Warning::new(format!("Empty cell '{{}}' at column {}", pos + 1)));
        } else {
            names.push(name);
        }
    }

    (names, warnings)
}
