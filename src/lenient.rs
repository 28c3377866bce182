//! Tolerant pre-pass for level files.
//!
//! The game editor writes `.adofai` files that strict JSON parsers reject: a
//! UTF-8 byte order mark up front and trailing commas before `]` or `}`.
//! [`sanitize`] removes both and leaves everything else, including the
//! contents of string literals, byte for byte intact.

const BOM: char = '\u{feff}';

/// Character walker that copies its input, dropping trailing commas.
struct Sanitizer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    output: String,
    /// Whitespace seen after a comma that is not yet known to be kept
    pending: String,
    comma_pending: bool,
}

impl<'a> Sanitizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            output: String::with_capacity(input.len()),
            pending: String::new(),
            comma_pending: false,
        }
    }

    /// Emit a held-back comma (and the whitespace after it).
    fn flush_comma(&mut self) {
        if self.comma_pending {
            self.output.push(',');
            self.comma_pending = false;
        }
        self.output.push_str(&self.pending);
        self.pending.clear();
    }

    fn copy_string(&mut self) {
        self.output.push('"');
        while let Some(c) = self.chars.next() {
            self.output.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = self.chars.next() {
                        self.output.push(escaped);
                    }
                }
                '"' => return,
                _ => {}
            }
        }
    }

    fn run(mut self) -> String {
        if let Some(&BOM) = self.chars.peek() {
            self.chars.next();
        }

        while let Some(c) = self.chars.next() {
            match c {
                ',' => {
                    self.flush_comma();
                    self.comma_pending = true;
                }
                c if c.is_whitespace() && self.comma_pending => self.pending.push(c),
                ']' | '}' => {
                    // Trailing comma: drop it, keep the whitespace
                    self.comma_pending = false;
                    self.flush_comma();
                    self.output.push(c);
                }
                '"' => {
                    self.flush_comma();
                    self.copy_string();
                }
                _ => {
                    self.flush_comma();
                    self.output.push(c);
                }
            }
        }

        self.flush_comma();
        self.output
    }
}

/// Strip a leading BOM and trailing commas from level text.
///
/// # Example
/// ```
/// use adofai_timing::lenient::sanitize;
///
/// let text = "\u{feff}{\"angleData\": [0, 90, ], \"name\": \"a, ]\",}";
/// assert_eq!(sanitize(text), "{\"angleData\": [0, 90 ], \"name\": \"a, ]\"}");
/// ```
pub fn sanitize(input: &str) -> String {
    Sanitizer::new(input).run()
}
