// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// LaTeX export for plain transcriptions.
//
// Used when the engine returns only a transcription and no structured export
// of its own. Math gets symbol, fraction, exponent, and root conversion; text
// is escaped and wrapped in `\text{}`.

use std::sync::OnceLock;

use inkbridge_core::ContentType;
use regex::Regex;

/// Unicode operators and letters with their LaTeX commands.
const SYMBOLS: &[(char, &str)] = &[
    ('×', "\\times"),
    ('÷', "\\div"),
    ('·', "\\cdot"),
    ('±', "\\pm"),
    ('≠', "\\neq"),
    ('≤', "\\leq"),
    ('≥', "\\geq"),
    ('≈', "\\approx"),
    ('∞', "\\infty"),
    ('π', "\\pi"),
    ('α', "\\alpha"),
    ('β', "\\beta"),
    ('θ', "\\theta"),
];

struct MathPatterns {
    fraction: Regex,
    exponent: Regex,
    root_group: Regex,
    root_word: Regex,
}

fn math_patterns() -> &'static MathPatterns {
    static PATTERNS: OnceLock<MathPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MathPatterns {
        fraction: Regex::new(r"(\w+)\s*/\s*(\w+)").expect("valid fraction regex"),
        exponent: Regex::new(r"\^(\d+|\w)").expect("valid exponent regex"),
        root_group: Regex::new(r"√\(([^()]*)\)").expect("valid grouped root regex"),
        root_word: Regex::new(r"√(\w+)").expect("valid root regex"),
    })
}

/// Structured export for a transcription of the given content type.
pub fn export_for(content_type: ContentType, text: &str) -> String {
    match content_type {
        ContentType::Math => format_as_latex(text),
        ContentType::Text => format!("\\text{{{}}}", escape_text(text)),
    }
}

/// Convert a plain math transcription into LaTeX.
///
/// `a/b` becomes `\frac{a}{b}`, `x^2` becomes `x^{2}`, `√x` and `√(x+1)`
/// become `\sqrt{...}`, and operator symbols become their commands. An
/// exponent is a run of digits or a single character, so `x^2y` is `x^{2}y`.
pub fn format_as_latex(text: &str) -> String {
    // Structure first: the symbol commands inserted below would otherwise be
    // read back as fraction or exponent operands.
    let patterns = math_patterns();
    let structured = patterns.root_group.replace_all(text, "\\sqrt{${1}}");
    let structured = patterns.root_word.replace_all(&structured, "\\sqrt{${1}}");
    let structured = patterns
        .fraction
        .replace_all(&structured, "\\frac{${1}}{${2}}");
    let structured = patterns.exponent.replace_all(&structured, "^{${1}}");

    let mut latex = String::with_capacity(structured.len() + 16);
    let mut chars = structured.chars().peekable();
    while let Some(c) = chars.next() {
        match SYMBOLS.iter().find(|(symbol, _)| *symbol == c) {
            Some((_, command)) => {
                latex.push_str(command);
                // A command swallows a following letter, so separate them.
                if chars.peek().is_some_and(|next| next.is_alphabetic()) {
                    latex.push(' ');
                }
            }
            None if c == '−' => latex.push('-'),
            None => latex.push(c),
        }
    }
    latex
}

/// Escape LaTeX special characters in running text.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '#' | '$' | '%' | '&' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
