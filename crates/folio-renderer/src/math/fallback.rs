//! Unicode approximation of TeX expressions.

/// Control words replaced by a single character.
const SYMBOLS: &[(&str, &str)] = &[
    ("pm", "±"),
    ("mp", "∓"),
    ("times", "×"),
    ("div", "÷"),
    ("cdot", "·"),
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("epsilon", "ε"),
    ("lambda", "λ"),
    ("mu", "μ"),
    ("pi", "π"),
    ("sigma", "σ"),
    ("theta", "θ"),
    ("omega", "ω"),
    ("Delta", "Δ"),
    ("Sigma", "Σ"),
    ("Omega", "Ω"),
    ("infty", "∞"),
    ("neq", "≠"),
    ("leq", "≤"),
    ("geq", "≥"),
    ("approx", "≈"),
    ("rightarrow", "→"),
    ("leftarrow", "←"),
];

/// Literal script sequences replaced after control words.
const SCRIPTS: &[(&str, &str)] = &[("^2", "²"), ("^3", "³"), ("_{0}", "₀")];

/// Approximate a TeX expression with Unicode characters.
///
/// Known control words (`\pi`, `\leq`, ...) become their symbol; the space
/// that separates a control word from a following letter is dropped, as TeX
/// does, so `\pi r^2` reads `πr²`. Unknown control words and everything else
/// pass through unchanged.
#[must_use]
pub fn to_unicode(tex: &str) -> String {
    let mut out = String::with_capacity(tex.len());
    let mut rest = tex;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let word_len = after
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(after.len());
        let (word, remainder) = after.split_at(word_len);

        match SYMBOLS.iter().find(|(name, _)| *name == word) {
            Some((_, symbol)) => {
                out.push_str(symbol);
                let trimmed = remainder.trim_start();
                rest = if trimmed.starts_with(char::is_alphabetic) {
                    trimmed
                } else {
                    remainder
                };
            }
            None => {
                out.push('\\');
                out.push_str(word);
                rest = remainder;
            }
        }
    }
    out.push_str(rest);

    SCRIPTS
        .iter()
        .fold(out, |acc, (from, to)| acc.replace(from, to))
}
