// ABOUTME: Canonicalizes raw user input before validation.
// ABOUTME: Strips whitespace and folds case and keep-modifier synonyms.

use tracing::trace;

/// Normalize raw input into the canonical dice alphabet.
///
/// Whitespace is removed, `D` becomes `d`, `f`/`h`/`l` are uppercased, and a
/// keep marker `k` (optionally followed by `h` or `l`) collapses to `H` or `L`.
/// A bare `k` means keep-highest. Everything else passes through untouched, so
/// the result may still be rejected by [`crate::validate`].
///
/// # Examples
///
/// ```
/// assert_eq!(argos_dice::normalize("4D6 kl 2 + dF"), "4d6L2+dF");
/// assert_eq!(argos_dice::normalize("2d20k"), "2d20H");
/// ```
pub fn normalize(input: &str) -> String {
    let mut chars = input.chars().filter(|c| !c.is_whitespace()).peekable();
    let mut out = String::with_capacity(input.len());

    while let Some(ch) = chars.next() {
        match ch {
            'D' => out.push('d'),
            'f' | 'h' | 'l' => out.push(ch.to_ascii_uppercase()),
            'k' | 'K' => match chars.peek() {
                Some('l' | 'L') => {
                    chars.next();
                    out.push('L');
                }
                Some('h' | 'H') => {
                    chars.next();
                    out.push('H');
                }
                _ => out.push('H'),
            },
            _ => out.push(ch),
        }
    }

    trace!(input, canonical = %out, "normalized input");
    out
}
