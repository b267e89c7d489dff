//! A deliberately small policy-from-text parser.
//!
//! Recognized forms (ASCII keywords are case-insensitive):
//! - `daily 15`, `budget 15`, `예산 15` set the daily budget
//! - `food 12`, `food:12`, `food=12` set a category cap
//! - `block scam-mart`, `deny scam-mart`, `scam-mart 금지`, `scam-mart 차단` block a merchant
//!
//! Anything else is ignored. Defaults fill in what the text does not name.

use crate::presets;
use serde_json::json;
use spendguard_types::Policy;
use std::collections::BTreeMap;

/// Provenance tag recorded in `_source.kind`.
pub const SOURCE_KIND_NLP_LITE: &str = "nlp-lite";

const DAILY_KEYWORDS: [&str; 3] = ["daily", "예산", "budget"];
const NOT_CATEGORIES: [&str; 2] = ["daily", "budget"];
const BLOCK_VERBS: [&str; 2] = ["block", "deny"];
const BLOCK_SUFFIXES: [&str; 2] = ["금지", "차단"];

/// Build a policy from free text. Fails only on empty input.
pub fn policy_from_text(text: &str) -> anyhow::Result<Policy> {
    let text = normalize_text(text);
    if text.is_empty() {
        anyhow::bail!("policy text is empty");
    }

    let tokens = tokenize(&text);
    let caps = category_caps(&tokens);

    let mut extra = BTreeMap::new();
    extra.insert(
        "_source".to_string(),
        json!({ "kind": SOURCE_KIND_NLP_LITE, "text": text }),
    );

    Ok(Policy {
        version: None,
        daily_budget: Some(daily_budget(&text).unwrap_or_else(presets::default_daily_budget)),
        category_caps: if caps.is_empty() {
            presets::default_category_caps()
        } else {
            caps
        },
        blocked_merchants: blocked_merchants(&tokens),
        lane_by: Some("category".to_string()),
        extra,
    })
}

/// Fold dashes, collapse whitespace, and trim.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Clone, Debug, PartialEq)]
enum Token<'a> {
    /// Run of ASCII letters, digits, `_` and `-`.
    Word(&'a str),
    /// Run of other non-separator characters (e.g. Hangul).
    Other(&'a str),
}

#[derive(Clone, Debug, PartialEq)]
struct Spanned<'a> {
    token: Token<'a>,
    /// Separator text between the previous token and this one.
    gap: &'a str,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || (c.is_ascii_punctuation() && c != '_' && c != '-' && c != '.')
}

fn tokenize(text: &str) -> Vec<Spanned<'_>> {
    let mut out = Vec::new();
    let mut gap_start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if is_separator(c) || c == '.' {
            chars.next();
            continue;
        }
        let word = is_word_char(c);
        let mut end = start;
        while let Some(&(i, c)) = chars.peek() {
            let same_kind = if word {
                // keep a decimal point inside a number: `12.5`
                is_word_char(c) || (c == '.' && is_decimal_point(text, i))
            } else {
                !is_word_char(c) && !is_separator(c) && c != '.'
            };
            if !same_kind {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        let slice = &text[start..end];
        out.push(Spanned {
            token: if word {
                Token::Word(slice)
            } else {
                Token::Other(slice)
            },
            gap: &text[gap_start..start],
        });
        gap_start = end;
    }
    out
}

fn is_decimal_point(text: &str, dot: usize) -> bool {
    let before = text[..dot].chars().next_back();
    let after = text[dot + 1..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
}

fn parse_number(s: &str) -> Option<f64> {
    let mut parts = s.splitn(2, '.');
    let whole = parts.next()?;
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = parts.next()
        && (frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    s.parse().ok().filter(|v: &f64| v.is_finite())
}

/// First number after the first keyword that occurs, keywords tried in priority order.
fn daily_budget(text: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    DAILY_KEYWORDS.iter().find_map(|keyword| {
        let at = lower.find(keyword)?;
        let rest = &text[at + keyword.len()..];
        let digits_at = rest.find(|c: char| c.is_ascii_digit())?;
        let run: String = rest[digits_at..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        parse_number(run.trim_end_matches('.'))
            .or_else(|| parse_number(run.split('.').next().unwrap_or("")))
    })
}

fn is_category_key(word: &str) -> bool {
    let starts_alpha = word.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_alpha && (2..=31).contains(&word.len())
}

fn is_cap_gap(gap: &str) -> bool {
    let trimmed = gap.trim();
    !gap.is_empty() && (trimmed.is_empty() || trimmed == ":" || trimmed == "=")
}

fn category_caps(tokens: &[Spanned<'_>]) -> BTreeMap<String, f64> {
    let mut caps = BTreeMap::new();
    for pair in tokens.windows(2) {
        let (Token::Word(key), Token::Word(value)) = (&pair[0].token, &pair[1].token) else {
            continue;
        };
        if !is_category_key(key) || !is_cap_gap(pair[1].gap) {
            continue;
        }
        let key = key.to_ascii_lowercase();
        if NOT_CATEGORIES.contains(&key.as_str()) {
            continue;
        }
        if let Some(cap) = parse_number(value) {
            caps.insert(key, cap);
        }
    }
    caps
}

fn is_merchant_token(word: &str) -> bool {
    (2..=40).contains(&word.len())
}

fn blocked_merchants(tokens: &[Spanned<'_>]) -> Vec<String> {
    let mut blocked: Vec<String> = Vec::new();
    let mut push = |merchant: String| {
        if !blocked.contains(&merchant) {
            blocked.push(merchant);
        }
    };

    for pair in tokens.windows(2) {
        if let (Token::Word(verb), Token::Word(target)) = (&pair[0].token, &pair[1].token)
            && BLOCK_VERBS.contains(&verb.to_ascii_lowercase().as_str())
            && pair[1].gap.trim().is_empty()
            && is_merchant_token(target)
        {
            push(target.to_ascii_lowercase());
        }
    }

    for pair in tokens.windows(2) {
        if let (Token::Word(target), Token::Other(suffix)) = (&pair[0].token, &pair[1].token)
            && BLOCK_SUFFIXES.iter().any(|s| suffix.starts_with(s))
            && pair[1].gap.trim().is_empty()
            && is_merchant_token(target)
        {
            push(target.to_string());
        }
    }

    blocked
}
