//! Language utilities for ISO language code handling
//!
//! Profiles name their target language either as an ISO 639 code (`fr`,
//! `fra`, `fre`) or as free text (`French`, `Brazilian Portuguese`). These
//! helpers turn codes into display names for prompts and pick a font file
//! able to render the target script.

use anyhow::{Result, anyhow};
use isolang::Language;

// @const: Default font for Latin, Cyrillic and Greek scripts
pub const DEFAULT_FONT: &str = "/fonts/NotoSans-Regular.ttf";

/// Map ISO 639-2/B codes to their ISO 639-2/T equivalent
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let terminology = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(terminology)
}

/// Primary subtag of a tag such as `pt-BR` or `zh_Hant`, lowercased
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = primary_subtag(code);

    match normalized_code.len() {
        2 => {
            if let Some(lang) = Language::from_639_1(&normalized_code) {
                return Ok(lang.to_639_3().to_string());
            }
        }
        3 => {
            if Language::from_639_3(&normalized_code).is_some() {
                return Ok(normalized_code);
            }
            if let Some(terminology) = bibliographic_to_terminology(&normalized_code) {
                return Ok(terminology.to_string());
            }
        }
        _ => {}
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let part2t = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&part2t)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", part2t))?;
    Ok(lang.to_639_1().map(str::to_string).unwrap_or(part2t))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Name used in prompts: the English name for ISO codes, the text itself otherwise
pub fn display_language(target: &str) -> String {
    match get_language_name(target) {
        Ok(name) => name,
        Err(_) => target.trim().to_string(),
    }
}

/// Font file able to render text in the given language.
///
/// Unknown languages and free-text names fall back to the Latin font.
pub fn font_for_language(language: &str) -> &'static str {
    let code = normalize_to_part1_or_part2t(language).unwrap_or_else(|_| primary_subtag(language));
    match code.as_str() {
        "zh" | "yue" | "wuu" | "cjy" | "nan" | "hsn" | "hak" => "/fonts/NotoSansSC-Regular.otf",
        "ja" => "/fonts/NotoSansJP-Regular.otf",
        "ko" => "/fonts/NotoSansKR-Regular.otf",
        "hi" | "mr" | "bho" | "mai" | "mag" | "doi" => "/fonts/NotoSansDevanagari-Regular.ttf",
        "gu" => "/fonts/NotoSansGujarati-Regular.ttf",
        "ta" => "/fonts/NotoSansTamil-Regular.ttf",
        "te" => "/fonts/NotoSansTelugu-Regular.ttf",
        "kn" => "/fonts/NotoSansKannada-Regular.ttf",
        "ml" => "/fonts/NotoSansMalayalam-Regular.ttf",
        "bn" | "syl" => "/fonts/NotoSansBengali-Regular.ttf",
        "ur" | "ar" | "arz" | "ps" | "fa" | "sd" => "/fonts/NotoNaskhArabic-Regular.ttf",
        "am" | "ti" => "/fonts/NotoSansEthiopic-Regular.ttf",
        "my" => "/fonts/NotoSansMyanmar-Regular.ttf",
        "km" => "/fonts/NotoSansKhmer-Regular.ttf",
        "th" => "/fonts/NotoSansThai-Regular.ttf",
        "he" => "/fonts/NotoSansHebrew-Regular.ttf",
        "si" => "/fonts/NotoSansSinhala-Regular.ttf",
        _ => DEFAULT_FONT,
    }
}
