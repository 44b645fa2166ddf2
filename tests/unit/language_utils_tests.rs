/*!
 * Tests for language utilities
 */

use polyedit::language_utils::{self, DEFAULT_FONT};

#[test]
fn test_normalize_to_part2t_withVariousCodes_shouldNormalize() {
    assert_eq!(language_utils::normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(language_utils::normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(language_utils::normalize_to_part2t("deu").unwrap(), "deu");
    assert!(language_utils::normalize_to_part2t("xx").is_err());
}

#[test]
fn test_display_language_withCodeOrName_shouldReturnReadableName() {
    assert_eq!(language_utils::display_language("es"), "Spanish");
    assert_eq!(language_utils::display_language(" French "), "French");
    assert_eq!(language_utils::display_language("Brazilian Portuguese"), "Brazilian Portuguese");
}

#[test]
fn test_font_for_language_withScriptLanguages_shouldPickMatchingFont() {
    assert_eq!(language_utils::font_for_language("ja"), "/fonts/NotoSansJP-Regular.otf");
    assert_eq!(language_utils::font_for_language("zh-Hant"), "/fonts/NotoSansSC-Regular.otf");
    assert_eq!(language_utils::font_for_language("ara"), "/fonts/NotoNaskhArabic-Regular.ttf");
    assert_eq!(language_utils::font_for_language("hi"), "/fonts/NotoSansDevanagari-Regular.ttf");
}

#[test]
fn test_font_for_language_withLatinOrUnknown_shouldUseDefault() {
    assert_eq!(language_utils::font_for_language("fr"), DEFAULT_FONT);
    assert_eq!(language_utils::font_for_language("Klingon"), DEFAULT_FONT);
    assert_eq!(language_utils::font_for_language(""), DEFAULT_FONT);
}
