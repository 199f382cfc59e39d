//! User-facing strings for the generated book.
//!
//! English is the base catalog; other languages override only the strings
//! they translate and inherit the rest.

pub const DEFAULT_LANGUAGE: &str = "en";

/// Every label the renderers put in front of a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct Strings {
    pub language: String,
    pub book_title: String,
    pub book_author: String,
    pub cover_page_title: String,
    pub cover_image_alt: String,
    pub cover_arc_title: String,
    pub cover_arc_subtitle: String,
    pub toc_heading: String,
    pub quick_table_title: String,
    pub quick_table_group: String,
    pub quick_table_period: String,
    pub quick_table_lanthanides: String,
    pub quick_table_actinides: String,
    pub quick_table_hint: String,
    pub index_title: String,
    pub blocks_title: String,
    pub blocks_other: String,
    pub element_profiles_title: String,
    pub element_profiles_intro: String,
    pub element_profiles_source_note: String,
    pub element_summary_label: String,
    pub element_summary_missing: String,
    pub element_source: String,
    pub element_meta_atomic_number: String,
    pub element_meta_symbol: String,
    pub element_meta_standard_atomic_weight: String,
    pub element_meta_group: String,
    pub element_meta_period: String,
    pub element_meta_block: String,
    pub element_meta_category: String,
    pub element_meta_phase_stp: String,
    pub element_meta_origin: String,
    pub element_meta_name_en: String,
    pub legend_title: String,
    pub legend_items: Vec<String>,
    pub sources_title: String,
    pub sources_intro: String,
    /// Contains a `{retrieved}` placeholder
    pub sources_retrieved: String,
}

impl Strings {
    pub fn english() -> Strings {
        let s = ToString::to_string;
        Strings {
            language: s("en"),
            book_title: s("PERIODIC TABLE"),
            book_author: s("Wikipedia contributors"),
            cover_page_title: s("Cover"),
            cover_image_alt: s("Periodic Table cover"),
            cover_arc_title: s("PERIODIC TABLE"),
            cover_arc_subtitle: s("Reference Edition for Kindle"),
            toc_heading: s("Contents"),
            quick_table_title: s("Quick Table"),
            quick_table_group: s("Group"),
            quick_table_period: s("Period"),
            quick_table_lanthanides: s("Lanthanides"),
            quick_table_actinides: s("Actinides"),
            quick_table_hint: s(
                "Tap an element cell for its symbol and number. Use the index for alphabetical lookup.",
            ),
            index_title: s("Elements A–Z"),
            blocks_title: s("Block Reference"),
            blocks_other: s("other"),
            element_profiles_title: s("Element Profiles"),
            element_profiles_intro: s(
                "Concise summaries for each element sourced from Wikipedia.",
            ),
            element_profiles_source_note: s(
                "Each entry links to the corresponding Wikipedia article under CC BY-SA 4.0.",
            ),
            element_summary_label: s("Summary"),
            element_summary_missing: s("Summary not available."),
            element_source: s("Source"),
            element_meta_atomic_number: s("Atomic number"),
            element_meta_symbol: s("Symbol"),
            element_meta_standard_atomic_weight: s("Standard atomic weight"),
            element_meta_group: s("Group"),
            element_meta_period: s("Period"),
            element_meta_block: s("Block"),
            element_meta_category: s("Category"),
            element_meta_phase_stp: s("Phase (STP)"),
            element_meta_origin: s("Origin"),
            element_meta_name_en: s("English name"),
            legend_title: s("Legend"),
            legend_items: vec![
                s("Atomic number: top-left number in each cell."),
                s("Element symbol: large center text."),
                s("Lanthanides and actinides appear in dedicated rows for quick reference."),
                s("All data sourced from Wikipedia and normalized for e-reader display."),
            ],
            sources_title: s("Sources & Licensing"),
            sources_intro: s(
                "All textual content originates from Wikipedia and is distributed under the terms of the \
                 Creative Commons Attribution-ShareAlike 4.0 International License (CC BY-SA 4.0).",
            ),
            sources_retrieved: s("Retrieved on {retrieved}."),
        }
    }

    pub fn japanese() -> Strings {
        let s = ToString::to_string;
        Strings {
            language: s("ja"),
            book_title: s("元 素 周 期 表"),
            book_author: s("ウィキペディア寄稿者"),
            cover_page_title: s("表紙"),
            cover_image_alt: s("元素周期表の表紙"),
            cover_arc_title: s("元 素 周 期 表"),
            toc_heading: s("目次"),
            quick_table_title: s("早見表"),
            quick_table_group: s("族"),
            quick_table_period: s("周期"),
            quick_table_lanthanides: s("ランタノイド"),
            quick_table_actinides: s("アクチノイド"),
            index_title: s("元素一覧"),
            blocks_title: s("ブロック別"),
            element_profiles_title: s("元素の基本情報"),
            element_profiles_intro: s("各元素の簡潔な概要をWikipediaから収録しています。"),
            element_profiles_source_note: s(
                "各項目はCC BY-SA 4.0の条件で対応するWikipedia記事にリンクしています。",
            ),
            element_summary_label: s("概要"),
            element_summary_missing: s("概要はありません。"),
            element_source: s("出典"),
            element_meta_atomic_number: s("原子番号"),
            element_meta_symbol: s("元素記号"),
            element_meta_standard_atomic_weight: s("標準原子量"),
            element_meta_group: s("族"),
            element_meta_period: s("周期"),
            element_meta_block: s("ブロック"),
            element_meta_category: s("分類"),
            element_meta_phase_stp: s("標準状態での相"),
            element_meta_origin: s("名称の由来"),
            element_meta_name_en: s("英語名"),
            legend_title: s("凡例"),
            sources_title: s("出典とライセンス"),
            sources_intro: s(
                "本文のテキストはすべてWikipediaに由来し、Creative Commons Attribution-ShareAlike 4.0 International \
                 License (CC BY-SA 4.0) の条件で配布されています。",
            ),
            sources_retrieved: s("取得日: {retrieved}。"),
            ..Strings::english()
        }
    }

    /// The retrieval line with its placeholder filled in.
    pub fn retrieved(&self, retrieved: &str) -> String {
        self.sources_retrieved.replace("{retrieved}", retrieved)
    }
}

/// Languages with a built-in catalog.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ja"];

/// Best built-in catalog for a language tag: exact match, then the primary
/// subtag (`ja-JP` -> `ja`), then English.
pub fn select_language(language: Option<&str>) -> &'static str {
    let Some(candidate) = language
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty())
    else {
        return DEFAULT_LANGUAGE;
    };

    let primary = candidate.split(['-', '_']).next().unwrap_or_default();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|supported| **supported == candidate)
        .or_else(|| SUPPORTED_LANGUAGES.iter().find(|supported| **supported == primary))
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Source of localized strings for the renderers.
pub trait Catalog {
    fn strings(&self, language: Option<&str>) -> Strings;
}

/// The catalogs compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinCatalog;

impl Catalog for BuiltinCatalog {
    fn strings(&self, language: Option<&str>) -> Strings {
        match select_language(language) {
            "ja" => Strings::japanese(),
            _ => Strings::english(),
        }
    }
}
