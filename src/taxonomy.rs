// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Naming taxonomy and DATA-HOME destination routing
//!
//! The taxonomy is built once at startup and handed to the router and the
//! naming client by reference. Keyword tables keep insertion order: routing
//! is first-match over that order.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Source paths containing this are always routed to Text Documents
pub const NEWS_TRANSCRIPTS_MARKER: &str = "News/transcripts";

/// Destination for news transcripts
pub const TEXT_DOCUMENTS_FRAGMENT: &str = "documents/Text Documents";

/// Destination for names with no recognized content type
pub const GENERIC_FRAGMENT: &str = "documents";

/// Ordered keyword → value table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordTable(pub &'static [(&'static str, &'static str)]);

impl KeywordTable {
    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, &'static str)> {
        self.0.iter()
    }

    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

impl Serialize for KeywordTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Where names of one content type land under `filetree/roots`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRule {
    pub abbreviation: &'static str,
    pub primary: &'static str,
    /// keyword → fragment, scanned first-match
    pub contexts: KeywordTable,
}

/// Static naming vocabulary plus the destination rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingTaxonomy {
    pub content_types: KeywordTable,
    pub context_indicators: KeywordTable,
    pub temporal_markers: KeywordTable,
    pub quality_indicators: KeywordTable,
    #[serde(skip)]
    pub destinations: Vec<DestinationRule>,
}

impl NamingTaxonomy {
    /// The built-in taxonomy
    pub fn standard() -> Self {
        Self {
            content_types: KeywordTable(&[
                ("audio", "aud"),
                ("transcription", "trans"),
                ("documentation", "doc"),
                ("code", "code"),
                ("data", "data"),
                ("media", "media"),
                ("archive", "arch"),
                ("image", "img"),
                ("video", "vid"),
                ("literature", "lit"),
                ("game", "game"),
                ("software", "soft"),
            ]),
            context_indicators: KeywordTable(&[
                // professional
                ("meeting", "mtg"),
                ("interview", "intv"),
                ("presentation", "pres"),
                ("lecture", "lect"),
                ("conference", "conf"),
                ("research", "res"),
                ("project", "proj"),
                ("client", "cli"),
                ("contract", "contr"),
                ("certification", "cert"),
                ("correspondence", "corr"),
                ("upwork", "upw"),
                ("strategy", "strat"),
                ("politics", "pol"),
                // personal
                ("personal", "pers"),
                ("financial", "fin"),
                ("medical", "med"),
                ("identity", "id"),
                ("family", "fam"),
                ("friends", "frnd"),
                // content
                ("podcast", "pod"),
                ("recording", "rec"),
                ("music", "mus"),
                ("book", "book"),
                ("movie", "mov"),
                ("show", "show"),
                ("anime", "ani"),
                ("news", "news"),
                ("scientific", "sci"),
                ("educational", "edu"),
                ("entertainment", "ent"),
                // technical
                ("backup", "bkup"),
                ("dump", "dump"),
                ("template", "tmpl"),
                ("experiment", "exp"),
                ("library", "lib"),
                ("tool", "tool"),
                ("configuration", "cfg"),
                ("development", "dev"),
                ("system", "sys"),
            ]),
            temporal_markers: KeywordTable(&[
                ("daily", "day"),
                ("weekly", "wk"),
                ("monthly", "mon"),
                ("quarterly", "qtr"),
                ("yearly", "yr"),
                ("historical", "hist"),
                ("current", "curr"),
                ("recent", "rec"),
                ("ongoing", "ong"),
            ]),
            quality_indicators: KeywordTable(&[
                ("draft", "drft"),
                ("final", "fin"),
                ("review", "rev"),
                ("approved", "appr"),
                ("archived", "arch"),
                ("working", "wip"),
            ]),
            destinations: vec![
                DestinationRule {
                    abbreviation: "aud",
                    primary: "audio",
                    contexts: KeywordTable(&[
                        ("book", "audio/books"),
                        ("mus", "audio/music"),
                        ("pod", "audio/podcasts"),
                        ("rec", "audio/recordings"),
                        ("game", "audio/soundtracks/games"),
                        ("mov", "audio/soundtracks/movies"),
                        ("show", "audio/soundtracks/television"),
                    ]),
                },
                DestinationRule {
                    abbreviation: "trans",
                    primary: TEXT_DOCUMENTS_FRAGMENT,
                    contexts: KeywordTable(&[
                        ("mtg", "documents/professional"),
                        ("intv", "documents/professional"),
                        ("res", "documents/professional"),
                        ("pers", "documents/personal"),
                        ("fin", "documents/personal/financial"),
                        ("med", "documents/personal/medical"),
                        ("news", TEXT_DOCUMENTS_FRAGMENT),
                    ]),
                },
                DestinationRule {
                    abbreviation: "doc",
                    primary: "documents",
                    contexts: KeywordTable(&[
                        ("tmpl", "documents/_templates"),
                        ("contr", "documents/professional/contracts"),
                        ("cert", "documents/professional/certifications"),
                        ("corr", "documents/professional/correspondence"),
                        ("upw", "documents/professional/upwork"),
                        ("strat", "documents/professional/strategicAgent"),
                        ("pol", "documents/professional/StrategyPolitics"),
                        ("fin", "documents/personal/financial"),
                        ("med", "documents/personal/medical"),
                        ("id", "documents/personal/identity"),
                    ]),
                },
                DestinationRule {
                    abbreviation: "code",
                    primary: "software",
                    contexts: KeywordTable(&[
                        ("exp", "software/development/experiments"),
                        ("lib", "software/development/libraries"),
                        ("tool", "software/development/tools"),
                        ("cfg", "software/configurations"),
                    ]),
                },
                DestinationRule {
                    abbreviation: "media",
                    primary: "images",
                    contexts: KeywordTable(&[
                        ("vid", "video"),
                        ("img", "images"),
                        ("chart", "images/charts"),
                        ("screenshot", "images/screenshots"),
                    ]),
                },
                DestinationRule {
                    abbreviation: "arch",
                    primary: "archives",
                    contexts: KeywordTable(&[
                        ("bkup", "archives/backups"),
                        ("dump", "archives/dumps"),
                        ("news", "archives/news"),
                        ("sci", "archives/scientific"),
                        ("data", "archives/datasets"),
                    ]),
                },
            ],
        }
    }

    pub fn destination_rule(&self, abbreviation: &str) -> Option<&DestinationRule> {
        self.destinations.iter().find(|r| r.abbreviation == abbreviation)
    }
}

impl Default for NamingTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Leading run of lowercase ASCII letters (`"transNewsX"` → `"trans"`)
pub fn content_type_prefix(name: &str) -> &str {
    let end = name
        .char_indices()
        .find(|(_, c)| !c.is_ascii_lowercase())
        .map(|(i, _)| i)
        .unwrap_or(name.len());
    &name[..end]
}

/// True when the source path comes from the news transcripts tree
pub fn is_news_transcript(source: &Path) -> bool {
    source.to_string_lossy().replace('\\', "/").contains(NEWS_TRANSCRIPTS_MARKER)
}

/// `<data_home_root>/filetree/roots/<fragment>`
pub fn roots_path(data_home_root: &Path, fragment: &str) -> PathBuf {
    let mut path = data_home_root.join("filetree").join("roots");
    for segment in fragment.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path
}

/// Maps a candidate name to its DATA-HOME destination
#[derive(Debug, Clone, Copy)]
pub struct TaxonomyRouter<'a> {
    taxonomy: &'a NamingTaxonomy,
}

impl<'a> TaxonomyRouter<'a> {
    pub fn new(taxonomy: &'a NamingTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Destination fragment for `name`, relative to `filetree/roots`
    pub fn fragment(&self, name: &str, source_path: Option<&Path>) -> &'static str {
        if source_path.map(is_news_transcript).unwrap_or(false) {
            return TEXT_DOCUMENTS_FRAGMENT;
        }

        let rule = match self.taxonomy.destination_rule(content_type_prefix(name)) {
            Some(rule) => rule,
            None => return GENERIC_FRAGMENT,
        };

        let lowered = name.to_lowercase();
        rule.contexts
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, fragment)| *fragment)
            .unwrap_or(rule.primary)
    }

    /// Full destination parent directory for `name`
    pub fn route(&self, name: &str, data_home_root: &Path, source_path: Option<&Path>) -> PathBuf {
        roots_path(data_home_root, self.fragment(name, source_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str, source: Option<&str>) -> PathBuf {
        let taxonomy = NamingTaxonomy::standard();
        TaxonomyRouter::new(&taxonomy).route(name, Path::new("/dh"), source.map(Path::new))
    }

    #[test]
    fn test_content_type_prefix() {
        assert_eq!(content_type_prefix("transNewsIndPak"), "trans");
        assert_eq!(content_type_prefix("processedAudio20260101"), "processed");
        assert_eq!(content_type_prefix("Upper"), "");
        assert_eq!(content_type_prefix("aud"), "aud");
    }

    #[test]
    fn test_news_transcript_override_wins() {
        let expected = PathBuf::from("/dh/filetree/roots/documents/Text Documents");
        assert_eq!(route("codeToolsCli", Some("~/News/transcripts/x")), expected);
        assert_eq!(route("audPodcastWeekly", Some("/home/u/News/transcripts/2024")), expected);
        assert_eq!(route("Bogus", Some("C:\\Users\\u\\News\\transcripts\\a")), expected);
    }

    #[test]
    fn test_unknown_prefix_uses_generic_documents() {
        assert_eq!(route("processedAudio20260101", None), PathBuf::from("/dh/filetree/roots/documents"));
        assert_eq!(route("9lives", None), PathBuf::from("/dh/filetree/roots/documents"));
    }

    #[test]
    fn test_keyword_first_match_in_table_order() {
        // "fin" precedes "med" in the doc table
        assert_eq!(
            route("docMedFinReport", None),
            PathBuf::from("/dh/filetree/roots/documents/personal/financial")
        );
        assert_eq!(
            route("audPodcastEpisode", None),
            PathBuf::from("/dh/filetree/roots/audio/podcasts")
        );
    }

    #[test]
    fn test_primary_fragment_without_keyword() {
        assert_eq!(route("codeParserRust", None), PathBuf::from("/dh/filetree/roots/software"));
        assert_eq!(
            route("transWeatherBulletin", None),
            PathBuf::from("/dh/filetree/roots/documents/Text Documents")
        );
    }

    #[test]
    fn test_routing_is_deterministic() {
        for name in ["docContractAcme", "archBkupLaptop", "mediaVidHoliday", "x"] {
            assert_eq!(route(name, None), route(name, None));
        }
    }

    #[test]
    fn test_vocabulary_serializes_as_ordered_maps() {
        let json = serde_json::to_string(&NamingTaxonomy::standard()).unwrap();
        assert!(json.starts_with("{\"content_types\":{\"audio\":\"aud\""));
        assert!(!json.contains("destinations"));
    }
}
