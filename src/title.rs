use std::sync::LazyLock;

use regex::Regex;

use crate::models::RawEntry;

/// Bracketed segments that mark a track as a variant we don't want,
/// e.g. "(Live at Wembley)" or "[Extended Mix]".
static ALTERNATE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\[(][^)\]]*(?:acoustic|live|remix|mix|edit|instrumental|version)[^)\]]*[\])]")
        .expect("alternate version pattern is valid")
});

/// Bracketed decorations that upload titles carry but track titles shouldn't,
/// e.g. "(Official Lyric Video)", "[HD]", "{Audio}", "<Visualizer>".
static DECORATION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)[\[({<][^\])}>]*(?:official|lyrics?|audio|album|visuali[sz]er|bonus|\bhd\b)[^\[\])}>]*[\])}>]",
    )
    .expect("decoration pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Whether the title contains a bracketed alternate-version marker.
pub fn is_alternate_version(title: &str) -> bool {
    ALTERNATE_VERSION.is_match(title.trim())
}

/// Replace characters that are not allowed in filenames on common filesystems.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Turn an upload title into a clean track title that is safe to use as a
/// filename.
///
/// The artist prefix ("Artist - ", "Artist: ", ...) and bracketed decorations
/// such as "(Official Video)" are removed. If nothing is left after that, the
/// raw title is tidied and sanitized instead, so the result is only empty when
/// the raw title itself is blank.
pub fn normalize(raw_title: &str, artist: &str) -> String {
    let without_artist = strip_artist_prefix(raw_title.trim(), artist.trim());
    let without_decorations = DECORATION_SEGMENT.replace_all(&without_artist, "");

    let cleaned = tidy(&without_decorations);
    if !cleaned.is_empty() {
        return cleaned;
    }

    log::debug!(
        "Normalizing '{}' left nothing, falling back to the raw title",
        raw_title
    );
    tidy(raw_title)
}

/// Drop entries whose raw title marks them as an alternate version.
pub fn filter_entries(entries: Vec<RawEntry>) -> Vec<RawEntry> {
    entries
        .into_iter()
        .filter(|entry| {
            let alternate = is_alternate_version(&entry.raw_title.to_lowercase());
            if alternate {
                log::debug!("Skipping alternate version: {}", entry.raw_title);
            }
            !alternate
        })
        .collect()
}

fn strip_artist_prefix(title: &str, artist: &str) -> String {
    if artist.is_empty() {
        return title.to_string();
    }

    let pattern = format!(r"(?i)^{}\s*[-–—|:]+\s*", regex::escape(artist));
    match Regex::new(&pattern) {
        Ok(prefix) => prefix.replace(title, "").into_owned(),
        Err(e) => {
            log::warn!("Could not build artist prefix pattern for '{}': {}", artist, e);
            title.to_string()
        }
    }
}

fn is_edge_separator(c: char) -> bool {
    matches!(c, '-' | '–' | '—' | '|' | ' ')
}

fn tidy(title: &str) -> String {
    let trimmed = title.trim().trim_matches(is_edge_separator);
    let collapsed = WHITESPACE.replace_all(trimmed, " ");
    sanitize_filename(collapsed.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, title: &str) -> RawEntry {
        RawEntry {
            external_id: id.to_string(),
            raw_title: title.to_string(),
        }
    }

    // =========================================================================
    // is_alternate_version
    // =========================================================================

    #[test]
    fn test_alternate_versions_are_detected() {
        let titles = [
            "Song (Live at Wembley)",
            "Song [Remix]",
            "Song (ACOUSTIC)",
            "Song (Extended Mix)",
            "Song (Radio Edit)",
            "Song [Instrumental]",
            "Song (Album Version)",
            "Artist - Song (live)",
        ];
        for title in titles {
            assert!(is_alternate_version(title), "expected alternate: {}", title);
        }
    }

    #[test]
    fn test_regular_titles_are_not_alternate() {
        let titles = [
            "Song",
            "Song (Official Video)",
            "Song - Live",
            "Remix of the Year",
            "Artist - Song [HD]",
        ];
        for title in titles {
            assert!(!is_alternate_version(title), "unexpected alternate: {}", title);
        }
    }

    // =========================================================================
    // normalize
    // =========================================================================

    #[test]
    fn test_normalize_strips_artist_and_official_lyric_video() {
        assert_eq!(
            normalize("Artist - Song Title (Official Lyric Video)", "Artist"),
            "Song Title"
        );
    }

    #[test]
    fn test_normalize_strips_colon_prefix_and_hd() {
        assert_eq!(normalize("Artist: Song [HD]", "Artist"), "Song");
    }

    #[test]
    fn test_normalize_prefix_is_case_insensitive_for_all_separators() {
        assert_eq!(normalize("ARTIST – Song", "Artist"), "Song");
        assert_eq!(normalize("artist — Song", "Artist"), "Song");
        assert_eq!(normalize("Artist | Song", "Artist"), "Song");
    }

    #[test]
    fn test_normalize_prefix_needs_a_separator() {
        assert_eq!(normalize("Artist Song", "Artist"), "Artist Song");
        assert_eq!(normalize("Museum", "Muse"), "Museum");
        assert_eq!(normalize("Queen - Queen of the Night", "Queen"), "Queen of the Night");
    }

    #[test]
    fn test_normalize_strips_every_bracket_style() {
        assert_eq!(normalize("Song {Official Audio}", "Artist"), "Song");
        assert_eq!(normalize("Song <Visualizer>", "Artist"), "Song");
        assert_eq!(normalize("Song (Visualiser) [Lyrics]", "Artist"), "Song");
        assert_eq!(normalize("Song (Bonus Track)", "Artist"), "Song");
    }

    #[test]
    fn test_normalize_keeps_unrelated_brackets() {
        assert_eq!(normalize("Song (feat. Someone)", "Artist"), "Song (feat. Someone)");
    }

    #[test]
    fn test_normalize_collapses_whitespace_and_trims_separators() {
        assert_eq!(
            normalize("Artist -  Song   Title\t(Official) - ", "Artist"),
            "Song Title"
        );
    }

    #[test]
    fn test_normalize_sanitizes_filesystem_characters() {
        assert_eq!(normalize("Artist - What? Now: Yes", "Artist"), "What_ Now_ Yes");
        assert_eq!(normalize("AC/DC \"Live\"*", "Artist"), "AC_DC _Live__");
    }

    #[test]
    fn test_normalize_is_idempotent_for_clean_titles() {
        let samples = [
            "Artist - Song Title (Official Lyric Video)",
            "Artist: Song [HD]",
            "Artist - What? Now: Yes",
            "Song (feat. Someone)",
            "Plain Title",
        ];
        for sample in samples {
            let once = normalize(sample, "Artist");
            assert_eq!(normalize(&once, "Artist"), once, "not idempotent: {}", sample);
        }

        let once = normalize("Queen - Queen of the Night", "Queen");
        assert_eq!(normalize(&once, "Queen"), once);
    }

    #[test]
    fn test_normalize_falls_back_to_raw_title_when_everything_is_stripped() {
        assert_eq!(
            normalize("Artist - (Official Audio)", "Artist"),
            "Artist - (Official Audio)"
        );
        assert_eq!(normalize("Artist", "Artist"), "Artist");
    }

    #[test]
    fn test_normalize_blank_title_stays_blank() {
        assert_eq!(normalize("   ", "Artist"), "");
    }

    #[test]
    fn test_normalize_without_artist() {
        assert_eq!(normalize("Song (Official Video)", ""), "Song");
    }

    #[test]
    fn test_normalize_escapes_artist_metacharacters() {
        assert_eq!(normalize("P!nk (Live?) - Song", "P!nk (Live?)"), "Song");
    }

    // =========================================================================
    // filter_entries
    // =========================================================================

    #[test]
    fn test_filter_entries_drops_alternates_and_keeps_order() {
        let entries = vec![
            raw("a", "Artist - First"),
            raw("b", "Artist - First (Live)"),
            raw("c", "Artist - Second [REMIX]"),
            raw("d", "Artist - Third (Official Video)"),
            raw("e", "Artist - First"),
        ];

        let filtered = filter_entries(entries);
        let ids: Vec<&str> = filtered.iter().map(|e| e.external_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d", "e"]);
    }

    #[test]
    fn test_filter_entries_empty() {
        assert!(filter_entries(vec![]).is_empty());
    }
}
