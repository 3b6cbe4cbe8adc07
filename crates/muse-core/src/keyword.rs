//! Keyword pre-filter for display text.
//!
//! First-pass, local classification applied before any remote moderation
//! call. The allow-list always wins: it exists to rescue legitimate content
//! (band names, genre tags) that overlaps superficially with deny-listed
//! words. Everything the lists cannot decide defers to remote moderation.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Tri-state verdict for text moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe,
    /// Neither list matched; defer to remote moderation.
    Undecided,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Unsafe => "unsafe",
            Verdict::Undecided => "undecided",
        }
    }
}

/// Allow-listed terms, lowercase. Substring match forces a Safe verdict.
static ALLOW_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Catalog vocabulary
        "playlist", "playlists", "music", "songs", "song", "soundtrack", "soundtracks",
        "remix", "remixes", "album rock", "best songs", "weekly updates", "top hits",
        // Listening contexts
        "gym", "workout", "study", "chill", "relax", "sleep", "lofi", "vibes", "vibe",
        "rage music", "rage playlist", "nostalgia", "nostalgic", "nostalgiacore",
        "birthday", "christmas", "y2k",
        // Genres
        "phonk", "bass drop", "hardstyle", "hardcore", "dubstep", "trance",
        "edm", "electronic", "electro", "house", "techno", "rave", "classic rock",
        "progressive rock", "punk rock", "hard rock", "glam rock", "new wave",
        "post-punk", "alternative rock", "indie rock", "emo", "grindcore",
        "cybergrind", "orchestral", "orchestra", "neoclassical", "symphonic metal",
        "rap (music genre)",
        // Anime and fandom tags
        "anime", "shoujo", "shonen", "seinen", "josei", "opening", "ending", "ost",
        "bgm", "one piece", "naruto", "demon slayer", "chainsaw man", "jojo",
        "tokyo ghoul", "attack on titan", "my hero academia", "jjk", "mha", "snk",
        "dbz", "hxh", "main character", "boss battle", "walter white",
        // Innocuous overlaps with deny-listed words
        "hoe (tool)", "epic",
    ]
});

/// Allow-listed artist names, lowercase. Substring match forces Safe.
static ALLOW_ARTISTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "drake", "eminem", "kanye west", "beyoncé", "aimer", "yoasobi",
        "ariana grande", "fleetwood mac", "taylor swift", "the weeknd",
        "bruno mars", "billie eilish", "doja cat", "kenshi yonezu", "lisa",
        "radwimps", "king gnu", "vaundy", "eagles", "queen", "the beatles",
        "led zeppelin", "pink floyd", "the rolling stones", "the who",
        "the doors", "jimi hendrix", "bob dylan", "david bowie", "elton john",
        "prince", "michael jackson", "madonna", "whitney houston",
        "mariah carey", "stevie wonder", "bob marley", "aretha franklin",
        "marvin gaye", "the beach boys", "the velvet underground",
        "the temptations", "the supremes", "the jackson 5", "the bee gees",
        "the grateful dead",
    ]
    .into_iter()
    .collect()
});

/// Deny-listed terms, lowercase. Exact substring match forces Unsafe
/// unless an allow-list entry matched first.
static DENY_TERMS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "nude", "nudes", "naked", "adult", "18+", "nsfw", "porn", "hentai",
        "lewd", "ecchi", "ero", "oppai", "doujinshi", "h-manga", "h-doujin",
        "shota", "sexting", "horny", "slut", "thot", "milf", "fetish", "kink",
        "lingerie", "thong", "erotic", "sultry", "risque", "suggestive",
        "provocative", "busty", "cleavage", "nipple", "genital", "crotch",
        "twerk", "incelcore", "smoking",
        // Japanese catalog spam
        "エロ", "裏ビデオ", "無修正", "エッチ", "アダルト", "変態", "ロリコン", "乱交",
        // Emoji bait
        "🥵", "🍑", "🍆", "🖕",
    ]
});

/// Deny-listed multi-word phrases, lowercase.
static DENY_PHRASES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "thirst trap", "nude rap", "nude dance", "nude model", "sexy twerk",
        "twerk session", "nude rap freestyle", "rapping children",
        "licking toes", "licking feet",
    ]
});

/// Normalize text for list matching: HTML-unescape, trim, lowercase.
pub fn normalize(text: &str) -> String {
    html_escape::decode_html_entities(text)
        .trim()
        .to_lowercase()
}

/// Classify display text against the allow/deny lists.
///
/// Empty text is Safe. The allow-list (terms, then artists) is checked
/// before the deny-list and always wins.
pub fn classify(text: &str) -> Verdict {
    if text.trim().is_empty() {
        return Verdict::Safe;
    }

    let text = normalize(text);

    if ALLOW_TERMS.iter().any(|term| text.contains(term)) {
        tracing::debug!(verdict = "safe", reason = "allow_term", "keyword verdict");
        return Verdict::Safe;
    }
    if ALLOW_ARTISTS.iter().any(|artist| text.contains(artist)) {
        tracing::debug!(verdict = "safe", reason = "allow_artist", "keyword verdict");
        return Verdict::Safe;
    }

    if DENY_TERMS.iter().any(|term| text.contains(term))
        || DENY_PHRASES.iter().any(|phrase| text.contains(phrase))
    {
        tracing::warn!(verdict = "unsafe", "blocked by keyword filter");
        return Verdict::Unsafe;
    }

    Verdict::Undecided
}
