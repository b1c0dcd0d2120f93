use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::config::ParseConfig;
use crate::store::TermCountMap;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_'\-]*").expect("valid regex");
    static ref TAG: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
    static ref BRACKETED: Regex = Regex::new(r"\[[^\]\n]*\]").expect("valid regex");
    static ref PARENTHESISED: Regex = Regex::new(r"\([^)\n]*\)").expect("valid regex");
    static ref CONTENT_PARAGRAPHS: Selector = Selector::parse("#mw-content-text p").expect("valid selector");
    static ref PARAGRAPHS: Selector = Selector::parse("p").expect("valid selector");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Paragraph text of an HTML page.
///
/// Prefers the wiki content area and falls back to every `<p>`. Citation
/// markers and math markup inside paragraphs are skipped.
pub fn html_paragraph_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut paragraphs: Vec<ElementRef> = doc.select(&CONTENT_PARAGRAPHS).collect();
    if paragraphs.is_empty() {
        paragraphs = doc.select(&PARAGRAPHS).collect();
    }

    let mut out = String::new();
    for p in paragraphs {
        for node in p.descendants() {
            let Some(text) = node.value().as_text() else { continue };
            if node.ancestors().filter_map(ElementRef::wrap).any(|el| is_skipped(&el)) {
                continue;
            }
            out.push_str(text);
        }
        out.push('\n');
    }
    out
}

fn is_skipped(el: &ElementRef) -> bool {
    let e = el.value();
    (e.name() == "sup" && e.classes().any(|c| c == "reference")) || e.classes().any(|c| c == "mwe-math-element")
}

/// Blanks out leftover tags and bracketed / parenthesised asides.
pub fn strip_asides(text: &str) -> String {
    let text = TAG.replace_all(text, " ");
    let text = BRACKETED.replace_all(&text, " ");
    PARENTHESISED.replace_all(&text, " ").into_owned()
}

/// Reduces a word to lowercase ASCII letters, folding accents (`café` -> `cafe`).
fn fold(word: &str) -> String {
    word.nfkd().filter(char::is_ascii_alphabetic).map(|c| c.to_ascii_lowercase()).collect()
}

/// Turns text into normalized terms: ASCII-folded lowercase letters only,
/// stop words and excluded terms removed, short terms dropped.
pub struct Tokenizer {
    exclude: HashSet<String>,
    min_len: usize,
    stemmer: Option<Stemmer>,
}

impl Tokenizer {
    pub fn new(config: &ParseConfig) -> Self {
        Self {
            exclude: config.exclude_vocab.iter().map(|w| w.to_lowercase()).collect(),
            min_len: config.min_term_len,
            stemmer: config.stem.then(|| Stemmer::create(Algorithm::English)),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut terms = Vec::new();
        for mat in WORD.find_iter(&normalized) {
            if is_stopword(mat.as_str()) {
                continue;
            }
            let mut term = fold(mat.as_str());
            if let Some(stemmer) = &self.stemmer {
                term = stemmer.stem(&term).into_owned();
            }
            if term.len() < self.min_len || is_stopword(&term) || self.exclude.contains(&term) {
                continue;
            }
            terms.push(term);
        }
        terms
    }

    /// Term counts in first-occurrence order.
    pub fn count_terms(&self, text: &str) -> TermCountMap {
        let mut counts = TermCountMap::new();
        for term in self.tokenize(text) {
            *counts.entry(term).or_insert(0) += 1;
        }
        counts
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&ParseConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = Tokenizer::default().tokenize("Running, runner's run!");
        assert_eq!(t, vec!["running", "runners", "run"]);
    }

    #[test]
    fn stemming_is_opt_in() {
        let cfg = ParseConfig { stem: true, ..Default::default() };
        let t = Tokenizer::new(&cfg).tokenize("Running runs");
        assert_eq!(t, vec!["run", "run"]);
    }

    #[test]
    fn asides_are_removed() {
        let s = strip_asides("Aspirin [1] (acetylsalicylic acid) <b>relieves</b> pain");
        let t = Tokenizer::default().tokenize(&s);
        assert_eq!(t, vec!["aspirin", "relieves", "pain"]);
    }

    #[test]
    fn counts_keep_first_occurrence_order() {
        let counts = Tokenizer::default().count_terms("fever cough fever rash fever");
        let pairs: Vec<(&str, u64)> = counts.iter().map(|(t, c)| (t.as_str(), *c)).collect();
        assert_eq!(pairs, vec![("fever", 3), ("cough", 1), ("rash", 1)]);
    }
}
