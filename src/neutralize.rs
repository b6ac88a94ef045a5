use std::collections::BTreeSet;

use crate::detector::Match;
use crate::language::Language;

const NEUTRAL_STATEMENT_EN: &str = "Constitutional Neutrality Applied: As guaranteed by the \
Constitution of India, every individual must be treated with equality and dignity. People should \
be evaluated on merit and actions, not community identity.";

const NEUTRAL_STATEMENT_HI: &str = "संवैधानिक तटस्थता: भारत के संविधान के अनुसार हर व्यक्ति के साथ \
समानता और गरिमा से व्यवहार होना चाहिए। लोगों का मूल्यांकन उनकी योग्यता और कर्मों से हो, समुदाय की पहचान से नहीं।";

/// Fixed equal-treatment statement, suffixed with the sorted languages present in `matches`.
///
/// `prompt` is accepted so callers can pass the decode subject through; the statement itself does
/// not repeat it.
pub fn neutralize<'a, I>(_prompt: &str, matches: I) -> String
where
    I: IntoIterator<Item = &'a Match>,
{
    let languages: BTreeSet<Language> = matches.into_iter().map(|m| m.language).collect();
    let mut out = format!("{NEUTRAL_STATEMENT_EN} / {NEUTRAL_STATEMENT_HI}");
    if !languages.is_empty() {
        let tags: Vec<&str> = languages.iter().map(Language::as_str).collect();
        out.push_str(&format!(" (Detected languages: {})", tags.join(", ")));
    }
    out
}
