//! URL autolinking: wraps bare URLs and naked domains in prose as
//! `[span](span)` markdown links. Pure text transform, never fails; the only
//! observable side effect is a debug-level count of replacements.

use std::sync::OnceLock;

use regex::Regex;

/// Closed set of recognized top-level domains for naked-domain detection.
/// Matched case-insensitively; word-boundary anchored on both ends.
const TLDS: &str = "com|net|org|edu|gov|mil|aero|asia|biz|cat|coop|info|int|jobs|mobi|museum|name|post|pro|tel|travel|xxx|\
ac|ad|ae|af|ag|ai|al|am|an|ao|aq|ar|as|at|au|aw|ax|az|ba|bb|bd|be|bf|bg|bh|bi|bj|bm|bn|bo|br|bs|bt|bv|bw|\
by|bz|ca|cc|cd|cf|cg|ch|ci|ck|cl|cm|cn|co|cr|cs|cu|cv|cx|cy|cz|dd|de|dj|dk|dm|do|dz|ec|ee|eg|eh|er|es|et|\
eu|fi|fj|fk|fm|fo|fr|ga|gb|gd|ge|gf|gg|gh|gi|gl|gm|gn|gp|gq|gr|gs|gt|gu|gw|gy|hk|hm|hn|hr|ht|hu|id|ie|il|\
im|in|io|iq|ir|is|it|je|jm|jo|jp|ke|kg|kh|ki|km|kn|kp|kr|kw|ky|kz|la|lb|lc|li|lk|lr|ls|lt|lu|lv|ly|ma|mc|\
md|me|mg|mh|mk|ml|mm|mn|mo|mp|mq|mr|ms|mt|mu|mv|mw|mx|my|mz|na|nc|ne|nf|ng|ni|nl|no|np|nr|nu|nz|om|pa|pe|\
pf|pg|ph|pk|pl|pm|pn|pr|ps|pt|pw|py|qa|re|ro|rs|ru|rw|sa|sb|sc|sd|se|sg|sh|si|sj|sk|sl|sm|sn|so|sr|ss|st|\
su|sv|sx|sy|sz|tc|td|tf|tg|th|tj|tk|tl|tm|tn|to|tp|tr|tt|tv|tw|tz|ua|ug|uk|us|uy|uz|va|vc|ve|vg|vi|vn|vu|\
wf|ws|ye|yt|yu|za|zm|zw";

/// The URL pattern, compiled once.
///
/// First alternative: spans with a scheme marker (`http:`/`https:` plus 1-3
/// slashes, or a domain followed by `/`), continued through the longest
/// balanced-paren, non-whitespace, non-bracket run, with trailing punctuation
/// trimmed by the final character class. Second alternative (`naked` group):
/// bare alphanumeric-and-hyphen labels ending in a recognized TLD; the email
/// guards around this group are applied by the caller, since this engine has
/// no lookaround.
fn url_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            r#"(?x)
            \b
            (?:
                (?:
                    https?:
                    (?:
                        /{{1,3}}
                        |
                        [a-z0-9%]
                    )
                    |
                    [a-z0-9.\-]+\.(?i:{TLDS})/
                )
                [^\s()<>{{}}\[\]]*
                (?:
                    \([^\s()]*(?:\([^\s()]*\)[^\s()]*)*\)
                    [^\s()<>{{}}\[\]]*
                )*
                (?:
                    \([^\s()]*(?:\([^\s()]*\)[^\s()]*)*\)
                    |
                    [^\s`!()\[\]{{}};:'".,<>?«»“”‘’]
                )
                |
                (?P<naked>
                    [a-z0-9]+
                    (?:[.\-][a-z0-9]+)*
                    \.(?i:{TLDS})
                    \b
                    /?
                )
            )"#
        );
        Regex::new(&pattern).expect("valid URL regex")
    })
}

/// Rewrite every bare URL or naked domain in `text` as a markdown link.
/// Already-linked and code-quoted spans are left untouched. Never fails.
pub fn replace_links(text: &str) -> String {
    let (result, count) = replace_links_counting(text);
    log::debug!("{count} URL(s) found");
    result
}

/// The worker behind `replace_links`, exposing the replacement count.
fn replace_links_counting(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;
    let mut count = 0_usize;

    for caps in url_regex().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(text.get(last_end..whole.start()).unwrap_or(""));
        last_end = whole.end();

        let span = whole.as_str();
        let linkable = !inside_link_or_code(text, whole.start())
            && (caps.name("naked").is_none()
                || !adjacent_to_email_marker(text, whole.start(), whole.end()));

        if linkable {
            out.push('[');
            out.push_str(span);
            out.push_str("](");
            out.push_str(span);
            out.push(')');
            count += 1;
        } else {
            out.push_str(span);
        }
    }

    out.push_str(text.get(last_end..).unwrap_or(""));
    (out, count)
}

/// Email guard for naked domains: a match preceded by `@` is the domain part
/// of an address, and a match followed by `@` is a local part that happens to
/// end in a TLD (e.g. `foo.na` in `foo.na@example.com`).
fn adjacent_to_email_marker(text: &str, start: usize, end: usize) -> bool {
    let preceded = text.get(..start).is_some_and(|prefix| prefix.ends_with('@'));
    let followed = text.get(end..).is_some_and(|suffix| suffix.starts_with('@'));
    preceded || followed
}

/// Skip spans that already sit inside markdown link or inline-code syntax:
/// link text (`[` before), link destination (`](` before), or backtick quote.
fn inside_link_or_code(text: &str, start: usize) -> bool {
    let Some(prefix) = text.get(..start) else {
        return false;
    };
    prefix.ends_with('[') || prefix.ends_with("](") || prefix.ends_with('`')
}
