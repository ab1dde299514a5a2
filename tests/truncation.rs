use pretty_assertions::assert_eq;
use rstest::rstest;
use truncahtml::tokenizer::{Event, Tokenizer};
use truncahtml::truncate::count_words;
use truncahtml::{
    reserialize, summarize, truncate, Streamer, SummaryOptions, WordTruncator, DEFAULT_MARKER,
};

fn truncated(html: &str, max_words: Option<usize>) -> String {
    truncate(html, max_words, DEFAULT_MARKER)
}

/// Words in text content only, as the truncator counts them.
fn text_words(html: &str) -> usize {
    Tokenizer::new(html)
        .map(|event| match event {
            Event::Text(text) => count_words(text),
            _ => 0,
        })
        .sum()
}

#[rstest]
// no truncation needed
#[case("Hello world", Some(5), "Hello world")]
#[case("<p>Hello world, this is a test.</p>", Some(10), "<p>Hello world, this is a test.</p>")]
#[case("No tags here", None, "No tags here")]
// plain text
#[case("one two three four", Some(2), "one two__TRUNCATION_MARKER_")]
#[case("A sentence with several words.", Some(4), "A sentence with several__TRUNCATION_MARKER_")]
#[case("one two three four", Some(0), "__TRUNCATION_MARKER_")]
// with markup
#[case(
    "<p>This is <b>some bold</b> text.</p>",
    Some(4),
    "<p>This is <b>some bold__TRUNCATION_MARKER_</b></p>"
)]
#[case(
    "<span><a>Nested link to truncate</a></span>",
    Some(3),
    "<span><a>Nested link to__TRUNCATION_MARKER_</a></span>"
)]
#[case(
    "<div>One two <img> three four</div>",
    Some(3),
    "<div>One two <img> three__TRUNCATION_MARKER_</div>"
)]
#[case("Stop<p>before the next word.</p>", Some(1), "Stop__TRUNCATION_MARKER_")]
#[case(
    "Truncate right after a tag <b>boldly</b>.",
    Some(6),
    "Truncate right after a tag <b>boldly__TRUNCATION_MARKER_</b>"
)]
// edge cases
#[case("one-two three", Some(1), "one-two__TRUNCATION_MARKER_")]
#[case("", Some(5), "")]
#[case("   leading spaces", Some(2), "   leading spaces")]
#[case("trailing spaces   ", Some(2), "trailing spaces   ")]
#[case("<p></p><b></b>", Some(5), "<p></p><b></b>")]
fn word_truncation(#[case] html: &str, #[case] max_words: Option<usize>, #[case] expected: &str) {
    assert_eq!(truncated(html, max_words), expected);
}

#[rstest]
#[case("one, two, three.", 2, "one, two__TRUNCATION_MARKER_")]
#[case(
    "words-with-hyphens are-counted-as-one",
    1,
    "words-with-hyphens__TRUNCATION_MARKER_"
)]
#[case("one \n two \t three", 2, "one \n two__TRUNCATION_MARKER_")]
#[case("one <b>two</b> three", 2, "one <b>two__TRUNCATION_MARKER_</b>")]
#[case("one <!-- comment --> two", 2, "one <!-- comment --> two")]
#[case("one &amp; two", 2, "one &amp; two")]
#[case("one &#123; two", 2, "one &#123; two")]
#[case("Привет мир, как дела?", 2, "Привет мир__TRUNCATION_MARKER_")]
#[case(
    "<p>First word.</p> <div>Second word.</div>",
    2,
    "<p>First word.__TRUNCATION_MARKER_</p>"
)]
#[case(
    " leading space and <b>tags</b> then text",
    4,
    " leading space and <b>tags__TRUNCATION_MARKER_</b>"
)]
// apostrophes split words
#[case("it's a test", 2, "it's__TRUNCATION_MARKER_")]
#[case(" <p> <i> </i> </p> ", 5, " <p> <i> </i> </p> ")]
fn corner_cases(#[case] html: &str, #[case] max_words: usize, #[case] expected: &str) {
    assert_eq!(truncated(html, Some(max_words)), expected);
}

#[rstest]
#[case("one <b>two</b> three", 1, "one __TRUNCATION_MARKER_")]
#[case("word1  <i>word2</i>", 1, "word1  __TRUNCATION_MARKER_")]
#[case("word1 <strong>word2</strong>", 1, "word1 __TRUNCATION_MARKER_")]
#[case("words <span>and words</span>", 1, "words __TRUNCATION_MARKER_")]
#[case("a b c <a>d e f</a>", 3, "a b c __TRUNCATION_MARKER_")]
#[case("a b c  <a>d e f</a>", 3, "a b c  __TRUNCATION_MARKER_")]
fn whitespace_before_a_tag_is_kept(
    #[case] html: &str,
    #[case] max_words: usize,
    #[case] expected: &str,
) {
    assert_eq!(truncated(html, Some(max_words)), expected);
}

#[test]
fn custom_marker() {
    assert_eq!(
        truncate("This is some sample text.", Some(3), " [read more]"),
        "This is some [read more]"
    );
}

#[test]
fn deep_nesting_is_closed_innermost_first() {
    let html = "<div><p>Here is <em>some <i>very important</i> text</em> to test.</p></div>";
    assert_eq!(
        truncated(html, Some(5)),
        "<div><p>Here is <em>some <i>very important__TRUNCATION_MARKER_</i></em></p></div>"
    );
}

#[test]
fn script_text_counts_as_words() {
    assert_eq!(
        truncate("<script>var a = 1;</script> after", Some(1), "|"),
        "<script>var|</script>"
    );
}

const ARTICLE: &str = "<h1>Title here</h1>\n<p>Some <em>emphasised</em> words, a \
    <a href=\"/next\">link</a> &amp; an <img src=\"x.png\" alt=\"x\"> image.</p>\n\
    <ul><li>one</li><li>two-part item</li></ul><!-- end -->";

#[test]
fn unlimited_equals_reserialization() {
    assert_eq!(truncated(ARTICLE, None), reserialize(ARTICLE));
    assert_eq!(reserialize(ARTICLE), ARTICLE);
}

#[test]
fn never_exceeds_budget_and_closes_everything() {
    let total = text_words(ARTICLE);
    for max_words in 0..=total + 2 {
        let out = truncated(ARTICLE, Some(max_words));
        let before_marker = out.split(DEFAULT_MARKER).next().unwrap_or_default();
        assert!(
            text_words(before_marker) <= max_words,
            "{max_words}: {out}"
        );

        let mut check = Streamer::new();
        check.process(&out);
        assert!(check.stack().is_empty(), "{max_words}: {out}");
    }
}

#[test]
fn larger_budgets_never_shorten_the_output() {
    let mut previous = 0;
    for max_words in 0..=text_words(ARTICLE) {
        let out = truncated(ARTICLE, Some(max_words));
        let kept = out.find(DEFAULT_MARKER).unwrap_or(out.len());
        assert!(kept >= previous, "{max_words}: {out}");
        previous = kept;
    }
}

#[test]
fn budget_beyond_word_count_is_lossless() {
    let total = text_words(ARTICLE);
    assert_eq!(total, 12);
    assert_eq!(truncated(ARTICLE, Some(total + 1)), ARTICLE);
}

#[test]
fn budget_equal_to_word_count_stops_at_next_tag() {
    let total = text_words(ARTICLE);
    let out = truncated(ARTICLE, Some(total));
    let last_word = ARTICLE.find("item").unwrap() + "item".len();
    assert_eq!(
        out,
        format!("{}{DEFAULT_MARKER}</li></ul>", &ARTICLE[..last_word])
    );
    // the trailing comment is lost to the halt at `</li>`
    assert_eq!(
        out.replace(DEFAULT_MARKER, ""),
        ARTICLE.strip_suffix("<!-- end -->").unwrap()
    );
}

const STRAY_APOSTROPHE: &str =
    "<p><img alt=don't src=a.png> Some body text here.</p><p>Second paragraph.</p>";
const UNCLOSED_TITLE: &str = r#"<p title="oops>Hello world</p><p>More text</p>"#;

#[test]
fn apostrophe_in_unquoted_value_is_truncated_normally() {
    assert_eq!(
        truncate(STRAY_APOSTROPHE, Some(3), "|"),
        "<p><img alt=don't src=a.png> Some body text|</p>"
    );
}

#[rstest]
#[case(STRAY_APOSTROPHE)]
#[case(UNCLOSED_TITLE)]
fn stray_quotes_survive_summaries(#[case] html: &str) {
    assert_eq!(truncated(html, None), html);
    assert_eq!(summarize(html, &SummaryOptions::default()), html);
}

#[test]
fn truncator_resets_between_calls() {
    let mut streamer = Streamer::with_policy(WordTruncator::new(Some(2)));
    assert_eq!(
        streamer.process("<p>a b c</p>"),
        "<p>a b__TRUNCATION_MARKER_</p>"
    );
    assert_eq!(streamer.process("x y"), "x y");
    assert!(streamer.stack().is_empty());
}
