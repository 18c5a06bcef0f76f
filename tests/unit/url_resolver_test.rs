use relaybrowser::services::url_resolver::{
    is_absolute_url, is_fqdn, is_fqdn_location, process_search_string, resolve, search_url,
};
use relaybrowser::types::settings::NavigationSettings;
use rstest::rstest;

const GOOGLE: &str = "https://www.google.com/search?q={}";

#[rstest]
#[case("https://example.com", "https://example.com")]
#[case("http://localhost:8080/app", "http://localhost:8080/app")]
#[case("about:blank", "about:blank")]
#[case("file:///etc/hosts", "file:///etc/hosts")]
#[case("example.com", "example.com")]
#[case("www.example.co.uk/path?x=1", "www.example.co.uk/path?x=1")]
#[case("example.com:8443", "example.com:8443")]
#[case("sub.example.org.", "sub.example.org.")]
#[case("xn--bcher-kva.example", "xn--bcher-kva.example")]
#[case("two words", "https://www.google.com/search?q=two+words")]
#[case("rust", "https://www.google.com/search?q=rust")]
#[case("localhost", "https://www.google.com/search?q=localhost")]
#[case("c++ & rust", "https://www.google.com/search?q=c%2B%2B+%26+rust")]
#[case("example.c0m", "https://www.google.com/search?q=example.c0m")]
#[case("what is example.com", "https://www.google.com/search?q=what+is+example.com")]
fn test_process_search_string(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(process_search_string(input, GOOGLE), expected);
}

#[rstest]
#[case("", "about:blank")]
#[case("   ", "about:blank")]
#[case("  example.com  ", "example.com")]
fn test_resolve_trims_and_defaults(#[case] input: &str, #[case] expected: &str) {
    let settings = NavigationSettings {
        search_url: GOOGLE.to_string(),
        default_url: "about:blank".to_string(),
    };
    assert_eq!(resolve(input, &settings), expected);
}

#[test]
fn test_resolve_uses_default_search_engine() {
    let settings = NavigationSettings::default();
    assert_eq!(
        resolve("hello world", &settings),
        "https://www.google.com/search?q=hello+world"
    );
    assert_eq!(resolve("", &settings), "");
}

#[test]
fn test_search_template_without_placeholder_appends_query() {
    assert_eq!(
        search_url("a b", "https://duckduckgo.com/?q="),
        "https://duckduckgo.com/?q=a+b"
    );
}

#[rstest]
#[case("example.com", true)]
#[case("a.b.c.example.com", true)]
#[case("my-site.io", true)]
#[case("com", false)]
#[case("-bad.com", false)]
#[case("bad-.com", false)]
#[case("double..dot.com", false)]
#[case("example.1com", false)]
#[case("example.c", false)]
fn test_is_fqdn(#[case] host: &str, #[case] expected: bool) {
    assert_eq!(is_fqdn(host), expected);
}

#[rstest]
#[case("example.com/a/b", true)]
#[case("example.com#top", true)]
#[case("example.com:80", true)]
#[case("example.com:", false)]
#[case("example.com:http", false)]
#[case("example .com", false)]
fn test_is_fqdn_location(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_fqdn_location(input), expected);
}

#[rstest]
#[case("https://example.com", true)]
#[case("data:text/plain,hi", true)]
#[case("mailto:someone", false)]
#[case("https://exa mple.com", false)]
#[case("example.com", false)]
fn test_is_absolute_url(#[case] input: &str, #[case] expected: bool) {
    assert_eq!(is_absolute_url(input), expected);
}
