use crate::gravatar::{
    email_hash, normalize_email, parse_size, GravatarUrlBuilder, DEFAULT_AVATAR_SIZE,
};

#[test]
fn test_normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email("  Jane.Doe@Example.COM \n"), "jane.doe@example.com");
}

#[test]
fn test_email_hash_is_sha256_hex() {
    // sha256("test@example.com")
    assert_eq!(
        email_hash("test@example.com"),
        "973dfe463ec85785f5f95af5ba3906eedb2d931c24e69824a89ea65dba4e813b"
    );
}

#[test]
fn test_email_hash_ignores_case_and_whitespace() {
    let expected = email_hash("someone@example.org");
    for variant in [
        "Someone@Example.org",
        "  someone@example.org",
        "SOMEONE@EXAMPLE.ORG\t",
        "\n someone@EXAMPLE.org  ",
    ] {
        assert_eq!(email_hash(variant), expected, "variant {:?}", variant);
    }
    assert_ne!(email_hash("someone.else@example.org"), expected);
}

#[test]
fn test_byte_order_mark_is_trimmed() {
    assert_eq!(normalize_email("\u{feff}Test@Example.com\u{feff}"), "test@example.com");
    assert_eq!(
        email_hash("\u{feff} test@example.com"),
        email_hash("test@example.com")
    );
}

#[test]
fn test_parse_size_defaults() {
    assert_eq!(parse_size(None), DEFAULT_AVATAR_SIZE);
    assert_eq!(parse_size(Some("")), DEFAULT_AVATAR_SIZE);
    assert_eq!(parse_size(Some("abc")), DEFAULT_AVATAR_SIZE);
    assert_eq!(parse_size(Some("px120")), DEFAULT_AVATAR_SIZE);
    assert_eq!(parse_size(Some("0")), DEFAULT_AVATAR_SIZE);
    assert_eq!(parse_size(Some("-40")), DEFAULT_AVATAR_SIZE);
    assert_eq!(parse_size(Some("99999999999")), DEFAULT_AVATAR_SIZE);
}

#[test]
fn test_parse_size_is_lenient() {
    assert_eq!(parse_size(Some("200")), 200);
    assert_eq!(parse_size(Some("  64")), 64);
    assert_eq!(parse_size(Some("+32")), 32);
    assert_eq!(parse_size(Some("120px")), 120);
    assert_eq!(parse_size(Some("48.9")), 48);
}

#[test]
fn test_avatar_url_format() {
    let urls = GravatarUrlBuilder::default();
    let url = urls.avatar_url(" Test@Example.com ", 80);
    assert_eq!(
        url,
        "https://www.gravatar.com/avatar/973dfe463ec85785f5f95af5ba3906eedb2d931c24e69824a89ea65dba4e813b?s=80&d=identicon"
    );
}

#[test]
fn test_avatar_url_is_deterministic() {
    let urls = GravatarUrlBuilder::default();
    assert_eq!(
        urls.avatar_url("a@b.c", 128),
        urls.avatar_url("A@B.C", 128)
    );
    assert_ne!(urls.avatar_url("a@b.c", 128), urls.avatar_url("a@b.c", 64));
}

#[test]
fn test_custom_base_url_strips_trailing_slash() {
    let urls = GravatarUrlBuilder::new("http://127.0.0.1:9999/");
    assert_eq!(urls.base_url(), "http://127.0.0.1:9999");
    assert!(urls
        .avatar_url("x@y.z", 10)
        .starts_with("http://127.0.0.1:9999/avatar/"));
}
