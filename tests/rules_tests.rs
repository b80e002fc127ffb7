use pathgate::{
    Category, RuleTable,
    rules::prefix_matches,
};

#[test]
fn test_default_seeds() {
    let rules = RuleTable::default();

    assert_eq!(rules.prefixes(Category::Admin), ["/admin"]);
    assert_eq!(rules.prefixes(Category::User), ["/profiles", "/data"]);
    assert_eq!(
        rules.prefixes(Category::Public),
        [
            "/",
            "/login",
            "/register",
            "/favicon.ico",
            "/style",
            "/img",
            "/js",
            "/favicon.ico",
            "/robots.txt",
            "/sitemap_index.xml",
        ]
    );
    assert!(rules.root_is_public());
}

#[test]
fn test_add_prefix_appends_in_order() {
    let mut rules = RuleTable::default();
    rules.add_prefix(Category::Admin, "/ops");
    rules.add_prefix(Category::Admin, "/ops");

    // no de-duplication
    assert_eq!(rules.prefixes(Category::Admin), ["/admin", "/ops", "/ops"]);
}

#[test]
fn test_set_prefixes_replaces_list() {
    let mut rules = RuleTable::default();
    rules.set_prefixes(Category::Public, ["/x"]);

    assert_eq!(rules.prefixes(Category::Public), ["/x"]);
    assert!(!rules.matches(Category::Public, "/login"));
    assert!(rules.matches(Category::Public, "/x/anything"));
}

#[test]
fn test_reset_keeps_public_and_root_flag() {
    let mut rules = RuleTable::default();
    rules.set_root_is_public(false);
    rules.reset();

    assert!(rules.prefixes(Category::Admin).is_empty());
    assert!(rules.prefixes(Category::User).is_empty());
    assert_eq!(rules.prefixes(Category::Public).len(), 10);
    assert!(!rules.root_is_public());
}

#[test]
fn test_matching_is_literal_and_case_sensitive() {
    let rules = RuleTable::default();

    assert!(rules.matches(Category::Admin, "/admin"));
    assert!(rules.matches(Category::Admin, "/administrator"));
    assert!(!rules.matches(Category::Admin, "/Admin"));
    // no normalization of dot segments or double slashes
    assert!(!rules.matches(Category::Admin, "//admin"));
    assert!(!rules.matches(Category::Admin, "/x/../admin"));
}

#[test]
fn test_public_root_entry_matches_root_only() {
    assert!(prefix_matches(Category::Public, "/", "/"));
    assert!(!prefix_matches(Category::Public, "/", "/unknown/page"));
    assert!(prefix_matches(Category::Public, "/js", "/js/app.js"));

    let rules = RuleTable::default();
    assert!(rules.matches(Category::Public, "/"));
    assert!(!rules.matches(Category::Public, "/admin/dashboard"));
}

#[test]
fn test_admin_and_user_root_entry_match_everything() {
    assert!(prefix_matches(Category::Admin, "/", "/login"));
    assert!(prefix_matches(Category::User, "/", "/data/1"));

    let mut rules = RuleTable::default();
    rules.set_prefixes(Category::Admin, ["/"]);
    assert!(rules.matches(Category::Admin, "/login"));
    assert_eq!(rules.snapshot("/login").admin_hits, 1);
    assert_eq!(rules.snapshot("/").admin_hits, 1);
}

#[test]
fn test_snapshot_classifies_path() {
    let mut rules = RuleTable::default();
    rules.add_prefix(Category::Admin, "/admin/users");
    rules.add_prefix(Category::Public, "/admin/users/avatar");

    let m = rules.snapshot("/admin/users/avatar/1.png");
    assert!(!m.root_exempt);
    assert_eq!(m.admin_hits, 2);
    assert!(m.public_hit);

    let root = rules.snapshot("/");
    assert!(root.root_exempt);
    assert_eq!(root.admin_hits, 0);

    rules.set_root_is_public(false);
    assert!(!rules.snapshot("/").root_exempt);
}

#[test]
fn test_empty_table() {
    let rules = RuleTable::empty();
    for category in Category::ALL {
        assert!(rules.prefixes(category).is_empty());
    }
    assert!(!rules.snapshot("/login").public_hit);
}

#[test]
fn test_category_parsing() {
    assert_eq!("admin".parse::<Category>(), Ok(Category::Admin));
    assert_eq!(" Public ".parse::<Category>(), Ok(Category::Public));
    assert_eq!("USER".parse::<Category>(), Ok(Category::User));
    assert!("guest".parse::<Category>().is_err());
    assert_eq!(Category::Admin.to_string(), "admin");
}
